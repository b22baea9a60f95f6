//! Counter helper using the lock-protected database
//!
//! Usage: db_counter <db_path> <iterations>
//!
//! Each iteration opens the database under the lock, reads the counter,
//! increments it and writes it back. Concurrent runs must lose no updates.

use rlock_core::database::{with_database, DbMode};
use rlock_core::guard::GuardError;
use rlock_core::lock::LockOptions;
use serde_json::json;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: db_counter <db_path> <iterations>");
        std::process::exit(1);
    }

    let db_path = PathBuf::from(&args[1]);
    let iterations: usize = args[2].parse().expect("iterations must be a number");

    let options = LockOptions::with_timeout(Duration::from_secs(60))
        .poll_interval(Duration::from_millis(2));

    for _ in 0..iterations {
        with_database(&db_path, DbMode::Append, &options, |db| {
            let current = db
                .table("counter")
                .and_then(|rows| rows.first())
                .and_then(|row| row["value"].as_u64())
                .unwrap_or(0);

            // Widen the read-modify-write window
            std::thread::sleep(Duration::from_micros(50));

            db.replace_table("counter", vec![json!({ "value": current + 1 })])?;
            Ok::<_, GuardError>(())
        })
        .expect("Failed to update counter");
    }

    println!("Counter child completed {} iterations", iterations);
}
