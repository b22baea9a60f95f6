//! Helper binary that acquires a lock, reports it, and holds it
//!
//! Usage: lock_holder <path> <ready_path> <hold_ms>
//!
//! Writes `ready_path` once the lock on `path` is held, then sleeps for
//! `hold_ms` before exiting. Tests kill it during the sleep to simulate a
//! crashed holder.

use rlock_core::lock::{acquire, LockOptions};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage: lock_holder <path> <ready_path> <hold_ms>");
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[1]);
    let ready_path = PathBuf::from(&args[2]);
    let hold_ms: u64 = args[3].parse().expect("hold_ms must be a number");

    let _handle = acquire(&path, &LockOptions::with_timeout(Duration::from_secs(30)))
        .expect("Failed to acquire lock");

    fs::write(&ready_path, std::process::id().to_string()).expect("Failed to write ready marker");

    std::thread::sleep(Duration::from_millis(hold_ms));

    // Lock auto-released via Drop
}
