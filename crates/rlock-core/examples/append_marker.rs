//! Helper binary that appends one marker run under the lock
//!
//! Usage: append_marker <path> <marker> <iterations> <separator>
//!
//! Opens `path` for append through `open_locked`, writes `marker` once per
//! iteration (one write call each), then writes `separator`. Runs from
//! concurrent processes must never interleave.

use rlock_core::guard::{open_locked, OpenMode};
use rlock_core::lock::LockOptions;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        eprintln!("Usage: append_marker <path> <marker> <iterations> <separator>");
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[1]);
    let marker = &args[2];
    let iterations: usize = args[3].parse().expect("iterations must be a number");
    let separator = &args[4];

    let options = LockOptions::with_timeout(Duration::from_secs(60))
        .poll_interval(Duration::from_millis(5));
    let mut file = open_locked(&path, OpenMode::Append, &options).expect("Failed to lock file");

    for _ in 0..iterations {
        file.write_all(marker.as_bytes())
            .expect("Failed to write marker");
    }
    file.write_all(separator.as_bytes())
        .expect("Failed to write separator");

    // File closed, then lock released
    file.close().expect("Failed to close file");
}
