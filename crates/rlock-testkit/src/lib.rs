//! Test utilities for rlock
//!
//! This crate provides shared testing utilities used across the rlock workspace:
//! locating the helper binaries built from `rlock-core/examples`, waiting for
//! files written by child processes, and checking the output of concurrent
//! appenders.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the project root
///
/// This ensures all test temporary files are centralized in a single location
/// that is gitignored and easy to clean up manually if needed.
///
/// # Panics
///
/// Panics if the current directory cannot be determined or `.tmp/` cannot be
/// created.
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for non-test code
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Get path to an example binary built by cargo
///
/// Example binaries are used as independent processes in cross-process
/// tests. Cargo builds them alongside integration tests.
pub fn example_bin(name: &str) -> PathBuf {
    let mut path = std::env::current_exe().expect("Failed to get current executable path");

    // Navigate from target/debug/deps/test_binary to target/debug/examples/
    path.pop(); // Remove test binary name
    path.pop(); // Remove "deps"
    path.push("examples");
    path.push(name);

    // Add .exe extension on Windows
    if cfg!(target_os = "windows") {
        path.set_extension("exe");
    }

    path
}

/// Polls until `path` exists or `timeout` elapses. Returns whether it exists.
pub fn wait_for_path(path: &Path, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if path.exists() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    path.exists()
}

/// One contiguous run of a single writer's marker character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRun {
    pub marker: char,
    pub len: usize,
}

/// Splits appender output on `separator` and checks every chunk is one
/// writer's run.
///
/// Returns the runs in file order, or a description of the first chunk that
/// mixes characters from several writers.
pub fn marker_runs(content: &str, separator: char) -> Result<Vec<MarkerRun>, String> {
    content
        .split(separator)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            let mut chars = chunk.chars();
            let marker = chars.next().unwrap_or(separator);
            if let Some(other) = chars.find(|c| *c != marker) {
                return Err(format!(
                    "interleaved run: '{}' mixed with '{}' in {:?}",
                    marker, other, chunk
                ));
            }
            Ok(MarkerRun {
                marker,
                len: chunk.chars().count(),
            })
        })
        .collect()
}
