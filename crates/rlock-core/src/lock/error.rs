//! Error types for file locking

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Error type for lock operations
///
/// Every variant carries the lock file path. Variants produced while waiting
/// also carry how long the caller waited, so it can decide whether to retry.
#[derive(Debug, Error)]
pub enum LockError {
    /// Lock acquisition timed out
    #[error("Timeout waiting for lock on {} after {:?}", .path.display(), .waited)]
    Timeout {
        /// Path to the lock file
        path: PathBuf,
        /// Time spent waiting before giving up
        waited: Duration,
    },

    /// The configured attempt budget ran out before the lock was free
    #[error(
        "Gave up on lock {} after {} attempts ({:?})",
        .path.display(),
        .attempts,
        .waited
    )]
    RetriesExhausted {
        /// Path to the lock file
        path: PathBuf,
        /// Number of non-blocking attempts made
        attempts: u32,
        /// Time spent waiting before giving up
        waited: Duration,
    },

    /// The caller cancelled while the lock was being waited for
    #[error("Cancelled while waiting for lock on {} after {:?}", .path.display(), .waited)]
    Cancelled {
        /// Path to the lock file
        path: PathBuf,
        /// Time spent waiting before the cancellation was observed
        waited: Duration,
    },

    /// I/O error during lock operation
    #[error("I/O error during {operation} on {}: {source}", .path.display())]
    Io {
        /// The underlying I/O error
        #[source]
        source: io::Error,
        /// Path to the lock file
        path: PathBuf,
        /// Operation that failed
        operation: String,
    },
}

impl LockError {
    pub(crate) fn io(path: &Path, operation: &str, source: io::Error) -> Self {
        LockError::Io {
            source,
            path: path.to_path_buf(),
            operation: operation.to_string(),
        }
    }

    /// Path of the lock file involved in the failure
    pub fn path(&self) -> &Path {
        match self {
            LockError::Timeout { path, .. }
            | LockError::RetriesExhausted { path, .. }
            | LockError::Cancelled { path, .. }
            | LockError::Io { path, .. } => path,
        }
    }

    /// How long the caller waited, for failures that happened while waiting
    pub fn waited(&self) -> Option<Duration> {
        match self {
            LockError::Timeout { waited, .. }
            | LockError::RetriesExhausted { waited, .. }
            | LockError::Cancelled { waited, .. } => Some(*waited),
            LockError::Io { .. } => None,
        }
    }

    /// True when the lock was busy for the whole bounded wait
    pub fn is_contended(&self) -> bool {
        matches!(
            self,
            LockError::Timeout { .. } | LockError::RetriesExhausted { .. }
        )
    }
}
