//! Error types for guarded resources

use crate::lock::LockError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for guarded open/close operations
#[derive(Debug, Error)]
pub enum GuardError {
    /// The lock could not be acquired; nothing was opened
    #[error(transparent)]
    Lock(#[from] LockError),

    /// The resource failed to open after the lock was obtained. The lock has
    /// already been released when this is returned.
    #[error("Failed to open {} in mode '{}': {source}", .path.display(), .mode)]
    ResourceOpen {
        path: PathBuf,
        mode: &'static str,
        #[source]
        source: io::Error,
    },

    /// I/O error while the resource was open
    #[error("I/O error during {operation} on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: io::Error,
    },

    /// Database content is not a valid document
    #[error("Invalid database {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Mutation attempted through a read-only handle
    #[error("Database {} is open read-only", .path.display())]
    ReadOnly { path: PathBuf },
}

impl GuardError {
    pub(crate) fn io(path: impl Into<PathBuf>, operation: &str, source: io::Error) -> Self {
        GuardError::Io {
            path: path.into(),
            operation: operation.to_string(),
            source,
        }
    }

    /// The lock failure behind this error, if acquisition failed
    pub fn as_lock_error(&self) -> Option<&LockError> {
        match self {
            GuardError::Lock(e) => Some(e),
            _ => None,
        }
    }
}
