use crate::guard::GuardError;
use crate::lock::LockError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RlockError {
    // Lock errors
    #[error("LOCK_FAILED: {0}")]
    Lock(#[from] LockError),

    #[error("GUARD_FAILED: {0}")]
    Guard(#[from] GuardError),

    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),
}

impl RlockError {
    /// The underlying lock failure, whether it came directly from the lock
    /// primitive or through a guard
    pub fn as_lock_error(&self) -> Option<&LockError> {
        match self {
            RlockError::Lock(e) => Some(e),
            RlockError::Guard(e) => e.as_lock_error(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RlockError>;
