//! Cross-process advisory file locking
//!
//! - [`lock`]: the lock primitive (kernel advisory lock on a `.lock` sibling)
//! - [`guard`]: files that are only reachable while their lock is held
//! - [`database`]: structured database files opened through the same lock
//! - [`config`]: waiting policy and its TOML form

pub mod config;
pub mod database;
pub mod error;
pub mod guard;
pub mod lock;

// Re-export commonly used types
pub use config::LockOptions;
pub use error::{Result, RlockError};
pub use guard::{open_locked, with_lock, GuardError, LockedFile, OpenMode};
pub use lock::{acquire, release, LockError, LockHandle};
