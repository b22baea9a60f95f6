//! File locking module for process-level mutual exclusion
//!
//! This module provides advisory file locks using the fs2 crate so that
//! unrelated processes can serialize access to a shared file.
//!
//! # Lock files
//!
//! The lock for a protected path `p` lives in the sibling file `p.lock`
//! (see [`lock_path_for`]). The lock itself is a kernel advisory lock on an
//! open descriptor of that file, never the mere existence of the file. The
//! kernel drops the lock when the descriptor is closed, including when the
//! holding process exits or is killed, so a crashed holder cannot leave a
//! stale lock behind. The lock file is left in place after release.
//!
//! # Waiting
//!
//! [`acquire`] makes a non-blocking attempt, sleeps
//! [`LockOptions::poll_interval`] and retries, until the lock is free or
//! [`LockOptions::timeout`] passes. Waiters are not queued: whichever waiter
//! polls first after a release wins.
//!
//! # Re-entrancy
//!
//! Locks are not re-entrant. Acquiring a path that the same thread already
//! holds waits on itself until the timeout (forever without one). Callers
//! must not nest acquisitions of the same path.
//!
//! Only processes that go through this module respect the lock.

use std::path::Path;

mod acquire;
mod cancel;
mod error;
mod handle;
mod info;
mod lockfile;
mod path;

pub use crate::config::LockOptions;
pub use cancel::CancelToken;
pub use error::LockError;
pub use handle::{LockHandle, LockState};
pub use info::{LockInfo, LockToken};
pub use lockfile::LockFile;
pub use path::{lock_path_for, LOCK_SUFFIX};


/// Acquires an exclusive lock on the specified path.
///
/// `path` is the protected resource; the lock is taken on its `.lock`
/// sibling. The call blocks until the lock is obtained, `options.timeout`
/// elapses, or `options.max_attempts` attempts have failed.
///
/// # Returns
///
/// Returns a [`LockHandle`] on success, which will automatically release the
/// lock when dropped. Returns [`LockError`] on timeout or I/O error.
///
/// # Examples
///
/// ```no_run
/// use rlock_core::lock::{acquire, LockOptions};
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let options = LockOptions::with_timeout(Duration::from_secs(30));
/// let mut handle = acquire("/tmp/results.txt", &options)?;
/// // Critical section here
/// handle.release()?; // Explicit release (automatic on drop)
/// # Ok(())
/// # }
/// ```
pub fn acquire(path: impl AsRef<Path>, options: &LockOptions) -> Result<LockHandle, LockError> {
    acquire::acquire_with_retry(path.as_ref(), options, None)
}

/// Like [`acquire`], but gives up with [`LockError::Cancelled`] once
/// `cancel` fires.
///
/// The token is checked before every attempt, so cancellation is observed
/// within one poll interval. Nothing is held after a cancelled call.
pub fn acquire_cancellable(
    path: impl AsRef<Path>,
    options: &LockOptions,
    cancel: &CancelToken,
) -> Result<LockHandle, LockError> {
    acquire::acquire_with_retry(path.as_ref(), options, Some(cancel))
}

/// Makes a single non-blocking attempt. `Ok(None)` means the lock is busy.
pub fn try_acquire(path: impl AsRef<Path>) -> Result<Option<LockHandle>, LockError> {
    acquire::try_acquire_once(path.as_ref())
}

/// Releases a handle. Equivalent to [`LockHandle::release`] followed by drop.
pub fn release(mut handle: LockHandle) -> Result<(), LockError> {
    handle.release()
}

/// Reports whether some process currently holds the lock for `path`.
///
/// The answer can be stale as soon as it is returned; use it for
/// diagnostics, not to decide whether writing is safe.
pub fn is_locked(path: impl AsRef<Path>) -> Result<bool, LockError> {
    acquire::probe(path.as_ref())
}

/// Reads the holder record of the lock for `path`.
///
/// Returns `None` when the lock file is missing, empty, or mid-update.
pub fn read_holder(path: impl AsRef<Path>) -> Result<Option<LockInfo>, LockError> {
    let lock_path = lock_path_for(path.as_ref());
    match std::fs::read_to_string(&lock_path) {
        Ok(content) => Ok(LockInfo::parse(&content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(LockError::io(&lock_path, "read lock file", e)),
    }
}
