//! Scoped access to lock-protected files
//!
//! [`open_locked`] takes the lock for a path and then opens the path, so the
//! returned [`LockedFile`] is the only way to reach the file. [`with_lock`]
//! runs a closure inside that scope and tears it down on every exit path.
//!
//! Teardown order is always: close the file, then release the lock. Another
//! process that acquires the lock next therefore never sees a file that is
//! still open for writing by the previous holder.
//!
//! The guarantee only holds between callers that all use this module (or
//! [`crate::database`]) for the same path.

use crate::config::LockOptions;
use crate::lock;
use log::warn;
use std::fs::File;
use std::path::Path;

mod error;
mod file;
mod mode;

pub use error::GuardError;
pub use file::LockedFile;
pub use mode::OpenMode;


/// Acquires the lock for `path`, then opens `path` in `mode`.
///
/// If opening fails, the lock is released before
/// [`GuardError::ResourceOpen`] is returned.
///
/// # Examples
///
/// ```no_run
/// use rlock_core::guard::{open_locked, OpenMode};
/// use rlock_core::lock::LockOptions;
/// use std::io::Write;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut log = open_locked("runs.log", OpenMode::Append, &LockOptions::default())?;
/// writeln!(log, "job 42 finished")?;
/// log.close()?;
/// # Ok(())
/// # }
/// ```
pub fn open_locked(
    path: impl AsRef<Path>,
    mode: OpenMode,
    options: &LockOptions,
) -> Result<LockedFile, GuardError> {
    let path = path.as_ref();
    let mut lock = lock::acquire(path, options)?;

    match mode.open_options().open(path) {
        Ok(file) => Ok(LockedFile::new(file, lock, path.to_path_buf(), mode)),
        Err(source) => {
            if let Err(e) = lock.release() {
                warn!("{}", e);
            }
            Err(GuardError::ResourceOpen {
                path: path.to_path_buf(),
                mode: mode.as_str(),
                source,
            })
        }
    }
}

/// Runs `f` with the file open under the lock.
///
/// The file is closed and the lock released whether `f` returns `Ok`,
/// returns `Err`, or panics. When both `f` and the teardown fail, the error
/// from `f` is returned and the teardown error is logged.
pub fn with_lock<T, E, F>(
    path: impl AsRef<Path>,
    mode: OpenMode,
    options: &LockOptions,
    f: F,
) -> Result<T, E>
where
    F: FnOnce(&mut File) -> Result<T, E>,
    E: From<GuardError>,
{
    let mut guarded = open_locked(path, mode, options)?;
    let outcome = f(&mut *guarded);
    let closed = guarded.close();

    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(teardown)) => {
            warn!("{}", teardown);
            Err(e)
        }
    }
}
