//! Lock acquisition logic with polling and timeout

use super::{lock_path_for, CancelToken, LockError, LockHandle};
use crate::config::LockOptions;
use fs2::FileExt;
use log::{debug, info};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

const PROGRESS_MESSAGE_THRESHOLD: Duration = Duration::from_secs(2);

/// Opens (creating if absent) the lock file without truncating it.
///
/// The parent directory is not created: a lock for a resource whose
/// directory does not exist is an I/O error for the caller.
fn open_lock_file(lock_path: &Path) -> Result<File, LockError> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .map_err(|e| LockError::io(lock_path, "open lock file", e))
}

/// True when `err` means "someone else holds the lock"
fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

/// Polls for an exclusive lock until it is free, the deadline passes, the
/// attempt budget runs out or `cancel` fires.
pub(crate) fn acquire_with_retry(
    target: &Path,
    options: &LockOptions,
    cancel: Option<&CancelToken>,
) -> Result<LockHandle, LockError> {
    let lock_path = lock_path_for(target);
    let file = open_lock_file(&lock_path)?;
    let poll_interval = options.effective_poll_interval();

    let start = Instant::now();
    let mut attempts: u32 = 0;
    let mut progress_shown = false;

    loop {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            debug!("gave up waiting for {}: cancelled", lock_path.display());
            return Err(LockError::Cancelled {
                path: lock_path,
                waited: start.elapsed(),
            });
        }

        attempts = attempts.saturating_add(1);
        match FileExt::try_lock_exclusive(&file) {
            Ok(()) => return Ok(LockHandle::held(target, lock_path, file)),
            Err(e) if is_contended(&e) => {
                let elapsed = start.elapsed();

                if options.max_attempts.is_some_and(|max| attempts >= max) {
                    return Err(LockError::RetriesExhausted {
                        path: lock_path,
                        attempts,
                        waited: elapsed,
                    });
                }

                // Never sleep past the deadline
                let sleep_for = match options.timeout {
                    Some(timeout) if elapsed >= timeout => {
                        return Err(LockError::Timeout {
                            path: lock_path,
                            waited: elapsed,
                        });
                    }
                    Some(timeout) => poll_interval.min(timeout - elapsed),
                    None => poll_interval,
                };

                if !progress_shown && elapsed >= PROGRESS_MESSAGE_THRESHOLD {
                    info!("Waiting for lock on {}...", lock_path.display());
                    progress_shown = true;
                }

                thread::sleep(sleep_for);
            }
            Err(e) => return Err(LockError::io(&lock_path, "acquire lock", e)),
        }
    }
}

/// Makes one non-blocking attempt.
pub(crate) fn try_acquire_once(target: &Path) -> Result<Option<LockHandle>, LockError> {
    let lock_path = lock_path_for(target);
    let file = open_lock_file(&lock_path)?;

    match FileExt::try_lock_exclusive(&file) {
        Ok(()) => Ok(Some(LockHandle::held(target, lock_path, file))),
        Err(e) if is_contended(&e) => Ok(None),
        Err(e) => Err(LockError::io(&lock_path, "acquire lock", e)),
    }
}

/// Probes the lock without keeping it.
///
/// A missing lock file means nobody has ever locked the resource. The probe
/// does not create the lock file.
pub(crate) fn probe(target: &Path) -> Result<bool, LockError> {
    let lock_path = lock_path_for(target);
    // flock works on a read-only descriptor
    let file = match OpenOptions::new().read(true).open(&lock_path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(LockError::io(&lock_path, "open lock file", e)),
    };

    match FileExt::try_lock_exclusive(&file) {
        Ok(()) => {
            FileExt::unlock(&file).map_err(|e| LockError::io(&lock_path, "release probe", e))?;
            Ok(false)
        }
        Err(e) if is_contended(&e) => Ok(true),
        Err(e) => Err(LockError::io(&lock_path, "probe lock", e)),
    }
}
