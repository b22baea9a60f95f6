//! RAII lock handle for automatic lock release

use super::info::{LockInfo, LockToken};
use super::LockError;
use fs2::FileExt;
use log::{debug, warn};
use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Lifecycle of a lock as seen by the process that uses it.
///
/// `Unlocked` and `Acquiring` only ever appear on a [`LockFile`]; a
/// [`LockHandle`] is born `Held` and ends `Released`.
///
/// [`LockFile`]: super::LockFile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Unlocked,
    Acquiring,
    Held,
    Released,
}

/// Handle for one held lock
///
/// The handle owns the open descriptor that carries the kernel lock. When
/// the handle is released or dropped the descriptor is closed, which also
/// releases the lock. If the process dies, the kernel closes the descriptor
/// and the lock is released the same way.
///
/// A handle can be moved to another thread but is never shared: release
/// takes `&mut self`.
#[derive(Debug)]
pub struct LockHandle {
    target: PathBuf,
    lock_path: PathBuf,
    token: LockToken,
    file: Option<File>,
    state: LockState,
}

impl LockHandle {
    pub(crate) fn held(target: &Path, lock_path: PathBuf, file: File) -> Self {
        let token = LockToken::new();
        if let Err(e) = write_holder_record(&file, &LockInfo::for_token(&token)) {
            warn!(
                "could not record holder in {}: {}",
                lock_path.display(),
                e
            );
        }
        debug!("acquired lock {} ({})", lock_path.display(), token);

        Self {
            target: target.to_path_buf(),
            lock_path,
            token,
            file: Some(file),
            state: LockState::Held,
        }
    }

    /// The protected resource this lock guards
    pub fn path(&self) -> &Path {
        &self.target
    }

    /// The lock file carrying the kernel lock
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    pub fn token(&self) -> &LockToken {
        &self.token
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_held(&self) -> bool {
        self.state == LockState::Held
    }

    /// Releases the lock and closes the lock file descriptor.
    ///
    /// Calling this on an already released handle is a no-op, so cleanup
    /// paths may call it more than once.
    pub fn release(&mut self) -> Result<(), LockError> {
        let Some(file) = self.file.take() else {
            return Ok(());
        };
        self.state = LockState::Released;

        // Clear the holder record while still exclusive
        if let Err(e) = file.set_len(0) {
            debug!(
                "could not clear holder record in {}: {}",
                self.lock_path.display(),
                e
            );
        }

        let unlocked = FileExt::unlock(&file)
            .map_err(|e| LockError::io(&self.lock_path, "release lock", e));
        drop(file);

        debug!("released lock {} ({})", self.lock_path.display(), self.token);
        unlocked
    }
}

impl Drop for LockHandle {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("{}", e);
        }
    }
}

fn write_holder_record(file: &File, info: &LockInfo) -> io::Result<()> {
    let json = serde_json::to_string(info).map_err(io::Error::other)?;
    let mut writer = file;
    writer.set_len(0)?;
    writer.seek(SeekFrom::Start(0))?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")
}
