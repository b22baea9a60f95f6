//! RAII guard pairing an open file with its lock

use super::{GuardError, OpenMode};
use crate::lock::LockHandle;
use log::debug;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

/// A file that is only reachable while its lock is held.
///
/// Fields drop in declaration order, so dropping the guard closes the file
/// before the lock is released. [`close`](LockedFile::close) does the same
/// explicitly and reports release failures.
#[derive(Debug)]
pub struct LockedFile {
    file: File,
    lock: LockHandle,
    path: PathBuf,
    mode: OpenMode,
}

impl LockedFile {
    pub(crate) fn new(file: File, lock: LockHandle, path: PathBuf, mode: OpenMode) -> Self {
        Self {
            file,
            lock,
            path,
            mode,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn lock(&self) -> &LockHandle {
        &self.lock
    }

    /// Flushes and syncs the file, closes it, then releases the lock.
    ///
    /// Read-only modes skip the flush and sync.
    pub fn close(self) -> Result<(), GuardError> {
        let LockedFile {
            mut file,
            mut lock,
            path,
            mode,
        } = self;

        let flushed = if mode.is_writable() {
            file.flush()
                .map_err(|e| GuardError::io(path.as_path(), "flush", e))
                .and_then(|()| {
                    file.sync_all()
                        .map_err(|e| GuardError::io(path.as_path(), "sync", e))
                })
        } else {
            Ok(())
        };
        drop(file);
        debug!("closed {}", path.display());

        let released = lock.release().map_err(GuardError::from);
        flushed.and(released)
    }
}

impl Deref for LockedFile {
    type Target = File;

    fn deref(&self) -> &File {
        &self.file
    }
}

impl DerefMut for LockedFile {
    fn deref_mut(&mut self) -> &mut File {
        &mut self.file
    }
}

impl Read for LockedFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for LockedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for LockedFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}
