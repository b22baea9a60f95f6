//! Reusable named lock with an observable state

use super::{acquire, LockError, LockHandle, LockState};
use crate::config::LockOptions;
use std::path::{Path, PathBuf};

/// A lock bound to one protected path that can be taken and given back
/// repeatedly.
///
/// `LockFile` walks `Unlocked -> Acquiring -> Held -> Released`, and may go
/// back to `Held` with another [`acquire`](LockFile::acquire). A failed
/// acquisition returns it to the state it had before, so nothing is left
/// half-acquired.
///
/// Calling `acquire` while already `Held` is not re-entrant: it waits on
/// its own lock until the configured timeout (forever without one).
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
    options: LockOptions,
    state: LockState,
    handle: Option<LockHandle>,
}

impl LockFile {
    pub fn new(path: impl Into<PathBuf>, options: LockOptions) -> Self {
        Self {
            path: path.into(),
            options,
            state: LockState::Unlocked,
            handle: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    /// The handle of the current acquisition, if held
    pub fn handle(&self) -> Option<&LockHandle> {
        self.handle.as_ref().filter(|h| h.is_held())
    }

    pub fn acquire(&mut self) -> Result<(), LockError> {
        let previous = self.state;
        self.state = LockState::Acquiring;

        match acquire(&self.path, &self.options) {
            Ok(handle) => {
                self.handle = Some(handle);
                self.state = LockState::Held;
                Ok(())
            }
            Err(e) => {
                self.state = match previous {
                    LockState::Held => LockState::Held,
                    _ => LockState::Unlocked,
                };
                Err(e)
            }
        }
    }

    /// Releases the current acquisition. A no-op unless `Held`.
    pub fn release(&mut self) -> Result<(), LockError> {
        let Some(mut handle) = self.handle.take() else {
            return Ok(());
        };
        self.state = LockState::Released;
        handle.release()
    }
}
