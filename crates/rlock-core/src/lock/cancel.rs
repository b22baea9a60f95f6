//! Cooperative cancellation for waiting acquirers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag that stops an in-progress [`acquire_cancellable`] wait.
///
/// Clones share the same flag, so one clone can be handed to a signal
/// handler or another thread while the waiter polls the other.
///
/// [`acquire_cancellable`]: super::acquire_cancellable
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Waiters observe it before their next attempt.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
