use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default sleep between two non-blocking lock attempts
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lower bound on the poll interval so an unbounded wait never spins
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// How an acquirer waits for a busy lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockOptions {
    /// Upper bound on the wait. `None` waits until the lock is free.
    pub timeout: Option<Duration>,
    /// Sleep between two attempts
    pub poll_interval: Duration,
    /// Upper bound on the number of attempts. `None` is unlimited.
    pub max_attempts: Option<u32>,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

impl LockOptions {
    /// Options that wait at most `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::default()
        }
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub(crate) fn effective_poll_interval(&self) -> Duration {
        self.poll_interval.max(MIN_POLL_INTERVAL)
    }
}

/// rlock.toml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub lock: LockConfig,
}

/// `[lock]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockConfig {
    /// Omit to wait forever
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            poll_interval_ms: default_poll_interval_ms(),
            max_attempts: None,
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}
