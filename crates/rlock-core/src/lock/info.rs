//! Holder identity written into the lock file

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Distinguishes one acquisition from every other one.
///
/// Process id and timestamp separate processes; the per-process sequence
/// separates acquisitions made by the same process within one clock tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockToken {
    pub pid: u32,
    pub acquired_at: DateTime<Utc>,
    pub sequence: u64,
}

impl LockToken {
    pub(crate) fn new() -> Self {
        Self {
            pid: std::process::id(),
            acquired_at: Utc::now(),
            sequence: NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl fmt::Display for LockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.pid,
            self.acquired_at.timestamp_micros(),
            self.sequence
        )
    }
}

/// Diagnostic record stored in the lock file while the lock is held.
///
/// Ownership is decided only by the kernel lock on the file; this record
/// exists so that humans and `rlock status` can see who is holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    pub pid: u32,
    pub host: String,
    pub acquired_at: DateTime<Utc>,
    pub token: String,
}

impl LockInfo {
    pub(crate) fn for_token(token: &LockToken) -> Self {
        Self {
            pid: token.pid,
            host: current_host(),
            acquired_at: token.acquired_at,
            token: token.to_string(),
        }
    }

    /// Parses a holder record, returning `None` for empty or partial content.
    pub(crate) fn parse(content: &str) -> Option<Self> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return None;
        }
        serde_json::from_str(trimmed).ok()
    }
}

fn current_host() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_distinct_within_process() {
        let a = LockToken::new();
        let b = LockToken::new();
        assert_eq!(a.pid, b.pid);
        assert_ne!(a, b);
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_info_parse_ignores_partial_record() {
        assert!(LockInfo::parse("").is_none());
        assert!(LockInfo::parse("  \n").is_none());
        assert!(LockInfo::parse("{\"pid\": 12").is_none());
    }

    #[test]
    fn test_info_parse_reads_written_record() {
        let token = LockToken::new();
        let info = LockInfo::for_token(&token);
        let json = serde_json::to_string(&info).unwrap();
        let parsed = LockInfo::parse(&json).unwrap();
        assert_eq!(parsed.pid, std::process::id());
        assert_eq!(parsed.token, token.to_string());
    }
}
