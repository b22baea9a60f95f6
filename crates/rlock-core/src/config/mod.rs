//! Lock configuration
//!
//! [`LockOptions`] is what the lock primitive consumes. [`Config`] is the
//! on-disk `rlock.toml` form, converted to options with
//! [`LockConfig::to_options`] after validation.

mod model;

pub use model::{Config, LockConfig, LockOptions, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};

use crate::error::{Result, RlockError};
use std::path::Path;
use std::time::Duration;

impl Config {
    /// Loads a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| RlockError::ConfigParseError(e.to_string()))
    }
}

impl LockConfig {
    /// Validates the table and converts it to [`LockOptions`]
    pub fn to_options(&self) -> Result<LockOptions> {
        if self.poll_interval_ms == 0 {
            return Err(RlockError::ConfigInvalidValue {
                field: "lock.poll_interval_ms".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.max_attempts == Some(0) {
            return Err(RlockError::ConfigInvalidValue {
                field: "lock.max_attempts".to_string(),
                reason: "must be at least 1 when set".to_string(),
            });
        }

        Ok(LockOptions {
            timeout: self.timeout_ms.map(Duration::from_millis),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        let options = config.lock.to_options().unwrap();
        assert_eq!(options, LockOptions::default());
        assert!(options.timeout.is_none(), "default waits forever");
    }

    #[test]
    fn test_lock_table_parsed() {
        let config = Config::from_toml_str(
            r#"
[lock]
timeout_ms = 2500
poll_interval_ms = 20
max_attempts = 7
"#,
        )
        .unwrap();
        let options = config.lock.to_options().unwrap();
        assert_eq!(options.timeout, Some(Duration::from_millis(2500)));
        assert_eq!(options.poll_interval, Duration::from_millis(20));
        assert_eq!(options.max_attempts, Some(7));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let config = Config::from_toml_str("[lock]\npoll_interval_ms = 0\n").unwrap();
        let err = config.lock.to_options().unwrap_err();
        assert!(
            err.to_string().contains("lock.poll_interval_ms"),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = Config::from_toml_str("[lock]\nmax_attempts = 0\n").unwrap();
        assert!(matches!(
            config.lock.to_options(),
            Err(RlockError::ConfigInvalidValue { .. })
        ));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = Config::from_toml_str("[lock\ntimeout_ms = ");
        assert!(matches!(result, Err(RlockError::ConfigParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = Config::load(temp.path().join("rlock.toml"));
        assert!(
            matches!(&result, Err(RlockError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound),
            "got {:?}",
            result
        );
    }

    #[test]
    fn test_builder_sets_fields() {
        let options = LockOptions::with_timeout(Duration::from_secs(3))
            .poll_interval(Duration::from_millis(5))
            .max_attempts(Some(2));
        assert_eq!(options.timeout, Some(Duration::from_secs(3)));
        assert_eq!(options.poll_interval, Duration::from_millis(5));
        assert_eq!(options.max_attempts, Some(2));
    }

    #[test]
    fn test_zero_poll_interval_clamped_at_runtime() {
        let options = LockOptions::default().poll_interval(Duration::ZERO);
        assert_eq!(options.effective_poll_interval(), MIN_POLL_INTERVAL);
    }
}
