pub mod append;
pub mod run;
pub mod status;

use crate::cli::LockArgs;
use anyhow::{Result, bail};
use rlock_core::config::Config;
use rlock_core::{GuardError, LockError, LockOptions, RlockError};
use std::time::Duration;

/// Exit status when the lock could not be obtained (EX_TEMPFAIL)
pub const EXIT_LOCK_UNAVAILABLE: i32 = 75;

/// Builds lock options from the config file, then flag/env overrides
pub fn resolve_options(args: &LockArgs) -> Result<LockOptions> {
    let mut options = match &args.config {
        Some(path) => Config::load(path)?.lock.to_options()?,
        None => LockOptions::default(),
    };

    if let Some(ms) = args.timeout_ms {
        options.timeout = Some(Duration::from_millis(ms));
    }
    if let Some(ms) = args.poll_ms {
        if ms == 0 {
            bail!("--poll-ms must be greater than 0");
        }
        options.poll_interval = Duration::from_millis(ms);
    }
    if let Some(n) = args.max_attempts {
        if n == 0 {
            bail!("--max-attempts must be at least 1");
        }
        options.max_attempts = Some(n);
    }

    log::debug!("lock options: {:?}", options);
    Ok(options)
}

/// Maps a command failure to the process exit status
pub fn exit_code(err: &anyhow::Error) -> i32 {
    let lock_error = err
        .downcast_ref::<LockError>()
        .or_else(|| {
            err.downcast_ref::<GuardError>()
                .and_then(GuardError::as_lock_error)
        })
        .or_else(|| {
            err.downcast_ref::<RlockError>()
                .and_then(RlockError::as_lock_error)
        });

    match lock_error {
        Some(e) if e.is_contended() => EXIT_LOCK_UNAVAILABLE,
        _ => 1,
    }
}
