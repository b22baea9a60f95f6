//! Run command - execute a program while holding the lock

use crate::cli::LockArgs;
use anyhow::{Context, Result, bail};
use log::debug;
use rlock_core::lock;
use std::path::PathBuf;
use std::process::Command;

/// Execute `rlock run <path> -- <command>...`
///
/// # Exit Code
///
/// Exits with the child's exit code. The lock is released before exiting.
pub fn run(path: PathBuf, lock_args: &LockArgs, command: Vec<String>) -> Result<()> {
    let options = super::resolve_options(lock_args)?;
    let Some((program, args)) = command.split_first() else {
        bail!("no command given");
    };

    let mut handle = lock::acquire(&path, &options)?;
    debug!("holding {} as {}", handle.lock_path().display(), handle.token());

    let status = Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("failed to run '{}'", program));

    // Release before exiting; process::exit skips destructors
    handle.release()?;
    let status = status?;

    match status.code() {
        Some(0) => Ok(()),
        Some(code) => std::process::exit(code),
        None => bail!("'{}' was terminated by a signal", program),
    }
}
