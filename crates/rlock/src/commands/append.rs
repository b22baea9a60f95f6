//! Append command - locked append of a line of text

use crate::cli::LockArgs;
use anyhow::Result;
use rlock_core::guard::{OpenMode, with_lock};
use std::io::Write;
use std::path::PathBuf;

/// Execute `rlock append <path> <text>`
pub fn run(path: PathBuf, text: String, no_newline: bool, lock_args: &LockArgs) -> Result<()> {
    let options = super::resolve_options(lock_args)?;

    with_lock(&path, OpenMode::Append, &options, |file| {
        file.write_all(text.as_bytes())?;
        if !no_newline {
            file.write_all(b"\n")?;
        }
        Ok::<_, anyhow::Error>(())
    })?;

    log::debug!("appended {} bytes to {}", text.len(), path.display());
    Ok(())
}
