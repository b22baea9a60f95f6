//! Status command - show whether a path is locked

use anyhow::Result;
use colored::Colorize;
use rlock_core::lock::{self, LockInfo, lock_path_for};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Show lock status for `path`
///
/// # Exit Code
///
/// Always exits with code 0 when the probe succeeds, locked or not.
pub fn run(path: PathBuf, json: bool) -> Result<()> {
    let locked = lock::is_locked(&path)?;
    // A record left by a killed holder is stale; only trust it while locked
    let holder = if locked {
        lock::read_holder(&path)?
    } else {
        None
    };

    if json {
        render_json(&path, locked, holder.as_ref())?;
    } else {
        render_human(&path, locked, holder.as_ref());
    }

    Ok(())
}

fn render_json(path: &Path, locked: bool, holder: Option<&LockInfo>) -> Result<()> {
    let output = json!({
        "path": path.display().to_string(),
        "lock_path": lock_path_for(path).display().to_string(),
        "locked": locked,
        "holder": holder,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn render_human(path: &Path, locked: bool, holder: Option<&LockInfo>) {
    if !locked {
        println!("{} {} is not locked", "✓".green(), path.display());
        return;
    }

    println!("{} {} is locked", "●".yellow(), path.display());
    match holder {
        Some(info) => {
            println!("  {} {}", "pid:".dimmed(), info.pid);
            println!("  {} {}", "host:".dimmed(), info.host);
            println!("  {} {}", "since:".dimmed(), info.acquired_at.to_rfc3339());
        }
        None => println!("  {}", "holder unknown".dimmed()),
    }
}
