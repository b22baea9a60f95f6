//! CLI command structure using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rlock")]
#[command(version, about = "Cross-process advisory file locks", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Waiting policy shared by every command that takes the lock
#[derive(Args, Debug, Clone, Default)]
pub struct LockArgs {
    /// Give up after this many milliseconds (default: wait forever)
    #[arg(long, env = "RLOCK_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Delay between attempts in milliseconds
    #[arg(long, env = "RLOCK_POLL_MS")]
    pub poll_ms: Option<u64>,

    /// Give up after this many attempts
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// TOML file with a [lock] table
    #[arg(long, env = "RLOCK_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a command while holding the lock for a path
    #[command(trailing_var_arg = true)]
    Run {
        /// Protected path (the lock lives in <path>.lock)
        path: PathBuf,

        #[command(flatten)]
        lock: LockArgs,

        /// Command and arguments to run (after --)
        #[arg(required = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Append text to a file under its lock
    Append {
        path: PathBuf,

        text: String,

        /// Do not add a trailing newline
        #[arg(short = 'n', long)]
        no_newline: bool,

        #[command(flatten)]
        lock: LockArgs,
    },

    /// Show whether a path is locked and by whom
    Status {
        path: PathBuf,

        #[arg(long)]
        json: bool,
    },
}
