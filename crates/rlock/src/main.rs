mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Commands::Run {
            path,
            lock,
            command,
        } => commands::run::run(path, &lock, command),
        Commands::Append {
            path,
            text,
            no_newline,
            lock,
        } => commands::append::run(path, text, no_newline, &lock),
        Commands::Status { path, json } => commands::status::run(path, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(commands::exit_code(&e));
    }
}
