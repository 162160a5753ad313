pub mod args;
mod commands;
pub mod output;

use clap::Parser;

pub use args::{Cli, Command, ConfigAction, ProjectArgs};

use crate::{config::ConfigManager, errors::Result};

/// Parses the process arguments and runs the chosen command.
pub fn run_cli() -> Result<()> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<()> {
    let manager = ConfigManager::new()?;
    tracing::debug!(config = %manager.path().display(), "configuration resolved");
    match cli.command {
        Command::Project(args) => commands::project(&manager, args),
        Command::Holidays {
            year,
            country,
            provider,
        } => commands::holidays(&manager, year, country, provider),
        Command::Config { action } => commands::config(&manager, action),
    }
}
