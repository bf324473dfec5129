//! Pix CLI - instant transfers in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{account, bank, config, key, logs, tx};
use pix_core::{LogEvent, LoggingService};

/// Pix - instant transfers in your terminal
#[derive(Parser)]
#[command(name = "pix", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register banks
    Bank {
        #[command(subcommand)]
        command: bank::BankCommands,
    },

    /// Open and inspect accounts
    Account {
        #[command(subcommand)]
        command: account::AccountCommands,
    },

    /// Register and look up Pix keys
    Key {
        #[command(subcommand)]
        command: key::KeyCommands,
    },

    /// Create transfers and drive their lifecycle
    Tx {
        #[command(subcommand)]
        command: tx::TxCommands,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: Option<config::ConfigCommands>,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    /// Short name recorded in the event log
    fn name(&self) -> &'static str {
        match self {
            Commands::Bank { .. } => "bank",
            Commands::Account { .. } => "account",
            Commands::Key { .. } => "key",
            Commands::Tx { .. } => "tx",
            Commands::Config { .. } => "config",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let name = cli.command.name();

    let logger = commands::get_logger();
    commands::log_event(&logger, LogEvent::new("command_executed").with_command(name));

    match run(cli, logger.as_ref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::log_event(&logger, LogEvent::failure(name, &e));
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// `logger` is the process's only handle on logs.duckdb
fn run(cli: Cli, logger: Option<&LoggingService>) -> Result<()> {
    match cli.command {
        Commands::Bank { command } => bank::run(command),
        Commands::Account { command } => account::run(command),
        Commands::Key { command } => key::run(command),
        Commands::Tx { command } => tx::run(command),
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command, logger),
    }
}
