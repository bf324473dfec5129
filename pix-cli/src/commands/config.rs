//! Config command - show and change settings

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use colored::Colorize;

use super::get_pix_dir;
use crate::output;
use pix_core::config::{Config, STRICT_TRANSITIONS_ENV};

#[derive(Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reject transitions outside pending -> confirmed -> completed / error
    Strict { value: Toggle },
}

pub fn run(command: Option<ConfigCommands>) -> Result<()> {
    let pix_dir = get_pix_dir()?;
    std::fs::create_dir_all(&pix_dir)?;
    let mut config = Config::load(&pix_dir)?;

    match command.unwrap_or(ConfigCommands::Show { json: false }) {
        ConfigCommands::Show { json } => {
            if json {
                return output::json(&serde_json::json!({
                    "pix_dir": pix_dir.to_string_lossy(),
                    "database_file": config.database_file,
                    "strict_transitions": config.strict_transitions,
                }));
            }
            println!("{}", "Settings".bold());
            println!("  Data directory: {}", pix_dir.display());
            println!("  Database: {}", config.database_file);
            println!(
                "  Transitions: {}",
                if config.strict_transitions { "strict" } else { "permissive" }
            );
        }
        ConfigCommands::Strict { value } => {
            config.strict_transitions = matches!(value, Toggle::On);
            config.save(&pix_dir)?;
            if std::env::var(STRICT_TRANSITIONS_ENV).is_ok() {
                output::warning(&format!(
                    "{} is set and overrides this setting",
                    STRICT_TRANSITIONS_ENV
                ));
            }
            output::success(&format!(
                "Strict transitions {}",
                if config.strict_transitions { "enabled" } else { "disabled" }
            ));
        }
    }

    Ok(())
}
