//! Bank command - register and inspect banks

use anyhow::Result;
use clap::Subcommand;

use super::{get_context, parse_id};
use crate::output;

#[derive(Subcommand)]
pub enum BankCommands {
    /// Register a bank
    Add {
        /// Bank code (e.g. 001)
        code: String,
        /// Bank name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a bank by id
    Show {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: BankCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        BankCommands::Add { code, name, json } => {
            let bank = ctx.pix_key_service.add_bank(&code, &name)?;
            if json {
                return output::json(&bank);
            }
            output::success(&format!("Registered bank {} ({})", bank.name(), bank.code()));
            println!("  id: {}", bank.id());
        }
        BankCommands::Show { id, json } => {
            let bank = ctx.pix_key_service.find_bank(parse_id(&id, "bank")?)?;
            if json {
                return output::json(&bank);
            }
            let mut table = output::create_table();
            table.set_header(vec!["Id", "Code", "Name", "Created"]);
            table.add_row(vec![
                bank.id().to_string(),
                bank.code().to_string(),
                bank.name().to_string(),
                output::format_time(bank.base().created_at()),
            ]);
            println!("{}", table);
        }
    }

    Ok(())
}
