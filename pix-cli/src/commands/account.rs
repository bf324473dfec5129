//! Account command - open accounts and list their transfers

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::{get_context, parse_id};
use crate::output;

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Open an account
    Open {
        /// Owner's name
        owner: String,
        /// Account number
        number: i64,
        /// Bank the account belongs to
        #[arg(long)]
        bank: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show an account and the transfers it sent
    Show {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: AccountCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        AccountCommands::Open {
            owner,
            number,
            bank,
            json,
        } => {
            let bank_id = bank.as_deref().map(|b| parse_id(b, "bank")).transpose()?;
            let account = ctx.pix_key_service.open_account(bank_id, &owner, number)?;
            if json {
                return output::json(&account);
            }
            output::success(&format!(
                "Opened account {} for {}",
                account.number(),
                account.owner_name()
            ));
            println!("  id: {}", account.id());
        }
        AccountCommands::Show { id, json } => {
            let account = ctx.pix_key_service.find_account(parse_id(&id, "account")?)?;
            let transactions = ctx.repository.get_transactions_by_account(account.id())?;

            if json {
                return output::json(&serde_json::json!({
                    "account": account,
                    "transactions": transactions,
                }));
            }

            println!("{}", account.owner_name().bold());
            println!("  Number: {}", account.number());
            if let Some(bank_id) = account.bank_id() {
                match ctx.pix_key_service.find_bank(bank_id) {
                    Ok(bank) => println!("  Bank: {} ({})", bank.name(), bank.code()),
                    Err(_) => println!("  Bank: {}", bank_id),
                }
            }
            println!("  Opened: {}", output::format_time(account.base().created_at()));
            println!();

            if transactions.is_empty() {
                println!("No transfers sent from this account.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Id", "Amount", "Status", "Description", "Created"]);
            for tx in &transactions {
                table.add_row(vec![
                    tx.id().to_string(),
                    output::format_amount(tx.amount()),
                    output::status(tx.status()).to_string(),
                    tx.description().to_string(),
                    output::format_time(tx.base().created_at()),
                ]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}
