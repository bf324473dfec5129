//! Tx command - create transfers and move them through their lifecycle

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Input;

use super::{get_context, parse_id};
use crate::output;
use pix_core::Transaction;

#[derive(Subcommand)]
pub enum TxCommands {
    /// Create a pending transfer to a Pix key
    New {
        /// Source account id
        #[arg(long)]
        from: String,
        /// Destination key value
        #[arg(long)]
        to: String,
        /// Destination key kind: email or cpf
        #[arg(long, short)]
        kind: String,
        /// Amount to transfer
        #[arg(long, short)]
        amount: f64,
        /// What the transfer is for
        #[arg(long, short)]
        description: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a transfer
    Show {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a transfer as confirmed
    Confirm {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a transfer as completed
    Complete {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a transfer as failed
    Error {
        id: String,
        /// Why the transfer failed (prompted for when omitted)
        #[arg(long, short)]
        reason: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: TxCommands) -> Result<()> {
    let ctx = get_context()?;
    let service = &ctx.transaction_service;

    match command {
        TxCommands::New {
            from,
            to,
            kind,
            amount,
            description,
            json,
        } => {
            let account_id = parse_id(&from, "account")?;
            let tx = service.register(account_id, amount, &to, &kind, &description)?;
            if json {
                return output::json(&tx);
            }
            output::success(&format!(
                "Created transfer of {} to {}",
                output::format_amount(tx.amount()),
                to
            ));
            println!("  id: {}", tx.id());
        }
        TxCommands::Show { id, json } => {
            let tx = service.find(parse_id(&id, "transaction")?)?;
            if json {
                return output::json(&tx);
            }
            print_transaction(&tx);
        }
        TxCommands::Confirm { id, json } => {
            let tx = service.confirm(parse_id(&id, "transaction")?)?;
            report(&tx, json)?;
        }
        TxCommands::Complete { id, json } => {
            let tx = service.complete(parse_id(&id, "transaction")?)?;
            report(&tx, json)?;
        }
        TxCommands::Error { id, reason, json } => {
            let id = parse_id(&id, "transaction")?;
            let reason = match reason {
                Some(r) => r,
                None if json => bail!("--reason is required with --json"),
                None => Input::<String>::new()
                    .with_prompt("Reason for the failure")
                    .interact_text()?,
            };
            let tx = service.fail(id, &reason)?;
            report(&tx, json)?;
        }
    }

    Ok(())
}

fn report(tx: &Transaction, json: bool) -> Result<()> {
    if json {
        return output::json(tx);
    }
    println!("Transfer {} is now {}", tx.id(), output::status(tx.status()));
    Ok(())
}

fn print_transaction(tx: &Transaction) {
    println!("{} {}", "Transfer".bold(), tx.id());
    println!("  Status: {}", output::status(tx.status()));
    println!("  Amount: {}", output::format_amount(tx.amount()));
    println!("  Description: {}", tx.description());
    println!("  From account: {}", tx.account_from_id());
    println!("  To account: {}", tx.account_to_id());
    println!("  To key: {}", tx.pix_key_to_id());
    if !tx.cancel_description().is_empty() {
        println!("  Failure: {}", tx.cancel_description().red());
    }
    println!("  Created: {}", output::format_time(tx.base().created_at()));
    println!("  Updated: {}", output::format_time(tx.base().updated_at()));
}
