//! Key command - register and resolve Pix keys

use anyhow::Result;
use clap::Subcommand;

use super::{get_context, parse_id};
use crate::output;

#[derive(Subcommand)]
pub enum KeyCommands {
    /// Bind a key to an account
    Register {
        /// Key value (an email address or CPF)
        key: String,
        /// Key kind: email or cpf
        #[arg(long, short)]
        kind: String,
        /// Account that will receive transfers to this key
        #[arg(long)]
        account: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve a key to its account
    Find {
        key: String,
        /// Key kind: email or cpf
        #[arg(long, short)]
        kind: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: KeyCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        KeyCommands::Register {
            key,
            kind,
            account,
            json,
        } => {
            let account_id = parse_id(&account, "account")?;
            let pix_key = ctx.pix_key_service.register_key(&key, &kind, account_id)?;
            if json {
                return output::json(&pix_key);
            }
            output::success(&format!("Registered {} key {}", pix_key.kind(), pix_key.key()));
            println!("  id: {}", pix_key.id());
        }
        KeyCommands::Find { key, kind, json } => {
            let pix_key = ctx.pix_key_service.find_key(&key, &kind)?;
            let account = ctx.pix_key_service.find_account(pix_key.account_id())?;
            if json {
                return output::json(&serde_json::json!({
                    "key": pix_key,
                    "account": account,
                }));
            }

            let mut table = output::create_table();
            table.set_header(vec!["Key", "Kind", "Status", "Owner", "Account"]);
            table.add_row(vec![
                pix_key.key().to_string(),
                pix_key.kind().to_string(),
                pix_key.status().to_string(),
                account.owner_name().to_string(),
                account.number().to_string(),
            ]);
            println!("{}", table);
        }
    }

    Ok(())
}
