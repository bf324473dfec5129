//! Output formatting utilities

use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use pix_core::TransactionStatus;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn format_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_amount(amount: f64) -> String {
    format!("R$ {:.2}", amount)
}

/// Status colored by where it sits in the lifecycle
pub fn status(status: TransactionStatus) -> ColoredString {
    match status {
        TransactionStatus::Pending => status.as_str().yellow(),
        TransactionStatus::Confirmed => status.as_str().cyan(),
        TransactionStatus::Completed => status.as_str().green(),
        TransactionStatus::Error => status.as_str().red(),
    }
}

/// Print a value as pretty JSON
pub fn json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
