//! CLI command implementations

pub mod account;
pub mod bank;
pub mod config;
pub mod key;
pub mod logs;
pub mod tx;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use pix_core::{LogEvent, LoggingService, PixContext};
use uuid::Uuid;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let pix_dir = get_pix_dir().ok()?;
    std::fs::create_dir_all(&pix_dir).ok()?;
    LoggingService::new(&pix_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the data directory from `PIX_DIR` or default to `~/.pix`
pub fn get_pix_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("PIX_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".pix"))
        .ok_or_else(|| anyhow!("Could not find home directory; set PIX_DIR"))
}

/// Open the context, creating the data directory on first use
pub fn get_context() -> Result<PixContext> {
    let pix_dir = get_pix_dir()?;

    std::fs::create_dir_all(&pix_dir)
        .with_context(|| format!("Failed to create pix directory: {:?}", pix_dir))?;

    PixContext::new(&pix_dir).context("Failed to initialize pix context")
}

/// Parse an id argument with a readable error
pub fn parse_id(value: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim()).with_context(|| format!("Invalid {} id: {}", what, value))
}
