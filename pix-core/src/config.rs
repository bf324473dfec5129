//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "app": { "strictTransitions": false, "databaseFile": "pix.duckdb" }
//! }
//! ```
//! Keys this crate does not manage are preserved when saving.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::TransitionPolicy;

const SETTINGS_FILE: &str = "settings.json";
const DEFAULT_DATABASE_FILE: &str = "pix.duckdb";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    strict_transitions: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    database_file: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Reject transitions outside pending -> confirmed -> completed / error
    pub strict_transitions: bool,
    /// Database file name inside the data directory
    pub database_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict_transitions: false,
            database_file: DEFAULT_DATABASE_FILE.to_string(),
        }
    }
}

/// Environment variable that overrides `strictTransitions`
pub const STRICT_TRANSITIONS_ENV: &str = "PIX_STRICT_TRANSITIONS";

/// Parse a boolean override; anything unrecognised is ignored
fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" | "1" | "yes" | "TRUE" | "YES" => Some(true),
        "false" | "0" | "no" | "FALSE" | "NO" => Some(false),
        _ => None,
    }
}

fn read_settings(pix_dir: &Path) -> Result<SettingsFile> {
    let settings_path = pix_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

impl Config {
    /// Load config from the data directory
    ///
    /// `PIX_STRICT_TRANSITIONS` overrides the stored flag.
    pub fn load(pix_dir: &Path) -> Result<Self> {
        let strict_override = std::env::var(STRICT_TRANSITIONS_ENV)
            .ok()
            .as_deref()
            .and_then(parse_flag);
        Self::load_with_override(pix_dir, strict_override)
    }

    /// Load config, taking the strict flag from `strict_override` when set
    pub fn load_with_override(pix_dir: &Path, strict_override: Option<bool>) -> Result<Self> {
        let raw = read_settings(pix_dir)?;

        let strict_transitions = strict_override.unwrap_or(raw.app.strict_transitions);

        Ok(Self {
            strict_transitions,
            database_file: raw
                .app
                .database_file
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DATABASE_FILE.to_string()),
        })
    }

    /// Save config, keeping settings this crate doesn't manage
    pub fn save(&self, pix_dir: &Path) -> Result<()> {
        let mut settings = read_settings(pix_dir)?;

        settings.app.strict_transitions = self.strict_transitions;
        settings.app.database_file = if self.database_file == DEFAULT_DATABASE_FILE {
            None
        } else {
            Some(self.database_file.clone())
        };

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(pix_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    pub fn transition_policy(&self) -> TransitionPolicy {
        if self.strict_transitions {
            TransitionPolicy::Strict
        } else {
            TransitionPolicy::Permissive
        }
    }
}
