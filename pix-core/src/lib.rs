//! Pix Core - domain logic for instant Pix transfers
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: Core entities (Bank, Account, PixKey, Transaction) and their invariants
//! - **ports**: Repository traits the services depend on
//! - **services**: Use-case orchestration over the ports
//! - **adapters**: Concrete implementations (DuckDB)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbRepository;
use config::Config;
use services::{PixKeyService, TransactionService};

// Re-export commonly used types at crate root
pub use domain::{
    Account, Bank, Error, PixKey, PixKeyKind, PixKeyStatus, Transaction, TransactionStatus,
    TransitionPolicy, ValidationError,
};
pub use services::{LogEntry, LogEvent, LoggingService};

/// Main context for Pix operations
///
/// Opens the database in a data directory, applies migrations and wires
/// the services to it.
pub struct PixContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub pix_key_service: PixKeyService,
    pub transaction_service: TransactionService,
}

impl PixContext {
    pub fn new(pix_dir: &Path) -> Result<Self> {
        Self::with_config(pix_dir, Config::load(pix_dir)?)
    }

    /// Open the context with an already loaded config
    pub fn with_config(pix_dir: &Path, config: Config) -> Result<Self> {
        let db_path = pix_dir.join(&config.database_file);
        let repository = Arc::new(DuckDbRepository::new(&db_path)?);
        repository.ensure_schema()?;

        let pix_key_service = PixKeyService::new(repository.clone());
        let transaction_service = TransactionService::new(
            repository.clone(),
            repository.clone(),
            config.transition_policy(),
        );

        Ok(Self {
            config,
            repository,
            pix_key_service,
            transaction_service,
        })
    }
}
