//! Result and error types for the core library

use thiserror::Error;

/// A field-level rule that an entity failed to satisfy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("bank code cannot be empty")]
    EmptyBankCode,

    #[error("bank name cannot be empty")]
    EmptyBankName,

    #[error("owner name cannot be empty")]
    EmptyOwnerName,

    #[error("account number is required")]
    MissingAccountNumber,

    #[error("invalid pixkey kind: {0}")]
    InvalidPixKeyKind(String),

    #[error("invalid pixkey status: {0}")]
    InvalidPixKeyStatus(String),

    #[error("pix key cannot be empty")]
    EmptyKey,

    #[error("pix key {kind} '{key}' is already registered")]
    DuplicateKey { kind: String, key: String },

    #[error("the amount must be greater than 0")]
    NonPositiveAmount(f64),

    #[error("invalid transaction status: {0}")]
    InvalidTransactionStatus(String),

    #[error("the source and destination can't be the same")]
    SameSourceAndDestination,

    #[error("description cannot be empty")]
    EmptyDescription,

    #[error("transaction cannot move from {from} to {to}")]
    IllegalTransition { from: String, to: String },
}

impl ValidationError {
    /// Stable rule name, free of the values that broke it
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyBankCode => "empty_bank_code",
            Self::EmptyBankName => "empty_bank_name",
            Self::EmptyOwnerName => "empty_owner_name",
            Self::MissingAccountNumber => "missing_account_number",
            Self::InvalidPixKeyKind(_) => "invalid_pix_key_kind",
            Self::InvalidPixKeyStatus(_) => "invalid_pix_key_status",
            Self::EmptyKey => "empty_key",
            Self::DuplicateKey { .. } => "duplicate_key",
            Self::NonPositiveAmount(_) => "non_positive_amount",
            Self::InvalidTransactionStatus(_) => "invalid_transaction_status",
            Self::SameSourceAndDestination => "same_source_and_destination",
            Self::EmptyDescription => "empty_description",
            Self::IllegalTransition { .. } => "illegal_transition",
        }
    }
}

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// The validation failure behind this error, if any
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }

    /// Error category, free of any message text
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Database(_) => "database",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Other(_) => "other",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<duckdb::Error> for Error {
    fn from(e: duckdb::Error) -> Self {
        Self::Database(e.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
