//! Account domain model

use serde::Serialize;
use uuid::Uuid;

use super::base::Base;
use super::bank::Bank;
use super::result::ValidationError;

/// A bank account owned by a person or company
///
/// Accounts are immutable once created. The bank reference is kept as an id
/// and is deliberately not required.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    #[serde(flatten)]
    base: Base,
    owner_name: String,
    number: i64,
    bank_id: Option<Uuid>,
}

impl Account {
    /// Create a new account with a fresh identity
    pub fn new(
        bank: Option<&Bank>,
        owner_name: impl Into<String>,
        number: i64,
    ) -> Result<Self, ValidationError> {
        let account = Self {
            base: Base::new(),
            owner_name: owner_name.into(),
            number,
            bank_id: bank.map(Bank::id),
        };
        account.validate()?;
        Ok(account)
    }

    /// Rebuild a stored account, re-checking its fields
    pub fn restore(
        base: Base,
        owner_name: String,
        number: i64,
        bank_id: Option<Uuid>,
    ) -> Result<Self, ValidationError> {
        let account = Self {
            base,
            owner_name,
            number,
            bank_id,
        };
        account.validate()?;
        Ok(account)
    }

    /// Validate account data
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.owner_name.is_empty() {
            return Err(ValidationError::EmptyOwnerName);
        }
        if self.number == 0 {
            return Err(ValidationError::MissingAccountNumber);
        }
        Ok(())
    }

    pub fn base(&self) -> &Base {
        &self.base
    }

    pub fn id(&self) -> Uuid {
        self.base.id()
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn number(&self) -> i64 {
        self.number
    }

    pub fn bank_id(&self) -> Option<Uuid> {
        self.bank_id
    }
}
