//! Pix key domain model

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use uuid::Uuid;

use super::account::Account;
use super::base::Base;
use super::result::ValidationError;

/// Kind of alias a key carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PixKeyKind {
    Email,
    Cpf,
}

impl PixKeyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PixKeyKind::Email => "email",
            PixKeyKind::Cpf => "cpf",
        }
    }
}

impl fmt::Display for PixKeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PixKeyKind {
    type Err = ValidationError;

    /// Only the exact lowercase names are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(PixKeyKind::Email),
            "cpf" => Ok(PixKeyKind::Cpf),
            other => Err(ValidationError::InvalidPixKeyKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PixKeyStatus {
    Active,
    Inactive,
}

impl PixKeyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PixKeyStatus::Active => "active",
            PixKeyStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for PixKeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PixKeyStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PixKeyStatus::Active),
            "inactive" => Ok(PixKeyStatus::Inactive),
            other => Err(ValidationError::InvalidPixKeyStatus(other.to_string())),
        }
    }
}

/// An alias that resolves to exactly one account
///
/// The owning account is held by id only; `account_id` is copied from the
/// account at creation and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixKey {
    #[serde(flatten)]
    base: Base,
    kind: PixKeyKind,
    key: String,
    status: PixKeyStatus,
    account_id: Uuid,
}

impl PixKey {
    /// Bind a new active key to `account`
    pub fn new(account: &Account, key: impl Into<String>, kind: &str) -> Result<Self, ValidationError> {
        let kind = kind.parse::<PixKeyKind>()?;
        let pix_key = Self {
            base: Base::new(),
            kind,
            key: key.into(),
            status: PixKeyStatus::Active,
            account_id: account.id(),
        };
        pix_key.validate()?;
        Ok(pix_key)
    }

    /// Rebuild a stored key from its textual columns
    pub fn restore(
        base: Base,
        kind: &str,
        key: String,
        status: &str,
        account_id: Uuid,
    ) -> Result<Self, ValidationError> {
        let pix_key = Self {
            base,
            kind: kind.parse()?,
            key,
            status: status.parse()?,
            account_id,
        };
        pix_key.validate()?;
        Ok(pix_key)
    }

    /// Check the fields that the enums do not already guarantee
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key.is_empty() {
            return Err(ValidationError::EmptyKey);
        }
        Ok(())
    }

    /// Whether this key resolves to `account`
    pub fn resolves_to(&self, account: &Account) -> bool {
        self.account_id == account.id()
    }

    pub fn base(&self) -> &Base {
        &self.base
    }

    pub fn id(&self) -> Uuid {
        self.base.id()
    }

    pub fn kind(&self) -> PixKeyKind {
        self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn status(&self) -> PixKeyStatus {
        self.status
    }

    pub fn account_id(&self) -> Uuid {
        self.account_id
    }
}
