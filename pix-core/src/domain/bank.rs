//! Bank domain model

use serde::Serialize;

use super::base::Base;
use super::result::ValidationError;

/// A financial institution that holds accounts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bank {
    #[serde(flatten)]
    base: Base,
    code: String,
    name: String,
}

impl Bank {
    /// Create a bank with a fresh identity
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Result<Self, ValidationError> {
        let bank = Self {
            base: Base::new(),
            code: code.into(),
            name: name.into(),
        };
        bank.validate()?;
        Ok(bank)
    }

    /// Rebuild a stored bank, re-checking its fields
    pub fn restore(base: Base, code: String, name: String) -> Result<Self, ValidationError> {
        let bank = Self { base, code, name };
        bank.validate()?;
        Ok(bank)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.is_empty() {
            return Err(ValidationError::EmptyBankCode);
        }
        if self.name.is_empty() {
            return Err(ValidationError::EmptyBankName);
        }
        Ok(())
    }

    pub fn base(&self) -> &Base {
        &self.base
    }

    pub fn id(&self) -> uuid::Uuid {
        self.base.id()
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_validation() {
        assert!(Bank::new("001", "Banco do Brasil").is_ok());
        assert_eq!(Bank::new("", "Banco").unwrap_err(), ValidationError::EmptyBankCode);
        assert_eq!(Bank::new("001", "").unwrap_err(), ValidationError::EmptyBankName);
    }

    #[test]
    fn test_whitespace_name_is_present() {
        assert!(Bank::new("001", "  ").is_ok());
    }
}
