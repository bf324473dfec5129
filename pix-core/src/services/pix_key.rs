//! Pix key service - banks, accounts and key registration

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{Account, Bank, PixKey, PixKeyKind};
use crate::ports::PixKeyRepository;

/// Registers banks, accounts and the keys that resolve to them
pub struct PixKeyService {
    repository: Arc<dyn PixKeyRepository>,
}

impl PixKeyService {
    pub fn new(repository: Arc<dyn PixKeyRepository>) -> Self {
        Self { repository }
    }

    pub fn add_bank(&self, code: &str, name: &str) -> Result<Bank> {
        let bank = Bank::new(code, name)?;
        self.repository.add_bank(&bank)?;
        Ok(bank)
    }

    /// Open an account, optionally at a bank that must already exist
    pub fn open_account(
        &self,
        bank_id: Option<Uuid>,
        owner_name: &str,
        number: i64,
    ) -> Result<Account> {
        let bank = bank_id
            .map(|id| self.repository.find_bank(id))
            .transpose()?;

        let account = Account::new(bank.as_ref(), owner_name, number)?;
        self.repository.add_account(&account)?;
        Ok(account)
    }

    /// Bind a new key to an existing account
    ///
    /// The account is looked up first; duplicates are rejected by the store.
    pub fn register_key(&self, key: &str, kind: &str, account_id: Uuid) -> Result<PixKey> {
        let account = self.repository.find_account(account_id)?;
        let pix_key = PixKey::new(&account, key, kind)?;
        self.repository.register_key(&pix_key)
    }

    pub fn find_key(&self, key: &str, kind: &str) -> Result<PixKey> {
        let kind: PixKeyKind = kind.parse()?;
        self.repository.find_key_by_kind(key, kind)
    }

    pub fn find_account(&self, id: Uuid) -> Result<Account> {
        self.repository.find_account(id)
    }

    pub fn find_bank(&self, id: Uuid) -> Result<Bank> {
        self.repository.find_bank(id)
    }
}
