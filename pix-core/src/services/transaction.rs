//! Transaction service - create transfers and drive their lifecycle

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{PixKeyKind, Transaction, TransactionStatus, TransitionPolicy};
use crate::ports::{PixKeyRepository, TransactionRepository};

/// Creates transfers and applies state transitions under a policy
pub struct TransactionService {
    transactions: Arc<dyn TransactionRepository>,
    keys: Arc<dyn PixKeyRepository>,
    policy: TransitionPolicy,
}

impl TransactionService {
    pub fn new(
        transactions: Arc<dyn TransactionRepository>,
        keys: Arc<dyn PixKeyRepository>,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            transactions,
            keys,
            policy,
        }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Create and store a pending transfer to whoever owns `key`
    pub fn register(
        &self,
        account_id: Uuid,
        amount: f64,
        key: &str,
        kind: &str,
        description: &str,
    ) -> Result<Transaction> {
        let kind: PixKeyKind = kind.parse()?;
        let account_from = self.keys.find_account(account_id)?;
        let pix_key_to = self.keys.find_key_by_kind(key, kind)?;

        let transaction = Transaction::new(&account_from, &pix_key_to, amount, description)?;
        self.transactions.register(&transaction)?;
        Ok(transaction)
    }

    pub fn find(&self, id: Uuid) -> Result<Transaction> {
        self.transactions.find(id)
    }

    pub fn confirm(&self, id: Uuid) -> Result<Transaction> {
        self.transition(id, TransactionStatus::Confirmed, None)
    }

    pub fn complete(&self, id: Uuid) -> Result<Transaction> {
        self.transition(id, TransactionStatus::Completed, None)
    }

    /// Move a transfer to `error`, recording `reason`
    pub fn fail(&self, id: Uuid, reason: &str) -> Result<Transaction> {
        self.transition(id, TransactionStatus::Error, Some(reason.to_string()))
    }

    /// Load, transition and save; nothing is written when the transition fails
    fn transition(
        &self,
        id: Uuid,
        next: TransactionStatus,
        reason: Option<String>,
    ) -> Result<Transaction> {
        let mut transaction = self.transactions.find(id)?;
        transaction.transition_with(self.policy, next, reason)?;
        self.transactions.save(&transaction)?;
        Ok(transaction)
    }
}
