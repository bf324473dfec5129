//! Transaction domain model
//!
//! A transfer from one account to the account behind a Pix key. Transfers
//! start `pending` and are driven through `confirmed` and `completed`, or into
//! `error`, by the caller. Every transition re-validates the whole entity and
//! is only committed when that validation passes.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use uuid::Uuid;

use super::account::Account;
use super::base::Base;
use super::pix_key::PixKey;
use super::result::ValidationError;

/// Lifecycle state of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Completed,
    Error,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Confirmed => "confirmed",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Error => "error",
        }
    }

    /// No further transition is expected out of these states
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Completed | TransactionStatus::Error)
    }

    /// Whether `next` is an intended move from this state
    ///
    /// pending -> confirmed | error, confirmed -> completed | error.
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        use TransactionStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Error) | (Confirmed, Completed) | (Confirmed, Error)
        )
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "confirmed" => Ok(TransactionStatus::Confirmed),
            "completed" => Ok(TransactionStatus::Completed),
            "error" => Ok(TransactionStatus::Error),
            other => Err(ValidationError::InvalidTransactionStatus(other.to_string())),
        }
    }
}

/// How transitions treat moves outside the intended table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Any state may move to any state; only field invariants are checked
    #[default]
    Permissive,
    /// Only moves allowed by [`TransactionStatus::can_transition_to`]
    Strict,
}

/// A monetary transfer between two distinct accounts
///
/// Source account and destination key are held by id. The destination
/// account id is copied from the key at creation so the self-transfer rule
/// can be checked without looking anything up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    #[serde(flatten)]
    base: Base,
    status: TransactionStatus,
    amount: f64,
    description: String,
    cancel_description: String,
    account_from_id: Uuid,
    pix_key_to_id: Uuid,
    account_to_id: Uuid,
}

impl Transaction {
    /// Create a pending transfer from `account_from` to the owner of `pix_key_to`
    pub fn new(
        account_from: &Account,
        pix_key_to: &PixKey,
        amount: f64,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let transaction = Self {
            base: Base::new(),
            status: TransactionStatus::Pending,
            amount,
            description: description.into(),
            cancel_description: String::new(),
            account_from_id: account_from.id(),
            pix_key_to_id: pix_key_to.id(),
            account_to_id: pix_key_to.account_id(),
        };
        transaction.validate()?;
        Ok(transaction)
    }

    /// Rebuild a stored transaction, re-checking every invariant
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        base: Base,
        status: &str,
        amount: f64,
        description: String,
        cancel_description: String,
        account_from_id: Uuid,
        pix_key_to_id: Uuid,
        account_to_id: Uuid,
    ) -> Result<Self, ValidationError> {
        let transaction = Self {
            base,
            status: status.parse()?,
            amount,
            description,
            cancel_description,
            account_from_id,
            pix_key_to_id,
            account_to_id,
        };
        transaction.validate()?;
        Ok(transaction)
    }

    /// Check all invariants, in order: amount, status, distinct accounts, description
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }
        // Status is an enum; unknown text is rejected when parsed in `restore`.
        if self.account_to_id == self.account_from_id {
            return Err(ValidationError::SameSourceAndDestination);
        }
        if self.description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(())
    }

    pub fn confirm(&mut self) -> Result<(), ValidationError> {
        self.transition_with(TransitionPolicy::Permissive, TransactionStatus::Confirmed, None)
    }

    pub fn complete(&mut self) -> Result<(), ValidationError> {
        self.transition_with(TransitionPolicy::Permissive, TransactionStatus::Completed, None)
    }

    /// Move to `error`, recording why
    pub fn error(&mut self, description: impl Into<String>) -> Result<(), ValidationError> {
        self.transition_with(
            TransitionPolicy::Permissive,
            TransactionStatus::Error,
            Some(description.into()),
        )
    }

    /// Apply a status change under `policy`
    ///
    /// The prospective state is validated before it replaces `self`, so a
    /// failed transition leaves the transaction exactly as it was.
    pub fn transition_with(
        &mut self,
        policy: TransitionPolicy,
        next: TransactionStatus,
        cancel_description: Option<String>,
    ) -> Result<(), ValidationError> {
        if policy == TransitionPolicy::Strict && !self.status.can_transition_to(next) {
            return Err(ValidationError::IllegalTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }

        let mut prospective = self.clone();
        prospective.status = next;
        if let Some(reason) = cancel_description {
            prospective.cancel_description = reason;
        }
        prospective.base.touch();
        prospective.validate()?;

        *self = prospective;
        Ok(())
    }

    pub fn base(&self) -> &Base {
        &self.base
    }

    pub fn id(&self) -> Uuid {
        self.base.id()
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn cancel_description(&self) -> &str {
        &self.cancel_description
    }

    pub fn account_from_id(&self) -> Uuid {
        self.account_from_id
    }

    pub fn pix_key_to_id(&self) -> Uuid {
        self.pix_key_to_id
    }

    pub fn account_to_id(&self) -> Uuid {
        self.account_to_id
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;

    struct Fixture {
        alice: Account,
        bob: Account,
        alice_key: PixKey,
    }

    fn fixture() -> Fixture {
        let alice = Account::new(None, "Alice", 123).unwrap();
        let bob = Account::new(None, "Bob", 456).unwrap();
        let alice_key = PixKey::new(&alice, "alice@example.com", "email").unwrap();
        Fixture {
            alice,
            bob,
            alice_key,
        }
    }

    #[test]
    fn test_new_transaction_is_pending() {
        let f = fixture();
        let tx = Transaction::new(&f.bob, &f.alice_key, 100.0, "payment").unwrap();

        assert_eq!(tx.status(), TransactionStatus::Pending);
        assert_eq!(tx.cancel_description(), "");
        assert_eq!(tx.account_from_id(), f.bob.id());
        assert_eq!(tx.account_to_id(), f.alice.id());
        assert_eq!(tx.pix_key_to_id(), f.alice_key.id());
    }

    #[test]
    fn test_non_positive_amount_is_rejected() {
        let f = fixture();
        for amount in [0.0, -0.0, -1.0, -100.5, f64::NAN, f64::NEG_INFINITY, f64::INFINITY] {
            let err = Transaction::new(&f.bob, &f.alice_key, amount, "payment").unwrap_err();
            assert!(matches!(err, ValidationError::NonPositiveAmount(_)), "amount {}", amount);
        }
    }

    #[test]
    fn test_self_transfer_is_rejected() {
        let f = fixture();
        let err = Transaction::new(&f.alice, &f.alice_key, 100.0, "payment").unwrap_err();
        assert_eq!(err, ValidationError::SameSourceAndDestination);
    }

    #[test]
    fn test_amount_is_checked_before_self_transfer() {
        let f = fixture();
        let err = Transaction::new(&f.alice, &f.alice_key, 0.0, "x").unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveAmount(0.0));
    }

    #[test]
    fn test_self_transfer_is_checked_before_description() {
        let f = fixture();
        let err = Transaction::new(&f.alice, &f.alice_key, 10.0, "").unwrap_err();
        assert_eq!(err, ValidationError::SameSourceAndDestination);
    }

    #[test]
    fn test_empty_description_is_rejected() {
        let f = fixture();
        let err = Transaction::new(&f.bob, &f.alice_key, 10.0, "").unwrap_err();
        assert_eq!(err, ValidationError::EmptyDescription);
    }

    #[test]
    fn test_whitespace_description_is_present() {
        let f = fixture();
        let tx = Transaction::new(&f.bob, &f.alice_key, 10.0, " ").unwrap();
        assert_eq!(tx.description(), " ");
    }

    #[test]
    fn test_full_lifecycle_without_guards() {
        let f = fixture();
        let mut tx = Transaction::new(&f.bob, &f.alice_key, 100.0, "payment").unwrap();

        tx.confirm().unwrap();
        assert_eq!(tx.status(), TransactionStatus::Confirmed);

        tx.complete().unwrap();
        assert_eq!(tx.status(), TransactionStatus::Completed);

        tx.error("too late").unwrap();
        assert_eq!(tx.status(), TransactionStatus::Error);
        assert_eq!(tx.cancel_description(), "too late");
    }

    #[test]
    fn test_complete_directly_from_pending() {
        let f = fixture();
        let mut tx = Transaction::new(&f.bob, &f.alice_key, 1.0, "payment").unwrap();
        tx.complete().unwrap();
        assert_eq!(tx.status(), TransactionStatus::Completed);
    }

    #[test]
    fn test_confirm_twice_advances_updated_at() {
        let f = fixture();
        let mut tx = Transaction::new(&f.bob, &f.alice_key, 100.0, "payment").unwrap();
        let created_at = tx.base().created_at();

        tx.confirm().unwrap();
        let first = tx.base().updated_at();
        thread::sleep(Duration::from_millis(5));
        tx.confirm().unwrap();

        assert_eq!(tx.status(), TransactionStatus::Confirmed);
        assert!(tx.base().updated_at() > first);
        assert_eq!(tx.base().created_at(), created_at);
    }

    #[test]
    fn test_failed_transition_leaves_state_untouched() {
        let f = fixture();
        let tx = Transaction::new(&f.bob, &f.alice_key, 100.0, "payment").unwrap();

        // A corrupted copy whose destination collapsed onto its source
        let mut broken = tx.clone();
        broken.account_to_id = broken.account_from_id;
        let before = broken.clone();

        let err = broken.confirm().unwrap_err();
        assert_eq!(err, ValidationError::SameSourceAndDestination);
        assert_eq!(broken, before);
    }

    #[test]
    fn test_strict_policy_guards_transitions() {
        let f = fixture();
        let mut tx = Transaction::new(&f.bob, &f.alice_key, 100.0, "payment").unwrap();

        let err = tx
            .transition_with(TransitionPolicy::Strict, TransactionStatus::Completed, None)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::IllegalTransition {
                from: "pending".to_string(),
                to: "completed".to_string(),
            }
        );
        assert_eq!(tx.status(), TransactionStatus::Pending);

        tx.transition_with(TransitionPolicy::Strict, TransactionStatus::Confirmed, None)
            .unwrap();
        tx.transition_with(TransitionPolicy::Strict, TransactionStatus::Completed, None)
            .unwrap();

        let err = tx
            .transition_with(
                TransitionPolicy::Strict,
                TransactionStatus::Error,
                Some("too late".to_string()),
            )
            .unwrap_err();
        assert!(matches!(err, ValidationError::IllegalTransition { .. }));
        assert_eq!(tx.cancel_description(), "");
    }

    #[test]
    fn test_transition_table() {
        use TransactionStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Error));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Error));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Confirmed));
        for next in [Pending, Confirmed, Completed, Error] {
            assert!(!Completed.can_transition_to(next));
            assert!(!Error.can_transition_to(next));
        }

        assert!(Completed.is_terminal());
        assert!(Error.is_terminal());
        assert!(!Pending.is_terminal());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("confirmed".parse::<TransactionStatus>().unwrap(), TransactionStatus::Confirmed);
        assert_eq!(
            "cancelled".parse::<TransactionStatus>().unwrap_err(),
            ValidationError::InvalidTransactionStatus("cancelled".to_string())
        );
    }

    #[test]
    fn test_restore_revalidates() {
        let f = fixture();
        let err = Transaction::restore(
            Base::new(),
            "pending",
            -5.0,
            "payment".to_string(),
            String::new(),
            f.bob.id(),
            f.alice_key.id(),
            f.alice.id(),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::NonPositiveAmount(_)));
    }

    #[test]
    fn test_serialized_field_names() {
        let f = fixture();
        let tx = Transaction::new(&f.bob, &f.alice_key, 12.5, "payment").unwrap();
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["amount"], 12.5);
        assert_eq!(json["cancel_description"], "");
        assert_eq!(json["account_from_id"], f.bob.id().to_string());
    }
}
