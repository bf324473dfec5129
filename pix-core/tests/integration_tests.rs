//! Integration tests for pix-core services
//!
//! These tests drive the services against a real DuckDB file.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;

use tempfile::TempDir;
use uuid::Uuid;

use pix_core::adapters::duckdb::DuckDbRepository;
use pix_core::config::Config;
use pix_core::ports::{PixKeyRepository, TransactionRepository};
use pix_core::services::{PixKeyService, TransactionService};
use pix_core::{
    Account, PixContext, PixKey, PixKeyKind, Transaction, TransactionStatus, TransitionPolicy,
    ValidationError,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Create a test repository with schema initialized
fn create_test_repo(temp_dir: &TempDir) -> Arc<DuckDbRepository> {
    let db_path = temp_dir.path().join("test.duckdb");
    let repo = DuckDbRepository::new(&db_path).expect("Failed to create repository");
    repo.ensure_schema().expect("Failed to initialize schema");
    Arc::new(repo)
}

struct Parties {
    alice: Account,
    bob: Account,
}

/// Alice (123) owns alice@example.com; Bob (456) has no key
fn seed(keys: &PixKeyService) -> Parties {
    let bank = keys.add_bank("001", "Banco Central de Testes").unwrap();
    let alice = keys.open_account(Some(bank.id()), "Alice", 123).unwrap();
    let bob = keys.open_account(Some(bank.id()), "Bob", 456).unwrap();
    keys.register_key("alice@example.com", "email", alice.id()).unwrap();
    Parties { alice, bob }
}

// ============================================================================
// Transfer lifecycle
// ============================================================================

#[test]
fn test_transfer_lifecycle_without_terminal_guard() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let keys = PixKeyService::new(repo.clone());
    let transactions = TransactionService::new(repo.clone(), repo.clone(), TransitionPolicy::Permissive);
    let parties = seed(&keys);

    let tx = transactions
        .register(parties.bob.id(), 100.0, "alice@example.com", "email", "payment")
        .unwrap();
    assert_eq!(tx.status(), TransactionStatus::Pending);
    assert_eq!(tx.account_to_id(), parties.alice.id());

    assert_eq!(transactions.confirm(tx.id()).unwrap().status(), TransactionStatus::Confirmed);
    assert_eq!(transactions.complete(tx.id()).unwrap().status(), TransactionStatus::Completed);

    // Completed is not guarded under the permissive policy
    let failed = transactions.fail(tx.id(), "too late").unwrap();
    assert_eq!(failed.status(), TransactionStatus::Error);
    assert_eq!(failed.cancel_description(), "too late");

    let stored = transactions.find(tx.id()).unwrap();
    assert_eq!(stored, failed);
    assert_eq!(stored.base().created_at(), tx.base().created_at());
    assert!(stored.base().updated_at() >= tx.base().updated_at());
}

#[test]
fn test_self_transfer_is_never_stored() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let keys = PixKeyService::new(repo.clone());
    let transactions = TransactionService::new(repo.clone(), repo.clone(), TransitionPolicy::Permissive);
    let parties = seed(&keys);

    let err = transactions
        .register(parties.alice.id(), 50.0, "alice@example.com", "email", "to myself")
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::SameSourceAndDestination));

    // Amount is reported first when both rules are broken
    let err = transactions
        .register(parties.alice.id(), 0.0, "alice@example.com", "email", "x")
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::NonPositiveAmount(0.0)));

    assert_eq!(repo.get_transaction_count().unwrap(), 0);
}

#[test]
fn test_strict_policy_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        strict_transitions: true,
        ..Config::default()
    };
    config.save(temp_dir.path()).unwrap();

    let loaded = Config::load_with_override(temp_dir.path(), None).unwrap();
    let ctx = PixContext::with_config(temp_dir.path(), loaded).unwrap();
    assert_eq!(ctx.transaction_service.policy(), TransitionPolicy::Strict);

    let parties = seed(&ctx.pix_key_service);
    let tx = ctx
        .transaction_service
        .register(parties.bob.id(), 10.0, "alice@example.com", "email", "rent")
        .unwrap();

    let err = ctx.transaction_service.complete(tx.id()).unwrap_err();
    assert!(matches!(
        err.as_validation(),
        Some(ValidationError::IllegalTransition { .. })
    ));
    assert_eq!(
        ctx.transaction_service.find(tx.id()).unwrap().status(),
        TransactionStatus::Pending
    );

    ctx.transaction_service.confirm(tx.id()).unwrap();
    ctx.transaction_service.fail(tx.id(), "rejected by payee bank").unwrap();
    assert!(ctx.transaction_service.confirm(tx.id()).is_err());
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_data_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let (alice_id, tx_id) = {
        let ctx = PixContext::new(temp_dir.path()).unwrap();
        let parties = seed(&ctx.pix_key_service);
        let tx = ctx
            .transaction_service
            .register(parties.bob.id(), 42.5, "alice@example.com", "email", "lunch")
            .unwrap();
        ctx.transaction_service.confirm(tx.id()).unwrap();
        (parties.alice.id(), tx.id())
    };

    let ctx = PixContext::new(temp_dir.path()).unwrap();
    let key = ctx.pix_key_service.find_key("alice@example.com", "email").unwrap();
    assert_eq!(key.account_id(), alice_id);

    let tx = ctx.transaction_service.find(tx_id).unwrap();
    assert_eq!(tx.status(), TransactionStatus::Confirmed);
    assert_eq!(tx.amount(), 42.5);
    assert_eq!(tx.description(), "lunch");
}

#[test]
fn test_transactions_listed_by_source_account() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let keys = PixKeyService::new(repo.clone());
    let transactions = TransactionService::new(repo.clone(), repo.clone(), TransitionPolicy::Permissive);
    let parties = seed(&keys);

    for i in 1..=3 {
        transactions
            .register(parties.bob.id(), i as f64, "alice@example.com", "email", "split")
            .unwrap();
    }

    assert_eq!(repo.get_transactions_by_account(parties.bob.id()).unwrap().len(), 3);
    assert!(repo.get_transactions_by_account(parties.alice.id()).unwrap().is_empty());
}

// ============================================================================
// Repository contracts
// ============================================================================

#[test]
fn test_key_uniqueness_is_enforced_by_store() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let keys = PixKeyService::new(repo.clone());
    let parties = seed(&keys);

    let err = keys
        .register_key("alice@example.com", "email", parties.bob.id())
        .unwrap_err();
    assert!(matches!(
        err.as_validation(),
        Some(ValidationError::DuplicateKey { .. })
    ));

    let found = repo
        .find_key_by_kind("alice@example.com", PixKeyKind::Email)
        .unwrap();
    assert_eq!(found.account_id(), parties.alice.id());
}

#[test]
fn test_register_and_save_through_ports() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);

    let alice = Account::new(None, "Alice", 123).unwrap();
    let bob = Account::new(None, "Bob", 456).unwrap();
    repo.add_account(&alice).unwrap();
    repo.add_account(&bob).unwrap();
    let key = repo
        .register_key(&PixKey::new(&alice, "12345678900", "cpf").unwrap())
        .unwrap();

    let mut tx = Transaction::new(&bob, &key, 99.99, "invoice 7").unwrap();
    repo.register(&tx).unwrap();

    tx.error("insufficient funds").unwrap();
    repo.save(&tx).unwrap();

    let stored = TransactionRepository::find(repo.as_ref(), tx.id()).unwrap();
    assert_eq!(stored, tx);
    assert!(TransactionRepository::find(repo.as_ref(), Uuid::new_v4())
        .unwrap_err()
        .is_not_found());
}
