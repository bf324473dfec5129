//! Concurrent access tests
//!
//! Entities are single-owner; the repository is the shared piece. These tests
//! hammer one repository from several threads and check nothing is lost.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::sync::{Arc, Barrier};
use std::thread;

use tempfile::TempDir;

use pix_core::adapters::duckdb::DuckDbRepository;
use pix_core::services::{PixKeyService, TransactionService};
use pix_core::{TransactionStatus, TransitionPolicy};

fn create_test_repo(temp_dir: &TempDir) -> Arc<DuckDbRepository> {
    let db_path = temp_dir.path().join("concurrent.duckdb");
    let repo = DuckDbRepository::new(&db_path).expect("Failed to create repository");
    repo.ensure_schema().expect("Failed to initialize schema");
    Arc::new(repo)
}

#[test]
fn test_concurrent_key_registration() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let keys = Arc::new(PixKeyService::new(repo.clone()));
    let account = keys.open_account(None, "Alice", 123).unwrap();

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let mut handles = vec![];

    for i in 0..threads {
        let barrier = Arc::clone(&barrier);
        let keys = Arc::clone(&keys);
        let account_id = account.id();
        handles.push(thread::spawn(move || {
            barrier.wait();
            // Every thread races for the same key, then registers its own
            let shared = keys.register_key("shared@example.com", "email", account_id);
            let own = keys.register_key(&format!("user{}@example.com", i), "email", account_id);
            (shared.is_ok(), own.is_ok())
        }));
    }

    let results: Vec<(bool, bool)> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let shared_winners = results.iter().filter(|(shared, _)| *shared).count();
    assert_eq!(shared_winners, 1, "Exactly one thread should own the shared key");
    assert!(results.iter().all(|(_, own)| *own));
}

#[test]
fn test_concurrent_transfers_and_transitions() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let keys = PixKeyService::new(repo.clone());
    let service = Arc::new(TransactionService::new(
        repo.clone(),
        repo.clone(),
        TransitionPolicy::Strict,
    ));

    let alice = keys.open_account(None, "Alice", 123).unwrap();
    keys.register_key("alice@example.com", "email", alice.id()).unwrap();

    let senders: Vec<_> = (0..4)
        .map(|i| keys.open_account(None, format!("Sender {}", i).as_str(), 1000 + i).unwrap())
        .collect();

    let mut handles = vec![];
    for sender in senders {
        let service = Arc::clone(&service);
        handles.push(thread::spawn(move || {
            let mut ids = vec![];
            for n in 1..=5 {
                let tx = service
                    .register(sender.id(), n as f64, "alice@example.com", "email", "batch")
                    .unwrap();
                service.confirm(tx.id()).unwrap();
                service.complete(tx.id()).unwrap();
                ids.push(tx.id());
            }
            ids
        }));
    }

    let ids: Vec<_> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    assert_eq!(ids.len(), 20);
    assert_eq!(repo.get_transaction_count().unwrap(), 20);
    for id in ids {
        assert_eq!(service.find(id).unwrap().status(), TransactionStatus::Completed);
    }
}

#[test]
fn test_sequential_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("sequential.duckdb");

    for i in 0..5 {
        let repo = Arc::new(DuckDbRepository::new(&db_path).unwrap());
        let migrations = repo.run_migrations().unwrap();
        if i > 0 {
            assert!(migrations.applied.is_empty());
        }
        let keys = PixKeyService::new(repo);
        keys.open_account(None, "Owner", 100 + i).unwrap();
    }
}
