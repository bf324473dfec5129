//! DuckDB repository implementation

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use duckdb::{params, Connection};
use uuid::Uuid;

use crate::domain::result::{Error, Result, ValidationError};
use crate::domain::{Account, Bank, Base, PixKey, PixKeyKind, Transaction};
use crate::ports::{PixKeyRepository, TransactionRepository};
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// Whether a failed statement hit a UNIQUE or PRIMARY KEY constraint
fn is_unique_violation(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("duplicate key") || lower.contains("violates unique constraint")
}

const TRANSACTION_COLUMNS: &str = "transaction_id, status, amount, description, cancel_description,
     account_from_id, pix_key_to_id, account_to_id, created_at, updated_at";

/// DuckDB repository implementation
///
/// Implements both [`PixKeyRepository`] and [`TransactionRepository`] over a
/// single connection.
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbRepository {
    /// Open (or create) a database file
    ///
    /// Opening is retried with exponential backoff when another process
    /// holds the file lock.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[pix] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::database(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_in_memory_with_flags(config)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading stays off; nothing here needs one.
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.lock()?;
        let migrations = MigrationService::new(&conn);
        migrations.run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    /// Path of the backing file, `None` for in-memory databases
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    // === Transaction listings ===

    /// Transactions sent from an account, newest first
    pub fn get_transactions_by_account(&self, account_id: Uuid) -> Result<Vec<Transaction>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sys_transactions WHERE account_from_id = ? ORDER BY created_at DESC",
            TRANSACTION_COLUMNS
        ))?;

        let rows = stmt
            .query_map(params![account_id.to_string()], TransactionRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(TransactionRow::into_transaction).collect()
    }

    pub fn get_transaction_count(&self) -> Result<i64> {
        let conn = self.lock()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM sys_transactions", [], |row| row.get(0))?)
    }

    fn pix_key_exists(conn: &Connection, key: &str, kind: PixKeyKind) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sys_pix_keys WHERE kind = ? AND pix_key = ?",
            params![kind.as_str(), key],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Insert a key row, reporting a constraint hit as a duplicate
    fn insert_pix_key(conn: &Connection, pix_key: &PixKey) -> Result<()> {
        let inserted = conn.execute(
            "INSERT INTO sys_pix_keys (pix_key_id, kind, pix_key, status, account_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                pix_key.id().to_string(),
                pix_key.kind().as_str(),
                pix_key.key(),
                pix_key.status().as_str(),
                pix_key.account_id().to_string(),
                pix_key.base().created_at().to_rfc3339(),
                pix_key.base().updated_at().to_rfc3339(),
            ],
        );

        match inserted {
            Ok(_) => Ok(()),
            // Another process registered the key after the existence check
            Err(e) if is_unique_violation(&e.to_string()) => Err(duplicate_key(pix_key)),
            Err(e) => Err(e.into()),
        }
    }
}

fn duplicate_key(pix_key: &PixKey) -> Error {
    ValidationError::DuplicateKey {
        kind: pix_key.kind().to_string(),
        key: pix_key.key().to_string(),
    }
    .into()
}

impl PixKeyRepository for DuckDbRepository {
    fn register_key(&self, pix_key: &PixKey) -> Result<PixKey> {
        let conn = self.lock()?;

        if Self::pix_key_exists(&conn, pix_key.key(), pix_key.kind())? {
            return Err(duplicate_key(pix_key));
        }

        Self::insert_pix_key(&conn, pix_key)?;
        Ok(pix_key.clone())
    }

    fn find_key_by_kind(&self, key: &str, kind: PixKeyKind) -> Result<PixKey> {
        let conn = self.lock()?;
        let row = conn.query_row(
            "SELECT pix_key_id, kind, pix_key, status, account_id, created_at, updated_at
             FROM sys_pix_keys WHERE kind = ? AND pix_key = ?",
            params![kind.as_str(), key],
            |row| {
                Ok(PixKeyRow {
                    id: row.get(0)?,
                    kind: row.get(1)?,
                    key: row.get(2)?,
                    status: row.get(3)?,
                    account_id: row.get(4)?,
                    created_at: row.get(5)?,
                    updated_at: row.get(6)?,
                })
            },
        );

        match row {
            Ok(row) => row.into_pix_key(),
            Err(duckdb::Error::QueryReturnedNoRows) => {
                Err(Error::not_found(format!("pix key {} '{}'", kind, key)))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn add_bank(&self, bank: &Bank) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_banks (bank_id, code, name, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                bank.id().to_string(),
                bank.code(),
                bank.name(),
                bank.base().created_at().to_rfc3339(),
                bank.base().updated_at().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn find_bank(&self, id: Uuid) -> Result<Bank> {
        let conn = self.lock()?;
        let row = conn.query_row(
            "SELECT bank_id, code, name, created_at, updated_at FROM sys_banks WHERE bank_id = ?",
            params![id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        );

        match row {
            Ok((id, code, name, created_at, updated_at)) => {
                let base = restore_base(&id, &created_at, &updated_at)?;
                Ok(Bank::restore(base, code, name)?)
            }
            Err(duckdb::Error::QueryReturnedNoRows) => Err(Error::not_found(format!("bank {}", id))),
            Err(e) => Err(e.into()),
        }
    }

    fn add_account(&self, account: &Account) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_accounts (account_id, owner_name, number, bank_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                account.id().to_string(),
                account.owner_name(),
                account.number(),
                account.bank_id().map(|id| id.to_string()),
                account.base().created_at().to_rfc3339(),
                account.base().updated_at().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn find_account(&self, id: Uuid) -> Result<Account> {
        let conn = self.lock()?;
        let row = conn.query_row(
            "SELECT account_id, owner_name, number, bank_id, created_at, updated_at
             FROM sys_accounts WHERE account_id = ?",
            params![id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            },
        );

        match row {
            Ok((id, owner_name, number, bank_id, created_at, updated_at)) => {
                let base = restore_base(&id, &created_at, &updated_at)?;
                let bank_id = bank_id.as_deref().map(parse_uuid).transpose()?;
                Ok(Account::restore(base, owner_name, number, bank_id)?)
            }
            Err(duckdb::Error::QueryReturnedNoRows) => {
                Err(Error::not_found(format!("account {}", id)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl TransactionRepository for DuckDbRepository {
    fn register(&self, transaction: &Transaction) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT INTO sys_transactions ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                TRANSACTION_COLUMNS
            ),
            params![
                transaction.id().to_string(),
                transaction.status().as_str(),
                transaction.amount(),
                transaction.description(),
                transaction.cancel_description(),
                transaction.account_from_id().to_string(),
                transaction.pix_key_to_id().to_string(),
                transaction.account_to_id().to_string(),
                transaction.base().created_at().to_rfc3339(),
                transaction.base().updated_at().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn save(&self, transaction: &Transaction) -> Result<()> {
        let conn = self.lock()?;
        // Only the mutable columns; identity and parties never change.
        let rows = conn.execute(
            "UPDATE sys_transactions
             SET status = ?, cancel_description = ?, updated_at = ?
             WHERE transaction_id = ?",
            params![
                transaction.status().as_str(),
                transaction.cancel_description(),
                transaction.base().updated_at().to_rfc3339(),
                transaction.id().to_string(),
            ],
        )?;

        if rows == 0 {
            return Err(Error::not_found(format!("transaction {}", transaction.id())));
        }
        Ok(())
    }

    fn find(&self, id: Uuid) -> Result<Transaction> {
        let conn = self.lock()?;
        let row = conn.query_row(
            &format!(
                "SELECT {} FROM sys_transactions WHERE transaction_id = ?",
                TRANSACTION_COLUMNS
            ),
            params![id.to_string()],
            TransactionRow::from_row,
        );

        match row {
            Ok(row) => row.into_transaction(),
            Err(duckdb::Error::QueryReturnedNoRows) => {
                Err(Error::not_found(format!("transaction {}", id)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

// === Row mapping ===

struct PixKeyRow {
    id: String,
    kind: String,
    key: String,
    status: String,
    account_id: String,
    created_at: String,
    updated_at: String,
}

impl PixKeyRow {
    fn into_pix_key(self) -> Result<PixKey> {
        let base = restore_base(&self.id, &self.created_at, &self.updated_at)?;
        Ok(PixKey::restore(
            base,
            &self.kind,
            self.key,
            &self.status,
            parse_uuid(&self.account_id)?,
        )?)
    }
}

struct TransactionRow {
    id: String,
    status: String,
    amount: f64,
    description: String,
    cancel_description: String,
    account_from_id: String,
    pix_key_to_id: String,
    account_to_id: String,
    created_at: String,
    updated_at: String,
}

impl TransactionRow {
    /// Column order follows TRANSACTION_COLUMNS
    fn from_row(row: &duckdb::Row) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            status: row.get(1)?,
            amount: row.get(2)?,
            description: row.get(3)?,
            cancel_description: row.get(4)?,
            account_from_id: row.get(5)?,
            pix_key_to_id: row.get(6)?,
            account_to_id: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn into_transaction(self) -> Result<Transaction> {
        let base = restore_base(&self.id, &self.created_at, &self.updated_at)?;
        Ok(Transaction::restore(
            base,
            &self.status,
            self.amount,
            self.description,
            self.cancel_description,
            parse_uuid(&self.account_from_id)?,
            parse_uuid(&self.pix_key_to_id)?,
            parse_uuid(&self.account_to_id)?,
        )?)
    }
}

fn restore_base(id: &str, created_at: &str, updated_at: &str) -> Result<Base> {
    Ok(Base::restore(
        parse_uuid(id)?,
        parse_timestamp(created_at)?,
        parse_timestamp(updated_at)?,
    ))
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| Error::database(format!("invalid id '{}': {}", s, e)))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::database(format!("invalid timestamp '{}': {}", s, e)))
}
