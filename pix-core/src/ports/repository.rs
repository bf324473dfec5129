//! Repository ports - persistence abstraction

use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{Account, Bank, PixKey, PixKeyKind, Transaction};

/// Storage for keys and the banks and accounts they resolve to
///
/// Key uniqueness lives here: the domain has no way to see other keys, so
/// `register_key` must reject a second key with the same kind and value.
pub trait PixKeyRepository: Send + Sync {
    /// Persist a new key, failing if `(key, kind)` is already taken
    fn register_key(&self, pix_key: &PixKey) -> Result<PixKey>;

    /// Look a key up by its value and kind (`NotFound` when absent)
    fn find_key_by_kind(&self, key: &str, kind: PixKeyKind) -> Result<PixKey>;

    fn add_bank(&self, bank: &Bank) -> Result<()>;

    /// Look a bank up by id (`NotFound` when absent)
    fn find_bank(&self, id: Uuid) -> Result<Bank>;

    fn add_account(&self, account: &Account) -> Result<()>;

    /// Look an account up by id (`NotFound` when absent)
    fn find_account(&self, id: Uuid) -> Result<Account>;
}

/// Storage for transfers
pub trait TransactionRepository: Send + Sync {
    /// Persist a newly created transaction
    fn register(&self, transaction: &Transaction) -> Result<()>;

    /// Persist a transaction after a state transition
    fn save(&self, transaction: &Transaction) -> Result<()>;

    /// Look a transaction up by id (`NotFound` when absent)
    fn find(&self, id: Uuid) -> Result<Transaction>;
}
