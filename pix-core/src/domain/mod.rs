//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
mod bank;
pub mod base;
mod pix_key;
pub mod result;
mod transaction;

pub use account::Account;
pub use bank::Bank;
pub use base::Base;
pub use pix_key::{PixKey, PixKeyKind, PixKeyStatus};
pub use result::{Error, Result, ValidationError};
pub use transaction::{Transaction, TransactionStatus, TransitionPolicy};
