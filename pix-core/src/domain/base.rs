//! Attributes shared by every entity

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Identifier and timestamps carried by banks, accounts, keys and transactions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Base {
    pub(crate) id: Uuid,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Base {
    /// Fresh identity stamped with the current time
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild from stored values
    pub fn restore(id: Uuid, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Refresh updated_at after a mutation
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Base {
    fn default() -> Self {
        Self::new()
    }
}
