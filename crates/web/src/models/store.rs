//! Grocery store domain types.

use chrono::{DateTime, Utc};

use grocery_core::{StoreId, UserId};

use super::CreatedBy;

/// A grocery store.
#[derive(Debug, Clone)]
pub struct Store {
    pub id: StoreId,
    pub title: String,
    pub address: String,
    pub created_by_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreatedBy for Store {
    fn created_by_id(&self) -> Option<UserId> {
        self.created_by_id
    }
}

/// Validated fields for creating or updating a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInput {
    pub title: String,
    pub address: String,
}
