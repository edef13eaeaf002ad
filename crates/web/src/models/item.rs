//! Grocery item domain types.

use chrono::{DateTime, Utc};

use grocery_core::{ItemCategory, ItemId, Price, StoreId, UserId};

use super::CreatedBy;

/// A grocery item, joined with the title of the store it belongs to.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    pub category: ItemCategory,
    pub photo_url: Option<String>,
    pub store_id: StoreId,
    /// Title of the owning store (every item has exactly one).
    pub store_title: String,
    pub created_by_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreatedBy for Item {
    fn created_by_id(&self) -> Option<UserId> {
        self.created_by_id
    }
}

/// Validated fields for creating or updating an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInput {
    pub name: String,
    pub price: Price,
    pub category: ItemCategory,
    pub photo_url: Option<String>,
    pub store_id: StoreId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item_created_by(created_by_id: Option<UserId>) -> Item {
        Item {
            id: ItemId::new(1),
            name: "Bananas".to_string(),
            price: Price::parse("0.59").unwrap(),
            category: ItemCategory::Produce,
            photo_url: None,
            store_id: StoreId::new(1),
            store_title: "Corner Market".to_string(),
            created_by_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_creator_can_edit() {
        let item = item_created_by(Some(UserId::new(5)));
        assert!(item.is_editable_by(UserId::new(5)));
    }

    #[test]
    fn test_other_user_cannot_edit() {
        let item = item_created_by(Some(UserId::new(5)));
        assert!(!item.is_editable_by(UserId::new(6)));
    }

    #[test]
    fn test_record_without_creator_is_read_only() {
        let item = item_created_by(None);
        assert!(!item.is_editable_by(UserId::new(5)));
    }
}
