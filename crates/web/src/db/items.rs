//! Grocery item repository.
//!
//! Every query joins `grocery.store` so callers always get the owning
//! store's title alongside the item.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use grocery_core::{ItemCategory, ItemId, Price, StoreId, UserId};

use super::RepositoryError;
use crate::models::{Item, ItemInput};

const STORE_MISSING: &str = "store does not exist";

/// Internal row type for item queries.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct ItemRow {
    id: ItemId,
    name: String,
    price: Price,
    category: ItemCategory,
    photo_url: Option<String>,
    store_id: StoreId,
    store_title: String,
    created_by_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            category: row.category,
            photo_url: row.photo_url,
            store_id: row.store_id,
            store_title: row.store_title,
            created_by_id: row.created_by_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Column list shared by every item query (`i` = item, `s` = store).
pub(super) const ITEM_COLUMNS: &str = "i.id, i.name, i.price, i.category, i.photo_url, \
     i.store_id, s.title AS store_title, i.created_by_id, i.created_at, i.updated_at";

/// Repository for grocery item database operations.
pub struct ItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an item by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM grocery.item i \
             JOIN grocery.store s ON s.id = i.store_id \
             WHERE i.id = $1"
        );

        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Item::from))
    }

    /// List the items sold at a store, by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_store(&self, store_id: StoreId) -> Result<Vec<Item>, RepositoryError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM grocery.item i \
             JOIN grocery.store s ON s.id = i.store_id \
             WHERE i.store_id = $1 \
             ORDER BY i.name ASC, i.id ASC"
        );

        let rows = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(store_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    /// Insert a new item created by `created_by`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the store no longer exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        input: &ItemInput,
        created_by: UserId,
    ) -> Result<Item, RepositoryError> {
        let sql = format!(
            "WITH i AS ( \
                 INSERT INTO grocery.item (name, price, category, photo_url, store_id, created_by_id) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 RETURNING * \
             ) \
             SELECT {ITEM_COLUMNS} FROM i JOIN grocery.store s ON s.id = i.store_id"
        );

        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(&input.name)
            .bind(input.price)
            .bind(input.category)
            .bind(input.photo_url.as_deref())
            .bind(input.store_id)
            .bind(created_by)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_foreign_key(e, STORE_MISSING))?;

        Ok(row.into())
    }

    /// Overwrite every editable field of an item, including its store.
    ///
    /// Callers are responsible for the creator check.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new store doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, id: ItemId, input: &ItemInput) -> Result<Item, RepositoryError> {
        let sql = format!(
            "WITH i AS ( \
                 UPDATE grocery.item \
                 SET name = $2, price = $3, category = $4, photo_url = $5, store_id = $6, \
                     updated_at = NOW() \
                 WHERE id = $1 \
                 RETURNING * \
             ) \
             SELECT {ITEM_COLUMNS} FROM i JOIN grocery.store s ON s.id = i.store_id"
        );

        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(id)
            .bind(&input.name)
            .bind(input.price)
            .bind(input.category)
            .bind(input.photo_url.as_deref())
            .bind(input.store_id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| RepositoryError::from_foreign_key(e, STORE_MISSING))?;

        row.map(Item::from).ok_or(RepositoryError::NotFound)
    }
}
