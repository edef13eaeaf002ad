//! Shopping list membership.
//!
//! The list is a set: `(user_id, item_id)` is the primary key, adds are
//! `ON CONFLICT DO NOTHING` and removing an absent item is not an error.

use sqlx::PgPool;

use grocery_core::{ItemId, UserId};

use super::RepositoryError;
use super::items::{ITEM_COLUMNS, ItemRow};
use crate::models::Item;

/// Repository for a user's shopping list.
pub struct ShoppingListRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShoppingListRepository<'a> {
    /// Create a new shopping list repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Items on the user's list, in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Item>, RepositoryError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM grocery.shopping_list_item l \
             JOIN grocery.item i ON i.id = l.item_id \
             JOIN grocery.store s ON s.id = i.store_id \
             WHERE l.user_id = $1 \
             ORDER BY l.added_at ASC, i.id ASC"
        );

        let rows = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    /// Whether the item is on the user's list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn contains(&self, user_id: UserId, item_id: ItemId) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            r"
            SELECT EXISTS (
                SELECT 1 FROM grocery.shopping_list_item
                WHERE user_id = $1 AND item_id = $2
            )
            ",
        )
        .bind(user_id)
        .bind(item_id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Put an item on the user's list.
    ///
    /// # Returns
    ///
    /// Returns `true` if the item was added, `false` if it was already there.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the item or user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add(&self, user_id: UserId, item_id: ItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO grocery.shopping_list_item (user_id, item_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, item_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .bind(item_id)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_foreign_key(e, "item or user does not exist"))?;

        Ok(result.rows_affected() > 0)
    }

    /// Take an item off the user's list.
    ///
    /// # Returns
    ///
    /// Returns `true` if the item was removed, `false` if it wasn't on the list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(&self, user_id: UserId, item_id: ItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM grocery.shopping_list_item
            WHERE user_id = $1 AND item_id = $2
            ",
        )
        .bind(user_id)
        .bind(item_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
