//! Grocery store repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use grocery_core::{StoreId, UserId};

use super::RepositoryError;
use crate::models::{Store, StoreInput};

/// Internal row type for store queries.
#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: StoreId,
    title: String,
    address: String,
    created_by_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            address: row.address,
            created_by_id: row.created_by_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for grocery store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every store, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Store>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, title, address, created_by_id, created_at, updated_at
            FROM grocery.store
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Store::from).collect())
    }

    /// Get a store by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, title, address, created_by_id, created_at, updated_at
            FROM grocery.store
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Store::from))
    }

    /// Insert a new store created by `created_by`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        input: &StoreInput,
        created_by: UserId,
    ) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            INSERT INTO grocery.store (title, address, created_by_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, address, created_by_id, created_at, updated_at
            ",
        )
        .bind(&input.title)
        .bind(&input.address)
        .bind(created_by)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Overwrite a store's title and address.
    ///
    /// Callers are responsible for the creator check.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, id: StoreId, input: &StoreInput) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            UPDATE grocery.store
            SET title = $2, address = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, address, created_by_id, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.address)
        .fetch_optional(self.pool)
        .await?;

        row.map(Store::from).ok_or(RepositoryError::NotFound)
    }
}
