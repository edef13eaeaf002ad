//! Database migration command.
//!
//! ```bash
//! grocery-cli migrate
//! ```
//!
//! Applies `crates/web/migrations/` (the `grocery` schema) and creates the
//! `tower_sessions` table used by the session store. Both steps are
//! idempotent.
//!
//! # Environment Variables
//!
//! - `GROCERY_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use tower_sessions_sqlx_store::PostgresStore;

use super::{CommandError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running grocery migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool.clone()).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
