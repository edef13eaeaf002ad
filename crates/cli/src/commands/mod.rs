//! CLI subcommand implementations.

pub mod migrate;
pub mod user;

use grocery_web::config::{ConfigError, GroceryConfig};
use grocery_web::db;
use sqlx::PgPool;

/// Errors shared by every command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// User creation failed.
    #[error(transparent)]
    Auth(#[from] grocery_web::services::auth::AuthError),
}

/// Connect using the same configuration as the web server.
async fn connect() -> Result<PgPool, CommandError> {
    let config = GroceryConfig::from_env()?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&config.database_url).await?)
}
