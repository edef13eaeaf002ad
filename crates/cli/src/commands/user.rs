//! User management commands.
//!
//! ```bash
//! grocery-cli user create --username alice --password 'correct horse battery'
//! ```

use grocery_web::services::auth::AuthService;

use super::{CommandError, connect};

/// Create a user account, applying the same rules as the sign-up form.
///
/// # Errors
///
/// Returns an error if the username is invalid or taken, the password is
/// too short, or the database is unreachable.
pub async fn create(username: &str, password: &str) -> Result<(), CommandError> {
    let pool = connect().await?;

    let user = AuthService::new(&pool).register(username, password).await?;

    tracing::info!(
        "User created successfully! ID: {}, Username: {}",
        user.id,
        user.username
    );
    Ok(())
}
