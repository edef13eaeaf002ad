//! User domain types.

use chrono::{DateTime, Utc};

use grocery_core::{UserId, Username};

/// A site account.
///
/// The password hash is not part of this type; it is only read by
/// `UserRepository::get_with_password_hash` during login.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub username: Username,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
