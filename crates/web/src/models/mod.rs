//! Domain models for the grocery site.
//!
//! These are validated domain objects, separate from the database row types
//! in `crate::db`.

pub mod item;
pub mod session;
pub mod store;
pub mod user;

pub use item::{Item, ItemInput};
pub use session::{CurrentUser, keys as session_keys};
pub use store::{Store, StoreInput};
pub use user::User;

use grocery_core::UserId;

/// Records that remember which user created them.
///
/// Only the creator may edit such a record. Records without a creator
/// (e.g. imported data) are read-only for everyone.
pub trait CreatedBy {
    /// The user who created the record, if known.
    fn created_by_id(&self) -> Option<UserId>;

    /// Whether `user_id` is allowed to modify this record.
    fn is_editable_by(&self, user_id: UserId) -> bool {
        self.created_by_id() == Some(user_id)
    }
}
