//! Session configuration and flash messages.
//!
//! Sessions are stored in `PostgreSQL` via `tower-sessions-sqlx-store`; the
//! `tower_sessions.session` table is created by `grocery-cli migrate`.

use serde::{Deserialize, Serialize};
use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore};

use crate::config::GroceryConfig;
use crate::models::session_keys;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "grocery_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer over any store.
///
/// Production passes a `PostgresStore`; tests pass a `MemoryStore`.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &GroceryConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// A one-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

/// Styling hint for a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    /// CSS class suffix used by `base.html`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Queue a success message for the next page render.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn push_flash(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    push(session, FlashLevel::Success, message.into()).await
}

/// Queue an error message for the next page render.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn push_flash_error(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    push(session, FlashLevel::Error, message.into()).await
}

async fn push(
    session: &Session,
    level: FlashLevel,
    message: String,
) -> Result<(), tower_sessions::session::Error> {
    let mut pending: Vec<FlashMessage> = session
        .get(session_keys::FLASH)
        .await?
        .unwrap_or_default();
    pending.push(FlashMessage { level, message });
    session.insert(session_keys::FLASH, pending).await
}

/// Remove and return all queued messages, oldest first.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn take_flashes(
    session: &Session,
) -> Result<Vec<FlashMessage>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<FlashMessage>>(session_keys::FLASH)
        .await?
        .unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_flashes_are_taken_once_in_order() {
        let session = session();
        push_flash(&session, "Successfully Created Store: Safeway")
            .await
            .unwrap();
        push_flash_error(&session, "Something went wrong").await.unwrap();

        let flashes = take_flashes(&session).await.unwrap();
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[0].message, "Successfully Created Store: Safeway");
        assert_eq!(flashes[0].level, FlashLevel::Success);
        assert_eq!(flashes[1].level.as_str(), "error");

        assert!(take_flashes(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_take_flashes_on_empty_session() {
        assert!(take_flashes(&session()).await.unwrap().is_empty());
    }
}
