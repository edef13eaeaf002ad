//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                     - All stores (public)
//! GET  /health                               - Liveness
//! GET  /health/ready                         - Readiness (database ping)
//!
//! # Stores (requires auth)
//! GET  /new_store                            - New store form
//! POST /new_store                            - Create store
//! GET  /store/{id}                           - Store detail + edit form
//! POST /store/{id}                           - Update store (creator only)
//!
//! # Items (requires auth)
//! GET  /new_item                             - New item form
//! POST /new_item                             - Create item
//! GET  /item/{id}                            - Item detail + edit form
//! POST /item/{id}                            - Update item (creator only)
//!
//! # Shopping list (requires auth)
//! GET  /shopping_list                        - Current user's list
//! POST /add_to_shopping_list/{item_id}       - Add item
//! POST /remove_from_shopping_list/{item_id}  - Remove item
//!
//! # Auth
//! GET  /auth/signup                          - Sign-up page
//! POST /auth/signup                          - Create account
//! GET  /auth/login                           - Login page
//! POST /auth/login                           - Log in
//! POST /auth/logout                          - Log out
//! ```

pub mod auth;
pub mod home;
pub mod items;
pub mod shopping_list;
pub mod stores;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::{FlashMessage, auth_rate_limiter, take_flashes};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Data every page needs for `base.html`.
pub struct Layout {
    pub current_user: Option<CurrentUser>,
    pub flashes: Vec<FlashMessage>,
}

impl Layout {
    /// Build the layout for a page about to be rendered.
    ///
    /// Consumes pending flash messages, so only call this on the render path.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    pub async fn load(session: &Session, current_user: Option<CurrentUser>) -> Result<Self> {
        let flashes = take_flashes(session).await?;
        Ok(Self {
            current_user,
            flashes,
        })
    }

    /// Username of the logged-in user, for the nav bar.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.current_user.as_ref().map(|u| u.username.as_str())
    }
}

/// Create the auth routes router.
///
/// Rate limited per client IP.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        // Stores
        .route("/new_store", get(stores::new_page).post(stores::create))
        .route("/store/{id}", get(stores::show).post(stores::update))
        // Items
        .route("/new_item", get(items::new_page).post(items::create))
        .route("/item/{id}", get(items::show).post(items::update))
        // Shopping list
        .route("/shopping_list", get(shopping_list::show))
        .route(
            "/add_to_shopping_list/{item_id}",
            post(shopping_list::add),
        )
        .route(
            "/remove_from_shopping_list/{item_id}",
            post(shopping_list::remove),
        )
        // Auth
        .nest("/auth", auth_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Parse a path ID, treating anything malformed as a missing record.
fn parse_id<T: std::str::FromStr>(raw: &str, kind: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("{kind} {raw}")))
}
