//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use super::Layout;
use crate::db::StoreRepository;
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::models::Store;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub stores: Vec<Store>,
}

/// Display every store, oldest first.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<HomeTemplate> {
    let stores = StoreRepository::new(state.pool()).list_all().await?;

    Ok(HomeTemplate {
        layout: Layout::load(&session, user).await?,
        stores,
    })
}
