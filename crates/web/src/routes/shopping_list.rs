//! Shopping list route handlers.
//!
//! Add and remove are idempotent: adding an item already on the list or
//! removing one that isn't both just redirect back to the list.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use grocery_core::{ItemId, Price};

use super::{Layout, parse_id};
use crate::db::{ItemRepository, ShoppingListRepository};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::Item;
use crate::state::AppState;

const SHOPPING_LIST_PATH: &str = "/shopping_list";

/// Shopping list page template.
#[derive(Template, WebTemplate)]
#[template(path = "shopping_list.html")]
pub struct ShoppingListTemplate {
    pub layout: Layout,
    pub items: Vec<Item>,
    pub total: Price,
}

/// Display the current user's shopping list with its total.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<ShoppingListTemplate> {
    let items = ShoppingListRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    let total = items.iter().map(|item| item.price).sum();

    Ok(ShoppingListTemplate {
        layout: Layout::load(&session, Some(user)).await?,
        items,
        total,
    })
}

async fn require_item(state: &AppState, raw_id: &str) -> Result<ItemId> {
    let id: ItemId = parse_id(raw_id, "item")?;
    ItemRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .map(|item| item.id)
        .ok_or_else(|| AppError::NotFound(format!("item {id}")))
}

/// Put an item on the current user's list.
#[instrument(skip_all, fields(item_id = %item_id, user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(item_id): Path<String>,
) -> Result<Redirect> {
    let id = require_item(&state, &item_id).await?;

    let added = ShoppingListRepository::new(state.pool())
        .add(user.id, id)
        .await?;
    if added {
        tracing::info!("Item added to shopping list");
        add_breadcrumb("shopping_list", "Added item", Some(&[("item_id", item_id.as_str())]));
    }

    Ok(Redirect::to(SHOPPING_LIST_PATH))
}

/// Take an item off the current user's list.
#[instrument(skip_all, fields(item_id = %item_id, user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(item_id): Path<String>,
) -> Result<Redirect> {
    let id = require_item(&state, &item_id).await?;

    let removed = ShoppingListRepository::new(state.pool())
        .remove(user.id, id)
        .await?;
    if removed {
        tracing::info!("Item removed from shopping list");
        add_breadcrumb("shopping_list", "Removed item", Some(&[("item_id", item_id.as_str())]));
    }

    Ok(Redirect::to(SHOPPING_LIST_PATH))
}
