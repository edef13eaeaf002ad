//! Store route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use grocery_core::StoreId;

use super::{Layout, parse_id};
use crate::db::{ItemRepository, StoreRepository};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::forms::{FormErrors, StoreForm};
use crate::middleware::{RequireAuth, push_flash, push_flash_error};
use crate::models::{CreatedBy, Item, Store};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// New store page template.
#[derive(Template, WebTemplate)]
#[template(path = "new_store.html")]
pub struct NewStoreTemplate {
    pub layout: Layout,
    pub form: StoreForm,
    pub errors: FormErrors,
}

/// Store detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "store_detail.html")]
pub struct StoreDetailTemplate {
    pub layout: Layout,
    pub store: Store,
    pub items: Vec<Item>,
    pub form: StoreForm,
    pub errors: FormErrors,
    /// Whether the viewer created the store and may edit it.
    pub can_edit: bool,
}

// =============================================================================
// Create
// =============================================================================

/// Display the new store form.
pub async fn new_page(session: Session, RequireAuth(user): RequireAuth) -> Result<NewStoreTemplate> {
    Ok(NewStoreTemplate {
        layout: Layout::load(&session, Some(user)).await?,
        form: StoreForm::default(),
        errors: FormErrors::default(),
    })
}

/// Create a store owned by the current user.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(form): Form<StoreForm>,
) -> Result<Response> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(NewStoreTemplate {
                layout: Layout::load(&session, Some(user)).await?,
                form,
                errors,
            }
            .into_response());
        }
    };

    let store = StoreRepository::new(state.pool())
        .create(&input, user.id)
        .await?;

    tracing::info!(store_id = %store.id, title = %store.title, "Store created");
    add_breadcrumb(
        "store",
        "Created store",
        Some(&[("store_id", store.id.to_string().as_str())]),
    );

    push_flash(
        &session,
        format!("Successfully Created Store: {}", store.title),
    )
    .await?;
    Ok(Redirect::to(&format!("/store/{}", store.id)).into_response())
}

// =============================================================================
// Detail / Update
// =============================================================================

async fn load_store(state: &AppState, id: StoreId) -> Result<(Store, Vec<Item>)> {
    let store = StoreRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {id}")))?;
    let items = ItemRepository::new(state.pool()).list_by_store(id).await?;
    Ok((store, items))
}

/// Display a store, its items and the edit form.
#[instrument(skip_all, fields(store_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<StoreDetailTemplate> {
    let id: StoreId = parse_id(&id, "store")?;
    let (store, items) = load_store(&state, id).await?;

    Ok(StoreDetailTemplate {
        form: StoreForm::from_store(&store),
        can_edit: store.is_editable_by(user.id),
        layout: Layout::load(&session, Some(user)).await?,
        store,
        items,
        errors: FormErrors::default(),
    })
}

/// Update a store.
///
/// Only the creator's edits are saved. A valid submission from anyone else
/// re-renders the page with the store unchanged.
#[instrument(skip_all, fields(store_id = %id, user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Form(form): Form<StoreForm>,
) -> Result<Response> {
    let id: StoreId = parse_id(&id, "store")?;
    let (store, items) = load_store(&state, id).await?;
    let can_edit = store.is_editable_by(user.id);

    let errors = match form.validate() {
        Ok(input) if can_edit => {
            let store = StoreRepository::new(state.pool()).update(id, &input).await?;

            tracing::info!(store_id = %store.id, "Store updated");
            push_flash(
                &session,
                format!("Successfully Updated Store: {}", store.title),
            )
            .await?;
            return Ok(Redirect::to(&format!("/store/{}", store.id)).into_response());
        }
        Ok(_) => {
            tracing::info!("Ignoring store edit from non-creator");
            push_flash_error(&session, "You can only edit stores you created.").await?;
            FormErrors::default()
        }
        Err(errors) => errors,
    };

    Ok(StoreDetailTemplate {
        layout: Layout::load(&session, Some(user)).await?,
        store,
        items,
        form,
        errors,
        can_edit,
    }
    .into_response())
}
