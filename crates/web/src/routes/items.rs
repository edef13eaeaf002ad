//! Grocery item route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use grocery_core::{ItemId, StoreId};

use super::{Layout, parse_id};
use crate::db::{ItemRepository, ShoppingListRepository, StoreRepository};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::forms::{FormErrors, ItemForm, SelectOption};
use crate::middleware::{RequireAuth, push_flash, push_flash_error};
use crate::models::{CreatedBy, CurrentUser, Item, Store};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// New item page template.
#[derive(Template, WebTemplate)]
#[template(path = "new_item.html")]
pub struct NewItemTemplate {
    pub layout: Layout,
    pub form: ItemForm,
    pub errors: FormErrors,
    pub categories: Vec<SelectOption>,
    pub stores: Vec<SelectOption>,
}

impl NewItemTemplate {
    async fn render_form(
        session: &Session,
        user: CurrentUser,
        form: ItemForm,
        errors: FormErrors,
        stores: &[Store],
    ) -> Result<Self> {
        Ok(Self {
            layout: Layout::load(session, Some(user)).await?,
            categories: form.category_options(),
            stores: form.store_options(stores),
            form,
            errors,
        })
    }
}

/// Item detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "item_detail.html")]
pub struct ItemDetailTemplate {
    pub layout: Layout,
    pub item: Item,
    pub form: ItemForm,
    pub errors: FormErrors,
    pub categories: Vec<SelectOption>,
    pub stores: Vec<SelectOption>,
    /// Whether the viewer created the item and may edit it.
    pub can_edit: bool,
    /// Whether the item is on the viewer's shopping list.
    pub on_list: bool,
}

fn store_ids(stores: &[Store]) -> Vec<StoreId> {
    stores.iter().map(|s| s.id).collect()
}

// =============================================================================
// Create
// =============================================================================

/// Display the new item form.
pub async fn new_page(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<NewItemTemplate> {
    let stores = StoreRepository::new(state.pool()).list_all().await?;
    NewItemTemplate::render_form(&session, user, ItemForm::default(), FormErrors::default(), &stores)
        .await
}

/// Create an item owned by the current user.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ItemForm>,
) -> Result<Response> {
    let stores = StoreRepository::new(state.pool()).list_all().await?;

    let input = match form.validate(&store_ids(&stores)) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(NewItemTemplate::render_form(&session, user, form, errors, &stores)
                .await?
                .into_response());
        }
    };

    let item = ItemRepository::new(state.pool())
        .create(&input, user.id)
        .await?;

    tracing::info!(item_id = %item.id, store_id = %item.store_id, "Item created");
    add_breadcrumb(
        "item",
        "Created item",
        Some(&[("item_id", item.id.to_string().as_str())]),
    );

    push_flash(&session, format!("Successfully Created Item: {}", item.name)).await?;
    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Detail / Update
// =============================================================================

struct ItemPage {
    item: Item,
    stores: Vec<Store>,
    on_list: bool,
}

async fn load_item(state: &AppState, id: ItemId, user: &CurrentUser) -> Result<ItemPage> {
    let item = ItemRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {id}")))?;
    let stores = StoreRepository::new(state.pool()).list_all().await?;
    let on_list = ShoppingListRepository::new(state.pool())
        .contains(user.id, id)
        .await?;

    Ok(ItemPage {
        item,
        stores,
        on_list,
    })
}

impl ItemDetailTemplate {
    async fn render(
        session: &Session,
        user: CurrentUser,
        page: ItemPage,
        form: ItemForm,
        errors: FormErrors,
    ) -> Result<Self> {
        Ok(Self {
            can_edit: page.item.is_editable_by(user.id),
            layout: Layout::load(session, Some(user)).await?,
            categories: form.category_options(),
            stores: form.store_options(&page.stores),
            item: page.item,
            on_list: page.on_list,
            form,
            errors,
        })
    }
}

/// Display an item and the edit form.
#[instrument(skip_all, fields(item_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<ItemDetailTemplate> {
    let id: ItemId = parse_id(&id, "item")?;
    let page = load_item(&state, id, &user).await?;
    let form = ItemForm::from_item(&page.item);

    ItemDetailTemplate::render(&session, user, page, form, FormErrors::default()).await
}

/// Update an item, including moving it to another store.
///
/// Only the creator's edits are saved. A valid submission from anyone else
/// re-renders the page with the item unchanged.
#[instrument(skip_all, fields(item_id = %id, user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Form(form): Form<ItemForm>,
) -> Result<Response> {
    let id: ItemId = parse_id(&id, "item")?;
    let page = load_item(&state, id, &user).await?;

    let errors = match form.validate(&store_ids(&page.stores)) {
        Ok(input) if page.item.is_editable_by(user.id) => {
            let item = ItemRepository::new(state.pool()).update(id, &input).await?;

            tracing::info!(store_id = %item.store_id, "Item updated");
            push_flash(&session, format!("Successfully Updated Item: {}", item.name)).await?;
            return Ok(Redirect::to(&format!("/item/{}", item.id)).into_response());
        }
        Ok(_) => {
            tracing::info!("Ignoring item edit from non-creator");
            push_flash_error(&session, "You can only edit items you created.").await?;
            FormErrors::default()
        }
        Err(errors) => errors,
    };

    Ok(ItemDetailTemplate::render(&session, user, page, form, errors)
        .await?
        .into_response())
}
