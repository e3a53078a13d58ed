//! HTTP handlers for the item forms
//!
//! Each submission is bound, run through the pipeline for its operation and
//! either persisted or answered with the submitted values and the resolved
//! messages, so a client can re-render the form as it was typed.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::binding::{BoundForm, FormValues, FromForm};
use crate::core::error::{EntityError, ItemServiceResult, RequestError};
use crate::core::messages::{MessageCatalog, RenderedErrors};
use crate::core::service::ItemRepository;
use crate::core::validation::{ValidationFailure, ValidationPipeline};
use crate::entities::Item;
use crate::server::extractor::SubmittedForm;

/// Base path of the item routes
pub const ITEMS_PATH: &str = "/validation/items";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ItemRepository>,
    pub catalog: Arc<MessageCatalog>,
    /// Pipeline for new items (`Save` group)
    pub save_pipeline: ValidationPipeline<Item>,
    /// Pipeline for edits (`Update` group)
    pub update_pipeline: ValidationPipeline<Item>,
}

#[derive(Debug, Serialize)]
pub struct ListItemsResponse {
    pub items: Vec<Item>,
    pub count: usize,
}

/// A single item, as shown on the detail page or in an edit form
#[derive(Debug, Serialize)]
pub struct ItemView {
    pub item: Item,
    /// Set after a successful save
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

/// A rejected submission
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedForm {
    /// Values that bound successfully
    pub item: Item,
    /// Raw values as submitted, including text that failed to convert
    pub submitted: FormValues,
    pub errors: RenderedErrors,
    pub violations: Vec<ValidationFailure>,
}

enum Outcome {
    Accepted(Item),
    Rejected(Box<RejectedForm>),
}

fn parse_item_id(item_id: &str) -> ItemServiceResult<Uuid> {
    Uuid::parse_str(item_id).map_err(|_| {
        RequestError::InvalidItemId {
            id: item_id.to_string(),
        }
        .into()
    })
}

async fn load_item(state: &AppState, id: Uuid) -> ItemServiceResult<Item> {
    let item = state
        .repository
        .find_by_id(&id)
        .await?
        .ok_or(EntityError::NotFound { id })?;
    Ok(item)
}

fn check(
    pipeline: &ValidationPipeline<Item>,
    catalog: &MessageCatalog,
    form: FormValues,
) -> Outcome {
    let BoundForm { target, errors } = Item::from_form(&form);

    let rejection = {
        let outcome = pipeline.evaluate(&target, errors);
        if outcome.is_rejected() {
            tracing::debug!("errors = {}", outcome.errors);
            Some((
                catalog.render(&outcome.errors),
                outcome.errors.into_errors(),
            ))
        } else {
            None
        }
    };

    match rejection {
        None => Outcome::Accepted(target),
        Some((errors, violations)) => Outcome::Rejected(Box::new(RejectedForm {
            item: target,
            submitted: form,
            errors,
            violations,
        })),
    }
}

/// List all items
pub async fn list_items(State(state): State<AppState>) -> ItemServiceResult<Json<ListItemsResponse>> {
    let items = state.repository.find_all().await?;
    let count = items.len();
    Ok(Json(ListItemsResponse { items, count }))
}

/// Empty model for the add form
pub async fn add_form() -> Json<ItemView> {
    Json(ItemView {
        item: Item::default(),
        status: None,
    })
}

/// Validate and save a new item
pub async fn add_item(
    State(state): State<AppState>,
    SubmittedForm(form): SubmittedForm,
) -> ItemServiceResult<Response> {
    let item = match check(&state.save_pipeline, &state.catalog, form) {
        Outcome::Accepted(item) => item,
        Outcome::Rejected(rejected) => {
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(rejected)).into_response());
        }
    };

    let saved = state
        .repository
        .save(Item {
            id: None,
            ..item
        })
        .await?;
    let location = saved
        .id
        .map(|id| format!("{}/{}", ITEMS_PATH, id))
        .unwrap_or_else(|| ITEMS_PATH.to_string());

    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(ItemView {
            item: saved,
            status: Some(true),
        }),
    )
        .into_response())
}

/// Get one item
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> ItemServiceResult<Json<ItemView>> {
    let id = parse_item_id(&item_id)?;
    let item = load_item(&state, id).await?;
    Ok(Json(ItemView { item, status: None }))
}

/// Current values for the edit form
pub async fn edit_form(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> ItemServiceResult<Json<ItemView>> {
    get_item(State(state), Path(item_id)).await
}

/// Validate and apply an edit
pub async fn edit_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    SubmittedForm(form): SubmittedForm,
) -> ItemServiceResult<Response> {
    let id = parse_item_id(&item_id)?;
    load_item(&state, id).await?;

    let item = match check(&state.update_pipeline, &state.catalog, form) {
        Outcome::Accepted(item) => item,
        Outcome::Rejected(rejected) => {
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(rejected)).into_response());
        }
    };

    state.repository.update(&id, item).await?;
    let updated = load_item(&state, id).await?;

    Ok(Json(ItemView {
        item: updated,
        status: None,
    })
    .into_response())
}
