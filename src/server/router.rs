//! Route tables

use crate::server::handlers::{
    AppState, add_form, add_item, edit_form, edit_item, get_item, list_items,
};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

/// Build the item form routes
///
/// - GET /validation/items - List items
/// - GET /validation/items/add - Empty add form
/// - POST /validation/items/add - Validate and save
/// - GET /validation/items/{item_id} - One item
/// - GET /validation/items/{item_id}/edit - Edit form
/// - POST /validation/items/{item_id}/edit - Validate and update
pub fn build_item_routes(state: AppState) -> Router {
    Router::new()
        .route("/validation/items", get(list_items))
        .route("/validation/items/add", get(add_form).post(add_item))
        .route("/validation/items/{item_id}", get(get_item))
        .route(
            "/validation/items/{item_id}/edit",
            get(edit_form).post(edit_item),
        )
        .with_state(state)
}

/// Build health check routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "item-validation"
    }))
}
