//! Route definitions and handlers
//!
//! - `GET    /store/{key}`: JSON-encoded value, or 404
//! - `PUT    /store/{key}`: store the JSON body verbatim (POST accepted too)
//! - `DELETE /store/{key}`: remove; 404 for an absent key only when the
//!   store is configured with strict deletes
//! - `GET    /health`: static liveness response

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::engine::Store;

/// Shared handler state: the one store instance
pub type SharedStore = Arc<Store>;

/// Build the complete router with all routes and shared state
pub fn create_router(store: SharedStore) -> Router {
    Router::new()
        .route(
            "/store/{key}",
            get(get_value)
                .put(set_value)
                .post(set_value)
                .delete(delete_value),
        )
        .route("/health", get(health))
        .with_state(store)
}

/// GET /store/{key}
async fn get_value(State(store): State<SharedStore>, Path(key): Path<String>) -> impl IntoResponse {
    match store.get(&key) {
        Some(value) => Json(value).into_response(),
        None => not_found(),
    }
}

/// PUT or POST /store/{key}
///
/// The body is any JSON value (string, number, boolean, null, array,
/// object); it is stored verbatim. A malformed body is rejected by the
/// extractor before this handler runs.
async fn set_value(
    State(store): State<SharedStore>,
    Path(key): Path<String>,
    Json(value): Json<Value>,
) -> impl IntoResponse {
    store.set(key, value);
    Json(serde_json::json!({ "status": "ok" }))
}

/// DELETE /store/{key}
async fn delete_value(
    State(store): State<SharedStore>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    let removed = store.delete(&key);
    if !removed && store.config().strict_delete {
        return not_found();
    }
    Json(serde_json::json!({ "status": "ok" })).into_response()
}

/// Health check handler. Returns 200 OK with a simple JSON body.
async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "key not found" })),
    )
        .into_response()
}
