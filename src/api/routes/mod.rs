//! API routes module - organizes all route handlers.

pub mod app_state;
pub mod auth_context;
pub mod error;
pub mod lists;
pub mod profiles;
pub mod review;
pub mod search;
pub mod topics;

use axum::{Router, response::Json, routing::get};

pub use app_state::AppState;

use crate::storage::StorageError;

/// Create the main API router combining all route modules.
///
/// State is applied by callers (e.g. TestServer). For production use, call
/// `.with_state(app_state)` after creating the router.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/topics", topics::topics_router())
        .nest("/lists", search::search_router().merge(lists::lists_router()))
        .merge(review::review_router())
        .merge(profiles::profiles_router())
        .route("/health", get(health))
        .route("/openapi.json", get(openapi_json))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "list-curation-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Create application state over an in-memory store.
///
/// For a persistent store, use `AppState::with_database` instead.
pub fn create_app_state() -> Result<AppState, StorageError> {
    AppState::in_memory()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    Json(super::openapi::ApiDoc::openapi())
}
