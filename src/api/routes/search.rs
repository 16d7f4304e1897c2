//! Published-list search route.
//!
//! Title substring plus topic filter with descendant expansion, newest
//! first. Open to unauthenticated callers — only published, active lists
//! come back.

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::app_state::AppState;
use super::error::ApiError;
use crate::services::SearchHit;

/// Create the search router
pub fn search_router() -> Router<AppState> {
    Router::new().route("/search", get(search_lists))
}

/// Query parameters for list search
#[derive(Deserialize, IntoParams)]
pub struct SearchParams {
    /// Title substring to match
    title: Option<String>,
    /// Topic name substring; expands to the topic's descendants
    topic: Option<String>,
    /// Result cap (default: 10)
    limit: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct SearchHitResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub topic_id: Option<Uuid>,
    pub topic_name: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SearchResponse {
    pub lists: Vec<SearchHitResponse>,
}

impl From<SearchHit> for SearchHitResponse {
    fn from(hit: SearchHit) -> Self {
        Self {
            id: hit.list.id,
            title: hit.list.title,
            description: hit.list.description,
            created_at: hit.list.created_at,
            topic_id: hit.list.topic_id,
            topic_name: hit.topic_name,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/lists/search",
    params(SearchParams),
    responses((status = 200, body = SearchResponse))
)]
pub async fn search_lists(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let hits = state
        .search()
        .search_lists(params.title.as_deref(), params.topic.as_deref(), params.limit)
        .await?;
    Ok(Json(SearchResponse {
        lists: hits.into_iter().map(Into::into).collect(),
    }))
}
