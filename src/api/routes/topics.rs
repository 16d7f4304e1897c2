//! Topic hierarchy routes.
//!
//! Node and edge creation plus the traversal queries the search surface and
//! subscription scoping build on.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::app_state::AppState;
use super::auth_context::AuthContext;
use super::error::ApiError;
use crate::graph::TraversalRow;
use crate::models::{TopicEdge, TopicNode};

/// Create the topics router
pub fn topics_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_topic))
        .route("/edges", post(create_edge))
        .route("/{id}", get(get_topic))
        .route("/{id}", delete(delete_topic))
        .route("/{id}/descendants", get(get_descendants))
        .route("/{id}/ancestors", get(get_ancestors))
}

#[derive(Deserialize, ToSchema)]
pub struct CreateTopicRequest {
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateEdgeRequest {
    parent_id: Uuid,
    child_id: Uuid,
    #[serde(default)]
    description: String,
}

/// Topic node with its position in the hierarchy.
#[derive(Serialize, ToSchema)]
pub struct TopicResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_root: bool,
    pub is_leaf: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct EdgeResponse {
    pub parent_id: Uuid,
    pub child_id: Uuid,
    pub description: String,
}

/// One row of a traversal: the node, its depth, and the path from the
/// queried node.
#[derive(Serialize, ToSchema)]
pub struct TraversalRowResponse {
    pub id: Uuid,
    pub level: u32,
    pub path: Vec<Uuid>,
}

#[derive(Serialize, ToSchema)]
pub struct TraversalResponse {
    pub rows: Vec<TraversalRowResponse>,
}

impl From<TraversalRow> for TraversalRowResponse {
    fn from(row: TraversalRow) -> Self {
        Self {
            id: row.id,
            level: row.level,
            path: row.path,
        }
    }
}

fn topic_response(topic: TopicNode, is_root: bool, is_leaf: bool) -> TopicResponse {
    TopicResponse {
        id: topic.id,
        name: topic.name,
        description: topic.description,
        is_root,
        is_leaf,
        created_at: topic.created_at,
        updated_at: topic.updated_at,
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/topics",
    request_body = CreateTopicRequest,
    responses((status = 201, body = TopicResponse), (status = 422, description = "Invalid name"))
)]
pub async fn create_topic(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(request): Json<CreateTopicRequest>,
) -> Result<(StatusCode, Json<TopicResponse>), ApiError> {
    let topic = state
        .topics()
        .create_topic(request.name, request.description)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(topic_response(topic, false, false)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/topics/{id}",
    responses((status = 200, body = TopicResponse), (status = 404, description = "Unknown topic"))
)]
pub async fn get_topic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TopicResponse>, ApiError> {
    let topics = state.topics();
    let topic = topics.get_topic(id).await?;
    let is_root = topics.is_root(id).await?;
    let is_leaf = topics.is_leaf(id).await?;
    Ok(Json(topic_response(topic, is_root, is_leaf)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/topics/{id}",
    responses((status = 204), (status = 404, description = "Unknown topic"))
)]
pub async fn delete_topic(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.topics().delete_topic(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/topics/edges",
    request_body = CreateEdgeRequest,
    responses(
        (status = 201, body = EdgeResponse),
        (status = 422, description = "Self-loop or cycle"),
        (status = 404, description = "Unknown endpoint node")
    )
)]
pub async fn create_edge(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(request): Json<CreateEdgeRequest>,
) -> Result<(StatusCode, Json<EdgeResponse>), ApiError> {
    let edge: TopicEdge = state
        .topics()
        .create_edge(request.parent_id, request.child_id, request.description)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(EdgeResponse {
            parent_id: edge.parent_id,
            child_id: edge.child_id,
            description: edge.description,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/topics/{id}/descendants",
    responses((status = 200, body = TraversalResponse), (status = 404, description = "Unknown topic"))
)]
pub async fn get_descendants(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TraversalResponse>, ApiError> {
    let rows = state.topics().descendants(id).await?;
    Ok(Json(TraversalResponse {
        rows: rows.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/topics/{id}/ancestors",
    responses((status = 200, body = TraversalResponse), (status = 404, description = "Unknown topic"))
)]
pub async fn get_ancestors(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TraversalResponse>, ApiError> {
    let rows = state.topics().ancestors(id).await?;
    Ok(Json(TraversalResponse {
        rows: rows.into_iter().map(Into::into).collect(),
    }))
}
