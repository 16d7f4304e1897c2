//! List routes: content CRUD, items, comments, favourites, and the
//! editorial state-machine transitions.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::app_state::AppState;
use super::auth_context::{AuthContext, MaybeActor};
use super::error::ApiError;
use crate::models::{FavoriteList, List, ListComment, ListItem};

/// Create the lists router
pub fn lists_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_list))
        .route("/{id}", get(get_list))
        .route("/{id}", put(update_list))
        .route("/{id}", delete(delete_list))
        .route("/{id}/active", post(set_active))
        // state machine
        .route("/{id}/submit", post(submit_list))
        .route("/{id}/claim", post(claim_list))
        .route("/{id}/release", post(release_list))
        .route("/{id}/return", post(return_list))
        .route("/{id}/publish", post(publish_list))
        .route("/{id}/clone", post(clone_list))
        // items
        .route("/{id}/items", get(get_items))
        .route("/{id}/items", post(create_item))
        .route("/{id}/items/reorder", put(reorder_items))
        .route("/items/{item_id}", put(update_item))
        .route("/items/{item_id}", delete(delete_item))
        // comments
        .route("/{id}/comments", get(get_comments))
        .route("/{id}/comments", post(add_comment))
        // favourites
        .route("/{id}/favorite", post(add_favorite))
        .route("/{id}/favorite", delete(remove_favorite))
}

#[derive(Deserialize, ToSchema)]
pub struct CreateListRequest {
    title: String,
    #[serde(default)]
    description: String,
    topic_id: Option<Uuid>,
}

#[derive(Deserialize, ToSchema)]
pub struct SetActiveRequest {
    active: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateItemRequest {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    deep_dive: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    deep_dive: String,
    #[serde(default = "default_true")]
    active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, ToSchema)]
pub struct ReorderRequest {
    item_ids: Vec<Uuid>,
}

#[derive(Deserialize, ToSchema)]
pub struct CommentRequest {
    message: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/lists",
    request_body = CreateListRequest,
    responses((status = 201, description = "List created as draft"))
)]
pub async fn create_list(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateListRequest>,
) -> Result<(StatusCode, Json<List>), ApiError> {
    let list = state
        .lifecycle()
        .create_list(auth.user_id, request.title, request.description, request.topic_id)
        .await?;
    Ok((StatusCode::CREATED, Json(list)))
}

#[utoipa::path(
    get,
    path = "/api/v1/lists/{id}",
    responses((status = 200), (status = 404, description = "Unknown or not visible"))
)]
pub async fn get_list(
    State(state): State<AppState>,
    MaybeActor(actor): MaybeActor,
    Path(id): Path<Uuid>,
) -> Result<Json<List>, ApiError> {
    Ok(Json(state.lifecycle().get_list(actor, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/lists/{id}",
    request_body = CreateListRequest,
    responses((status = 200), (status = 403, description = "Not the creator or not a draft"))
)]
pub async fn update_list(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateListRequest>,
) -> Result<Json<List>, ApiError> {
    let list = state
        .lifecycle()
        .update_list(auth.user_id, id, request.title, request.description, request.topic_id)
        .await?;
    Ok(Json(list))
}

#[utoipa::path(
    delete,
    path = "/api/v1/lists/{id}",
    responses((status = 204), (status = 403, description = "Not the creator or not a draft"))
)]
pub async fn delete_list(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.lifecycle().delete_list(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/lists/{id}/active",
    request_body = SetActiveRequest,
    responses((status = 200))
)]
pub async fn set_active(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<List>, ApiError> {
    Ok(Json(
        state
            .lifecycle()
            .set_active(auth.user_id, id, request.active)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/lists/{id}/submit",
    responses((status = 200), (status = 403), (status = 409, description = "Not a draft"))
)]
pub async fn submit_list(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<List>, ApiError> {
    Ok(Json(state.lifecycle().submit(auth.user_id, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/lists/{id}/claim",
    responses(
        (status = 200),
        (status = 403, description = "Not an editor for the topic"),
        (status = 409, description = "Already locked")
    )
)]
pub async fn claim_list(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<List>, ApiError> {
    Ok(Json(state.lifecycle().claim(auth.user_id, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/lists/{id}/release",
    responses((status = 200), (status = 403, description = "Not the lock holder"))
)]
pub async fn release_list(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<List>, ApiError> {
    Ok(Json(state.lifecycle().release(auth.user_id, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/lists/{id}/return",
    responses((status = 200), (status = 409, description = "Locked for review"))
)]
pub async fn return_list(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<List>, ApiError> {
    Ok(Json(state.lifecycle().return_to_draft(auth.user_id, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/lists/{id}/publish",
    responses((status = 200), (status = 403, description = "Not the lock holder"))
)]
pub async fn publish_list(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<List>, ApiError> {
    Ok(Json(state.lifecycle().publish(auth.user_id, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/lists/{id}/clone",
    responses((status = 201, description = "New draft with bumped version"))
)]
pub async fn clone_list(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<List>), ApiError> {
    let clone = state.lifecycle().clone_list(auth.user_id, id).await?;
    Ok((StatusCode::CREATED, Json(clone)))
}

#[utoipa::path(
    get,
    path = "/api/v1/lists/{id}/items",
    responses((status = 200), (status = 404, description = "Unknown or not visible"))
)]
pub async fn get_items(
    State(state): State<AppState>,
    MaybeActor(actor): MaybeActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ListItem>>, ApiError> {
    Ok(Json(state.lifecycle().items(actor, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/lists/{id}/items",
    request_body = CreateItemRequest,
    responses((status = 201))
)]
pub async fn create_item(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ListItem>), ApiError> {
    let item = state
        .lifecycle()
        .add_item(auth.user_id, id, request.title, request.description, request.deep_dive)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/api/v1/lists/{id}/items/reorder",
    request_body = ReorderRequest,
    responses((status = 200), (status = 422, description = "Ordering is not a permutation"))
)]
pub async fn reorder_items(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<Vec<ListItem>>, ApiError> {
    Ok(Json(
        state
            .lifecycle()
            .reorder_items(auth.user_id, id, request.item_ids)
            .await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/lists/items/{item_id}",
    request_body = UpdateItemRequest,
    responses((status = 200))
)]
pub async fn update_item(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(item_id): Path<Uuid>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<ListItem>, ApiError> {
    let item = state
        .lifecycle()
        .update_item(
            auth.user_id,
            item_id,
            request.title,
            request.description,
            request.deep_dive,
            request.active,
        )
        .await?;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/api/v1/lists/items/{item_id}",
    responses((status = 204))
)]
pub async fn delete_item(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.lifecycle().delete_item(auth.user_id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/lists/{id}/comments",
    responses((status = 200))
)]
pub async fn get_comments(
    State(state): State<AppState>,
    MaybeActor(actor): MaybeActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ListComment>>, ApiError> {
    Ok(Json(state.lifecycle().comments(actor, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/lists/{id}/comments",
    request_body = CommentRequest,
    responses((status = 201))
)]
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<CommentRequest>,
) -> Result<(StatusCode, Json<ListComment>), ApiError> {
    let comment = state
        .lifecycle()
        .add_comment(auth.user_id, id, request.message)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    post,
    path = "/api/v1/lists/{id}/favorite",
    responses((status = 201))
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<FavoriteList>), ApiError> {
    let favorite = state.lifecycle().add_favorite(auth.user_id, id).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/lists/{id}/favorite",
    responses((status = 204))
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.lifecycle().remove_favorite(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
