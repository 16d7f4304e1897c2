//! Profile, group and subscription routes.
//!
//! Profiles are keyed by the opaque identity the auth collaborator supplies.
//! Group and subscription management is the thin administrative surface the
//! subscription-access checks depend on.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::app_state::AppState;
use super::auth_context::AuthContext;
use super::error::ApiError;
use crate::models::{FavoriteList, GroupMember, Person, SubscriberGroup, Subscription};
use crate::services::CurationError;

/// Create the profiles router
pub fn profiles_router() -> Router<AppState> {
    Router::new()
        .route("/profiles/me", put(upsert_profile))
        .route("/profiles/me/friends/{id}", post(add_friend))
        .route("/profiles/me/friends", get(get_friends))
        .route("/profiles/me/favorites", get(get_favorites))
        .route("/profiles/{id}", get(get_profile))
        .route("/groups", post(create_group))
        .route("/groups/{id}/members/{person_id}", post(add_group_member))
        .route("/subscriptions", post(create_subscription))
}

#[derive(Deserialize, ToSchema)]
pub struct ProfileRequest {
    #[serde(default)]
    degrees: String,
    #[serde(default)]
    job_title: String,
    #[serde(default)]
    personal_description: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    name: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateSubscriptionRequest {
    group_id: Uuid,
    topic_id: Uuid,
    #[serde(default)]
    edit_power: bool,
    #[serde(default)]
    price_cents: i64,
    date_expire: Option<DateTime<Utc>>,
}

#[utoipa::path(
    put,
    path = "/api/v1/profiles/me",
    request_body = ProfileRequest,
    responses((status = 200, description = "Profile created or updated"))
)]
pub async fn upsert_profile(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<Person>, ApiError> {
    let person = state
        .store
        .upsert_person(
            auth.user_id,
            request.degrees,
            request.job_title,
            request.personal_description,
        )
        .await
        .map_err(CurationError::from)?;
    Ok(Json(person))
}

#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}",
    responses((status = 200), (status = 404))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError> {
    let person = state
        .store
        .get_person(id)
        .await
        .map_err(CurationError::from)?
        .ok_or_else(|| CurationError::not_found("person", id))?;
    Ok(Json(person))
}

#[utoipa::path(
    post,
    path = "/api/v1/profiles/me/friends/{id}",
    responses((status = 204), (status = 422, description = "Cannot befriend yourself"))
)]
pub async fn add_friend(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if id == auth.user_id {
        return Err(CurationError::validation("id", "cannot befriend yourself").into());
    }
    state
        .store
        .add_friend(auth.user_id, id)
        .await
        .map_err(CurationError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/profiles/me/friends",
    responses((status = 200))
)]
pub async fn get_friends(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Uuid>>, ApiError> {
    let friends = state
        .store
        .friends_of(auth.user_id)
        .await
        .map_err(CurationError::from)?;
    Ok(Json(friends))
}

#[utoipa::path(
    get,
    path = "/api/v1/profiles/me/favorites",
    responses((status = 200))
)]
pub async fn get_favorites(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<FavoriteList>>, ApiError> {
    Ok(Json(state.lifecycle().favorites(auth.user_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/groups",
    request_body = CreateGroupRequest,
    responses((status = 201), (status = 409, description = "Name taken"))
)]
pub async fn create_group(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<SubscriberGroup>), ApiError> {
    if request.name.trim().is_empty() {
        return Err(CurationError::validation("name", "name must not be empty").into());
    }
    let group = state
        .store
        .create_group(request.name)
        .await
        .map_err(CurationError::from)?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    post,
    path = "/api/v1/groups/{id}/members/{person_id}",
    responses((status = 201))
)]
pub async fn add_group_member(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path((id, person_id)): Path<(Uuid, Uuid)>,
) -> Result<(StatusCode, Json<GroupMember>), ApiError> {
    // Membership needs a profile row on the person side.
    if state
        .store
        .get_person(person_id)
        .await
        .map_err(CurationError::from)?
        .is_none()
    {
        state
            .store
            .upsert_person(person_id, String::new(), String::new(), String::new())
            .await
            .map_err(CurationError::from)?;
    }
    let member = state
        .store
        .add_group_member(person_id, id)
        .await
        .map_err(CurationError::from)?;
    Ok((StatusCode::CREATED, Json(member)))
}

#[utoipa::path(
    post,
    path = "/api/v1/subscriptions",
    request_body = CreateSubscriptionRequest,
    responses((status = 201), (status = 409, description = "Unknown group or topic"))
)]
pub async fn create_subscription(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<Subscription>), ApiError> {
    if request.price_cents < 0 {
        return Err(CurationError::validation("price_cents", "price must not be negative").into());
    }
    let subscription = state
        .store
        .create_subscription(
            request.group_id,
            request.topic_id,
            request.edit_power,
            request.price_cents,
            request.date_expire,
        )
        .await
        .map_err(CurationError::from)?;
    Ok((StatusCode::CREATED, Json(subscription)))
}
