//! Review workflow routes: proposals, bounties, and the contribution ledger.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::app_state::AppState;
use super::auth_context::AuthContext;
use super::error::ApiError;
use crate::models::{Bounty, BountyType, Contribution, EntityKind, Proposal, TargetRef};
use crate::services::CurationError;

/// Create the review router
pub fn review_router() -> Router<AppState> {
    Router::new()
        .route("/proposals", post(create_proposal))
        .route("/proposals/open", get(open_proposals))
        .route("/proposals/{id}", get(get_proposal))
        .route("/proposals/{id}/issue-bounty", post(issue_bounty))
        .route("/bounties", post(create_system_bounty))
        .route("/bounties/{id}", get(get_bounty))
        .route("/bounties/{id}/claim", post(claim_bounty))
        .route("/bounties/{id}/active", post(set_bounty_active))
        .route("/bounty-types", post(create_bounty_type))
        .route("/contributions", get(get_contributions))
}

#[derive(Deserialize, ToSchema)]
pub struct TargetRequest {
    /// Entity kind tag (list, list_item, topic)
    #[schema(value_type = String)]
    target_kind: EntityKind,
    target_id: Uuid,
}

impl TargetRequest {
    fn to_target(&self) -> TargetRef {
        TargetRef::new(self.target_kind, self.target_id)
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateProposalRequest {
    #[serde(flatten)]
    target: TargetRequest,
    message: String,
    #[serde(default)]
    suggested_reward_cents: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct IssueBountyRequest {
    reward_cents: i64,
    bounty_type_id: Option<Uuid>,
    date_expire: Option<DateTime<Utc>>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateBountyRequest {
    #[serde(flatten)]
    target: TargetRequest,
    reward_cents: i64,
    bounty_type_id: Option<Uuid>,
    date_expire: Option<DateTime<Utc>>,
}

#[derive(Deserialize, ToSchema)]
pub struct BountyActiveRequest {
    active: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateBountyTypeRequest {
    name: String,
    #[serde(default)]
    description: String,
}

/// Query parameters addressing a generic target.
#[derive(Deserialize, IntoParams)]
pub struct TargetQueryParams {
    kind: String,
    id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/v1/proposals",
    request_body = CreateProposalRequest,
    responses((status = 201), (status = 404, description = "Unknown target"))
)]
pub async fn create_proposal(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateProposalRequest>,
) -> Result<(StatusCode, Json<Proposal>), ApiError> {
    let proposal = state
        .review()
        .create_proposal(
            auth.user_id,
            request.target.to_target(),
            request.message,
            request.suggested_reward_cents,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(proposal)))
}

#[utoipa::path(
    get,
    path = "/api/v1/proposals/open",
    responses((status = 200, description = "Unfulfilled proposals, oldest first"))
)]
pub async fn open_proposals(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> Result<Json<Vec<Proposal>>, ApiError> {
    Ok(Json(state.review().open_proposals().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/proposals/{id}",
    responses((status = 200), (status = 404))
)]
pub async fn get_proposal(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Proposal>, ApiError> {
    Ok(Json(state.review().get_proposal(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/proposals/{id}/issue-bounty",
    request_body = IssueBountyRequest,
    responses(
        (status = 201, description = "Bounty created and linked"),
        (status = 403, description = "Not an editor for the target's topic"),
        (status = 409, description = "Proposal already fulfilled")
    )
)]
pub async fn issue_bounty(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<IssueBountyRequest>,
) -> Result<(StatusCode, Json<Bounty>), ApiError> {
    let bounty = state
        .review()
        .issue_bounty(
            auth.user_id,
            id,
            request.reward_cents,
            request.bounty_type_id,
            request.date_expire,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(bounty)))
}

#[utoipa::path(
    post,
    path = "/api/v1/bounties",
    request_body = CreateBountyRequest,
    responses((status = 201, description = "System-issued bounty"))
)]
pub async fn create_system_bounty(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(request): Json<CreateBountyRequest>,
) -> Result<(StatusCode, Json<Bounty>), ApiError> {
    let bounty = state
        .review()
        .create_system_bounty(
            request.target.to_target(),
            request.reward_cents,
            request.bounty_type_id,
            request.date_expire,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(bounty)))
}

#[utoipa::path(
    get,
    path = "/api/v1/bounties/{id}",
    responses((status = 200), (status = 404))
)]
pub async fn get_bounty(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Bounty>, ApiError> {
    Ok(Json(state.review().get_bounty(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/bounties/{id}/claim",
    responses(
        (status = 200, description = "Claimed"),
        (status = 409, description = "Already claimed"),
        (status = 410, description = "Past the deadline")
    )
)]
pub async fn claim_bounty(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Bounty>, ApiError> {
    Ok(Json(state.review().claim_bounty(auth.user_id, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/bounties/{id}/active",
    request_body = BountyActiveRequest,
    responses((status = 200), (status = 409, description = "Bounty already completed"))
)]
pub async fn set_bounty_active(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<BountyActiveRequest>,
) -> Result<Json<Bounty>, ApiError> {
    Ok(Json(
        state
            .review()
            .set_bounty_active(auth.user_id, id, request.active)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/bounty-types",
    request_body = CreateBountyTypeRequest,
    responses((status = 201))
)]
pub async fn create_bounty_type(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(request): Json<CreateBountyTypeRequest>,
) -> Result<(StatusCode, Json<BountyType>), ApiError> {
    let bounty_type = state
        .review()
        .create_bounty_type(request.name, request.description)
        .await?;
    Ok((StatusCode::CREATED, Json(bounty_type)))
}

#[utoipa::path(
    get,
    path = "/api/v1/contributions",
    params(TargetQueryParams),
    responses((status = 200, description = "Ledger rows for the target, oldest first"))
)]
pub async fn get_contributions(
    State(state): State<AppState>,
    Query(params): Query<TargetQueryParams>,
) -> Result<Json<Vec<Contribution>>, ApiError> {
    let kind = EntityKind::parse(&params.kind).ok_or_else(|| {
        ApiError::from(CurationError::validation(
            "kind",
            format!("unknown entity kind {}", params.kind),
        ))
    })?;
    let target = TargetRef::new(kind, params.id);
    Ok(Json(state.review().contributions(target).await?))
}
