//! Authentication context utilities.
//!
//! The external identity collaborator authenticates requests upstream and
//! forwards the opaque user id in the `x-user-id` header. These extractors
//! read it; there is no session or token handling here.

use super::app_state::AppState;
use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};
use uuid::Uuid;

const USER_ID_HEADER: &str = "x-user-id";

fn actor_from_parts(parts: &Parts) -> Result<Option<Uuid>, StatusCode> {
    let Some(raw) = parts.headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    let raw = raw.to_str().map_err(|_| StatusCode::BAD_REQUEST)?;
    let user_id = Uuid::parse_str(raw).map_err(|_| {
        tracing::warn!("malformed {USER_ID_HEADER} header");
        StatusCode::BAD_REQUEST
    })?;
    Ok(Some(user_id))
}

/// Authenticated actor. Rejects the request when no identity was supplied.
#[derive(Clone, Copy, Debug)]
pub struct AuthContext {
    pub user_id: Uuid,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match actor_from_parts(parts)? {
            Some(user_id) => Ok(AuthContext { user_id }),
            None => {
                tracing::warn!("no user identity supplied");
                Err(StatusCode::UNAUTHORIZED)
            }
        }
    }
}

/// Possibly-anonymous actor for read paths: unauthenticated requests are
/// restricted to published-list reads by the services.
#[derive(Clone, Copy, Debug)]
pub struct MaybeActor(pub Option<Uuid>);

impl FromRequestParts<AppState> for MaybeActor {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeActor(actor_from_parts(parts)?))
    }
}
