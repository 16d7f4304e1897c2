//! API error handling utilities.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::services::CurationError;

/// API error response
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.message,
            "status": self.status.as_u16(),
        });

        (self.status, axum::Json(body)).into_response()
    }
}

impl From<CurationError> for ApiError {
    fn from(err: CurationError) -> Self {
        let status = match &err {
            CurationError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CurationError::Forbidden => StatusCode::FORBIDDEN,
            CurationError::InvalidTransition { .. } => StatusCode::CONFLICT,
            CurationError::Conflict(_) => StatusCode::CONFLICT,
            CurationError::NotFound { .. } => StatusCode::NOT_FOUND,
            CurationError::Expired => StatusCode::GONE,
            CurationError::Storage(inner) => {
                tracing::error!("storage failure: {inner}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        ApiError {
            status,
            message: err.to_string(),
        }
    }
}
