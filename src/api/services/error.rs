//! Domain error taxonomy for the curation workflows.

use crate::models::ListStatus;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the workflow services.
///
/// Every operation either applies its full effect or none: an error result
/// never leaves a partially applied transition behind.
#[derive(Error, Debug)]
pub enum CurationError {
    /// Malformed input, rejected before any mutation.
    #[error("validation failed on {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Actor lacks the required role for the target state or topic scope.
    #[error("forbidden")]
    Forbidden,

    /// The requested event is not defined from the list's current state.
    #[error("cannot {event} a {from} list")]
    InvalidTransition {
        from: ListStatus,
        event: &'static str,
    },

    /// Lost a race on a guarded update. Retryable at the caller's choice.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Bounty claim attempted past its deadline.
    #[error("expired")]
    Expired,

    /// Fault in the underlying store.
    #[error(transparent)]
    Storage(StorageError),
}

impl CurationError {
    pub fn validation(field: &'static str, message: impl ToString) -> Self {
        CurationError::Validation {
            field,
            message: message.to_string(),
        }
    }

    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        CurationError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(reason: impl ToString) -> Self {
        CurationError::Conflict(reason.to_string())
    }
}

impl From<StorageError> for CurationError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound {
                entity_type,
                entity_id,
            } => CurationError::NotFound {
                entity: entity_type,
                id: entity_id,
            },
            StorageError::Conflict { reason, .. } => CurationError::Conflict(reason),
            other => CurationError::Storage(other),
        }
    }
}
