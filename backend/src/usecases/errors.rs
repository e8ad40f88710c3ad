use axum::http::StatusCode;
use directory_core::domain::{
    repositories::store_errors::StoreError,
    value_objects::status_transitions::TransitionError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("invalid webhook: {0}")]
    InvalidWebhook(String),
    #[error("{0}")]
    Misconfigured(String),
    #[error("payment provider request failed")]
    PaymentProvider(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl UseCaseError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UseCaseError::Validation(_) | UseCaseError::InvalidWebhook(_) => {
                StatusCode::BAD_REQUEST
            }
            UseCaseError::Conflict(_) => StatusCode::CONFLICT,
            UseCaseError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            UseCaseError::Forbidden(_) => StatusCode::FORBIDDEN,
            UseCaseError::NotFound(_) => StatusCode::NOT_FOUND,
            UseCaseError::Misconfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            UseCaseError::PaymentProvider(_) => StatusCode::BAD_GATEWAY,
            UseCaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps a store failure, keeping unique-key violations distinguishable.
    pub fn from_store(err: anyhow::Error, conflict_message: &str) -> Self {
        if StoreError::is_conflict(&err) {
            UseCaseError::Conflict(conflict_message.to_string())
        } else {
            UseCaseError::Internal(err)
        }
    }
}

impl From<TransitionError> for UseCaseError {
    fn from(err: TransitionError) -> Self {
        UseCaseError::Validation(err.to_string())
    }
}

pub type UseCaseResult<T> = std::result::Result<T, UseCaseError>;
