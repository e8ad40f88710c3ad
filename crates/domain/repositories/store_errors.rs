use thiserror::Error;

/// Store failures callers need to tell apart from a generic error. Repository
/// implementations wrap these in `anyhow::Error`; use cases recover them with
/// `downcast_ref`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    Conflict(String),
}

impl StoreError {
    pub fn is_conflict(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Conflict(_))
        )
    }
}
