use thiserror::Error;

/// Raised by the status machines when a requested transition is not allowed
/// from the current state. Carries enough context for a caller-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action} {entity} in status {from}")]
pub struct TransitionError {
    pub entity: &'static str,
    pub action: &'static str,
    pub from: String,
}

impl TransitionError {
    pub fn new(entity: &'static str, action: &'static str, from: impl ToString) -> Self {
        Self {
            entity,
            action,
            from: from.to_string(),
        }
    }
}
