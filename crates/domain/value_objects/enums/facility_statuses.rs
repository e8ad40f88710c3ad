use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FacilityStatus {
    #[default]
    PendingReview,
    Approved,
    Rejected,
}

/// Admin moderation outcome for a facility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModerationDecision {
    Approve,
    Reject,
}

impl FacilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityStatus::PendingReview => "PENDING_REVIEW",
            FacilityStatus::Approved => "APPROVED",
            FacilityStatus::Rejected => "REJECTED",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "PENDING_REVIEW" => Some(FacilityStatus::PendingReview),
            "APPROVED" => Some(FacilityStatus::Approved),
            "REJECTED" => Some(FacilityStatus::Rejected),
            _ => None,
        }
    }

    /// Moderation applies the target state regardless of the current one.
    pub fn moderate(self, decision: ModerationDecision) -> Self {
        match decision {
            ModerationDecision::Approve => FacilityStatus::Approved,
            ModerationDecision::Reject => FacilityStatus::Rejected,
        }
    }

    /// Owners may only edit facilities that are not yet published.
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            FacilityStatus::PendingReview | FacilityStatus::Rejected
        )
    }
}

impl Display for FacilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for ModerationDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModerationDecision::Approve => f.write_str("approve"),
            ModerationDecision::Reject => f.write_str("reject"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moderation_sets_target_from_any_state() {
        for status in [
            FacilityStatus::PendingReview,
            FacilityStatus::Approved,
            FacilityStatus::Rejected,
        ] {
            assert_eq!(
                status.moderate(ModerationDecision::Approve),
                FacilityStatus::Approved
            );
            assert_eq!(
                status.moderate(ModerationDecision::Reject),
                FacilityStatus::Rejected
            );
        }
    }

    #[test]
    fn approved_facilities_are_locked_for_edits() {
        assert!(FacilityStatus::PendingReview.is_editable());
        assert!(FacilityStatus::Rejected.is_editable());
        assert!(!FacilityStatus::Approved.is_editable());
    }
}
