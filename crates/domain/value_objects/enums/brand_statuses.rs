use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::status_transitions::TransitionError;

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BrandStatus {
    #[default]
    PendingApproval,
    Active,
    Rejected,
    Inactive,
    ReactivationPending,
}

impl BrandStatus {
    pub const ALL: [BrandStatus; 5] = [
        BrandStatus::PendingApproval,
        BrandStatus::Active,
        BrandStatus::Rejected,
        BrandStatus::Inactive,
        BrandStatus::ReactivationPending,
    ];

    /// Statuses an admin reviews from the moderation queue.
    pub const AWAITING_REVIEW: [BrandStatus; 2] =
        [BrandStatus::PendingApproval, BrandStatus::ReactivationPending];

    pub fn as_str(&self) -> &'static str {
        match self {
            BrandStatus::PendingApproval => "PENDING_APPROVAL",
            BrandStatus::Active => "ACTIVE",
            BrandStatus::Rejected => "REJECTED",
            BrandStatus::Inactive => "INACTIVE",
            BrandStatus::ReactivationPending => "REACTIVATION_PENDING",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "PENDING_APPROVAL" => Some(BrandStatus::PendingApproval),
            "ACTIVE" => Some(BrandStatus::Active),
            "REJECTED" => Some(BrandStatus::Rejected),
            "INACTIVE" => Some(BrandStatus::Inactive),
            "REACTIVATION_PENDING" => Some(BrandStatus::ReactivationPending),
            _ => None,
        }
    }

    pub fn is_awaiting_review(&self) -> bool {
        Self::AWAITING_REVIEW.contains(self)
    }

    /// Rejected brands are locked out of the login surface.
    pub fn can_sign_in(&self) -> bool {
        *self != BrandStatus::Rejected
    }

    pub fn approve(self) -> Result<Self, TransitionError> {
        if self.is_awaiting_review() {
            Ok(BrandStatus::Active)
        } else {
            Err(TransitionError::new("brand", "approve", self))
        }
    }

    pub fn reject(self) -> Result<Self, TransitionError> {
        if self.is_awaiting_review() {
            Ok(BrandStatus::Rejected)
        } else {
            Err(TransitionError::new("brand", "reject", self))
        }
    }

    pub fn deactivate(self) -> Result<Self, TransitionError> {
        match self {
            BrandStatus::Active => Ok(BrandStatus::Inactive),
            other => Err(TransitionError::new("brand", "deactivate", other)),
        }
    }

    pub fn request_reactivation(self) -> Result<Self, TransitionError> {
        match self {
            BrandStatus::Inactive => Ok(BrandStatus::ReactivationPending),
            other => Err(TransitionError::new("brand", "request reactivation for", other)),
        }
    }
}

impl Display for BrandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Transition = fn(BrandStatus) -> Result<BrandStatus, TransitionError>;

    const TRANSITIONS: [Transition; 4] = [
        BrandStatus::approve,
        BrandStatus::reject,
        BrandStatus::deactivate,
        BrandStatus::request_reactivation,
    ];

    #[test]
    fn approve_is_valid_from_both_pending_states() {
        assert_eq!(
            BrandStatus::PendingApproval.approve(),
            Ok(BrandStatus::Active)
        );
        assert_eq!(
            BrandStatus::ReactivationPending.approve(),
            Ok(BrandStatus::Active)
        );
    }

    #[test]
    fn approve_and_reject_fail_outside_review_queue() {
        for status in [
            BrandStatus::Active,
            BrandStatus::Rejected,
            BrandStatus::Inactive,
        ] {
            assert!(status.approve().is_err(), "approve from {status}");
            assert!(status.reject().is_err(), "reject from {status}");
        }
    }

    #[test]
    fn reactivation_only_from_inactive() {
        assert_eq!(
            BrandStatus::Inactive.request_reactivation(),
            Ok(BrandStatus::ReactivationPending)
        );

        let err = BrandStatus::Active.request_reactivation().unwrap_err();
        assert_eq!(err.from, "ACTIVE");
    }

    #[test]
    fn deactivate_only_from_active() {
        assert_eq!(BrandStatus::Active.deactivate(), Ok(BrandStatus::Inactive));
        assert!(BrandStatus::PendingApproval.deactivate().is_err());
        assert!(BrandStatus::Inactive.deactivate().is_err());
    }

    #[test]
    fn rejected_is_terminal() {
        for transition in TRANSITIONS {
            assert!(transition(BrandStatus::Rejected).is_err());
        }
        assert!(!BrandStatus::Rejected.can_sign_in());
    }

    #[test]
    fn transitions_never_leave_the_status_set() {
        for status in BrandStatus::ALL {
            for transition in TRANSITIONS {
                if let Ok(next) = transition(status) {
                    assert!(BrandStatus::ALL.contains(&next));
                    assert_eq!(BrandStatus::from_str(next.as_str()), Some(next));
                }
            }
        }
    }

    #[test]
    fn unknown_text_is_not_a_status() {
        assert_eq!(BrandStatus::from_str("active"), None);
        assert_eq!(BrandStatus::from_str("SUSPENDED"), None);
    }
}
