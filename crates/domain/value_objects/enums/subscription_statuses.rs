use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Local subscription taxonomy. Provider statuses without a local meaning are
/// kept verbatim (uppercased) in `Other`.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum SubscriptionStatus {
    #[default]
    Pending,
    Active,
    PastDue,
    Canceled,
    Unpaid,
    Other(String),
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SubscriptionStatus::Pending => "PENDING",
            SubscriptionStatus::Active => "ACTIVE",
            SubscriptionStatus::PastDue => "PAST_DUE",
            SubscriptionStatus::Canceled => "CANCELED",
            SubscriptionStatus::Unpaid => "UNPAID",
            SubscriptionStatus::Other(raw) => raw,
        }
    }

    /// Parses a stored status. Anything unrecognised is kept as `Other`.
    pub fn from_str(value: &str) -> Self {
        match value {
            "PENDING" => SubscriptionStatus::Pending,
            "ACTIVE" => SubscriptionStatus::Active,
            "PAST_DUE" => SubscriptionStatus::PastDue,
            "CANCELED" => SubscriptionStatus::Canceled,
            "UNPAID" => SubscriptionStatus::Unpaid,
            other => SubscriptionStatus::Other(other.to_string()),
        }
    }

    /// Maps a payment-provider subscription status onto the local taxonomy.
    pub fn from_provider(status: Option<&str>) -> Self {
        let Some(status) = status else {
            return SubscriptionStatus::Pending;
        };

        match status.to_ascii_uppercase().as_str() {
            "TRIALING" | "ACTIVE" => SubscriptionStatus::Active,
            "PAST_DUE" => SubscriptionStatus::PastDue,
            "CANCELED" | "CANCELLED" => SubscriptionStatus::Canceled,
            "UNPAID" => SubscriptionStatus::Unpaid,
            other => SubscriptionStatus::from_str(other),
        }
    }
}

impl Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SubscriptionStatus {
    fn from(value: String) -> Self {
        SubscriptionStatus::from_str(&value)
    }
}

impl From<SubscriptionStatus> for String {
    fn from(value: SubscriptionStatus) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_statuses_map_onto_local_taxonomy() {
        let cases = [
            ("trialing", SubscriptionStatus::Active),
            ("active", SubscriptionStatus::Active),
            ("past_due", SubscriptionStatus::PastDue),
            ("canceled", SubscriptionStatus::Canceled),
            ("cancelled", SubscriptionStatus::Canceled),
            ("unpaid", SubscriptionStatus::Unpaid),
        ];

        for (raw, expected) in cases {
            assert_eq!(SubscriptionStatus::from_provider(Some(raw)), expected, "{raw}");
        }
    }

    #[test]
    fn unknown_provider_status_is_uppercased_verbatim() {
        let status = SubscriptionStatus::from_provider(Some("incomplete_expired"));
        assert_eq!(
            status,
            SubscriptionStatus::Other("INCOMPLETE_EXPIRED".to_string())
        );
        assert_eq!(status.as_str(), "INCOMPLETE_EXPIRED");
    }

    #[test]
    fn missing_provider_status_is_pending() {
        assert_eq!(
            SubscriptionStatus::from_provider(None),
            SubscriptionStatus::Pending
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&SubscriptionStatus::PastDue).unwrap();
        assert_eq!(json, "\"PAST_DUE\"");
    }
}
