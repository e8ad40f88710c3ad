use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One subscription billed by a self-managed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BilledSubscription {
    pub brand_id: Uuid,
    pub subscription_id: Uuid,
    pub new_renewal: DateTime<Utc>,
}

/// A due subscription whose charge could not be written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedCharge {
    pub brand_id: Uuid,
    pub subscription_id: Uuid,
}

/// Manifest of a billing run. `details` lists committed subscriptions only;
/// `failed` lists the ones left due for the next run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingRunSummary {
    pub processed: usize,
    pub details: Vec<BilledSubscription>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<FailedCharge>,
}

impl BillingRunSummary {
    pub fn new(details: Vec<BilledSubscription>, failed: Vec<FailedCharge>) -> Self {
        Self {
            processed: details.len(),
            details,
            failed,
        }
    }
}
