use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::subscriptions::SubscriptionEntity;
use crate::domain::value_objects::enums::plan_types::PlanType;

#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    pub plan_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionDto {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub plan_type: Option<String>,
    pub status: String,
    pub stripe_subscription_id: Option<String>,
    pub renewal_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubscriptionEntity> for SubscriptionDto {
    fn from(value: SubscriptionEntity) -> Self {
        Self {
            id: value.id,
            brand_id: value.brand_id,
            plan_type: value.plan_type,
            status: value.status,
            stripe_subscription_id: value.stripe_subscription_id,
            renewal_date: value.renewal_date,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Provider-hosted page the client should be sent to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedirectDto {
    pub url: String,
}

/// Payment-provider price ids per plan. Absent entries are a configuration gap
/// that surfaces when the plan is actually requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceLookup {
    pub monthly: Option<String>,
    pub annual: Option<String>,
}

impl PriceLookup {
    pub fn price_for(&self, plan: PlanType) -> Option<&str> {
        match plan {
            PlanType::Monthly => self.monthly.as_deref(),
            PlanType::Annual => self.annual.as_deref(),
        }
    }

    pub fn plan_for(&self, price_id: Option<&str>) -> Option<PlanType> {
        let price_id = price_id?;
        if self.monthly.as_deref() == Some(price_id) {
            Some(PlanType::Monthly)
        } else if self.annual.as_deref() == Some(price_id) {
            Some(PlanType::Annual)
        } else {
            None
        }
    }
}
