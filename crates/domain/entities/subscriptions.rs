use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::value_objects::enums::{
    plan_types::PlanType, subscription_statuses::SubscriptionStatus,
};
use crate::domain::entities::invoices::InsertInvoiceEntity;
use crate::infra::db::postgres::schema::subscriptions;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscriptions)]
pub struct SubscriptionEntity {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub plan_type: Option<String>,
    pub status: String,
    pub stripe_subscription_id: Option<String>,
    pub renewal_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionEntity {
    pub fn plan(&self) -> Option<PlanType> {
        self.plan_type.as_deref().and_then(PlanType::from_str)
    }

    pub fn subscription_status(&self) -> SubscriptionStatus {
        SubscriptionStatus::from_str(&self.status)
    }
}

/// Full row image used for the per-brand upsert.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = subscriptions)]
pub struct UpsertSubscriptionEntity {
    pub brand_id: Uuid,
    pub plan_type: Option<String>,
    pub status: String,
    pub stripe_subscription_id: Option<String>,
    pub renewal_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One self-managed billing step: the invoice to issue and the renewal move
/// that must commit with it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenewalChargeEntity {
    pub subscription_id: Uuid,
    pub expected_renewal: DateTime<Utc>,
    pub new_renewal: DateTime<Utc>,
    pub invoice: InsertInvoiceEntity,
}
