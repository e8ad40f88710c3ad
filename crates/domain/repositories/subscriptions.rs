use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::subscriptions::{
    RenewalChargeEntity, SubscriptionEntity, UpsertSubscriptionEntity,
};
use crate::domain::value_objects::enums::plan_types::PlanType;

#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    async fn find_by_brand(&self, brand_id: Uuid) -> Result<Option<SubscriptionEntity>>;

    /// Inserts or overwrites the single subscription row of a brand. The
    /// external subscription reference is left untouched.
    async fn upsert_for_brand(
        &self,
        subscription: UpsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity>;

    /// Same row as `upsert_for_brand`, written from a provider event. A `None`
    /// plan keeps the stored plan.
    async fn upsert_from_provider(
        &self,
        subscription: UpsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity>;

    /// Active subscriptions of `plan` whose renewal date is at or before `now`.
    async fn list_due(&self, plan: PlanType, now: DateTime<Utc>) -> Result<Vec<SubscriptionEntity>>;

    /// Advances the renewal date and inserts the invoice in one transaction.
    /// Returns `false` without writing when the renewal date no longer matches
    /// `charge.expected_renewal`.
    async fn bill_renewal(&self, charge: RenewalChargeEntity) -> Result<bool>;
}
