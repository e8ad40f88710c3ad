use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{
    Connection, OptionalExtension, RunQueryDsl,
    dsl::sql,
    insert_into,
    prelude::*,
    sql_types::{Nullable, Text},
    update,
    upsert::excluded,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{invoices, subscriptions},
    },
};
use domain::{
    entities::subscriptions::{RenewalChargeEntity, SubscriptionEntity, UpsertSubscriptionEntity},
    repositories::subscriptions::SubscriptionRepository,
    value_objects::enums::{plan_types::PlanType, subscription_statuses::SubscriptionStatus},
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn find_by_brand(&self, brand_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let subscription = subscriptions::table
            .filter(subscriptions::brand_id.eq(brand_id))
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(subscription)
    }

    async fn upsert_for_brand(
        &self,
        subscription: UpsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(subscriptions::table)
            .values(&subscription)
            .on_conflict(subscriptions::brand_id)
            .do_update()
            .set((
                subscriptions::plan_type.eq(excluded(subscriptions::plan_type)),
                subscriptions::status.eq(excluded(subscriptions::status)),
                subscriptions::renewal_date.eq(excluded(subscriptions::renewal_date)),
                subscriptions::updated_at.eq(excluded(subscriptions::updated_at)),
            ))
            .returning(SubscriptionEntity::as_returning())
            .get_result::<SubscriptionEntity>(&mut conn)?;

        Ok(result)
    }

    async fn upsert_from_provider(
        &self,
        subscription: UpsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(subscriptions::table)
            .values(&subscription)
            .on_conflict(subscriptions::brand_id)
            .do_update()
            .set((
                subscriptions::plan_type.eq(sql::<Nullable<Text>>(
                    "COALESCE(excluded.plan_type, subscriptions.plan_type)",
                )),
                subscriptions::status.eq(excluded(subscriptions::status)),
                subscriptions::stripe_subscription_id
                    .eq(excluded(subscriptions::stripe_subscription_id)),
                subscriptions::renewal_date.eq(excluded(subscriptions::renewal_date)),
                subscriptions::updated_at.eq(excluded(subscriptions::updated_at)),
            ))
            .returning(SubscriptionEntity::as_returning())
            .get_result::<SubscriptionEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list_due(
        &self,
        plan: PlanType,
        now: DateTime<Utc>,
    ) -> Result<Vec<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = subscriptions::table
            .filter(subscriptions::status.eq(SubscriptionStatus::Active.as_str()))
            .filter(subscriptions::plan_type.eq(plan.as_str()))
            .filter(subscriptions::renewal_date.le(now))
            .order(subscriptions::renewal_date.asc())
            .select(SubscriptionEntity::as_select())
            .load::<SubscriptionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn bill_renewal(&self, charge: RenewalChargeEntity) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<bool, anyhow::Error, _>(|conn| {
            let moved = update(subscriptions::table)
                .filter(subscriptions::id.eq(charge.subscription_id))
                .filter(subscriptions::status.eq(SubscriptionStatus::Active.as_str()))
                .filter(subscriptions::renewal_date.eq(charge.expected_renewal))
                .set((
                    subscriptions::renewal_date.eq(charge.new_renewal),
                    subscriptions::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;

            if moved == 0 {
                return Ok(false);
            }

            insert_into(invoices::table)
                .values(&charge.invoice)
                .execute(conn)?;

            Ok(true)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::invoices::InsertInvoiceEntity;
    use crate::domain::value_objects::enums::brand_statuses::BrandStatus;
    use crate::infra::db::postgres::test_support::{insert_brand, test_pool};
    use chrono::{Duration, TimeZone};

    fn active_monthly(brand_id: Uuid, renewal: DateTime<Utc>) -> UpsertSubscriptionEntity {
        UpsertSubscriptionEntity {
            brand_id,
            plan_type: Some(PlanType::Monthly.to_string()),
            status: SubscriptionStatus::Active.to_string(),
            stripe_subscription_id: None,
            renewal_date: Some(renewal),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn concurrent_starts_leave_one_row() {
        let pool = test_pool();
        let brand_id = insert_brand(&pool, BrandStatus::Active);
        let repo = Arc::new(SubscriptionPostgres::new(Arc::clone(&pool)));
        let renewal = Utc::now() + Duration::days(30);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.upsert_for_brand(active_monthly(brand_id, renewal)).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut conn = pool.get().unwrap();
        let rows: i64 = subscriptions::table
            .filter(subscriptions::brand_id.eq(brand_id))
            .count()
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn provider_upsert_keeps_plan_when_unmapped() {
        let pool = test_pool();
        let brand_id = insert_brand(&pool, BrandStatus::Active);
        let repo = SubscriptionPostgres::new(pool);

        let mut first = active_monthly(brand_id, Utc::now());
        first.stripe_subscription_id = Some("sub_1".to_string());
        repo.upsert_from_provider(first).await.unwrap();

        let mut second = active_monthly(brand_id, Utc::now());
        second.plan_type = None;
        second.status = SubscriptionStatus::PastDue.to_string();
        second.stripe_subscription_id = Some("sub_1".to_string());
        let stored = repo.upsert_from_provider(second).await.unwrap();

        assert_eq!(stored.plan(), Some(PlanType::Monthly));
        assert_eq!(stored.subscription_status(), SubscriptionStatus::PastDue);
    }

    #[tokio::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn renewal_is_billed_once() {
        let pool = test_pool();
        let brand_id = insert_brand(&pool, BrandStatus::Active);
        let repo = SubscriptionPostgres::new(Arc::clone(&pool));
        let renewal = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
        let subscription = repo
            .upsert_for_brand(active_monthly(brand_id, renewal))
            .await
            .unwrap();

        let charge = RenewalChargeEntity {
            subscription_id: subscription.id,
            expected_renewal: renewal,
            new_renewal: Utc.with_ymd_and_hms(2025, 2, 15, 9, 0, 0).unwrap(),
            invoice: InsertInvoiceEntity {
                brand_id,
                amount_minor: PlanType::Monthly.amount_minor(),
                plan_type: Some(PlanType::Monthly.to_string()),
                stripe_invoice_id: None,
                due_date: Some(renewal + Duration::days(14)),
                status: "DUE".to_string(),
                created_at: Utc::now(),
            },
        };

        assert!(repo.bill_renewal(charge.clone()).await.unwrap());
        assert!(!repo.bill_renewal(charge).await.unwrap());

        let mut conn = pool.get().unwrap();
        let invoices: i64 = invoices::table
            .filter(invoices::brand_id.eq(brand_id))
            .count()
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(invoices, 1);
    }
}
