use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, upsert::excluded};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::invoices},
};
use domain::{
    entities::invoices::{InsertInvoiceEntity, InvoiceEntity},
    repositories::invoices::InvoiceRepository,
};

pub struct InvoicePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl InvoicePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl InvoiceRepository for InvoicePostgres {
    async fn upsert_by_external_ref(&self, invoice: InsertInvoiceEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // NULL references never collide, so self-managed invoices always insert.
        let invoice_id = insert_into(invoices::table)
            .values(&invoice)
            .on_conflict(invoices::stripe_invoice_id)
            .do_update()
            .set((
                invoices::amount_minor.eq(excluded(invoices::amount_minor)),
                invoices::plan_type.eq(excluded(invoices::plan_type)),
                invoices::due_date.eq(excluded(invoices::due_date)),
                invoices::status.eq(excluded(invoices::status)),
            ))
            .returning(invoices::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(invoice_id)
    }

    async fn list_by_brand(&self, brand_id: Uuid) -> Result<Vec<InvoiceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = invoices::table
            .filter(invoices::brand_id.eq(brand_id))
            .order(invoices::created_at.desc())
            .select(InvoiceEntity::as_select())
            .load::<InvoiceEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_all(&self, status: Option<String>) -> Result<Vec<InvoiceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = invoices::table
            .order(invoices::created_at.desc())
            .select(InvoiceEntity::as_select())
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(invoices::status.eq(status));
        }

        let results = query.load::<InvoiceEntity>(&mut conn)?;

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::enums::brand_statuses::BrandStatus;
    use crate::infra::db::postgres::test_support::{insert_brand, test_pool};
    use chrono::Utc;

    fn provider_invoice(brand_id: Uuid, external: &str, total: i64, status: &str) -> InsertInvoiceEntity {
        InsertInvoiceEntity {
            brand_id,
            amount_minor: total,
            plan_type: Some("MONTHLY".to_string()),
            stripe_invoice_id: Some(external.to_string()),
            due_date: None,
            status: status.to_string(),
            created_at: Utc::now(),
        }
    }

    async fn assert_single_row(repo: &InvoicePostgres, brand_id: Uuid, status: &str) {
        let rows = repo.list_by_brand(brand_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, status);
    }

    #[tokio::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn same_reference_updates_in_place_in_either_order() {
        let pool = test_pool();
        let repo = InvoicePostgres::new(Arc::clone(&pool));

        let brand_id = insert_brand(&pool, BrandStatus::Active);
        let external = format!("in_{}", Uuid::new_v4().simple());
        repo.upsert_by_external_ref(provider_invoice(brand_id, &external, 4900, "OPEN"))
            .await
            .unwrap();
        repo.upsert_by_external_ref(provider_invoice(brand_id, &external, 4900, "PAID"))
            .await
            .unwrap();
        assert_single_row(&repo, brand_id, "PAID").await;

        let brand_id = insert_brand(&pool, BrandStatus::Active);
        let external = format!("in_{}", Uuid::new_v4().simple());
        repo.upsert_by_external_ref(provider_invoice(brand_id, &external, 4900, "PAID"))
            .await
            .unwrap();
        repo.upsert_by_external_ref(provider_invoice(brand_id, &external, 4900, "OPEN"))
            .await
            .unwrap();
        assert_single_row(&repo, brand_id, "OPEN").await;
    }

    #[tokio::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn status_filter_narrows_listing() {
        let pool = test_pool();
        let brand_id = insert_brand(&pool, BrandStatus::Active);
        let repo = InvoicePostgres::new(pool);
        let mut invoice = provider_invoice(brand_id, "unused", 100, "VOID");
        invoice.stripe_invoice_id = None;
        repo.upsert_by_external_ref(invoice).await.unwrap();

        let void = repo.list_all(Some("VOID".to_string())).await.unwrap();
        assert!(void.iter().all(|invoice| invoice.status == "VOID"));
        assert!(void.iter().any(|invoice| invoice.brand_id == brand_id));
    }
}
