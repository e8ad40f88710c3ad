use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::invoices::{InsertInvoiceEntity, InvoiceEntity};

#[async_trait]
#[automock]
pub trait InvoiceRepository {
    /// Inserts the invoice, or updates amount, plan, due date and status in
    /// place when a row with the same external reference exists.
    async fn upsert_by_external_ref(&self, invoice: InsertInvoiceEntity) -> Result<Uuid>;

    /// Newest first.
    async fn list_by_brand(&self, brand_id: Uuid) -> Result<Vec<InvoiceEntity>>;

    async fn list_all(&self, status: Option<String>) -> Result<Vec<InvoiceEntity>>;
}
