use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::invoices::InvoiceEntity;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceFilter {
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDto {
    pub id: Uuid,
    pub brand_id: Uuid,
    /// Decimal currency units.
    pub amount: f64,
    pub plan_type: Option<String>,
    pub stripe_invoice_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

pub fn minor_to_major(amount_minor: i64) -> f64 {
    amount_minor as f64 / 100.0
}

impl From<InvoiceEntity> for InvoiceDto {
    fn from(value: InvoiceEntity) -> Self {
        Self {
            id: value.id,
            brand_id: value.brand_id,
            amount: minor_to_major(value.amount_minor),
            plan_type: value.plan_type,
            stripe_invoice_id: value.stripe_invoice_id,
            due_date: value.due_date,
            status: value.status,
            created_at: value.created_at,
        }
    }
}
