//! Payment-provider events after signature verification, reduced to the
//! fields the billing reconciler consumes.

use chrono::{DateTime, TimeZone, Utc};

/// Event types the reconciler acts on. Everything else is acknowledged and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderEventKind {
    SubscriptionCreated,
    SubscriptionUpdated,
    SubscriptionDeleted,
    InvoiceCreated,
    InvoicePaid,
    InvoicePaymentSucceeded,
    InvoicePaymentFailed,
}

impl ProviderEventKind {
    pub fn from_type(event_type: &str) -> Option<Self> {
        match event_type {
            "customer.subscription.created" => Some(ProviderEventKind::SubscriptionCreated),
            "customer.subscription.updated" => Some(ProviderEventKind::SubscriptionUpdated),
            "customer.subscription.deleted" => Some(ProviderEventKind::SubscriptionDeleted),
            "invoice.created" => Some(ProviderEventKind::InvoiceCreated),
            "invoice.paid" => Some(ProviderEventKind::InvoicePaid),
            "invoice.payment_succeeded" => Some(ProviderEventKind::InvoicePaymentSucceeded),
            "invoice.payment_failed" => Some(ProviderEventKind::InvoicePaymentFailed),
            _ => None,
        }
    }

    pub fn is_subscription(&self) -> bool {
        matches!(
            self,
            ProviderEventKind::SubscriptionCreated
                | ProviderEventKind::SubscriptionUpdated
                | ProviderEventKind::SubscriptionDeleted
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSubscription {
    pub id: String,
    pub customer: Option<String>,
    pub status: Option<String>,
    pub price_id: Option<String>,
    pub current_period_end: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderInvoice {
    pub id: String,
    pub customer: Option<String>,
    pub status: Option<String>,
    pub price_id: Option<String>,
    /// Minor currency units.
    pub total: Option<i64>,
    pub due_date: Option<i64>,
    pub next_payment_attempt: Option<i64>,
    pub created: Option<i64>,
}

impl ProviderInvoice {
    /// Explicit due date, else next payment attempt, else creation time.
    pub fn effective_due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
            .or(self.next_payment_attempt)
            .or(self.created)
            .and_then(unix_to_datetime)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderEvent {
    Subscription {
        kind: ProviderEventKind,
        subscription: ProviderSubscription,
    },
    Invoice {
        kind: ProviderEventKind,
        invoice: ProviderInvoice,
    },
    Ignored {
        event_type: String,
    },
}

pub fn unix_to_datetime(ts: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(ts, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice() -> ProviderInvoice {
        ProviderInvoice {
            id: "in_1".to_string(),
            customer: Some("cus_1".to_string()),
            status: Some("open".to_string()),
            price_id: None,
            total: Some(4_900),
            due_date: None,
            next_payment_attempt: None,
            created: None,
        }
    }

    #[test]
    fn due_date_prefers_explicit_then_next_attempt_then_created() {
        let mut invoice = invoice();
        assert_eq!(invoice.effective_due_date(), None);

        invoice.created = Some(1_700_000_000);
        assert_eq!(invoice.effective_due_date(), unix_to_datetime(1_700_000_000));

        invoice.next_payment_attempt = Some(1_700_100_000);
        assert_eq!(invoice.effective_due_date(), unix_to_datetime(1_700_100_000));

        invoice.due_date = Some(1_700_200_000);
        assert_eq!(invoice.effective_due_date(), unix_to_datetime(1_700_200_000));
    }

    #[test]
    fn recognises_lifecycle_event_types() {
        assert!(ProviderEventKind::from_type("customer.subscription.deleted")
            .is_some_and(|kind| kind.is_subscription()));
        assert!(ProviderEventKind::from_type("invoice.payment_failed")
            .is_some_and(|kind| !kind.is_subscription()));
        assert_eq!(ProviderEventKind::from_type("checkout.session.completed"), None);
    }
}
