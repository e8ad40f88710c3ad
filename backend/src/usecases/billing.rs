use std::sync::Arc;

use chrono::{DateTime, Utc};
use directory_core::domain::{
    entities::{
        invoices::InsertInvoiceEntity,
        subscriptions::{RenewalChargeEntity, UpsertSubscriptionEntity},
    },
    repositories::{
        brands::BrandRepository, invoices::InvoiceRepository,
        subscriptions::SubscriptionRepository,
    },
    value_objects::{
        acknowledgements::WebhookReceiptDto,
        billing::{BilledSubscription, BillingRunSummary, FailedCharge},
        billing_periods::invoice_due_date,
        enums::{
            invoice_statuses::InvoiceStatus, plan_types::PlanType,
            subscription_statuses::SubscriptionStatus,
        },
        provider_events::{ProviderEvent, ProviderInvoice, ProviderSubscription, unix_to_datetime},
        subscriptions::PriceLookup,
    },
};
use directory_core::payments::stripe_client::WebhookVerificationError;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::usecases::errors::{UseCaseError, UseCaseResult};
use crate::usecases::subscriptions::{BillingSettings, StripeGateway};

/// Keeps subscriptions and invoices in step with the billing mode: periodic
/// runs in self-managed mode, provider events in managed mode.
pub struct BillingReconciler<B, S, I, G>
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    I: InvoiceRepository + Send + Sync + 'static,
    G: StripeGateway + 'static,
{
    brand_repo: Arc<B>,
    subscription_repo: Arc<S>,
    invoice_repo: Arc<I>,
    billing: BillingSettings<G>,
}

impl<B, S, I, G> BillingReconciler<B, S, I, G>
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    I: InvoiceRepository + Send + Sync + 'static,
    G: StripeGateway + 'static,
{
    pub fn new(
        brand_repo: Arc<B>,
        subscription_repo: Arc<S>,
        invoice_repo: Arc<I>,
        billing: BillingSettings<G>,
    ) -> Self {
        Self {
            brand_repo,
            subscription_repo,
            invoice_repo,
            billing,
        }
    }

    /// Bills every active `plan` subscription whose renewal is due at `now`.
    /// Each subscription is charged in its own transaction guarded on the
    /// renewal date that was read, so overlapping runs bill a period once.
    /// A failed charge is reported in the manifest and the run moves on.
    pub async fn run_billing(
        &self,
        plan: PlanType,
        now: DateTime<Utc>,
    ) -> UseCaseResult<BillingRunSummary> {
        if let BillingSettings::Managed { .. } = self.billing {
            let err = UseCaseError::Validation(
                "Billing runs are disabled while Stripe manages subscriptions".to_string(),
            );
            warn!(%plan, status = err.status_code().as_u16(), "billing: run refused in managed mode");
            return Err(err);
        }

        let due = self
            .subscription_repo
            .list_due(plan, now)
            .await
            .map_err(|err| {
                error!(%plan, db_error = ?err, "billing: failed to list due subscriptions");
                UseCaseError::Internal(err)
            })?;
        info!(%plan, due_count = due.len(), %now, "billing: run started");

        let mut details = Vec::with_capacity(due.len());
        let mut failed = Vec::new();
        for subscription in due {
            let subscription_id = subscription.id;
            let brand_id = subscription.brand_id;
            let Some(expected_renewal) = subscription.renewal_date else {
                continue;
            };
            let Some(new_renewal) = plan.next_renewal(expected_renewal) else {
                error!(%subscription_id, %expected_renewal, "billing: renewal date out of range");
                failed.push(FailedCharge {
                    brand_id,
                    subscription_id,
                });
                continue;
            };

            let charge = RenewalChargeEntity {
                subscription_id,
                expected_renewal,
                new_renewal,
                invoice: InsertInvoiceEntity {
                    brand_id,
                    amount_minor: plan.amount_minor(),
                    plan_type: Some(plan.to_string()),
                    stripe_invoice_id: None,
                    due_date: Some(invoice_due_date(now)),
                    status: InvoiceStatus::Due.to_string(),
                    created_at: now,
                },
            };

            match self.subscription_repo.bill_renewal(charge).await {
                Ok(true) => {
                    info!(%subscription_id, %brand_id, %new_renewal, "billing: renewal charged");
                    details.push(BilledSubscription {
                        brand_id,
                        subscription_id,
                        new_renewal,
                    });
                }
                Ok(false) => {
                    info!(%subscription_id, "billing: already billed by a concurrent run");
                }
                Err(err) => {
                    error!(%subscription_id, db_error = ?err, "billing: renewal charge failed");
                    failed.push(FailedCharge {
                        brand_id,
                        subscription_id,
                    });
                }
            }
        }

        let summary = BillingRunSummary::new(details, failed);
        info!(
            %plan,
            processed = summary.processed,
            failed = summary.failed.len(),
            "billing: run finished"
        );
        Ok(summary)
    }

    /// Verifies a Stripe delivery and applies it.
    pub async fn handle_stripe_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> UseCaseResult<WebhookReceiptDto> {
        let BillingSettings::Managed { gateway, .. } = &self.billing else {
            return Err(UseCaseError::Misconfigured(
                "Stripe is not configured".to_string(),
            ));
        };
        let Some(signature) = signature else {
            warn!("billing: webhook without stripe-signature header");
            return Err(UseCaseError::InvalidWebhook(
                "missing stripe-signature header".to_string(),
            ));
        };

        let event = gateway
            .verify_webhook_signature(payload, signature)
            .map_err(|err| match err {
                WebhookVerificationError::NotConfigured => {
                    error!("billing: STRIPE_WEBHOOK_SECRET is not set");
                    UseCaseError::Misconfigured(err.to_string())
                }
                other => {
                    warn!(reason = %other, "billing: webhook verification failed");
                    UseCaseError::InvalidWebhook(other.to_string())
                }
            })?;

        debug!(event_id = ?event.id, event_type = %event.type_, "billing: webhook verified");
        self.apply_provider_event(event.into_provider_event()).await?;
        Ok(WebhookReceiptDto { received: true })
    }

    pub async fn apply_provider_event(&self, event: ProviderEvent) -> UseCaseResult<()> {
        let BillingSettings::Managed { prices, .. } = &self.billing else {
            return Err(UseCaseError::Validation(
                "Provider events are only accepted when Stripe manages billing".to_string(),
            ));
        };

        match event {
            ProviderEvent::Subscription { kind, subscription } => {
                debug!(?kind, subscription_id = %subscription.id, "billing: subscription event");
                self.apply_subscription(prices, subscription).await
            }
            ProviderEvent::Invoice { kind, invoice } => {
                debug!(?kind, invoice_id = %invoice.id, "billing: invoice event");
                self.apply_invoice(prices, invoice).await
            }
            ProviderEvent::Ignored { event_type } => {
                debug!(%event_type, "billing: event ignored");
                Ok(())
            }
        }
    }

    async fn brand_for_customer(&self, customer: Option<&str>) -> UseCaseResult<Option<Uuid>> {
        let Some(customer) = customer else {
            return Ok(None);
        };
        let brand = self
            .brand_repo
            .find_by_customer_ref(customer)
            .await
            .map_err(|err| {
                error!(%customer, db_error = ?err, "billing: failed to resolve customer");
                UseCaseError::Internal(err)
            })?;
        Ok(brand.map(|b| b.id))
    }

    async fn apply_subscription(
        &self,
        prices: &PriceLookup,
        subscription: ProviderSubscription,
    ) -> UseCaseResult<()> {
        let Some(brand_id) = self
            .brand_for_customer(subscription.customer.as_deref())
            .await?
        else {
            debug!(subscription_id = %subscription.id, "billing: no brand for customer, skipping");
            return Ok(());
        };

        let now = Utc::now();
        let plan = prices.plan_for(subscription.price_id.as_deref());
        let status = SubscriptionStatus::from_provider(subscription.status.as_deref());

        let stored = self
            .subscription_repo
            .upsert_from_provider(UpsertSubscriptionEntity {
                brand_id,
                plan_type: plan.map(|p| p.to_string()),
                status: status.to_string(),
                stripe_subscription_id: Some(subscription.id),
                renewal_date: subscription.current_period_end.and_then(unix_to_datetime),
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(|err| {
                error!(%brand_id, db_error = ?err, "billing: failed to upsert subscription");
                UseCaseError::Internal(err)
            })?;

        info!(
            %brand_id,
            subscription_status = %stored.status,
            plan_type = ?stored.plan_type,
            "billing: subscription synced from Stripe"
        );
        Ok(())
    }

    async fn apply_invoice(&self, prices: &PriceLookup, invoice: ProviderInvoice) -> UseCaseResult<()> {
        let Some(brand_id) = self.brand_for_customer(invoice.customer.as_deref()).await? else {
            debug!(invoice_id = %invoice.id, "billing: no brand for customer, skipping");
            return Ok(());
        };

        let due_date = invoice.effective_due_date();
        let created_at = invoice
            .created
            .and_then(unix_to_datetime)
            .unwrap_or_else(Utc::now);
        let status = InvoiceStatus::from_provider(invoice.status.as_deref());
        let plan = prices.plan_for(invoice.price_id.as_deref());

        let invoice_id = invoice.id;
        let row_id = self
            .invoice_repo
            .upsert_by_external_ref(InsertInvoiceEntity {
                brand_id,
                amount_minor: invoice.total.unwrap_or(0),
                plan_type: plan.map(|p| p.to_string()),
                stripe_invoice_id: Some(invoice_id.clone()),
                due_date,
                status: status.to_string(),
                created_at,
            })
            .await
            .map_err(|err| {
                error!(%brand_id, %invoice_id, db_error = ?err, "billing: failed to upsert invoice");
                UseCaseError::Internal(err)
            })?;

        info!(%brand_id, %invoice_id, %row_id, invoice_status = %status, "billing: invoice synced from Stripe");
        Ok(())
    }
}
