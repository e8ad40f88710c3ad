use std::{collections::HashMap, sync::Arc};

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use chrono::Utc;
use directory_core::{
    domain::{
        entities::{brands::BrandEntity, subscriptions::UpsertSubscriptionEntity},
        repositories::{
            brands::BrandRepository, invoices::InvoiceRepository,
            subscriptions::SubscriptionRepository,
        },
        value_objects::{
            enums::{
                billing_modes::BillingMode, plan_types::PlanType,
                subscription_statuses::SubscriptionStatus,
            },
            invoices::{InvoiceDto, InvoiceFilter},
            subscriptions::{PlanRequest, PriceLookup, RedirectDto, SubscriptionDto},
        },
    },
    payments::stripe_client::{StripeClient, StripeEvent, WebhookVerificationError},
};
use tracing::{error, info, warn};
use url::Url;
use uuid::Uuid;

use crate::config::config_model::StripeSettings;
use crate::usecases::errors::{UseCaseError, UseCaseResult};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StripeGateway: Send + Sync {
    async fn create_customer(&self, email: &str, name: &str, brand_id: Uuid) -> AnyResult<String>;

    async fn create_checkout_session(
        &self,
        price_id: &str,
        customer_id: &str,
        metadata: HashMap<String, String>,
        success_url: &str,
        cancel_url: &str,
    ) -> AnyResult<String>;

    async fn create_portal_session(&self, customer_id: &str, return_url: &str)
    -> AnyResult<String>;

    fn verify_webhook_signature(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<StripeEvent, WebhookVerificationError>;
}

#[async_trait]
impl StripeGateway for StripeClient {
    async fn create_customer(&self, email: &str, name: &str, brand_id: Uuid) -> AnyResult<String> {
        self.create_customer(email, name, brand_id).await
    }

    async fn create_checkout_session(
        &self,
        price_id: &str,
        customer_id: &str,
        metadata: HashMap<String, String>,
        success_url: &str,
        cancel_url: &str,
    ) -> AnyResult<String> {
        self.create_checkout_session(price_id, customer_id, metadata, success_url, cancel_url)
            .await
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> AnyResult<String> {
        self.create_portal_session(customer_id, return_url).await
    }

    fn verify_webhook_signature(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<StripeEvent, WebhookVerificationError> {
        self.verify_webhook_signature(payload, signature)
    }
}

/// Process-wide billing configuration, resolved once at startup and handed
/// to every billing entry point.
pub enum BillingSettings<G> {
    SelfManaged,
    Managed { gateway: Arc<G>, prices: PriceLookup },
}

impl<G> Clone for BillingSettings<G> {
    fn clone(&self) -> Self {
        match self {
            BillingSettings::SelfManaged => BillingSettings::SelfManaged,
            BillingSettings::Managed { gateway, prices } => BillingSettings::Managed {
                gateway: Arc::clone(gateway),
                prices: prices.clone(),
            },
        }
    }
}

impl<G> BillingSettings<G> {
    pub fn mode(&self) -> BillingMode {
        match self {
            BillingSettings::SelfManaged => BillingMode::SelfManaged,
            BillingSettings::Managed { .. } => BillingMode::Managed,
        }
    }
}

impl BillingSettings<StripeClient> {
    /// Managed mode exactly when a Stripe secret key is configured.
    pub fn from_config(stripe: Option<&StripeSettings>) -> Self {
        match stripe {
            Some(settings) => BillingSettings::Managed {
                gateway: Arc::new(StripeClient::new(
                    settings.secret_key.clone(),
                    settings.webhook_secret.clone(),
                )),
                prices: PriceLookup {
                    monthly: settings.price_monthly.clone(),
                    annual: settings.price_annual.clone(),
                },
            },
            None => BillingSettings::SelfManaged,
        }
    }
}

pub fn parse_plan(request: &PlanRequest) -> UseCaseResult<PlanType> {
    request
        .plan_type
        .as_deref()
        .and_then(PlanType::from_str)
        .ok_or_else(|| UseCaseError::Validation("plan_type must be MONTHLY or ANNUAL".to_string()))
}

fn stripe_not_configured() -> UseCaseError {
    UseCaseError::Misconfigured("Stripe is not configured".to_string())
}

pub struct SubscriptionUseCase<B, S, I, G>
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
    app_base_url: Url,
}

impl<B, S, I, G> SubscriptionUseCase<B, S, I, G>
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
        app_base_url: Url,
    ) -> Self {
        Self {
            brand_repo,
            subscription_repo,
            invoice_repo,
            billing,
            app_base_url,
        }
    }

    fn app_url(&self, path_and_query: &str) -> String {
        format!(
            "{}/{}",
            self.app_base_url.as_str().trim_end_matches('/'),
            path_and_query
        )
    }

    async fn load_brand(&self, brand_id: Uuid) -> UseCaseResult<BrandEntity> {
        self.brand_repo
            .find_by_id(brand_id)
            .await
            .map_err(|err| {
                error!(%brand_id, db_error = ?err, "subscriptions: failed to load brand");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::NotFound("Brand not found".to_string()))
    }

    pub async fn current(&self, brand_id: Uuid) -> UseCaseResult<Option<SubscriptionDto>> {
        let subscription = self
            .subscription_repo
            .find_by_brand(brand_id)
            .await
            .map_err(|err| {
                error!(%brand_id, db_error = ?err, "subscriptions: failed to load subscription");
                UseCaseError::Internal(err)
            })?;
        Ok(subscription.map(SubscriptionDto::from))
    }

    /// Starts or switches the brand's plan without a payment provider.
    pub async fn start_self_managed(
        &self,
        brand_id: Uuid,
        request: PlanRequest,
    ) -> UseCaseResult<SubscriptionDto> {
        if let BillingSettings::Managed { .. } = self.billing {
            let err = UseCaseError::Validation(
                "Subscriptions are managed by Stripe, use the checkout session".to_string(),
            );
            warn!(
                %brand_id,
                status = err.status_code().as_u16(),
                "subscriptions: direct start refused in managed mode"
            );
            return Err(err);
        }

        let plan = parse_plan(&request)?;
        let now = Utc::now();
        let renewal = plan.next_renewal(now).ok_or_else(|| {
            UseCaseError::Internal(anyhow::anyhow!("renewal date out of range for {plan}"))
        })?;

        info!(%brand_id, %plan, %renewal, "subscriptions: starting self-managed plan");
        let subscription = self
            .subscription_repo
            .upsert_for_brand(UpsertSubscriptionEntity {
                brand_id,
                plan_type: Some(plan.to_string()),
                status: SubscriptionStatus::Active.to_string(),
                stripe_subscription_id: None,
                renewal_date: Some(renewal),
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(|err| {
                error!(%brand_id, db_error = ?err, "subscriptions: failed to upsert subscription");
                UseCaseError::Internal(err)
            })?;

        Ok(subscription.into())
    }

    pub async fn create_checkout_session(
        &self,
        brand_id: Uuid,
        request: PlanRequest,
    ) -> UseCaseResult<RedirectDto> {
        let BillingSettings::Managed { gateway, prices } = &self.billing else {
            return Err(stripe_not_configured());
        };

        let plan = parse_plan(&request)?;
        let price_id = prices.price_for(plan).ok_or_else(|| {
            error!(%plan, "subscriptions: no Stripe price configured for plan");
            UseCaseError::Misconfigured(format!("No Stripe price configured for {plan}"))
        })?;

        let brand = self.load_brand(brand_id).await?;
        let customer_id = self.ensure_customer(gateway.as_ref(), &brand).await?;

        let metadata = HashMap::from([
            ("brand_id".to_string(), brand_id.to_string()),
            ("plan_type".to_string(), plan.to_string()),
        ]);

        info!(%brand_id, %plan, "subscriptions: creating checkout session");
        let url = gateway
            .create_checkout_session(
                price_id,
                &customer_id,
                metadata,
                &self.app_url("dashboard.html?checkout=success"),
                &self.app_url("dashboard.html?checkout=cancel"),
            )
            .await
            .map_err(|err| {
                error!(%brand_id, provider_error = ?err, "subscriptions: checkout session failed");
                UseCaseError::PaymentProvider(err)
            })?;

        Ok(RedirectDto { url })
    }

    /// Returns the brand's provider customer, creating it on first use. When
    /// two requests race, the reference stored first wins.
    async fn ensure_customer(&self, gateway: &G, brand: &BrandEntity) -> UseCaseResult<String> {
        if let Some(existing) = &brand.stripe_customer_id {
            return Ok(existing.clone());
        }

        let brand_id = brand.id;
        let created = gateway
            .create_customer(&brand.email, &brand.name, brand_id)
            .await
            .map_err(|err| {
                error!(%brand_id, provider_error = ?err, "subscriptions: customer creation failed");
                UseCaseError::PaymentProvider(err)
            })?;

        let stored = self
            .brand_repo
            .set_customer_ref_if_absent(brand_id, &created)
            .await
            .map_err(|err| {
                error!(%brand_id, db_error = ?err, "subscriptions: failed to store customer ref");
                UseCaseError::Internal(err)
            })?;

        match stored {
            Some(stored) => {
                if stored != created {
                    warn!(%brand_id, "subscriptions: customer ref already set by a concurrent request");
                }
                Ok(stored)
            }
            None => Err(UseCaseError::NotFound("Brand not found".to_string())),
        }
    }

    pub async fn create_portal_session(&self, brand_id: Uuid) -> UseCaseResult<RedirectDto> {
        let BillingSettings::Managed { gateway, .. } = &self.billing else {
            return Err(stripe_not_configured());
        };

        let brand = self.load_brand(brand_id).await?;
        let Some(customer_id) = brand.stripe_customer_id else {
            return Err(UseCaseError::Validation(
                "No billing account yet, start a checkout first".to_string(),
            ));
        };

        let url = gateway
            .create_portal_session(&customer_id, &self.app_url("dashboard.html"))
            .await
            .map_err(|err| {
                error!(%brand_id, provider_error = ?err, "subscriptions: portal session failed");
                UseCaseError::PaymentProvider(err)
            })?;

        Ok(RedirectDto { url })
    }

    pub async fn list_brand_invoices(&self, brand_id: Uuid) -> UseCaseResult<Vec<InvoiceDto>> {
        let invoices = self
            .invoice_repo
            .list_by_brand(brand_id)
            .await
            .map_err(|err| {
                error!(%brand_id, db_error = ?err, "subscriptions: failed to list invoices");
                UseCaseError::Internal(err)
            })?;
        Ok(invoices.into_iter().map(InvoiceDto::from).collect())
    }

    pub async fn list_all_invoices(&self, filter: InvoiceFilter) -> UseCaseResult<Vec<InvoiceDto>> {
        let status = filter
            .status
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty());

        let invoices = self
            .invoice_repo
            .list_all(status)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "subscriptions: failed to list all invoices");
                UseCaseError::Internal(err)
            })?;
        Ok(invoices.into_iter().map(InvoiceDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_fixtures;
    use chrono::Duration;
    use directory_core::domain::{
        entities::subscriptions::SubscriptionEntity,
        repositories::{
            brands::MockBrandRepository, invoices::MockInvoiceRepository,
            subscriptions::MockSubscriptionRepository,
        },
        value_objects::enums::brand_statuses::BrandStatus,
    };

    type TestUseCase = SubscriptionUseCase<
        MockBrandRepository,
        MockSubscriptionRepository,
        MockInvoiceRepository,
        MockStripeGateway,
    >;

    fn prices() -> PriceLookup {
        PriceLookup {
            monthly: Some("price_monthly".to_string()),
            annual: None,
        }
    }

    fn usecase(
        brand_repo: MockBrandRepository,
        subscription_repo: MockSubscriptionRepository,
        billing: BillingSettings<MockStripeGateway>,
    ) -> TestUseCase {
        SubscriptionUseCase::new(
            Arc::new(brand_repo),
            Arc::new(subscription_repo),
            Arc::new(MockInvoiceRepository::new()),
            billing,
            Url::parse("https://directory.test/").unwrap(),
        )
    }

    fn managed(gateway: MockStripeGateway) -> BillingSettings<MockStripeGateway> {
        BillingSettings::Managed {
            gateway: Arc::new(gateway),
            prices: prices(),
        }
    }

    fn plan(value: &str) -> PlanRequest {
        PlanRequest {
            plan_type: Some(value.to_string()),
        }
    }

    fn echo_upsert(row: UpsertSubscriptionEntity) -> SubscriptionEntity {
        SubscriptionEntity {
            id: Uuid::new_v4(),
            brand_id: row.brand_id,
            plan_type: row.plan_type,
            status: row.status,
            stripe_subscription_id: row.stripe_subscription_id,
            renewal_date: row.renewal_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    #[test]
    fn billing_mode_follows_stripe_key_presence() {
        let settings = StripeSettings {
            secret_key: "sk_test_1".to_string(),
            webhook_secret: None,
            price_monthly: Some("price_monthly".to_string()),
            price_annual: None,
        };

        assert_eq!(
            BillingSettings::from_config(Some(&settings)).mode(),
            BillingMode::Managed
        );
        assert_eq!(
            BillingSettings::from_config(None).mode(),
            BillingMode::SelfManaged
        );
    }

    #[tokio::test]
    async fn monthly_start_renews_one_month_out() {
        let brand_id = Uuid::new_v4();
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_upsert_for_brand()
            .times(1)
            .returning(|row| Box::pin(async move { Ok(echo_upsert(row)) }));

        let before = Utc::now();
        let dto = usecase(
            MockBrandRepository::new(),
            subscription_repo,
            BillingSettings::SelfManaged,
        )
        .start_self_managed(brand_id, plan("MONTHLY"))
        .await
        .unwrap();

        assert_eq!(dto.status, "ACTIVE");
        assert_eq!(dto.plan_type.as_deref(), Some("MONTHLY"));
        let renewal = dto.renewal_date.unwrap();
        assert!(renewal >= PlanType::Monthly.next_renewal(before).unwrap());
        assert!(renewal <= before + Duration::days(32));
    }

    #[tokio::test]
    async fn unknown_plan_is_rejected() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo.expect_upsert_for_brand().never();

        let err = usecase(
            MockBrandRepository::new(),
            subscription_repo,
            BillingSettings::SelfManaged,
        )
        .start_self_managed(Uuid::new_v4(), plan("WEEKLY"))
        .await
        .unwrap_err();

        assert!(matches!(err, UseCaseError::Validation(_)));
    }

    #[tokio::test]
    async fn direct_start_is_refused_in_managed_mode() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo.expect_upsert_for_brand().never();

        let err = usecase(
            MockBrandRepository::new(),
            subscription_repo,
            managed(MockStripeGateway::new()),
        )
        .start_self_managed(Uuid::new_v4(), plan("MONTHLY"))
        .await
        .unwrap_err();

        assert!(matches!(err, UseCaseError::Validation(_)));
    }

    #[tokio::test]
    async fn checkout_without_stripe_is_misconfigured() {
        let err = usecase(
            MockBrandRepository::new(),
            MockSubscriptionRepository::new(),
            BillingSettings::SelfManaged,
        )
        .create_checkout_session(Uuid::new_v4(), plan("MONTHLY"))
        .await
        .unwrap_err();

        assert!(matches!(err, UseCaseError::Misconfigured(_)));
    }

    #[tokio::test]
    async fn checkout_for_unpriced_plan_is_misconfigured() {
        let err = usecase(
            MockBrandRepository::new(),
            MockSubscriptionRepository::new(),
            managed(MockStripeGateway::new()),
        )
        .create_checkout_session(Uuid::new_v4(), plan("ANNUAL"))
        .await
        .unwrap_err();

        assert!(matches!(err, UseCaseError::Misconfigured(_)));
    }

    #[tokio::test]
    async fn first_checkout_creates_and_stores_customer() {
        let brand = test_fixtures::brand(BrandStatus::Active);
        let brand_id = brand.id;

        let mut brand_repo = MockBrandRepository::new();
        brand_repo.expect_find_by_id().returning(move |_| {
            let brand = brand.clone();
            Box::pin(async move { Ok(Some(brand)) })
        });
        brand_repo
            .expect_set_customer_ref_if_absent()
            .times(1)
            .returning(|_, customer| {
                assert_eq!(customer, "cus_new");
                Box::pin(async { Ok(Some("cus_new".to_string())) })
            });

        let mut gateway = MockStripeGateway::new();
        gateway
            .expect_create_customer()
            .times(1)
            .returning(|_, _, _| Ok("cus_new".to_string()));
        gateway
            .expect_create_checkout_session()
            .times(1)
            .returning(move |price, customer, metadata, success, cancel| {
                assert_eq!(price, "price_monthly");
                assert_eq!(customer, "cus_new");
                assert_eq!(metadata.get("brand_id"), Some(&brand_id.to_string()));
                assert_eq!(success, "https://directory.test/dashboard.html?checkout=success");
                assert_eq!(cancel, "https://directory.test/dashboard.html?checkout=cancel");
                Ok("https://checkout.stripe.test/session".to_string())
            });

        let dto = usecase(brand_repo, MockSubscriptionRepository::new(), managed(gateway))
            .create_checkout_session(brand_id, plan("MONTHLY"))
            .await
            .unwrap();

        assert_eq!(dto.url, "https://checkout.stripe.test/session");
    }

    #[tokio::test]
    async fn checkout_uses_customer_stored_by_concurrent_request() {
        let brand = test_fixtures::brand(BrandStatus::Active);
        let brand_id = brand.id;

        let mut brand_repo = MockBrandRepository::new();
        brand_repo.expect_find_by_id().returning(move |_| {
            let brand = brand.clone();
            Box::pin(async move { Ok(Some(brand)) })
        });
        brand_repo
            .expect_set_customer_ref_if_absent()
            .returning(|_, _| Box::pin(async { Ok(Some("cus_first".to_string())) }));

        let mut gateway = MockStripeGateway::new();
        gateway
            .expect_create_customer()
            .returning(|_, _, _| Ok("cus_second".to_string()));
        gateway
            .expect_create_checkout_session()
            .returning(|_, customer, _, _, _| {
                assert_eq!(customer, "cus_first");
                Ok("https://checkout.stripe.test/session".to_string())
            });

        usecase(brand_repo, MockSubscriptionRepository::new(), managed(gateway))
            .create_checkout_session(brand_id, plan("MONTHLY"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn portal_requires_existing_customer() {
        let brand = test_fixtures::brand(BrandStatus::Active);
        let brand_id = brand.id;
        let mut brand_repo = MockBrandRepository::new();
        brand_repo.expect_find_by_id().returning(move |_| {
            let brand = brand.clone();
            Box::pin(async move { Ok(Some(brand)) })
        });
        let mut gateway = MockStripeGateway::new();
        gateway.expect_create_portal_session().never();

        let err = usecase(brand_repo, MockSubscriptionRepository::new(), managed(gateway))
            .create_portal_session(brand_id)
            .await
            .unwrap_err();

        assert!(matches!(err, UseCaseError::Validation(_)));
    }

    #[tokio::test]
    async fn provider_failure_maps_to_bad_gateway() {
        let mut brand = test_fixtures::brand(BrandStatus::Active);
        brand.stripe_customer_id = Some("cus_1".to_string());
        let brand_id = brand.id;
        let mut brand_repo = MockBrandRepository::new();
        brand_repo.expect_find_by_id().returning(move |_| {
            let brand = brand.clone();
            Box::pin(async move { Ok(Some(brand)) })
        });
        let mut gateway = MockStripeGateway::new();
        gateway
            .expect_create_portal_session()
            .returning(|_, _| Err(anyhow::anyhow!("stripe down")));

        let err = usecase(brand_repo, MockSubscriptionRepository::new(), managed(gateway))
            .create_portal_session(brand_id)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn invoice_filter_is_normalized() {
        let mut invoice_repo = MockInvoiceRepository::new();
        invoice_repo
            .expect_list_all()
            .withf(|status| status.as_deref() == Some("PAID"))
            .returning(|_| Box::pin(async { Ok(vec![]) }));

        let usecase: TestUseCase = SubscriptionUseCase::new(
            Arc::new(MockBrandRepository::new()),
            Arc::new(MockSubscriptionRepository::new()),
            Arc::new(invoice_repo),
            BillingSettings::SelfManaged,
            Url::parse("http://localhost:8080").unwrap(),
        );

        let invoices = usecase
            .list_all_invoices(InvoiceFilter {
                status: Some(" paid ".to_string()),
            })
            .await
            .unwrap();

        assert!(invoices.is_empty());
    }
}
