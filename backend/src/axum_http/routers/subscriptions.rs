use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use directory_core::{
    domain::{
        repositories::{
            brands::BrandRepository, invoices::InvoiceRepository,
            subscriptions::SubscriptionRepository,
        },
        value_objects::subscriptions::PlanRequest,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            brands::BrandPostgres, invoices::InvoicePostgres,
            subscriptions::SubscriptionPostgres,
        },
    },
    payments::stripe_client::StripeClient,
};
use tracing::info;
use url::Url;

use crate::{
    auth::BrandIdentity,
    usecases::subscriptions::{BillingSettings, StripeGateway, SubscriptionUseCase},
};

pub type SubscriptionPostgresUseCase =
    SubscriptionUseCase<BrandPostgres, SubscriptionPostgres, InvoicePostgres, StripeClient>;

pub fn usecase(
    db_pool: Arc<PgPoolSquad>,
    billing: BillingSettings<StripeClient>,
    app_base_url: Url,
) -> SubscriptionPostgresUseCase {
    SubscriptionUseCase::new(
        Arc::new(BrandPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool))),
        Arc::new(InvoicePostgres::new(Arc::clone(&db_pool))),
        billing,
        app_base_url,
    )
}

/// Brand billing endpoints, mounted under `/api/brand`.
pub fn routes(
    db_pool: Arc<PgPoolSquad>,
    billing: BillingSettings<StripeClient>,
    app_base_url: Url,
) -> Router {
    Router::new()
        .route("/subscription", get(current).post(start_subscription))
        .route("/checkout-session", post(checkout_session))
        .route("/portal-session", post(portal_session))
        .route("/invoices", get(list_invoices))
        .with_state(Arc::new(usecase(db_pool, billing, app_base_url)))
}

pub async fn current<B, S, I, G>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<B, S, I, G>>>,
    BrandIdentity { brand_id }: BrandIdentity,
) -> Response
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    I: InvoiceRepository + Send + Sync + 'static,
    G: StripeGateway + 'static,
{
    match subscription_usecase.current(brand_id).await {
        Ok(subscription) => Json(subscription).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn start_subscription<B, S, I, G>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<B, S, I, G>>>,
    BrandIdentity { brand_id }: BrandIdentity,
    Json(request): Json<PlanRequest>,
) -> Response
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    I: InvoiceRepository + Send + Sync + 'static,
    G: StripeGateway + 'static,
{
    info!(%brand_id, plan_type = ?request.plan_type, "subscriptions: start request received");
    match subscription_usecase.start_self_managed(brand_id, request).await {
        Ok(subscription) => Json(subscription).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn checkout_session<B, S, I, G>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<B, S, I, G>>>,
    BrandIdentity { brand_id }: BrandIdentity,
    Json(request): Json<PlanRequest>,
) -> Response
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    I: InvoiceRepository + Send + Sync + 'static,
    G: StripeGateway + 'static,
{
    match subscription_usecase
        .create_checkout_session(brand_id, request)
        .await
    {
        Ok(redirect) => Json(redirect).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn portal_session<B, S, I, G>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<B, S, I, G>>>,
    BrandIdentity { brand_id }: BrandIdentity,
) -> Response
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    I: InvoiceRepository + Send + Sync + 'static,
    G: StripeGateway + 'static,
{
    match subscription_usecase.create_portal_session(brand_id).await {
        Ok(redirect) => Json(redirect).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_invoices<B, S, I, G>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<B, S, I, G>>>,
    BrandIdentity { brand_id }: BrandIdentity,
) -> Response
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    I: InvoiceRepository + Send + Sync + 'static,
    G: StripeGateway + 'static,
{
    match subscription_usecase.list_brand_invoices(brand_id).await {
        Ok(invoices) => Json(invoices).into_response(),
        Err(err) => err.into_response(),
    }
}
