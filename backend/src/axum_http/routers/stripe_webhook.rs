use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::post,
};
use directory_core::{
    domain::repositories::{
        brands::BrandRepository, invoices::InvoiceRepository,
        subscriptions::SubscriptionRepository,
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

use crate::usecases::{
    billing::BillingReconciler,
    subscriptions::{BillingSettings, StripeGateway},
};

const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

pub fn routes(db_pool: Arc<PgPoolSquad>, billing: BillingSettings<StripeClient>) -> Router {
    let reconciler = BillingReconciler::new(
        Arc::new(BrandPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool))),
        Arc::new(InvoicePostgres::new(Arc::clone(&db_pool))),
        billing,
    );

    Router::new()
        .route("/", post(stripe_webhook))
        .with_state(Arc::new(reconciler))
}

/// Signature verification needs the body exactly as sent, so it is taken raw.
pub async fn stripe_webhook<B, S, I, G>(
    State(reconciler): State<Arc<BillingReconciler<B, S, I, G>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    I: InvoiceRepository + Send + Sync + 'static,
    G: StripeGateway + 'static,
{
    info!(body_len = body.len(), "stripe_webhook: delivery received");
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    match reconciler.handle_stripe_webhook(&body, signature).await {
        Ok(receipt) => Json(receipt).into_response(),
        Err(err) => err.into_response(),
    }
}
