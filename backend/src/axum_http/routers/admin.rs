use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use directory_core::{
    domain::{
        repositories::{
            brands::BrandRepository, facilities::FacilityRepository,
            invoices::InvoiceRepository, subscriptions::SubscriptionRepository,
        },
        value_objects::{
            enums::{facility_statuses::ModerationDecision, plan_types::PlanType},
            invoices::InvoiceFilter,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            brands::BrandPostgres, facilities::FacilityPostgres, invoices::InvoicePostgres,
            subscriptions::SubscriptionPostgres,
        },
    },
    payments::stripe_client::StripeClient,
};
use tracing::info;
use url::Url;
use uuid::Uuid;

use crate::{
    auth::AdminIdentity,
    axum_http::routers::subscriptions as subscription_routes,
    usecases::{
        billing::BillingReconciler,
        brands::BrandUseCase,
        facilities::FacilityUseCase,
        subscriptions::{BillingSettings, StripeGateway, SubscriptionUseCase},
    },
};

/// Moderation, invoicing and billing runs, mounted under `/api/admin`.
pub fn routes(
    db_pool: Arc<PgPoolSquad>,
    billing: BillingSettings<StripeClient>,
    app_base_url: Url,
) -> Router {
    let brand_usecase = BrandUseCase::new(Arc::new(BrandPostgres::new(Arc::clone(&db_pool))));
    let facility_usecase =
        FacilityUseCase::new(Arc::new(FacilityPostgres::new(Arc::clone(&db_pool))));
    let reconciler = BillingReconciler::new(
        Arc::new(BrandPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool))),
        Arc::new(InvoicePostgres::new(Arc::clone(&db_pool))),
        billing.clone(),
    );
    let subscription_usecase =
        subscription_routes::usecase(Arc::clone(&db_pool), billing, app_base_url);

    let brands = Router::new()
        .route("/brands/pending", get(list_pending_brands))
        .route("/brands/:id/approve", post(approve_brand))
        .route("/brands/:id/reject", post(reject_brand))
        .with_state(Arc::new(brand_usecase));

    let facilities = Router::new()
        .route("/supply-points/pending", get(list_pending_facilities))
        .route("/supply-points/:id/approve", post(approve_facility))
        .route("/supply-points/:id/reject", post(reject_facility))
        .with_state(Arc::new(facility_usecase));

    let invoices = Router::new()
        .route("/invoices", get(list_invoices))
        .with_state(Arc::new(subscription_usecase));

    let billing_runs = Router::new()
        .route("/run-monthly-billing", post(run_monthly_billing))
        .route("/run-annual-billing", post(run_annual_billing))
        .with_state(Arc::new(reconciler));

    brands.merge(facilities).merge(invoices).merge(billing_runs)
}

pub async fn list_pending_brands<T>(
    State(brand_usecase): State<Arc<BrandUseCase<T>>>,
    _admin: AdminIdentity,
) -> Response
where
    T: BrandRepository + Send + Sync,
{
    match brand_usecase.list_pending().await {
        Ok(brands) => Json(brands).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn approve_brand<T>(
    State(brand_usecase): State<Arc<BrandUseCase<T>>>,
    AdminIdentity { admin_id }: AdminIdentity,
    Path(brand_id): Path<Uuid>,
) -> Response
where
    T: BrandRepository + Send + Sync,
{
    info!(%admin_id, %brand_id, "admin: approve brand request received");
    match brand_usecase.approve(brand_id).await {
        Ok(dto) => Json(dto).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn reject_brand<T>(
    State(brand_usecase): State<Arc<BrandUseCase<T>>>,
    AdminIdentity { admin_id }: AdminIdentity,
    Path(brand_id): Path<Uuid>,
) -> Response
where
    T: BrandRepository + Send + Sync,
{
    info!(%admin_id, %brand_id, "admin: reject brand request received");
    match brand_usecase.reject(brand_id).await {
        Ok(dto) => Json(dto).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_pending_facilities<T>(
    State(facility_usecase): State<Arc<FacilityUseCase<T>>>,
    _admin: AdminIdentity,
) -> Response
where
    T: FacilityRepository + Send + Sync,
{
    match facility_usecase.list_pending().await {
        Ok(facilities) => Json(facilities).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn moderate_facility<T>(
    facility_usecase: &FacilityUseCase<T>,
    admin_id: Uuid,
    facility_id: Uuid,
    decision: ModerationDecision,
) -> Response
where
    T: FacilityRepository + Send + Sync,
{
    info!(%admin_id, %facility_id, %decision, "admin: facility moderation request received");
    match facility_usecase.moderate(facility_id, decision).await {
        Ok(dto) => Json(dto).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn approve_facility<T>(
    State(facility_usecase): State<Arc<FacilityUseCase<T>>>,
    AdminIdentity { admin_id }: AdminIdentity,
    Path(facility_id): Path<Uuid>,
) -> Response
where
    T: FacilityRepository + Send + Sync,
{
    moderate_facility(&facility_usecase, admin_id, facility_id, ModerationDecision::Approve).await
}

pub async fn reject_facility<T>(
    State(facility_usecase): State<Arc<FacilityUseCase<T>>>,
    AdminIdentity { admin_id }: AdminIdentity,
    Path(facility_id): Path<Uuid>,
) -> Response
where
    T: FacilityRepository + Send + Sync,
{
    moderate_facility(&facility_usecase, admin_id, facility_id, ModerationDecision::Reject).await
}

pub async fn list_invoices<B, S, I, G>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<B, S, I, G>>>,
    _admin: AdminIdentity,
    Query(filter): Query<InvoiceFilter>,
) -> Response
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    I: InvoiceRepository + Send + Sync + 'static,
    G: StripeGateway + 'static,
{
    match subscription_usecase.list_all_invoices(filter).await {
        Ok(invoices) => Json(invoices).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn run_billing<B, S, I, G>(
    reconciler: &BillingReconciler<B, S, I, G>,
    admin_id: Uuid,
    plan: PlanType,
) -> Response
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    I: InvoiceRepository + Send + Sync + 'static,
    G: StripeGateway + 'static,
{
    info!(%admin_id, %plan, "admin: billing run requested");
    match reconciler.run_billing(plan, Utc::now()).await {
        Ok(summary) => Json(summary).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn run_monthly_billing<B, S, I, G>(
    State(reconciler): State<Arc<BillingReconciler<B, S, I, G>>>,
    AdminIdentity { admin_id }: AdminIdentity,
) -> Response
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    I: InvoiceRepository + Send + Sync + 'static,
    G: StripeGateway + 'static,
{
    run_billing(&reconciler, admin_id, PlanType::Monthly).await
}

pub async fn run_annual_billing<B, S, I, G>(
    State(reconciler): State<Arc<BillingReconciler<B, S, I, G>>>,
    AdminIdentity { admin_id }: AdminIdentity,
) -> Response
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    I: InvoiceRepository + Send + Sync + 'static,
    G: StripeGateway + 'static,
{
    run_billing(&reconciler, admin_id, PlanType::Annual).await
}
