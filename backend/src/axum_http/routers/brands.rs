use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use directory_core::{
    domain::{
        repositories::brands::BrandRepository, value_objects::brands::BrandProfilePatch,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::brands::BrandPostgres,
    },
};
use tracing::info;

use crate::{auth::BrandIdentity, usecases::brands::BrandUseCase};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let brand_repository = BrandPostgres::new(Arc::clone(&db_pool));
    let brand_usecase = BrandUseCase::new(Arc::new(brand_repository));

    Router::new()
        .route("/me", get(profile).put(update_profile))
        .route("/deactivate", post(deactivate))
        .route("/request-reactivation", post(request_reactivation))
        .with_state(Arc::new(brand_usecase))
}

pub async fn profile<T>(
    State(brand_usecase): State<Arc<BrandUseCase<T>>>,
    BrandIdentity { brand_id }: BrandIdentity,
) -> Response
where
    T: BrandRepository + Send + Sync,
{
    match brand_usecase.profile(brand_id).await {
        Ok(profile) => Json(profile).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_profile<T>(
    State(brand_usecase): State<Arc<BrandUseCase<T>>>,
    BrandIdentity { brand_id }: BrandIdentity,
    Json(patch): Json<BrandProfilePatch>,
) -> Response
where
    T: BrandRepository + Send + Sync,
{
    info!(%brand_id, "brands: profile update request received");
    match brand_usecase.update_profile(brand_id, patch).await {
        Ok(profile) => Json(profile).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn deactivate<T>(
    State(brand_usecase): State<Arc<BrandUseCase<T>>>,
    BrandIdentity { brand_id }: BrandIdentity,
) -> Response
where
    T: BrandRepository + Send + Sync,
{
    match brand_usecase.deactivate(brand_id).await {
        Ok(dto) => Json(dto).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn request_reactivation<T>(
    State(brand_usecase): State<Arc<BrandUseCase<T>>>,
    BrandIdentity { brand_id }: BrandIdentity,
) -> Response
where
    T: BrandRepository + Send + Sync,
{
    match brand_usecase.request_reactivation(brand_id).await {
        Ok(dto) => Json(dto).into_response(),
        Err(err) => err.into_response(),
    }
}
