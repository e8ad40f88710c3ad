use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
};
use directory_core::{
    domain::repositories::{brands::BrandRepository, facilities::FacilityRepository},
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{brands::BrandPostgres, facilities::FacilityPostgres},
    },
};
use uuid::Uuid;

use crate::usecases::directory::DirectoryUseCase;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let directory_usecase = DirectoryUseCase::new(
        Arc::new(BrandPostgres::new(Arc::clone(&db_pool))),
        Arc::new(FacilityPostgres::new(Arc::clone(&db_pool))),
    );

    Router::new()
        .route("/brands", get(list_brands))
        .route("/brands/:id", get(brand_detail))
        .route("/points", get(list_points))
        .with_state(Arc::new(directory_usecase))
}

pub async fn list_brands<B, F>(
    State(directory_usecase): State<Arc<DirectoryUseCase<B, F>>>,
) -> Response
where
    B: BrandRepository + Send + Sync,
    F: FacilityRepository + Send + Sync,
{
    match directory_usecase.list_brands().await {
        Ok(brands) => Json(brands).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_points<B, F>(
    State(directory_usecase): State<Arc<DirectoryUseCase<B, F>>>,
) -> Response
where
    B: BrandRepository + Send + Sync,
    F: FacilityRepository + Send + Sync,
{
    match directory_usecase.list_points().await {
        Ok(points) => Json(points).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn brand_detail<B, F>(
    State(directory_usecase): State<Arc<DirectoryUseCase<B, F>>>,
    Path(brand_id): Path<Uuid>,
) -> Response
where
    B: BrandRepository + Send + Sync,
    F: FacilityRepository + Send + Sync,
{
    match directory_usecase.brand_detail(brand_id).await {
        Ok(detail) => Json(detail).into_response(),
        Err(err) => err.into_response(),
    }
}
