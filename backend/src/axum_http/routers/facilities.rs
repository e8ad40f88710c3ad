use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use directory_core::{
    domain::{
        repositories::facilities::FacilityRepository,
        value_objects::facilities::{FacilityPatch, InsertFacilityModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::facilities::FacilityPostgres,
    },
};
use tracing::info;
use uuid::Uuid;

use crate::{auth::BrandIdentity, usecases::facilities::FacilityUseCase};

/// A brand's own supply points, mounted under `/api/brand`.
pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let facility_repository = FacilityPostgres::new(Arc::clone(&db_pool));
    let facility_usecase = FacilityUseCase::new(Arc::new(facility_repository));

    Router::new()
        .route("/supply-points", get(list_own).post(create))
        .route("/supply-points/:id", put(update).delete(delete))
        .with_state(Arc::new(facility_usecase))
}

pub async fn list_own<T>(
    State(facility_usecase): State<Arc<FacilityUseCase<T>>>,
    BrandIdentity { brand_id }: BrandIdentity,
) -> Response
where
    T: FacilityRepository + Send + Sync,
{
    match facility_usecase.list_own(brand_id).await {
        Ok(facilities) => Json(facilities).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn create<T>(
    State(facility_usecase): State<Arc<FacilityUseCase<T>>>,
    BrandIdentity { brand_id }: BrandIdentity,
    Json(model): Json<InsertFacilityModel>,
) -> Response
where
    T: FacilityRepository + Send + Sync,
{
    info!(%brand_id, "facilities: create request received");
    match facility_usecase.create(brand_id, model).await {
        Ok(created) => Json(created).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update<T>(
    State(facility_usecase): State<Arc<FacilityUseCase<T>>>,
    BrandIdentity { brand_id }: BrandIdentity,
    Path(facility_id): Path<Uuid>,
    Json(patch): Json<FacilityPatch>,
) -> Response
where
    T: FacilityRepository + Send + Sync,
{
    match facility_usecase.update(brand_id, facility_id, patch).await {
        Ok(dto) => Json(dto).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete<T>(
    State(facility_usecase): State<Arc<FacilityUseCase<T>>>,
    BrandIdentity { brand_id }: BrandIdentity,
    Path(facility_id): Path<Uuid>,
) -> Response
where
    T: FacilityRepository + Send + Sync,
{
    match facility_usecase.delete(brand_id, facility_id).await {
        Ok(dto) => Json(dto).into_response(),
        Err(err) => err.into_response(),
    }
}
