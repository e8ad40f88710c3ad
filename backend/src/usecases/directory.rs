use std::sync::Arc;

use directory_core::domain::{
    repositories::{brands::BrandRepository, facilities::FacilityRepository},
    value_objects::{
        brands::PublicBrandDto,
        enums::brand_statuses::BrandStatus,
        facilities::{MapPointDto, PublicBrandDetailDto, PublicFacilityDto},
    },
};
use tracing::{error, info};
use uuid::Uuid;

use crate::usecases::errors::{UseCaseError, UseCaseResult};

/// Read-only views for anonymous visitors. Only active brands and their
/// approved facilities are ever exposed.
pub struct DirectoryUseCase<B, F>
where
    B: BrandRepository + Send + Sync + 'static,
    F: FacilityRepository + Send + Sync + 'static,
{
    brand_repo: Arc<B>,
    facility_repo: Arc<F>,
}

impl<B, F> DirectoryUseCase<B, F>
where
    B: BrandRepository + Send + Sync + 'static,
    F: FacilityRepository + Send + Sync + 'static,
{
    pub fn new(brand_repo: Arc<B>, facility_repo: Arc<F>) -> Self {
        Self {
            brand_repo,
            facility_repo,
        }
    }

    pub async fn list_brands(&self) -> UseCaseResult<Vec<PublicBrandDto>> {
        let brands = self
            .brand_repo
            .list_by_statuses(vec![BrandStatus::Active])
            .await
            .map_err(|err| {
                error!(db_error = ?err, "directory: failed to list active brands");
                UseCaseError::Internal(err)
            })?;
        Ok(brands.into_iter().map(PublicBrandDto::from).collect())
    }

    pub async fn list_points(&self) -> UseCaseResult<Vec<MapPointDto>> {
        let points = self.facility_repo.list_public().await.map_err(|err| {
            error!(db_error = ?err, "directory: failed to list map points");
            UseCaseError::Internal(err)
        })?;
        info!(point_count = points.len(), "directory: map points loaded");
        Ok(points.into_iter().map(MapPointDto::from).collect())
    }

    pub async fn brand_detail(&self, brand_id: Uuid) -> UseCaseResult<PublicBrandDetailDto> {
        let brand = self
            .brand_repo
            .find_active_by_id(brand_id)
            .await
            .map_err(|err| {
                error!(%brand_id, db_error = ?err, "directory: failed to load brand");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::NotFound("Brand not found".to_string()))?;

        let facilities = self
            .facility_repo
            .list_approved_by_brand(brand_id)
            .await
            .map_err(|err| {
                error!(%brand_id, db_error = ?err, "directory: failed to load brand facilities");
                UseCaseError::Internal(err)
            })?;

        Ok(PublicBrandDetailDto {
            brand: brand.into(),
            points: facilities
                .into_iter()
                .map(PublicFacilityDto::from)
                .collect(),
        })
    }
}
