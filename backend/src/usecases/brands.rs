use std::sync::Arc;

use chrono::Utc;
use directory_core::domain::{
    entities::brands::BrandEntity,
    repositories::brands::BrandRepository,
    value_objects::{
        acknowledgements::SuccessDto,
        brands::{BrandProfileDto, BrandProfilePatch, BrandStatusDto},
        enums::brand_statuses::BrandStatus,
        status_transitions::TransitionError,
    },
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::usecases::errors::{UseCaseError, UseCaseResult};

pub struct BrandUseCase<B>
where
    B: BrandRepository + Send + Sync + 'static,
{
    brand_repo: Arc<B>,
}

impl<B> BrandUseCase<B>
where
    B: BrandRepository + Send + Sync + 'static,
{
    pub fn new(brand_repo: Arc<B>) -> Self {
        Self { brand_repo }
    }

    async fn load(&self, brand_id: Uuid) -> UseCaseResult<BrandEntity> {
        self.brand_repo
            .find_by_id(brand_id)
            .await
            .map_err(|err| {
                error!(%brand_id, db_error = ?err, "brands: failed to load brand");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::NotFound("Brand not found".to_string()))
    }

    pub async fn profile(&self, brand_id: Uuid) -> UseCaseResult<BrandProfileDto> {
        let brand = self.load(brand_id).await?;
        Ok(brand.into())
    }

    pub async fn update_profile(
        &self,
        brand_id: Uuid,
        patch: BrandProfilePatch,
    ) -> UseCaseResult<BrandProfileDto> {
        if patch.is_empty() {
            return Err(UseCaseError::Validation(
                "No editable fields supplied".to_string(),
            ));
        }

        info!(%brand_id, "brands: updating profile");
        let updated = self
            .brand_repo
            .update_profile(brand_id, patch.into_changeset(Utc::now()))
            .await
            .map_err(|err| {
                error!(%brand_id, db_error = ?err, "brands: failed to update profile");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::NotFound("Brand not found".to_string()))?;

        Ok(updated.into())
    }

    pub async fn deactivate(&self, brand_id: Uuid) -> UseCaseResult<BrandStatusDto> {
        let next = self.transition(brand_id, BrandStatus::deactivate).await?;
        Ok(BrandStatusDto {
            success: true,
            status: next.to_string(),
        })
    }

    pub async fn request_reactivation(&self, brand_id: Uuid) -> UseCaseResult<BrandStatusDto> {
        let next = self
            .transition(brand_id, BrandStatus::request_reactivation)
            .await?;
        Ok(BrandStatusDto {
            success: true,
            status: next.to_string(),
        })
    }

    /// Admin review queue: new sign-ups and reactivation requests.
    pub async fn list_pending(&self) -> UseCaseResult<Vec<BrandProfileDto>> {
        let brands = self
            .brand_repo
            .list_by_statuses(BrandStatus::AWAITING_REVIEW.to_vec())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "brands: failed to list review queue");
                UseCaseError::Internal(err)
            })?;

        info!(pending_count = brands.len(), "brands: review queue loaded");
        Ok(brands.into_iter().map(BrandProfileDto::from).collect())
    }

    pub async fn approve(&self, brand_id: Uuid) -> UseCaseResult<SuccessDto> {
        self.transition(brand_id, BrandStatus::approve).await?;
        Ok(SuccessDto::ok())
    }

    pub async fn reject(&self, brand_id: Uuid) -> UseCaseResult<SuccessDto> {
        self.transition(brand_id, BrandStatus::reject).await?;
        Ok(SuccessDto::ok())
    }

    /// Reads the current status, applies `step`, and writes back only if the
    /// row still holds the status that was read.
    async fn transition(
        &self,
        brand_id: Uuid,
        step: fn(BrandStatus) -> Result<BrandStatus, TransitionError>,
    ) -> UseCaseResult<BrandStatus> {
        let brand = self.load(brand_id).await?;
        let current = brand.brand_status().ok_or_else(|| {
            error!(%brand_id, status = %brand.status, "brands: stored status is unknown");
            UseCaseError::Internal(anyhow::anyhow!("unknown brand status {}", brand.status))
        })?;

        let next = step(current).map_err(|err| {
            warn!(%brand_id, from = %current, reason = %err, "brands: transition refused");
            UseCaseError::from(err)
        })?;

        let applied = self
            .brand_repo
            .update_status(brand_id, current, next)
            .await
            .map_err(|err| {
                error!(%brand_id, db_error = ?err, "brands: failed to write status");
                UseCaseError::Internal(err)
            })?;

        if !applied {
            warn!(%brand_id, from = %current, to = %next, "brands: status changed concurrently");
            return Err(UseCaseError::Conflict(
                "Brand status changed, please retry".to_string(),
            ));
        }

        info!(%brand_id, from = %current, to = %next, "brands: status updated");
        Ok(next)
    }
}
