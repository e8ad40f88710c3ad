use std::sync::Arc;

use chrono::Utc;
use directory_core::domain::{
    entities::facilities::InsertFacilityEntity,
    repositories::facilities::FacilityRepository,
    value_objects::{
        acknowledgements::{CreatedDto, SuccessDto},
        enums::facility_statuses::{FacilityStatus, ModerationDecision},
        facilities::{
            FacilityDto, FacilityPatch, InsertFacilityModel, PendingFacilityDto,
            validate_coordinates,
        },
    },
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::usecases::errors::{UseCaseError, UseCaseResult};

pub struct FacilityUseCase<F>
where
    F: FacilityRepository + Send + Sync + 'static,
{
    facility_repo: Arc<F>,
}

impl<F> FacilityUseCase<F>
where
    F: FacilityRepository + Send + Sync + 'static,
{
    pub fn new(facility_repo: Arc<F>) -> Self {
        Self { facility_repo }
    }

    pub async fn list_own(&self, brand_id: Uuid) -> UseCaseResult<Vec<FacilityDto>> {
        let facilities = self
            .facility_repo
            .list_by_brand(brand_id)
            .await
            .map_err(|err| {
                error!(%brand_id, db_error = ?err, "facilities: failed to list brand facilities");
                UseCaseError::Internal(err)
            })?;
        Ok(facilities.into_iter().map(FacilityDto::from).collect())
    }

    /// New facilities always enter the moderation queue.
    pub async fn create(
        &self,
        brand_id: Uuid,
        model: InsertFacilityModel,
    ) -> UseCaseResult<CreatedDto> {
        validate_coordinates(model.latitude, model.longitude).map_err(UseCaseError::Validation)?;

        let now = Utc::now();
        let facility_id = self
            .facility_repo
            .create(InsertFacilityEntity {
                brand_id,
                title: model.title.unwrap_or_default(),
                description: model.description.unwrap_or_default(),
                address: model.address.unwrap_or_default(),
                latitude: model.latitude,
                longitude: model.longitude,
                ethical_highlight: model.ethical_highlight.unwrap_or_default(),
                photo_url: model.photo_url,
                status: FacilityStatus::PendingReview.to_string(),
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(|err| {
                error!(%brand_id, db_error = ?err, "facilities: failed to create facility");
                UseCaseError::Internal(err)
            })?;

        info!(%brand_id, %facility_id, "facilities: submitted for review");
        Ok(CreatedDto::new(facility_id))
    }

    pub async fn update(
        &self,
        brand_id: Uuid,
        facility_id: Uuid,
        patch: FacilityPatch,
    ) -> UseCaseResult<SuccessDto> {
        let facility = self
            .facility_repo
            .find_owned(facility_id, brand_id)
            .await
            .map_err(|err| {
                error!(%brand_id, %facility_id, db_error = ?err, "facilities: failed to load facility");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::NotFound("Facility not found".to_string()))?;

        let editable = facility
            .facility_status()
            .is_some_and(|status| status.is_editable());
        if !editable {
            warn!(%facility_id, status = %facility.status, "facilities: edit refused for published facility");
            return Err(UseCaseError::Validation(
                "Approved facilities cannot be edited".to_string(),
            ));
        }

        if patch.is_empty() {
            return Err(UseCaseError::Validation(
                "No editable fields supplied".to_string(),
            ));
        }
        validate_coordinates(patch.latitude.flatten(), patch.longitude.flatten())
            .map_err(UseCaseError::Validation)?;

        let updated = self
            .facility_repo
            .update_owned(facility_id, brand_id, patch.into_changeset(Utc::now()))
            .await
            .map_err(|err| {
                error!(%brand_id, %facility_id, db_error = ?err, "facilities: failed to update facility");
                UseCaseError::Internal(err)
            })?;

        if !updated {
            warn!(%facility_id, "facilities: facility was moderated during edit");
            return Err(UseCaseError::Conflict(
                "Facility changed, please retry".to_string(),
            ));
        }

        info!(%brand_id, %facility_id, "facilities: facility updated");
        Ok(SuccessDto::ok())
    }

    /// Owners may delete in any status, published ones included.
    pub async fn delete(&self, brand_id: Uuid, facility_id: Uuid) -> UseCaseResult<SuccessDto> {
        let deleted = self
            .facility_repo
            .delete_owned(facility_id, brand_id)
            .await
            .map_err(|err| {
                error!(%brand_id, %facility_id, db_error = ?err, "facilities: failed to delete facility");
                UseCaseError::Internal(err)
            })?;

        if !deleted {
            return Err(UseCaseError::NotFound("Facility not found".to_string()));
        }

        info!(%brand_id, %facility_id, "facilities: facility deleted");
        Ok(SuccessDto::ok())
    }

    pub async fn list_pending(&self) -> UseCaseResult<Vec<PendingFacilityDto>> {
        let rows = self
            .facility_repo
            .list_pending_with_brand()
            .await
            .map_err(|err| {
                error!(db_error = ?err, "facilities: failed to list moderation queue");
                UseCaseError::Internal(err)
            })?;
        Ok(rows.into_iter().map(PendingFacilityDto::from).collect())
    }

    pub async fn moderate(
        &self,
        facility_id: Uuid,
        decision: ModerationDecision,
    ) -> UseCaseResult<SuccessDto> {
        let facility = self
            .facility_repo
            .find_by_id(facility_id)
            .await
            .map_err(|err| {
                error!(%facility_id, db_error = ?err, "facilities: failed to load facility");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::NotFound("Facility not found".to_string()))?;

        let next = facility
            .facility_status()
            .unwrap_or_default()
            .moderate(decision);

        let applied = self
            .facility_repo
            .set_status(facility_id, next)
            .await
            .map_err(|err| {
                error!(%facility_id, db_error = ?err, "facilities: failed to write moderation result");
                UseCaseError::Internal(err)
            })?;

        if !applied {
            return Err(UseCaseError::NotFound("Facility not found".to_string()));
        }

        info!(%facility_id, %decision, to = %next, "facilities: moderated");
        Ok(SuccessDto::ok())
    }
}
