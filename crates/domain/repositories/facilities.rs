use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::facilities::{
    FacilityEntity, FacilityWithBrandEntity, InsertFacilityEntity, UpdateFacilityEntity,
};
use crate::domain::value_objects::enums::facility_statuses::FacilityStatus;

#[async_trait]
#[automock]
pub trait FacilityRepository {
    async fn create(&self, facility: InsertFacilityEntity) -> Result<Uuid>;

    async fn find_by_id(&self, facility_id: Uuid) -> Result<Option<FacilityEntity>>;

    async fn find_owned(&self, facility_id: Uuid, brand_id: Uuid)
    -> Result<Option<FacilityEntity>>;

    async fn list_by_brand(&self, brand_id: Uuid) -> Result<Vec<FacilityEntity>>;

    async fn list_approved_by_brand(&self, brand_id: Uuid) -> Result<Vec<FacilityEntity>>;

    /// Applies the patch only while the facility is still editable.
    /// Returns whether a row was updated.
    async fn update_owned(
        &self,
        facility_id: Uuid,
        brand_id: Uuid,
        changes: UpdateFacilityEntity,
    ) -> Result<bool>;

    async fn delete_owned(&self, facility_id: Uuid, brand_id: Uuid) -> Result<bool>;

    async fn set_status(&self, facility_id: Uuid, status: FacilityStatus) -> Result<bool>;

    async fn list_pending_with_brand(&self) -> Result<Vec<FacilityWithBrandEntity>>;

    /// Approved facilities whose brand is active.
    async fn list_public(&self) -> Result<Vec<FacilityWithBrandEntity>>;
}
