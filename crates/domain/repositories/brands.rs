use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::brands::{BrandEntity, InsertBrandEntity, UpdateBrandProfileEntity};
use crate::domain::value_objects::enums::brand_statuses::BrandStatus;

#[async_trait]
#[automock]
pub trait BrandRepository {
    /// Fails with `StoreError::Conflict` when the email is taken.
    async fn create(&self, brand: InsertBrandEntity) -> Result<Uuid>;

    async fn find_by_id(&self, brand_id: Uuid) -> Result<Option<BrandEntity>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<BrandEntity>>;

    async fn find_by_customer_ref(&self, customer_ref: &str) -> Result<Option<BrandEntity>>;

    async fn find_active_by_id(&self, brand_id: Uuid) -> Result<Option<BrandEntity>>;

    async fn list_by_statuses(&self, statuses: Vec<BrandStatus>) -> Result<Vec<BrandEntity>>;

    async fn update_profile(
        &self,
        brand_id: Uuid,
        changes: UpdateBrandProfileEntity,
    ) -> Result<Option<BrandEntity>>;

    /// Compare-and-set: only writes `next` while the row still holds `expected`.
    /// Returns whether the row was updated.
    async fn update_status(
        &self,
        brand_id: Uuid,
        expected: BrandStatus,
        next: BrandStatus,
    ) -> Result<bool>;

    /// Stores the billing-customer reference unless one is already set and
    /// returns whichever reference the row holds afterwards.
    async fn set_customer_ref_if_absent(
        &self,
        brand_id: Uuid,
        customer_ref: &str,
    ) -> Result<Option<String>>;
}
