use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{OptionalExtension, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use super::map_store_error;
use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::brands},
};
use domain::{
    entities::brands::{BrandEntity, InsertBrandEntity, UpdateBrandProfileEntity},
    repositories::brands::BrandRepository,
    value_objects::enums::brand_statuses::BrandStatus,
};

pub struct BrandPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl BrandPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl BrandRepository for BrandPostgres {
    async fn create(&self, brand: InsertBrandEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let brand_id = insert_into(brands::table)
            .values(&brand)
            .returning(brands::id)
            .get_result::<Uuid>(&mut conn)
            .map_err(map_store_error)?;

        Ok(brand_id)
    }

    async fn find_by_id(&self, brand_id: Uuid) -> Result<Option<BrandEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let brand = brands::table
            .find(brand_id)
            .select(BrandEntity::as_select())
            .first::<BrandEntity>(&mut conn)
            .optional()?;

        Ok(brand)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<BrandEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let brand = brands::table
            .filter(brands::email.eq(email))
            .select(BrandEntity::as_select())
            .first::<BrandEntity>(&mut conn)
            .optional()?;

        Ok(brand)
    }

    async fn find_by_customer_ref(&self, customer_ref: &str) -> Result<Option<BrandEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let brand = brands::table
            .filter(brands::stripe_customer_id.eq(customer_ref))
            .select(BrandEntity::as_select())
            .first::<BrandEntity>(&mut conn)
            .optional()?;

        Ok(brand)
    }

    async fn find_active_by_id(&self, brand_id: Uuid) -> Result<Option<BrandEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let brand = brands::table
            .filter(brands::id.eq(brand_id))
            .filter(brands::status.eq(BrandStatus::Active.as_str()))
            .select(BrandEntity::as_select())
            .first::<BrandEntity>(&mut conn)
            .optional()?;

        Ok(brand)
    }

    async fn list_by_statuses(&self, statuses: Vec<BrandStatus>) -> Result<Vec<BrandEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let statuses: Vec<&'static str> = statuses.iter().map(BrandStatus::as_str).collect();
        let results = brands::table
            .filter(brands::status.eq_any(statuses))
            .order(brands::created_at.asc())
            .select(BrandEntity::as_select())
            .load::<BrandEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update_profile(
        &self,
        brand_id: Uuid,
        changes: UpdateBrandProfileEntity,
    ) -> Result<Option<BrandEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let brand = update(brands::table.find(brand_id))
            .set(&changes)
            .returning(BrandEntity::as_returning())
            .get_result::<BrandEntity>(&mut conn)
            .optional()?;

        Ok(brand)
    }

    async fn update_status(
        &self,
        brand_id: Uuid,
        expected: BrandStatus,
        next: BrandStatus,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(brands::table)
            .filter(brands::id.eq(brand_id))
            .filter(brands::status.eq(expected.as_str()))
            .set((
                brands::status.eq(next.as_str()),
                brands::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    async fn set_customer_ref_if_absent(
        &self,
        brand_id: Uuid,
        customer_ref: &str,
    ) -> Result<Option<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let written = update(brands::table)
            .filter(brands::id.eq(brand_id))
            .filter(brands::stripe_customer_id.is_null())
            .set((
                brands::stripe_customer_id.eq(customer_ref),
                brands::updated_at.eq(Utc::now()),
            ))
            .returning(brands::stripe_customer_id)
            .get_result::<Option<String>>(&mut conn)
            .optional()
            .map_err(map_store_error)?;

        if let Some(stored) = written {
            return Ok(stored);
        }

        // Lost the race or the brand already had one; report what is stored.
        let stored = brands::table
            .find(brand_id)
            .select(brands::stripe_customer_id)
            .first::<Option<String>>(&mut conn)
            .optional()?;

        Ok(stored.flatten())
    }
}
