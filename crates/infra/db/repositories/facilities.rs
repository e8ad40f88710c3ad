use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{OptionalExtension, RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{brands, facilities},
    },
};
use domain::{
    entities::facilities::{
        FacilityEntity, FacilityWithBrandEntity, InsertFacilityEntity, UpdateFacilityEntity,
    },
    repositories::facilities::FacilityRepository,
    value_objects::enums::{brand_statuses::BrandStatus, facility_statuses::FacilityStatus},
};

const EDITABLE_STATUSES: [&str; 2] = ["PENDING_REVIEW", "REJECTED"];

pub struct FacilityPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl FacilityPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn with_brand(rows: Vec<(FacilityEntity, String)>) -> Vec<FacilityWithBrandEntity> {
    rows.into_iter()
        .map(|(facility, brand_name)| FacilityWithBrandEntity {
            facility,
            brand_name,
        })
        .collect()
}

#[async_trait]
impl FacilityRepository for FacilityPostgres {
    async fn create(&self, facility: InsertFacilityEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let facility_id = insert_into(facilities::table)
            .values(&facility)
            .returning(facilities::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(facility_id)
    }

    async fn find_by_id(&self, facility_id: Uuid) -> Result<Option<FacilityEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let facility = facilities::table
            .find(facility_id)
            .select(FacilityEntity::as_select())
            .first::<FacilityEntity>(&mut conn)
            .optional()?;

        Ok(facility)
    }

    async fn find_owned(
        &self,
        facility_id: Uuid,
        brand_id: Uuid,
    ) -> Result<Option<FacilityEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let facility = facilities::table
            .filter(facilities::id.eq(facility_id))
            .filter(facilities::brand_id.eq(brand_id))
            .select(FacilityEntity::as_select())
            .first::<FacilityEntity>(&mut conn)
            .optional()?;

        Ok(facility)
    }

    async fn list_by_brand(&self, brand_id: Uuid) -> Result<Vec<FacilityEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = facilities::table
            .filter(facilities::brand_id.eq(brand_id))
            .order(facilities::created_at.desc())
            .select(FacilityEntity::as_select())
            .load::<FacilityEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_approved_by_brand(&self, brand_id: Uuid) -> Result<Vec<FacilityEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = facilities::table
            .filter(facilities::brand_id.eq(brand_id))
            .filter(facilities::status.eq(FacilityStatus::Approved.as_str()))
            .order(facilities::created_at.desc())
            .select(FacilityEntity::as_select())
            .load::<FacilityEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update_owned(
        &self,
        facility_id: Uuid,
        brand_id: Uuid,
        changes: UpdateFacilityEntity,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(facilities::table)
            .filter(facilities::id.eq(facility_id))
            .filter(facilities::brand_id.eq(brand_id))
            .filter(facilities::status.eq_any(EDITABLE_STATUSES))
            .set(&changes)
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    async fn delete_owned(&self, facility_id: Uuid, brand_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(
            facilities::table
                .filter(facilities::id.eq(facility_id))
                .filter(facilities::brand_id.eq(brand_id)),
        )
        .execute(&mut conn)?;

        Ok(deleted > 0)
    }

    async fn set_status(&self, facility_id: Uuid, status: FacilityStatus) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(facilities::table.find(facility_id))
            .set((
                facilities::status.eq(status.as_str()),
                facilities::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    async fn list_pending_with_brand(&self) -> Result<Vec<FacilityWithBrandEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = facilities::table
            .inner_join(brands::table)
            .filter(facilities::status.eq(FacilityStatus::PendingReview.as_str()))
            .order(facilities::created_at.asc())
            .select((FacilityEntity::as_select(), brands::name))
            .load::<(FacilityEntity, String)>(&mut conn)?;

        Ok(with_brand(rows))
    }

    async fn list_public(&self) -> Result<Vec<FacilityWithBrandEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = facilities::table
            .inner_join(brands::table)
            .filter(facilities::status.eq(FacilityStatus::Approved.as_str()))
            .filter(brands::status.eq(BrandStatus::Active.as_str()))
            .order(facilities::created_at.desc())
            .select((FacilityEntity::as_select(), brands::name))
            .load::<(FacilityEntity, String)>(&mut conn)?;

        Ok(with_brand(rows))
    }
}
