use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::value_objects::enums::facility_statuses::FacilityStatus;
use crate::infra::db::postgres::schema::facilities;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = facilities)]
pub struct FacilityEntity {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ethical_highlight: String,
    pub photo_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FacilityEntity {
    pub fn facility_status(&self) -> Option<FacilityStatus> {
        FacilityStatus::from_str(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = facilities)]
pub struct InsertFacilityEntity {
    pub brand_id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ethical_highlight: String,
    pub photo_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = facilities)]
pub struct UpdateFacilityEntity {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
    pub ethical_highlight: Option<String>,
    pub photo_url: Option<Option<String>>,
    pub updated_at: DateTime<Utc>,
}

/// A facility row joined with the display name of its brand.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityWithBrandEntity {
    pub facility: FacilityEntity,
    pub brand_name: String,
}
