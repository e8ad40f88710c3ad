use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::value_objects::enums::brand_statuses::BrandStatus;
use crate::infra::db::postgres::schema::brands;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = brands)]
pub struct BrandEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub contact_name: String,
    pub description: String,
    pub logo_url: Option<String>,
    pub story: String,
    pub categories: Vec<String>,
    pub stripe_customer_id: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BrandEntity {
    /// Stored status. Rows are only ever written through the status machine,
    /// so an unknown value means the row was edited out of band.
    pub fn brand_status(&self) -> Option<BrandStatus> {
        BrandStatus::from_str(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = brands)]
pub struct InsertBrandEntity {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub contact_name: String,
    pub description: String,
    pub story: String,
    pub categories: Vec<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Allow-listed profile columns a brand may change. `None` leaves the column as is.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = brands)]
pub struct UpdateBrandProfileEntity {
    pub name: Option<String>,
    pub contact_name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<Option<String>>,
    pub story: Option<String>,
    pub categories: Option<Vec<String>>,
    pub updated_at: DateTime<Utc>,
}
