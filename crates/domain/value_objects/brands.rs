use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::brands::{BrandEntity, UpdateBrandProfileEntity};
use crate::domain::value_objects::patch_fields::nullable;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterBrandModel {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub contact_name: Option<String>,
    pub description: Option<String>,
    pub supply_chain_overview: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginModel {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Fields a brand may edit on its own profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BrandProfilePatch {
    pub name: Option<String>,
    pub contact_name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub logo_url: Option<Option<String>>,
    pub story: Option<String>,
    pub categories: Option<Vec<String>>,
}

impl BrandProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact_name.is_none()
            && self.description.is_none()
            && self.logo_url.is_none()
            && self.story.is_none()
            && self.categories.is_none()
    }

    pub fn into_changeset(self, updated_at: DateTime<Utc>) -> UpdateBrandProfileEntity {
        UpdateBrandProfileEntity {
            name: self.name,
            contact_name: self.contact_name,
            description: self.description,
            logo_url: self.logo_url,
            story: self.story,
            categories: self.categories.map(normalize_categories),
            updated_at,
        }
    }
}

/// Trims tags and drops empties so `"apparel, , basics"` style input stays clean.
pub fn normalize_categories(categories: Vec<String>) -> Vec<String> {
    categories
        .into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Brand as seen by its owner or an admin. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandProfileDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
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

impl From<BrandEntity> for BrandProfileDto {
    fn from(value: BrandEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            contact_name: value.contact_name,
            description: value.description,
            logo_url: value.logo_url,
            story: value.story,
            categories: value.categories,
            stripe_customer_id: value.stripe_customer_id,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicBrandDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub logo_url: Option<String>,
    pub story: String,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BrandEntity> for PublicBrandDto {
    fn from(value: BrandEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            logo_url: value.logo_url,
            story: value.story,
            categories: value.categories,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginDto {
    pub token: String,
    pub status: String,
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandStatusDto {
    pub success: bool,
    pub status: String,
}
