use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::facilities::{
    FacilityEntity, FacilityWithBrandEntity, UpdateFacilityEntity,
};
use crate::domain::value_objects::{brands::PublicBrandDto, patch_fields::nullable};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InsertFacilityModel {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ethical_highlight: Option<String>,
    pub photo_url: Option<String>,
}

/// Fields a brand may edit on a facility still under review.
/// Nullable columns use `Some(None)` for an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FacilityPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub longitude: Option<Option<f64>>,
    pub ethical_highlight: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub photo_url: Option<Option<String>>,
}

impl FacilityPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.address.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.ethical_highlight.is_none()
            && self.photo_url.is_none()
    }

    pub fn into_changeset(self, updated_at: DateTime<Utc>) -> UpdateFacilityEntity {
        UpdateFacilityEntity {
            title: self.title,
            description: self.description,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            ethical_highlight: self.ethical_highlight,
            photo_url: self.photo_url,
            updated_at,
        }
    }
}

/// Rejects coordinates outside the WGS84 ranges.
pub fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), String> {
    if let Some(lat) = latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!("latitude out of range: {lat}"));
        }
    }
    if let Some(lng) = longitude {
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!("longitude out of range: {lng}"));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityDto {
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

impl From<FacilityEntity> for FacilityDto {
    fn from(value: FacilityEntity) -> Self {
        Self {
            id: value.id,
            brand_id: value.brand_id,
            title: value.title,
            description: value.description,
            address: value.address,
            latitude: value.latitude,
            longitude: value.longitude,
            ethical_highlight: value.ethical_highlight,
            photo_url: value.photo_url,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Admin moderation queue row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingFacilityDto {
    #[serde(flatten)]
    pub facility: FacilityDto,
    pub brand_name: String,
}

impl From<FacilityWithBrandEntity> for PendingFacilityDto {
    fn from(value: FacilityWithBrandEntity) -> Self {
        Self {
            facility: value.facility.into(),
            brand_name: value.brand_name,
        }
    }
}

/// Map pin for an approved facility of an active brand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPointDto {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub brand_name: String,
    pub title: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ethical_highlight: String,
}

impl From<FacilityWithBrandEntity> for MapPointDto {
    fn from(value: FacilityWithBrandEntity) -> Self {
        let facility = value.facility;
        Self {
            id: facility.id,
            brand_id: facility.brand_id,
            brand_name: value.brand_name,
            title: facility.title,
            address: facility.address,
            latitude: facility.latitude,
            longitude: facility.longitude,
            ethical_highlight: facility.ethical_highlight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicFacilityDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ethical_highlight: String,
    pub photo_url: Option<String>,
}

impl From<FacilityEntity> for PublicFacilityDto {
    fn from(value: FacilityEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            address: value.address,
            latitude: value.latitude,
            longitude: value.longitude,
            ethical_highlight: value.ethical_highlight,
            photo_url: value.photo_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicBrandDetailDto {
    pub brand: PublicBrandDto,
    pub points: Vec<PublicFacilityDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_are_optional() {
        assert!(validate_coordinates(None, None).is_ok());
        assert!(validate_coordinates(Some(41.1579), Some(-8.6291)).is_ok());
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        assert!(validate_coordinates(Some(91.0), None).is_err());
        assert!(validate_coordinates(None, Some(-180.5)).is_err());
    }

    #[test]
    fn explicit_nulls_clear_coordinates() {
        let patch: FacilityPatch =
            serde_json::from_str(r#"{"latitude": null, "longitude": null}"#).unwrap();
        assert!(!patch.is_empty());
        assert_eq!(patch.latitude, Some(None));
        assert_eq!(patch.longitude, Some(None));
        assert_eq!(patch.photo_url, None);

        let changeset = patch.into_changeset(Utc::now());
        assert_eq!(changeset.latitude, Some(None));
        assert_eq!(changeset.photo_url, None);
    }

    #[test]
    fn null_alongside_other_fields_is_kept() {
        let patch: FacilityPatch =
            serde_json::from_str(r#"{"title": "Mill", "photo_url": null, "latitude": 12.5}"#)
                .unwrap();
        assert_eq!(patch.title.as_deref(), Some("Mill"));
        assert_eq!(patch.photo_url, Some(None));
        assert_eq!(patch.latitude, Some(Some(12.5)));
        assert_eq!(patch.longitude, None);
    }

    #[test]
    fn status_is_not_patchable() {
        let patch: FacilityPatch =
            serde_json::from_str(r#"{"status":"APPROVED","brand_id":"x"}"#).unwrap();
        assert!(patch.is_empty());
    }
}
