use chrono::{DateTime, Utc};
use directory_core::domain::{
    entities::{
        brands::BrandEntity,
        facilities::{FacilityEntity, FacilityWithBrandEntity},
        subscriptions::SubscriptionEntity,
    },
    value_objects::enums::{
        brand_statuses::BrandStatus, facility_statuses::FacilityStatus, plan_types::PlanType,
        subscription_statuses::SubscriptionStatus,
    },
};
use uuid::Uuid;

pub fn brand(status: BrandStatus) -> BrandEntity {
    let now = Utc::now();
    BrandEntity {
        id: Uuid::new_v4(),
        name: "Fairthread".to_string(),
        email: "hello@fairthread.test".to_string(),
        password_hash: "$argon2id$unused".to_string(),
        contact_name: "Ada".to_string(),
        description: "Organic basics".to_string(),
        logo_url: None,
        story: "Cotton grown and spun in Gujarat".to_string(),
        categories: vec!["apparel".to_string()],
        stripe_customer_id: None,
        status: status.to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn facility(brand_id: Uuid, status: FacilityStatus) -> FacilityEntity {
    let now = Utc::now();
    FacilityEntity {
        id: Uuid::new_v4(),
        brand_id,
        title: "Spinning mill".to_string(),
        description: String::new(),
        address: "Ahmedabad".to_string(),
        latitude: Some(23.02),
        longitude: Some(72.57),
        ethical_highlight: "Living wage certified".to_string(),
        photo_url: None,
        status: status.to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn facility_with_brand(facility: FacilityEntity, brand_name: &str) -> FacilityWithBrandEntity {
    FacilityWithBrandEntity {
        facility,
        brand_name: brand_name.to_string(),
    }
}

pub fn subscription(brand_id: Uuid, plan: PlanType, renewal: DateTime<Utc>) -> SubscriptionEntity {
    SubscriptionEntity {
        id: Uuid::new_v4(),
        brand_id,
        plan_type: Some(plan.to_string()),
        status: SubscriptionStatus::Active.to_string(),
        stripe_subscription_id: None,
        renewal_date: Some(renewal),
        created_at: renewal,
        updated_at: renewal,
    }
}
