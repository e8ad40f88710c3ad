pub mod billing_modes;
pub mod brand_statuses;
pub mod facility_statuses;
pub mod invoice_statuses;
pub mod plan_types;
pub mod subscription_statuses;
