pub mod acknowledgements;
pub mod admin_users;
pub mod billing;
pub mod billing_periods;
pub mod brands;
pub mod enums;
pub mod facilities;
pub mod invoices;
pub mod patch_fields;
pub mod provider_events;
pub mod status_transitions;
pub mod subscriptions;
