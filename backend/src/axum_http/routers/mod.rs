pub mod admin;
pub mod auth;
pub mod brands;
pub mod facilities;
pub mod public;
pub mod stripe_webhook;
pub mod subscriptions;
