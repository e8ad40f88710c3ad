pub mod admin_users;
pub mod brands;
pub mod facilities;
pub mod invoices;
pub mod subscriptions;
