pub mod auth;
pub mod billing;
pub mod brands;
pub mod directory;
pub mod errors;
pub mod facilities;
pub mod subscriptions;

#[cfg(test)]
pub(crate) mod test_fixtures;
