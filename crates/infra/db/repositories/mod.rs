pub mod admin_users;
pub mod brands;
pub mod facilities;
pub mod invoices;
pub mod subscriptions;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::repositories::store_errors::StoreError;

/// Turns a unique-index violation into `StoreError::Conflict` so use cases can
/// tell it apart; everything else passes through unchanged.
pub(crate) fn map_store_error(err: DieselError) -> anyhow::Error {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let constraint = info.constraint_name().unwrap_or("unique").to_string();
            StoreError::Conflict(constraint).into()
        }
        other => other.into(),
    }
}
