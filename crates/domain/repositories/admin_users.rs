use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::admin_users::{AdminUserEntity, InsertAdminUserEntity};

#[async_trait]
#[automock]
pub trait AdminUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUserEntity>>;

    /// Returns `false` when an admin with that email already exists.
    async fn create_if_absent(&self, admin: InsertAdminUserEntity) -> Result<bool>;
}
