use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::admin_users},
};
use domain::{
    entities::admin_users::{AdminUserEntity, InsertAdminUserEntity},
    repositories::admin_users::AdminUserRepository,
};

pub struct AdminUserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AdminUserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AdminUserRepository for AdminUserPostgres {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let admin = admin_users::table
            .filter(admin_users::email.eq(email))
            .select(AdminUserEntity::as_select())
            .first::<AdminUserEntity>(&mut conn)
            .optional()?;

        Ok(admin)
    }

    async fn create_if_absent(&self, admin: InsertAdminUserEntity) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = insert_into(admin_users::table)
            .values(&admin)
            .on_conflict(admin_users::email)
            .do_nothing()
            .execute(&mut conn)?;

        Ok(inserted > 0)
    }
}
