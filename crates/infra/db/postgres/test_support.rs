use std::sync::Arc;

use chrono::Utc;
use diesel::{RunQueryDsl, insert_into};
use uuid::Uuid;

use super::postgres_connection::{PgPoolSquad, establish_connection, run_migrations};
use super::schema::brands;
use crate::domain::entities::brands::InsertBrandEntity;
use crate::domain::value_objects::enums::brand_statuses::BrandStatus;

// Run with: cargo test -p directory_core -- --ignored
pub fn test_pool() -> Arc<PgPoolSquad> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL is required");
    let pool = establish_connection(&url).expect("failed to build pool");
    run_migrations(&pool).expect("failed to apply schema");
    Arc::new(pool)
}

pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.test", Uuid::new_v4())
}

pub fn insert_brand(pool: &PgPoolSquad, status: BrandStatus) -> Uuid {
    let now = Utc::now();
    let mut conn = pool.get().expect("connection");
    insert_into(brands::table)
        .values(&InsertBrandEntity {
            name: "Test Brand".to_string(),
            email: unique_email("brand"),
            password_hash: "hash".to_string(),
            contact_name: String::new(),
            description: String::new(),
            story: "Cotton from cooperative farms".to_string(),
            categories: vec![],
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        })
        .returning(brands::id)
        .get_result::<Uuid>(&mut conn)
        .expect("insert brand")
}
