use anyhow::Result;
use backend::axum_http::http_serve;
use backend::config::config_loader;
use backend::usecases::{auth::AuthUseCase, subscriptions::BillingSettings};
use directory_core::infra::db::{
    postgres::postgres_connection,
    repositories::{admin_users::AdminUserPostgres, brands::BrandPostgres},
};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Backend exited with error: {}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    directory_core::observability::init_observability("backend")?;

    let dotenvy_env = config_loader::load()?;
    info!("ENV has been loaded");

    let postgres_pool = Arc::new(postgres_connection::establish_connection(
        &dotenvy_env.database.url,
    )?);
    postgres_connection::ping(&postgres_pool)?;
    postgres_connection::run_migrations(&postgres_pool)?;
    info!("Postgres connection has been established");

    if let Some(admin) = &dotenvy_env.bootstrap_admin {
        let auth_usecase = AuthUseCase::new(
            Arc::new(BrandPostgres::new(Arc::clone(&postgres_pool))),
            Arc::new(AdminUserPostgres::new(Arc::clone(&postgres_pool))),
            dotenvy_env.auth.clone(),
        );
        auth_usecase
            .ensure_bootstrap_admin(&admin.email, &admin.password)
            .await?;
    }

    let billing = BillingSettings::from_config(dotenvy_env.stripe.as_ref());
    info!(billing_mode = %billing.mode(), "Billing mode resolved");

    http_serve::start(Arc::new(dotenvy_env), postgres_pool, billing).await?;

    Ok(())
}
