//! One-shot self-managed billing run, meant for cron:
//! `run_billing monthly` or `run_billing annual`.

use std::sync::Arc;

use anyhow::{Result, anyhow, bail};
use backend::{
    config::config_loader,
    usecases::{billing::BillingReconciler, subscriptions::BillingSettings},
};
use chrono::Utc;
use directory_core::{
    domain::value_objects::enums::plan_types::PlanType,
    infra::db::{
        postgres::postgres_connection,
        repositories::{
            brands::BrandPostgres, invoices::InvoicePostgres, subscriptions::SubscriptionPostgres,
        },
    },
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Billing run failed: {}", error);
        std::process::exit(1);
    }
}

fn plan_from_args() -> Result<PlanType> {
    let arg = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: run_billing <monthly|annual>"))?;
    PlanType::from_str(&arg.to_ascii_uppercase())
        .ok_or_else(|| anyhow!("unknown plan '{arg}', expected monthly or annual"))
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    directory_core::observability::init_observability("run_billing")?;

    let plan = plan_from_args()?;
    let dotenvy_env = config_loader::load()?;

    let billing = BillingSettings::from_config(dotenvy_env.stripe.as_ref());
    if let BillingSettings::Managed { .. } = billing {
        bail!("STRIPE_SECRET_KEY is set; renewals are billed by Stripe");
    }

    let postgres_pool = Arc::new(postgres_connection::establish_connection(
        &dotenvy_env.database.url,
    )?);
    postgres_connection::run_migrations(&postgres_pool)?;

    let reconciler = BillingReconciler::new(
        Arc::new(BrandPostgres::new(Arc::clone(&postgres_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(&postgres_pool))),
        Arc::new(InvoicePostgres::new(Arc::clone(&postgres_pool))),
        billing,
    );

    let summary = reconciler.run_billing(plan, Utc::now()).await?;
    info!(%plan, processed = summary.processed, "Billing run complete");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if !summary.failed.is_empty() {
        bail!("{} subscription(s) could not be billed", summary.failed.len());
    }

    Ok(())
}
