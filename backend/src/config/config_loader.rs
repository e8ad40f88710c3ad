use anyhow::{Context, Result};
use url::Url;

use super::config_model::{
    App, AuthSecret, BackendServer, BootstrapAdmin, Database, DotEnvyConfig, StripeSettings,
};
use super::stage::Stage;

const DEFAULT_JWT_TTL_MINUTES: i64 = 720;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();
    load_from(|key| std::env::var(key).ok())
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or_default();
    Stage::try_from(stage_str.as_str()).unwrap_or_default()
}

pub fn get_auth_secret() -> Result<AuthSecret> {
    dotenvy::dotenv().ok();
    auth_secret_from(&|key: &str| std::env::var(key).ok())
}

fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<DotEnvyConfig> {
    let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let backend_server = BackendServer {
        port: required(&lookup, "SERVER_PORT_BACKEND")?
            .parse()
            .context("SERVER_PORT_BACKEND is invalid")?,
        body_limit: required(&lookup, "SERVER_BODY_LIMIT")?
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: required(&lookup, "SERVER_TIMEOUT")?
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let database = Database {
        url: required(&lookup, "DATABASE_URL")?,
    };

    let stage = lookup("STAGE")
        .map(|raw| Stage::try_from(raw.as_str()))
        .transpose()?
        .unwrap_or_default();

    let base_url = lookup("APP_BASE_URL")
        .unwrap_or_else(|| format!("http://localhost:{}", backend_server.port));
    let app = App {
        base_url: Url::parse(&base_url).context("APP_BASE_URL is invalid")?,
    };

    let stripe = lookup("STRIPE_SECRET_KEY").map(|secret_key| StripeSettings {
        secret_key,
        webhook_secret: lookup("STRIPE_WEBHOOK_SECRET"),
        price_monthly: lookup("STRIPE_PRICE_MONTHLY"),
        price_annual: lookup("STRIPE_PRICE_ANNUAL"),
    });

    let bootstrap_admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
        (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
        _ => None,
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        stage,
        auth: auth_secret_from(&lookup)?,
        app,
        stripe,
        bootstrap_admin,
    })
}

fn auth_secret_from(lookup: &dyn Fn(&str) -> Option<String>) -> Result<AuthSecret> {
    let ttl_minutes = match lookup("JWT_TTL_MINUTES").filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw.parse().context("JWT_TTL_MINUTES is invalid")?,
        None => DEFAULT_JWT_TTL_MINUTES,
    };

    Ok(AuthSecret {
        secret: required(lookup, "JWT_SECRET")?,
        ttl_minutes,
    })
}

fn required(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key).with_context(|| format!("{key} is invalid"))
}
