use crate::{
    axum_http::{default_routers, routers},
    config::config_model::DotEnvyConfig,
    usecases::subscriptions::BillingSettings,
};
use anyhow::Result;
use axum::{
    Router,
    http::{
        Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use directory_core::{
    infra::db::postgres::postgres_connection::PgPoolSquad, payments::stripe_client::StripeClient,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Assembles every API route. Layers are applied by `start`.
pub fn app(
    config: &DotEnvyConfig,
    db_pool: Arc<PgPoolSquad>,
    billing: BillingSettings<StripeClient>,
) -> Router {
    let base_url = config.app.base_url.clone();

    Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/api/auth",
            routers::auth::brand_routes(Arc::clone(&db_pool), config),
        )
        .nest(
            "/api/admin",
            routers::auth::admin_routes(Arc::clone(&db_pool), config).merge(
                routers::admin::routes(Arc::clone(&db_pool), billing.clone(), base_url.clone()),
            ),
        )
        .nest(
            "/api/brand",
            routers::brands::routes(Arc::clone(&db_pool))
                .merge(routers::facilities::routes(Arc::clone(&db_pool)))
                .merge(routers::subscriptions::routes(
                    Arc::clone(&db_pool),
                    billing.clone(),
                    base_url,
                )),
        )
        .nest("/api/public", routers::public::routes(Arc::clone(&db_pool)))
        .nest(
            "/api/webhooks/stripe",
            routers::stripe_webhook::routes(Arc::clone(&db_pool), billing),
        )
        .route("/api/health-check", get(default_routers::health_check))
}

pub async fn start(
    config: Arc<DotEnvyConfig>,
    db_pool: Arc<PgPoolSquad>,
    billing: BillingSettings<StripeClient>,
) -> Result<()> {
    info!(billing_mode = %billing.mode(), stage = %config.stage, "Building router");

    let app = app(&config, db_pool, billing)
        .layer(request_timeout(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn request_timeout(limit: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, limit)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
