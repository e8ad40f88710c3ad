use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};
use axum_extra::extract::CookieJar;
use directory_core::{
    domain::{
        repositories::{admin_users::AdminUserRepository, brands::BrandRepository},
        value_objects::{
            acknowledgements::SuccessDto,
            brands::{LoginModel, RegisterBrandModel},
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{admin_users::AdminUserPostgres, brands::BrandPostgres},
    },
};
use tracing::info;

use crate::{
    auth::{access_token_cookie, clear_access_token},
    config::{config_model::DotEnvyConfig, stage::Stage},
    usecases::auth::AuthUseCase,
};

pub struct AuthState<B, A>
where
    B: BrandRepository + Send + Sync + 'static,
    A: AdminUserRepository + Send + Sync + 'static,
{
    pub usecase: AuthUseCase<B, A>,
    pub stage: Stage,
}

fn state(
    db_pool: Arc<PgPoolSquad>,
    config: &DotEnvyConfig,
) -> Arc<AuthState<BrandPostgres, AdminUserPostgres>> {
    let brand_repository = BrandPostgres::new(Arc::clone(&db_pool));
    let admin_repository = AdminUserPostgres::new(Arc::clone(&db_pool));
    Arc::new(AuthState {
        usecase: AuthUseCase::new(
            Arc::new(brand_repository),
            Arc::new(admin_repository),
            config.auth.clone(),
        ),
        stage: config.stage,
    })
}

/// Brand sign-up and sign-in, mounted under `/api/auth`.
pub fn brand_routes(db_pool: Arc<PgPoolSquad>, config: &DotEnvyConfig) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login_brand))
        .route("/logout", post(logout))
        .with_state(state(db_pool, config))
}

/// Administrator sign-in, merged into `/api/admin`.
pub fn admin_routes(db_pool: Arc<PgPoolSquad>, config: &DotEnvyConfig) -> Router {
    Router::new()
        .route("/login", post(login_admin))
        .route("/logout", post(logout))
        .with_state(state(db_pool, config))
}

pub async fn register<B, A>(
    State(state): State<Arc<AuthState<B, A>>>,
    Json(model): Json<RegisterBrandModel>,
) -> Response
where
    B: BrandRepository + Send + Sync + 'static,
    A: AdminUserRepository + Send + Sync + 'static,
{
    match state.usecase.register_brand(model).await {
        Ok(created) => Json(created).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn login_brand<B, A>(
    State(state): State<Arc<AuthState<B, A>>>,
    jar: CookieJar,
    Json(model): Json<LoginModel>,
) -> Response
where
    B: BrandRepository + Send + Sync + 'static,
    A: AdminUserRepository + Send + Sync + 'static,
{
    match state.usecase.login_brand(model).await {
        Ok(dto) => {
            let cookie = access_token_cookie(
                dto.token.clone(),
                state.usecase.token_ttl_minutes(),
                state.stage,
            );
            (jar.add(cookie), Json(dto)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn login_admin<B, A>(
    State(state): State<Arc<AuthState<B, A>>>,
    jar: CookieJar,
    Json(model): Json<LoginModel>,
) -> Response
where
    B: BrandRepository + Send + Sync + 'static,
    A: AdminUserRepository + Send + Sync + 'static,
{
    match state.usecase.login_admin(model).await {
        Ok(dto) => {
            let cookie = access_token_cookie(
                dto.token.clone(),
                state.usecase.token_ttl_minutes(),
                state.stage,
            );
            (jar.add(cookie), Json(dto)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    info!("auth: logout");
    (clear_access_token(jar), Json(SuccessDto::ok()))
}
