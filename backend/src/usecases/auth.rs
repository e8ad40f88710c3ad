use std::sync::Arc;

use chrono::Utc;
use directory_core::domain::{
    entities::{admin_users::InsertAdminUserEntity, brands::InsertBrandEntity},
    repositories::{admin_users::AdminUserRepository, brands::BrandRepository},
    value_objects::{
        acknowledgements::CreatedDto,
        admin_users::AdminLoginDto,
        brands::{LoginDto, LoginModel, RegisterBrandModel},
        enums::brand_statuses::BrandStatus,
    },
};
use tracing::{error, info, warn};

use crate::auth::{Role, issue_access_token, passwords};
use crate::config::config_model::AuthSecret;
use crate::usecases::errors::{UseCaseError, UseCaseResult};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub struct AuthUseCase<B, A>
where
    B: BrandRepository + Send + Sync + 'static,
    A: AdminUserRepository + Send + Sync + 'static,
{
    brand_repo: Arc<B>,
    admin_repo: Arc<A>,
    auth_secret: AuthSecret,
}

impl<B, A> AuthUseCase<B, A>
where
    B: BrandRepository + Send + Sync + 'static,
    A: AdminUserRepository + Send + Sync + 'static,
{
    pub fn new(brand_repo: Arc<B>, admin_repo: Arc<A>, auth_secret: AuthSecret) -> Self {
        Self {
            brand_repo,
            admin_repo,
            auth_secret,
        }
    }

    pub fn token_ttl_minutes(&self) -> i64 {
        self.auth_secret.ttl_minutes
    }

    pub async fn register_brand(&self, model: RegisterBrandModel) -> UseCaseResult<CreatedDto> {
        let (Some(name), Some(email), Some(password), Some(story)) = (
            required(model.name),
            required(model.email),
            required(model.password),
            required(model.supply_chain_overview),
        ) else {
            let err = UseCaseError::Validation("Missing required fields".to_string());
            warn!(
                status = err.status_code().as_u16(),
                "auth: registration rejected for missing fields"
            );
            return Err(err);
        };
        let email = normalize_email(&email);
        info!(%email, "auth: brand registration requested");

        let password_hash = passwords::hash_password(&password)?;
        let now = Utc::now();
        let brand_id = self
            .brand_repo
            .create(InsertBrandEntity {
                name,
                email: email.clone(),
                password_hash,
                contact_name: model.contact_name.unwrap_or_default(),
                description: model.description.unwrap_or_default(),
                story,
                categories: Vec::new(),
                status: BrandStatus::PendingApproval.to_string(),
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(|err| {
                let mapped = UseCaseError::from_store(err, "Email already registered");
                match &mapped {
                    UseCaseError::Conflict(_) => warn!(
                        %email,
                        status = mapped.status_code().as_u16(),
                        "auth: email already registered"
                    ),
                    _ => error!(%email, db_error = ?mapped, "auth: failed to create brand"),
                }
                mapped
            })?;

        info!(%brand_id, "auth: brand registered, awaiting approval");
        Ok(CreatedDto::new(brand_id))
    }

    /// Returns the signed access token alongside the response body.
    pub async fn login_brand(&self, model: LoginModel) -> UseCaseResult<LoginDto> {
        let (Some(email), Some(password)) = (required(model.email), model.password) else {
            return Err(UseCaseError::Validation(
                "email and password are required".to_string(),
            ));
        };
        let email = normalize_email(&email);

        let brand = self
            .brand_repo
            .find_by_email(&email)
            .await
            .map_err(|err| {
                error!(%email, db_error = ?err, "auth: failed to load brand for login");
                UseCaseError::Internal(err)
            })?;

        let Some(brand) = brand.filter(|b| passwords::verify_password(&password, &b.password_hash))
        else {
            warn!(%email, "auth: brand login failed");
            return Err(UseCaseError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let status = brand.brand_status().ok_or_else(|| {
            error!(brand_id = %brand.id, status = %brand.status, "auth: brand has unknown status");
            UseCaseError::Internal(anyhow::anyhow!("unknown brand status {}", brand.status))
        })?;

        if !status.can_sign_in() {
            let err = UseCaseError::Forbidden("Your application was rejected".to_string());
            warn!(
                brand_id = %brand.id,
                status = err.status_code().as_u16(),
                "auth: rejected brand attempted login"
            );
            return Err(err);
        }

        let token = issue_access_token(brand.id, Role::Brand, &self.auth_secret)?;
        info!(brand_id = %brand.id, brand_status = %status, "auth: brand signed in");

        Ok(LoginDto {
            token,
            status: status.to_string(),
            pending: status == BrandStatus::PendingApproval,
        })
    }

    pub async fn login_admin(&self, model: LoginModel) -> UseCaseResult<AdminLoginDto> {
        let (Some(email), Some(password)) = (required(model.email), model.password) else {
            return Err(UseCaseError::Validation(
                "email and password are required".to_string(),
            ));
        };
        let email = normalize_email(&email);

        let admin = self
            .admin_repo
            .find_by_email(&email)
            .await
            .map_err(|err| {
                error!(%email, db_error = ?err, "auth: failed to load admin for login");
                UseCaseError::Internal(err)
            })?;

        let Some(admin) = admin.filter(|a| passwords::verify_password(&password, &a.password_hash))
        else {
            warn!(%email, "auth: admin login failed");
            return Err(UseCaseError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let token = issue_access_token(admin.id, Role::Admin, &self.auth_secret)?;
        info!(admin_id = %admin.id, "auth: admin signed in");

        Ok(AdminLoginDto {
            success: true,
            token,
        })
    }

    /// Seeds the configured administrator. Existing accounts are left untouched.
    pub async fn ensure_bootstrap_admin(&self, email: &str, password: &str) -> UseCaseResult<bool> {
        let email = normalize_email(email);
        let created = self
            .admin_repo
            .create_if_absent(InsertAdminUserEntity {
                email: email.clone(),
                password_hash: passwords::hash_password(password)?,
                created_at: Utc::now(),
            })
            .await
            .map_err(|err| {
                error!(%email, db_error = ?err, "auth: failed to seed admin");
                UseCaseError::Internal(err)
            })?;

        if created {
            info!(%email, "auth: bootstrap admin created");
        }
        Ok(created)
    }
}
