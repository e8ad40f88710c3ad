pub mod passwords;

use axum::{
    Json, async_trait,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::axum_http::error_responses::ErrorResponse;
use crate::config::{config_loader, config_model::AuthSecret, stage::Stage};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Brand,
    Admin,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

/// Identity of a signed-in brand account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandIdentity {
    pub brand_id: Uuid,
}

/// Identity of a signed-in administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminIdentity {
    pub admin_id: Uuid,
}

#[derive(Debug)]
pub struct AuthError(anyhow::Error);

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = StatusCode::UNAUTHORIZED;
        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message: format!("Unauthorized: {}", self.0),
        });
        (status, body).into_response()
    }
}

pub fn issue_access_token(subject: Uuid, role: Role, secret: &AuthSecret) -> anyhow::Result<String> {
    let exp = (Utc::now() + Duration::minutes(secret.ttl_minutes)).timestamp();
    let claims = AccessClaims {
        sub: subject.to_string(),
        role,
        exp: usize::try_from(exp)?,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn decode_access_token(token: &str, secret: &str) -> Result<AccessClaims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(jsonwebtoken::Algorithm::HS256);

    let token_data = decode::<AccessClaims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

pub fn validate_access_token(token: &str) -> Result<AccessClaims, AuthError> {
    let secret = config_loader::get_auth_secret()
        .map_err(|e| anyhow::anyhow!("Failed to load auth secret: {}", e))?;
    decode_access_token(token, &secret.secret)
}

/// Cookie carrying the access token for browser clients.
pub fn access_token_cookie(token: String, ttl_minutes: i64, stage: Stage) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(stage.secure_cookies())
        .max_age(cookie::time::Duration::minutes(ttl_minutes))
        .build()
}

pub fn clear_access_token(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"))
}

fn token_from_parts(parts: &Parts) -> Result<String, AuthError> {
    if let Some(header) = parts.headers.get(AUTHORIZATION) {
        let value = header
            .to_str()
            .map_err(|_| anyhow::anyhow!("Invalid Authorization header"))?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or_else(|| anyhow::anyhow!("Invalid Authorization header format"))?;
        return Ok(token.trim().to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| anyhow::anyhow!("Missing access token").into())
}

fn subject_with_role(parts: &Parts, role: Role) -> Result<Uuid, AuthError> {
    let token = token_from_parts(parts)?;
    let claims = validate_access_token(&token)?;

    if claims.role != role {
        return Err(anyhow::anyhow!("Token does not grant this role").into());
    }

    let subject =
        Uuid::parse_str(&claims.sub).map_err(|_| anyhow::anyhow!("Invalid subject in token"))?;
    Ok(subject)
}

#[async_trait]
impl<S> FromRequestParts<S> for BrandIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let brand_id = subject_with_role(parts, Role::Brand)?;
        Ok(BrandIdentity { brand_id })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin_id = subject_with_role(parts, Role::Admin)?;
        Ok(AdminIdentity { admin_id })
    }
}

#[cfg(test)]
mod tests;
