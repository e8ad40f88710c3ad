use super::*;
use axum::http::Request;
use std::env;

const SECRET: &str = "supersecretjwtsecretforunittesting123";

fn set_env_vars() {
    unsafe {
        env::set_var("JWT_SECRET", SECRET);
        env::set_var("JWT_TTL_MINUTES", "60");
    }
}

fn auth_secret() -> AuthSecret {
    AuthSecret {
        secret: SECRET.to_string(),
        ttl_minutes: 60,
    }
}

fn parts_with(header: Option<(&str, String)>) -> Parts {
    let mut builder = Request::builder().uri("/api/brand/me");
    if let Some((name, value)) = header {
        builder = builder.header(name, value);
    }
    builder.body(()).unwrap().into_parts().0
}

#[test]
fn test_issued_token_round_trips() {
    let brand_id = Uuid::new_v4();
    let token = issue_access_token(brand_id, Role::Brand, &auth_secret()).unwrap();

    let claims = decode_access_token(&token, SECRET).expect("Valid token should pass");
    assert_eq!(claims.sub, brand_id.to_string());
    assert_eq!(claims.role, Role::Brand);
}

#[test]
fn test_expired_token_is_rejected() {
    let claims = AccessClaims {
        sub: Uuid::new_v4().to_string(),
        role: Role::Admin,
        exp: 1, // past
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert!(decode_access_token(&token, SECRET).is_err());
}

#[test]
fn test_wrong_secret_is_rejected() {
    let token = issue_access_token(
        Uuid::new_v4(),
        Role::Brand,
        &AuthSecret {
            secret: "wrongsecret".to_string(),
            ttl_minutes: 60,
        },
    )
    .unwrap();

    assert!(decode_access_token(&token, SECRET).is_err());
}

#[tokio::test]
async fn test_brand_identity_from_bearer_header() {
    set_env_vars();
    let brand_id = Uuid::new_v4();
    let token = issue_access_token(brand_id, Role::Brand, &auth_secret()).unwrap();
    let mut parts = parts_with(Some(("authorization", format!("Bearer {token}"))));

    let identity = BrandIdentity::from_request_parts(&mut parts, &()).await.unwrap();

    assert_eq!(identity.brand_id, brand_id);
}

#[tokio::test]
async fn test_admin_identity_from_cookie() {
    set_env_vars();
    let admin_id = Uuid::new_v4();
    let token = issue_access_token(admin_id, Role::Admin, &auth_secret()).unwrap();
    let mut parts = parts_with(Some(("cookie", format!("{ACCESS_TOKEN_COOKIE}={token}"))));

    let identity = AdminIdentity::from_request_parts(&mut parts, &()).await.unwrap();

    assert_eq!(identity.admin_id, admin_id);
}

#[tokio::test]
async fn test_brand_token_cannot_act_as_admin() {
    set_env_vars();
    let token = issue_access_token(Uuid::new_v4(), Role::Brand, &auth_secret()).unwrap();
    let mut parts = parts_with(Some(("authorization", format!("Bearer {token}"))));

    let rejection = AdminIdentity::from_request_parts(&mut parts, &()).await.unwrap_err();

    assert_eq!(rejection.into_response().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    set_env_vars();
    let mut parts = parts_with(None);

    assert!(BrandIdentity::from_request_parts(&mut parts, &()).await.is_err());
}

#[test]
fn test_cookie_is_secure_only_in_production() {
    let local = access_token_cookie("t".to_string(), 30, Stage::Local);
    let production = access_token_cookie("t".to_string(), 30, Stage::Production);

    assert_eq!(local.secure(), Some(false));
    assert_eq!(production.secure(), Some(true));
    assert_eq!(production.http_only(), Some(true));
}
