//! HTTP-level tests for authentication.
//!
//! Token rejections need no database. The login flow is ignored unless a
//! PostgreSQL instance is available.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, get, get_auth, post_json, token_for};
use sitetrack_api::auth::jwt::{generate_access_token, JwtConfig};
use sitetrack_api::auth::password::hash_password;
use sitetrack_core::caller::CallerContext;
use sitetrack_core::status::UserRole;
use sitetrack_db::models::user::CreateUser;
use sitetrack_db::repositories::UserRepo;
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Token rejections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_authorization_header_is_401() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get(app, "/api/projects").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing Authorization header");
}

#[tokio::test]
async fn non_bearer_scheme_is_401() {
    let app = common::build_test_app(common::lazy_pool());
    let request = Request::builder()
        .uri("/api/dashboard")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Invalid Authorization format. Expected: Bearer <token>"
    );
}

#[tokio::test]
async fn garbage_token_is_401() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get_auth(app, "/api/tasks", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}

#[tokio::test]
async fn token_signed_with_another_secret_is_401() {
    let foreign = JwtConfig {
        secret: "some-other-secret".to_string(),
        access_token_expiry_mins: 15,
        refresh_token_expiry_days: 7,
    };
    let caller = CallerContext::new(1, UserRole::Admin, None);
    let token = generate_access_token(&caller, &foreign).unwrap();

    let app = common::build_test_app(common::lazy_pool());
    let response = get_auth(app, "/api/reports/types", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_reaches_handler() {
    let token = token_for(7, UserRole::SiteStaff, Some(1));
    let app = common::build_test_app(common::lazy_pool());
    let response = get_auth(app, "/api/reports/types", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(!json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn login_with_malformed_body_is_rejected_before_database() {
    let app = common::build_test_app(common::lazy_pool());
    let response = post_json(app, "/api/auth/login", serde_json::json!({ "email": 42 })).await;

    assert!(response.status().is_client_error());
}

// ---------------------------------------------------------------------------
// Login flow (database)
// ---------------------------------------------------------------------------

async fn seed_login_user(pool: &PgPool, email: &str, password: &str) {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            first_name: "Site".to_string(),
            last_name: "Manager".to_string(),
            phone_number: None,
            role_id: UserRole::OfficeStaff.id(),
            company_id: None,
            position: None,
            address: None,
            birth_date: None,
            hire_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            salary: None,
        },
    )
    .await
    .unwrap();
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn login_returns_tokens_and_user(pool: PgPool) {
    seed_login_user(&pool, "manager@site.test", "correct-horse").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "Manager@Site.test", "password": "correct-horse" });
    let response = post_json(app, "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["access_token"].is_string());
    assert!(json["data"]["refresh_token"].is_string());
    assert_eq!(json["data"]["user"]["email"], "manager@site.test");
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn login_with_wrong_password_is_401(pool: PgPool) {
    seed_login_user(&pool, "wrong@site.test", "correct-horse").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "wrong@site.test", "password": "battery-staple" });
    let response = post_json(app, "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn current_user_round_trip(pool: PgPool) {
    seed_login_user(&pool, "me@site.test", "correct-horse").await;
    let login = post_json(
        common::build_test_app(pool.clone()),
        "/api/auth/login",
        serde_json::json!({ "email": "me@site.test", "password": "correct-horse" }),
    )
    .await;
    let token = body_json(login).await["data"]["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = get_auth(common::build_test_app(pool), "/api/auth/current-user", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["email"], "me@site.test");
}
