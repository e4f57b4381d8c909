//! Role checks on admin-only endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, post_json_auth, send, token_for};
use sitetrack_core::status::UserRole;
use sqlx::PgPool;

#[tokio::test]
async fn non_admin_cannot_create_company() {
    for role in [UserRole::OfficeStaff, UserRole::SiteStaff, UserRole::Subcontractor] {
        let token = token_for(2, role, Some(1));
        let app = common::build_test_app(common::lazy_pool());
        let response = post_json_auth(
            app,
            "/api/companies",
            &token,
            serde_json::json!({ "name": "Northwind Builders" }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN, "role {role:?}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "FORBIDDEN");
    }
}

#[tokio::test]
async fn non_admin_cannot_delete_company() {
    let token = token_for(2, UserRole::OfficeStaff, Some(1));
    let app = common::build_test_app(common::lazy_pool());
    let response = send(app, Method::DELETE, "/api/companies/1", Some(&token), None).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn non_admin_cannot_reset_password() {
    let token = token_for(2, UserRole::OfficeStaff, Some(1));
    let app = common::build_test_app(common::lazy_pool());
    let response = post_json_auth(
        app,
        "/api/personnel/5/reset-password",
        &token,
        serde_json::json!({ "new_password": "a-new-password" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn admin_creates_company(pool: PgPool) {
    let admin = common::seed_user(&pool, "admin@site.test", UserRole::Admin, None).await;
    let token = token_for(admin, UserRole::Admin, None);
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/companies",
        &token,
        serde_json::json!({ "name": "Northwind Builders", "tax_number": "TR-001" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Northwind Builders");
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn staff_cannot_read_another_companys_project(pool: PgPool) {
    let ours = common::seed_company(&pool, "Ours").await;
    let theirs = common::seed_company(&pool, "Theirs").await;
    let project = common::seed_project(&pool, "Their tower", theirs).await;
    let staff = common::seed_user(&pool, "staff@site.test", UserRole::OfficeStaff, Some(ours)).await;
    let token = token_for(staff, UserRole::OfficeStaff, Some(ours));

    let response = common::get_auth(
        common::build_test_app(pool),
        &format!("/api/projects/{project}"),
        &token,
    )
    .await;

    assert!(matches!(
        response.status(),
        StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
    ));
}
