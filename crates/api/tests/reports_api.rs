//! Report endpoints that answer without touching the database.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, get_auth, send, token_for};
use sitetrack_core::status::{ProjectStatus, UserRole};
use sqlx::PgPool;

fn admin_token() -> String {
    token_for(1, UserRole::Admin, None)
}

#[tokio::test]
async fn export_formats_are_not_implemented() {
    for uri in ["/api/reports/export/excel", "/api/reports/export/pdf"] {
        let app = common::build_test_app(common::lazy_pool());
        let response = send(app, Method::POST, uri, Some(&admin_token()), None).await;

        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "NOT_IMPLEMENTED");
    }
}

#[tokio::test]
async fn unknown_export_format_is_client_error() {
    let app = common::build_test_app(common::lazy_pool());
    let response = send(
        app,
        Method::POST,
        "/api/reports/export/docx",
        Some(&admin_token()),
        None,
    )
    .await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn custom_reports_are_not_implemented() {
    let app = common::build_test_app(common::lazy_pool());
    let response = send(
        app,
        Method::POST,
        "/api/reports/custom",
        Some(&admin_token()),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn report_types_lists_catalogue() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get_auth(app, "/api/reports/types", &admin_token()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let types = json["data"].as_array().unwrap();
    assert!(!types.is_empty());
    assert!(types.iter().all(|t| t["key"].is_string()));
}

#[tokio::test]
async fn reports_require_authentication() {
    let app = common::build_test_app(common::lazy_pool());
    let response = common::get(app, "/api/reports/types").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn out_of_range_dates_are_validation_errors() {
    for uri in [
        "/api/reports/daily-activity?date=%2B262142-12-31",
        "/api/reports/weekly?week_start=%2B262142-12-31",
        "/api/reports/qr-scans?end_date=%2B262142-12-31",
        "/api/reports/monthly?year=262142&month=12",
    ] {
        let app = common::build_test_app(common::lazy_pool());
        let response = get_auth(app, uri, &admin_token()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR", "{uri}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn weekly_report_counts_every_active_project(pool: PgPool) {
    let company = common::seed_company(&pool, "Acme").await;
    for (name, status) in [
        ("Depot", ProjectStatus::Active),
        ("Annex", ProjectStatus::Planning),
        ("Yard", ProjectStatus::OnHold),
    ] {
        let id = common::seed_project(&pool, name, company).await;
        sqlx::query("UPDATE projects SET status_id = $2 WHERE id = $1")
            .bind(id)
            .bind(status.id())
            .execute(&pool)
            .await
            .unwrap();
    }

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/reports/weekly?week_start=2025-06-01",
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["summary"]["total_active_projects"], 3);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/reports/monthly?year=2025&month=6",
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["summary"]["total_active_projects"], 3);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn inverted_date_range_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        "/api/reports/qr-scans?start_date=2025-06-10&end_date=2025-06-01",
        &admin_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn dashboard_report_on_empty_database(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/reports/dashboard", &admin_token()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["stats"]["active_projects"], 0);
    assert!(json["data"]["top_projects"].as_array().unwrap().is_empty());
}
