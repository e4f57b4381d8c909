mod common;

use chrono::{TimeZone, Utc};
use common::{seed_company, seed_project, seed_user};
use sitetrack_core::calendar::SiteCalendar;
use sitetrack_core::presence::{is_checked_in, PresenceScan};
use sitetrack_core::status::{ScanType, UserRole};
use sitetrack_db::models::qr_scan::{CreateQrCodeScan, ScanScope};
use sitetrack_db::repositories::QrScanRepo;
use sqlx::PgPool;

fn scan(user_id: i64, project_id: Option<i64>, hour: u32, scan_type: ScanType) -> CreateQrCodeScan {
    CreateQrCodeScan {
        qr_code_data: "SITE-GATE-1".to_string(),
        user_id,
        project_id,
        scanned_at: Utc.with_ymd_and_hms(2025, 6, 10, hour, 0, 0).unwrap(),
        location: None,
        scan_type,
        notes: None,
        additional_data: None,
        latitude: None,
        longitude: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn presence_follows_the_latest_pair(pool: PgPool) {
    let company = seed_company(&pool, "Acme Build").await;
    let project = seed_project(&pool, "Tower A", company).await;
    let user = seed_user(&pool, "worker@example.com", UserRole::SiteStaff, Some(company)).await;

    for (hour, kind) in [(8, ScanType::CheckIn), (12, ScanType::CheckOut), (13, ScanType::CheckIn)] {
        QrScanRepo::create(&pool, &scan(user, Some(project), hour, kind))
            .await
            .unwrap();
    }

    let cal = SiteCalendar::utc();
    let window = cal.day_window(common::date(2025, 6, 10));
    let facts: Vec<PresenceScan> = QrScanRepo::facts(
        &pool,
        &ScanScope {
            user_id: Some(user),
            from: Some(window.start),
            to: Some(window.end),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .into_iter()
    .map(PresenceScan::from)
    .collect();

    assert_eq!(facts.len(), 3);
    assert!(is_checked_in(&facts, &window, Some(project)));

    let next_day = cal.day_window(common::date(2025, 6, 11));
    assert!(!is_checked_in(&facts, &next_day, Some(project)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn invalid_scans_are_not_facts(pool: PgPool) {
    let user = seed_user(&pool, "worker@example.com", UserRole::SiteStaff, None).await;
    let id = QrScanRepo::create(&pool, &scan(user, None, 8, ScanType::CheckIn))
        .await
        .unwrap();
    sqlx::query("UPDATE qr_code_scans SET is_valid = false WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let scope = ScanScope {
        user_id: Some(user),
        ..Default::default()
    };
    assert!(QrScanRepo::facts(&pool, &scope).await.unwrap().is_empty());
    assert_eq!(QrScanRepo::count(&pool, &scope).await.unwrap(), 1);
    assert_eq!(QrScanRepo::count_check_ins(&pool, &scope).await.unwrap(), 0);
}
