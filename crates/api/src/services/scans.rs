//! QR code scans, presence, and scan statistics.
//!
//! Scan writes are unconditional: a second check-in without a check-out is
//! recorded like any other. Presence is inferred on read.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sitetrack_core::caller::CallerContext;
use sitetrack_core::calendar::SiteCalendar;
use sitetrack_core::presence::{presence_state, PresenceScan, PresenceState};
use sitetrack_core::scan::{
    ensure_valid_qr_code, is_valid_qr_code, test_qr_code, validate_coordinates, TestQrCode,
    DEFAULT_RECENT_SCANS, MAX_RECENT_SCANS, MIN_QR_CODE_LEN,
};
use sitetrack_core::status::{ActivityType, ScanType, StatusId};
use sitetrack_core::types::{DbId, Timestamp};
use sitetrack_db::models::activity_log::CreateActivityLog;
use sitetrack_db::models::qr_scan::{CreateQrCodeScan, QrCodeScan, ScanScope};
use sitetrack_db::models::Page;
use sitetrack_db::repositories::{ActivityLogRepo, QrScanRepo};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::{personnel, projects, today};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ScanRequest {
    pub qr_code_data: String,
    pub project_id: Option<DbId>,
    pub location: Option<String>,
    /// Defaults to `other` on the generic scan endpoint.
    pub scan_type: Option<ScanType>,
    pub notes: Option<String>,
    pub additional_data: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub qr_code_data: String,
}

#[derive(Debug, Serialize)]
pub struct QrValidation {
    pub is_valid: bool,
    pub message: String,
}

/// Presence of one person today, optionally on one project.
#[derive(Debug, Serialize)]
pub struct PresenceResponse {
    pub user_id: DbId,
    pub project_id: Option<DbId>,
    pub checked_in: bool,
    pub since: Option<Timestamp>,
    pub checked_out_at: Option<Timestamp>,
}

impl PresenceResponse {
    fn new(user_id: DbId, project_id: Option<DbId>, state: PresenceState) -> Self {
        let (since, checked_out_at) = match state {
            PresenceState::NotCheckedIn => (None, None),
            PresenceState::CheckedIn { since } => (Some(since), None),
            PresenceState::CheckedOut { at } => (None, Some(at)),
        };
        Self {
            user_id,
            project_id,
            checked_in: state.is_checked_in(),
            since,
            checked_out_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScanTypeStat {
    pub scan_type_id: StatusId,
    pub scan_type_name: &'static str,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct ScanStats {
    pub total_scans: i64,
    pub today_scans: i64,
    pub by_type: Vec<ScanTypeStat>,
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Record a scan by the caller and append a `QrCodeScanned` entry.
pub async fn scan(
    pool: &PgPool,
    caller: &CallerContext,
    input: &ScanRequest,
) -> AppResult<QrCodeScan> {
    ensure_valid_qr_code(&input.qr_code_data)?;
    validate_coordinates(input.latitude, input.longitude)?;
    if let Some(project_id) = input.project_id {
        projects::load_visible(pool, caller, project_id).await?;
    }
    let scan_type = input.scan_type.unwrap_or(ScanType::Other);

    let mut log = CreateActivityLog::new(ActivityType::QrCodeScanned, "QR code scanned")
        .description(format!("{} scan recorded", scan_type.label()))
        .user(caller.user_id)
        .company(caller.company_id)
        .location(input.location.clone());
    if let Some(project_id) = input.project_id {
        log = log.project(project_id);
    }

    let mut tx = pool.begin().await?;
    let id = QrScanRepo::create(
        &mut *tx,
        &CreateQrCodeScan {
            qr_code_data: input.qr_code_data.trim().to_string(),
            user_id: caller.user_id,
            project_id: input.project_id,
            scanned_at: Utc::now(),
            location: input.location.clone(),
            scan_type,
            notes: input.notes.clone(),
            additional_data: input.additional_data.clone(),
            latitude: input.latitude,
            longitude: input.longitude,
        },
    )
    .await?;
    ActivityLogRepo::create(&mut *tx, &log).await?;
    tx.commit().await?;

    tracing::info!(
        scan_id = id,
        user_id = caller.user_id,
        project_id = ?input.project_id,
        scan_type = scan_type.label(),
        "QR code scanned"
    );
    QrScanRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("QrCodeScan", id))
}

pub async fn check_in(
    pool: &PgPool,
    caller: &CallerContext,
    input: &ScanRequest,
) -> AppResult<QrCodeScan> {
    let input = ScanRequest {
        scan_type: Some(ScanType::CheckIn),
        ..input.clone()
    };
    scan(pool, caller, &input).await
}

pub async fn check_out(
    pool: &PgPool,
    caller: &CallerContext,
    input: &ScanRequest,
) -> AppResult<QrCodeScan> {
    let input = ScanRequest {
        scan_type: Some(ScanType::CheckOut),
        ..input.clone()
    };
    scan(pool, caller, &input).await
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

pub fn validate(input: &ValidateRequest) -> QrValidation {
    let is_valid = is_valid_qr_code(&input.qr_code_data);
    let message = if is_valid {
        "QR code is valid".to_string()
    } else {
        format!("QR code data must be at least {MIN_QR_CODE_LEN} characters")
    };
    QrValidation { is_valid, message }
}

pub async fn user_scans(
    pool: &PgPool,
    caller: &CallerContext,
    user_id: DbId,
    limit: i64,
    offset: i64,
) -> AppResult<Page<QrCodeScan>> {
    personnel::scans(pool, caller, user_id, limit, offset).await
}

pub async fn project_scans(
    pool: &PgPool,
    caller: &CallerContext,
    project_id: DbId,
    limit: i64,
    offset: i64,
) -> AppResult<Page<QrCodeScan>> {
    projects::load_visible(pool, caller, project_id).await?;
    let scope = ScanScope {
        project_id: Some(project_id),
        ..Default::default()
    };
    let items = QrScanRepo::list(pool, &scope, limit, offset).await?;
    let total_count = QrScanRepo::count(pool, &scope).await?;
    Ok(Page { items, total_count })
}

/// Today's scans in the caller's scope, newest first.
pub async fn today_scans(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    user_id: Option<DbId>,
) -> AppResult<Vec<QrCodeScan>> {
    if let Some(user_id) = user_id {
        personnel::load_visible(pool, caller, user_id).await?;
    }
    let window = cal.day_window(today(cal));
    let scope = ScanScope {
        company_id: caller.scope_company(None)?,
        user_id,
        from: Some(window.start),
        to: Some(window.end),
        ..Default::default()
    };
    let mut scans = QrScanRepo::list_ascending(pool, &scope).await?;
    scans.reverse();
    Ok(scans)
}

/// Whether a person is checked in today, optionally on one project.
pub async fn presence(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    user_id: DbId,
    project_id: Option<DbId>,
) -> AppResult<PresenceResponse> {
    personnel::load_visible(pool, caller, user_id).await?;
    let window = cal.day_window(today(cal));
    let scope = ScanScope {
        user_id: Some(user_id),
        project_id,
        from: Some(window.start),
        to: Some(window.end),
        ..Default::default()
    };
    let scans: Vec<PresenceScan> = QrScanRepo::facts(pool, &scope)
        .await?
        .into_iter()
        .map(PresenceScan::from)
        .collect();
    let state = presence_state(&scans, &window, project_id);
    Ok(PresenceResponse::new(user_id, project_id, state))
}

pub async fn stats(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    company_id: Option<DbId>,
) -> AppResult<ScanStats> {
    let company_id = caller.scope_company(company_id)?;
    let window = cal.day_window(today(cal));
    let all = ScanScope {
        company_id,
        ..Default::default()
    };
    let today_scope = ScanScope {
        company_id,
        from: Some(window.start),
        to: Some(window.end),
        ..Default::default()
    };
    let total_scans = QrScanRepo::count(pool, &all).await?;
    let today_scans = QrScanRepo::count(pool, &today_scope).await?;
    let by_type = QrScanRepo::count_by_type(pool, &all).await?;

    Ok(ScanStats {
        total_scans,
        today_scans,
        by_type: by_type
            .into_iter()
            .map(|t| ScanTypeStat {
                scan_type_id: t.scan_type_id,
                scan_type_name: ScanType::from_id(t.scan_type_id).map_or("Unknown", ScanType::label),
                count: t.count,
            })
            .collect(),
    })
}

/// The newest scans in scope; `count` is clamped to `[1, 100]`.
pub async fn recent(
    pool: &PgPool,
    caller: &CallerContext,
    count: Option<i64>,
) -> AppResult<Vec<QrCodeScan>> {
    let scope = ScanScope {
        company_id: caller.scope_company(None)?,
        ..Default::default()
    };
    let count = count.unwrap_or(DEFAULT_RECENT_SCANS).clamp(1, MAX_RECENT_SCANS);
    Ok(QrScanRepo::list(pool, &scope, count, 0).await?)
}

/// A fresh payload for testing scanners.
pub fn test_payload(project_id: Option<DbId>) -> TestQrCode {
    test_qr_code(project_id, &Uuid::new_v4().simple().to_string(), Utc::now())
}
