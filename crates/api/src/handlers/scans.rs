//! Handlers for the `/qr-code` resource.
//!
//! Every scan is recorded against the authenticated caller.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use sitetrack_core::scan::TestQrCode;
use sitetrack_core::types::DbId;
use sitetrack_db::models::qr_scan::QrCodeScan;
use sitetrack_db::models::Page;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{CompanyParams, CountParams, PaginationParams, ProjectParams, UserParams};
use crate::response::DataResponse;
use crate::services::scans::{
    self as service, PresenceResponse, QrValidation, ScanRequest, ScanStats, ValidateRequest,
};
use crate::state::AppState;

/// POST /api/qr-code/scan
///
/// Record a scan of any type. `scan_type` defaults to `other`.
pub async fn scan(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ScanRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<QrCodeScan>>)> {
    let scan = service::scan(&state.pool, &auth.caller(), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(scan))))
}

/// POST /api/qr-code/check-in
pub async fn check_in(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ScanRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<QrCodeScan>>)> {
    let scan = service::check_in(&state.pool, &auth.caller(), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(scan))))
}

/// POST /api/qr-code/check-out
pub async fn check_out(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ScanRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<QrCodeScan>>)> {
    let scan = service::check_out(&state.pool, &auth.caller(), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(scan))))
}

/// POST /api/qr-code/validate
///
/// Check a payload without recording anything.
pub async fn validate(
    _auth: AuthUser,
    Json(input): Json<ValidateRequest>,
) -> Json<DataResponse<QrValidation>> {
    Json(DataResponse::new(service::validate(&input)))
}

/// GET /api/qr-code/user/{user_id}/scans
pub async fn user_scans(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Page<QrCodeScan>>>> {
    let (limit, offset) = page.resolve();
    let page = service::user_scans(&state.pool, &auth.caller(), user_id, limit, offset).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/qr-code/project/{project_id}/scans
pub async fn project_scans(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Page<QrCodeScan>>>> {
    let (limit, offset) = page.resolve();
    let page =
        service::project_scans(&state.pool, &auth.caller(), project_id, limit, offset).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/qr-code/today
pub async fn today(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<UserParams>,
) -> AppResult<Json<DataResponse<Vec<QrCodeScan>>>> {
    let scans = service::today_scans(
        &state.pool,
        &auth.caller(),
        &state.config.calendar,
        params.user_id,
    )
    .await?;
    Ok(Json(DataResponse::new(scans)))
}

/// GET /api/qr-code/user/{user_id}/checked-in
///
/// Whether the user is on site today, optionally on one `?project_id=`.
pub async fn presence(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<ProjectParams>,
) -> AppResult<Json<DataResponse<PresenceResponse>>> {
    let presence = service::presence(
        &state.pool,
        &auth.caller(),
        &state.config.calendar,
        user_id,
        params.project_id,
    )
    .await?;
    Ok(Json(DataResponse::new(presence)))
}

/// GET /api/qr-code/stats
pub async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CompanyParams>,
) -> AppResult<Json<DataResponse<ScanStats>>> {
    let stats = service::stats(
        &state.pool,
        &auth.caller(),
        &state.config.calendar,
        params.company_id,
    )
    .await?;
    Ok(Json(DataResponse::new(stats)))
}

/// GET /api/qr-code/recent
pub async fn recent(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CountParams>,
) -> AppResult<Json<DataResponse<Vec<QrCodeScan>>>> {
    let scans = service::recent(&state.pool, &auth.caller(), params.count).await?;
    Ok(Json(DataResponse::new(scans)))
}

/// GET /api/qr-code/generate-test
pub async fn generate_test(
    _auth: AuthUser,
    Query(params): Query<ProjectParams>,
) -> Json<DataResponse<TestQrCode>> {
    Json(DataResponse::new(service::test_payload(params.project_id)))
}
