//! Handlers for the `/reports` resource.
//!
//! Range reports accept `start_date` and `end_date` (exclusive) as
//! `YYYY-MM-DD`; most default to the trailing 30 days.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use sitetrack_core::aggregation::{MonthlyReport, WeeklyReport};
use sitetrack_core::reports::{
    CompanyPerformanceReport, FinancialReport, PersonnelReport, ProjectProgressReport,
    ProjectReport, ReportType, UserPerformanceReport,
};
use sitetrack_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::reports::{
    self as service, DailyActivityReport, DailyQuery, DashboardReport, ExportFormat,
    MonthlyQuery, QrScanReport, ReportQuery, WeeklyQuery,
};
use crate::state::AppState;

/// GET /api/reports/dashboard
pub async fn dashboard(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<DataResponse<DashboardReport>>> {
    let report =
        service::dashboard(&state.pool, &auth.caller(), &state.config.calendar, &query).await?;
    Ok(Json(DataResponse::new(report)))
}

/// GET /api/reports/projects
pub async fn projects(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<DataResponse<ProjectReport>>> {
    let report =
        service::projects(&state.pool, &auth.caller(), &state.config.calendar, &query).await?;
    Ok(Json(DataResponse::new(report)))
}

/// GET /api/reports/personnel
pub async fn personnel(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<DataResponse<PersonnelReport>>> {
    let report =
        service::personnel(&state.pool, &auth.caller(), &state.config.calendar, &query).await?;
    Ok(Json(DataResponse::new(report)))
}

/// GET /api/reports/qr-scans
pub async fn qr_scans(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<DataResponse<QrScanReport>>> {
    let report =
        service::qr_scans(&state.pool, &auth.caller(), &state.config.calendar, &query).await?;
    Ok(Json(DataResponse::new(report)))
}

/// GET /api/reports/daily-activity
pub async fn daily_activity(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<DailyQuery>,
) -> AppResult<Json<DataResponse<DailyActivityReport>>> {
    let report =
        service::daily(&state.pool, &auth.caller(), &state.config.calendar, &query).await?;
    Ok(Json(DataResponse::new(report)))
}

/// GET /api/reports/weekly
pub async fn weekly(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<WeeklyQuery>,
) -> AppResult<Json<DataResponse<WeeklyReport>>> {
    let report =
        service::weekly(&state.pool, &auth.caller(), &state.config.calendar, &query).await?;
    Ok(Json(DataResponse::new(report)))
}

/// GET /api/reports/monthly?year=&month=
pub async fn monthly(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<MonthlyQuery>,
) -> AppResult<Json<DataResponse<MonthlyReport>>> {
    let report =
        service::monthly(&state.pool, &auth.caller(), &state.config.calendar, &query).await?;
    Ok(Json(DataResponse::new(report)))
}

/// GET /api/reports/company-performance/{company_id}
pub async fn company_performance(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
) -> AppResult<Json<DataResponse<CompanyPerformanceReport>>> {
    let report = service::company_performance_report(
        &state.pool,
        &auth.caller(),
        &state.config.calendar,
        company_id,
    )
    .await?;
    Ok(Json(DataResponse::new(report)))
}

/// GET /api/reports/user-performance/{user_id}
pub async fn user_performance(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<DataResponse<UserPerformanceReport>>> {
    let report = service::user_performance_report(
        &state.pool,
        &auth.caller(),
        &state.config.calendar,
        user_id,
        &query,
    )
    .await?;
    Ok(Json(DataResponse::new(report)))
}

/// GET /api/reports/project-progress/{project_id}
pub async fn project_progress(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectProgressReport>>> {
    let report = service::project_progress_report(&state.pool, &auth.caller(), project_id).await?;
    Ok(Json(DataResponse::new(report)))
}

/// GET /api/reports/financial
pub async fn financial(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<DataResponse<FinancialReport>>> {
    let report =
        service::financial(&state.pool, &auth.caller(), &state.config.calendar, &query).await?;
    Ok(Json(DataResponse::new(report)))
}

/// GET /api/reports/types
pub async fn types(_auth: AuthUser) -> Json<DataResponse<&'static [ReportType]>> {
    Json(DataResponse::new(service::types()))
}

/// POST /api/reports/export/{format}
///
/// Always 501: file rendering is not supported.
pub async fn export(_auth: AuthUser, Path(format): Path<ExportFormat>) -> AppResult<StatusCode> {
    service::export(format)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/reports/custom
///
/// Always 501.
pub async fn custom(_auth: AuthUser) -> AppResult<StatusCode> {
    service::custom()?;
    Ok(StatusCode::NO_CONTENT)
}
