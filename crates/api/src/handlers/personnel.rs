//! Handlers for the `/personnel` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sitetrack_core::types::DbId;
use sitetrack_db::models::project::ProjectWithCompany;
use sitetrack_db::models::qr_scan::QrCodeScan;
use sitetrack_db::models::user::{Personnel, UpdateUser};
use sitetrack_db::models::user_project::{AssignUser, UserProject};
use sitetrack_db::models::Page;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{CompanyParams, PaginationParams};
use crate::response::DataResponse;
use crate::services::personnel::{
    self as service, CreatePersonnel, PersonnelOverview, PersonnelQuery, PersonnelStats,
    ResetPassword,
};
use crate::services::projects;
use crate::state::AppState;

/// Request body for `POST /personnel/{id}/projects`.
#[derive(Debug, Deserialize)]
pub struct AssignProject {
    pub project_id: DbId,
    pub role: Option<String>,
    pub notes: Option<String>,
}

/// GET /api/personnel
///
/// Search, filter and sort personnel. The caller is never listed.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PersonnelQuery>,
) -> AppResult<Json<DataResponse<Page<Personnel>>>> {
    let page = service::list(&state.pool, &auth.caller(), &query).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/personnel/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Personnel>>> {
    let person = service::get(&state.pool, &auth.caller(), id).await?;
    Ok(Json(DataResponse::new(person)))
}

/// POST /api/personnel
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePersonnel>,
) -> AppResult<(StatusCode, Json<DataResponse<Personnel>>)> {
    let person =
        service::create(&state.pool, &auth.caller(), &state.config.calendar, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(person))))
}

/// PUT /api/personnel/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<Personnel>>> {
    let person = service::update(&state.pool, &auth.caller(), id, &input).await?;
    Ok(Json(DataResponse::new(person)))
}

/// DELETE /api/personnel/{id}
///
/// Deactivates the account.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    service::delete(&state.pool, &auth.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/personnel/{id}/reset-password
///
/// Set a new password and revoke the user's sessions.
pub async fn reset_password(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPassword>,
) -> AppResult<StatusCode> {
    service::reset_password(&state.pool, id, &input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/personnel/{id}/projects
pub async fn list_projects(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProjectWithCompany>>>> {
    let projects = service::projects(&state.pool, &auth.caller(), id).await?;
    Ok(Json(DataResponse::new(projects)))
}

/// POST /api/personnel/{id}/projects
pub async fn assign_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignProject>,
) -> AppResult<(StatusCode, Json<DataResponse<UserProject>>)> {
    let assignment = AssignUser {
        user_id: id,
        role: input.role,
        notes: input.notes,
    };
    let assignment =
        projects::assign_user(&state.pool, &auth.caller(), input.project_id, &assignment).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(assignment))))
}

/// DELETE /api/personnel/{id}/projects/{project_id}
pub async fn remove_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, project_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    projects::remove_user(&state.pool, &auth.caller(), project_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/personnel/{id}/scans
pub async fn scans(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Page<QrCodeScan>>>> {
    let (limit, offset) = page.resolve();
    let page = service::scans(&state.pool, &auth.caller(), id, limit, offset).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/personnel/{id}/stats
pub async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PersonnelStats>>> {
    let stats = service::stats(&state.pool, &auth.caller(), &state.config.calendar, id).await?;
    Ok(Json(DataResponse::new(stats)))
}

/// GET /api/personnel/stats
pub async fn general_stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CompanyParams>,
) -> AppResult<Json<DataResponse<PersonnelOverview>>> {
    let overview = service::general_stats(
        &state.pool,
        &auth.caller(),
        &state.config.calendar,
        params.company_id,
    )
    .await?;
    Ok(Json(DataResponse::new(overview)))
}

/// GET /api/personnel/active
pub async fn active(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CompanyParams>,
) -> AppResult<Json<DataResponse<Vec<Personnel>>>> {
    let people = service::active(&state.pool, &auth.caller(), params.company_id).await?;
    Ok(Json(DataResponse::new(people)))
}

/// GET /api/personnel/company/{company_id}
pub async fn by_company(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Personnel>>>> {
    let people = service::company_personnel(&state.pool, &auth.caller(), company_id).await?;
    Ok(Json(DataResponse::new(people)))
}

/// GET /api/personnel/project/{project_id}
pub async fn by_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Personnel>>>> {
    let people = service::project_personnel(&state.pool, &auth.caller(), project_id).await?;
    Ok(Json(DataResponse::new(people)))
}
