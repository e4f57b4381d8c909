//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use sitetrack_core::types::DbId;
use sitetrack_db::models::project::{
    CreateProject, Project, ProjectCounts, ProjectWithCompany, UpdateProject,
};
use sitetrack_db::models::user_project::{AssignUser, AssignedUser, UserProject};
use sitetrack_db::models::Page;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{CompanyParams, CountParams, PaginationParams};
use crate::response::DataResponse;
use crate::services::projects::{self as service, ProgressUpdate, ProjectDetail};
use crate::state::AppState;

/// GET /api/projects
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(company): Query<CompanyParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Page<ProjectWithCompany>>>> {
    let (limit, offset) = page.resolve();
    let page =
        service::list(&state.pool, &auth.caller(), company.company_id, limit, offset).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let detail = service::get(&state.pool, &auth.caller(), &state.config.calendar, id).await?;
    Ok(Json(DataResponse::new(detail)))
}

/// POST /api/projects
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let project = service::create(&state.pool, &auth.caller(), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(project))))
}

/// PUT /api/projects/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = service::update(&state.pool, &auth.caller(), id, &input).await?;
    Ok(Json(DataResponse::new(project)))
}

/// DELETE /api/projects/{id}
///
/// Soft delete. Repeating it on an already-inactive project succeeds.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    service::delete(&state.pool, &auth.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/projects/mine
pub async fn mine(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProjectWithCompany>>>> {
    let projects = service::user_projects(&state.pool, &auth.caller(), None).await?;
    Ok(Json(DataResponse::new(projects)))
}

/// GET /api/projects/user/{user_id}
pub async fn for_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProjectWithCompany>>>> {
    let projects = service::user_projects(&state.pool, &auth.caller(), Some(user_id)).await?;
    Ok(Json(DataResponse::new(projects)))
}

/// GET /api/projects/stats
pub async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CompanyParams>,
) -> AppResult<Json<DataResponse<ProjectCounts>>> {
    let counts = service::stats(
        &state.pool,
        &auth.caller(),
        &state.config.calendar,
        params.company_id,
    )
    .await?;
    Ok(Json(DataResponse::new(counts)))
}

/// GET /api/projects/active
pub async fn active(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CompanyParams>,
) -> AppResult<Json<DataResponse<Vec<ProjectWithCompany>>>> {
    let projects = service::active(&state.pool, &auth.caller(), params.company_id).await?;
    Ok(Json(DataResponse::new(projects)))
}

/// GET /api/projects/delayed
pub async fn delayed(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CompanyParams>,
) -> AppResult<Json<DataResponse<Vec<ProjectWithCompany>>>> {
    let projects = service::delayed(
        &state.pool,
        &auth.caller(),
        &state.config.calendar,
        params.company_id,
    )
    .await?;
    Ok(Json(DataResponse::new(projects)))
}

/// GET /api/projects/recent
pub async fn recent(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(company): Query<CompanyParams>,
    Query(params): Query<CountParams>,
) -> AppResult<Json<DataResponse<Vec<ProjectWithCompany>>>> {
    let projects =
        service::recent(&state.pool, &auth.caller(), company.company_id, params.count).await?;
    Ok(Json(DataResponse::new(projects)))
}

/// GET /api/projects/{id}/users
pub async fn users(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AssignedUser>>>> {
    let users = service::project_users(&state.pool, &auth.caller(), id).await?;
    Ok(Json(DataResponse::new(users)))
}

/// POST /api/projects/{id}/users
pub async fn assign_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignUser>,
) -> AppResult<(StatusCode, Json<DataResponse<UserProject>>)> {
    let assignment = service::assign_user(&state.pool, &auth.caller(), id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(assignment))))
}

/// DELETE /api/projects/{id}/users/{user_id}
pub async fn remove_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    service::remove_user(&state.pool, &auth.caller(), id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/projects/{id}/progress
pub async fn update_progress(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ProgressUpdate>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project =
        service::update_progress(&state.pool, &auth.caller(), id, input.progress).await?;
    Ok(Json(DataResponse::new(project)))
}

/// POST /api/projects/{id}/complete
pub async fn complete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project =
        service::complete(&state.pool, &auth.caller(), &state.config.calendar, id).await?;
    Ok(Json(DataResponse::new(project)))
}
