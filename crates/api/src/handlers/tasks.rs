//! Handlers for the `/tasks` resource and its nested comments and photos.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use sitetrack_core::status::{StatusId, TaskPriority, TaskStatus};
use sitetrack_core::types::DbId;
use sitetrack_db::models::task::{
    CreateTask, CreateTaskPhoto, ProjectTask, TaskComment, TaskDetail, TaskPhoto, UpdateTask,
};
use sitetrack_db::models::Page;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{CompanyParams, ProjectParams};
use crate::response::DataResponse;
use crate::services::tasks::{
    self as service, AssignTask, NewComment, StatusUpdate, TaskQuery, TaskStats,
};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// GET /api/tasks
///
/// Filters: `search`, `status_id`, `priority_id`, `project_id`,
/// `assigned_to_user_id`, `company_id`, `overdue`. Also mounted at
/// `/api/tasks/search`.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> AppResult<Json<DataResponse<Page<TaskDetail>>>> {
    let page = service::list(&state.pool, &auth.caller(), &query).await?;
    Ok(Json(DataResponse::new(page)))
}

/// Shared body of the filtered list shortcuts below.
async fn list_where(
    auth: &AuthUser,
    state: &AppState,
    query: TaskQuery,
) -> AppResult<Json<DataResponse<Page<TaskDetail>>>> {
    let page = service::list(&state.pool, &auth.caller(), &query).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/tasks/user/{user_id}
pub async fn by_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Page<TaskDetail>>>> {
    let query = TaskQuery {
        assigned_to_user_id: Some(user_id),
        ..Default::default()
    };
    list_where(&auth, &state, query).await
}

/// GET /api/tasks/project/{project_id}
pub async fn by_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Page<TaskDetail>>>> {
    let query = TaskQuery {
        project_id: Some(project_id),
        ..Default::default()
    };
    list_where(&auth, &state, query).await
}

/// GET /api/tasks/status/{status_id}
pub async fn by_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(status_id): Path<StatusId>,
) -> AppResult<Json<DataResponse<Page<TaskDetail>>>> {
    TaskStatus::try_from(status_id)?;
    let query = TaskQuery {
        status_id: Some(status_id),
        ..Default::default()
    };
    list_where(&auth, &state, query).await
}

/// GET /api/tasks/priority/{priority_id}
pub async fn by_priority(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(priority_id): Path<StatusId>,
) -> AppResult<Json<DataResponse<Page<TaskDetail>>>> {
    TaskPriority::try_from(priority_id)?;
    let query = TaskQuery {
        priority_id: Some(priority_id),
        ..Default::default()
    };
    list_where(&auth, &state, query).await
}

/// GET /api/tasks/overdue
pub async fn overdue(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Page<TaskDetail>>>> {
    let query = TaskQuery {
        overdue: true,
        ..Default::default()
    };
    list_where(&auth, &state, query).await
}

/// GET /api/tasks/recent
pub async fn recent(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TaskDetail>>>> {
    let tasks = service::recent(&state.pool, &auth.caller()).await?;
    Ok(Json(DataResponse::new(tasks)))
}

/// GET /api/tasks/stats
pub async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(company): Query<CompanyParams>,
    Query(project): Query<ProjectParams>,
) -> AppResult<Json<DataResponse<TaskStats>>> {
    let stats = service::stats(
        &state.pool,
        &auth.caller(),
        company.company_id,
        project.project_id,
    )
    .await?;
    Ok(Json(DataResponse::new(stats)))
}

/// GET /api/tasks/company/{company_id}/stats
pub async fn company_stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
) -> AppResult<Json<DataResponse<TaskStats>>> {
    let stats = service::company_stats(&state.pool, &auth.caller(), company_id).await?;
    Ok(Json(DataResponse::new(stats)))
}

/// GET /api/tasks/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TaskDetail>>> {
    let task = service::get(&state.pool, &auth.caller(), id).await?;
    Ok(Json(DataResponse::new(task)))
}

/// POST /api/tasks
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<TaskDetail>>)> {
    let task = service::create(&state.pool, &auth.caller(), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(task))))
}

/// PUT /api/tasks/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<DataResponse<TaskDetail>>> {
    let task = service::update(&state.pool, &auth.caller(), id, &input).await?;
    Ok(Json(DataResponse::new(task)))
}

/// DELETE /api/tasks/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    service::delete(&state.pool, &auth.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/tasks/{id}/status
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusUpdate>,
) -> AppResult<Json<DataResponse<ProjectTask>>> {
    let task = service::update_status(&state.pool, &auth.caller(), id, &input).await?;
    Ok(Json(DataResponse::new(task)))
}

/// POST /api/tasks/{id}/complete
pub async fn complete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectTask>>> {
    let task = service::complete(&state.pool, &auth.caller(), id).await?;
    Ok(Json(DataResponse::new(task)))
}

/// POST /api/tasks/{id}/assign
pub async fn assign(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignTask>,
) -> AppResult<Json<DataResponse<ProjectTask>>> {
    let task = service::assign(&state.pool, &auth.caller(), id, input.user_id).await?;
    Ok(Json(DataResponse::new(task)))
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// GET /api/tasks/{id}/comments
pub async fn list_comments(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TaskComment>>>> {
    let comments = service::comments(&state.pool, &auth.caller(), id).await?;
    Ok(Json(DataResponse::new(comments)))
}

/// POST /api/tasks/{id}/comments
pub async fn add_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<NewComment>,
) -> AppResult<(StatusCode, Json<DataResponse<TaskComment>>)> {
    let comment = service::add_comment(&state.pool, &auth.caller(), id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(comment))))
}

/// DELETE /api/tasks/{id}/comments/{comment_id}
pub async fn delete_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, comment_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    service::delete_comment(&state.pool, &auth.caller(), id, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Photos
// ---------------------------------------------------------------------------

/// GET /api/tasks/{id}/photos
pub async fn list_photos(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TaskPhoto>>>> {
    let photos = service::photos(&state.pool, &auth.caller(), id).await?;
    Ok(Json(DataResponse::new(photos)))
}

/// POST /api/tasks/{id}/photos
///
/// Records metadata of a file that is already stored.
pub async fn add_photo(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateTaskPhoto>,
) -> AppResult<(StatusCode, Json<DataResponse<TaskPhoto>>)> {
    let photo = service::add_photo(&state.pool, &auth.caller(), id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(photo))))
}

/// DELETE /api/tasks/{id}/photos/{photo_id}
pub async fn delete_photo(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, photo_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    service::delete_photo(&state.pool, &auth.caller(), id, photo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
