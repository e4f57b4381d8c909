//! Project tasks with their comments and photos.
//!
//! Tasks are scoped through their project's company. Unlike most entities
//! they are hard-deleted.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sitetrack_core::caller::CallerContext;
use sitetrack_core::error::CoreError;
use sitetrack_core::search::{
    clamp_limit, clamp_offset, like_pattern, DEFAULT_TASK_PAGE_SIZE, MAX_PAGE_SIZE,
};
use sitetrack_core::status::{StatusId, TaskPriority, TaskStatus};
use sitetrack_core::task::{
    completed_at_after, completion_rate, validate_comment, validate_task_title, RECENT_TASKS,
    STATS_RECENT_TASKS,
};
use sitetrack_core::types::DbId;
use sitetrack_db::models::task::{
    CreateTask, CreateTaskPhoto, ProjectTask, TaskComment, TaskCounts, TaskDetail, TaskFilter,
    TaskPhoto, UpdateTask,
};
use sitetrack_db::models::Page;
use sitetrack_db::repositories::{TaskCommentRepo, TaskPhotoRepo, TaskRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::services::{personnel, projects};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query string of the task list.
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub search: Option<String>,
    pub status_id: Option<StatusId>,
    pub priority_id: Option<StatusId>,
    pub project_id: Option<DbId>,
    pub assigned_to_user_id: Option<DbId>,
    pub company_id: Option<DbId>,
    #[serde(default)]
    pub overdue: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status_id: StatusId,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignTask {
    pub user_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct NewComment {
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct TaskStats {
    #[serde(flatten)]
    pub counts: TaskCounts,
    pub completion_rate: f64,
    pub recent_tasks: Vec<TaskDetail>,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Load a task the caller may see.
async fn load_visible(pool: &PgPool, caller: &CallerContext, id: DbId) -> AppResult<TaskDetail> {
    let task = TaskRepo::find_detail(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;
    caller.ensure_company_visible(task.company_id)?;
    Ok(task)
}

pub async fn get(pool: &PgPool, caller: &CallerContext, id: DbId) -> AppResult<TaskDetail> {
    load_visible(pool, caller, id).await
}

/// Paged task list, newest first. Page size defaults to 100.
pub async fn list(
    pool: &PgPool,
    caller: &CallerContext,
    query: &TaskQuery,
) -> AppResult<Page<TaskDetail>> {
    let filter = TaskFilter {
        company_id: caller.scope_company(query.company_id)?,
        project_id: query.project_id,
        assigned_to_user_id: query.assigned_to_user_id,
        status_id: query.status_id,
        priority_id: query.priority_id,
        search_pattern: like_pattern(query.search.as_deref()),
        overdue_at: query.overdue.then(Utc::now),
        limit: clamp_limit(query.limit, DEFAULT_TASK_PAGE_SIZE, MAX_PAGE_SIZE),
        offset: clamp_offset(query.offset),
    };
    let items = TaskRepo::list(pool, &filter).await?;
    let total_count = TaskRepo::count(pool, &filter).await?;
    Ok(Page { items, total_count })
}

/// The most recently created tasks in scope.
pub async fn recent(pool: &PgPool, caller: &CallerContext) -> AppResult<Vec<TaskDetail>> {
    let query = TaskQuery {
        limit: Some(RECENT_TASKS),
        ..Default::default()
    };
    Ok(list(pool, caller, &query).await?.items)
}

/// Counts, completion rate and the newest tasks.
pub async fn stats(
    pool: &PgPool,
    caller: &CallerContext,
    company_id: Option<DbId>,
    project_id: Option<DbId>,
) -> AppResult<TaskStats> {
    let filter = TaskFilter {
        company_id: caller.scope_company(company_id)?,
        project_id,
        limit: STATS_RECENT_TASKS,
        ..Default::default()
    };
    let counts = TaskRepo::counts(pool, &filter, Utc::now()).await?;
    let recent_tasks = TaskRepo::list(pool, &filter).await?;

    Ok(TaskStats {
        completion_rate: completion_rate(counts.completed_tasks, counts.total_tasks),
        counts,
        recent_tasks,
    })
}

pub async fn company_stats(
    pool: &PgPool,
    caller: &CallerContext,
    company_id: DbId,
) -> AppResult<TaskStats> {
    caller.ensure_company_visible(Some(company_id))?;
    stats(pool, caller, Some(company_id), None).await
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Create a To Do task assigned by the caller.
pub async fn create(
    pool: &PgPool,
    caller: &CallerContext,
    input: &CreateTask,
) -> AppResult<TaskDetail> {
    validate_task_title(&input.title)?;
    if let Some(priority_id) = input.priority_id {
        TaskPriority::try_from(priority_id)?;
    }
    projects::load_visible(pool, caller, input.project_id).await?;
    ensure_assignable(pool, caller, input.assigned_to_user_id).await?;

    let task = TaskRepo::create(pool, input, caller.user_id).await?;
    tracing::info!(
        task_id = task.id,
        project_id = task.project_id,
        assigned_to = task.assigned_to_user_id,
        "Task created"
    );
    get(pool, caller, task.id).await
}

pub async fn update(
    pool: &PgPool,
    caller: &CallerContext,
    id: DbId,
    input: &UpdateTask,
) -> AppResult<TaskDetail> {
    let current = load_visible(pool, caller, id).await?.task;

    if let Some(title) = &input.title {
        validate_task_title(title)?;
    }
    if let Some(priority_id) = input.priority_id {
        TaskPriority::try_from(priority_id)?;
    }
    if let Some(user_id) = input.assigned_to_user_id {
        ensure_assignable(pool, caller, user_id).await?;
    }
    let completed_at = match input.status_id {
        Some(status_id) => {
            completed_at_after(TaskStatus::try_from(status_id)?, current.completed_at, Utc::now())
        }
        None => current.completed_at,
    };

    TaskRepo::update(pool, id, input, completed_at)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;
    tracing::info!(task_id = id, user_id = caller.user_id, "Task updated");
    get(pool, caller, id).await
}

/// Delete a task together with its comments and photos.
pub async fn delete(pool: &PgPool, caller: &CallerContext, id: DbId) -> AppResult<()> {
    load_visible(pool, caller, id).await?;
    if !TaskRepo::delete(pool, id).await? {
        return Err(AppError::not_found("Task", id));
    }
    tracing::info!(task_id = id, user_id = caller.user_id, "Task deleted");
    Ok(())
}

/// Change the status, optionally leaving a comment in the same transaction.
pub async fn update_status(
    pool: &PgPool,
    caller: &CallerContext,
    id: DbId,
    input: &StatusUpdate,
) -> AppResult<ProjectTask> {
    let current = load_visible(pool, caller, id).await?.task;
    let status = TaskStatus::try_from(input.status_id)?;
    let comment = input
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    if let Some(comment) = comment {
        validate_comment(comment)?;
    }
    let completed_at = completed_at_after(status, current.completed_at, Utc::now());

    let mut tx = pool.begin().await?;
    let task = TaskRepo::set_status(&mut *tx, id, status.id(), completed_at)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;
    if let Some(comment) = comment {
        TaskCommentRepo::create(&mut *tx, id, caller.user_id, comment).await?;
    }
    tx.commit().await?;

    tracing::info!(task_id = id, status = status.label(), "Task status changed");
    Ok(task)
}

pub async fn complete(pool: &PgPool, caller: &CallerContext, id: DbId) -> AppResult<ProjectTask> {
    let input = StatusUpdate {
        status_id: TaskStatus::Completed.id(),
        comment: None,
    };
    update_status(pool, caller, id, &input).await
}

pub async fn assign(
    pool: &PgPool,
    caller: &CallerContext,
    id: DbId,
    user_id: DbId,
) -> AppResult<ProjectTask> {
    load_visible(pool, caller, id).await?;
    ensure_assignable(pool, caller, user_id).await?;
    let task = TaskRepo::assign(pool, id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;
    tracing::info!(task_id = id, assigned_to = user_id, "Task reassigned");
    Ok(task)
}

/// Tasks can only be given to active users the caller can see.
async fn ensure_assignable(pool: &PgPool, caller: &CallerContext, user_id: DbId) -> AppResult<()> {
    let person = personnel::load_visible(pool, caller, user_id).await?;
    if !person.is_active {
        return Err(CoreError::Validation(format!("User {user_id} is inactive")).into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

pub async fn comments(
    pool: &PgPool,
    caller: &CallerContext,
    task_id: DbId,
) -> AppResult<Vec<TaskComment>> {
    load_visible(pool, caller, task_id).await?;
    Ok(TaskCommentRepo::list_for_task(pool, task_id).await?)
}

pub async fn add_comment(
    pool: &PgPool,
    caller: &CallerContext,
    task_id: DbId,
    input: &NewComment,
) -> AppResult<TaskComment> {
    load_visible(pool, caller, task_id).await?;
    validate_comment(&input.comment)?;
    let id = TaskCommentRepo::create(pool, task_id, caller.user_id, input.comment.trim()).await?;
    TaskCommentRepo::list_for_task(pool, task_id)
        .await?
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| AppError::not_found("TaskComment", id))
}

pub async fn delete_comment(
    pool: &PgPool,
    caller: &CallerContext,
    task_id: DbId,
    id: DbId,
) -> AppResult<()> {
    load_visible(pool, caller, task_id).await?;
    if !TaskCommentRepo::delete(pool, task_id, id).await? {
        return Err(AppError::not_found("TaskComment", id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Photos
// ---------------------------------------------------------------------------

pub async fn photos(
    pool: &PgPool,
    caller: &CallerContext,
    task_id: DbId,
) -> AppResult<Vec<TaskPhoto>> {
    load_visible(pool, caller, task_id).await?;
    Ok(TaskPhotoRepo::list_for_task(pool, task_id).await?)
}

/// Record metadata of an already-stored photo.
pub async fn add_photo(
    pool: &PgPool,
    caller: &CallerContext,
    task_id: DbId,
    input: &CreateTaskPhoto,
) -> AppResult<TaskPhoto> {
    load_visible(pool, caller, task_id).await?;
    if input.file_path.trim().is_empty() || input.file_name.trim().is_empty() {
        return Err(CoreError::Validation("File path and file name are required".into()).into());
    }
    if input.file_size < 0 {
        return Err(CoreError::Validation("File size cannot be negative".into()).into());
    }
    let id = TaskPhotoRepo::create(pool, task_id, caller.user_id, input).await?;
    TaskPhotoRepo::list_for_task(pool, task_id)
        .await?
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::not_found("TaskPhoto", id))
}

pub async fn delete_photo(
    pool: &PgPool,
    caller: &CallerContext,
    task_id: DbId,
    id: DbId,
) -> AppResult<()> {
    load_visible(pool, caller, task_id).await?;
    if !TaskPhotoRepo::delete(pool, task_id, id).await? {
        return Err(AppError::not_found("TaskPhoto", id));
    }
    Ok(())
}
