//! Repository for the `project_tasks` table.

use sitetrack_core::status::{StatusId, TaskPriority, TaskStatus};
use sitetrack_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::task::{CreateTask, ProjectTask, TaskCounts, TaskDetail, TaskFilter, UpdateTask};
use crate::repositories::filter::{BindValue, Filter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, status_id, priority_id, project_id, \
                       assigned_to_user_id, assigned_by_user_id, due_date, location, \
                       completed_at, notes, created_at, updated_at";

/// Joined projection. Aliases: `t` project_tasks, `p` projects, `ua`/`ub` users.
const DETAIL_COLUMNS: &str = "t.id, t.title, t.description, t.status_id, t.priority_id, \
    t.project_id, t.assigned_to_user_id, t.assigned_by_user_id, t.due_date, t.location, \
    t.completed_at, t.notes, t.created_at, t.updated_at, \
    p.name AS project_name, p.company_id, \
    NULLIF(TRIM(CONCAT(ua.first_name, ' ', ua.last_name)), '') AS assigned_to_name, \
    NULLIF(TRIM(CONCAT(ub.first_name, ' ', ub.last_name)), '') AS assigned_by_name, \
    (SELECT COUNT(*) FROM task_comments tc WHERE tc.task_id = t.id) AS comment_count, \
    (SELECT COUNT(*) FROM task_photos tp WHERE tp.task_id = t.id) AS photo_count";

const DETAIL_FROM: &str = "project_tasks t \
                           JOIN projects p ON p.id = t.project_id \
                           LEFT JOIN users ua ON ua.id = t.assigned_to_user_id \
                           LEFT JOIN users ub ON ub.id = t.assigned_by_user_id";

/// Tasks are hard-deleted; comments and photos cascade.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task in the To Do state.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateTask,
        assigned_by_user_id: DbId,
    ) -> Result<ProjectTask, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_tasks (title, description, status_id, priority_id, project_id,
                                        assigned_to_user_id, assigned_by_user_id, due_date,
                                        location, notes)
             VALUES ($1, $2, $3, COALESCE($4, $5), $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectTask>(&query)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(TaskStatus::Todo.id())
            .bind(input.priority_id)
            .bind(TaskPriority::Medium.id())
            .bind(input.project_id)
            .bind(input.assigned_to_user_id)
            .bind(assigned_by_user_id)
            .bind(input.due_date)
            .bind(&input.location)
            .bind(&input.notes)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectTask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_tasks WHERE id = $1");
        sqlx::query_as::<_, ProjectTask>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a task with names, owning company and child counts.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<TaskDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} WHERE t.id = $1");
        sqlx::query_as::<_, TaskDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Paged list, newest first.
    pub async fn list(pool: &PgPool, params: &TaskFilter) -> Result<Vec<TaskDetail>, sqlx::Error> {
        let filter = build_task_filter(params);
        let bind_idx = filter.next_index();
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} {} \
             ORDER BY t.created_at DESC, t.id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            filter.where_clause(),
            bind_idx + 1
        );
        filter
            .bind_as(sqlx::query_as::<_, TaskDetail>(&query))
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(pool)
            .await
    }

    /// Count tasks matching the filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &TaskFilter) -> Result<i64, sqlx::Error> {
        let filter = build_task_filter(params);
        let query = format!(
            "SELECT COUNT(*) FROM project_tasks t JOIN projects p ON p.id = t.project_id {}",
            filter.where_clause()
        );
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Status, overdue and priority counts for tasks matching the filter.
    ///
    /// Paging fields of `params` are ignored.
    pub async fn counts(
        pool: &PgPool,
        params: &TaskFilter,
        now: Timestamp,
    ) -> Result<TaskCounts, sqlx::Error> {
        let filter = build_task_filter(params);
        let n = filter.next_index();
        let query = format!(
            "SELECT COUNT(*) AS total_tasks,
                    COUNT(*) FILTER (WHERE t.status_id = ${}) AS todo_tasks,
                    COUNT(*) FILTER (WHERE t.status_id = ${}) AS in_progress_tasks,
                    COUNT(*) FILTER (WHERE t.status_id = ${}) AS completed_tasks,
                    COUNT(*) FILTER (WHERE t.status_id = ${}) AS cancelled_tasks,
                    COUNT(*) FILTER (
                        WHERE t.due_date < ${} AND t.status_id NOT IN (${}, ${})
                    ) AS overdue_tasks,
                    COUNT(*) FILTER (WHERE t.priority_id >= ${}) AS high_priority_tasks
             FROM project_tasks t JOIN projects p ON p.id = t.project_id {}",
            n,
            n + 1,
            n + 2,
            n + 3,
            n + 4,
            n + 2,
            n + 3,
            n + 5,
            filter.where_clause()
        );
        filter
            .bind_as(sqlx::query_as::<_, TaskCounts>(&query))
            .bind(TaskStatus::Todo.id())
            .bind(TaskStatus::InProgress.id())
            .bind(TaskStatus::Completed.id())
            .bind(TaskStatus::Cancelled.id())
            .bind(now)
            .bind(TaskPriority::High.id())
            .fetch_one(pool)
            .await
    }

    /// Every task of a project, by due date.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_tasks WHERE project_id = $1
             ORDER BY due_date NULLS LAST, id"
        );
        sqlx::query_as::<_, ProjectTask>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// `completed_at` is always written; the caller derives it from the status change.
    pub async fn update(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        input: &UpdateTask,
        completed_at: Option<Timestamp>,
    ) -> Result<Option<ProjectTask>, sqlx::Error> {
        let query = format!(
            "UPDATE project_tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status_id = COALESCE($4, status_id),
                priority_id = COALESCE($5, priority_id),
                assigned_to_user_id = COALESCE($6, assigned_to_user_id),
                due_date = COALESCE($7, due_date),
                location = COALESCE($8, location),
                notes = COALESCE($9, notes),
                completed_at = $10
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectTask>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.status_id)
            .bind(input.priority_id)
            .bind(input.assigned_to_user_id)
            .bind(input.due_date)
            .bind(&input.location)
            .bind(&input.notes)
            .bind(completed_at)
            .fetch_optional(executor)
            .await
    }

    /// Set the status and the derived completion time.
    pub async fn set_status(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        status_id: StatusId,
        completed_at: Option<Timestamp>,
    ) -> Result<Option<ProjectTask>, sqlx::Error> {
        let query = format!(
            "UPDATE project_tasks SET status_id = $2, completed_at = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectTask>(&query)
            .bind(id)
            .bind(status_id)
            .bind(completed_at)
            .fetch_optional(executor)
            .await
    }

    /// Reassign a task.
    pub async fn assign(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<ProjectTask>, sqlx::Error> {
        let query = format!(
            "UPDATE project_tasks SET assigned_to_user_id = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectTask>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a task and, by cascade, its comments and photos.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Translate a [`TaskFilter`] into a dynamic `WHERE` clause over `t` and `p`.
fn build_task_filter(params: &TaskFilter) -> Filter {
    let mut filter = Filter::new();
    if let Some(company_id) = params.company_id {
        filter.push("p.company_id = {}", BindValue::BigInt(company_id));
    }
    if let Some(project_id) = params.project_id {
        filter.push("t.project_id = {}", BindValue::BigInt(project_id));
    }
    if let Some(user_id) = params.assigned_to_user_id {
        filter.push("t.assigned_to_user_id = {}", BindValue::BigInt(user_id));
    }
    if let Some(status_id) = params.status_id {
        filter.push("t.status_id = {}", BindValue::SmallInt(status_id));
    }
    if let Some(priority_id) = params.priority_id {
        filter.push("t.priority_id = {}", BindValue::SmallInt(priority_id));
    }
    if let Some(ref pattern) = params.search_pattern {
        filter.push(
            "(t.title ILIKE {} OR t.description ILIKE {})",
            BindValue::Text(pattern.clone()),
        );
    }
    if let Some(now) = params.overdue_at {
        filter
            .push("t.due_date < {}", BindValue::Timestamp(now))
            .push("t.status_id <> {}", BindValue::SmallInt(TaskStatus::Completed.id()))
            .push("t.status_id <> {}", BindValue::SmallInt(TaskStatus::Cancelled.id()));
    }
    filter
}
