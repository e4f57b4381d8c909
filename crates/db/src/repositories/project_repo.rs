//! Repository for the `projects` table.

use sitetrack_core::status::ProjectStatus;
use sitetrack_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::project::{
    CreateProject, Project, ProjectCounts, ProjectWithCompany, UpdateProject,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, company_id, address, start_date, end_date, \
                       planned_end_date, status_id, progress, budget, spent_amount, notes, \
                       is_active, created_at, updated_at";

/// Joined projection. Aliases: `p` projects, `c` companies.
const JOINED_COLUMNS: &str = "p.id, p.name, p.description, p.company_id, p.address, \
                              p.start_date, p.end_date, p.planned_end_date, p.status_id, \
                              p.progress, p.budget, p.spent_amount, p.notes, p.is_active, \
                              p.created_at, p.updated_at, c.name AS company_name";

const JOINED_FROM: &str = "projects p LEFT JOIN companies c ON c.id = p.company_id";

/// Provides CRUD and reporting queries for projects.
///
/// Reads exclude inactive projects unless the method name says otherwise.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// If `status_id` is `None` in the input, defaults to Planning.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, description, company_id, address, start_date, end_date,
                                   planned_end_date, status_id, budget, spent_amount, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 1), $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.company_id)
            .bind(&input.address)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.planned_end_date)
            .bind(input.status_id)
            .bind(input.budget)
            .bind(input.spent_amount)
            .bind(&input.notes)
            .fetch_one(executor)
            .await
    }

    /// Find an active project with its company name.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectWithCompany>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOINED_FROM} WHERE p.id = $1 AND p.is_active = true"
        );
        sqlx::query_as::<_, ProjectWithCompany>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by id regardless of its active flag.
    pub async fn find_by_id_any(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Paged list of active projects, newest first.
    pub async fn list(
        pool: &PgPool,
        company_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProjectWithCompany>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOINED_FROM}
             WHERE p.is_active = true AND ($1::BIGINT IS NULL OR p.company_id = $1)
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ProjectWithCompany>(&query)
            .bind(company_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count active projects (for pagination metadata).
    pub async fn count(pool: &PgPool, company_id: Option<DbId>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM projects
             WHERE is_active = true AND ($1::BIGINT IS NULL OR company_id = $1)",
        )
        .bind(company_id)
        .fetch_one(pool)
        .await
    }

    /// Active projects a user is actively assigned to.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ProjectWithCompany>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOINED_FROM}
             JOIN user_projects up ON up.project_id = p.id
             WHERE up.user_id = $1 AND up.is_active = true AND p.is_active = true
             ORDER BY p.created_at DESC"
        );
        sqlx::query_as::<_, ProjectWithCompany>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Active projects with status Active.
    pub async fn list_in_progress(
        pool: &PgPool,
        company_id: Option<DbId>,
    ) -> Result<Vec<ProjectWithCompany>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOINED_FROM}
             WHERE p.is_active = true AND p.status_id = $2
               AND ($1::BIGINT IS NULL OR p.company_id = $1)
             ORDER BY p.name"
        );
        sqlx::query_as::<_, ProjectWithCompany>(&query)
            .bind(company_id)
            .bind(ProjectStatus::Active.id())
            .fetch_all(pool)
            .await
    }

    /// Projects marked Delayed, or past their planned end and not completed.
    pub async fn list_delayed(
        pool: &PgPool,
        company_id: Option<DbId>,
        today: Date,
    ) -> Result<Vec<ProjectWithCompany>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOINED_FROM}
             WHERE p.is_active = true AND ($1::BIGINT IS NULL OR p.company_id = $1)
               AND (p.status_id = $2 OR (p.planned_end_date < $3 AND p.status_id <> $4))
             ORDER BY p.planned_end_date NULLS LAST, p.id"
        );
        sqlx::query_as::<_, ProjectWithCompany>(&query)
            .bind(company_id)
            .bind(ProjectStatus::Delayed.id())
            .bind(today)
            .bind(ProjectStatus::Completed.id())
            .fetch_all(pool)
            .await
    }

    /// Most recently created projects. `assigned_user` limits to that user's assignments.
    pub async fn recent(
        pool: &PgPool,
        company_id: Option<DbId>,
        assigned_user: Option<DbId>,
        limit: i64,
    ) -> Result<Vec<ProjectWithCompany>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOINED_FROM}
             WHERE p.is_active = true
               AND ($1::BIGINT IS NULL OR p.company_id = $1)
               AND ($2::BIGINT IS NULL OR EXISTS (
                    SELECT 1 FROM user_projects up
                    WHERE up.project_id = p.id AND up.user_id = $2 AND up.is_active = true))
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, ProjectWithCompany>(&query)
            .bind(company_id)
            .bind(assigned_user)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Highest-progress active projects.
    pub async fn top_by_progress(
        pool: &PgPool,
        company_id: Option<DbId>,
        limit: i64,
    ) -> Result<Vec<ProjectWithCompany>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOINED_FROM}
             WHERE p.is_active = true AND ($1::BIGINT IS NULL OR p.company_id = $1)
             ORDER BY p.progress DESC, p.id
             LIMIT $2"
        );
        sqlx::query_as::<_, ProjectWithCompany>(&query)
            .bind(company_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Active projects whose start date falls in `[from, to)`. Open bounds are unbounded.
    pub async fn list_started_between(
        pool: &PgPool,
        company_id: Option<DbId>,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Vec<ProjectWithCompany>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOINED_FROM}
             WHERE p.is_active = true
               AND ($1::BIGINT IS NULL OR p.company_id = $1)
               AND ($2::DATE IS NULL OR p.start_date >= $2)
               AND ($3::DATE IS NULL OR p.start_date < $3)
             ORDER BY p.start_date, p.id"
        );
        sqlx::query_as::<_, ProjectWithCompany>(&query)
            .bind(company_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// `progress` must already be clamped. Returns `None` if no active row matches.
    pub async fn update(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                address = COALESCE($4, address),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                planned_end_date = COALESCE($7, planned_end_date),
                status_id = COALESCE($8, status_id),
                progress = COALESCE($9, progress),
                budget = COALESCE($10, budget),
                spent_amount = COALESCE($11, spent_amount),
                notes = COALESCE($12, notes)
             WHERE id = $1 AND is_active = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(&input.address)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.planned_end_date)
            .bind(input.status_id)
            .bind(input.progress)
            .bind(input.budget)
            .bind(input.spent_amount)
            .bind(&input.notes)
            .fetch_optional(executor)
            .await
    }

    /// Set the progress percentage. The value must already be clamped.
    pub async fn set_progress(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        progress: f64,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET progress = $2
             WHERE id = $1 AND is_active = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(progress)
            .fetch_optional(executor)
            .await
    }

    /// Mark a project Completed at 100 % with `end_date`.
    pub async fn complete(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        end_date: Date,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET status_id = $2, progress = 100, end_date = $3
             WHERE id = $1 AND is_active = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(ProjectStatus::Completed.id())
            .bind(end_date)
            .fetch_optional(executor)
            .await
    }

    /// Soft-delete a project. Returns `true` only on the active to inactive transition.
    pub async fn soft_delete(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE projects SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Active projects with status Active, for headline counters.
    pub async fn count_in_progress(
        pool: &PgPool,
        company_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM projects
             WHERE is_active = true AND status_id = $2
               AND ($1::BIGINT IS NULL OR company_id = $1)",
        )
        .bind(company_id)
        .bind(ProjectStatus::Active.id())
        .fetch_one(pool)
        .await
    }

    /// Status counts and money totals for the stats endpoint.
    pub async fn counts(
        pool: &PgPool,
        company_id: Option<DbId>,
        today: Date,
    ) -> Result<ProjectCounts, sqlx::Error> {
        // Status ids follow `ProjectStatus`.
        sqlx::query_as::<_, ProjectCounts>(
            "SELECT COUNT(*) AS total_projects,
                    COUNT(*) FILTER (WHERE status_id = 2) AS active_projects,
                    COUNT(*) FILTER (WHERE status_id = 4) AS completed_projects,
                    COUNT(*) FILTER (WHERE status_id = 1) AS planning_projects,
                    COUNT(*) FILTER (WHERE status_id = 3) AS on_hold_projects,
                    COUNT(*) FILTER (
                        WHERE status_id = 6 OR (planned_end_date < $2 AND status_id <> 4)
                    ) AS delayed_projects,
                    COALESCE(SUM(budget), 0)::DOUBLE PRECISION AS total_budget,
                    COALESCE(SUM(spent_amount), 0)::DOUBLE PRECISION AS total_spent,
                    COALESCE(AVG(progress), 0)::DOUBLE PRECISION AS average_progress
             FROM projects
             WHERE is_active = true AND ($1::BIGINT IS NULL OR company_id = $1)",
        )
        .bind(company_id)
        .bind(today)
        .fetch_one(pool)
        .await
    }
}
