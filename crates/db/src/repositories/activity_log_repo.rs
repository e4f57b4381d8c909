//! Repository for the append-only `activity_logs` table.

use sitetrack_core::status::{ActivityPriority, ActivityType};
use sitetrack_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::activity_log::{ActivityLog, ActivityLogFilter, CreateActivityLog};
use crate::repositories::filter::{BindValue, Filter};

/// Joined projection. Aliases: `a` activity_logs, `u` users, `p` projects.
const COLUMNS: &str = "a.id, a.title, a.description, a.activity_type_id, a.user_id, a.project_id, \
                       a.company_id, a.activity_at, a.location, a.additional_data, a.priority_id, \
                       a.is_read, a.created_at, \
                       NULLIF(TRIM(CONCAT(u.first_name, ' ', u.last_name)), '') AS user_name, \
                       p.name AS project_name";

const FROM: &str = "activity_logs a \
                    LEFT JOIN users u ON u.id = a.user_id \
                    LEFT JOIN projects p ON p.id = a.project_id";

/// Activity log entries. Only `is_read` changes after insert.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Append an entry, returning its id.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateActivityLog,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO activity_logs (title, description, activity_type_id, user_id, project_id,
                                        company_id, location, additional_data, priority_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.activity_type.id())
        .bind(input.user_id)
        .bind(input.project_id)
        .bind(input.company_id)
        .bind(&input.location)
        .bind(&input.additional_data)
        .bind(input.priority.id())
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ActivityLog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE a.id = $1");
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Paged list, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &ActivityLogFilter,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let filter = build_activity_filter(params);
        let bind_idx = filter.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} {} \
             ORDER BY a.activity_at DESC, a.id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            filter.where_clause(),
            bind_idx + 1
        );
        filter
            .bind_as(sqlx::query_as::<_, ActivityLog>(&query))
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(pool)
            .await
    }

    /// Count entries matching the filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &ActivityLogFilter) -> Result<i64, sqlx::Error> {
        let filter = build_activity_filter(params);
        let query = format!("SELECT COUNT(*) FROM activity_logs a {}", filter.where_clause());
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Mark an entry read. `company_id` restricts which entries may be touched.
    pub async fn mark_read(
        pool: &PgPool,
        id: DbId,
        company_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE activity_logs SET is_read = true
             WHERE id = $1 AND ($2::BIGINT IS NULL OR company_id = $2)",
        )
        .bind(id)
        .bind(company_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Unread entries of High priority or above.
    pub async fn count_unread_urgent(
        pool: &PgPool,
        company_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM activity_logs
             WHERE is_read = false AND priority_id >= $2
               AND ($1::BIGINT IS NULL OR company_id = $1)",
        )
        .bind(company_id)
        .bind(ActivityPriority::High.id())
        .fetch_one(pool)
        .await
    }

    /// Progress updates recorded for a project, oldest first.
    pub async fn progress_history(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<(Timestamp, serde_json::Value, Option<String>)>, sqlx::Error> {
        sqlx::query_as::<_, (Timestamp, serde_json::Value, Option<String>)>(
            "SELECT activity_at, additional_data, description FROM activity_logs
             WHERE project_id = $1 AND activity_type_id = $2
               AND additional_data ? 'progress'
             ORDER BY activity_at",
        )
        .bind(project_id)
        .bind(ActivityType::ProjectUpdated.id())
        .fetch_all(pool)
        .await
    }
}

/// Translate an [`ActivityLogFilter`] into a dynamic `WHERE` clause.
fn build_activity_filter(params: &ActivityLogFilter) -> Filter {
    let mut filter = Filter::new();
    if let Some(company_id) = params.company_id {
        filter.push("a.company_id = {}", BindValue::BigInt(company_id));
    }
    if let Some(project_id) = params.project_id {
        filter.push("a.project_id = {}", BindValue::BigInt(project_id));
    }
    if let Some(user_id) = params.user_id {
        filter.push("a.user_id = {}", BindValue::BigInt(user_id));
    }
    if let Some(user_id) = params.assigned_user_id {
        filter.push(
            "a.project_id IN (SELECT up.project_id FROM user_projects up \
             WHERE up.user_id = {} AND up.is_active = true)",
            BindValue::BigInt(user_id),
        );
    }
    if let Some(type_id) = params.activity_type_id {
        filter.push("a.activity_type_id = {}", BindValue::SmallInt(type_id));
    }
    if params.unread_only {
        filter.raw("a.is_read = false");
    }
    if let Some(from) = params.from {
        filter.push("a.activity_at >= {}", BindValue::Timestamp(from));
    }
    if let Some(to) = params.to {
        filter.push("a.activity_at < {}", BindValue::Timestamp(to));
    }
    filter
}
