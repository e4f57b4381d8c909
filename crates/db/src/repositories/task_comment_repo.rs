//! Repository for the `task_comments` table.

use sitetrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::TaskComment;

/// Comments on a task. Deleted with their task.
pub struct TaskCommentRepo;

impl TaskCommentRepo {
    /// Add a comment, returning its id.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        task_id: DbId,
        user_id: DbId,
        comment: &str,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO task_comments (task_id, user_id, comment)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(task_id)
        .bind(user_id)
        .bind(comment)
        .fetch_one(executor)
        .await
    }

    /// Comments of a task, oldest first.
    pub async fn list_for_task(
        pool: &PgPool,
        task_id: DbId,
    ) -> Result<Vec<TaskComment>, sqlx::Error> {
        sqlx::query_as::<_, TaskComment>(
            "SELECT c.id, c.task_id, c.user_id, c.comment, c.created_at,
                    NULLIF(TRIM(CONCAT(u.first_name, ' ', u.last_name)), '') AS user_name
             FROM task_comments c LEFT JOIN users u ON u.id = c.user_id
             WHERE c.task_id = $1
             ORDER BY c.created_at, c.id",
        )
        .bind(task_id)
        .fetch_all(pool)
        .await
    }

    /// Delete one comment of a task. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, task_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_comments WHERE id = $1 AND task_id = $2")
            .bind(id)
            .bind(task_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
