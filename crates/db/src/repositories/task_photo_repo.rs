//! Repository for the `task_photos` table (metadata only).

use sitetrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{CreateTaskPhoto, TaskPhoto};

/// Photo metadata attached to a task. Deleted with their task.
pub struct TaskPhotoRepo;

impl TaskPhotoRepo {
    /// Record a photo, returning its id.
    pub async fn create(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
        input: &CreateTaskPhoto,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO task_photos (task_id, user_id, file_path, file_name, description,
                                      file_size, content_type)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(task_id)
        .bind(user_id)
        .bind(&input.file_path)
        .bind(&input.file_name)
        .bind(&input.description)
        .bind(input.file_size)
        .bind(&input.content_type)
        .fetch_one(pool)
        .await
    }

    /// Photos of a task, newest first.
    pub async fn list_for_task(pool: &PgPool, task_id: DbId) -> Result<Vec<TaskPhoto>, sqlx::Error> {
        sqlx::query_as::<_, TaskPhoto>(
            "SELECT ph.id, ph.task_id, ph.user_id, ph.file_path, ph.file_name, ph.description,
                    ph.file_size, ph.content_type, ph.created_at,
                    NULLIF(TRIM(CONCAT(u.first_name, ' ', u.last_name)), '') AS user_name
             FROM task_photos ph LEFT JOIN users u ON u.id = ph.user_id
             WHERE ph.task_id = $1
             ORDER BY ph.created_at DESC, ph.id DESC",
        )
        .bind(task_id)
        .fetch_all(pool)
        .await
    }

    /// Delete one photo of a task. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, task_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_photos WHERE id = $1 AND task_id = $2")
            .bind(id)
            .bind(task_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
