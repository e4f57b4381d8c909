//! Repository for the `user_projects` assignment table.

use sitetrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::user_project::{AssignedUser, UserProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, project_id, role, assigned_at, unassigned_at, is_active, \
                       notes, created_at, updated_at";

/// Project assignments. One row per (user, project) pair, reactivated on re-assignment.
pub struct UserProjectRepo;

impl UserProjectRepo {
    /// Assign a user to a project.
    ///
    /// An existing row for the pair is reactivated with the new role and a
    /// fresh `assigned_at`, so the pair never has two rows.
    pub async fn assign(
        executor: impl sqlx::PgExecutor<'_>,
        user_id: DbId,
        project_id: DbId,
        role: &str,
        notes: Option<&str>,
    ) -> Result<UserProject, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_projects (user_id, project_id, role, notes)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_user_projects_user_project DO UPDATE SET
                role = EXCLUDED.role,
                notes = COALESCE(EXCLUDED.notes, user_projects.notes),
                assigned_at = NOW(),
                unassigned_at = NULL,
                is_active = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProject>(&query)
            .bind(user_id)
            .bind(project_id)
            .bind(role)
            .bind(notes)
            .fetch_one(executor)
            .await
    }

    /// End an active assignment. Returns `true` if one was ended.
    pub async fn unassign(
        executor: impl sqlx::PgExecutor<'_>,
        user_id: DbId,
        project_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_projects SET is_active = false, unassigned_at = NOW()
             WHERE user_id = $1 AND project_id = $2 AND is_active = true",
        )
        .bind(user_id)
        .bind(project_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find the row for a pair, active or not.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        project_id: DbId,
    ) -> Result<Option<UserProject>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM user_projects WHERE user_id = $1 AND project_id = $2");
        sqlx::query_as::<_, UserProject>(&query)
            .bind(user_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Active assignees of a project with their display fields.
    pub async fn list_assignees(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<AssignedUser>, sqlx::Error> {
        sqlx::query_as::<_, AssignedUser>(
            "SELECT u.id AS user_id, u.first_name, u.last_name, u.email, u.role_id,
                    up.role AS assignment_role, up.assigned_at
             FROM user_projects up
             JOIN users u ON u.id = up.user_id
             WHERE up.project_id = $1 AND up.is_active = true AND u.is_active = true
             ORDER BY u.first_name, u.last_name",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Number of projects a user is assigned to, `(all, active)`.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_active)
             FROM user_projects WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
