//! Project assignment model.

use serde::{Deserialize, Serialize};
use sitetrack_core::status::StatusId;
use sitetrack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `user_projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProject {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: DbId,
    pub role: Option<String>,
    pub assigned_at: Timestamp,
    pub unassigned_at: Option<Timestamp>,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An active assignee of a project, with the person's display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignedUser {
    pub user_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role_id: StatusId,
    pub assignment_role: Option<String>,
    pub assigned_at: Timestamp,
}

/// DTO for assigning a user to a project.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignUser {
    pub user_id: DbId,
    pub role: Option<String>,
    pub notes: Option<String>,
}
