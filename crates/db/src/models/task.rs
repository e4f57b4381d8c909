//! Project task, comment and photo models and DTOs.

use serde::{Deserialize, Serialize};
use sitetrack_core::reports::MilestoneFact;
use sitetrack_core::status::{StatusId, TaskStatus};
use sitetrack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `project_tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectTask {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status_id: StatusId,
    pub priority_id: StatusId,
    pub project_id: DbId,
    pub assigned_to_user_id: DbId,
    pub assigned_by_user_id: DbId,
    pub due_date: Option<Timestamp>,
    pub location: Option<String>,
    pub completed_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProjectTask {
    pub fn status(&self) -> Option<TaskStatus> {
        TaskStatus::from_id(self.status_id)
    }
}

/// A task joined with project/user display names and child counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: ProjectTask,
    pub project_name: Option<String>,
    pub company_id: Option<DbId>,
    pub assigned_to_name: Option<String>,
    pub assigned_by_name: Option<String>,
    pub comment_count: i64,
    pub photo_count: i64,
}

impl From<&ProjectTask> for MilestoneFact {
    fn from(task: &ProjectTask) -> Self {
        Self {
            title: task.title.clone(),
            due_date: task.due_date,
            completed_at: task.completed_at,
            status: task.status(),
        }
    }
}

/// DTO for creating a task. `assigned_by_user_id` is taken from the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub priority_id: Option<StatusId>,
    pub project_id: DbId,
    pub assigned_to_user_id: DbId,
    pub due_date: Option<Timestamp>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating a task. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status_id: Option<StatusId>,
    pub priority_id: Option<StatusId>,
    pub assigned_to_user_id: Option<DbId>,
    pub due_date: Option<Timestamp>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Filter for the paged task list.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub company_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub assigned_to_user_id: Option<DbId>,
    pub status_id: Option<StatusId>,
    pub priority_id: Option<StatusId>,
    /// Case-insensitive `LIKE` pattern over title and description.
    pub search_pattern: Option<String>,
    /// Only tasks past due that are neither completed nor cancelled, as of this instant.
    pub overdue_at: Option<Timestamp>,
    pub limit: i64,
    pub offset: i64,
}

/// Task counts for the stats endpoints.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct TaskCounts {
    pub total_tasks: i64,
    pub todo_tasks: i64,
    pub in_progress_tasks: i64,
    pub completed_tasks: i64,
    pub cancelled_tasks: i64,
    pub overdue_tasks: i64,
    pub high_priority_tasks: i64,
}

/// A row from the `task_comments` table with the author's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskComment {
    pub id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub comment: String,
    pub created_at: Timestamp,
    pub user_name: Option<String>,
}

/// A row from the `task_photos` table with the uploader's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskPhoto {
    pub id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub file_path: String,
    pub file_name: String,
    pub description: Option<String>,
    pub file_size: i64,
    pub content_type: Option<String>,
    pub created_at: Timestamp,
    pub user_name: Option<String>,
}

/// DTO for recording photo metadata. The file itself is stored elsewhere.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskPhoto {
    pub file_path: String,
    pub file_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub file_size: i64,
    pub content_type: Option<String>,
}
