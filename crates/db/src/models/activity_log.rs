//! Activity log model and DTOs.

use serde::Serialize;
use sitetrack_core::status::{ActivityPriority, ActivityType, StatusId};
use sitetrack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `activity_logs` table joined with optional display names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLog {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub activity_type_id: StatusId,
    pub user_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub company_id: Option<DbId>,
    pub activity_at: Timestamp,
    pub location: Option<String>,
    pub additional_data: Option<serde_json::Value>,
    pub priority_id: StatusId,
    pub is_read: bool,
    pub created_at: Timestamp,
    pub user_name: Option<String>,
    pub project_name: Option<String>,
}

/// DTO for appending an activity log entry.
#[derive(Debug, Clone)]
pub struct CreateActivityLog {
    pub title: String,
    pub description: Option<String>,
    pub activity_type: ActivityType,
    pub user_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub company_id: Option<DbId>,
    pub location: Option<String>,
    pub additional_data: Option<serde_json::Value>,
    pub priority: ActivityPriority,
}

impl CreateActivityLog {
    /// A normal-priority entry with only the required fields set.
    pub fn new(activity_type: ActivityType, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            activity_type,
            user_id: None,
            project_id: None,
            company_id: None,
            location: None,
            additional_data: None,
            priority: ActivityPriority::Normal,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn user(mut self, user_id: DbId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn project(mut self, project_id: DbId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn company(mut self, company_id: Option<DbId>) -> Self {
        self.company_id = company_id;
        self
    }

    pub fn location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.additional_data = Some(data);
        self
    }

    pub fn priority(mut self, priority: ActivityPriority) -> Self {
        self.priority = priority;
        self
    }
}

/// Filter for the paged activity log list.
#[derive(Debug, Clone, Default)]
pub struct ActivityLogFilter {
    pub company_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub user_id: Option<DbId>,
    /// Only entries on projects this user is actively assigned to.
    pub assigned_user_id: Option<DbId>,
    pub activity_type_id: Option<StatusId>,
    pub unread_only: bool,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: i64,
    pub offset: i64,
}
