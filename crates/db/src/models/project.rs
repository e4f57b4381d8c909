//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sitetrack_core::aggregation::ProjectSummary;
use sitetrack_core::status::{ProjectStatus, StatusId};
use sitetrack_core::types::{Date, DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub company_id: DbId,
    pub address: Option<String>,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub planned_end_date: Option<Date>,
    pub status_id: StatusId,
    pub progress: f64,
    pub budget: Option<f64>,
    pub spent_amount: Option<f64>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project joined with its company name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectWithCompany {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub company_name: Option<String>,
}

impl From<&ProjectWithCompany> for ProjectSummary {
    fn from(row: &ProjectWithCompany) -> Self {
        let p = &row.project;
        Self {
            id: p.id,
            name: p.name.clone(),
            company_id: p.company_id,
            company_name: row.company_name.clone(),
            status: ProjectStatus::from_id(p.status_id),
            progress: p.progress,
            budget: p.budget,
            spent_amount: p.spent_amount,
            start_date: p.start_date,
            end_date: p.end_date,
            planned_end_date: p.planned_end_date,
        }
    }
}

/// DTO for creating a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub company_id: DbId,
    pub address: Option<String>,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub planned_end_date: Option<Date>,
    pub status_id: Option<StatusId>,
    pub budget: Option<f64>,
    pub spent_amount: Option<f64>,
    pub notes: Option<String>,
    /// Users to assign with the default team role on creation.
    #[serde(default)]
    pub assigned_user_ids: Vec<DbId>,
}

/// DTO for updating a project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub planned_end_date: Option<Date>,
    pub status_id: Option<StatusId>,
    pub progress: Option<f64>,
    pub budget: Option<f64>,
    pub spent_amount: Option<f64>,
    pub notes: Option<String>,
}

/// Project counts for the stats endpoint.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct ProjectCounts {
    pub total_projects: i64,
    pub active_projects: i64,
    pub completed_projects: i64,
    pub planning_projects: i64,
    pub on_hold_projects: i64,
    pub delayed_projects: i64,
    pub total_budget: f64,
    pub total_spent: f64,
    pub average_progress: f64,
}
