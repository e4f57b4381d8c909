//! User (personnel) entity model and DTOs.

use serde::{Deserialize, Serialize};
use sitetrack_core::status::{StatusId, UserRole};
use sitetrack_core::types::{Date, DbId, Timestamp};
use sqlx::FromRow;

/// A full row from the `users` table, including the password hash.
///
/// Never serialized. Use [`Personnel`] for anything leaving the server.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role_id: StatusId,
    pub company_id: Option<DbId>,
    pub position: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<Date>,
    pub hire_date: Option<Date>,
    pub salary: Option<f64>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Resolved role; unknown ids fall back to the least privileged role.
    pub fn role(&self) -> UserRole {
        UserRole::from_id(self.role_id).unwrap_or(UserRole::Subcontractor)
    }
}

/// A user joined with their company name, safe for API responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Personnel {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role_id: StatusId,
    pub company_id: Option<DbId>,
    pub company_name: Option<String>,
    pub position: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<Date>,
    pub hire_date: Option<Date>,
    pub salary: Option<f64>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Personnel {
    pub fn role(&self) -> UserRole {
        UserRole::from_id(self.role_id).unwrap_or(UserRole::Subcontractor)
    }

    pub fn full_name(&self) -> String {
        sitetrack_core::personnel::full_name(&self.first_name, &self.last_name)
    }
}

/// DTO for inserting a user. `password_hash` is produced by the API layer.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role_id: StatusId,
    pub company_id: Option<DbId>,
    pub position: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<Date>,
    pub hire_date: Date,
    pub salary: Option<f64>,
}

/// DTO for updating a user. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub role_id: Option<StatusId>,
    pub company_id: Option<DbId>,
    pub position: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<Date>,
    pub hire_date: Option<Date>,
    pub salary: Option<f64>,
    pub is_active: Option<bool>,
}

/// Filter for the paged personnel list.
#[derive(Debug, Clone, Default)]
pub struct PersonnelFilter {
    /// Restrict to one company. `None` means all companies.
    pub company_id: Option<DbId>,
    /// Exclude this user (the caller) from the results.
    pub exclude_user_id: Option<DbId>,
    /// Case-insensitive `LIKE` pattern over first name, last name and email.
    pub search_pattern: Option<String>,
    pub role_id: Option<StatusId>,
    pub is_active: Option<bool>,
    /// Whitelisted column name.
    pub sort_column: &'static str,
    pub sort_desc: bool,
    pub limit: i64,
    pub offset: i64,
}

/// Headcount for one role, used by personnel stats.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoleCount {
    pub role_id: StatusId,
    pub count: i64,
}

/// Headcount for one company, used by personnel stats.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompanyCount {
    pub company_id: Option<DbId>,
    pub company_name: Option<String>,
    pub count: i64,
}

/// Per-person input to the personnel report.
#[derive(Debug, Clone, FromRow)]
pub struct PersonFactRow {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub role_id: StatusId,
    pub is_active: bool,
    pub active_assignments: i64,
}

impl From<PersonFactRow> for sitetrack_core::reports::PersonFact {
    fn from(row: PersonFactRow) -> Self {
        Self {
            user_id: row.id,
            full_name: sitetrack_core::personnel::full_name(&row.first_name, &row.last_name),
            role: UserRole::from_id(row.role_id).unwrap_or(UserRole::Subcontractor),
            is_active: row.is_active,
            active_assignments: row.active_assignments,
        }
    }
}

/// Headcounts for the personnel stats endpoint.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct PersonnelCounts {
    pub total_personnel: i64,
    pub active_personnel: i64,
    pub inactive_personnel: i64,
}
