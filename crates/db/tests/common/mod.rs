//! Fixtures shared by the repository tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use sitetrack_core::status::UserRole;
use sitetrack_core::types::DbId;
use sitetrack_db::models::company::CreateCompany;
use sitetrack_db::models::project::CreateProject;
use sitetrack_db::models::user::CreateUser;
use sitetrack_db::repositories::{CompanyRepo, ProjectRepo, UserRepo};
use sqlx::PgPool;

pub const REQUIRES_DB: &str = "requires a running PostgreSQL (DATABASE_URL)";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn seed_company(pool: &PgPool, name: &str) -> DbId {
    CompanyRepo::create(
        pool,
        &CreateCompany {
            name: name.to_string(),
            description: None,
            address: None,
            phone: None,
            email: None,
            tax_number: None,
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_user(pool: &PgPool, email: &str, role: UserRole, company_id: Option<DbId>) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            first_name: "Test".to_string(),
            last_name: email.split('@').next().unwrap_or("user").to_string(),
            phone_number: None,
            role_id: role.id(),
            company_id,
            position: None,
            address: None,
            birth_date: None,
            hire_date: date(2025, 1, 1),
            salary: Some(3000.0),
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_project(pool: &PgPool, name: &str, company_id: DbId) -> DbId {
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: name.to_string(),
            description: None,
            company_id,
            address: None,
            start_date: date(2025, 6, 1),
            end_date: None,
            planned_end_date: Some(date(2025, 12, 31)),
            status_id: None,
            budget: Some(1000.0),
            spent_amount: Some(250.0),
            notes: None,
            assigned_user_ids: Vec::new(),
        },
    )
    .await
    .unwrap()
    .id
}
