//! Personnel (users) management and per-person statistics.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sitetrack_core::aggregation::working_hours;
use sitetrack_core::caller::CallerContext;
use sitetrack_core::calendar::SiteCalendar;
use sitetrack_core::error::CoreError;
use sitetrack_core::personnel::{
    normalize_email, validate_email, validate_person_name, DEFAULT_SORT_COLUMN, SORTABLE_COLUMNS,
};
use sitetrack_core::project::validate_money;
use sitetrack_core::search::{
    clamp_limit, clamp_offset, like_pattern, parse_sorting, SortDirection, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
use sitetrack_core::status::{ScanType, StatusId, UserRole};
use sitetrack_core::types::{Date, DbId, Timestamp};
use sitetrack_db::models::project::ProjectWithCompany;
use sitetrack_db::models::qr_scan::{QrCodeScan, ScanScope};
use sitetrack_db::models::user::{
    CompanyCount, CreateUser, Personnel, PersonnelCounts, PersonnelFilter, UpdateUser,
};
use sitetrack_db::models::Page;
use sitetrack_db::repositories::{
    ProjectRepo, QrScanRepo, SessionRepo, UserProjectRepo, UserRepo,
};
use sqlx::PgPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::services::{projects, today};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query string of the personnel list.
#[derive(Debug, Default, Deserialize)]
pub struct PersonnelQuery {
    pub search: Option<String>,
    pub role_id: Option<StatusId>,
    pub company_id: Option<DbId>,
    pub is_active: Option<bool>,
    /// `"<column> [asc|desc]"`, e.g. `"last_name desc"`.
    pub sorting: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePersonnel {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role_id: StatusId,
    pub company_id: Option<DbId>,
    pub position: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<Date>,
    /// Defaults to today.
    pub hire_date: Option<Date>,
    pub salary: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPassword {
    pub new_password: String,
}

/// Activity summary of one person.
#[derive(Debug, Serialize)]
pub struct PersonnelStats {
    pub user_id: DbId,
    pub full_name: String,
    pub total_projects: i64,
    pub active_projects: i64,
    pub total_scans: i64,
    pub total_work_days: i64,
    pub total_working_hours: f64,
    pub last_activity: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
pub struct RoleStat {
    pub role_id: StatusId,
    pub role_name: &'static str,
    pub count: i64,
}

/// Headcounts across the caller's scope.
#[derive(Debug, Serialize)]
pub struct PersonnelOverview {
    #[serde(flatten)]
    pub counts: PersonnelCounts,
    pub today_check_ins: i64,
    pub by_role: Vec<RoleStat>,
    pub by_company: Vec<CompanyCount>,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Load a person (active or not) the caller may see.
pub(crate) async fn load_visible(
    pool: &PgPool,
    caller: &CallerContext,
    id: DbId,
) -> AppResult<Personnel> {
    let person = UserRepo::find_personnel(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    if person.id != caller.user_id {
        caller.ensure_company_visible(person.company_id)?;
    }
    Ok(person)
}

/// Paged list of everyone in scope except the caller.
pub async fn list(
    pool: &PgPool,
    caller: &CallerContext,
    query: &PersonnelQuery,
) -> AppResult<Page<Personnel>> {
    let (sort_column, direction) =
        parse_sorting(query.sorting.as_deref(), SORTABLE_COLUMNS, DEFAULT_SORT_COLUMN)?;
    let filter = PersonnelFilter {
        company_id: caller.scope_company(query.company_id)?,
        exclude_user_id: Some(caller.user_id),
        search_pattern: like_pattern(query.search.as_deref()),
        role_id: query.role_id,
        is_active: query.is_active,
        sort_column,
        sort_desc: direction == SortDirection::Desc,
        limit: clamp_limit(query.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        offset: clamp_offset(query.offset),
    };
    let items = UserRepo::list(pool, &filter).await?;
    let total_count = UserRepo::count(pool, &filter).await?;
    Ok(Page { items, total_count })
}

pub async fn get(pool: &PgPool, caller: &CallerContext, id: DbId) -> AppResult<Personnel> {
    load_visible(pool, caller, id).await
}

pub async fn projects(
    pool: &PgPool,
    caller: &CallerContext,
    id: DbId,
) -> AppResult<Vec<ProjectWithCompany>> {
    load_visible(pool, caller, id).await?;
    Ok(ProjectRepo::list_for_user(pool, id).await?)
}

pub async fn scans(
    pool: &PgPool,
    caller: &CallerContext,
    id: DbId,
    limit: i64,
    offset: i64,
) -> AppResult<Page<QrCodeScan>> {
    load_visible(pool, caller, id).await?;
    let scope = ScanScope {
        user_id: Some(id),
        ..Default::default()
    };
    let items = QrScanRepo::list(pool, &scope, limit, offset).await?;
    let total_count = QrScanRepo::count(pool, &scope).await?;
    Ok(Page { items, total_count })
}

pub async fn stats(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    id: DbId,
) -> AppResult<PersonnelStats> {
    let person = load_visible(pool, caller, id).await?;
    let scope = ScanScope {
        user_id: Some(id),
        ..Default::default()
    };
    let (total_projects, active_projects) = UserProjectRepo::count_for_user(pool, id).await?;
    let total_scans = QrScanRepo::count(pool, &scope).await?;
    let facts = QrScanRepo::facts(pool, &scope).await?;
    let last_activity = QrScanRepo::last_scan_at(pool, id).await?;

    let work_days: HashSet<Date> = facts.iter().map(|f| cal.local_date(f.scanned_at)).collect();
    let check_ins = facts
        .iter()
        .filter(|f| f.scan_type_id == ScanType::CheckIn.id())
        .count() as i64;

    Ok(PersonnelStats {
        user_id: id,
        full_name: person.full_name(),
        total_projects,
        active_projects,
        total_scans,
        total_work_days: work_days.len() as i64,
        total_working_hours: working_hours(check_ins),
        last_activity,
    })
}

/// Headcounts, today's check-ins, and breakdowns by role and company.
pub async fn general_stats(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    company_id: Option<DbId>,
) -> AppResult<PersonnelOverview> {
    let company_id = caller.scope_company(company_id)?;
    let window = cal.day_window(today(cal));
    let today_scope = ScanScope {
        company_id,
        from: Some(window.start),
        to: Some(window.end),
        ..Default::default()
    };
    let counts = UserRepo::counts(pool, company_id).await?;
    let today_check_ins = QrScanRepo::count_check_ins(pool, &today_scope).await?;
    let roles = UserRepo::count_by_role(pool, company_id).await?;
    let by_company = UserRepo::count_by_company(pool, company_id).await?;

    let by_role = roles
        .into_iter()
        .map(|r| RoleStat {
            role_id: r.role_id,
            role_name: UserRole::from_id(r.role_id).map_or("Unknown", UserRole::label),
            count: r.count,
        })
        .collect();

    Ok(PersonnelOverview {
        counts,
        today_check_ins,
        by_role,
        by_company,
    })
}

pub async fn active(
    pool: &PgPool,
    caller: &CallerContext,
    company_id: Option<DbId>,
) -> AppResult<Vec<Personnel>> {
    let company_id = caller.scope_company(company_id)?;
    Ok(UserRepo::list_active(pool, company_id).await?)
}

pub async fn company_personnel(
    pool: &PgPool,
    caller: &CallerContext,
    company_id: DbId,
) -> AppResult<Vec<Personnel>> {
    caller.ensure_company_visible(Some(company_id))?;
    Ok(UserRepo::list_active(pool, Some(company_id)).await?)
}

pub async fn project_personnel(
    pool: &PgPool,
    caller: &CallerContext,
    project_id: DbId,
) -> AppResult<Vec<Personnel>> {
    projects::load_visible(pool, caller, project_id).await?;
    Ok(UserRepo::list_by_project(pool, project_id).await?)
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

pub async fn create(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    input: &CreatePersonnel,
) -> AppResult<Personnel> {
    let company_id = caller.scope_company(input.company_id)?;
    let role = UserRole::try_from(input.role_id)?;
    ensure_role_grantable(caller, role)?;

    let email = normalize_email(&input.email);
    validate_email(&email)?;
    validate_person_name("First name", &input.first_name)?;
    validate_person_name("Last name", &input.last_name)?;
    validate_password_strength(&input.password)?;
    validate_money("Salary", input.salary)?;
    ensure_email_free(pool, &email, None).await?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email,
            password_hash,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            phone_number: input.phone_number.clone(),
            role_id: role.id(),
            company_id,
            position: input.position.clone(),
            address: input.address.clone(),
            birth_date: input.birth_date,
            hire_date: input.hire_date.unwrap_or_else(|| today(cal)),
            salary: input.salary,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, created_by = caller.user_id, "Personnel created");
    get(pool, caller, user.id).await
}

pub async fn update(
    pool: &PgPool,
    caller: &CallerContext,
    id: DbId,
    input: &UpdateUser,
) -> AppResult<Personnel> {
    load_visible(pool, caller, id).await?;

    let mut patch = input.clone();
    if let Some(role_id) = input.role_id {
        ensure_role_grantable(caller, UserRole::try_from(role_id)?)?;
    }
    if input.company_id.is_some() {
        caller.scope_company(input.company_id)?;
    }
    if let Some(raw) = &input.email {
        let email = normalize_email(raw);
        validate_email(&email)?;
        ensure_email_free(pool, &email, Some(id)).await?;
        patch.email = Some(email);
    }
    if let Some(first_name) = &input.first_name {
        validate_person_name("First name", first_name)?;
        patch.first_name = Some(first_name.trim().to_string());
    }
    if let Some(last_name) = &input.last_name {
        validate_person_name("Last name", last_name)?;
        patch.last_name = Some(last_name.trim().to_string());
    }
    validate_money("Salary", input.salary)?;

    UserRepo::update(pool, id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    tracing::info!(user_id = id, updated_by = caller.user_id, "Personnel updated");
    get(pool, caller, id).await
}

/// Deactivate a person. Callers cannot deactivate themselves.
pub async fn delete(pool: &PgPool, caller: &CallerContext, id: DbId) -> AppResult<()> {
    if id == caller.user_id {
        return Err(CoreError::Validation("You cannot deactivate your own account".into()).into());
    }
    load_visible(pool, caller, id).await?;
    if UserRepo::soft_delete(pool, id).await? {
        tracing::info!(user_id = id, deleted_by = caller.user_id, "Personnel deactivated");
    }
    Ok(())
}

/// Set a new password and revoke the person's sessions. Admin only; enforced
/// by the route extractor.
pub async fn reset_password(pool: &PgPool, id: DbId, input: &ResetPassword) -> AppResult<()> {
    validate_password_strength(&input.new_password)?;
    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let mut tx = pool.begin().await?;
    if !UserRepo::update_password(&mut *tx, id, &password_hash).await? {
        return Err(AppError::not_found("User", id));
    }
    let revoked = SessionRepo::revoke_all_for_user(&mut *tx, id).await?;
    tx.commit().await?;

    tracing::info!(user_id = id, revoked, "Password reset");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_email_free(pool: &PgPool, email: &str, exclude: Option<DbId>) -> AppResult<()> {
    if UserRepo::email_taken(pool, email, exclude).await? {
        return Err(CoreError::Validation(format!("Email '{email}' is already in use")).into());
    }
    Ok(())
}

/// Only admins may hand out the Admin role.
fn ensure_role_grantable(caller: &CallerContext, role: UserRole) -> Result<(), CoreError> {
    if role.is_admin() && !caller.is_admin() {
        return Err(CoreError::Forbidden("Only admins can grant the Admin role".into()));
    }
    Ok(())
}
