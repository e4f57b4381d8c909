//! Projects and their personnel assignments.

use serde::{Deserialize, Serialize};
use serde_json::json;
use sitetrack_core::caller::CallerContext;
use sitetrack_core::calendar::SiteCalendar;
use sitetrack_core::error::CoreError;
use sitetrack_core::project::{
    clamp_progress, is_delayed, validate_money, validate_project_dates, validate_project_name,
    DEFAULT_ASSIGNMENT_ROLE,
};
use sitetrack_core::status::{ActivityPriority, ActivityType, ProjectStatus};
use sitetrack_core::types::DbId;
use sitetrack_db::models::activity_log::CreateActivityLog;
use sitetrack_db::models::project::{
    CreateProject, Project, ProjectCounts, ProjectWithCompany, UpdateProject,
};
use sitetrack_db::models::user_project::{AssignUser, AssignedUser, UserProject};
use sitetrack_db::models::Page;
use sitetrack_db::models::user::Personnel;
use sitetrack_db::repositories::{ActivityLogRepo, ProjectRepo, UserProjectRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::services::{personnel, today};

/// Fewest and most items "recent projects" returns.
pub const RECENT_PROJECTS_MIN: i64 = 3;
pub const RECENT_PROJECTS_MAX: i64 = 20;
pub const RECENT_PROJECTS_DEFAULT: i64 = 5;

/// A project with its company name and active team.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: ProjectWithCompany,
    pub status_name: &'static str,
    pub is_delayed: bool,
    pub assigned_users: Vec<AssignedUser>,
}

#[derive(Debug, Deserialize)]
pub struct ProgressUpdate {
    pub progress: f64,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Load an active project the caller may see.
pub(crate) async fn load_visible(
    pool: &PgPool,
    caller: &CallerContext,
    id: DbId,
) -> AppResult<ProjectWithCompany> {
    let project = ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    caller.ensure_company_visible(Some(project.project.company_id))?;
    Ok(project)
}

pub async fn get(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    id: DbId,
) -> AppResult<ProjectDetail> {
    let project = load_visible(pool, caller, id).await?;
    let assigned_users = UserProjectRepo::list_assignees(pool, id).await?;
    let status = ProjectStatus::from_id(project.project.status_id);
    Ok(ProjectDetail {
        status_name: status.map_or("Unknown", ProjectStatus::label),
        is_delayed: is_delayed(status, project.project.planned_end_date, today(cal)),
        project,
        assigned_users,
    })
}

pub async fn list(
    pool: &PgPool,
    caller: &CallerContext,
    company_id: Option<DbId>,
    limit: i64,
    offset: i64,
) -> AppResult<Page<ProjectWithCompany>> {
    let company_id = caller.scope_company(company_id)?;
    let items = ProjectRepo::list(pool, company_id, limit, offset).await?;
    let total_count = ProjectRepo::count(pool, company_id).await?;
    Ok(Page { items, total_count })
}

/// Projects a person is assigned to. Defaults to the caller.
pub async fn user_projects(
    pool: &PgPool,
    caller: &CallerContext,
    user_id: Option<DbId>,
) -> AppResult<Vec<ProjectWithCompany>> {
    let user_id = match user_id {
        Some(id) if id != caller.user_id => personnel::load_visible(pool, caller, id).await?.id,
        _ => caller.user_id,
    };
    Ok(ProjectRepo::list_for_user(pool, user_id).await?)
}

pub async fn project_users(
    pool: &PgPool,
    caller: &CallerContext,
    id: DbId,
) -> AppResult<Vec<AssignedUser>> {
    load_visible(pool, caller, id).await?;
    Ok(UserProjectRepo::list_assignees(pool, id).await?)
}

pub async fn stats(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    company_id: Option<DbId>,
) -> AppResult<ProjectCounts> {
    let company_id = caller.scope_company(company_id)?;
    Ok(ProjectRepo::counts(pool, company_id, today(cal)).await?)
}

/// Projects whose status is Active.
pub async fn active(
    pool: &PgPool,
    caller: &CallerContext,
    company_id: Option<DbId>,
) -> AppResult<Vec<ProjectWithCompany>> {
    let company_id = caller.scope_company(company_id)?;
    Ok(ProjectRepo::list_in_progress(pool, company_id).await?)
}

pub async fn delayed(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    company_id: Option<DbId>,
) -> AppResult<Vec<ProjectWithCompany>> {
    let company_id = caller.scope_company(company_id)?;
    Ok(ProjectRepo::list_delayed(pool, company_id, today(cal)).await?)
}

/// Newest projects. Non-admin callers only see projects they are assigned to.
pub async fn recent(
    pool: &PgPool,
    caller: &CallerContext,
    company_id: Option<DbId>,
    count: Option<i64>,
) -> AppResult<Vec<ProjectWithCompany>> {
    let company_id = caller.scope_company(company_id)?;
    let count = count
        .unwrap_or(RECENT_PROJECTS_DEFAULT)
        .clamp(RECENT_PROJECTS_MIN, RECENT_PROJECTS_MAX);
    let assigned_user = (!caller.is_admin()).then_some(caller.user_id);
    Ok(ProjectRepo::recent(pool, company_id, assigned_user, count).await?)
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Create a project, its initial team, and a `ProjectCreated` entry.
pub async fn create(
    pool: &PgPool,
    caller: &CallerContext,
    input: &CreateProject,
) -> AppResult<Project> {
    caller.scope_company(Some(input.company_id))?;
    validate_project_name(&input.name)?;
    validate_project_dates(input.start_date, input.planned_end_date, input.end_date)?;
    validate_money("Budget", input.budget)?;
    validate_money("Spent amount", input.spent_amount)?;
    if let Some(status_id) = input.status_id {
        ProjectStatus::try_from(status_id)?;
    }
    for &user_id in &input.assigned_user_ids {
        ensure_assignable(pool, caller, user_id).await?;
    }

    let mut tx = pool.begin().await?;
    let project = ProjectRepo::create(&mut *tx, input).await?;
    for &user_id in &input.assigned_user_ids {
        UserProjectRepo::assign(&mut *tx, user_id, project.id, DEFAULT_ASSIGNMENT_ROLE, None)
            .await?;
    }
    ActivityLogRepo::create(
        &mut *tx,
        &CreateActivityLog::new(ActivityType::ProjectCreated, "New project created")
            .description(format!("Project '{}' was created", project.name))
            .user(caller.user_id)
            .project(project.id)
            .company(Some(project.company_id))
            .location(project.address.clone()),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        project_id = project.id,
        user_id = caller.user_id,
        team_size = input.assigned_user_ids.len(),
        "Project created"
    );
    Ok(project)
}

pub async fn update(
    pool: &PgPool,
    caller: &CallerContext,
    id: DbId,
    input: &UpdateProject,
) -> AppResult<Project> {
    let current = load_visible(pool, caller, id).await?.project;

    if let Some(name) = &input.name {
        validate_project_name(name)?;
    }
    validate_project_dates(
        input.start_date.unwrap_or(current.start_date),
        input.planned_end_date.or(current.planned_end_date),
        input.end_date.or(current.end_date),
    )?;
    validate_money("Budget", input.budget)?;
    validate_money("Spent amount", input.spent_amount)?;
    if let Some(status_id) = input.status_id {
        ProjectStatus::try_from(status_id)?;
    }

    let mut patch = input.clone();
    patch.progress = input.progress.map(clamp_progress);

    let mut log = CreateActivityLog::new(ActivityType::ProjectUpdated, "Project updated")
        .description(format!("Project '{}' was updated", current.name))
        .user(caller.user_id)
        .project(id)
        .company(Some(current.company_id));
    if let Some(progress) = patch.progress {
        log = log.data(json!({ "progress": progress }));
    }

    let mut tx = pool.begin().await?;
    let project = ProjectRepo::update(&mut *tx, id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    ActivityLogRepo::create(&mut *tx, &log).await?;
    tx.commit().await?;

    tracing::info!(project_id = id, user_id = caller.user_id, "Project updated");
    Ok(project)
}

/// Soft-delete a project. Repeating the call is a no-op.
pub async fn delete(pool: &PgPool, caller: &CallerContext, id: DbId) -> AppResult<()> {
    let project = ProjectRepo::find_by_id_any(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    caller.ensure_company_visible(Some(project.company_id))?;

    let mut tx = pool.begin().await?;
    if ProjectRepo::soft_delete(&mut *tx, id).await? {
        ActivityLogRepo::create(
            &mut *tx,
            &CreateActivityLog::new(ActivityType::ProjectUpdated, "Project deactivated")
                .description(format!("Project '{}' was deactivated", project.name))
                .user(caller.user_id)
                .project(id)
                .company(Some(project.company_id)),
        )
        .await?;
        tracing::info!(project_id = id, user_id = caller.user_id, "Project deactivated");
    }
    tx.commit().await?;
    Ok(())
}

/// Assign (or re-activate) a person on a project.
pub async fn assign_user(
    pool: &PgPool,
    caller: &CallerContext,
    project_id: DbId,
    input: &AssignUser,
) -> AppResult<UserProject> {
    let project = load_visible(pool, caller, project_id).await?.project;
    let person = ensure_assignable(pool, caller, input.user_id).await?;
    let role = input
        .role
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_ASSIGNMENT_ROLE);

    let mut tx = pool.begin().await?;
    let assignment =
        UserProjectRepo::assign(&mut *tx, input.user_id, project_id, role, input.notes.as_deref())
            .await?;
    ActivityLogRepo::create(
        &mut *tx,
        &CreateActivityLog::new(ActivityType::PersonnelAssigned, "Personnel assigned")
            .description(format!(
                "{} was assigned to '{}' as {role}",
                person.full_name(),
                project.name
            ))
            .user(caller.user_id)
            .project(project_id)
            .company(Some(project.company_id)),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(project_id, user_id = input.user_id, "Personnel assigned");
    Ok(assignment)
}

/// End a person's active assignment on a project.
pub async fn remove_user(
    pool: &PgPool,
    caller: &CallerContext,
    project_id: DbId,
    user_id: DbId,
) -> AppResult<()> {
    let project = load_visible(pool, caller, project_id).await?.project;

    let mut tx = pool.begin().await?;
    if !UserProjectRepo::unassign(&mut *tx, user_id, project_id).await? {
        return Err(AppError::not_found("ProjectAssignment", user_id));
    }
    ActivityLogRepo::create(
        &mut *tx,
        &CreateActivityLog::new(ActivityType::PersonnelRemoved, "Personnel removed")
            .description(format!("User {user_id} was removed from '{}'", project.name))
            .user(caller.user_id)
            .project(project_id)
            .company(Some(project.company_id)),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(project_id, user_id, "Personnel removed");
    Ok(())
}

/// Set progress, clamped to `[0, 100]`, and record it for the progress history.
pub async fn update_progress(
    pool: &PgPool,
    caller: &CallerContext,
    id: DbId,
    progress: f64,
) -> AppResult<Project> {
    let current = load_visible(pool, caller, id).await?.project;
    let progress = clamp_progress(progress);

    let mut tx = pool.begin().await?;
    let project = ProjectRepo::set_progress(&mut *tx, id, progress)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    ActivityLogRepo::create(
        &mut *tx,
        &CreateActivityLog::new(ActivityType::ProjectUpdated, "Project progress updated")
            .description(format!("Progress of '{}' set to {progress}%", current.name))
            .user(caller.user_id)
            .project(id)
            .company(Some(current.company_id))
            .data(json!({ "progress": progress })),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(project_id = id, progress, "Project progress updated");
    Ok(project)
}

/// Mark a project Completed at 100 % with today's end date.
pub async fn complete(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    id: DbId,
) -> AppResult<Project> {
    let current = load_visible(pool, caller, id).await?.project;

    let mut tx = pool.begin().await?;
    let project = ProjectRepo::complete(&mut *tx, id, today(cal))
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    ActivityLogRepo::create(
        &mut *tx,
        &CreateActivityLog::new(ActivityType::ProjectCompleted, "Project completed")
            .description(format!("Project '{}' was completed", current.name))
            .user(caller.user_id)
            .project(id)
            .company(Some(current.company_id))
            .priority(ActivityPriority::High),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(project_id = id, user_id = caller.user_id, "Project completed");
    Ok(project)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The person must exist, be active, and be visible to the caller.
async fn ensure_assignable(
    pool: &PgPool,
    caller: &CallerContext,
    user_id: DbId,
) -> AppResult<Personnel> {
    let person = personnel::load_visible(pool, caller, user_id).await?;
    if !person.is_active {
        return Err(CoreError::Validation(format!(
            "User {user_id} is inactive and cannot be assigned"
        ))
        .into());
    }
    Ok(person)
}
