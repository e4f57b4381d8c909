//! Home-screen dashboard of the mobile app.

use chrono::Days;
use serde::Serialize;
use sitetrack_core::aggregation::{
    dashboard_week_start, dashboard_weekly_stats, DashboardStats, DashboardWeeklyStats,
    DASHBOARD_CHECK_IN_LOOKBACK_DAYS,
};
use sitetrack_core::caller::CallerContext;
use sitetrack_core::calendar::SiteCalendar;
use sitetrack_core::types::DbId;
use sitetrack_db::models::activity_log::ActivityLogFilter;
use sitetrack_db::models::project::ProjectWithCompany;
use sitetrack_db::models::qr_scan::ScanScope;
use sitetrack_db::models::user::Personnel;
use sitetrack_db::repositories::{ActivityLogRepo, ProjectRepo, QrScanRepo, UserRepo};
use sqlx::PgPool;

use crate::error::AppResult;
use crate::services::activity_logs::{present, ActivityView};
use crate::services::reports::scan_facts;
use crate::services::{auth, projects, today};

const DASHBOARD_RECENT_PROJECTS: i64 = 3;
const DASHBOARD_RECENT_ACTIVITIES: i64 = 5;

#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub recent_projects: Vec<ProjectWithCompany>,
    pub recent_activities: Vec<ActivityView>,
    pub current_user: Personnel,
}

/// Headline counters scoped to the caller's company.
///
/// `pending_tasks` counts unread activity entries of High priority or above.
pub async fn stats(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    company_id: Option<DbId>,
) -> AppResult<DashboardStats> {
    let company_id = caller.scope_company(company_id)?;
    let since = today(cal) - Days::new(DASHBOARD_CHECK_IN_LOOKBACK_DAYS);
    let check_ins = ScanScope {
        company_id,
        from: Some(cal.start_of_day(since)),
        ..Default::default()
    };
    let active_projects = ProjectRepo::count_in_progress(pool, company_id).await?;
    let total_personnel = UserRepo::count_active(pool, company_id).await?;
    let monthly_check_ins = QrScanRepo::count_check_ins(pool, &check_ins).await?;
    let pending_tasks = ActivityLogRepo::count_unread_urgent(pool, company_id).await?;
    Ok(DashboardStats::from_counts(
        active_projects,
        total_personnel,
        monthly_check_ins,
        pending_tasks,
    ))
}

/// Stats, the newest projects and activities, and the caller's own profile.
///
/// Non-admin callers only see projects and activities they are assigned to.
pub async fn data(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
) -> AppResult<DashboardData> {
    let activities = ActivityLogFilter {
        company_id: caller.scope_company(None)?,
        assigned_user_id: (!caller.is_admin()).then_some(caller.user_id),
        limit: DASHBOARD_RECENT_ACTIVITIES,
        ..Default::default()
    };
    let stats = stats(pool, caller, cal, None).await?;
    let recent_projects =
        projects::recent(pool, caller, None, Some(DASHBOARD_RECENT_PROJECTS)).await?;
    let recent_activities = ActivityLogRepo::list(pool, &activities).await?;
    let current_user = auth::current_user(pool, caller).await?;

    Ok(DashboardData {
        stats,
        recent_projects,
        recent_activities: present(recent_activities),
        current_user,
    })
}

/// Daily check-ins for the last eight days, ending today.
pub async fn weekly(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
) -> AppResult<DashboardWeeklyStats> {
    let company_id = caller.scope_company(None)?;
    let today = today(cal);
    let window = cal.range_window(dashboard_week_start(today), today + Days::new(1));
    let scope = ScanScope {
        company_id,
        from: Some(window.start),
        to: Some(window.end),
        ..Default::default()
    };
    let scans = scan_facts(pool, &scope).await?;
    let total_users = UserRepo::count_active(pool, company_id).await?;
    let active_projects = ProjectRepo::count_in_progress(pool, company_id).await?;
    Ok(dashboard_weekly_stats(today, &scans, cal, total_users, active_projects))
}
