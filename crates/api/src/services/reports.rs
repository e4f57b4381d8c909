//! Report assembly.
//!
//! Each report loads its facts through the repositories, scoped to the
//! caller's company, and hands them to the pure builders in
//! [`sitetrack_core::reports`] and [`sitetrack_core::aggregation`].
//! Date ranges are half-open and interpreted on the site calendar.

use chrono::Days;
use serde::{Deserialize, Serialize};
use sitetrack_core::aggregation::{
    daily_rollup, hourly_histogram, monthly_report, scan_totals, weekly_report, DailyRollup,
    DashboardStats, HourlyActivity, MonthlyReport, ProjectSummary, ScanFact, ScanTotals,
    WeeklyReport,
};
use sitetrack_core::caller::CallerContext;
use sitetrack_core::calendar::{self, SiteCalendar, DAYS_PER_WEEK};
use sitetrack_core::error::CoreError;
use sitetrack_core::reports::{
    company_performance, financial_report, personnel_report, progress_from_additional_data,
    project_progress, project_report, user_performance, CompanyPerformanceReport,
    FinancialReport, MilestoneFact, PersonFact, PersonnelReport, ProgressPoint,
    ProjectProgressReport, ProjectReport, ReportType, UserPerformanceReport,
    DASHBOARD_REPORT_ACTIVITIES, DEFAULT_REPORT_LOOKBACK_DAYS, QR_REPORT_RECENT_SCANS,
    REPORT_TYPES, TOP_LIST_SIZE,
};
use sitetrack_core::types::{Date, DbId};
use sitetrack_db::models::activity_log::ActivityLogFilter;
use sitetrack_db::models::project::ProjectWithCompany;
use sitetrack_db::models::qr_scan::{QrCodeScan, ScanScope};
use sitetrack_db::models::user::Personnel;
use sitetrack_db::repositories::{
    ActivityLogRepo, CompanyRepo, ProjectRepo, QrScanRepo, TaskRepo, UserProjectRepo, UserRepo,
};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::services::activity_logs::{present, ActivityView};
use crate::services::{dashboard, personnel, projects, today};

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Query string shared by the range reports. `end_date` is exclusive.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub company_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub user_id: Option<DbId>,
}

/// A resolved `[from, to)` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Date,
    pub to: Date,
}

impl DateRange {
    /// Fill missing bounds with `[today - 30, today + 1)`.
    pub fn resolve(
        start: Option<Date>,
        end: Option<Date>,
        today: Date,
    ) -> Result<Self, CoreError> {
        let from = match start {
            Some(date) => calendar::ensure_supported_date(date)?,
            None => today - Days::new(DEFAULT_REPORT_LOOKBACK_DAYS),
        };
        let to = match end {
            Some(date) => calendar::ensure_supported_date(date)?,
            None => today + Days::new(1),
        };
        if to <= from {
            return Err(CoreError::Validation(
                "end_date must be after start_date".into(),
            ));
        }
        Ok(Self { from, to })
    }

    fn scope(&self, cal: &SiteCalendar, company_id: Option<DbId>) -> ScanScope {
        let window = cal.range_window(self.from, self.to);
        ScanScope {
            company_id,
            from: Some(window.start),
            to: Some(window.end),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub date: Option<Date>,
    pub company_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct WeeklyQuery {
    pub week_start: Option<Date>,
    pub company_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub year: i32,
    pub month: u32,
    pub company_id: Option<DbId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Excel,
    Pdf,
}

// ---------------------------------------------------------------------------
// Report payloads assembled here
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct DashboardReport {
    pub range: DateRange,
    pub stats: DashboardStats,
    pub top_projects: Vec<ProjectWithCompany>,
    pub top_personnel: Vec<Personnel>,
    pub recent_activities: Vec<ActivityView>,
}

#[derive(Debug, Serialize)]
pub struct QrScanReport {
    pub range: DateRange,
    #[serde(flatten)]
    pub totals: ScanTotals,
    pub recent_scans: Vec<QrCodeScan>,
    pub hourly_activity: Vec<HourlyActivity>,
}

#[derive(Debug, Serialize)]
pub struct DailyActivityReport {
    #[serde(flatten)]
    pub rollup: DailyRollup,
    pub scans: Vec<QrCodeScan>,
}

// ---------------------------------------------------------------------------
// Fact loading
// ---------------------------------------------------------------------------

/// Valid scans in scope as aggregation facts.
pub(crate) async fn scan_facts(pool: &PgPool, scope: &ScanScope) -> AppResult<Vec<ScanFact>> {
    Ok(QrScanRepo::facts(pool, scope)
        .await?
        .into_iter()
        .map(ScanFact::from)
        .collect())
}

fn summaries(projects: &[ProjectWithCompany]) -> Vec<ProjectSummary> {
    projects.iter().map(ProjectSummary::from).collect()
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Headline stats, top projects and personnel, and activity in range.
pub async fn dashboard(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    query: &ReportQuery,
) -> AppResult<DashboardReport> {
    let company_id = caller.scope_company(query.company_id)?;
    let range = DateRange::resolve(query.start_date, query.end_date, today(cal))?;
    let window = cal.range_window(range.from, range.to);
    let activities = ActivityLogFilter {
        company_id,
        from: Some(window.start),
        to: Some(window.end),
        limit: DASHBOARD_REPORT_ACTIVITIES,
        ..Default::default()
    };

    let stats = dashboard::stats(pool, caller, cal, company_id).await?;
    let top_projects = ProjectRepo::top_by_progress(pool, company_id, TOP_LIST_SIZE).await?;
    let top_personnel = UserRepo::top_by_last_login(pool, company_id, TOP_LIST_SIZE).await?;
    let recent_activities = ActivityLogRepo::list(pool, &activities).await?;

    Ok(DashboardReport {
        range,
        stats,
        top_projects,
        top_personnel,
        recent_activities: present(recent_activities),
    })
}

/// Projects whose start date falls in the requested range. Open bounds are unbounded.
pub async fn projects(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    query: &ReportQuery,
) -> AppResult<ProjectReport> {
    let company_id = caller.scope_company(query.company_id)?;
    let rows =
        ProjectRepo::list_started_between(pool, company_id, query.start_date, query.end_date)
            .await?;
    Ok(project_report(summaries(&rows), today(cal)))
}

pub async fn personnel(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    query: &ReportQuery,
) -> AppResult<PersonnelReport> {
    let company_id = caller.scope_company(query.company_id)?;
    let range = DateRange::resolve(query.start_date, query.end_date, today(cal))?;
    let scope = range.scope(cal, company_id);

    let people = UserRepo::person_facts(pool, company_id).await?;
    let scans = scan_facts(pool, &scope).await?;
    let people: Vec<PersonFact> = people.into_iter().map(PersonFact::from).collect();
    Ok(personnel_report(&people, &scans, cal))
}

/// Scan totals, the newest scans, and the hourly histogram for a range.
pub async fn qr_scans(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    query: &ReportQuery,
) -> AppResult<QrScanReport> {
    let company_id = caller.scope_company(query.company_id)?;
    let range = DateRange::resolve(query.start_date, query.end_date, today(cal))?;
    let scope = ScanScope {
        project_id: query.project_id,
        user_id: query.user_id,
        ..range.scope(cal, company_id)
    };

    let scans = scan_facts(pool, &scope).await?;
    let recent_scans = QrScanRepo::list(pool, &scope, QR_REPORT_RECENT_SCANS, 0).await?;

    Ok(QrScanReport {
        range,
        totals: scan_totals(&scans),
        recent_scans,
        hourly_activity: hourly_histogram(&scans, cal),
    })
}

/// One day's rollup plus its scans, oldest first. Defaults to today.
pub async fn daily(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    query: &DailyQuery,
) -> AppResult<DailyActivityReport> {
    let company_id = caller.scope_company(query.company_id)?;
    let date = match query.date {
        Some(date) => calendar::ensure_supported_date(date)?,
        None => today(cal),
    };
    let window = cal.day_window(date);
    let scope = ScanScope {
        company_id,
        from: Some(window.start),
        to: Some(window.end),
        ..Default::default()
    };

    let facts = scan_facts(pool, &scope).await?;
    let scans = QrScanRepo::list_ascending(pool, &scope).await?;

    Ok(DailyActivityReport {
        rollup: daily_rollup(date, &facts, cal),
        scans,
    })
}

/// Seven daily rows from `week_start`, which defaults to this week's Sunday.
pub async fn weekly(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    query: &WeeklyQuery,
) -> AppResult<WeeklyReport> {
    let company_id = caller.scope_company(query.company_id)?;
    let week_start = match query.week_start {
        Some(date) => calendar::ensure_supported_date(date)?,
        None => calendar::week_start(today(cal)),
    };
    let range = DateRange {
        from: week_start,
        to: week_start + Days::new(DAYS_PER_WEEK),
    };
    let scope = range.scope(cal, company_id);

    let scans = scan_facts(pool, &scope).await?;
    let active_projects = ProjectRepo::count(pool, company_id).await?;
    Ok(weekly_report(week_start, &scans, cal, active_projects))
}

pub async fn monthly(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    query: &MonthlyQuery,
) -> AppResult<MonthlyReport> {
    let company_id = caller.scope_company(query.company_id)?;
    let (from, to) = calendar::month_bounds(query.year, query.month)?;
    let scope = DateRange { from, to }.scope(cal, company_id);

    let scans = scan_facts(pool, &scope).await?;
    let projects = ProjectRepo::list_started_between(pool, company_id, None, None).await?;
    let active_projects = ProjectRepo::count(pool, company_id).await?;

    Ok(monthly_report(
        query.year,
        query.month,
        &scans,
        &summaries(&projects),
        active_projects,
        cal,
    )?)
}

/// Revenue, costs and per-project performance of one company.
pub async fn company_performance_report(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    company_id: DbId,
) -> AppResult<CompanyPerformanceReport> {
    caller.ensure_company_visible(Some(company_id))?;
    let name = CompanyRepo::name_of(pool, company_id)
        .await?
        .ok_or_else(|| AppError::not_found("Company", company_id))?;

    let projects = ProjectRepo::list_started_between(pool, Some(company_id), None, None).await?;
    let total_personnel = UserRepo::count_active(pool, Some(company_id)).await?;

    Ok(company_performance(
        company_id,
        name,
        &summaries(&projects),
        total_personnel,
        today(cal),
    ))
}

/// Per-day attendance of one person over a range.
pub async fn user_performance_report(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    user_id: DbId,
    query: &ReportQuery,
) -> AppResult<UserPerformanceReport> {
    let person = personnel::load_visible(pool, caller, user_id).await?;
    let range = DateRange::resolve(query.start_date, query.end_date, today(cal))?;
    let scope = ScanScope {
        user_id: Some(user_id),
        ..range.scope(cal, None)
    };

    let scans = scan_facts(pool, &scope).await?;
    let (_, active_assignments) = UserProjectRepo::count_for_user(pool, user_id).await?;

    Ok(user_performance(
        user_id,
        person.full_name(),
        active_assignments,
        &scans,
        cal,
    ))
}

/// Milestones from the project's tasks and the logged progress history.
pub async fn project_progress_report(
    pool: &PgPool,
    caller: &CallerContext,
    project_id: DbId,
) -> AppResult<ProjectProgressReport> {
    let project = projects::load_visible(pool, caller, project_id).await?;

    let tasks = TaskRepo::list_for_project(pool, project_id).await?;
    let history = ActivityLogRepo::progress_history(pool, project_id).await?;

    let milestones: Vec<MilestoneFact> = tasks.iter().map(MilestoneFact::from).collect();
    let history: Vec<ProgressPoint> = history
        .into_iter()
        .filter_map(|(date, data, notes)| {
            Some(ProgressPoint {
                date,
                progress: progress_from_additional_data(&data)?,
                notes,
            })
        })
        .collect();

    Ok(project_progress(
        &ProjectSummary::from(&project),
        &milestones,
        history,
    ))
}

/// Budgets and spend of projects started in range, plus active payroll.
pub async fn financial(
    pool: &PgPool,
    caller: &CallerContext,
    cal: &SiteCalendar,
    query: &ReportQuery,
) -> AppResult<FinancialReport> {
    let company_id = caller.scope_company(query.company_id)?;
    let range = DateRange::resolve(query.start_date, query.end_date, today(cal))?;

    let projects =
        ProjectRepo::list_started_between(pool, company_id, Some(range.from), Some(range.to))
            .await?;
    let salaries = UserRepo::active_salaries(pool, company_id).await?;
    Ok(financial_report(&summaries(&projects), &salaries))
}

pub fn types() -> &'static [ReportType] {
    REPORT_TYPES
}

/// Rendering reports to files is not supported.
pub fn export(format: ExportFormat) -> AppResult<()> {
    let label = match format {
        ExportFormat::Excel => "Excel",
        ExportFormat::Pdf => "PDF",
    };
    Err(CoreError::NotImplemented(format!("{label} export is not supported")).into())
}

/// Ad-hoc report definitions are not supported.
pub fn custom() -> AppResult<()> {
    Err(CoreError::NotImplemented("Custom reports are not supported".into()).into())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn range_defaults_to_trailing_thirty_days() {
        let range = DateRange::resolve(None, None, date(2024, 3, 15)).expect("range");
        assert_eq!(range.from, date(2024, 2, 14));
        assert_eq!(range.to, date(2024, 3, 16));
    }

    #[test]
    fn explicit_bounds_are_kept() {
        let range =
            DateRange::resolve(Some(date(2024, 1, 1)), Some(date(2024, 2, 1)), date(2024, 3, 15))
                .expect("range");
        assert_eq!(range.from, date(2024, 1, 1));
        assert_eq!(range.to, date(2024, 2, 1));
    }

    #[test]
    fn empty_range_is_rejected() {
        let day = Some(date(2024, 2, 1));
        let result = DateRange::resolve(day, day, date(2024, 3, 15));
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn dates_beyond_supported_years_are_rejected() {
        let far = Some(NaiveDate::MAX);
        assert_matches!(
            DateRange::resolve(None, far, date(2024, 3, 15)),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            DateRange::resolve(Some(NaiveDate::MIN), None, date(2024, 3, 15)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn exports_are_not_implemented() {
        for format in [ExportFormat::Excel, ExportFormat::Pdf] {
            assert_matches!(
                export(format),
                Err(AppError::Core(CoreError::NotImplemented(_)))
            );
        }
        assert_matches!(custom(), Err(AppError::Core(CoreError::NotImplemented(_))));
    }

    #[test]
    fn catalogue_lists_every_report() {
        let keys: Vec<&str> = types().iter().map(|t| t.key).collect();
        assert!(keys.contains(&"dashboard"));
        assert!(keys.contains(&"financial"));
    }
}
