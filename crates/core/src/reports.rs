//! Report assembly over pre-fetched facts.
//!
//! The project, personnel, performance and financial reports. Scan rollups
//! live in [`crate::aggregation`].

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::aggregation::{percentage, ratio, working_hours, ProjectSummary, ScanFact};
use crate::calendar::SiteCalendar;
use crate::project;
use crate::status::{ProjectStatus, ScanType, TaskStatus, UserRole};
use crate::types::{Date, DbId, Timestamp};

/// Placeholder performance score. Not computed from any data.
pub const PERFORMANCE_SCORE_PLACEHOLDER: f64 = 85.0;

/// Entries in the dashboard report's top lists.
pub const TOP_LIST_SIZE: i64 = 5;
/// Recent activities in the dashboard report.
pub const DASHBOARD_REPORT_ACTIVITIES: i64 = 10;
/// Recent scans in the QR scan report.
pub const QR_REPORT_RECENT_SCANS: i64 = 20;
/// Default look-back of range reports, in days.
pub const DEFAULT_REPORT_LOOKBACK_DAYS: u64 = 30;

/// Hour reported when a day has no check-in or no check-out.
pub const NO_SCAN_HOUR: i32 = -1;

// ---------------------------------------------------------------------------
// Project report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectBudget {
    pub project_id: DbId,
    pub project_name: String,
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percentage_used: f64,
}

/// Budget utilisation for every project that has a budget.
pub fn budget_breakdown(projects: &[ProjectSummary]) -> Vec<ProjectBudget> {
    projects
        .iter()
        .filter_map(|p| {
            let budget = p.budget?;
            let spent = p.spent_amount.unwrap_or(0.0);
            Some(ProjectBudget {
                project_id: p.id,
                project_name: p.name.clone(),
                budget,
                spent,
                remaining: budget - spent,
                percentage_used: percentage(spent, budget),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectReport {
    pub total_projects: i64,
    pub active_projects: i64,
    pub completed_projects: i64,
    pub delayed_projects: i64,
    pub total_budget: f64,
    pub total_spent: f64,
    pub average_progress: f64,
    pub projects: Vec<ProjectSummary>,
    pub budget_breakdown: Vec<ProjectBudget>,
}

pub fn project_report(projects: Vec<ProjectSummary>, today: Date) -> ProjectReport {
    let count = |status: ProjectStatus| projects.iter().filter(|p| p.status == Some(status)).count() as i64;
    let total = projects.len() as i64;
    let progress_sum: f64 = projects.iter().map(|p| p.progress).sum();

    ProjectReport {
        total_projects: total,
        active_projects: count(ProjectStatus::Active),
        completed_projects: count(ProjectStatus::Completed),
        delayed_projects: projects
            .iter()
            .filter(|p| project::is_delayed(p.status, p.planned_end_date, today))
            .count() as i64,
        total_budget: projects.iter().filter_map(|p| p.budget).sum(),
        total_spent: projects.iter().filter_map(|p| p.spent_amount).sum(),
        average_progress: if total > 0 { progress_sum / total as f64 } else { 0.0 },
        budget_breakdown: budget_breakdown(&projects),
        projects,
    }
}

// ---------------------------------------------------------------------------
// Personnel report
// ---------------------------------------------------------------------------

/// One person as seen by the personnel report.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonFact {
    pub user_id: DbId,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub active_assignments: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonnelPerformance {
    pub user_id: DbId,
    pub user_name: String,
    pub work_days: i64,
    pub working_hours: f64,
    pub project_count: i64,
    pub performance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentStats {
    pub department: &'static str,
    pub personnel_count: i64,
    pub total_working_hours: f64,
    pub average_performance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonnelReport {
    pub total_personnel: i64,
    pub active_personnel: i64,
    pub total_check_ins: i64,
    pub average_working_hours: f64,
    pub personnel_performance: Vec<PersonnelPerformance>,
    pub department_stats: Vec<DepartmentStats>,
}

/// Distinct site-local dates a user scanned on.
fn work_days(user_id: DbId, scans: &[ScanFact], cal: &SiteCalendar) -> i64 {
    scans
        .iter()
        .filter(|s| s.user_id == user_id)
        .map(|s| cal.local_date(s.scanned_at))
        .collect::<HashSet<_>>()
        .len() as i64
}

fn check_ins_of(user_id: DbId, scans: &[ScanFact]) -> i64 {
    scans
        .iter()
        .filter(|s| s.user_id == user_id && s.scan_type == ScanType::CheckIn)
        .count() as i64
}

/// Build the personnel report. Per-person rows cover active people only.
pub fn personnel_report(
    people: &[PersonFact],
    scans: &[ScanFact],
    cal: &SiteCalendar,
) -> PersonnelReport {
    let active: Vec<&PersonFact> = people.iter().filter(|p| p.is_active).collect();
    let total_check_ins = scans.iter().filter(|s| s.scan_type == ScanType::CheckIn).count() as i64;

    let personnel_performance: Vec<PersonnelPerformance> = active
        .iter()
        .map(|p| PersonnelPerformance {
            user_id: p.user_id,
            user_name: p.full_name.clone(),
            work_days: work_days(p.user_id, scans, cal),
            working_hours: working_hours(check_ins_of(p.user_id, scans)),
            project_count: p.active_assignments,
            performance_score: PERFORMANCE_SCORE_PLACEHOLDER,
        })
        .collect();

    let mut by_role: BTreeMap<UserRole, (i64, f64)> = BTreeMap::new();
    for (person, perf) in active.iter().zip(&personnel_performance) {
        let entry = by_role.entry(person.role).or_default();
        entry.0 += 1;
        entry.1 += perf.working_hours;
    }

    PersonnelReport {
        total_personnel: people.len() as i64,
        active_personnel: active.len() as i64,
        total_check_ins,
        average_working_hours: ratio(working_hours(total_check_ins), active.len() as f64),
        personnel_performance,
        department_stats: by_role
            .into_iter()
            .map(|(role, (personnel_count, total_working_hours))| DepartmentStats {
                department: role.label(),
                personnel_count,
                total_working_hours,
                average_performance: PERFORMANCE_SCORE_PLACEHOLDER,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Company performance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectPerformance {
    pub project_id: DbId,
    pub project_name: String,
    pub progress: f64,
    pub budget_utilization: f64,
    pub days_overdue: i64,
    pub performance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyPerformanceReport {
    pub company_id: DbId,
    pub company_name: String,
    pub total_projects: i64,
    pub total_personnel: i64,
    pub total_revenue: f64,
    pub total_costs: f64,
    pub profitability: f64,
    pub project_performances: Vec<ProjectPerformance>,
}

pub fn company_performance(
    company_id: DbId,
    company_name: String,
    projects: &[ProjectSummary],
    total_personnel: i64,
    today: Date,
) -> CompanyPerformanceReport {
    let total_revenue: f64 = projects.iter().filter_map(|p| p.budget).sum();
    let total_costs: f64 = projects.iter().filter_map(|p| p.spent_amount).sum();

    CompanyPerformanceReport {
        company_id,
        company_name,
        total_projects: projects.len() as i64,
        total_personnel,
        total_revenue,
        total_costs,
        profitability: total_revenue - total_costs,
        project_performances: projects
            .iter()
            .map(|p| ProjectPerformance {
                project_id: p.id,
                project_name: p.name.clone(),
                progress: p.progress,
                budget_utilization: percentage(
                    p.spent_amount.unwrap_or(0.0),
                    p.budget.unwrap_or(0.0),
                ),
                days_overdue: project::days_overdue(p.status, p.planned_end_date, today),
                performance_score: PERFORMANCE_SCORE_PLACEHOLDER,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// User performance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDailyPerformance {
    pub date: Date,
    pub working_hours: f64,
    /// Site-local hour of the first check-in, or -1.
    pub check_in_time: i32,
    /// Site-local hour of the last check-out, or -1.
    pub check_out_time: i32,
    pub activities: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPerformanceReport {
    pub user_id: DbId,
    pub user_name: String,
    pub total_work_days: i64,
    pub total_working_hours: f64,
    pub total_projects: i64,
    pub average_rating: f64,
    pub daily_performance: Vec<UserDailyPerformance>,
}

/// Per-day breakdown of one user's scans. Days without scans are omitted.
pub fn user_performance(
    user_id: DbId,
    user_name: String,
    active_assignments: i64,
    scans: &[ScanFact],
    cal: &SiteCalendar,
) -> UserPerformanceReport {
    let mut by_day: BTreeMap<Date, Vec<&ScanFact>> = BTreeMap::new();
    for scan in scans.iter().filter(|s| s.user_id == user_id) {
        by_day.entry(cal.local_date(scan.scanned_at)).or_default().push(scan);
    }

    let hour_of = |ts: Option<Timestamp>| ts.map_or(NO_SCAN_HOUR, |t| cal.local_hour(t) as i32);

    let daily_performance: Vec<UserDailyPerformance> = by_day
        .into_iter()
        .map(|(date, day)| {
            let of_type = |t: ScanType| day.iter().filter(move |s| s.scan_type == t);
            let check_ins = of_type(ScanType::CheckIn).count() as i64;
            let check_outs = of_type(ScanType::CheckOut).count() as i64;
            UserDailyPerformance {
                date,
                working_hours: working_hours(check_ins),
                check_in_time: hour_of(of_type(ScanType::CheckIn).map(|s| s.scanned_at).min()),
                check_out_time: hour_of(of_type(ScanType::CheckOut).map(|s| s.scanned_at).max()),
                activities: format!(
                    "{check_ins} check-ins, {check_outs} check-outs, {} scans",
                    day.len()
                ),
            }
        })
        .collect();

    UserPerformanceReport {
        user_id,
        user_name,
        total_work_days: daily_performance.len() as i64,
        total_working_hours: daily_performance.iter().map(|d| d.working_hours).sum(),
        total_projects: active_assignments,
        average_rating: PERFORMANCE_SCORE_PLACEHOLDER,
        daily_performance,
    }
}

// ---------------------------------------------------------------------------
// Project progress
// ---------------------------------------------------------------------------

/// A task considered as a project milestone.
#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneFact {
    pub title: String,
    pub due_date: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectMilestone {
    pub name: String,
    pub due_date: Timestamp,
    pub completed_date: Option<Timestamp>,
    pub is_completed: bool,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressPoint {
    pub date: Timestamp,
    pub progress: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectProgressReport {
    pub project_id: DbId,
    pub project_name: String,
    pub current_progress: f64,
    pub expected_end_date: Option<Date>,
    pub milestones: Vec<ProjectMilestone>,
    pub progress_history: Vec<ProgressPoint>,
}

/// Read the `progress` key recorded in an activity's additional data.
pub fn progress_from_additional_data(data: &serde_json::Value) -> Option<f64> {
    data.get("progress").and_then(serde_json::Value::as_f64)
}

/// Milestones are tasks with a due date, ordered by due date. History is
/// ordered oldest first.
pub fn project_progress(
    project: &ProjectSummary,
    tasks: &[MilestoneFact],
    mut history: Vec<ProgressPoint>,
) -> ProjectProgressReport {
    let mut milestones: Vec<ProjectMilestone> = tasks
        .iter()
        .filter_map(|t| {
            Some(ProjectMilestone {
                name: t.title.clone(),
                due_date: t.due_date?,
                completed_date: t.completed_at,
                is_completed: t.status == Some(TaskStatus::Completed),
                status: t.status.map_or("Unknown", TaskStatus::label),
            })
        })
        .collect();
    milestones.sort_by_key(|m| m.due_date);
    history.sort_by_key(|p| p.date);

    ProjectProgressReport {
        project_id: project.id,
        project_name: project.name.clone(),
        current_progress: project.progress,
        expected_end_date: project.planned_end_date,
        milestones,
        progress_history: history,
    }
}

// ---------------------------------------------------------------------------
// Financial
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialBreakdown {
    /// `yyyy-MM`.
    pub period: String,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialReport {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub project_budgets: f64,
    pub personnel_costs: f64,
    pub monthly_breakdown: Vec<FinancialBreakdown>,
}

/// Revenue is project budget, expenses are project spend, grouped by the
/// month each project started. `salaries` are the active personnel's.
pub fn financial_report(projects: &[ProjectSummary], salaries: &[f64]) -> FinancialReport {
    let mut by_month: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for p in projects {
        let entry = by_month
            .entry(p.start_date.format("%Y-%m").to_string())
            .or_default();
        entry.0 += p.budget.unwrap_or(0.0);
        entry.1 += p.spent_amount.unwrap_or(0.0);
    }

    let total_revenue: f64 = by_month.values().map(|(r, _)| r).sum();
    let total_expenses: f64 = by_month.values().map(|(_, e)| e).sum();

    FinancialReport {
        total_revenue,
        total_expenses,
        net_profit: total_revenue - total_expenses,
        project_budgets: total_revenue,
        personnel_costs: salaries.iter().sum(),
        monthly_breakdown: by_month
            .into_iter()
            .map(|(period, (revenue, expenses))| FinancialBreakdown {
                period,
                revenue,
                expenses,
                profit: revenue - expenses,
                margin: ratio(revenue - expenses, revenue) * 100.0,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportType {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub required_parameters: &'static [&'static str],
    pub optional_parameters: &'static [&'static str],
}

/// Every report the API can generate.
pub const REPORT_TYPES: &[ReportType] = &[
    ReportType {
        key: "dashboard",
        name: "Dashboard Report",
        description: "Headline statistics, top projects and personnel, recent activity",
        required_parameters: &[],
        optional_parameters: &["start_date", "end_date"],
    },
    ReportType {
        key: "projects",
        name: "Project Report",
        description: "Project status counts, budgets and progress",
        required_parameters: &[],
        optional_parameters: &["company_id", "start_date", "end_date"],
    },
    ReportType {
        key: "personnel",
        name: "Personnel Report",
        description: "Check-ins, working hours and assignments per person",
        required_parameters: &[],
        optional_parameters: &["company_id", "start_date", "end_date"],
    },
    ReportType {
        key: "qr-scans",
        name: "QR Scan Report",
        description: "Scan totals and hourly activity",
        required_parameters: &[],
        optional_parameters: &["start_date", "end_date", "project_id", "user_id"],
    },
    ReportType {
        key: "daily-activity",
        name: "Daily Activity Report",
        description: "Check-ins and scans for one day",
        required_parameters: &["date"],
        optional_parameters: &[],
    },
    ReportType {
        key: "weekly",
        name: "Weekly Report",
        description: "Seven daily rollups and their summary",
        required_parameters: &[],
        optional_parameters: &["week_start"],
    },
    ReportType {
        key: "monthly",
        name: "Monthly Report",
        description: "Monthly totals with a weekly breakdown",
        required_parameters: &["year", "month"],
        optional_parameters: &[],
    },
    ReportType {
        key: "company-performance",
        name: "Company Performance Report",
        description: "Revenue, costs and per-project performance for a company",
        required_parameters: &["company_id"],
        optional_parameters: &[],
    },
    ReportType {
        key: "user-performance",
        name: "User Performance Report",
        description: "Daily working pattern of one person",
        required_parameters: &["user_id"],
        optional_parameters: &["start_date", "end_date"],
    },
    ReportType {
        key: "project-progress",
        name: "Project Progress Report",
        description: "Milestones and progress history of one project",
        required_parameters: &["project_id"],
        optional_parameters: &[],
    },
    ReportType {
        key: "financial",
        name: "Financial Report",
        description: "Budgets, spend and personnel costs by month",
        required_parameters: &[],
        optional_parameters: &["start_date", "end_date"],
    },
];

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn summary(id: DbId, status: ProjectStatus, progress: f64, budget: Option<f64>) -> ProjectSummary {
        ProjectSummary {
            id,
            name: format!("Project {id}"),
            company_id: 1,
            company_name: Some("Acme".into()),
            status: Some(status),
            progress,
            budget,
            spent_amount: budget.map(|b| b / 4.0),
            start_date: date(2025, 1, 15),
            end_date: None,
            planned_end_date: None,
        }
    }

    fn scan(user_id: DbId, day: u32, hour: u32, scan_type: ScanType) -> ScanFact {
        ScanFact {
            user_id,
            project_id: None,
            scanned_at: Utc.with_ymd_and_hms(2025, 4, day, hour, 15, 0).unwrap(),
            scan_type,
        }
    }

    #[test]
    fn budget_breakdown_skips_unbudgeted_projects() {
        let projects = vec![
            summary(1, ProjectStatus::Active, 10.0, Some(1000.0)),
            summary(2, ProjectStatus::Active, 10.0, None),
        ];
        let breakdown = budget_breakdown(&projects);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].remaining, 750.0);
        assert_eq!(breakdown[0].percentage_used, 25.0);
    }

    #[test]
    fn zero_budget_uses_zero_percentage() {
        let breakdown = budget_breakdown(&[summary(1, ProjectStatus::Active, 0.0, Some(0.0))]);
        assert_eq!(breakdown[0].percentage_used, 0.0);
    }

    #[test]
    fn project_report_counts() {
        let mut late = summary(3, ProjectStatus::Active, 30.0, None);
        late.planned_end_date = Some(date(2025, 2, 1));
        let report = project_report(
            vec![
                summary(1, ProjectStatus::Active, 50.0, Some(100.0)),
                summary(2, ProjectStatus::Completed, 100.0, Some(200.0)),
                late,
                summary(4, ProjectStatus::Delayed, 20.0, None),
            ],
            date(2025, 3, 1),
        );
        assert_eq!(report.total_projects, 4);
        assert_eq!(report.active_projects, 2);
        assert_eq!(report.completed_projects, 1);
        assert_eq!(report.delayed_projects, 2);
        assert_eq!(report.total_budget, 300.0);
        assert_eq!(report.total_spent, 75.0);
        assert_eq!(report.average_progress, 50.0);
        assert_eq!(report.budget_breakdown.len(), 2);
    }

    #[test]
    fn empty_project_report_has_zero_average() {
        let report = project_report(Vec::new(), date(2025, 3, 1));
        assert_eq!(report.average_progress, 0.0);
        assert_eq!(report.total_projects, 0);
    }

    #[test]
    fn personnel_report_uses_placeholder_score_and_eight_hour_days() {
        let people = vec![
            PersonFact {
                user_id: 1,
                full_name: "Ada Builder".into(),
                role: UserRole::SiteStaff,
                is_active: true,
                active_assignments: 2,
            },
            PersonFact {
                user_id: 2,
                full_name: "Bo Office".into(),
                role: UserRole::OfficeStaff,
                is_active: true,
                active_assignments: 1,
            },
            PersonFact {
                user_id: 3,
                full_name: "Cy Gone".into(),
                role: UserRole::SiteStaff,
                is_active: false,
                active_assignments: 0,
            },
        ];
        let scans = vec![
            scan(1, 1, 8, ScanType::CheckIn),
            scan(1, 1, 17, ScanType::CheckOut),
            scan(1, 2, 8, ScanType::CheckIn),
        ];
        let report = personnel_report(&people, &scans, &SiteCalendar::utc());

        assert_eq!(report.total_personnel, 3);
        assert_eq!(report.active_personnel, 2);
        assert_eq!(report.total_check_ins, 2);
        assert_eq!(report.average_working_hours, 8.0);
        assert_eq!(report.personnel_performance.len(), 2);

        let ada = &report.personnel_performance[0];
        assert_eq!(ada.work_days, 2);
        assert_eq!(ada.working_hours, 16.0);
        assert_eq!(ada.project_count, 2);
        assert_eq!(ada.performance_score, PERFORMANCE_SCORE_PLACEHOLDER);

        let departments: Vec<_> = report.department_stats.iter().map(|d| d.department).collect();
        assert_eq!(departments, vec!["Office Staff", "Site Staff"]);
        assert_eq!(report.department_stats[1].total_working_hours, 16.0);
    }

    #[test]
    fn personnel_report_without_active_people_does_not_divide_by_zero() {
        let report = personnel_report(&[], &[scan(9, 1, 8, ScanType::CheckIn)], &SiteCalendar::utc());
        assert_eq!(report.average_working_hours, 8.0);
    }

    #[test]
    fn company_performance_profitability() {
        let mut late = summary(2, ProjectStatus::Active, 40.0, Some(400.0));
        late.planned_end_date = Some(date(2025, 2, 20));
        let report = company_performance(
            1,
            "Acme".into(),
            &[summary(1, ProjectStatus::Active, 10.0, Some(1000.0)), late],
            7,
            date(2025, 3, 1),
        );
        assert_eq!(report.total_revenue, 1400.0);
        assert_eq!(report.total_costs, 350.0);
        assert_eq!(report.profitability, 1050.0);
        assert_eq!(report.total_personnel, 7);
        assert_eq!(report.project_performances[0].budget_utilization, 25.0);
        assert_eq!(report.project_performances[1].days_overdue, 9);
    }

    #[test]
    fn user_performance_daily_rows() {
        let scans = vec![
            scan(1, 1, 8, ScanType::CheckIn),
            scan(1, 1, 17, ScanType::CheckOut),
            scan(1, 1, 13, ScanType::CheckIn),
            scan(1, 3, 9, ScanType::MaterialScan),
            scan(2, 1, 6, ScanType::CheckIn),
        ];
        let report = user_performance(1, "Ada".into(), 3, &scans, &SiteCalendar::utc());
        assert_eq!(report.total_work_days, 2);
        assert_eq!(report.total_working_hours, 16.0);
        assert_eq!(report.total_projects, 3);

        let first = &report.daily_performance[0];
        assert_eq!(first.check_in_time, 8);
        assert_eq!(first.check_out_time, 17);
        assert_eq!(first.activities, "2 check-ins, 1 check-outs, 3 scans");

        let second = &report.daily_performance[1];
        assert_eq!(second.check_in_time, NO_SCAN_HOUR);
        assert_eq!(second.check_out_time, NO_SCAN_HOUR);
        assert_eq!(second.working_hours, 0.0);
    }

    #[test]
    fn progress_report_orders_milestones_and_history() {
        let project = summary(5, ProjectStatus::Active, 60.0, None);
        let due = |d| Some(Utc.with_ymd_and_hms(2025, 5, d, 0, 0, 0).unwrap());
        let tasks = vec![
            MilestoneFact {
                title: "Roof".into(),
                due_date: due(20),
                completed_at: None,
                status: Some(TaskStatus::InProgress),
            },
            MilestoneFact {
                title: "Foundation".into(),
                due_date: due(1),
                completed_at: due(2),
                status: Some(TaskStatus::Completed),
            },
            MilestoneFact {
                title: "Cleanup".into(),
                due_date: None,
                completed_at: None,
                status: Some(TaskStatus::Todo),
            },
        ];
        let history = vec![
            ProgressPoint {
                date: due(10).unwrap(),
                progress: 60.0,
                notes: None,
            },
            ProgressPoint {
                date: due(3).unwrap(),
                progress: 20.0,
                notes: Some("Foundation poured".into()),
            },
        ];
        let report = project_progress(&project, &tasks, history);

        let names: Vec<_> = report.milestones.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Foundation", "Roof"]);
        assert!(report.milestones[0].is_completed);
        assert_eq!(report.milestones[1].status, "In Progress");
        assert_eq!(report.progress_history[0].progress, 20.0);
        assert_eq!(report.current_progress, 60.0);
    }

    #[test]
    fn progress_is_read_from_additional_data() {
        let data = serde_json::json!({ "progress": 42.5 });
        assert_eq!(progress_from_additional_data(&data), Some(42.5));
        assert_eq!(progress_from_additional_data(&serde_json::json!({})), None);
    }

    #[test]
    fn financial_report_groups_by_start_month() {
        let mut march = summary(2, ProjectStatus::Active, 0.0, Some(400.0));
        march.start_date = date(2025, 3, 2);
        let projects = vec![summary(1, ProjectStatus::Active, 0.0, Some(1000.0)), march];
        let report = financial_report(&projects, &[3000.0, 2500.0]);

        assert_eq!(report.total_revenue, 1400.0);
        assert_eq!(report.total_expenses, 350.0);
        assert_eq!(report.net_profit, 1050.0);
        assert_eq!(report.project_budgets, 1400.0);
        assert_eq!(report.personnel_costs, 5500.0);
        assert_eq!(report.monthly_breakdown.len(), 2);
        assert_eq!(report.monthly_breakdown[0].period, "2025-01");
        assert_eq!(report.monthly_breakdown[0].margin, 75.0);
    }

    #[test]
    fn catalogue_keys_are_unique() {
        let keys: HashSet<_> = REPORT_TYPES.iter().map(|r| r.key).collect();
        assert_eq!(keys.len(), REPORT_TYPES.len());
    }
}
