//! Scan rollups: daily, weekly, monthly, dashboard and hourly statistics.
//!
//! Every function here is a pure fold over rows the caller has already
//! fetched. Nothing is cached or materialised; each report recomputes from
//! the raw facts.

use std::collections::{BTreeMap, HashSet};

use chrono::Days;
use serde::Serialize;

use crate::calendar::{self, SiteCalendar, DAYS_PER_WEEK};
use crate::error::CoreError;
use crate::status::{ProjectStatus, ScanType};
use crate::types::{Date, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Numeric policy
// ---------------------------------------------------------------------------

/// Working hours credited per check-in.
pub const HOURS_PER_CHECK_IN: f64 = 8.0;

/// Days of check-ins counted by the dashboard's monthly figure.
pub const DASHBOARD_CHECK_IN_LOOKBACK_DAYS: u64 = 30;

/// Days before today covered by the dashboard weekly chart.
pub const DASHBOARD_WEEK_LOOKBACK_DAYS: u64 = 7;

/// Fixed dashboard trend labels. These are not computed.
pub const PROJECT_TREND: &str = "+2";
pub const PERSONNEL_TREND: &str = "+5";
pub const CHECK_IN_TREND: &str = "+12%";
pub const TASK_TREND: &str = "-3";

/// Approximate working hours for a number of check-ins.
pub fn working_hours(check_ins: i64) -> f64 {
    check_ins as f64 * HOURS_PER_CHECK_IN
}

/// `numerator / denominator` with the denominator floored at 1.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    numerator / denominator.max(1.0)
}

/// `part` as a percentage of `whole`; 0 when `whole` is not positive.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Facts
// ---------------------------------------------------------------------------

/// One scan row as seen by the aggregation functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanFact {
    pub user_id: DbId,
    pub project_id: Option<DbId>,
    pub scanned_at: Timestamp,
    pub scan_type: ScanType,
}

/// One project row as seen by the aggregation functions.
///
/// Also serves as the project summary embedded in reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub id: DbId,
    pub name: String,
    pub company_id: DbId,
    pub company_name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub progress: f64,
    pub budget: Option<f64>,
    pub spent_amount: Option<f64>,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub planned_end_date: Option<Date>,
}

fn count_type(scans: &[&ScanFact], scan_type: ScanType) -> i64 {
    scans.iter().filter(|s| s.scan_type == scan_type).count() as i64
}

fn distinct_users(scans: &[&ScanFact]) -> i64 {
    scans.iter().map(|s| s.user_id).collect::<HashSet<_>>().len() as i64
}

// ---------------------------------------------------------------------------
// Daily
// ---------------------------------------------------------------------------

/// Check-in/out and distinct user/project counts for one local day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyRollup {
    pub date: Date,
    pub total_check_ins: i64,
    pub total_check_outs: i64,
    pub active_users: i64,
    pub active_projects: i64,
}

/// Roll up the scans that fall on `date` (site-local). Scans from other
/// days are ignored, so callers may pass a wider slice.
pub fn daily_rollup(date: Date, scans: &[ScanFact], cal: &SiteCalendar) -> DailyRollup {
    let window = cal.day_window(date);
    let day: Vec<&ScanFact> = scans.iter().filter(|s| window.contains(s.scanned_at)).collect();

    DailyRollup {
        date,
        total_check_ins: count_type(&day, ScanType::CheckIn),
        total_check_outs: count_type(&day, ScanType::CheckOut),
        active_users: distinct_users(&day),
        active_projects: day
            .iter()
            .filter_map(|s| s.project_id)
            .collect::<HashSet<_>>()
            .len() as i64,
    }
}

/// Per-day row of weekly charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyStat {
    pub date: Date,
    pub day_name: String,
    pub check_in_count: i64,
    pub active_users: i64,
}

impl From<&DailyRollup> for DailyStat {
    fn from(day: &DailyRollup) -> Self {
        Self {
            date: day.date,
            day_name: calendar::weekday_name(day.date),
            check_in_count: day.total_check_ins,
            active_users: day.active_users,
        }
    }
}

// ---------------------------------------------------------------------------
// Weekly
// ---------------------------------------------------------------------------

/// Totals over a run of daily rollups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub week_start: Date,
    pub total_work_days: i64,
    pub total_check_ins: i64,
    /// Peak single-day distinct users, not a sum across days.
    pub total_active_users: i64,
    pub total_active_projects: i64,
    pub average_working_hours: f64,
}

/// Summarise daily rollups. Check-ins are summed; active users take the
/// maximum day so a person present all week counts once.
pub fn weekly_summary(days: &[DailyRollup], active_projects: i64) -> WeeklySummary {
    let total_check_ins: i64 = days.iter().map(|d| d.total_check_ins).sum();
    let user_days: i64 = days.iter().map(|d| d.active_users).sum();
    let hours: f64 = days.iter().map(|d| working_hours(d.total_check_ins)).sum();

    WeeklySummary {
        week_start: days.first().map_or(Date::MIN, |d| d.date),
        total_work_days: days.iter().filter(|d| d.total_check_ins > 0).count() as i64,
        total_check_ins,
        total_active_users: days.iter().map(|d| d.active_users).max().unwrap_or(0),
        total_active_projects: active_projects,
        average_working_hours: ratio(hours, user_days as f64),
    }
}

/// Seven daily stats and their summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReport {
    pub week_start: Date,
    pub week_end: Date,
    pub daily_stats: Vec<DailyStat>,
    pub summary: WeeklySummary,
}

/// Build the week starting at `week_start` by rolling up each of its days.
pub fn weekly_report(
    week_start: Date,
    scans: &[ScanFact],
    cal: &SiteCalendar,
    active_projects: i64,
) -> WeeklyReport {
    let week_end = week_start + Days::new(DAYS_PER_WEEK - 1);
    let days: Vec<DailyRollup> = calendar::dates_between(week_start, week_end + Days::new(1))
        .map(|date| daily_rollup(date, scans, cal))
        .collect();

    WeeklyReport {
        week_start,
        week_end,
        daily_stats: days.iter().map(DailyStat::from).collect(),
        summary: weekly_summary(&days, active_projects),
    }
}

// ---------------------------------------------------------------------------
// Monthly
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// Calendar days in the month.
    pub total_work_days: i64,
    pub total_check_ins: i64,
    pub total_active_users: i64,
    pub total_active_projects: i64,
    /// Budgets of projects that started in the month.
    pub total_revenue: f64,
    /// Spend of projects that started in the month.
    pub total_expenses: f64,
    pub projects_completed: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub summary: MonthlySummary,
    pub weekly_breakdown: Vec<WeeklySummary>,
}

/// Build a month report from the month's scans and the candidate projects.
pub fn monthly_report(
    year: i32,
    month: u32,
    scans: &[ScanFact],
    projects: &[ProjectSummary],
    active_projects: i64,
    cal: &SiteCalendar,
) -> Result<MonthlyReport, CoreError> {
    let (first, next) = calendar::month_bounds(year, month)?;
    let window = cal.range_window(first, next);
    let in_month: Vec<&ScanFact> = scans.iter().filter(|s| window.contains(s.scanned_at)).collect();
    let in_range = |d: Date| d >= first && d < next;

    let started: Vec<&ProjectSummary> = projects.iter().filter(|p| in_range(p.start_date)).collect();

    let summary = MonthlySummary {
        total_work_days: calendar::days_in_month(year, month)? as i64,
        total_check_ins: count_type(&in_month, ScanType::CheckIn),
        total_active_users: distinct_users(&in_month),
        total_active_projects: active_projects,
        total_revenue: started.iter().filter_map(|p| p.budget).sum(),
        total_expenses: started.iter().filter_map(|p| p.spent_amount).sum(),
        projects_completed: projects
            .iter()
            .filter(|p| p.status == Some(ProjectStatus::Completed))
            .filter(|p| p.end_date.is_some_and(in_range))
            .count() as i64,
    };

    let weekly_breakdown = calendar::month_slices(year, month)?
        .into_iter()
        .map(|(start, end)| {
            let days: Vec<DailyRollup> = calendar::dates_between(start, end)
                .map(|date| daily_rollup(date, scans, cal))
                .collect();
            weekly_summary(&days, active_projects)
        })
        .collect();

    Ok(MonthlyReport {
        year,
        month,
        month_name: calendar::month_name(month)?,
        summary,
        weekly_breakdown,
    })
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Headline dashboard counters plus the fixed trend labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub active_projects: i64,
    pub total_personnel: i64,
    pub monthly_check_ins: i64,
    pub pending_tasks: i64,
    pub project_trend: &'static str,
    pub personnel_trend: &'static str,
    pub check_in_trend: &'static str,
    pub task_trend: &'static str,
}

impl DashboardStats {
    pub fn from_counts(
        active_projects: i64,
        total_personnel: i64,
        monthly_check_ins: i64,
        pending_tasks: i64,
    ) -> Self {
        Self {
            active_projects,
            total_personnel,
            monthly_check_ins,
            pending_tasks,
            project_trend: PROJECT_TREND,
            personnel_trend: PERSONNEL_TREND,
            check_in_trend: CHECK_IN_TREND,
            task_trend: TASK_TREND,
        }
    }
}

/// Eight-day check-in chart ending today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardWeeklyStats {
    pub days: Vec<DailyStat>,
    pub total_check_ins: i64,
    pub total_users: i64,
    pub active_projects: i64,
}

/// First day of the dashboard chart.
pub fn dashboard_week_start(today: Date) -> Date {
    today - Days::new(DASHBOARD_WEEK_LOOKBACK_DAYS)
}

/// Per-day check-ins and distinct scanning users for `[today-7, today]`.
///
/// `total_users` and `active_projects` are headcounts supplied by the caller.
pub fn dashboard_weekly_stats(
    today: Date,
    scans: &[ScanFact],
    cal: &SiteCalendar,
    total_users: i64,
    active_projects: i64,
) -> DashboardWeeklyStats {
    let days: Vec<DailyStat> =
        calendar::dates_between(dashboard_week_start(today), today + Days::new(1))
            .map(|date| {
                let window = cal.day_window(date);
                let in_day: Vec<&ScanFact> =
                    scans.iter().filter(|s| window.contains(s.scanned_at)).collect();
                let check_in_count = in_day
                    .iter()
                    .filter(|s| s.scan_type == ScanType::CheckIn)
                    .count() as i64;
                DailyStat {
                    date,
                    day_name: calendar::weekday_name(date),
                    check_in_count,
                    active_users: distinct_users(&in_day),
                }
            })
            .collect();

    DashboardWeeklyStats {
        total_check_ins: days.iter().map(|d| d.check_in_count).sum(),
        days,
        total_users,
        active_projects,
    }
}

// ---------------------------------------------------------------------------
// Hourly histogram and scan totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyActivity {
    pub hour: u32,
    pub check_in_count: i64,
    pub check_out_count: i64,
}

/// Bucket scans by site-local hour. Only hours with scans appear, ascending.
pub fn hourly_histogram(scans: &[ScanFact], cal: &SiteCalendar) -> Vec<HourlyActivity> {
    let mut buckets: BTreeMap<u32, (i64, i64)> = BTreeMap::new();
    for scan in scans {
        let bucket = buckets.entry(cal.local_hour(scan.scanned_at)).or_default();
        match scan.scan_type {
            ScanType::CheckIn => bucket.0 += 1,
            ScanType::CheckOut => bucket.1 += 1,
            _ => {}
        }
    }
    buckets
        .into_iter()
        .map(|(hour, (check_in_count, check_out_count))| HourlyActivity {
            hour,
            check_in_count,
            check_out_count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanTotals {
    pub total_scans: i64,
    pub total_check_ins: i64,
    pub total_check_outs: i64,
    pub unique_users: i64,
}

pub fn scan_totals(scans: &[ScanFact]) -> ScanTotals {
    let all: Vec<&ScanFact> = scans.iter().collect();
    ScanTotals {
        total_scans: all.len() as i64,
        total_check_ins: count_type(&all, ScanType::CheckIn),
        total_check_outs: count_type(&all, ScanType::CheckOut),
        unique_users: distinct_users(&all),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scan(user_id: DbId, day: u32, hour: u32, scan_type: ScanType) -> ScanFact {
        ScanFact {
            user_id,
            project_id: Some(user_id % 2 + 1),
            scanned_at: Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap(),
            scan_type,
        }
    }

    fn project(start: Date, status: ProjectStatus, budget: f64, spent: f64) -> ProjectSummary {
        ProjectSummary {
            id: 1,
            name: "Tower".into(),
            company_id: 1,
            company_name: None,
            status: Some(status),
            progress: 0.0,
            budget: Some(budget),
            spent_amount: Some(spent),
            start_date: start,
            end_date: None,
            planned_end_date: None,
        }
    }

    fn sample_week() -> Vec<ScanFact> {
        vec![
            scan(1, 9, 8, ScanType::CheckIn),
            scan(2, 9, 9, ScanType::CheckIn),
            scan(1, 9, 17, ScanType::CheckOut),
            scan(1, 10, 8, ScanType::CheckIn),
            scan(1, 10, 12, ScanType::CheckIn),
            scan(3, 12, 7, ScanType::MaterialScan),
            scan(2, 15, 8, ScanType::CheckIn),
            // Outside the week of 2025-03-09.
            scan(4, 16, 8, ScanType::CheckIn),
        ]
    }

    #[test]
    fn ratio_floors_denominator() {
        assert_eq!(ratio(16.0, 0.0), 16.0);
        assert_eq!(ratio(16.0, 4.0), 4.0);
        assert_eq!(percentage(25.0, 0.0), 0.0);
        assert_eq!(percentage(25.0, 50.0), 50.0);
        assert_eq!(working_hours(3), 24.0);
    }

    #[test]
    fn daily_rollup_counts_one_day() {
        let cal = SiteCalendar::utc();
        let day = daily_rollup(date(2025, 3, 9), &sample_week(), &cal);
        assert_eq!(day.total_check_ins, 2);
        assert_eq!(day.total_check_outs, 1);
        assert_eq!(day.active_users, 2);
        assert_eq!(day.active_projects, 2);
    }

    #[test]
    fn daily_rollup_counts_non_presence_scans_as_activity() {
        let cal = SiteCalendar::utc();
        let day = daily_rollup(date(2025, 3, 12), &sample_week(), &cal);
        assert_eq!(day.total_check_ins, 0);
        assert_eq!(day.active_users, 1);
    }

    #[test]
    fn weekly_total_is_sum_of_daily_totals() {
        let cal = SiteCalendar::utc();
        let scans = sample_week();
        let start = date(2025, 3, 9);
        let report = weekly_report(start, &scans, &cal, 3);

        let daily_sum: i64 = calendar::dates_between(start, start + Days::new(7))
            .map(|d| daily_rollup(d, &scans, &cal).total_check_ins)
            .sum();
        assert_eq!(report.summary.total_check_ins, daily_sum);
        assert_eq!(report.summary.total_check_ins, 5);
        assert_eq!(report.daily_stats.len(), 7);
        assert_eq!(report.week_end, date(2025, 3, 15));
    }

    #[test]
    fn weekly_active_users_is_max_not_sum() {
        let cal = SiteCalendar::utc();
        let report = weekly_report(date(2025, 3, 9), &sample_week(), &cal, 3);
        assert_eq!(report.summary.total_active_users, 2);
        assert_eq!(report.summary.total_work_days, 3);
        assert_eq!(report.summary.total_active_projects, 3);
        // 5 check-ins * 8h over 2 + 1 + 1 + 1 user-days.
        assert_eq!(report.summary.average_working_hours, 40.0 / 5.0);
    }

    #[test]
    fn empty_week_has_zero_average() {
        let cal = SiteCalendar::utc();
        let report = weekly_report(date(2025, 1, 5), &[], &cal, 0);
        assert_eq!(report.summary.total_check_ins, 0);
        assert_eq!(report.summary.average_working_hours, 0.0);
        assert_eq!(report.summary.total_work_days, 0);
    }

    #[test]
    fn monthly_report_slices_and_money() {
        let cal = SiteCalendar::utc();
        let mut done = project(date(2025, 2, 1), ProjectStatus::Completed, 10.0, 10.0);
        done.end_date = Some(date(2025, 3, 20));
        let projects = vec![
            project(date(2025, 3, 3), ProjectStatus::Active, 1000.0, 250.0),
            project(date(2025, 3, 28), ProjectStatus::Planning, 500.0, 0.0),
            project(date(2025, 4, 1), ProjectStatus::Active, 9999.0, 9999.0),
            done,
        ];
        let report = monthly_report(2025, 3, &sample_week(), &projects, 2, &cal).unwrap();

        assert_eq!(report.month_name, "March");
        assert_eq!(report.summary.total_work_days, 31);
        assert_eq!(report.summary.total_check_ins, 6);
        assert_eq!(report.summary.total_active_users, 4);
        assert_eq!(report.summary.total_revenue, 1500.0);
        assert_eq!(report.summary.total_expenses, 250.0);
        assert_eq!(report.summary.projects_completed, 1);
        assert_eq!(report.weekly_breakdown.len(), 5);

        let weekly_sum: i64 = report.weekly_breakdown.iter().map(|w| w.total_check_ins).sum();
        assert_eq!(weekly_sum, report.summary.total_check_ins);
    }

    #[test]
    fn monthly_report_rejects_bad_month() {
        let cal = SiteCalendar::utc();
        assert!(monthly_report(2025, 13, &[], &[], 0, &cal).is_err());
    }

    #[test]
    fn dashboard_week_covers_eight_days() {
        let cal = SiteCalendar::utc();
        let stats = dashboard_weekly_stats(date(2025, 3, 16), &sample_week(), &cal, 12, 4);
        assert_eq!(stats.days.len(), 8);
        assert_eq!(stats.days[0].date, date(2025, 3, 9));
        assert_eq!(stats.days[7].date, date(2025, 3, 16));
        assert_eq!(stats.days[0].check_in_count, 2);
        assert_eq!(stats.days[1].active_users, 1);
        assert_eq!(stats.total_check_ins, 6);
        assert_eq!(stats.total_users, 12);
        assert_eq!(stats.active_projects, 4);
    }

    #[test]
    fn dashboard_active_users_count_every_scan_type() {
        let cal = SiteCalendar::utc();
        let scans = vec![
            scan(1, 16, 8, ScanType::CheckIn),
            scan(2, 16, 17, ScanType::CheckOut),
            scan(3, 16, 11, ScanType::MaterialScan),
        ];
        let stats = dashboard_weekly_stats(date(2025, 3, 16), &scans, &cal, 3, 1);
        let last = stats.days.last().unwrap();

        assert_eq!(last.check_in_count, 1);
        assert_eq!(last.active_users, 3);
        assert_eq!(
            last.active_users,
            daily_rollup(date(2025, 3, 16), &scans, &cal).active_users
        );
    }

    #[test]
    fn dashboard_stats_carry_fixed_trends() {
        let stats = DashboardStats::from_counts(1, 2, 3, 4);
        assert_eq!(stats.project_trend, "+2");
        assert_eq!(stats.check_in_trend, "+12%");
        assert_eq!(stats.task_trend, "-3");
    }

    #[test]
    fn hourly_histogram_orders_hours() {
        let cal = SiteCalendar::utc();
        let histogram = hourly_histogram(&sample_week(), &cal);
        let hours: Vec<u32> = histogram.iter().map(|h| h.hour).collect();
        assert_eq!(hours, vec![7, 8, 9, 12, 17]);
        assert_eq!(histogram[1].check_in_count, 4);
        assert_eq!(histogram[0].check_in_count, 0);
        assert_eq!(histogram[4].check_out_count, 1);
    }

    #[test]
    fn hourly_histogram_uses_site_offset() {
        let cal = SiteCalendar::from_offset_minutes(120).unwrap();
        let histogram = hourly_histogram(&[scan(1, 9, 8, ScanType::CheckIn)], &cal);
        assert_eq!(histogram[0].hour, 10);
    }

    #[test]
    fn totals_over_scans() {
        let totals = scan_totals(&sample_week());
        assert_eq!(totals.total_scans, 8);
        assert_eq!(totals.total_check_ins, 6);
        assert_eq!(totals.total_check_outs, 1);
        assert_eq!(totals.unique_users, 4);
    }
}
