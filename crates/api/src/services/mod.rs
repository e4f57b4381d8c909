//! Application services.
//!
//! Every function takes the pool and the caller's [`CallerContext`] and
//! applies company scoping before touching the repositories. Mutations that
//! leave an activity-log entry write both rows in one transaction.
//!
//! [`CallerContext`]: sitetrack_core::caller::CallerContext

pub mod activity_logs;
pub mod auth;
pub mod companies;
pub mod dashboard;
pub mod personnel;
pub mod projects;
pub mod reports;
pub mod scans;
pub mod tasks;

use chrono::Utc;
use sitetrack_core::calendar::SiteCalendar;
use sitetrack_core::types::Date;

/// Site-local date right now.
pub(crate) fn today(cal: &SiteCalendar) -> Date {
    cal.today(Utc::now())
}
