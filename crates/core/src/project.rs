//! Project constants, progress clamping, schedule checks and validation.

use crate::error::CoreError;
use crate::status::ProjectStatus;
use crate::types::Date;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MIN_PROGRESS: f64 = 0.0;
pub const MAX_PROGRESS: f64 = 100.0;

/// Maximum length of a project name.
pub const MAX_PROJECT_NAME_LEN: usize = 200;

/// Assignment role given to users attached at project creation.
pub const DEFAULT_ASSIGNMENT_ROLE: &str = "Team Member";

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Clamp a progress percentage into `[0, 100]`. NaN becomes 0.
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        return MIN_PROGRESS;
    }
    progress.clamp(MIN_PROGRESS, MAX_PROGRESS)
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// Whether a project counts as delayed on `today`.
///
/// Explicitly `Delayed` projects always count; otherwise any project past
/// its planned end that is not completed.
pub fn is_delayed(status: Option<ProjectStatus>, planned_end: Option<Date>, today: Date) -> bool {
    if status == Some(ProjectStatus::Delayed) {
        return true;
    }
    status != Some(ProjectStatus::Completed) && planned_end.is_some_and(|end| end < today)
}

/// Whole days past the planned end, 0 if on schedule or completed.
pub fn days_overdue(status: Option<ProjectStatus>, planned_end: Option<Date>, today: Date) -> i64 {
    if status == Some(ProjectStatus::Completed) {
        return 0;
    }
    planned_end.map_or(0, |end| (today - end).num_days().max(0))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_project_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Project name is required".into()));
    }
    if trimmed.chars().count() > MAX_PROJECT_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Project name must be at most {MAX_PROJECT_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Planned and actual end dates may not precede the start date.
pub fn validate_project_dates(
    start: Date,
    planned_end: Option<Date>,
    end: Option<Date>,
) -> Result<(), CoreError> {
    for (label, value) in [("Planned end date", planned_end), ("End date", end)] {
        if value.is_some_and(|d| d < start) {
            return Err(CoreError::Validation(format!(
                "{label} cannot be before the start date"
            )));
        }
    }
    Ok(())
}

pub fn validate_money(label: &str, value: Option<f64>) -> Result<(), CoreError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(CoreError::Validation(format!(
            "{label} must be a non-negative number"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(clamp_progress(150.0), 100.0);
        assert_eq!(clamp_progress(-10.0), 0.0);
        assert_eq!(clamp_progress(42.5), 42.5);
        assert_eq!(clamp_progress(f64::NAN), 0.0);
    }

    #[test]
    fn explicit_delayed_status_counts() {
        assert!(is_delayed(Some(ProjectStatus::Delayed), None, date(2025, 1, 1)));
    }

    #[test]
    fn past_planned_end_counts_unless_completed() {
        let today = date(2025, 6, 1);
        let planned = Some(date(2025, 5, 1));
        assert!(is_delayed(Some(ProjectStatus::Active), planned, today));
        assert!(!is_delayed(Some(ProjectStatus::Completed), planned, today));
        assert!(!is_delayed(Some(ProjectStatus::Active), Some(today), today));
    }

    #[test]
    fn overdue_days() {
        let today = date(2025, 6, 11);
        assert_eq!(days_overdue(Some(ProjectStatus::Active), Some(date(2025, 6, 1)), today), 10);
        assert_eq!(days_overdue(Some(ProjectStatus::Active), Some(date(2025, 7, 1)), today), 0);
        assert_eq!(days_overdue(Some(ProjectStatus::Completed), Some(date(2025, 6, 1)), today), 0);
        assert_eq!(days_overdue(Some(ProjectStatus::Active), None, today), 0);
    }

    #[test]
    fn name_validation() {
        assert!(validate_project_name("Bridge").is_ok());
        assert_matches!(validate_project_name("  "), Err(CoreError::Validation(_)));
        assert_matches!(
            validate_project_name(&"x".repeat(MAX_PROJECT_NAME_LEN + 1)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn end_dates_cannot_precede_start() {
        let start = date(2025, 3, 1);
        assert!(validate_project_dates(start, Some(date(2025, 9, 1)), None).is_ok());
        assert_matches!(
            validate_project_dates(start, Some(date(2025, 2, 1)), None),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_project_dates(start, None, Some(date(2025, 1, 1))),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn money_must_be_non_negative() {
        assert!(validate_money("Budget", None).is_ok());
        assert!(validate_money("Budget", Some(0.0)).is_ok());
        assert!(validate_money("Budget", Some(-1.0)).is_err());
        assert!(validate_money("Budget", Some(f64::INFINITY)).is_err());
    }
}
