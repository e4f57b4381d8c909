//! Check-in / check-out presence inferred from the scan history.
//!
//! There is no presence table. Whether a user is on site is recomputed from
//! the append-only scan stream every time it is asked, scoped to a single
//! site-local day and optionally to one project.

use serde::Serialize;

use crate::calendar::DayWindow;
use crate::status::ScanType;
use crate::types::{DbId, Timestamp};

/// The scan fields presence inference needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceScan {
    pub scanned_at: Timestamp,
    pub scan_type: ScanType,
    pub project_id: Option<DbId>,
}

/// Derived presence of one user within one day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PresenceState {
    /// No check-in inside the window.
    NotCheckedIn,
    /// Latest check-in has no check-out at or after it.
    CheckedIn { since: Timestamp },
    /// A check-out at or after the latest check-in closes the interval.
    CheckedOut { at: Timestamp },
}

impl PresenceState {
    pub fn is_checked_in(&self) -> bool {
        matches!(self, Self::CheckedIn { .. })
    }
}

/// Infer presence from `scans`.
///
/// Only scans inside `window` (and on `project_id` when given) count. A
/// check-out sharing the exact timestamp of the latest check-in closes it.
pub fn presence_state(
    scans: &[PresenceScan],
    window: &DayWindow,
    project_id: Option<DbId>,
) -> PresenceState {
    let in_scope = |scan: &&PresenceScan| {
        window.contains(scan.scanned_at)
            && project_id.map_or(true, |p| scan.project_id == Some(p))
    };

    let last_check_in = scans
        .iter()
        .filter(in_scope)
        .filter(|s| s.scan_type == ScanType::CheckIn)
        .map(|s| s.scanned_at)
        .max();

    let Some(since) = last_check_in else {
        return PresenceState::NotCheckedIn;
    };

    let closing_check_out = scans
        .iter()
        .filter(in_scope)
        .filter(|s| s.scan_type == ScanType::CheckOut && s.scanned_at >= since)
        .map(|s| s.scanned_at)
        .max();

    match closing_check_out {
        Some(at) => PresenceState::CheckedOut { at },
        None => PresenceState::CheckedIn { since },
    }
}

/// Boolean projection of [`presence_state`].
pub fn is_checked_in(scans: &[PresenceScan], window: &DayWindow, project_id: Option<DbId>) -> bool {
    presence_state(scans, window, project_id).is_checked_in()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::calendar::SiteCalendar;

    fn today_window() -> DayWindow {
        SiteCalendar::utc().day_window(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
    }

    fn at(day: u32, h: u32, m: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 6, day, h, m, 0).unwrap()
    }

    fn scan(ts: Timestamp, scan_type: ScanType) -> PresenceScan {
        PresenceScan {
            scanned_at: ts,
            scan_type,
            project_id: None,
        }
    }

    #[test]
    fn no_scans_means_not_checked_in() {
        assert_eq!(
            presence_state(&[], &today_window(), None),
            PresenceState::NotCheckedIn
        );
    }

    #[test]
    fn check_in_makes_user_present() {
        let scans = [scan(at(2, 8, 0), ScanType::CheckIn)];
        assert!(is_checked_in(&scans, &today_window(), None));
    }

    #[test]
    fn later_check_out_ends_presence() {
        let scans = [
            scan(at(2, 8, 0), ScanType::CheckIn),
            scan(at(2, 12, 0), ScanType::CheckOut),
        ];
        assert_eq!(
            presence_state(&scans, &today_window(), None),
            PresenceState::CheckedOut { at: at(2, 12, 0) }
        );
    }

    #[test]
    fn second_check_in_after_check_out_is_present() {
        let scans = [
            scan(at(2, 8, 0), ScanType::CheckIn),
            scan(at(2, 12, 0), ScanType::CheckOut),
            scan(at(2, 13, 0), ScanType::CheckIn),
        ];
        assert_eq!(
            presence_state(&scans, &today_window(), None),
            PresenceState::CheckedIn { since: at(2, 13, 0) }
        );
    }

    #[test]
    fn yesterdays_open_check_in_does_not_carry_over() {
        let scans = [scan(at(1, 23, 59), ScanType::CheckIn)];
        assert!(!is_checked_in(&scans, &today_window(), None));
    }

    #[test]
    fn check_out_wins_a_timestamp_tie() {
        let scans = [
            scan(at(2, 9, 0), ScanType::CheckOut),
            scan(at(2, 9, 0), ScanType::CheckIn),
        ];
        assert!(!is_checked_in(&scans, &today_window(), None));
    }

    #[test]
    fn check_out_before_check_in_is_ignored() {
        let scans = [
            scan(at(2, 7, 0), ScanType::CheckOut),
            scan(at(2, 8, 0), ScanType::CheckIn),
        ];
        assert!(is_checked_in(&scans, &today_window(), None));
    }

    #[test]
    fn repeated_check_ins_only_latest_matters() {
        let scans = [
            scan(at(2, 8, 0), ScanType::CheckIn),
            scan(at(2, 9, 0), ScanType::CheckIn),
            scan(at(2, 8, 30), ScanType::CheckOut),
        ];
        assert!(is_checked_in(&scans, &today_window(), None));
    }

    #[test]
    fn other_scan_types_are_ignored() {
        let scans = [
            scan(at(2, 8, 0), ScanType::CheckIn),
            scan(at(2, 10, 0), ScanType::MaterialScan),
            scan(at(2, 11, 0), ScanType::EquipmentScan),
        ];
        assert!(is_checked_in(&scans, &today_window(), None));
    }

    #[test]
    fn project_scope_filters_scans() {
        let scans = [
            PresenceScan {
                scanned_at: at(2, 8, 0),
                scan_type: ScanType::CheckIn,
                project_id: Some(1),
            },
            PresenceScan {
                scanned_at: at(2, 9, 0),
                scan_type: ScanType::CheckOut,
                project_id: Some(2),
            },
        ];
        assert!(is_checked_in(&scans, &today_window(), Some(1)));
        assert!(!is_checked_in(&scans, &today_window(), Some(2)));
        // Unscoped: the project-2 check-out closes the project-1 check-in.
        assert!(!is_checked_in(&scans, &today_window(), None));
    }
}
