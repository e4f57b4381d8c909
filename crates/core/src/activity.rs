//! Activity log presentation: icons, colours and relative timestamps.

use serde::Serialize;

use crate::status::{ActivityPriority, ActivityType, StatusId};
use crate::types::Timestamp;

/// Icon used for activity types without an entry in [`ACTIVITY_ICONS`].
pub const DEFAULT_ACTIVITY_ICON: &str = "information";

/// Colour used for priorities without an entry in [`PRIORITY_COLORS`].
pub const DEFAULT_PRIORITY_COLOR: &str = "#2196F3";

/// Material Design icon name per activity type.
pub const ACTIVITY_ICONS: &[(ActivityType, &str)] = &[
    (ActivityType::UserLogin, "account-check"),
    (ActivityType::UserLogout, "account-minus"),
    (ActivityType::ProjectCreated, "file-plus"),
    (ActivityType::ProjectUpdated, "file-edit"),
    (ActivityType::ProjectCompleted, "check-circle"),
    (ActivityType::QrCodeScanned, "qrcode-scan"),
    (ActivityType::ReportGenerated, "chart-line"),
    (ActivityType::MaterialAdded, "package-variant"),
    (ActivityType::MaterialUsed, "package-variant-closed"),
    (ActivityType::PersonnelAssigned, "account-plus"),
    (ActivityType::PersonnelRemoved, "account-minus"),
];

/// Hex colour per priority.
pub const PRIORITY_COLORS: &[(ActivityPriority, &str)] = &[
    (ActivityPriority::Low, "#4CAF50"),
    (ActivityPriority::Normal, "#2196F3"),
    (ActivityPriority::High, "#FF9800"),
    (ActivityPriority::Critical, "#F44336"),
];

pub fn activity_icon(activity_type: Option<ActivityType>) -> &'static str {
    activity_type
        .and_then(|t| ACTIVITY_ICONS.iter().find(|(k, _)| *k == t))
        .map_or(DEFAULT_ACTIVITY_ICON, |(_, icon)| *icon)
}

pub fn priority_color(priority: Option<ActivityPriority>) -> &'static str {
    priority
        .and_then(|p| PRIORITY_COLORS.iter().find(|(k, _)| *k == p))
        .map_or(DEFAULT_PRIORITY_COLOR, |(_, color)| *color)
}

/// Display attributes derived from an activity row's raw ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityPresentation {
    pub type_name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub time_ago: String,
}

impl ActivityPresentation {
    pub fn new(
        activity_type_id: StatusId,
        priority_id: StatusId,
        activity_at: Timestamp,
        now: Timestamp,
    ) -> Self {
        let activity_type = ActivityType::from_id(activity_type_id);
        let priority = ActivityPriority::from_id(priority_id);
        Self {
            type_name: activity_type.unwrap_or(ActivityType::Other).label(),
            icon: activity_icon(activity_type),
            color: priority_color(priority),
            time_ago: time_ago(activity_at, now),
        }
    }
}

/// Render `then` relative to `now`.
///
/// Anything older than a week falls back to an absolute `dd.MM.yyyy` date.
pub fn time_ago(then: Timestamp, now: Timestamp) -> String {
    let elapsed = now - then;
    if elapsed.num_minutes() < 1 {
        "just now".to_string()
    } else if elapsed.num_hours() < 1 {
        plural(elapsed.num_minutes(), "minute")
    } else if elapsed.num_days() < 1 {
        plural(elapsed.num_hours(), "hour")
    } else if elapsed.num_days() < 7 {
        plural(elapsed.num_days(), "day")
    } else {
        then.format("%d.%m.%Y").to_string()
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    #[test]
    fn every_non_other_activity_type_has_an_icon() {
        for kind in ActivityType::ALL.iter().filter(|k| **k != ActivityType::Other) {
            assert!(
                ACTIVITY_ICONS.iter().any(|(k, _)| k == kind),
                "missing icon for {kind:?}"
            );
        }
    }

    #[test]
    fn unknown_type_falls_back_to_information() {
        assert_eq!(activity_icon(Some(ActivityType::Other)), "information");
        assert_eq!(activity_icon(None), "information");
        assert_eq!(activity_icon(Some(ActivityType::QrCodeScanned)), "qrcode-scan");
    }

    #[test]
    fn priority_colours() {
        assert_eq!(priority_color(Some(ActivityPriority::Critical)), "#F44336");
        assert_eq!(priority_color(Some(ActivityPriority::Low)), "#4CAF50");
        assert_eq!(priority_color(None), DEFAULT_PRIORITY_COLOR);
    }

    #[test]
    fn time_ago_thresholds() {
        let now = Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap();
        assert_eq!(time_ago(now - Duration::seconds(30), now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(time_ago(now - Duration::minutes(59), now), "59 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(time_ago(now - Duration::days(6), now), "6 days ago");
        assert_eq!(time_ago(now - Duration::days(8), now), "12.05.2025");
    }

    #[test]
    fn presentation_from_raw_ids() {
        let now = Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap();
        let p = ActivityPresentation::new(3, 3, now - Duration::hours(2), now);
        assert_eq!(p.type_name, "Project Created");
        assert_eq!(p.icon, "file-plus");
        assert_eq!(p.color, "#FF9800");
        assert_eq!(p.time_ago, "2 hours ago");
    }
}
