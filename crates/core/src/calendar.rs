//! Site-local calendar arithmetic.
//!
//! Timestamps are stored in UTC, but "today", day boundaries, weekday names
//! and hour-of-day buckets follow the construction site's local clock. The
//! site clock is a fixed UTC offset configured at startup.

use std::ops::RangeInclusive;

use chrono::{
    Datelike, Days, FixedOffset, NaiveDate, NaiveTime, Offset, TimeDelta, TimeZone, Timelike, Utc,
};

use crate::error::CoreError;
use crate::types::{Date, Timestamp};

/// Days in one reporting week.
pub const DAYS_PER_WEEK: u64 = 7;

/// Years accepted in client-supplied dates. Day arithmetic near the
/// `NaiveDate` limits would overflow.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1900..=9999;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

/// Half-open UTC interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DayWindow {
    pub fn contains(&self, ts: Timestamp) -> bool {
        ts >= self.start && ts < self.end
    }
}

// ---------------------------------------------------------------------------
// Site calendar
// ---------------------------------------------------------------------------

/// Converts between UTC instants and site-local calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteCalendar {
    offset: FixedOffset,
}

impl Default for SiteCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl SiteCalendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Build a calendar from an offset in minutes east of UTC.
    pub fn from_offset_minutes(minutes: i32) -> Result<Self, CoreError> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
            .ok_or_else(|| {
                CoreError::Validation(format!("UTC offset of {minutes} minutes is out of range"))
            })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The site-local date an instant falls on.
    pub fn local_date(&self, ts: Timestamp) -> Date {
        ts.with_timezone(&self.offset).date_naive()
    }

    /// The site-local hour (0-23) an instant falls in.
    pub fn local_hour(&self, ts: Timestamp) -> u32 {
        ts.with_timezone(&self.offset).hour()
    }

    pub fn today(&self, now: Timestamp) -> Date {
        self.local_date(now)
    }

    /// UTC instant of local midnight at the start of `date`.
    pub fn start_of_day(&self, date: Date) -> Timestamp {
        let local_midnight = date.and_time(NaiveTime::MIN);
        let utc = local_midnight - TimeDelta::seconds(i64::from(self.offset.local_minus_utc()));
        Utc.from_utc_datetime(&utc)
    }

    /// The full local day containing `date`.
    pub fn day_window(&self, date: Date) -> DayWindow {
        self.range_window(date, date + Days::new(1))
    }

    /// Local days `[from, to_exclusive)`.
    pub fn range_window(&self, from: Date, to_exclusive: Date) -> DayWindow {
        DayWindow {
            start: self.start_of_day(from),
            end: self.start_of_day(to_exclusive),
        }
    }
}

// ---------------------------------------------------------------------------
// Date helpers
// ---------------------------------------------------------------------------

/// The Sunday on or before `date`.
pub fn week_start(date: Date) -> Date {
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}

/// Every date in `[from, to_exclusive)`.
pub fn dates_between(from: Date, to_exclusive: Date) -> impl Iterator<Item = Date> {
    from.iter_days().take_while(move |d| *d < to_exclusive)
}

/// English weekday name, e.g. `"Monday"`.
pub fn weekday_name(date: Date) -> String {
    date.format("%A").to_string()
}

/// English month name for a 1-based month number.
pub fn month_name(month: u32) -> Result<&'static str, CoreError> {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
        .ok_or_else(|| CoreError::Validation(format!("Month must be 1-12, got {month}")))
}

/// Reject dates outside [`SUPPORTED_YEARS`].
pub fn ensure_supported_date(date: Date) -> Result<Date, CoreError> {
    if SUPPORTED_YEARS.contains(&date.year()) {
        Ok(date)
    } else {
        Err(CoreError::Validation(format!(
            "Date {date} is out of range; years {}-{} are supported",
            SUPPORTED_YEARS.start(),
            SUPPORTED_YEARS.end()
        )))
    }
}

/// First day of the month and first day of the following month.
pub fn month_bounds(year: i32, month: u32) -> Result<(Date, Date), CoreError> {
    if !SUPPORTED_YEARS.contains(&year) {
        return Err(CoreError::Validation(format!("Year {year} is out of range")));
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CoreError::Validation(format!("Invalid month {year}-{month}")))?;
    let next = first
        .checked_add_months(chrono::Months::new(1))
        .ok_or_else(|| CoreError::Validation(format!("Invalid month {year}-{month}")))?;
    Ok((first, next))
}

/// Number of calendar days in a month.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, CoreError> {
    let (first, next) = month_bounds(year, month)?;
    Ok((next - first).num_days() as u32)
}

/// Split a month into consecutive 7-day slices starting on day 1.
///
/// Each slice is `(start, end_exclusive)`; the final slice is clipped to the
/// month end, so slices never overlap the following month.
pub fn month_slices(year: i32, month: u32) -> Result<Vec<(Date, Date)>, CoreError> {
    let (first, next) = month_bounds(year, month)?;
    let mut slices = Vec::new();
    let mut start = first;
    while start < next {
        let end = (start + Days::new(DAYS_PER_WEEK)).min(next);
        slices.push((start, end));
        start = end;
    }
    Ok(slices)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn utc_day_window_spans_midnight_to_midnight() {
        let cal = SiteCalendar::utc();
        let window = cal.day_window(date(2025, 3, 10));
        assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2025, 3, 11, 0, 0, 0).unwrap());
    }

    #[test]
    fn offset_shifts_day_window() {
        let cal = SiteCalendar::from_offset_minutes(180).unwrap();
        let window = cal.day_window(date(2025, 3, 10));
        assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 3, 9, 21, 0, 0).unwrap());
        assert!(window.contains(Utc.with_ymd_and_hms(2025, 3, 10, 20, 59, 59).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2025, 3, 10, 21, 0, 0).unwrap()));
    }

    #[test]
    fn local_date_and_hour_follow_offset() {
        let cal = SiteCalendar::from_offset_minutes(180).unwrap();
        let ts = Utc.with_ymd_and_hms(2025, 3, 9, 22, 30, 0).unwrap();
        assert_eq!(cal.local_date(ts), date(2025, 3, 10));
        assert_eq!(cal.local_hour(ts), 1);
    }

    #[test]
    fn offset_out_of_range_is_rejected() {
        assert_matches!(
            SiteCalendar::from_offset_minutes(24 * 60),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2025-03-12 is a Wednesday.
        assert_eq!(week_start(date(2025, 3, 12)), date(2025, 3, 9));
        assert_eq!(week_start(date(2025, 3, 9)), date(2025, 3, 9));
    }

    #[test]
    fn weekday_and_month_names() {
        assert_eq!(weekday_name(date(2025, 3, 9)), "Sunday");
        assert_eq!(month_name(2).unwrap(), "February");
        assert!(month_name(13).is_err());
        assert!(month_name(0).is_err());
    }

    #[test]
    fn february_has_four_full_slices() {
        let slices = month_slices(2025, 2).unwrap();
        assert_eq!(slices.len(), 4);
        assert_eq!(slices[3], (date(2025, 2, 22), date(2025, 3, 1)));
        assert_eq!(days_in_month(2025, 2).unwrap(), 28);
    }

    #[test]
    fn last_slice_is_clipped_to_month_end() {
        let slices = month_slices(2025, 1).unwrap();
        assert_eq!(slices.len(), 5);
        assert_eq!(slices[4], (date(2025, 1, 29), date(2025, 2, 1)));
    }

    #[test]
    fn dates_near_chrono_limits_are_rejected() {
        assert_matches!(ensure_supported_date(NaiveDate::MAX), Err(CoreError::Validation(_)));
        assert_matches!(ensure_supported_date(NaiveDate::MIN), Err(CoreError::Validation(_)));
        assert_matches!(
            ensure_supported_date("+262142-12-31".parse().unwrap()),
            Err(CoreError::Validation(_))
        );
        assert_eq!(ensure_supported_date(date(9999, 12, 31)).unwrap(), date(9999, 12, 31));
    }

    #[test]
    fn month_bounds_rejects_unsupported_years() {
        assert_matches!(month_bounds(262142, 12), Err(CoreError::Validation(_)));
        assert_matches!(month_bounds(i32::MIN, 1), Err(CoreError::Validation(_)));
        assert!(month_bounds(9999, 12).is_ok());
    }

    #[test]
    fn dates_between_is_half_open() {
        let days: Vec<_> = dates_between(date(2025, 1, 30), date(2025, 2, 2)).collect();
        assert_eq!(days, vec![date(2025, 1, 30), date(2025, 1, 31), date(2025, 2, 1)]);
    }
}
