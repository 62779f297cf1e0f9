//! Week-bucket date utilities for the timeline grid.
//!
//! All functions here are pure and total over valid dates. Week boundaries are
//! Sunday-start and computed against a caller-supplied "today", so callers in
//! different time zones can disagree on which column is current. That mirrors
//! the viewer-local behaviour the grid is specified with; there is no
//! canonical server-side "now".

use chrono::{Datelike, Duration, Local, NaiveDate};

/// Format a date as abbreviated month + unpadded day ("Jan 5") for column headers.
pub fn format_header(date: NaiveDate) -> String {
    format!("{} {}", date.format("%b"), date.day())
}

/// The most recent Sunday at or before `today`.
pub fn start_of_week(today: NaiveDate) -> NaiveDate {
    let offset = today.weekday().num_days_from_sunday() as i64;
    today - Duration::days(offset)
}

/// True iff `date` falls within the week containing `today`,
/// i.e. `[start_of_week, start_of_week + 7 days)`.
pub fn is_current_week(date: NaiveDate, today: NaiveDate) -> bool {
    let start = start_of_week(today);
    date >= start && date < start + Duration::days(7)
}

/// True iff `date` falls strictly before the week containing `today`.
/// Mutually exclusive with [`is_current_week`] for every date.
pub fn is_past_week(date: NaiveDate, today: NaiveDate) -> bool {
    date < start_of_week(today)
}

/// [`is_current_week`] against the local wall clock.
pub fn current_week(date: NaiveDate) -> bool {
    is_current_week(date, Local::now().date_naive())
}

/// [`is_past_week`] against the local wall clock.
pub fn past_week(date: NaiveDate) -> bool {
    is_past_week(date, Local::now().date_naive())
}

/// Build the contiguous ascending week-date axis around the week containing
/// `today`: `weeks_back` weeks before it through `weeks_forward` weeks after.
/// The grid itself never computes an axis; hosts build one here and pass it in.
pub fn week_axis(today: NaiveDate, weeks_back: u32, weeks_forward: u32) -> Vec<NaiveDate> {
    let first = start_of_week(today) - Duration::weeks(weeks_back as i64);
    (0..=(weeks_back + weeks_forward) as i64)
        .map(|i| first + Duration::weeks(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_format_header() {
        assert_eq!(format_header(d("2024-01-05")), "Jan 5");
        assert_eq!(format_header(d("2024-12-25")), "Dec 25");
    }

    #[test]
    fn test_start_of_week_is_sunday() {
        // 2024-01-10 is a Wednesday; the preceding Sunday is 2024-01-07.
        assert_eq!(start_of_week(d("2024-01-10")), d("2024-01-07"));
        // A Sunday is its own week start.
        assert_eq!(start_of_week(d("2024-01-07")), d("2024-01-07"));
    }

    #[test]
    fn test_current_week_bounds() {
        let today = d("2024-01-10");
        assert!(is_current_week(d("2024-01-07"), today));
        assert!(is_current_week(d("2024-01-13"), today));
        assert!(!is_current_week(d("2024-01-14"), today));
        assert!(!is_current_week(d("2024-01-06"), today));
    }

    #[test]
    fn test_current_and_past_are_mutually_exclusive() {
        let today = d("2024-01-10");
        // Sweep a wide window; exactly one of current/past/future holds.
        for offset in -30i64..30 {
            let date = today + Duration::days(offset);
            let current = is_current_week(date, today);
            let past = is_past_week(date, today);
            assert!(!(current && past), "{date} classified both current and past");
            let future = !current && !past;
            assert_eq!(
                [current, past, future].iter().filter(|&&b| b).count(),
                1,
                "{date} must fall in exactly one bucket"
            );
        }
    }

    #[test]
    fn test_week_axis_contiguous_ascending() {
        let axis = week_axis(d("2024-01-10"), 2, 3);
        assert_eq!(axis.len(), 6);
        assert_eq!(axis[0], d("2023-12-24"));
        assert_eq!(axis[2], d("2024-01-07")); // current week start
        for pair in axis.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::weeks(1));
        }
    }
}
