//! Calendar-month windows for ledger aggregation.
//!
//! A window spans one calendar month, inclusive on both ends: day 1
//! 00:00:00 through the last day 23:59:59, evaluated in the aggregator's
//! reference offset. Records carry their own offsets; containment compares
//! instants, so a record written in another timezone lands in the right
//! month for the reference the user views the app in.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Utc};

/// An inclusive calendar-month date range used to scope aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    year: i32,
    month: u32,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl MonthWindow {
    /// Build the window for a given month in the given reference offset.
    pub fn for_month(year: i32, month: u32, offset: FixedOffset) -> Result<Self> {
        let last_day = days_in_month(year, month)
            .ok_or_else(|| anyhow!("Invalid month {}/{}", month, year))?;

        let start = offset
            .with_ymd_and_hms(year, month, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| anyhow!("Invalid window start {}/{}", month, year))?;
        let end = offset
            .with_ymd_and_hms(year, month, last_day, 23, 59, 59)
            .single()
            .ok_or_else(|| anyhow!("Invalid window end {}/{}", month, year))?;

        Ok(MonthWindow { year, month, start, end })
    }

    /// The window containing the present instant in the given offset.
    pub fn current(offset: FixedOffset) -> Self {
        let now = Utc::now().with_timezone(&offset);
        // Construction from a real clock date cannot fail.
        MonthWindow::for_month(now.year(), now.month(), offset)
            .expect("current month is always a valid window")
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    /// Inclusive containment on both boundaries.
    pub fn contains(&self, instant: &DateTime<FixedOffset>) -> bool {
        self.start <= *instant && *instant <= self.end
    }
}

/// Number of days in a month, `None` for an out-of-range month number.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next_month.signed_duration_since(first).num_days() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    fn at(s: &str) -> DateTime<FixedOffset> {
        s.parse().unwrap()
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let window = MonthWindow::for_month(2024, 3, offset()).unwrap();
        assert!(window.contains(&at("2024-03-01T00:00:00-03:00")));
        assert!(window.contains(&at("2024-03-31T23:59:59-03:00")));
    }

    #[test]
    fn one_second_before_the_window_is_excluded() {
        let window = MonthWindow::for_month(2024, 3, offset()).unwrap();
        assert!(!window.contains(&at("2024-02-29T23:59:59-03:00")));
        assert!(!window.contains(&at("2024-04-01T00:00:00-03:00")));
    }

    #[test]
    fn containment_compares_instants_across_offsets() {
        let window = MonthWindow::for_month(2024, 3, offset()).unwrap();
        // 02:59 UTC on Apr 1 is still 23:59 Mar 31 in the reference offset.
        assert!(window.contains(&at("2024-04-01T02:59:59+00:00")));
        assert!(!window.contains(&at("2024-04-01T03:00:00+00:00")));
    }

    #[test]
    fn knows_month_lengths_and_leap_years() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2025, 2), Some(28));
        assert_eq!(days_in_month(2024, 4), Some(30));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn invalid_month_is_an_error() {
        assert!(MonthWindow::for_month(2024, 0, offset()).is_err());
        assert!(MonthWindow::for_month(2024, 13, offset()).is_err());
    }
}
