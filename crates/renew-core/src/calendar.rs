//! Calendar primitives
//!
//! Pure date arithmetic on local calendar dates. Nothing here knows about
//! timezones; a `NaiveDate` is the day the user sees on their calendar.

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single calendar month, used as the query window for occurrences.
///
/// `month0` is zero-based (January = 0) to match how month pickers index
/// months; use [`MonthRef::number`] for the one-based form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthRef {
    pub year: i32,
    pub month0: u32,
}

impl MonthRef {
    /// Build a month window, wrapping out-of-range indices into the
    /// neighbouring years (`-1` is December of the previous year, `12` is
    /// January of the next).
    pub fn new(year: i32, month_index: i32) -> Self {
        Self {
            year: year + month_index.div_euclid(12),
            month0: month_index.rem_euclid(12) as u32,
        }
    }

    /// Build from a one-based month number (1 = January). Returns `None`
    /// outside `1..=12`.
    pub fn from_number(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self {
                year,
                month0: month - 1,
            })
        } else {
            None
        }
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    /// One-based month number.
    pub fn number(&self) -> u32 {
        self.month0 + 1
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.number(), 1)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.next().first_day().and_then(|d| d.pred_opt())
    }

    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year, self.number())
    }

    /// Inclusive `[first_day, last_day]` bounds.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.first_day()?, self.last_day()?))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    pub fn next(&self) -> Self {
        Self::new(self.year, self.month0 as i32 + 1)
    }

    pub fn prev(&self) -> Self {
        Self::new(self.year, self.month0 as i32 - 1)
    }

    /// Human label, e.g. "July 2024".
    pub fn label(&self) -> String {
        match self.first_day() {
            Some(d) => d.format("%B %Y").to_string(),
            None => format!("{}-{:02}", self.year, self.number()),
        }
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.number())
    }
}

/// Number of days in a month (`month` is one-based).
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// Step a date forward by `days`. `None` past the representable range.
pub fn add_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}

/// Step a date forward by `months`, clamping the day-of-month to the last
/// valid day of the target month (Jan 31 + 1 month = Feb 28/29).
pub fn add_months_clamped(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Whole calendar-month difference between two dates, ignoring the day.
///
/// `months_between(2024-01-31, 2024-02-01) == 1`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 - from.year() as i64) * 12 + (to.month0() as i64 - from.month0() as i64)
}

/// Sortable key identifying a calendar day (`YYYY-MM-DD`).
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_ref_wraps_index() {
        assert_eq!(MonthRef::new(2024, 12), MonthRef { year: 2025, month0: 0 });
        assert_eq!(MonthRef::new(2024, -1), MonthRef { year: 2023, month0: 11 });
        assert_eq!(MonthRef::new(2024, 25), MonthRef { year: 2026, month0: 1 });
        assert_eq!(MonthRef::new(2024, 6).number(), 7);
    }

    #[test]
    fn test_month_bounds() {
        let feb = MonthRef::new(2024, 1);
        assert_eq!(feb.first_day(), Some(ymd(2024, 2, 1)));
        assert_eq!(feb.last_day(), Some(ymd(2024, 2, 29)));
        assert_eq!(feb.days_in_month(), 29);

        let dec = MonthRef::new(2023, 11);
        assert_eq!(dec.last_day(), Some(ymd(2023, 12, 31)));
        assert_eq!(dec.next(), MonthRef::new(2024, 0));
        assert_eq!(MonthRef::new(2024, 0).prev(), dec);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
    }

    #[test]
    fn test_add_months_clamps_day() {
        let jan31 = ymd(2024, 1, 31);
        assert_eq!(add_months_clamped(jan31, 1), Some(ymd(2024, 2, 29)));
        assert_eq!(add_months_clamped(jan31, 3), Some(ymd(2024, 4, 30)));
        assert_eq!(add_months_clamped(ymd(2023, 1, 31), 1), Some(ymd(2023, 2, 28)));
        assert_eq!(add_months_clamped(jan31, 12), Some(ymd(2025, 1, 31)));
        assert_eq!(add_months_clamped(jan31, 0), Some(jan31));
    }

    #[test]
    fn test_months_between_ignores_days() {
        assert_eq!(months_between(ymd(2024, 1, 31), ymd(2024, 2, 1)), 1);
        assert_eq!(months_between(ymd(2023, 11, 5), ymd(2024, 2, 1)), 3);
        assert_eq!(months_between(ymd(2024, 5, 1), ymd(2024, 2, 28)), -3);
        assert_eq!(months_between(ymd(2024, 5, 1), ymd(2024, 5, 31)), 0);
    }

    #[test]
    fn test_add_days() {
        assert_eq!(add_days(ymd(2024, 2, 28), 1), Some(ymd(2024, 2, 29)));
        assert_eq!(add_days(ymd(2024, 12, 31), 1), Some(ymd(2025, 1, 1)));
    }

    #[test]
    fn test_date_key_sorts_chronologically() {
        let mut keys = vec![
            date_key(ymd(2024, 10, 2)),
            date_key(ymd(2024, 9, 30)),
            date_key(ymd(2023, 12, 31)),
        ];
        keys.sort();
        assert_eq!(keys, vec!["2023-12-31", "2024-09-30", "2024-10-02"]);
    }

    #[test]
    fn test_month_label() {
        assert_eq!(MonthRef::new(2024, 6).label(), "July 2024");
        assert_eq!(MonthRef::new(2024, 6).to_string(), "2024-07");
        assert!(MonthRef::new(2024, 6).contains(ymd(2024, 7, 31)));
        assert!(!MonthRef::new(2024, 6).contains(ymd(2024, 8, 1)));
    }
}
