//! Calendar parts of `date_added` and content age.

use chrono::{Datelike, NaiveDate};

/// Content younger than this many years is recent.
pub const RECENT_AGE_YEARS: i64 = 3;

/// Calendar parts of one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParts {
    pub year: i64,
    pub month: i64,
    pub month_name: String,
    pub quarter: i64,
    pub day_of_week: String,
}

impl DateParts {
    pub fn of(date: NaiveDate) -> Self {
        let month = i64::from(date.month());
        Self {
            year: i64::from(date.year()),
            month,
            month_name: date.format("%B").to_string(),
            quarter: (month - 1) / 3 + 1,
            day_of_week: date.format("%A").to_string(),
        }
    }
}

/// Years between release and the reference year. Not clamped: a release
/// after the reference year gives a negative age. An age outside `i64` is `None`.
pub fn content_age(reference_year: i32, release_year: Option<i64>) -> Option<i64> {
    release_year.and_then(|year| i64::from(reference_year).checked_sub(year))
}

pub fn is_recent(age: Option<i64>) -> bool {
    age.is_some_and(|age| age < RECENT_AGE_YEARS)
}
