//! Type coercion for `date_added` and `release_year`.
//!
//! A value that fails to coerce is never an error. Dates become null; a row
//! whose release year cannot be read is dropped. Both are tallied.

use crate::schema;
use crate::types::CoercionTally;
use crate::utils::{
    MAX_YEAR, MIN_YEAR, date_series, epoch_days_to_date, keep_rows, parse_date, parse_year,
};
use chrono::NaiveDate;
use polars::prelude::*;
use tracing::warn;

/// Offending raw values kept per column for the report.
const MAX_FAILURE_SAMPLES: usize = 5;

/// Collects failures of one coerced column.
struct FailureLog {
    failures: usize,
    samples: Vec<String>,
}

impl FailureLog {
    fn new() -> Self {
        Self {
            failures: 0,
            samples: Vec::new(),
        }
    }

    fn record(&mut self, raw: &str) {
        self.failures += 1;
        if self.samples.len() < MAX_FAILURE_SAMPLES {
            self.samples.push(raw.to_string());
        }
    }

    fn into_tally(self, column: &str, target_type: &str, rows_dropped: usize) -> CoercionTally {
        CoercionTally {
            column: column.to_string(),
            target_type: target_type.to_string(),
            failures: self.failures,
            rows_dropped,
            samples: self.samples,
        }
    }
}

/// Convert `date_added` to a `Date` column. Unparseable text becomes null.
///
/// A column that is already `Date` passes through with no failures.
pub(crate) fn coerce_date_added(df: DataFrame) -> PolarsResult<(DataFrame, CoercionTally)> {
    let mut df = df;
    let series = df.column(schema::DATE_ADDED)?.as_materialized_series();
    let mut log = FailureLog::new();

    let dates: Vec<Option<NaiveDate>> = match series.dtype() {
        DataType::Date => {
            let days = series.cast(&DataType::Int32)?;
            days.i32()?
                .into_iter()
                .map(|opt_days| opt_days.and_then(epoch_days_to_date))
                .collect()
        }
        _ => {
            let text = series.cast(&DataType::String)?;
            text.str()?
                .into_iter()
                .map(|opt_val| {
                    let raw = opt_val?;
                    let parsed = parse_date(raw);
                    if parsed.is_none() {
                        log.record(raw);
                    }
                    parsed
                })
                .collect()
        }
    };

    if log.failures > 0 {
        warn!(
            column = schema::DATE_ADDED,
            failures = log.failures,
            samples = ?log.samples,
            "Unparseable dates set to null"
        );
    }

    df.replace(schema::DATE_ADDED, date_series(schema::DATE_ADDED, &dates)?)?;
    Ok((df, log.into_tally(schema::DATE_ADDED, "date", 0)))
}

/// Convert `release_year` to `Int64`, dropping rows whose year is missing or
/// unreadable.
pub(crate) fn coerce_release_year(df: DataFrame) -> PolarsResult<(DataFrame, CoercionTally)> {
    let series = df.column(schema::RELEASE_YEAR)?.as_materialized_series();
    let mut log = FailureLog::new();

    let years: Vec<Option<i64>> = match series.dtype() {
        DataType::String => series
            .str()?
            .into_iter()
            .map(|opt_val| match opt_val {
                Some(raw) => {
                    let parsed = parse_year(raw);
                    if parsed.is_none() {
                        log.record(raw);
                    }
                    parsed
                }
                None => {
                    log.record("<null>");
                    None
                }
            })
            .collect(),
        _ => {
            let cast = series.strict_cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|opt_year| match opt_year {
                    Some(year) if (MIN_YEAR..=MAX_YEAR).contains(&year) => Some(year),
                    Some(year) => {
                        log.record(&year.to_string());
                        None
                    }
                    None => {
                        log.record("<null>");
                        None
                    }
                })
                .collect()
        }
    };

    let keep: Vec<bool> = years.iter().map(Option::is_some).collect();
    let rows_dropped = log.failures;

    let mut df = df;
    df.replace(
        schema::RELEASE_YEAR,
        Series::new(schema::RELEASE_YEAR.into(), years),
    )?;
    if rows_dropped > 0 {
        warn!(
            column = schema::RELEASE_YEAR,
            rows_dropped,
            samples = ?log.samples,
            "Dropped rows with unreadable release year"
        );
        df = keep_rows(&df, &keep)?;
    }

    Ok((df, log.into_tally(schema::RELEASE_YEAR, "integer", rows_dropped)))
}
