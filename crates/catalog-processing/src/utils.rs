//! Shared utilities for the catalog pipeline.
//!
//! This module contains the text parsing and Series helpers used by both the
//! cleaner and the feature engineer, so that both stages read and coerce
//! values the same way.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

// =============================================================================
// Text Utilities
// =============================================================================

/// Date layouts accepted for `date_added`, tried in order.
///
/// The first entry is the catalog's native layout ("September 25, 2021").
pub const DATE_FORMATS: [&str; 6] = [
    "%B %d, %Y",
    "%b %d, %Y",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d-%b-%y",
    "%d %B %Y",
];

/// Days between 0001-01-01 (CE day 1) and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Check if a cell value is empty or whitespace-only.
#[inline]
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Earliest year accepted as a release year.
pub const MIN_YEAR: i64 = 1800;

/// Latest year accepted as a release year.
pub const MAX_YEAR: i64 = 2200;

/// Parse a year written as an integer ("2015") or an integral float ("2015.0").
///
/// Years outside [`MIN_YEAR`]..=[`MAX_YEAR`] are rejected.
pub fn parse_year(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    let year = match trimmed.parse::<i64>() {
        Ok(year) => year,
        Err(_) => match trimmed.parse::<f64>() {
            Ok(value)
                if value.fract() == 0.0
                    && (MIN_YEAR as f64..=MAX_YEAR as f64).contains(&value) =>
            {
                value as i64
            }
            _ => return None,
        },
    };
    (MIN_YEAR..=MAX_YEAR).contains(&year).then_some(year)
}

/// Parse a date in any of the [`DATE_FORMATS`] layouts.
///
/// Internal runs of whitespace are collapsed first, since catalog exports
/// often carry stray spaces around the month name.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&normalized, format).ok())
}

/// Days since 1970-01-01, the physical representation of a polars `Date`.
pub fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Inverse of [`date_to_epoch_days`].
pub fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

// =============================================================================
// Series Utilities
// =============================================================================

/// Read a column as owned, optional strings, casting non-text columns.
pub fn text_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let series = df.column(name)?.as_materialized_series().cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|opt_val| opt_val.map(str::to_string))
        .collect())
}

/// Read a column as optional 64-bit integers, casting non-integer columns.
///
/// Values that cannot be cast become null.
pub fn integer_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
    let series = df.column(name)?.as_materialized_series();
    if series.dtype() == &DataType::String {
        return Ok(series
            .str()?
            .into_iter()
            .map(|opt_val| opt_val.and_then(parse_year))
            .collect());
    }
    let cast = series.cast(&DataType::Int64)?;
    Ok(cast.i64()?.into_iter().collect())
}

/// Read a column as optional dates.
///
/// `Date` columns are read directly; text columns are parsed with
/// [`parse_date`]; other types are cast to `Date`.
pub fn date_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<NaiveDate>>> {
    let series = df.column(name)?.as_materialized_series();
    if series.dtype() == &DataType::String {
        return Ok(series
            .str()?
            .into_iter()
            .map(|opt_val| opt_val.and_then(parse_date))
            .collect());
    }
    let days = series.cast(&DataType::Date)?.cast(&DataType::Int32)?;
    Ok(days
        .i32()?
        .into_iter()
        .map(|opt_days| opt_days.and_then(epoch_days_to_date))
        .collect())
}

/// Build a polars `Date` Series from optional dates.
pub fn date_series(name: &str, dates: &[Option<NaiveDate>]) -> PolarsResult<Series> {
    let days: Vec<Option<i32>> = dates
        .iter()
        .map(|opt_date| opt_date.map(date_to_epoch_days))
        .collect();
    Series::new(name.into(), days).cast(&DataType::Date)
}

/// Fill null values in a text Series with a constant.
///
/// Returns the filled Series and how many values were filled.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<(Series, usize)> {
    let text = series.cast(&DataType::String)?;
    let mut filled = 0;
    let values: Vec<String> = text
        .str()?
        .into_iter()
        .map(|opt_val| match opt_val {
            Some(val) => val.to_string(),
            None => {
                filled += 1;
                fill_value.to_string()
            }
        })
        .collect();

    Ok((Series::new(series.name().clone(), values), filled))
}

/// Keep the rows whose mask entry is `true`, preserving their order.
pub fn keep_rows(df: &DataFrame, keep: &[bool]) -> PolarsResult<DataFrame> {
    let mask = Series::new("keep".into(), keep);
    df.filter(mask.bool()?)
}

/// Null count of every column, in column order.
pub fn null_counts(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .map(|col| (col.name().to_string(), col.null_count()))
        .collect()
}

/// Names of the columns of a DataFrame, in order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
