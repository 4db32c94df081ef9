//! Data cleaning for the title catalog.
//!
//! [`DataCleaner::clean`] applies a fixed sequence of rules:
//! 1. Blank text cells become missing
//! 2. Missing values are repaired from the [`rules::MISSING_VALUE_RULES`] table
//! 3. Fully identical rows are removed, first occurrence kept
//! 4. `date_added` and `release_year` are coerced
//! 5. Identifiers are checked for uniqueness
//!
//! The input frame is consumed and a new frame is returned together with a
//! [`CleaningReport`].

mod converters;
mod duplicates;
pub mod rules;
mod sanitizers;

pub use rules::{MissingValueRule, RepairStrategy, MISSING_VALUE_RULES};

use crate::error::{IntegrityViolation, Result, ResultExt};
use crate::schema;
use crate::types::{CleaningReport, ColumnMissing, RepairOutcome};
use crate::utils::{fill_string_nulls, null_counts};
use polars::prelude::*;
use tracing::{debug, info};

/// Cleaner for raw catalog datasets.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner;

impl DataCleaner {
    pub fn new() -> Self {
        Self
    }

    /// Clean a raw dataset.
    ///
    /// # Errors
    ///
    /// Returns a data integrity error if the dataset is empty, lacks a
    /// required column, or still repeats an identifier after deduplication.
    /// Coercion failures are not errors; they are counted in the report.
    pub fn clean(&self, df: DataFrame) -> Result<(DataFrame, CleaningReport)> {
        validate_structure(&df)?;

        let rows_before = df.height();
        info!(rows = rows_before, columns = df.width(), "Cleaning dataset");

        let (df, blanks) = sanitizers::normalize_blanks(df).context("Normalizing blank cells")?;
        debug!(blanks, "Blank normalization complete");

        let missing_before = missing_counts(&df);

        let (df, repairs) = repair_missing_values(df)?;
        let missing_values_handled = repairs.iter().map(|r| r.values_repaired).sum();

        let (df, duplicates_removed) =
            duplicates::remove_duplicate_rows(df).context("Removing duplicate rows")?;
        if duplicates_removed > 0 {
            info!(duplicates_removed, "Removed duplicate rows");
        }

        let (df, date_tally) =
            converters::coerce_date_added(df).context("Coercing date_added")?;
        let (df, year_tally) =
            converters::coerce_release_year(df).context("Coercing release_year")?;

        check_unique_identifiers(&df)?;

        let report = CleaningReport {
            rows_before,
            rows_after: df.height(),
            duplicates_removed,
            missing_values_handled,
            missing_before,
            missing_after: missing_counts(&df),
            repairs,
            coercions: vec![date_tally, year_tally],
        };

        info!(
            rows_before = report.rows_before,
            rows_after = report.rows_after,
            missing_values_handled = report.missing_values_handled,
            coercion_failures = report.coercion_failures(),
            "Cleaning complete"
        );

        Ok((df, report))
    }
}

/// Reject empty datasets and datasets missing a required column.
pub(crate) fn validate_structure(df: &DataFrame) -> Result<()> {
    if df.height() == 0 {
        return Err(IntegrityViolation::EmptyDataset.into());
    }
    for column in schema::REQUIRED_COLUMNS {
        if df.column(column).is_err() {
            return Err(IntegrityViolation::MissingColumn(column.to_string()).into());
        }
    }
    Ok(())
}

/// Apply every rule of the table, returning how many values each one filled.
fn repair_missing_values(df: DataFrame) -> Result<(DataFrame, Vec<RepairOutcome>)> {
    let mut df = df;
    let mut outcomes = Vec::with_capacity(MISSING_VALUE_RULES.len());

    for rule in &MISSING_VALUE_RULES {
        let values_repaired = match rule.strategy {
            RepairStrategy::Constant(fill_value) => {
                let series = df.column(rule.column)?.as_materialized_series();
                if series.null_count() == 0 {
                    0
                } else {
                    let (filled, count) = fill_string_nulls(series, fill_value)
                        .context(format!("Repairing column '{}'", rule.column))?;
                    df.replace(rule.column, filled)?;
                    count
                }
            }
            RepairStrategy::LeaveNull => 0,
        };

        if values_repaired > 0 {
            debug!(
                column = rule.column,
                strategy = %rule.strategy,
                values_repaired,
                "Repaired missing values"
            );
        }

        outcomes.push(RepairOutcome {
            column: rule.column.to_string(),
            strategy: rule.strategy.to_string(),
            values_repaired,
        });
    }

    Ok((df, outcomes))
}

fn check_unique_identifiers(df: &DataFrame) -> Result<()> {
    let repeated = duplicates::repeated_identifiers(df, schema::SHOW_ID)?;
    match repeated.into_iter().next() {
        Some((value, occurrences)) => {
            Err(IntegrityViolation::DuplicateIdentifier { value, occurrences }.into())
        }
        None => Ok(()),
    }
}

fn missing_counts(df: &DataFrame) -> Vec<ColumnMissing> {
    null_counts(df)
        .into_iter()
        .map(|(column, missing)| ColumnMissing { column, missing })
        .collect()
}
