use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Facts about the raw input, recorded by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub path: PathBuf,
    pub byte_size: u64,
    pub row_count: usize,
    pub column_count: usize,
    /// (column name, polars dtype) in file order.
    pub column_types: Vec<(String, String)>,
}

impl DatasetMetadata {
    /// Metadata for a frame that did not come from a file.
    pub fn in_memory(row_count: usize, column_types: Vec<(String, String)>) -> Self {
        Self {
            path: PathBuf::new(),
            byte_size: 0,
            row_count,
            column_count: column_types.len(),
            column_types,
        }
    }
}

/// Missing-value count of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

/// How many values one repair rule filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairOutcome {
    pub column: String,
    /// Human-readable form of the strategy, e.g. `constant "Not Rated"`.
    pub strategy: String,
    pub values_repaired: usize,
}

/// Per-field coercion failures of one column.
///
/// A failure turns the field into null; for `release_year` it also drops
/// the row, so `rows_dropped` equals `failures` there and is zero elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoercionTally {
    pub column: String,
    pub target_type: String,
    pub failures: usize,
    pub rows_dropped: usize,
    /// Up to five offending raw values, for diagnostics.
    pub samples: Vec<String>,
}

/// What a cleaning run changed. Built once at the end of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub duplicates_removed: usize,
    /// Values substituted by constant repair rules. Nulls left in place by a
    /// leave-null rule are not counted; see [`CleaningReport::total_missing_before`]
    /// for every missing value found before repair.
    pub missing_values_handled: usize,
    /// Per-column missing counts before repair (blank text counted as missing).
    pub missing_before: Vec<ColumnMissing>,
    /// Per-column missing counts of the cleaned dataset.
    pub missing_after: Vec<ColumnMissing>,
    pub repairs: Vec<RepairOutcome>,
    pub coercions: Vec<CoercionTally>,
}

impl CleaningReport {
    /// Total missing values across all columns before repair.
    pub fn total_missing_before(&self) -> usize {
        self.missing_before.iter().map(|c| c.missing).sum()
    }

    /// Total missing values across all columns after cleaning.
    pub fn total_missing_after(&self) -> usize {
        self.missing_after.iter().map(|c| c.missing).sum()
    }

    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }

    /// Rows dropped because a coerced field was unusable.
    pub fn rows_dropped_by_coercion(&self) -> usize {
        self.coercions.iter().map(|c| c.rows_dropped).sum()
    }

    /// Total coercion failures across all coerced columns.
    pub fn coercion_failures(&self) -> usize {
        self.coercions.iter().map(|c| c.failures).sum()
    }

    pub fn missing_before_in(&self, column: &str) -> Option<usize> {
        find_missing(&self.missing_before, column)
    }

    pub fn missing_after_in(&self, column: &str) -> Option<usize> {
        find_missing(&self.missing_after, column)
    }

    pub fn coercion_for(&self, column: &str) -> Option<&CoercionTally> {
        self.coercions.iter().find(|c| c.column == column)
    }
}

fn find_missing(counts: &[ColumnMissing], column: &str) -> Option<usize> {
    counts.iter().find(|c| c.column == column).map(|c| c.missing)
}

/// What a feature engineering run added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureReport {
    pub reference_year: i32,
    pub original_column_count: usize,
    pub final_column_count: usize,
    pub derived_columns: Vec<String>,
    /// Rows whose duration text had no leading integer.
    pub unparsed_durations: usize,
    /// Rows whose `type` was neither a movie nor a show.
    pub unknown_content_types: usize,
}

impl FeatureReport {
    pub fn columns_added(&self) -> usize {
        self.final_column_count
            .saturating_sub(self.original_column_count)
    }
}
