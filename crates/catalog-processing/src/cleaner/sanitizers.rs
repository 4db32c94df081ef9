//! Blank-cell normalization.

use crate::utils::{column_names, is_blank};
use polars::prelude::*;
use tracing::debug;

/// Turn empty and whitespace-only text cells into nulls in every text column.
///
/// Non-blank values are kept exactly as read. Returns the new frame and the
/// number of cells nulled.
pub(crate) fn normalize_blanks(df: DataFrame) -> PolarsResult<(DataFrame, usize)> {
    let mut df = df;
    let mut total_replacements = 0;

    for col_name in &column_names(&df) {
        let series = df.column(col_name)?.as_materialized_series();
        if series.dtype() != &DataType::String {
            continue;
        }

        let (cleaned_series, count) = blank_to_null(series)?;
        if count > 0 {
            debug!(column = %col_name, count, "Blank cells treated as missing");
            total_replacements += count;
            df.replace(col_name, cleaned_series)?;
        }
    }

    Ok((df, total_replacements))
}

/// Replace blank values of a text Series with nulls.
fn blank_to_null(series: &Series) -> PolarsResult<(Series, usize)> {
    let str_series = series.str()?;
    let mut cleaned_values = Vec::with_capacity(str_series.len());
    let mut replacement_count = 0;

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) if is_blank(val) => {
                cleaned_values.push(None);
                replacement_count += 1;
            }
            other => cleaned_values.push(other),
        }
    }

    Ok((
        Series::new(series.name().clone(), cleaned_values),
        replacement_count,
    ))
}
