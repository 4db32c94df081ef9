//! Order-stable removal of fully identical rows.

use polars::prelude::*;

/// Remove rows identical to an earlier row across every column.
///
/// The first occurrence survives and survivors keep their relative order.
/// Returns the new frame and the number of rows removed.
pub(crate) fn remove_duplicate_rows(df: DataFrame) -> PolarsResult<(DataFrame, usize)> {
    if df.height() == 0 {
        return Ok((df, 0));
    }

    let deduped = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
    let removed = df.height() - deduped.height();
    if removed == 0 {
        return Ok((df, 0));
    }
    Ok((deduped, removed))
}

/// Identifier values occurring on more than one row, with their counts, in
/// order of first appearance. Nulls are ignored.
pub(crate) fn repeated_identifiers(
    df: &DataFrame,
    column: &str,
) -> PolarsResult<Vec<(String, usize)>> {
    let series = df.column(column)?.as_materialized_series();
    let ids = series.filter(&series.is_not_null())?;
    let ids = DataFrame::new(vec![ids.into_column()])?;

    let repeated = ids.filter(&ids.is_duplicated()?)?;
    if repeated.height() == 0 {
        return Ok(Vec::new());
    }

    let repeated_values = repeated.column(column)?.as_materialized_series().str()?.clone();
    let distinct = repeated.unique_stable(None, UniqueKeepStrategy::First, None)?;

    Ok(distinct
        .column(column)?
        .as_materialized_series()
        .str()?
        .into_iter()
        .flatten()
        .map(|value| (value.to_string(), repeated_values.equal(value).num_trues()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::text_values;

    #[test]
    fn test_remove_duplicate_rows_keeps_first_in_order() {
        let df = df!(
            "show_id" => ["s1", "s2", "s1", "s3", "s2"],
            "title" => ["A", "B", "A", "C", "B"]
        )
        .unwrap();

        let (df, removed) = remove_duplicate_rows(df).unwrap();

        assert_eq!(removed, 2);
        assert_eq!(
            text_values(&df, "show_id").unwrap(),
            vec![Some("s1".to_string()), Some("s2".to_string()), Some("s3".to_string())]
        );
    }

    #[test]
    fn test_rows_differing_in_one_column_are_kept() {
        let df = df!(
            "show_id" => ["s1", "s1"],
            "title" => ["A", "A (Director's Cut)"]
        )
        .unwrap();

        let (df, removed) = remove_duplicate_rows(df).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_null_and_empty_text_are_distinct() {
        let df = df!("director" => [None, Some("")]).unwrap();
        let (_, removed) = remove_duplicate_rows(df).unwrap();
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_rows_sharing_text_across_a_cell_boundary_are_kept() {
        let df = df!(
            "show_id" => ["a\u{1f}b", "a"],
            "title" => ["c", "b\u{1f}c"]
        )
        .unwrap();

        let (df, removed) = remove_duplicate_rows(df).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_identical_rows_with_nulls_collapse() {
        let df = df!(
            "show_id" => ["s1", "s1", "s2"],
            "director" => [None, None, Some("D")]
        )
        .unwrap();

        let (df, removed) = remove_duplicate_rows(df).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_repeated_identifiers() {
        let df = df!("show_id" => [Some("s1"), Some("s2"), Some("s1"), None, None]).unwrap();
        assert_eq!(
            repeated_identifiers(&df, "show_id").unwrap(),
            vec![("s1".to_string(), 2)]
        );
    }

    #[test]
    fn test_repeated_identifiers_in_first_appearance_order() {
        let df = df!("show_id" => ["s9", "s1", "s1", "s9", "s9", "s4"]).unwrap();
        assert_eq!(
            repeated_identifiers(&df, "show_id").unwrap(),
            vec![("s9".to_string(), 3), ("s1".to_string(), 2)]
        );
        assert!(repeated_identifiers(&df.head(Some(2)), "show_id").unwrap().is_empty());
    }
}
