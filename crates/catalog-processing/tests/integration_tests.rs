//! End-to-end tests for the catalog pipeline.

use catalog_processing::{
    DataCleaner, DatasetLoader, ENGINEERED_COLUMNS, Pipeline, PipelineConfig, PipelineStage,
    RunReport,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn sample_catalog() -> PathBuf {
    fixtures_path().join("titles_sample.csv")
}

fn pipeline_for(input: &Path, output_dir: &Path, save_to_disk: bool) -> Pipeline {
    let config = PipelineConfig::builder()
        .input_path(input)
        .output_dir(output_dir)
        .reference_year(2026)
        .save_to_disk(save_to_disk)
        .build()
        .expect("valid config");
    Pipeline::builder()
        .config(config)
        .build()
        .expect("valid pipeline")
}

fn text_column(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

fn row_of(df: &DataFrame, show_id: &str) -> usize {
    text_column(df, "show_id")
        .iter()
        .position(|id| id.as_deref() == Some(show_id))
        .unwrap_or_else(|| panic!("no row for {show_id}"))
}

fn int_at(df: &DataFrame, column: &str, row: usize) -> Option<i64> {
    df.column(column)
        .unwrap()
        .as_materialized_series()
        .i64()
        .unwrap()
        .get(row)
}

fn flag_at(df: &DataFrame, column: &str, row: usize) -> Option<bool> {
    df.column(column)
        .unwrap()
        .as_materialized_series()
        .bool()
        .unwrap()
        .get(row)
}

fn text_at(df: &DataFrame, column: &str, row: usize) -> Option<String> {
    text_column(df, column).remove(row)
}

// ============================================================================
// Full runs
// ============================================================================

#[test]
fn test_full_run_writes_all_outputs() {
    let out = TempDir::new().unwrap();
    let outcome = pipeline_for(&sample_catalog(), out.path(), true)
        .run()
        .expect("pipeline should succeed");

    let cleaned_path = out.path().join("titles_cleaned.csv");
    let engineered_path = out.path().join("titles_engineered.csv");
    let report_path = out.path().join("run_report.json");

    assert!(cleaned_path.exists());
    assert!(engineered_path.exists());
    assert!(report_path.exists());

    assert_eq!(outcome.report.outputs.cleaned, Some(cleaned_path));
    assert_eq!(outcome.report.outputs.engineered, Some(engineered_path));
    assert_eq!(outcome.report.outputs.report, Some(report_path));

    let leftovers: Vec<_> = fs::read_dir(out.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temporary files left behind");
}

#[test]
fn test_cleaning_counts_on_sample() {
    let outcome = pipeline_for(&sample_catalog(), Path::new("unused"), false)
        .run()
        .unwrap();
    let cleaning = &outcome.report.cleaning;

    assert_eq!(outcome.report.dataset.row_count, 10);
    assert_eq!(outcome.report.dataset.column_count, 12);
    assert_eq!(cleaning.rows_before, 10);
    assert_eq!(cleaning.duplicates_removed, 1);
    assert_eq!(cleaning.rows_dropped_by_coercion(), 1);
    assert_eq!(cleaning.rows_after, 8);
    assert_eq!(
        cleaning.rows_before - cleaning.rows_after,
        cleaning.duplicates_removed + cleaning.rows_dropped_by_coercion()
    );

    assert_eq!(cleaning.missing_before_in("director"), Some(4));
    assert_eq!(cleaning.missing_before_in("cast"), Some(2));
    assert_eq!(cleaning.missing_before_in("country"), Some(3));
    assert_eq!(cleaning.missing_before_in("rating"), Some(1));
    assert_eq!(cleaning.missing_values_handled, 10);

    let dates = cleaning.coercion_for("date_added").unwrap();
    assert_eq!(dates.failures, 2);
    assert_eq!(dates.rows_dropped, 0);
    assert!(dates.samples.contains(&"not a date".to_string()));

    let years = cleaning.coercion_for("release_year").unwrap();
    assert_eq!(years.failures, 1);
    assert_eq!(years.samples, vec!["unknown".to_string()]);
}

#[test]
fn test_cleaned_table_contents() {
    let outcome = pipeline_for(&sample_catalog(), Path::new("unused"), false)
        .run()
        .unwrap();
    let cleaned = &outcome.cleaned;

    assert_eq!(
        text_column(cleaned, "show_id"),
        ["s1", "s2", "s3", "s4", "s5", "s6", "s8", "s9"]
            .map(|id| Some(id.to_string()))
            .to_vec()
    );

    for column in ["director", "cast", "country", "rating"] {
        assert_eq!(
            cleaned.column(column).unwrap().null_count(),
            0,
            "{column} should have no nulls"
        );
    }

    assert_eq!(
        text_at(cleaned, "director", row_of(cleaned, "s2")),
        Some("Unknown Director".to_string())
    );
    assert_eq!(
        text_at(cleaned, "country", row_of(cleaned, "s8")),
        Some("Unknown Country".to_string())
    );
    assert_eq!(
        text_at(cleaned, "rating", row_of(cleaned, "s6")),
        Some("Not Rated".to_string())
    );

    assert_eq!(cleaned.column("date_added").unwrap().dtype(), &DataType::Date);
    assert_eq!(cleaned.column("date_added").unwrap().null_count(), 1);
    assert_eq!(
        cleaned.column("release_year").unwrap().dtype(),
        &DataType::Int64
    );
}

#[test]
fn test_engineered_table_on_sample() {
    let outcome = pipeline_for(&sample_catalog(), Path::new("unused"), false)
        .run()
        .unwrap();
    let engineered = &outcome.engineered;

    let names: Vec<String> = engineered
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let mut expected: Vec<String> = outcome
        .cleaned
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    expected.extend(ENGINEERED_COLUMNS.iter().map(|name| name.to_string()));
    assert_eq!(names, expected);
    assert_eq!(engineered.height(), outcome.cleaned.height());

    let sankofa = row_of(engineered, "s4");
    assert_eq!(int_at(engineered, "duration_minutes", sankofa), Some(125));
    assert_eq!(int_at(engineered, "duration_seasons", sankofa), None);
    assert_eq!(flag_at(engineered, "is_long", sankofa), Some(true));
    assert_eq!(int_at(engineered, "content_age", sankofa), Some(33));
    assert_eq!(
        text_at(engineered, "age_category", sankofa),
        Some("Vintage".to_string())
    );
    assert_eq!(
        text_at(engineered, "release_era", sankofa),
        Some("Pre-2000".to_string())
    );
    assert_eq!(int_at(engineered, "country_count", sankofa), Some(6));
    assert_eq!(
        flag_at(engineered, "is_international_coproduction", sankofa),
        Some(true)
    );
    assert_eq!(flag_at(engineered, "is_us_content", sankofa), Some(true));
    assert_eq!(
        text_at(engineered, "primary_genre", sankofa),
        Some("Dramas".to_string())
    );
    assert_eq!(flag_at(engineered, "is_drama", sankofa), Some(true));

    let blood_and_water = row_of(engineered, "s2");
    assert_eq!(int_at(engineered, "duration_seasons", blood_and_water), Some(2));
    assert_eq!(flag_at(engineered, "is_tv_show", blood_and_water), Some(true));
    assert_eq!(flag_at(engineered, "is_movie", blood_and_water), Some(false));
    assert_eq!(flag_at(engineered, "is_adult", blood_and_water), Some(true));
    assert_eq!(flag_at(engineered, "is_recent", blood_and_water), Some(false));
    assert_eq!(int_at(engineered, "year_added", blood_and_water), Some(2021));
    assert_eq!(int_at(engineered, "month_added", blood_and_water), Some(9));
    assert_eq!(
        text_at(engineered, "month_name_added", blood_and_water),
        Some("September".to_string())
    );
    assert_eq!(
        text_at(engineered, "duration_group", blood_and_water),
        Some("Short Series".to_string())
    );

    // Repeated country names count once
    let monsoon = row_of(engineered, "s9");
    assert_eq!(int_at(engineered, "country_count", monsoon), Some(1));
    assert_eq!(
        flag_at(engineered, "is_international_coproduction", monsoon),
        Some(false)
    );
    assert_eq!(
        text_at(engineered, "duration_group", monsoon),
        Some("Long".to_string())
    );

    let midnight_mass = row_of(engineered, "s8");
    assert_eq!(int_at(engineered, "year_added", midnight_mass), None);
    assert_eq!(flag_at(engineered, "is_us_content", midnight_mass), Some(false));

    for column in ["age_category", "duration_group", "release_era"] {
        assert_eq!(engineered.column(column).unwrap().null_count(), 0);
    }

    let features = &outcome.report.features;
    assert_eq!(features.reference_year, 2026);
    assert_eq!(features.columns_added(), ENGINEERED_COLUMNS.len());
    assert_eq!(features.unparsed_durations, 0);
    assert_eq!(features.unknown_content_types, 0);
}

// ============================================================================
// Persisted artifacts
// ============================================================================

#[test]
fn test_report_file_matches_outcome() {
    let out = TempDir::new().unwrap();
    let outcome = pipeline_for(&sample_catalog(), out.path(), true)
        .run()
        .unwrap();

    let json = fs::read_to_string(out.path().join("run_report.json")).unwrap();
    let written: RunReport = serde_json::from_str(&json).expect("report should parse");

    assert_eq!(written.reference_year, 2026);
    assert_eq!(written.cleaning, outcome.report.cleaning);
    assert_eq!(written.features, outcome.report.features);
    assert_eq!(written.dataset, outcome.report.dataset);
    assert_eq!(written.outputs, outcome.report.outputs);
}

#[test]
fn test_written_tables_reload() {
    let out = TempDir::new().unwrap();
    pipeline_for(&sample_catalog(), out.path(), true)
        .run()
        .unwrap();

    let loader = DatasetLoader::default();
    let (cleaned, _) = loader
        .load(&out.path().join("titles_cleaned.csv"))
        .expect("cleaned table should load");
    let (engineered, _) = loader
        .load(&out.path().join("titles_engineered.csv"))
        .expect("engineered table should load");

    assert_eq!(cleaned.height(), 8);
    assert_eq!(cleaned.width(), 12);
    assert_eq!(engineered.height(), 8);
    assert_eq!(engineered.width(), 12 + ENGINEERED_COLUMNS.len());
}

#[test]
fn test_cleaning_written_table_changes_nothing() {
    let out = TempDir::new().unwrap();
    let first = pipeline_for(&sample_catalog(), out.path(), true)
        .run()
        .unwrap();

    let (reloaded, _) = DatasetLoader::default()
        .load(&out.path().join("titles_cleaned.csv"))
        .unwrap();
    let (recleaned, report) = DataCleaner::new().clean(reloaded).unwrap();

    assert_eq!(report.duplicates_removed, 0);
    assert_eq!(report.missing_values_handled, 0);
    assert_eq!(report.coercion_failures(), 0);
    assert_eq!(recleaned.height(), first.cleaned.height());
    assert!(recleaned.equals_missing(&first.cleaned));
}

#[test]
fn test_no_save_writes_nothing() {
    let out = TempDir::new().unwrap();
    let target = out.path().join("processed");

    let outcome = pipeline_for(&sample_catalog(), &target, false)
        .run()
        .unwrap();

    assert!(!target.exists());
    assert_eq!(outcome.report.outputs.cleaned, None);
    assert_eq!(outcome.report.outputs.report, None);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_input_fails_before_writing() {
    let out = TempDir::new().unwrap();
    let missing = out.path().join("nope.csv");
    let target = out.path().join("processed");

    let err = pipeline_for(&missing, &target, true).run().unwrap_err();

    assert_eq!(err.error_code(), "DATASET_NOT_FOUND");
    assert!(!target.exists());
}

#[test]
fn test_empty_input_fails() {
    let out = TempDir::new().unwrap();
    let empty = out.path().join("empty.csv");
    fs::write(&empty, "").unwrap();
    let target = out.path().join("processed");

    let err = pipeline_for(&empty, &target, true).run().unwrap_err();

    assert_eq!(err.error_code(), "EMPTY_DATASET");
    assert!(err.is_data_error());
    assert!(!target.exists());
}

#[test]
fn test_header_only_input_fails() {
    let out = TempDir::new().unwrap();
    let header_only = out.path().join("header.csv");
    let header = fs::read_to_string(sample_catalog())
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_string();
    fs::write(&header_only, format!("{header}\n")).unwrap();

    let err = pipeline_for(&header_only, out.path(), false)
        .run()
        .unwrap_err();
    assert_eq!(err.error_code(), "EMPTY_DATASET");
}

#[test]
fn test_missing_column_fails() {
    let out = TempDir::new().unwrap();
    let input = out.path().join("no_duration.csv");
    fs::write(
        &input,
        "show_id,type,title,director,cast,country,date_added,release_year,rating,listed_in,description\n\
         s1,Movie,A,D,C,US,\"January 1, 2020\",2019,R,Dramas,x\n",
    )
    .unwrap();

    let err = pipeline_for(&input, out.path(), false).run().unwrap_err();
    assert_eq!(err.error_code(), "MISSING_COLUMN");
}

#[test]
fn test_conflicting_identifiers_fail() {
    let out = TempDir::new().unwrap();
    let input = out.path().join("conflict.csv");
    fs::write(
        &input,
        "show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description\n\
         s1,Movie,A,D,C,US,\"January 1, 2020\",2019,R,90 min,Dramas,x\n\
         s1,Movie,B,D,C,US,\"January 1, 2020\",2019,R,90 min,Dramas,x\n",
    )
    .unwrap();
    let target = out.path().join("processed");

    let err = pipeline_for(&input, &target, true).run().unwrap_err();

    assert_eq!(err.error_code(), "DUPLICATE_IDENTIFIER");
    assert!(!target.join("titles_cleaned.csv").exists());
}

#[test]
fn test_implausible_release_year_is_dropped_not_fatal() {
    let out = TempDir::new().unwrap();
    let input = out.path().join("far_year.csv");
    fs::write(
        &input,
        "show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description\n\
         s1,Movie,A,D,C,US,\"January 1, 2020\",-1e300,R,90 min,Dramas,x\n\
         s2,Movie,B,D,C,US,\"January 1, 2020\",2019,R,90 min,Dramas,y\n",
    )
    .unwrap();

    let outcome = pipeline_for(&input, out.path(), false).run().unwrap();

    assert_eq!(outcome.engineered.height(), 1);
    assert_eq!(int_at(&outcome.engineered, "content_age", 0), Some(7));
    let years = outcome.report.cleaning.coercion_for("release_year").unwrap();
    assert_eq!(years.failures, 1);
    assert_eq!(years.samples, vec!["-1e300".to_string()]);
}

#[test]
fn test_progress_reaches_completion() {
    let stages = Arc::new(Mutex::new(Vec::new()));
    let stages_clone = stages.clone();
    let config = PipelineConfig::builder()
        .input_path(sample_catalog())
        .reference_year(2026)
        .save_to_disk(false)
        .build()
        .unwrap();

    Pipeline::builder()
        .config(config)
        .on_progress(move |update| {
            stages_clone.lock().unwrap().push((update.stage, update.progress));
        })
        .build()
        .unwrap()
        .run()
        .unwrap();

    let seen = stages.lock().unwrap();
    assert_eq!(seen.first().map(|s| s.0), Some(PipelineStage::Loading));
    assert_eq!(seen.last().map(|s| s.0), Some(PipelineStage::Complete));
    assert!(
        seen.windows(2).all(|pair| pair[0].1 <= pair[1].1),
        "progress should never go backwards"
    );
}
