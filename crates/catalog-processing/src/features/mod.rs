//! Feature engineering on the cleaned catalog.
//!
//! Every derived column is a pure function of columns of the same row. The
//! only shared input is the reference year, fixed when the engineer is built.
//! Original columns are kept and derived columns are appended in
//! [`ENGINEERED_COLUMNS`] order.

pub mod buckets;
pub mod duration;
pub mod flags;
pub mod multi_value;
pub mod temporal;

use crate::error::{PipelineError, Result};
use crate::schema::{self, ContentType};
use crate::types::FeatureReport;
use crate::utils::{date_values, integer_values, text_values};
use buckets::{AGE_CATEGORIES, RELEASE_ERAS};
use duration::Duration;
use flags::GENRE_FLAGS;
use multi_value::MultiValue;
use polars::prelude::*;
use temporal::DateParts;
use tracing::{debug, info, warn};

/// Derived columns, in the order they are appended.
pub const ENGINEERED_COLUMNS: [&str; 26] = [
    "duration_minutes",
    "duration_seasons",
    "year_added",
    "month_added",
    "month_name_added",
    "quarter_added",
    "day_of_week_added",
    "content_age",
    "is_movie",
    "is_tv_show",
    "is_long",
    "is_recent",
    "is_adult",
    "is_drama",
    "is_comedy",
    "is_documentary",
    "is_international",
    "is_us_content",
    "age_category",
    "duration_group",
    "release_era",
    "primary_genre",
    "primary_country",
    "genre_count",
    "country_count",
    "is_international_coproduction",
];

const DURATION_INPUTS: &[&str] = &[schema::TYPE, schema::DURATION];
const DATE_INPUTS: &[&str] = &[schema::DATE_ADDED];
const YEAR_INPUTS: &[&str] = &[schema::RELEASE_YEAR];
const TYPE_INPUTS: &[&str] = &[schema::TYPE];
const RATING_INPUTS: &[&str] = &[schema::RATING];
const GENRE_INPUTS: &[&str] = &[schema::GENRES];
const COUNTRY_INPUTS: &[&str] = &[schema::COUNTRY];

/// Input columns of each derived column.
const FEATURE_INPUTS: [(&str, &[&str]); 26] = [
    ("duration_minutes", DURATION_INPUTS),
    ("duration_seasons", DURATION_INPUTS),
    ("year_added", DATE_INPUTS),
    ("month_added", DATE_INPUTS),
    ("month_name_added", DATE_INPUTS),
    ("quarter_added", DATE_INPUTS),
    ("day_of_week_added", DATE_INPUTS),
    ("content_age", YEAR_INPUTS),
    ("is_movie", TYPE_INPUTS),
    ("is_tv_show", TYPE_INPUTS),
    ("is_long", DURATION_INPUTS),
    ("is_recent", YEAR_INPUTS),
    ("is_adult", RATING_INPUTS),
    ("is_drama", GENRE_INPUTS),
    ("is_comedy", GENRE_INPUTS),
    ("is_documentary", GENRE_INPUTS),
    ("is_international", GENRE_INPUTS),
    ("is_us_content", COUNTRY_INPUTS),
    ("age_category", YEAR_INPUTS),
    ("duration_group", DURATION_INPUTS),
    ("release_era", YEAR_INPUTS),
    ("primary_genre", GENRE_INPUTS),
    ("primary_country", COUNTRY_INPUTS),
    ("genre_count", GENRE_INPUTS),
    ("country_count", COUNTRY_INPUTS),
    ("is_international_coproduction", COUNTRY_INPUTS),
];

/// Derives analysis columns from a cleaned catalog.
#[derive(Debug, Clone, Copy)]
pub struct FeatureEngineer {
    reference_year: i32,
}

impl FeatureEngineer {
    pub fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    /// Append every derived column to `df`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::FeatureDerivation`] naming the first feature
    /// whose input column is absent. No column is added in that case.
    pub fn engineer(&self, df: DataFrame) -> Result<(DataFrame, FeatureReport)> {
        check_inputs(&df)?;

        let original_column_count = df.width();
        info!(
            rows = df.height(),
            reference_year = self.reference_year,
            "Engineering features"
        );

        let inputs = RowInputs::read(&df)?;
        let derived = self.derive(&inputs);

        let mut df = df;
        for series in derived {
            df.with_column(series)?;
        }

        let report = FeatureReport {
            reference_year: self.reference_year,
            original_column_count,
            final_column_count: df.width(),
            derived_columns: ENGINEERED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            unparsed_durations: inputs.unparsed_durations(),
            unknown_content_types: inputs.unknown_content_types(),
        };

        if report.unparsed_durations > 0 {
            warn!(
                rows = report.unparsed_durations,
                "Durations without a leading number left null"
            );
        }
        if report.unknown_content_types > 0 {
            warn!(
                rows = report.unknown_content_types,
                "Titles with unrecognized type get no duration features"
            );
        }
        info!(
            columns_added = report.columns_added(),
            final_columns = report.final_column_count,
            "Feature engineering complete"
        );

        Ok((df, report))
    }

    /// Build the derived Series in [`ENGINEERED_COLUMNS`] order.
    fn derive(&self, inputs: &RowInputs) -> Vec<Series> {
        let durations: Vec<Duration> = inputs
            .content_types
            .iter()
            .zip(&inputs.durations)
            .map(|(content_type, text)| Duration::parse(*content_type, text.as_deref()))
            .collect();
        let parts: Vec<Option<DateParts>> = inputs
            .dates
            .iter()
            .map(|date| date.map(DateParts::of))
            .collect();
        let ages: Vec<Option<i64>> = inputs
            .release_years
            .iter()
            .map(|year| temporal::content_age(self.reference_year, *year))
            .collect();
        let genres: Vec<MultiValue> = inputs
            .genres
            .iter()
            .map(|text| MultiValue::of(text.as_deref()))
            .collect();
        let countries: Vec<MultiValue> = inputs
            .countries
            .iter()
            .map(|text| MultiValue::of(text.as_deref()))
            .collect();

        let mut columns: Vec<Series> = Vec::with_capacity(ENGINEERED_COLUMNS.len());

        columns.push(int_series("duration_minutes", durations.iter().map(|d| d.minutes)));
        columns.push(int_series("duration_seasons", durations.iter().map(|d| d.seasons)));

        columns.push(int_series(
            "year_added",
            parts.iter().map(|p| p.as_ref().map(|p| p.year)),
        ));
        columns.push(int_series(
            "month_added",
            parts.iter().map(|p| p.as_ref().map(|p| p.month)),
        ));
        columns.push(text_series(
            "month_name_added",
            parts.iter().map(|p| p.as_ref().map(|p| p.month_name.as_str())),
        ));
        columns.push(int_series(
            "quarter_added",
            parts.iter().map(|p| p.as_ref().map(|p| p.quarter)),
        ));
        columns.push(text_series(
            "day_of_week_added",
            parts.iter().map(|p| p.as_ref().map(|p| p.day_of_week.as_str())),
        ));
        columns.push(int_series("content_age", ages.iter().copied()));

        columns.push(flag_series(
            "is_movie",
            inputs.content_types.iter().map(|t| *t == Some(ContentType::Movie)),
        ));
        columns.push(flag_series(
            "is_tv_show",
            inputs.content_types.iter().map(|t| *t == Some(ContentType::TvShow)),
        ));
        columns.push(flag_series("is_long", durations.iter().map(Duration::is_long)));
        columns.push(flag_series(
            "is_recent",
            ages.iter().map(|age| temporal::is_recent(*age)),
        ));
        columns.push(flag_series(
            "is_adult",
            inputs.ratings.iter().map(|r| flags::is_adult(r.as_deref())),
        ));
        for genre_flag in &GENRE_FLAGS {
            columns.push(flag_series(
                genre_flag.column,
                inputs.genres.iter().map(|g| genre_flag.matches(g.as_deref())),
            ));
        }
        columns.push(flag_series(
            "is_us_content",
            inputs.countries.iter().map(|c| flags::is_us_content(c.as_deref())),
        ));

        columns.push(text_series(
            "age_category",
            ages.iter().map(|age| Some(AGE_CATEGORIES.label(*age))),
        ));
        columns.push(text_series(
            "duration_group",
            inputs.content_types.iter().zip(&durations).map(|(t, d)| {
                Some(buckets::duration_group(*t, d.minutes, d.seasons))
            }),
        ));
        columns.push(text_series(
            "release_era",
            inputs
                .release_years
                .iter()
                .map(|year| Some(RELEASE_ERAS.label(*year))),
        ));

        columns.push(text_series(
            "primary_genre",
            genres.iter().map(|g| g.primary.as_deref()),
        ));
        columns.push(text_series(
            "primary_country",
            countries.iter().map(|c| c.primary.as_deref()),
        ));
        columns.push(int_series("genre_count", genres.iter().map(|g| Some(g.distinct))));
        columns.push(int_series(
            "country_count",
            countries.iter().map(|c| Some(c.distinct)),
        ));
        columns.push(flag_series(
            "is_international_coproduction",
            countries.iter().map(MultiValue::is_multiple),
        ));

        debug_assert_eq!(columns.len(), ENGINEERED_COLUMNS.len());
        debug!(columns = columns.len(), "Derived feature columns");

        columns
    }
}

/// Fail on the first feature whose input column is absent.
fn check_inputs(df: &DataFrame) -> Result<()> {
    for (feature, inputs) in FEATURE_INPUTS {
        if let Some(missing) = inputs.iter().find(|c| df.column(c).is_err()) {
            return Err(PipelineError::FeatureDerivation {
                feature: feature.to_string(),
                column: missing.to_string(),
            });
        }
    }
    Ok(())
}

/// Input columns read once, row-aligned.
struct RowInputs {
    content_types: Vec<Option<ContentType>>,
    durations: Vec<Option<String>>,
    dates: Vec<Option<chrono::NaiveDate>>,
    release_years: Vec<Option<i64>>,
    ratings: Vec<Option<String>>,
    genres: Vec<Option<String>>,
    countries: Vec<Option<String>>,
}

impl RowInputs {
    fn read(df: &DataFrame) -> PolarsResult<Self> {
        let content_types = text_values(df, schema::TYPE)?
            .iter()
            .map(|t| t.as_deref().and_then(ContentType::parse))
            .collect();

        Ok(Self {
            content_types,
            durations: text_values(df, schema::DURATION)?,
            dates: date_values(df, schema::DATE_ADDED)?,
            release_years: integer_values(df, schema::RELEASE_YEAR)?,
            ratings: text_values(df, schema::RATING)?,
            genres: text_values(df, schema::GENRES)?,
            countries: text_values(df, schema::COUNTRY)?,
        })
    }

    /// Titles of known type whose duration text has no leading integer.
    fn unparsed_durations(&self) -> usize {
        self.content_types
            .iter()
            .zip(&self.durations)
            .filter(|(t, text)| {
                t.is_some() && text.as_deref().and_then(duration::leading_integer).is_none()
            })
            .count()
    }

    fn unknown_content_types(&self) -> usize {
        self.content_types.iter().filter(|t| t.is_none()).count()
    }
}

fn int_series(name: &str, values: impl Iterator<Item = Option<i64>>) -> Series {
    Series::new(name.into(), values.collect::<Vec<_>>())
}

fn flag_series(name: &str, values: impl Iterator<Item = bool>) -> Series {
    Series::new(name.into(), values.collect::<Vec<_>>())
}

fn text_series<'a>(name: &str, values: impl Iterator<Item = Option<&'a str>>) -> Series {
    Series::new(name.into(), values.collect::<Vec<_>>())
}
