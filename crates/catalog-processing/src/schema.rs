//! Column names and value conventions of the title catalog.
//!
//! Every stage refers to columns through these constants. Multi-valued text
//! fields (`cast`, `country`, `listed_in`) are split by exactly one rule,
//! [`split_multi_value`], and "primary" always means the first element of
//! that split.

use serde::{Deserialize, Serialize};

pub const SHOW_ID: &str = "show_id";
pub const TYPE: &str = "type";
pub const TITLE: &str = "title";
pub const DIRECTOR: &str = "director";
pub const CAST: &str = "cast";
pub const COUNTRY: &str = "country";
pub const DATE_ADDED: &str = "date_added";
pub const RELEASE_YEAR: &str = "release_year";
pub const RATING: &str = "rating";
pub const DURATION: &str = "duration";
pub const GENRES: &str = "listed_in";
pub const DESCRIPTION: &str = "description";

/// Columns every loaded and cleaned dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    SHOW_ID,
    TYPE,
    TITLE,
    DIRECTOR,
    CAST,
    COUNTRY,
    DATE_ADDED,
    RELEASE_YEAR,
    RATING,
    DURATION,
    GENRES,
];

/// Separator of multi-valued fields.
pub const MULTI_VALUE_SEPARATOR: char = ',';

/// Kind of catalog entry, taken from the `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    Movie,
    TvShow,
}

impl ContentType {
    /// Parse the `type` column. Accepts `Movie`, `TV Show` and `Show`,
    /// ignoring case and surrounding whitespace.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("movie") {
            Some(Self::Movie)
        } else if label.eq_ignore_ascii_case("tv show") || label.eq_ignore_ascii_case("show") {
            Some(Self::TvShow)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::TvShow => "TV Show",
        }
    }
}

/// Split a multi-valued field into its ordered elements.
///
/// Elements are separated by commas, trimmed, and empty elements are dropped.
/// Source order is preserved.
pub fn split_multi_value(text: &str) -> Vec<&str> {
    text.split(MULTI_VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Elements of a multi-valued field with repeats removed, first occurrence kept.
pub fn distinct_values(text: &str) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for part in split_multi_value(text) {
        if !seen.contains(&part) {
            seen.push(part);
        }
    }
    seen
}

/// First element of a multi-valued field.
pub fn primary_value(text: &str) -> Option<&str> {
    split_multi_value(text).into_iter().next()
}
