//! Duration parsing.

use crate::schema::ContentType;
use once_cell::sync::Lazy;
use regex::Regex;

/// Movies longer than this many minutes are long.
pub const LONG_MOVIE_MINUTES: i64 = 120;

/// Shows with at least this many seasons are long.
pub const LONG_SHOW_SEASONS: i64 = 4;

static LEADING_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)").expect("Invalid regex: leading integer"));

/// Leading integer of a duration text such as `"90 min"` or `"2 Seasons"`.
pub fn leading_integer(text: &str) -> Option<i64> {
    LEADING_INTEGER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parsed duration of one title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Duration {
    pub minutes: Option<i64>,
    pub seasons: Option<i64>,
}

impl Duration {
    /// Route the leading integer to minutes (movies) or seasons (shows).
    /// The other field stays null, as do both for an unknown type.
    pub fn parse(content_type: Option<ContentType>, text: Option<&str>) -> Self {
        let value = text.and_then(leading_integer);
        match content_type {
            Some(ContentType::Movie) => Self {
                minutes: value,
                seasons: None,
            },
            Some(ContentType::TvShow) => Self {
                minutes: None,
                seasons: value,
            },
            None => Self::default(),
        }
    }

    pub fn is_long(&self) -> bool {
        self.minutes.is_some_and(|m| m > LONG_MOVIE_MINUTES)
            || self.seasons.is_some_and(|s| s >= LONG_SHOW_SEASONS)
    }
}
