//! Ordered (upper bound, label) tables with one shared lookup.
//!
//! Every table is total: values above the last bound fall into its overflow
//! label and missing values fall into [`UNKNOWN_LABEL`].

use crate::schema::ContentType;

/// Label for a missing input.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// An ordered bucketing table. Upper bounds are inclusive and ascending.
#[derive(Debug, Clone, Copy)]
pub struct BucketTable {
    pub bounds: &'static [(i64, &'static str)],
    pub overflow: &'static str,
}

impl BucketTable {
    /// Label of the first bucket whose upper bound is at least `value`.
    pub fn label(&self, value: Option<i64>) -> &'static str {
        let Some(value) = value else {
            return UNKNOWN_LABEL;
        };
        self.bounds
            .iter()
            .find(|(upper, _)| value <= *upper)
            .map_or(self.overflow, |(_, label)| *label)
    }

    /// Every label this table can produce, in order, ending with `Unknown`.
    pub fn vocabulary(&self) -> Vec<&'static str> {
        self.bounds
            .iter()
            .map(|(_, label)| *label)
            .chain([self.overflow, UNKNOWN_LABEL])
            .collect()
    }
}

/// Content age in years. Negative ages (release after the reference year)
/// land in the first bucket.
pub const AGE_CATEGORIES: BucketTable = BucketTable {
    bounds: &[(2, "New"), (5, "Recent"), (20, "Catalog")],
    overflow: "Vintage",
};

/// Movie runtime in minutes.
pub const MOVIE_DURATION_GROUPS: BucketTable = BucketTable {
    bounds: &[(90, "Short"), (120, "Medium")],
    overflow: "Long",
};

/// Show length in seasons.
pub const SHOW_DURATION_GROUPS: BucketTable = BucketTable {
    bounds: &[(1, "Single Season"), (3, "Short Series")],
    overflow: "Long Series",
};

/// Release year.
pub const RELEASE_ERAS: BucketTable = BucketTable {
    bounds: &[(1999, "Pre-2000"), (2009, "2000s"), (2019, "2010s")],
    overflow: "2020s",
};

/// Duration group of a title: minutes for movies, seasons for shows.
pub fn duration_group(
    content_type: Option<ContentType>,
    minutes: Option<i64>,
    seasons: Option<i64>,
) -> &'static str {
    match content_type {
        Some(ContentType::Movie) => MOVIE_DURATION_GROUPS.label(minutes),
        Some(ContentType::TvShow) => SHOW_DURATION_GROUPS.label(seasons),
        None => UNKNOWN_LABEL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_bounds_are_inclusive() {
        assert_eq!(AGE_CATEGORIES.label(Some(2)), "New");
        assert_eq!(AGE_CATEGORIES.label(Some(3)), "Recent");
        assert_eq!(AGE_CATEGORIES.label(Some(20)), "Catalog");
        assert_eq!(AGE_CATEGORIES.label(Some(21)), "Vintage");
    }

    #[test]
    fn test_negative_age_is_new() {
        assert_eq!(AGE_CATEGORIES.label(Some(-3)), "New");
    }

    #[test]
    fn test_missing_value_is_unknown() {
        assert_eq!(RELEASE_ERAS.label(None), UNKNOWN_LABEL);
    }

    #[test]
    fn test_release_eras() {
        assert_eq!(RELEASE_ERAS.label(Some(1954)), "Pre-2000");
        assert_eq!(RELEASE_ERAS.label(Some(2000)), "2000s");
        assert_eq!(RELEASE_ERAS.label(Some(2015)), "2010s");
        assert_eq!(RELEASE_ERAS.label(Some(2021)), "2020s");
    }

    #[test]
    fn test_duration_group_by_type() {
        assert_eq!(duration_group(Some(ContentType::Movie), Some(90), None), "Short");
        assert_eq!(duration_group(Some(ContentType::Movie), Some(150), None), "Long");
        assert_eq!(
            duration_group(Some(ContentType::TvShow), None, Some(1)),
            "Single Season"
        );
        assert_eq!(
            duration_group(Some(ContentType::TvShow), None, Some(5)),
            "Long Series"
        );
        assert_eq!(duration_group(Some(ContentType::TvShow), None, None), "Unknown");
        assert_eq!(duration_group(None, Some(90), None), "Unknown");
    }

    #[test]
    fn test_labels_stay_in_vocabulary() {
        for table in [AGE_CATEGORIES, MOVIE_DURATION_GROUPS, SHOW_DURATION_GROUPS, RELEASE_ERAS] {
            let vocabulary = table.vocabulary();
            for value in [None, Some(i64::MIN), Some(-1), Some(0), Some(95), Some(2005), Some(i64::MAX)] {
                assert!(vocabulary.contains(&table.label(value)));
            }
        }
    }
}
