//! Rating, genre and country flags.

use crate::schema::split_multi_value;

/// Ratings flagged as adult content.
pub const ADULT_RATINGS: [&str; 3] = ["TV-MA", "R", "NC-17"];

/// Country tag marking US content.
pub const US_COUNTRY: &str = "United States";

/// A genre flag and the lowercase fragment a genre tag must contain.
#[derive(Debug, Clone, Copy)]
pub struct GenreFlag {
    pub column: &'static str,
    pub fragment: &'static str,
}

/// Genre flags, in output column order.
pub const GENRE_FLAGS: [GenreFlag; 4] = [
    GenreFlag {
        column: "is_drama",
        fragment: "drama",
    },
    GenreFlag {
        column: "is_comedy",
        fragment: "comed",
    },
    GenreFlag {
        column: "is_documentary",
        fragment: "documentar",
    },
    GenreFlag {
        column: "is_international",
        fragment: "international",
    },
];

pub fn is_adult(rating: Option<&str>) -> bool {
    rating.is_some_and(|r| ADULT_RATINGS.contains(&r.trim()))
}

impl GenreFlag {
    /// Whether any genre tag contains the fragment, ignoring case.
    pub fn matches(&self, genres: Option<&str>) -> bool {
        genres.is_some_and(|text| {
            split_multi_value(text)
                .iter()
                .any(|tag| tag.to_lowercase().contains(self.fragment))
        })
    }
}

/// Whether any country tag equals [`US_COUNTRY`].
pub fn is_us_content(countries: Option<&str>) -> bool {
    countries.is_some_and(|text| split_multi_value(text).contains(&US_COUNTRY))
}
