//! Primary element and distinct count of multi-valued fields.

use crate::schema::{distinct_values, primary_value};

/// Summary of one multi-valued cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValue {
    pub primary: Option<String>,
    pub distinct: i64,
}

impl MultiValue {
    pub fn of(text: Option<&str>) -> Self {
        match text {
            Some(text) => Self {
                primary: primary_value(text).map(str::to_string),
                distinct: distinct_values(text).len() as i64,
            },
            None => Self {
                primary: None,
                distinct: 0,
            },
        }
    }

    /// More than one distinct element.
    pub fn is_multiple(&self) -> bool {
        self.distinct > 1
    }
}
