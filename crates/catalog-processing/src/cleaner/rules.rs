//! The missing-value rule table.

use crate::schema;
use std::fmt;

pub const UNKNOWN_DIRECTOR: &str = "Unknown Director";
pub const UNKNOWN_CAST: &str = "Unknown Cast";
pub const UNKNOWN_COUNTRY: &str = "Unknown Country";
pub const NOT_RATED: &str = "Not Rated";

/// How a column's missing values are repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairStrategy {
    /// Substitute a fixed sentinel.
    Constant(&'static str),
    /// Keep the null. Used where a fabricated value would be misleading.
    LeaveNull,
}

impl fmt::Display for RepairStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => write!(f, "constant {value:?}"),
            Self::LeaveNull => write!(f, "leave null"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingValueRule {
    pub column: &'static str,
    pub strategy: RepairStrategy,
}

/// Column → strategy, applied in this order. Rows are never dropped here.
pub const MISSING_VALUE_RULES: [MissingValueRule; 6] = [
    MissingValueRule {
        column: schema::DIRECTOR,
        strategy: RepairStrategy::Constant(UNKNOWN_DIRECTOR),
    },
    MissingValueRule {
        column: schema::CAST,
        strategy: RepairStrategy::Constant(UNKNOWN_CAST),
    },
    MissingValueRule {
        column: schema::COUNTRY,
        strategy: RepairStrategy::Constant(UNKNOWN_COUNTRY),
    },
    MissingValueRule {
        column: schema::DATE_ADDED,
        strategy: RepairStrategy::LeaveNull,
    },
    MissingValueRule {
        column: schema::RATING,
        strategy: RepairStrategy::Constant(NOT_RATED),
    },
    MissingValueRule {
        column: schema::DURATION,
        strategy: RepairStrategy::LeaveNull,
    },
];
