//! Report generation and artifact export.
//!
//! [`RunReport`] gathers the dataset metadata, the cleaning report and the
//! feature report of one run. It is used for:
//! - JSON output to stdout (`--json` CLI flag)
//! - the `run_report.json` file next to the exported tables
//! - programmatic access in library mode
//!
//! [`ReportGenerator`] writes tables and reports without ever leaving a
//! partially written file under its final name.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_processing::reporting::{ReportGenerator, RunReport};
//!
//! let generator = ReportGenerator::new("data/processed");
//! generator.write_table(&mut cleaned_df, "titles_cleaned.csv")?;
//! generator.write_report(&report, "run_report.json")?;
//! ```

mod generator;

pub use generator::{OutputFiles, ReportGenerator, RunReport};
