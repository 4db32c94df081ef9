//! Title Catalog Processing Library
//!
//! Turns a raw CSV export of a streaming catalog (movies and TV shows) into a
//! cleaned table and an analysis-ready table, built on Polars.
//!
//! # Overview
//!
//! - **Loading**: every column read as text, required columns checked
//! - **Cleaning**: blank normalization, rule-table repair of missing values,
//!   order-stable duplicate removal, date and year coercion, identifier check
//! - **Feature Engineering**: duration, calendar, flag, bucket and multi-value
//!   columns derived per row against one reference year
//! - **Reporting**: a JSON run report plus CSV exports written atomically
//! - **Progress Reporting**: stage updates through a callback
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use catalog_processing::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::builder()
//!     .input_path("data/raw/titles.csv")
//!     .output_dir("data/processed")
//!     .reference_year(2026)
//!     .build()?;
//!
//! let outcome = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build()?
//!     .run()?;
//!
//! println!("Rows after cleaning: {}", outcome.report.cleaning.rows_after);
//! ```
//!
//! # Using the stages directly
//!
//! ```rust,ignore
//! use catalog_processing::{DataCleaner, FeatureEngineer};
//!
//! let (cleaned, cleaning_report) = DataCleaner::new().clean(raw_df)?;
//! let (engineered, feature_report) = FeatureEngineer::new(2026).engineer(cleaned)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod features;
pub mod loader;
pub mod pipeline;
pub mod reporting;
pub mod schema;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{DataCleaner, MISSING_VALUE_RULES, MissingValueRule, RepairStrategy};
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder};
pub use error::{IntegrityViolation, PipelineError, Result as PipelineResult, ResultExt};
pub use features::{ENGINEERED_COLUMNS, FeatureEngineer};
pub use loader::DatasetLoader;
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, PipelineOutcome, PipelineStage,
    ProgressReporter, ProgressUpdate, in_memory_metadata,
};
pub use reporting::{OutputFiles, ReportGenerator, RunReport};
pub use schema::ContentType;
pub use types::{
    CleaningReport, CoercionTally, ColumnMissing, DatasetMetadata, FeatureReport, RepairOutcome,
};
