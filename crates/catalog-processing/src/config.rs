//! Configuration types for the catalog pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Earliest reference year accepted by validation.
pub const MIN_REFERENCE_YEAR: i32 = 1800;

/// Latest reference year accepted by validation.
pub const MAX_REFERENCE_YEAR: i32 = 2200;

/// Configuration for the catalog pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use catalog_processing::config::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .input_path("data/raw/titles.csv")
///     .output_dir("data/processed")
///     .reference_year(2026)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Path of the raw CSV catalog.
    /// Default: "data/raw/titles.csv"
    pub input_path: PathBuf,

    /// Directory receiving the cleaned/engineered tables and the run report.
    /// Default: "data/processed"
    pub output_dir: PathBuf,

    /// File name of the cleaned table.
    /// Default: "titles_cleaned.csv"
    pub cleaned_file_name: String,

    /// File name of the engineered table.
    /// Default: "titles_engineered.csv"
    pub engineered_file_name: String,

    /// File name of the JSON run report.
    /// Default: "run_report.json"
    pub report_file_name: String,

    /// Field delimiter of the input file. Must be a single ASCII byte.
    /// Default: ','
    pub delimiter: char,

    /// Reference year for content age. When `None`, the current local year
    /// is captured once at pipeline start.
    /// Default: None
    pub reference_year: Option<i32>,

    /// Whether to write tables and report to disk.
    /// When false, results are kept in memory only.
    /// Default: true
    pub save_to_disk: bool,

    /// Whether to write the JSON run report next to the tables.
    /// Default: true
    pub write_report: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/raw/titles.csv"),
            output_dir: PathBuf::from("data/processed"),
            cleaned_file_name: "titles_cleaned.csv".to_string(),
            engineered_file_name: "titles_engineered.csv".to_string(),
            report_file_name: "run_report.json".to_string(),
            delimiter: ',',
            reference_year: None,
            save_to_disk: true,
            write_report: true,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("cleaned_file_name", &self.cleaned_file_name),
            ("engineered_file_name", &self.engineered_file_name),
            ("report_file_name", &self.report_file_name),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::EmptyFileName(field.to_string()));
            }
        }

        if !self.delimiter.is_ascii() || self.delimiter == '"' || self.delimiter == '\n' {
            return Err(ConfigValidationError::InvalidDelimiter(self.delimiter));
        }

        if let Some(year) = self.reference_year
            && !(MIN_REFERENCE_YEAR..=MAX_REFERENCE_YEAR).contains(&year)
        {
            return Err(ConfigValidationError::InvalidReferenceYear(year));
        }

        Ok(())
    }

    /// Delimiter as the byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.delimiter as u8
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file_name)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("File name for '{0}' must not be empty")]
    EmptyFileName(String),

    #[error("Invalid delimiter {0:?} (must be a single ASCII character other than quote or newline)")]
    InvalidDelimiter(char),

    #[error(
        "Invalid reference year: {0} (must be between {min} and {max})",
        min = MIN_REFERENCE_YEAR,
        max = MAX_REFERENCE_YEAR
    )]
    InvalidReferenceYear(i32),
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    input_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    cleaned_file_name: Option<String>,
    engineered_file_name: Option<String>,
    report_file_name: Option<String>,
    delimiter: Option<char>,
    reference_year: Option<i32>,
    save_to_disk: Option<bool>,
    write_report: Option<bool>,
}

impl PipelineConfigBuilder {
    /// Set the path of the raw CSV catalog.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the output directory for tables and report.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    pub fn cleaned_file_name(mut self, name: impl Into<String>) -> Self {
        self.cleaned_file_name = Some(name.into());
        self
    }

    pub fn engineered_file_name(mut self, name: impl Into<String>) -> Self {
        self.engineered_file_name = Some(name.into());
        self
    }

    pub fn report_file_name(mut self, name: impl Into<String>) -> Self {
        self.report_file_name = Some(name.into());
        self
    }

    /// Set the field delimiter of the input file.
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Pin the reference year used for content age.
    ///
    /// Pinning makes a run's output reproducible; otherwise the current year
    /// is captured when the pipeline starts.
    pub fn reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Enable or disable writing outputs to disk.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Enable or disable the JSON run report.
    pub fn write_report(mut self, write: bool) -> Self {
        self.write_report = Some(write);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            input_path: self.input_path.unwrap_or(defaults.input_path),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            cleaned_file_name: self
                .cleaned_file_name
                .unwrap_or(defaults.cleaned_file_name),
            engineered_file_name: self
                .engineered_file_name
                .unwrap_or(defaults.engineered_file_name),
            report_file_name: self.report_file_name.unwrap_or(defaults.report_file_name),
            delimiter: self.delimiter.unwrap_or(defaults.delimiter),
            reference_year: self.reference_year,
            save_to_disk: self.save_to_disk.unwrap_or(defaults.save_to_disk),
            write_report: self.write_report.unwrap_or(defaults.write_report),
        };

        config.validate()?;
        Ok(config)
    }
}
