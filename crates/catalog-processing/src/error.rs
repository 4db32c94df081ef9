//! Error types for the catalog processing pipeline.
//!
//! Structural problems (empty dataset, missing columns, duplicate identifiers)
//! and missing feature inputs are fatal and surface as [`PipelineError`].
//! Per-field coercion failures are never errors; they are tallied in the
//! cleaning report instead.
//!
//! Errors serialize as `{ code, message }` so they can be embedded in JSON
//! output.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// A violated structural precondition of a dataset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// The dataset (or the file backing it) holds no rows.
    #[error("dataset is empty")]
    EmptyDataset,

    /// A column the schema requires is absent.
    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    /// An identifier occurs on more than one distinct row.
    #[error("identifier '{value}' appears on {occurrences} rows")]
    DuplicateIdentifier { value: String, occurrences: usize },
}

/// The main error type for the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Structural precondition violated; aborts the run.
    #[error("Data integrity violation: {0}")]
    DataIntegrity(IntegrityViolation),

    /// A feature's required input column is absent from the cleaned dataset.
    #[error("Cannot derive feature '{feature}': required column '{column}' is missing")]
    FeatureDerivation { feature: String, column: String },

    /// Input file does not exist.
    #[error("Dataset not found: {}", .0.display())]
    DatasetNotFound(PathBuf),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PipelineError>,
    },
}

impl From<IntegrityViolation> for PipelineError {
    fn from(violation: IntegrityViolation) -> Self {
        PipelineError::DataIntegrity(violation)
    }
}

impl From<crate::config::ConfigValidationError> for PipelineError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        PipelineError::InvalidConfig(err.to_string())
    }
}

impl PipelineError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PipelineError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DataIntegrity(IntegrityViolation::EmptyDataset) => "EMPTY_DATASET",
            Self::DataIntegrity(IntegrityViolation::MissingColumn(_)) => "MISSING_COLUMN",
            Self::DataIntegrity(IntegrityViolation::DuplicateIdentifier { .. }) => {
                "DUPLICATE_IDENTIFIER"
            }
            Self::FeatureDerivation { .. } => "FEATURE_DERIVATION_FAILED",
            Self::DatasetNotFound(_) => "DATASET_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// The integrity violation behind this error, looking through context layers.
    pub fn integrity_violation(&self) -> Option<&IntegrityViolation> {
        match self {
            Self::DataIntegrity(violation) => Some(violation),
            Self::WithContext { source, .. } => source.integrity_violation(),
            _ => None,
        }
    }

    /// Whether the error came from bad input data rather than the environment.
    pub fn is_data_error(&self) -> bool {
        match self {
            Self::DataIntegrity(_) | Self::FeatureDerivation { .. } => true,
            Self::WithContext { source, .. } => source.is_data_error(),
            _ => false,
        }
    }
}

impl Serialize for PipelineError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PipelineError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PipelineError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PipelineError::Io(e).with_context(context))
    }
}
