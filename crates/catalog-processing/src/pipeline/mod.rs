//! Pipeline module.
//!
//! This module provides the catalog pipeline and its progress reporting.

mod builder;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder, PipelineOutcome, in_memory_metadata};
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
