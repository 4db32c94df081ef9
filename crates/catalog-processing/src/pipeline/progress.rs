//! Progress reporting for the catalog pipeline.
//!
//! The pipeline publishes a [`ProgressUpdate`] at every stage boundary.
//! Reporters are `Send + Sync` so a caller can forward updates from a worker
//! thread.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_processing::Pipeline;
//!
//! let outcome = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the catalog pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Reading the raw CSV
    Loading,
    /// Repairing, deduplicating and coercing
    Cleaning,
    /// Deriving analysis columns
    FeatureEngineering,
    /// Writing tables and the run report
    Exporting,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

/// Stages that do work, in run order.
pub const WORKING_STAGES: [PipelineStage; 4] = [
    PipelineStage::Loading,
    PipelineStage::Cleaning,
    PipelineStage::FeatureEngineering,
    PipelineStage::Exporting,
];

impl PipelineStage {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Dataset",
            Self::Cleaning => "Cleaning Data",
            Self::FeatureEngineering => "Engineering Features",
            Self::Exporting => "Exporting Results",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Whether the run is over once this stage is reported.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Share of a whole run spent in this stage. Terminal stages weigh nothing.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.20,
            Self::Cleaning => 0.35,
            Self::FeatureEngineering => 0.30,
            Self::Exporting => 0.15,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Overall progress when this stage starts: the summed weight of the
    /// working stages before it.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Complete => 1.0,
            Self::Failed => 0.0,
            working => WORKING_STAGES
                .iter()
                .take_while(|stage| *stage != working)
                .map(PipelineStage::weight)
                .sum(),
        }
    }
}

/// One progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: PipelineStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within the current stage (0.0 - 1.0)
    pub stage_progress: f32,

    /// Human-readable message describing current activity
    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: PipelineStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    /// A failure keeps the overall progress reached so far.
    pub fn failed(progress: f32, message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Failed,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receives progress updates from the pipeline.
pub trait ProgressReporter: Send + Sync {
    /// Called at every stage boundary. Keep it cheap and non-blocking.
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
