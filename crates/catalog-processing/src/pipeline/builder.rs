//! Main catalog pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating load → clean → engineer → export.

use crate::cleaner::DataCleaner;
use crate::config::{ConfigValidationError, PipelineConfig};
use crate::error::{Result, ResultExt};
use crate::features::FeatureEngineer;
use crate::loader::{DatasetLoader, column_types};
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::reporting::{OutputFiles, ReportGenerator, RunReport};
use crate::types::DatasetMetadata;
use chrono::{Datelike, Local};
use polars::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;
use tracing::{debug, error, info};

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// The cleaned dataset, before feature engineering
    pub cleaned: DataFrame,
    /// The cleaned dataset with every derived column appended
    pub engineered: DataFrame,
    pub report: RunReport,
}

/// The catalog pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use catalog_processing::{Pipeline, PipelineConfig};
///
/// let outcome = Pipeline::builder()
///     .config(
///         PipelineConfig::builder()
///             .input_path("data/raw/titles.csv")
///             .reference_year(2026)
///             .build()?,
///     )
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .run()?;
///
/// println!("{} rows engineered", outcome.engineered.height());
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    loader: DatasetLoader,
    cleaner: DataCleaner,
    reporter: ReportGenerator,
    /// Overall progress last reported, as `f32` bits.
    last_progress: AtomicU32,
}

// Ensure Pipeline is Send (can be moved to a worker thread)
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the configured input file and run every stage on it.
    ///
    /// # Errors
    ///
    /// Fails if the input is absent or empty, on any data integrity
    /// violation, on a missing feature input, or on an I/O error while
    /// exporting. Nothing is written under a final file name for a stage
    /// that did not succeed.
    pub fn run(&self) -> Result<PipelineOutcome> {
        let start_time = Instant::now();
        let reference_year = self.reference_year();
        self.last_progress.store(0, Ordering::Relaxed);

        let result = self.load().and_then(|(df, metadata)| {
            self.process_internal(df, metadata, reference_year, start_time)
        });
        self.finish(result)
    }

    /// Run every stage after loading on an in-memory DataFrame.
    ///
    /// `metadata` describes where the frame came from; use
    /// [`DatasetMetadata::in_memory`] when it did not come from a file.
    pub fn process(&self, df: DataFrame, metadata: DatasetMetadata) -> Result<PipelineOutcome> {
        let start_time = Instant::now();
        let reference_year = self.reference_year();
        self.last_progress.store(0, Ordering::Relaxed);

        let result = self.process_internal(df, metadata, reference_year, start_time);
        self.finish(result)
    }

    /// Reference year of a run: the configured one, or the current local year.
    fn reference_year(&self) -> i32 {
        self.config
            .reference_year
            .unwrap_or_else(|| Local::now().year())
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        debug!(
            stage = update.stage.display_name(),
            progress = update.progress,
            "{}",
            update.message
        );
        if !update.stage.is_terminal() {
            self.last_progress
                .store(update.progress.to_bits(), Ordering::Relaxed);
        }
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn finish(&self, result: Result<PipelineOutcome>) -> Result<PipelineOutcome> {
        match result {
            Ok(outcome) => {
                self.report_progress(ProgressUpdate::complete("Pipeline completed successfully"));
                Ok(outcome)
            }
            Err(e) => {
                let reached = f32::from_bits(self.last_progress.load(Ordering::Relaxed));
                self.report_progress(ProgressUpdate::failed(reached, e.to_string()));
                error!(code = e.error_code(), "Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    fn load(&self) -> Result<(DataFrame, DatasetMetadata)> {
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            0.0,
            format!("Loading {}", self.config.input_path.display()),
        ));
        let loaded = self.loader.load(&self.config.input_path)?;
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            1.0,
            format!("Loaded {} rows", loaded.0.height()),
        ));
        Ok(loaded)
    }

    fn process_internal(
        &self,
        df: DataFrame,
        metadata: DatasetMetadata,
        reference_year: i32,
        start_time: Instant,
    ) -> Result<PipelineOutcome> {
        info!(
            rows = df.height(),
            reference_year,
            save_to_disk = self.config.save_to_disk,
            "Starting catalog pipeline"
        );
        let mut outputs = OutputFiles::default();

        // Step 1: Clean
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Cleaning,
            0.0,
            "Cleaning dataset...",
        ));
        let (mut cleaned, cleaning_report) = self.cleaner.clean(df)?;

        if self.config.save_to_disk {
            self.report_progress(ProgressUpdate::new(
                PipelineStage::Cleaning,
                0.9,
                "Saving cleaned table...",
            ));
            outputs.cleaned = Some(
                self.reporter
                    .write_table(&mut cleaned, &self.config.cleaned_file_name)
                    .context("Exporting cleaned table")?,
            );
        }

        // Step 2: Engineer
        self.report_progress(ProgressUpdate::new(
            PipelineStage::FeatureEngineering,
            0.0,
            "Engineering features...",
        ));
        let engineer = FeatureEngineer::new(reference_year);
        let (mut engineered, feature_report) = engineer.engineer(cleaned.clone())?;

        // Step 3: Export
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Exporting,
            0.0,
            "Exporting results...",
        ));
        if self.config.save_to_disk {
            outputs.engineered = Some(
                self.reporter
                    .write_table(&mut engineered, &self.config.engineered_file_name)
                    .context("Exporting engineered table")?,
            );
        }

        let mut report = RunReport::new(
            metadata,
            cleaning_report,
            feature_report,
            start_time.elapsed().as_millis() as u64,
        );

        if self.config.save_to_disk && self.config.write_report {
            outputs.report = Some(self.config.report_path());
            report.outputs = outputs;
            self.reporter
                .write_report(&report, &self.config.report_file_name)
                .context("Writing run report")?;
        } else {
            report.outputs = outputs;
        }

        info!(
            rows = engineered.height(),
            columns = engineered.width(),
            duration_ms = report.duration_ms,
            "Catalog pipeline complete"
        );

        Ok(PipelineOutcome {
            cleaned,
            engineered,
            report,
        })
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Ensure PipelineBuilder is Send (can be moved to another thread during construction)
static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a custom progress reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let reporter = ReportGenerator::new(config.output_dir.clone());

        Ok(Pipeline {
            loader: DatasetLoader::new(config.delimiter_byte()),
            cleaner: DataCleaner::new(),
            reporter,
            progress_reporter: self.progress_reporter,
            last_progress: AtomicU32::new(0),
            config,
        })
    }
}

/// Metadata for a frame handed to [`Pipeline::process`] directly.
pub fn in_memory_metadata(df: &DataFrame) -> DatasetMetadata {
    DatasetMetadata::in_memory(df.height(), column_types(df))
}
