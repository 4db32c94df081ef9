use crate::error::{Result, ResultExt};
use crate::types::{CleaningReport, DatasetMetadata, FeatureReport};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// Run Report Types
// ============================================================================

/// Everything a pipeline run did, for `--json` output and `run_report.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path of the input file, empty for in-memory runs
    pub input_file: String,
    /// Reference year used for content age
    pub reference_year: i32,
    /// Total execution time in milliseconds
    pub duration_ms: u64,
    pub dataset: DatasetMetadata,
    pub cleaning: CleaningReport,
    pub features: FeatureReport,
    pub outputs: OutputFiles,
}

/// Files written by a run. All `None` when nothing was saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFiles {
    pub cleaned: Option<PathBuf>,
    pub engineered: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

impl RunReport {
    /// Assemble a report stamped with the current local time.
    pub fn new(
        dataset: DatasetMetadata,
        cleaning: CleaningReport,
        features: FeatureReport,
        duration_ms: u64,
    ) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: dataset.path.display().to_string(),
            reference_year: features.reference_year,
            duration_ms,
            dataset,
            cleaning,
            features,
            outputs: OutputFiles::default(),
        }
    }

    /// Human-readable multi-line summary for the terminal.
    pub fn summary_lines(&self) -> Vec<String> {
        let cleaning = &self.cleaning;
        let mut lines = vec![
            format!("Input:                 {}", display_or_memory(&self.input_file)),
            format!("Reference year:        {}", self.reference_year),
            format!(
                "Rows:                  {} -> {} ({} removed)",
                cleaning.rows_before,
                cleaning.rows_after,
                cleaning.rows_removed()
            ),
            format!("Duplicates removed:    {}", cleaning.duplicates_removed),
            format!("Missing values fixed:  {}", cleaning.missing_values_handled),
            format!(
                "Missing values:        {} -> {}",
                cleaning.total_missing_before(),
                cleaning.total_missing_after()
            ),
        ];

        for tally in &cleaning.coercions {
            lines.push(format!(
                "Coercion failures:     {} ({}, {} rows dropped)",
                tally.failures, tally.column, tally.rows_dropped
            ));
        }

        lines.push(format!(
            "Columns:               {} -> {}",
            self.features.original_column_count, self.features.final_column_count
        ));
        if self.features.unparsed_durations > 0 {
            lines.push(format!(
                "Unparsed durations:    {}",
                self.features.unparsed_durations
            ));
        }

        for (label, path) in [
            ("Cleaned table", &self.outputs.cleaned),
            ("Engineered table", &self.outputs.engineered),
            ("Run report", &self.outputs.report),
        ] {
            if let Some(path) = path {
                lines.push(format!("{:<22} {}", format!("{label}:"), path.display()));
            }
        }

        lines.push(format!("Duration:              {} ms", self.duration_ms));
        lines
    }
}

fn display_or_memory(path: &str) -> &str {
    if path.is_empty() { "<in-memory>" } else { path }
}

// ============================================================================
// Report Generator
// ============================================================================

/// Writes tables and reports into an output directory.
///
/// Every file is first written to a temporary sibling and renamed into place,
/// so a failed write never leaves a partial artifact under the final name.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write a DataFrame as CSV with a header row.
    pub fn write_table(&self, df: &mut DataFrame, file_name: &str) -> Result<PathBuf> {
        let output_path = self.output_dir.join(file_name);
        write_atomically(&output_path, |file| {
            CsvWriter::new(file)
                .include_header(true)
                .with_separator(b',')
                .with_quote_char(b'"')
                .finish(df)
                .context(format!("Writing {}", file_name))
        })?;

        info!(
            path = %output_path.display(),
            rows = df.height(),
            columns = df.width(),
            "Table saved"
        );
        Ok(output_path)
    }

    /// Write a run report as pretty JSON.
    pub fn write_report(&self, report: &RunReport, file_name: &str) -> Result<PathBuf> {
        let report_path = self.output_dir.join(file_name);
        let json = serde_json::to_string_pretty(report)?;
        write_atomically(&report_path, |file| {
            file.write_all(json.as_bytes())
                .context(format!("Writing {}", file_name))
        })?;

        info!(path = %report_path.display(), "Report saved");
        Ok(report_path)
    }
}

/// Write through `write` into `<path>.tmp`, then rename onto `path`.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let written = File::create(&tmp_path)
        .context(format!("Creating {}", tmp_path.display()))
        .and_then(|mut file| {
            write(&mut file)?;
            file.sync_all().context(format!("Flushing {}", tmp_path.display()))
        });

    if let Err(err) = written {
        // best effort; the original error is what matters
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    debug!(from = %tmp_path.display(), to = %path.display(), "Renaming into place");
    fs::rename(&tmp_path, path).context(format!("Renaming into {}", path.display()))
}
