//! CLI entry point for the title catalog pipeline.

use anyhow::{Context, Result};
use catalog_processing::{Pipeline, PipelineConfig, PipelineError, RunReport};
use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Title catalog cleaning and feature engineering pipeline",
    long_about = "Cleans a raw streaming-catalog CSV export and derives analysis columns.\n\n\
                  ENVIRONMENT VARIABLES (also read from .env):\n  \
                  CATALOG_INPUT         Input CSV path\n  \
                  CATALOG_OUTPUT_DIR    Output directory\n\n\
                  EXAMPLES:\n  \
                  # Default paths\n  \
                  catalog-processing\n\n  \
                  # Explicit input and pinned reference year\n  \
                  catalog-processing -i data/raw/titles.csv --reference-year 2026\n\n  \
                  # Machine-readable report on stdout\n  \
                  catalog-processing -i titles.csv --json --no-save"
)]
struct Args {
    /// Path to the raw CSV catalog
    #[arg(short, long, env = "CATALOG_INPUT", default_value = "data/raw/titles.csv")]
    input: PathBuf,

    /// Output directory for tables and the run report
    #[arg(short, long, env = "CATALOG_OUTPUT_DIR", default_value = "data/processed")]
    output: PathBuf,

    /// Reference year for content age (default: current year)
    #[arg(long)]
    reference_year: Option<i32>,

    /// Field delimiter of the input file
    #[arg(short, long, default_value = ",")]
    delimiter: char,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output the JSON run report to stdout instead of a human-readable summary
    ///
    /// Disables all logs so stdout only carries JSON.
    #[arg(long)]
    json: bool,

    /// Keep results in memory; write no files
    #[arg(long)]
    no_save: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    // .env must be loaded before parsing so clap sees its variables
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err, args.json);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config_builder = PipelineConfig::builder()
        .input_path(&args.input)
        .output_dir(&args.output)
        .delimiter(args.delimiter)
        .save_to_disk(!args.no_save);

    if let Some(year) = args.reference_year {
        config_builder = config_builder.reference_year(year);
    }

    let config = config_builder.build().context("Invalid configuration")?;

    info!(input = %config.input_path.display(), "Starting catalog pipeline");

    let outcome = Pipeline::builder()
        .config(config)
        .build()
        .context("Failed to build pipeline")?
        .run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else {
        print_human_readable_summary(&outcome.report);
    }

    Ok(())
}

/// Print the failure. Pipeline errors carry a stable code naming the
/// violated check.
fn report_failure(err: &anyhow::Error, json_output: bool) {
    let pipeline_error = err.downcast_ref::<PipelineError>();

    if json_output {
        let body = match pipeline_error {
            Some(e) => serde_json::json!({ "error": e }),
            None => serde_json::json!({
                "error": { "code": "CLI_ERROR", "message": format!("{err:#}") }
            }),
        };
        println!("{body}");
        return;
    }

    match pipeline_error {
        Some(e) => {
            error!(code = e.error_code(), "{e}");
            eprintln!("error [{}]: {}", e.error_code(), e);
        }
        None => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
        }
    }
}

/// Print a human-readable summary of the run.
fn print_human_readable_summary(report: &RunReport) {
    println!();
    println!("{}", "=".repeat(60));
    println!("CATALOG PROCESSING COMPLETE");
    println!("{}", "=".repeat(60));
    for line in report.summary_lines() {
        println!("  {line}");
    }
    println!("{}", "=".repeat(60));
}
