//! CLI entry point for the catalog preprocessing pipeline.

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use exo_processing::{OutlierMode, Pipeline, PipelineConfig, DEFAULT_SOURCE_PATH};
use polars::prelude::*;
use std::path::Path;
use tracing::{info, warn};

/// CLI-compatible outlier mode enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutlierMode {
    /// Filter columns in order, recomputing bounds after each removal pass
    Sequential,
    /// Compute all bounds on the original table and apply them at once
    Simultaneous,
}

impl From<CliOutlierMode> for OutlierMode {
    fn from(cli: CliOutlierMode) -> Self {
        match cli {
            CliOutlierMode::Sequential => OutlierMode::Sequential,
            CliOutlierMode::Simultaneous => OutlierMode::Simultaneous,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exoplanet Catalog Preprocessing Pipeline",
    long_about = "Cleans an exoplanet catalog and derives analysis columns.\n\n\
                  EXAMPLES:\n  \
                  # Process the default catalog location\n  \
                  exo-processing\n\n  \
                  # Explicit input and processed output\n  \
                  exo-processing -i catalog.csv -o processed.csv\n\n  \
                  # Machine-readable run summary\n  \
                  exo-processing --summary-json | jq .rows_after"
)]
struct Args {
    /// Path to the catalog CSV file
    ///
    /// A missing file is not an error: the pipeline falls back to a seeded
    /// synthetic catalog
    #[arg(short, long, default_value = DEFAULT_SOURCE_PATH)]
    input: String,

    /// Write the processed table to this CSV file
    #[arg(short, long)]
    output: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and the final summary)
    #[arg(short, long)]
    quiet: bool,

    /// Print the run summary as JSON to stdout instead of the human-readable
    /// report
    ///
    /// Disables all logging so stdout carries only the JSON
    #[arg(long)]
    summary_json: bool,

    /// How outlier bounds are combined across the filtered columns
    #[arg(long, value_enum, default_value = "sequential")]
    outlier_mode: CliOutlierMode,

    /// Rows generated when the input file is absent
    #[arg(long, default_value = "500")]
    synthetic_rows: usize,

    /// RNG seed for the synthetic fallback catalog
    #[arg(long, default_value = "42")]
    synthetic_seed: u64,
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

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.summary_json);

    if !Path::new(&args.input).exists() {
        warn!(
            "Input file '{}' not found; a synthetic catalog will be used",
            args.input
        );
    }

    let config = PipelineConfig::builder()
        .source_path(&args.input)
        .outlier_mode(args.outlier_mode.into())
        .synthetic_rows(args.synthetic_rows)
        .synthetic_seed(args.synthetic_seed)
        .build()
        .map_err(|e| anyhow!("Invalid configuration: {e}"))?;

    let output = Pipeline::new(config)
        .run()
        .map_err(|e| anyhow!("Pipeline failed: {e}"))?;

    if let Some(ref path) = args.output {
        write_output_csv(&output.df, path)?;
        info!("Processed table written to: {}", path);
    }

    if args.summary_json {
        println!("{}", serde_json::to_string_pretty(&output.summary)?);
    } else {
        print_summary(&output);
    }

    Ok(())
}

/// Write the processed table as CSV.
fn write_output_csv(df: &DataFrame, path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = std::fs::File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df.clone())
        .map_err(|e| anyhow!("Failed to write output CSV: {e}"))?;
    Ok(())
}

/// Print a human-readable summary of the run.
///
/// This uses `println!` intentionally: it is the primary output of the tool
/// and should be visible regardless of log level settings.
fn print_summary(output: &exo_processing::PipelineOutput) {
    let summary = &output.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("CATALOG PREPROCESSING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!("Source: {:?}", output.source);
    println!(
        "Rows:    {} -> {} ({} removed)",
        summary.rows_before,
        summary.rows_after,
        summary.rows_before - summary.rows_after
    );
    println!(
        "Columns: {} -> {} ({} added)",
        summary.columns_before,
        summary.columns_after,
        summary.columns_after - summary.columns_before
    );
    println!("Duration: {}ms", summary.duration_ms);
    println!();

    println!("Steps:");
    for step in &summary.steps {
        println!("  - {step}");
    }
    println!();
    println!("Use --summary-json for machine-readable output");
    println!("{}", "=".repeat(80));
}
