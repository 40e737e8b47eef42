//! CLI entry point for dataset summaries and EDA reports.

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use eda_core::{ColumnKind, EdaReport, ReportOptions, flatten_summary, summarize_dataset};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory data analysis for CSV datasets",
    long_about = "Summarizes tabular datasets and flags common data quality problems.\n\n\
                  EXAMPLES:\n  \
                  # Print shape and per-column summary\n  \
                  eda-cli overview data.csv\n\n  \
                  # Write a Markdown report with CSV tables\n  \
                  eda-cli report data.csv --out-dir reports\n\n  \
                  # Print the report as JSON\n  \
                  eda-cli report data.csv --json | jq .quality"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print dataset shape and the per-column summary
    Overview {
        /// Path to the CSV or Parquet file
        path: PathBuf,

        /// Field separator for CSV input
        #[arg(long, default_value = ",")]
        sep: char,

        /// Show details for a single column instead of the full table
        #[arg(long)]
        column: Option<String>,
    },

    /// Build the full EDA report
    Report {
        /// Path to the CSV or Parquet file
        path: PathBuf,

        /// Field separator for CSV input
        #[arg(long, default_value = ",")]
        sep: char,

        /// Directory for report.md, report.json and the CSV tables
        #[arg(long, default_value = "reports")]
        out_dir: PathBuf,

        /// Maximum number of categorical columns with top-value tables
        #[arg(long, alias = "max-hist-columns", default_value = "5")]
        max_columns: usize,

        /// Number of values per top-category table
        #[arg(long, default_value = "5")]
        top_k_categories: usize,

        /// Minimum missing share for a column to be listed in the report
        #[arg(long, default_value = "0.1")]
        min_missing_share: f64,

        /// Report heading
        #[arg(long, default_value = "EDA report")]
        title: String,

        /// Print the report JSON to stdout instead of writing files
        ///
        /// Disables all logs so stdout only contains JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Initialize the tracing subscriber for logging.
///
/// Logging stays off when `json_output` is set so stdout only carries JSON.
fn init_logging(level: &str, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let json_output = matches!(cli.command, Command::Report { json: true, .. });
    init_logging(&cli.log_level, json_output);

    match cli.command {
        Command::Overview { path, sep, column } => run_overview(&path, sep, column.as_deref()),
        Command::Report {
            path,
            sep,
            out_dir,
            max_columns,
            top_k_categories,
            min_missing_share,
            title,
            json,
        } => {
            let options = ReportOptions {
                title,
                max_category_columns: max_columns,
                top_k: top_k_categories,
                min_missing_share,
                ..ReportOptions::default()
            };
            run_report(&path, sep, &out_dir, &options, json)
        }
    }
}

/// Print the dataset overview.
///
/// Uses `println!` for user-facing output so it shows regardless of log level.
fn run_overview(path: &Path, sep: char, column: Option<&str>) -> Result<()> {
    let data = load_dataset(path, sep)?;
    let summary = summarize_dataset(&data)?;

    if let Some(name) = column {
        let col = summary.require_column(name)?;
        println!("Column: {}", col.name);
        println!("  Kind: {}", col.kind);
        println!(
            "  Missing: {} ({:.1}%)",
            col.missing_count,
            col.missing_share * 100.0
        );
        println!("  Distinct: {}", col.distinct_count);
        if let (Some(mean), Some(min), Some(max)) = (col.mean, col.min, col.max) {
            println!("  Mean: {:.3}  Min: {:.3}  Max: {:.3}", mean, min, max);
        }
        println!("  Examples: {}", col.example_values.join(", "));
        return Ok(());
    }

    println!("Rows: {}", summary.n_rows);
    println!("Columns: {}", summary.n_cols);
    for kind in [ColumnKind::Numeric, ColumnKind::Categorical, ColumnKind::Other] {
        println!("  {}: {}", kind, summary.columns_of_kind(kind).count());
    }
    println!();
    println!("{}", flatten_summary(&summary)?);

    Ok(())
}

fn run_report(
    path: &Path,
    sep: char,
    out_dir: &Path,
    options: &ReportOptions,
    json_output: bool,
) -> Result<()> {
    let data = load_dataset(path, sep)?;
    let report = EdaReport::build(&data, options)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let written = report.write_to_dir(out_dir)?;
    for file in &written {
        debug!("Wrote {}", file.display());
    }

    println!("Report written to {}", out_dir.join("report.md").display());
    println!("Quality score: {:.2}", report.quality.quality_score);
    for flag in &report.quality.triggered {
        println!("  - {}", flag);
    }

    Ok(())
}

/// Load a dataset, choosing the reader from the file extension.
fn load_dataset(path: &Path, sep: char) -> Result<DataFrame> {
    if !path.exists() {
        return Err(anyhow!("Input file not found: {}", path.display()));
    }

    info!("Loading dataset from: {}", path.display());
    let is_parquet = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));

    let data = if is_parquet {
        ParquetReader::new(std::fs::File::open(path)?).finish()?
    } else {
        load_csv(path, sep)?
    };

    info!("Dataset loaded successfully: {:?}", data.shape());
    Ok(data)
}

fn load_csv(path: &Path, sep: char) -> Result<DataFrame> {
    let separator =
        u8::try_from(sep).map_err(|_| anyhow!("Separator must be a single-byte character"))?;

    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(separator)
                .with_quote_char(Some(b'"')),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    Ok(df)
}
