//! Exploratory Data Analysis Library
//!
//! Summary statistics and data-quality heuristics for tabular datasets,
//! built with Rust and Polars.
//!
//! # Overview
//!
//! Each pass takes a Polars [`DataFrame`](polars::prelude::DataFrame) and
//! returns an immutable result:
//!
//! - **Dataset summary**: per-column kind, missing counts, distinct counts and
//!   numeric statistics ([`summarize_dataset`])
//! - **Missing table**: missing count and share per column ([`missing_table`])
//! - **Correlation**: pairwise Pearson coefficients between numeric columns
//!   ([`correlation_matrix`])
//! - **Top categories**: most frequent values of categorical columns
//!   ([`top_categories`])
//! - **Quality flags**: boolean heuristics plus a score in `[0, 1]`
//!   ([`compute_quality_flags`])
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use eda_core::{compute_quality_flags, missing_table, summarize_dataset};
//! use polars::prelude::*;
//!
//! let df = df![
//!     "age" => [Some(10i64), Some(20), Some(30), None],
//!     "city" => [Some("A"), Some("B"), Some("A"), None],
//! ]?;
//!
//! let summary = summarize_dataset(&df)?;
//! let missing = missing_table(&df)?;
//! let flags = compute_quality_flags(&summary, &missing);
//!
//! println!("Quality score: {:.2}", flags.quality_score);
//! ```
//!
//! # Configuration
//!
//! Thresholds and penalties live in [`QualityConfig`]:
//!
//! ```rust,ignore
//! use eda_core::{QualityConfig, QualityFlagEngine};
//!
//! let config = QualityConfig::builder()
//!     .min_rows(50)
//!     .max_missing_share(0.3)
//!     .build()?;
//!
//! let flags = QualityFlagEngine::new(config).evaluate(&summary, &missing);
//! ```
//!
//! # Reports
//!
//! [`EdaReport`] runs every pass and renders Markdown, JSON and CSV output.

pub mod categories;
pub mod config;
pub mod correlation;
pub mod error;
pub mod missing;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use categories::top_categories;
pub use config::{ConfigValidationError, FlagPenalties, QualityConfig, QualityConfigBuilder};
pub use correlation::correlation_matrix;
pub use error::{EdaError, Result, ResultExt};
pub use missing::missing_table;
pub use profiler::{DataProfiler, summarize_dataset};
pub use quality::{QUALITY_RULES, QualityFlagEngine, compute_quality_flags, is_identifier_like};
pub use reporting::{EdaReport, ReportOptions, flatten_summary};
pub use types::{
    CategoryCount, ColumnKind, ColumnSummary, CorrelationMatrix, CorrelationPair, DatasetSummary,
    MissingEntry, MissingTable, QualityFlag, QualityFlags, TopCategories, TopCategoryTable,
};
pub use utils::{clean_numeric_string, is_numeric_dtype, parse_numeric_string};
