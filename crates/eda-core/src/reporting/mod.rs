//! Report generation module.
//!
//! This module bundles every EDA pass into an [`EdaReport`] and renders it
//! for output:
//! - Markdown (`report.md`) for humans
//! - JSON (`report.json`) for tools
//! - CSV display tables built from [`flatten_summary`], [`missing_frame`]
//!   and [`correlation_frame`]
//!
//! # Example
//!
//! ```rust,ignore
//! use eda_core::reporting::{EdaReport, ReportOptions};
//!
//! let report = EdaReport::build(&df, &ReportOptions::default())?;
//! println!("{}", report.to_markdown());
//! report.write_to_dir(Path::new("reports"))?;
//! ```

mod generator;

pub use generator::{
    EdaReport, ReportOptions, correlation_frame, flatten_summary, missing_frame,
};
