//! Column profiling for dataset summaries.
//!
//! This module classifies each column as numeric, categorical or other and
//! computes missing/distinct counts plus mean, min and max for numeric
//! columns. The resulting [`DatasetSummary`] is the input of the quality flag
//! engine.

mod statistics;
mod values;

use crate::error::{Result, ResultExt};
use crate::types::{ColumnSummary, DatasetSummary};
use crate::utils::{share, validate_dataframe};
use polars::prelude::*;
use tracing::debug;

pub(crate) use values::{ColumnValues, numeric_values};

/// Number of example values kept per column.
pub const EXAMPLE_VALUES: usize = 3;

/// Data profiler producing per-column descriptive statistics.
pub struct DataProfiler;

impl DataProfiler {
    /// Summarize every column of a dataset, preserving input column order.
    ///
    /// Fails with a validation error if the DataFrame has no columns or
    /// repeats a column name.
    pub fn summarize_dataset(df: &DataFrame) -> Result<DatasetSummary> {
        validate_dataframe(df)?;

        let n_rows = df.height();
        let mut columns = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            let series = column.as_materialized_series();
            let summary = Self::profile_column(series, n_rows)
                .context(format!("Failed to profile column '{}'", series.name()))?;
            columns.push(summary);
        }

        debug!(
            "Summarized dataset: {} rows x {} columns",
            n_rows,
            columns.len()
        );

        Ok(DatasetSummary {
            n_rows,
            n_cols: columns.len(),
            columns,
        })
    }

    /// Profile a single series against the dataset row count.
    pub fn profile_column(series: &Series, n_rows: usize) -> Result<ColumnSummary> {
        let values = ColumnValues::extract(series)?;
        let missing_count = values.missing_count();
        let distinct_count = values.distinct_count();

        let (stats, integral) = match &values {
            ColumnValues::Numeric { values: nums, .. } => {
                (statistics::numeric_stats(nums), statistics::is_integral(nums))
            }
            _ => (None, false),
        };

        debug!(
            "Column '{}': kind={}, missing={}, distinct={}",
            series.name(),
            values.kind(),
            missing_count,
            distinct_count
        );

        Ok(ColumnSummary {
            name: series.name().to_string(),
            kind: values.kind(),
            non_missing_count: values.len() - missing_count,
            missing_count,
            missing_share: share(missing_count, n_rows),
            distinct_count,
            integral,
            mean: stats.map(|s| s.mean),
            min: stats.map(|s| s.min),
            max: stats.map(|s| s.max),
            example_values: values.examples(EXAMPLE_VALUES),
        })
    }
}

/// Summarize a dataset. See [`DataProfiler::summarize_dataset`].
pub fn summarize_dataset(df: &DataFrame) -> Result<DatasetSummary> {
    DataProfiler::summarize_dataset(df)
}
