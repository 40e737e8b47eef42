//! Per-column missingness reporting.

use crate::error::Result;
use crate::profiler::ColumnValues;
use crate::types::{MissingEntry, MissingTable};
use crate::utils::{share, validate_dataframe};
use polars::prelude::*;
use tracing::debug;

/// Count missing values per column.
///
/// Uses the same missing marker as the profiler: nulls everywhere, plus NaN
/// in float columns. Shares are 0.0 when the dataset has no rows.
pub fn missing_table(df: &DataFrame) -> Result<MissingTable> {
    validate_dataframe(df)?;

    let n_rows = df.height();
    let mut entries = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let missing_count = ColumnValues::extract(series)?.missing_count();
        entries.push(MissingEntry {
            column: series.name().to_string(),
            missing_count,
            missing_share: share(missing_count, n_rows),
        });
    }

    debug!(
        "Missing table: {} of {} columns have missing values",
        entries.iter().filter(|e| e.missing_count > 0).count(),
        entries.len()
    );

    Ok(MissingTable { n_rows, entries })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_counts_match_nulls() {
        let df = df![
            "age" => [Some(10i64), Some(20), Some(30), None],
            "height" => [140i64, 150, 160, 170],
            "city" => [Some("A"), Some("B"), Some("A"), None],
        ]
        .unwrap();

        let table = missing_table(&df).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("age").unwrap().missing_count, 1);
        assert_eq!(table.get("age").unwrap().missing_share, 0.25);
        assert_eq!(table.get("height").unwrap().missing_count, 0);
        assert_eq!(table.get("city").unwrap().missing_count, 1);
    }

    #[test]
    fn test_entries_keep_column_order() {
        let df = df!["b" => [1i32], "a" => [2i32], "c" => [3i32]].unwrap();
        let table = missing_table(&df).unwrap();

        let names: Vec<_> = table.iter().map(|e| e.column.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_empty_dataset_has_zero_shares() {
        let df = df!["a" => Vec::<f64>::new(), "b" => Vec::<String>::new()].unwrap();
        let table = missing_table(&df).unwrap();

        assert_eq!(table.n_rows, 0);
        assert!(table.iter().all(|e| e.missing_share == 0.0));
        assert_eq!(table.max_share(), 0.0);
    }

    #[test]
    fn test_nan_is_missing() {
        let df = df!["x" => [1.0f64, f64::NAN, 3.0, f64::NAN]].unwrap();
        let table = missing_table(&df).unwrap();

        assert_eq!(table.get("x").unwrap().missing_count, 2);
        assert_eq!(table.get("x").unwrap().missing_share, 0.5);
    }

    #[test]
    fn test_no_columns_is_validation_error() {
        assert!(missing_table(&DataFrame::empty()).unwrap_err().is_validation());
    }
}
