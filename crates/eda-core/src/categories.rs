//! Top-k frequency tables for categorical columns.

use crate::error::{EdaError, Result};
use crate::profiler::ColumnValues;
use crate::types::{CategoryCount, TopCategories, TopCategoryTable};
use crate::utils::validate_dataframe;
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Count values in order of first appearance.
fn count_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for value in values {
        match index.get(value) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(value, counts.len());
                counts.push(CategoryCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts
}

/// Most frequent values, count descending, ties by first appearance.
pub(crate) fn top_values<'a>(
    values: impl Iterator<Item = &'a str>,
    top_k: usize,
) -> Vec<CategoryCount> {
    let mut counts = count_in_order(values);
    // stable sort keeps first-appearance order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top_k);
    counts
}

/// Build top-category tables for up to `max_columns` categorical columns.
///
/// Columns are taken in input order. Both caps must be positive.
pub fn top_categories(df: &DataFrame, max_columns: usize, top_k: usize) -> Result<TopCategories> {
    if max_columns == 0 {
        return Err(EdaError::validation("max_columns must be positive"));
    }
    if top_k == 0 {
        return Err(EdaError::validation("top_k must be positive"));
    }
    validate_dataframe(df)?;

    let mut tables = Vec::new();
    for column in df.get_columns() {
        if tables.len() >= max_columns {
            break;
        }

        let series = column.as_materialized_series();
        let ColumnValues::Categorical(values) = ColumnValues::extract(series)? else {
            continue;
        };

        let entries = top_values(values.iter().flatten().map(String::as_str), top_k);
        tables.push(TopCategoryTable {
            column: series.name().to_string(),
            entries,
        });
    }

    debug!(
        "Top categories computed for {} column(s) (top_k={})",
        tables.len(),
        top_k
    );

    Ok(TopCategories { tables })
}
