//! Extraction of per-row values with a uniform missing marker.
//!
//! Nulls are missing in every column. NaN is also missing in float columns,
//! and string columns whose values all parse as numbers are read as numeric.

use crate::error::Result;
use crate::types::ColumnKind;
use crate::utils::{clean_numeric_string, is_label_dtype, is_numeric_dtype, parse_numeric_string};
use polars::prelude::*;
use std::collections::HashSet;
use std::fmt;

/// Largest magnitude below which every integer is exact in an `f64`.
const F64_EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Exact identity of a numeric value, used for distinct counts and examples.
///
/// Integers keep their native value so keys above 2^53 stay distinct after
/// the lossy cast to `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum NumericKey {
    Int(i128),
    /// Bit pattern of a non-integral float; -0.0 is folded into `Int(0)`.
    Float(u64),
}

impl NumericKey {
    fn from_f64(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < F64_EXACT_INT_LIMIT {
            NumericKey::Int(value as i128)
        } else {
            NumericKey::Float(value.to_bits())
        }
    }
}

impl fmt::Display for NumericKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericKey::Int(v) => write!(f, "{}", v),
            NumericKey::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
        }
    }
}

/// Column contents materialized according to the column's [`ColumnKind`].
#[derive(Debug, Clone)]
pub(crate) enum ColumnValues {
    /// `values` feed the statistics, `keys` the distinct count.
    Numeric {
        values: Vec<Option<f64>>,
        keys: Vec<Option<NumericKey>>,
    },
    Categorical(Vec<Option<String>>),
    Other {
        len: usize,
        missing: usize,
        distinct: usize,
    },
}

impl ColumnValues {
    /// Classify a series and pull its values out.
    pub(crate) fn extract(series: &Series) -> Result<Self> {
        if let Some(values) = numeric_values(series)? {
            let keys = numeric_keys(series, &values)?;
            return Ok(Self::Numeric { values, keys });
        }

        if is_label_dtype(series.dtype()) {
            return Ok(Self::Categorical(label_values(series)?));
        }

        let non_null = series.drop_nulls();
        let distinct = if non_null.is_empty() {
            0
        } else {
            non_null.n_unique()?
        };
        Ok(Self::Other {
            len: series.len(),
            missing: series.len() - non_null.len(),
            distinct,
        })
    }

    pub(crate) fn kind(&self) -> ColumnKind {
        match self {
            Self::Numeric { .. } => ColumnKind::Numeric,
            Self::Categorical(_) => ColumnKind::Categorical,
            Self::Other { .. } => ColumnKind::Other,
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Numeric { values, .. } => values.len(),
            Self::Categorical(values) => values.len(),
            Self::Other { len, .. } => *len,
        }
    }

    pub(crate) fn missing_count(&self) -> usize {
        match self {
            Self::Numeric { values, .. } => values.iter().filter(|v| v.is_none()).count(),
            Self::Categorical(values) => values.iter().filter(|v| v.is_none()).count(),
            Self::Other { missing, .. } => *missing,
        }
    }

    pub(crate) fn distinct_count(&self) -> usize {
        match self {
            Self::Numeric { keys, .. } => keys.iter().flatten().collect::<HashSet<_>>().len(),
            Self::Categorical(values) => values
                .iter()
                .flatten()
                .map(String::as_str)
                .collect::<HashSet<_>>()
                .len(),
            Self::Other { distinct, .. } => *distinct,
        }
    }

    /// Up to `limit` distinct non-missing values in order of first appearance.
    pub(crate) fn examples(&self, limit: usize) -> Vec<String> {
        match self {
            Self::Numeric { keys, .. } => {
                let mut seen = HashSet::new();
                keys.iter()
                    .flatten()
                    .filter(|k| seen.insert(**k))
                    .take(limit)
                    .map(|k| k.to_string())
                    .collect()
            }
            Self::Categorical(values) => {
                let mut seen = HashSet::new();
                values
                    .iter()
                    .flatten()
                    .filter(|v| seen.insert(v.as_str()))
                    .take(limit)
                    .cloned()
                    .collect()
            }
            Self::Other { .. } => Vec::new(),
        }
    }
}

/// Read a series as numbers, or `None` if it is not numeric-interpretable.
///
/// A string column qualifies only if it has at least one value and every
/// non-missing value parses.
pub(crate) fn numeric_values(series: &Series) -> Result<Option<Vec<Option<f64>>>> {
    let dtype = series.dtype();

    if is_numeric_dtype(dtype) {
        let floats = series.cast(&DataType::Float64)?;
        let values = floats
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        return Ok(Some(values));
    }

    if dtype == &DataType::String {
        let mut values = Vec::with_capacity(series.len());
        let mut has_value = false;
        for raw in series.str()?.into_iter() {
            match raw {
                None => values.push(None),
                Some(raw) => match parse_numeric_string(raw) {
                    Some(x) if x.is_nan() => values.push(None),
                    Some(x) => {
                        has_value = true;
                        values.push(Some(x));
                    }
                    None => return Ok(None),
                },
            }
        }
        return Ok(has_value.then_some(values));
    }

    Ok(None)
}

/// Exact keys for a numeric column, aligned with `values` (same missing rows).
///
/// Integer dtypes and integer-looking strings are read without going
/// through `f64`.
fn numeric_keys(series: &Series, values: &[Option<f64>]) -> Result<Vec<Option<NumericKey>>> {
    let dtype = series.dtype();

    if dtype == &DataType::UInt64 {
        return Ok(series
            .u64()?
            .into_iter()
            .map(|v| v.map(|x| NumericKey::Int(i128::from(x))))
            .collect());
    }

    if dtype.is_integer() {
        let ints = series.cast(&DataType::Int64)?;
        return Ok(ints
            .i64()?
            .into_iter()
            .map(|v| v.map(|x| NumericKey::Int(i128::from(x))))
            .collect());
    }

    if dtype == &DataType::String {
        let keys = series
            .str()?
            .into_iter()
            .zip(values)
            .map(|(raw, value)| {
                let value = (*value)?;
                let exact = raw.and_then(|r| clean_numeric_string(r).parse::<i128>().ok());
                Some(exact.map_or_else(|| NumericKey::from_f64(value), NumericKey::Int))
            })
            .collect();
        return Ok(keys);
    }

    Ok(values.iter().map(|v| v.map(NumericKey::from_f64)).collect())
}

/// Render a label column as strings; booleans become `true`/`false`.
pub(crate) fn label_values(series: &Series) -> Result<Vec<Option<String>>> {
    let strings = series.cast(&DataType::String)?;
    Ok(strings
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}
