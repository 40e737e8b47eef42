//! Shared helpers for the summarization passes.

use crate::error::{EdaError, Result};
use polars::prelude::*;
use std::collections::HashSet;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType holds discrete labels (text, booleans, categoricals).
#[inline]
pub fn is_label_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::String | DataType::Boolean | DataType::Categorical(..) | DataType::Enum(..)
    )
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Characters commonly used in numeric formatting that should be stripped.
pub const NUMERIC_FORMAT_CHARS: [char; 6] = [',', '$', '%', '€', '£', ' '];

/// Clean a string for numeric parsing by removing formatting characters.
///
/// # Example
///
/// ```rust
/// use eda_core::utils::clean_numeric_string;
///
/// assert_eq!(clean_numeric_string("$1,234.56"), "1234.56");
/// assert_eq!(clean_numeric_string("  42%  "), "42");
/// ```
pub fn clean_numeric_string(s: &str) -> String {
    let mut result = s.trim().to_string();
    for c in NUMERIC_FORMAT_CHARS {
        result = result.replace(c, "");
    }
    result
}

/// Try to parse a string as a numeric value (f64).
///
/// Handles common formatting like currency symbols, percentages, and thousands separators.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let cleaned = clean_numeric_string(s);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

// =============================================================================
// Arithmetic Utilities
// =============================================================================

/// `part / whole`, or 0.0 when `whole` is zero.
#[inline]
pub fn share(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

// =============================================================================
// Validation Utilities
// =============================================================================

/// Ensure there is at least one column and all names are unique.
pub fn validate_column_names<S: AsRef<str>>(names: &[S]) -> Result<()> {
    if names.is_empty() {
        return Err(EdaError::validation("dataset has no columns"));
    }

    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        if !seen.insert(name) {
            return Err(EdaError::validation(format!(
                "duplicate column name '{}'",
                name
            )));
        }
    }

    Ok(())
}

/// Validate a DataFrame's column layout before running a pass over it.
pub fn validate_dataframe(df: &DataFrame) -> Result<()> {
    let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
    validate_column_names(&names)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float32));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_is_label_dtype() {
        assert!(is_label_dtype(&DataType::String));
        assert!(is_label_dtype(&DataType::Boolean));
        assert!(!is_label_dtype(&DataType::Int32));
        assert!(!is_label_dtype(&DataType::Date));
    }

    #[test]
    fn test_parse_numeric_string() {
        assert_eq!(parse_numeric_string("42"), Some(42.0));
        assert_eq!(parse_numeric_string("$1,234.56"), Some(1234.56));
        assert_eq!(parse_numeric_string(" -7 "), Some(-7.0));
        assert_eq!(parse_numeric_string(""), None);
        assert_eq!(parse_numeric_string("A"), None);
    }

    #[test]
    fn test_share_handles_zero_denominator() {
        assert_eq!(share(1, 4), 0.25);
        assert_eq!(share(0, 0), 0.0);
        assert_eq!(share(3, 0), 0.0);
    }

    #[test]
    fn test_validate_column_names() {
        assert!(validate_column_names(&["a", "b"]).is_ok());

        let empty: [&str; 0] = [];
        let err = validate_column_names(&empty).unwrap_err();
        assert!(err.is_validation());

        let err = validate_column_names(&["a", "b", "a"]).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("'a'"));
    }

    #[test]
    fn test_validate_dataframe_rejects_empty() {
        let df = DataFrame::empty();
        assert!(validate_dataframe(&df).unwrap_err().is_validation());
    }
}
