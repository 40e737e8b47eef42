//! Error types for the EDA passes.
//!
//! All passes are pure in-memory computations, so every error is surfaced to
//! the caller immediately. Errors serialize as `{code, message}` so a display
//! layer can report them without matching on variants.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// The main error type for dataset summarization.
#[derive(Error, Debug)]
pub enum EdaError {
    /// Input violates a precondition (no columns, duplicate names, zero caps).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Quality thresholds failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EdaError>,
    },
}

impl EdaError {
    /// Shorthand for a [`EdaError::Validation`] error.
    pub fn validation(message: impl Into<String>) -> Self {
        EdaError::Validation(message.into())
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EdaError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for callers that branch on the failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a precondition violation on the input.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::WithContext { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

impl Serialize for EdaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EdaError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for EDA operations.
pub type Result<T> = std::result::Result<T, EdaError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EdaError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            EdaError::validation("no columns").error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            EdaError::ColumnNotFound("age".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_is_validation() {
        assert!(EdaError::validation("top_k must be positive").is_validation());
        assert!(!EdaError::ColumnNotFound("x".to_string()).is_validation());
    }

    #[test]
    fn test_with_context_preserves_kind() {
        let error = EdaError::validation("duplicate column 'a'").with_context("While profiling");
        assert!(error.to_string().contains("While profiling"));
        assert_eq!(error.error_code(), "VALIDATION_ERROR");
        assert!(error.is_validation());
    }

    #[test]
    fn test_error_serialization() {
        let error = EdaError::ColumnNotFound("city".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("city"));
    }

    #[test]
    fn test_config_error_converts() {
        let error: EdaError = ConfigValidationError::InvalidMinimum {
            field: "min_rows".to_string(),
            value: 0,
        }
        .into();
        assert_eq!(error.error_code(), "INVALID_CONFIG");
    }
}
