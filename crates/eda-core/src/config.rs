//! Thresholds and penalties for the quality flag engine.
//!
//! Every default is exported as a named constant so it can be referenced in
//! tests and tuned independently. Use [`QualityConfig::builder()`] to override
//! individual values; `build()` validates the result.

use serde::{Deserialize, Serialize};

/// Datasets with fewer rows than this are flagged `too_few_rows`.
pub const DEFAULT_MIN_ROWS: usize = 10;

/// A categorical-like column with at least this many distinct values is high-cardinality.
pub const DEFAULT_HIGH_CARDINALITY_MIN_DISTINCT: usize = 20;

/// The absolute distinct-count rule only applies at or above this uniqueness
/// (distinct / non-missing), so a small fixed vocabulary in a long table is
/// not flagged.
pub const DEFAULT_HIGH_CARDINALITY_MIN_SHARE: f64 = 0.1;

/// distinct / n_rows above this marks a categorical column as near-unique.
pub const DEFAULT_HIGH_CARDINALITY_RATIO: f64 = 0.8;

/// Integer columns with distinct / non-missing at or below this are treated as category codes.
pub const DEFAULT_CODED_CATEGORY_MAX_RATIO: f64 = 0.7;

/// Identifier-like columns at or above this uniqueness are expected to be keys.
pub const DEFAULT_ID_NEAR_UNIQUE_RATIO: f64 = 0.8;

/// A column missing more than this share of its values triggers `too_many_missing`.
pub const DEFAULT_MAX_MISSING_SHARE: f64 = 0.5;

/// Score penalty for `too_few_rows`.
///
/// Nonzero, so a dataset below `min_rows` never scores a clean 1.0 even when
/// no other flag fires. A zero penalty would let `too_few_rows` stand alone
/// without affecting the score; the two readings conflict, and this crate
/// follows the one where every triggered flag lowers the score.
pub const PENALTY_TOO_FEW_ROWS: f64 = 0.2;

/// Score penalty for `too_many_missing`.
pub const PENALTY_TOO_MANY_MISSING: f64 = 0.2;

/// Score penalty for `has_constant_columns`.
pub const PENALTY_CONSTANT_COLUMNS: f64 = 0.1;

/// Score penalty for `has_high_cardinality_categoricals`.
pub const PENALTY_HIGH_CARDINALITY: f64 = 0.25;

/// Score penalty for `has_suspicious_id_duplicates`.
pub const PENALTY_ID_DUPLICATES: f64 = 0.25;

/// Configuration for [`crate::quality::QualityFlagEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Minimum row count before a dataset is considered analyzable.
    /// Default: 10
    pub min_rows: usize,

    /// Absolute distinct count that makes a categorical-like column high-cardinality.
    /// Default: 20
    pub high_cardinality_min_distinct: usize,

    /// Minimum uniqueness (distinct / non-missing) for the absolute distinct
    /// rule to apply. Trades recall on short tables for fewer false positives
    /// on long ones: 20 codes in 100 rows (0.2) still count, 25 countries in
    /// a million rows do not.
    /// Default: 0.1
    pub high_cardinality_min_share: f64,

    /// Relative distinct count (distinct / n_rows) that makes a categorical column
    /// high-cardinality. Only applied once `min_rows` is reached.
    /// Default: 0.8
    pub high_cardinality_ratio: f64,

    /// Maximum uniqueness for an integer column to count as coded categories.
    /// Default: 0.7
    pub coded_category_max_ratio: f64,

    /// Minimum uniqueness for an identifier-like column to be treated as a key.
    /// Default: 0.8
    pub id_near_unique_ratio: f64,

    /// Largest acceptable per-column missing share.
    /// Default: 0.5
    pub max_missing_share: f64,

    /// Per-rule score deductions.
    pub penalties: FlagPenalties,
}

/// Score deductions applied for each triggered flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlagPenalties {
    pub too_few_rows: f64,
    pub too_many_missing: f64,
    pub constant_columns: f64,
    pub high_cardinality: f64,
    pub id_duplicates: f64,
}

impl Default for FlagPenalties {
    fn default() -> Self {
        Self {
            too_few_rows: PENALTY_TOO_FEW_ROWS,
            too_many_missing: PENALTY_TOO_MANY_MISSING,
            constant_columns: PENALTY_CONSTANT_COLUMNS,
            high_cardinality: PENALTY_HIGH_CARDINALITY,
            id_duplicates: PENALTY_ID_DUPLICATES,
        }
    }
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_rows: DEFAULT_MIN_ROWS,
            high_cardinality_min_distinct: DEFAULT_HIGH_CARDINALITY_MIN_DISTINCT,
            high_cardinality_min_share: DEFAULT_HIGH_CARDINALITY_MIN_SHARE,
            high_cardinality_ratio: DEFAULT_HIGH_CARDINALITY_RATIO,
            coded_category_max_ratio: DEFAULT_CODED_CATEGORY_MAX_RATIO,
            id_near_unique_ratio: DEFAULT_ID_NEAR_UNIQUE_RATIO,
            max_missing_share: DEFAULT_MAX_MISSING_SHARE,
            penalties: FlagPenalties::default(),
        }
    }
}

impl QualityConfig {
    /// Create a new configuration builder.
    pub fn builder() -> QualityConfigBuilder {
        QualityConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.min_rows == 0 {
            return Err(ConfigValidationError::InvalidMinimum {
                field: "min_rows".to_string(),
                value: self.min_rows,
            });
        }

        if self.high_cardinality_min_distinct == 0 {
            return Err(ConfigValidationError::InvalidMinimum {
                field: "high_cardinality_min_distinct".to_string(),
                value: self.high_cardinality_min_distinct,
            });
        }

        let ratios = [
            ("high_cardinality_min_share", self.high_cardinality_min_share),
            ("high_cardinality_ratio", self.high_cardinality_ratio),
            ("coded_category_max_ratio", self.coded_category_max_ratio),
            ("id_near_unique_ratio", self.id_near_unique_ratio),
            ("max_missing_share", self.max_missing_share),
        ];
        for (field, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        let penalties = [
            ("too_few_rows", self.penalties.too_few_rows),
            ("too_many_missing", self.penalties.too_many_missing),
            ("constant_columns", self.penalties.constant_columns),
            ("high_cardinality", self.penalties.high_cardinality),
            ("id_duplicates", self.penalties.id_duplicates),
        ];
        for (field, value) in penalties {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidPenalty {
                    field: field.to_string(),
                    value,
                });
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid penalty for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidPenalty { field: String, value: f64 },

    #[error("Invalid value for '{field}': {value} (must be at least 1)")]
    InvalidMinimum { field: String, value: usize },
}

/// Builder for [`QualityConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct QualityConfigBuilder {
    min_rows: Option<usize>,
    high_cardinality_min_distinct: Option<usize>,
    high_cardinality_min_share: Option<f64>,
    high_cardinality_ratio: Option<f64>,
    coded_category_max_ratio: Option<f64>,
    id_near_unique_ratio: Option<f64>,
    max_missing_share: Option<f64>,
    penalties: Option<FlagPenalties>,
}

impl QualityConfigBuilder {
    /// Set the minimum number of rows for a dataset to be analyzable.
    pub fn min_rows(mut self, rows: usize) -> Self {
        self.min_rows = Some(rows);
        self
    }

    /// Set the absolute distinct count that marks a high-cardinality column.
    pub fn high_cardinality_min_distinct(mut self, distinct: usize) -> Self {
        self.high_cardinality_min_distinct = Some(distinct);
        self
    }

    /// Set the uniqueness floor for the absolute distinct-count rule.
    pub fn high_cardinality_min_share(mut self, share: f64) -> Self {
        self.high_cardinality_min_share = Some(share);
        self
    }

    /// Set the distinct / n_rows ratio that marks a near-unique categorical column.
    ///
    /// # Arguments
    /// * `ratio` - Value between 0.0 and 1.0
    pub fn high_cardinality_ratio(mut self, ratio: f64) -> Self {
        self.high_cardinality_ratio = Some(ratio);
        self
    }

    /// Set the uniqueness ceiling for integer columns treated as category codes.
    pub fn coded_category_max_ratio(mut self, ratio: f64) -> Self {
        self.coded_category_max_ratio = Some(ratio);
        self
    }

    /// Set the uniqueness floor for identifier-like columns to be checked for duplicates.
    pub fn id_near_unique_ratio(mut self, ratio: f64) -> Self {
        self.id_near_unique_ratio = Some(ratio);
        self
    }

    /// Set the largest acceptable per-column missing share.
    pub fn max_missing_share(mut self, share: f64) -> Self {
        self.max_missing_share = Some(share);
        self
    }

    /// Replace all score penalties.
    pub fn penalties(mut self, penalties: FlagPenalties) -> Self {
        self.penalties = Some(penalties);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `QualityConfig` or an error if validation fails.
    pub fn build(self) -> Result<QualityConfig, ConfigValidationError> {
        let config = QualityConfig {
            min_rows: self.min_rows.unwrap_or(DEFAULT_MIN_ROWS),
            high_cardinality_min_distinct: self
                .high_cardinality_min_distinct
                .unwrap_or(DEFAULT_HIGH_CARDINALITY_MIN_DISTINCT),
            high_cardinality_min_share: self
                .high_cardinality_min_share
                .unwrap_or(DEFAULT_HIGH_CARDINALITY_MIN_SHARE),
            high_cardinality_ratio: self
                .high_cardinality_ratio
                .unwrap_or(DEFAULT_HIGH_CARDINALITY_RATIO),
            coded_category_max_ratio: self
                .coded_category_max_ratio
                .unwrap_or(DEFAULT_CODED_CATEGORY_MAX_RATIO),
            id_near_unique_ratio: self
                .id_near_unique_ratio
                .unwrap_or(DEFAULT_ID_NEAR_UNIQUE_RATIO),
            max_missing_share: self.max_missing_share.unwrap_or(DEFAULT_MAX_MISSING_SHARE),
            penalties: self.penalties.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
