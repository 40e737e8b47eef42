use crate::error::{EdaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Column Profiling Types
// ============================================================================

/// Coarse classification of a column's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Every non-missing value is interpretable as a number.
    Numeric,
    /// Discrete labels: text, booleans, categorical dtypes.
    Categorical,
    /// Temporal, nested, binary or untyped columns.
    Other,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive statistics for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub non_missing_count: usize,
    pub missing_count: usize,
    /// missing_count / n_rows, 0.0 for an empty dataset.
    pub missing_share: f64,
    /// Number of distinct non-missing values.
    pub distinct_count: usize,
    /// True for numeric columns whose non-missing values are all whole numbers.
    pub integral: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// First few distinct non-missing values, in order of appearance.
    pub example_values: Vec<String>,
}

impl ColumnSummary {
    /// Share of non-missing values that are distinct (0.0 if the column is empty).
    pub fn unique_ratio(&self) -> f64 {
        if self.non_missing_count == 0 {
            0.0
        } else {
            self.distinct_count as f64 / self.non_missing_count as f64
        }
    }

    /// Number of non-missing values that repeat an earlier value.
    pub fn duplicate_count(&self) -> usize {
        self.non_missing_count.saturating_sub(self.distinct_count)
    }
}

/// Summary of a whole dataset, one [`ColumnSummary`] per input column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub n_rows: usize,
    pub n_cols: usize,
    /// Column summaries in input column order.
    pub columns: Vec<ColumnSummary>,
}

impl DatasetSummary {
    /// Look up a column summary by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Like [`column`](Self::column), but a missing name is an error.
    pub fn require_column(&self, name: &str) -> Result<&ColumnSummary> {
        self.column(name)
            .ok_or_else(|| EdaError::ColumnNotFound(name.to_string()))
    }

    /// Iterate over columns of the given kind.
    pub fn columns_of_kind(&self, kind: ColumnKind) -> impl Iterator<Item = &ColumnSummary> {
        self.columns.iter().filter(move |c| c.kind == kind)
    }
}

// ============================================================================
// Missingness Types
// ============================================================================

/// Missing-value statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingEntry {
    pub column: String,
    pub missing_count: usize,
    /// In [0, 1]; 0.0 when the dataset has no rows.
    pub missing_share: f64,
}

/// Per-column missing counts and shares, keyed by column name in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingTable {
    pub n_rows: usize,
    pub entries: Vec<MissingEntry>,
}

impl MissingTable {
    pub fn get(&self, column: &str) -> Option<&MissingEntry> {
        self.entries.iter().find(|e| e.column == column)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MissingEntry> {
        self.entries.iter()
    }

    /// Largest missing share over all columns (0.0 for an empty table).
    pub fn max_share(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.missing_share)
            .fold(0.0, f64::max)
    }

    /// Entries with a share at or above `min_share`, most missing first.
    pub fn above(&self, min_share: f64) -> Vec<&MissingEntry> {
        let mut selected: Vec<_> = self
            .entries
            .iter()
            .filter(|e| e.missing_count > 0 && e.missing_share >= min_share)
            .collect();
        selected.sort_by(|a, b| b.missing_count.cmp(&a.missing_count));
        selected
    }
}

// ============================================================================
// Category Frequency Types
// ============================================================================

/// A value and how many times it occurs in its column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Most frequent values of one categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCategoryTable {
    pub column: String,
    /// Sorted by count descending, ties in order of first appearance.
    pub entries: Vec<CategoryCount>,
}

impl TopCategoryTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&CategoryCount> {
        self.entries.first()
    }
}

/// Top-category tables for the selected categorical columns, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopCategories {
    pub tables: Vec<TopCategoryTable>,
}

impl TopCategories {
    pub fn get(&self, column: &str) -> Option<&TopCategoryTable> {
        self.tables.iter().find(|t| t.column == column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TopCategoryTable> {
        self.tables.iter()
    }
}

// ============================================================================
// Correlation Types
// ============================================================================

/// Pairwise Pearson correlations between numeric columns.
///
/// Symmetric with a unit diagonal. `None` marks pairs with fewer than two
/// complete observations or zero variance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

/// One off-diagonal cell of a [`CorrelationMatrix`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub left: String,
    pub right: String,
    pub coefficient: f64,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Correlation between two columns, if both are present and it is defined.
    pub fn get(&self, left: &str, right: &str) -> Option<f64> {
        let i = self.index_of(left)?;
        let j = self.index_of(right)?;
        self.values[i][j]
    }

    /// Defined off-diagonal pairs ordered by absolute coefficient, strongest first.
    pub fn strongest_pairs(&self, limit: usize) -> Vec<CorrelationPair> {
        let mut pairs = Vec::new();
        for i in 0..self.columns.len() {
            for j in (i + 1)..self.columns.len() {
                if let Some(coefficient) = self.values[i][j] {
                    pairs.push(CorrelationPair {
                        left: self.columns[i].clone(),
                        right: self.columns[j].clone(),
                        coefficient,
                    });
                }
            }
        }
        pairs.sort_by(|a, b| {
            b.coefficient
                .abs()
                .partial_cmp(&a.coefficient.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        pairs.truncate(limit);
        pairs
    }
}

// ============================================================================
// Quality Flag Types
// ============================================================================

/// Diagnostic flags that feed the composite quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityFlag {
    TooFewRows,
    TooManyMissing,
    HasConstantColumns,
    HasHighCardinalityCategoricals,
    HasSuspiciousIdDuplicates,
}

impl QualityFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TooFewRows => "too_few_rows",
            Self::TooManyMissing => "too_many_missing",
            Self::HasConstantColumns => "has_constant_columns",
            Self::HasHighCardinalityCategoricals => "has_high_cardinality_categoricals",
            Self::HasSuspiciousIdDuplicates => "has_suspicious_id_duplicates",
        }
    }
}

impl fmt::Display for QualityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the quality heuristics for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityFlags {
    pub too_few_rows: bool,
    pub too_many_missing: bool,
    pub has_constant_columns: bool,
    pub has_high_cardinality_categoricals: bool,
    pub has_suspicious_id_duplicates: bool,
    pub max_missing_share: f64,
    /// Composite score in [0, 1]; 1.0 means no flag fired.
    pub quality_score: f64,
    /// Flags that fired, in rule-table order.
    pub triggered: Vec<QualityFlag>,
    pub constant_columns: Vec<String>,
    pub high_cardinality_columns: Vec<String>,
    pub suspicious_id_columns: Vec<String>,
}

impl QualityFlags {
    pub fn is_set(&self, flag: QualityFlag) -> bool {
        self.triggered.contains(&flag)
    }
}

static_assertions::assert_impl_all!(DatasetSummary: Send, Sync);
static_assertions::assert_impl_all!(MissingTable: Send, Sync);
static_assertions::assert_impl_all!(QualityFlags: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, non_missing: usize, distinct: usize) -> ColumnSummary {
        ColumnSummary {
            name: name.to_string(),
            kind: ColumnKind::Numeric,
            non_missing_count: non_missing,
            missing_count: 0,
            missing_share: 0.0,
            distinct_count: distinct,
            integral: true,
            mean: None,
            min: None,
            max: None,
            example_values: vec![],
        }
    }

    #[test]
    fn test_column_lookup() {
        let summary = DatasetSummary {
            n_rows: 5,
            n_cols: 1,
            columns: vec![column("user_id", 5, 4)],
        };

        assert!(summary.column("user_id").is_some());
        assert_eq!(summary.require_column("user_id").unwrap().distinct_count, 4);
        let err = summary.require_column("city").unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
        assert_eq!(summary.columns_of_kind(ColumnKind::Numeric).count(), 1);
        assert_eq!(summary.columns_of_kind(ColumnKind::Categorical).count(), 0);
    }

    #[test]
    fn test_unique_ratio_and_duplicates() {
        let col = column("user_id", 5, 4);
        assert!((col.unique_ratio() - 0.8).abs() < 1e-12);
        assert_eq!(col.duplicate_count(), 1);

        let empty = column("empty", 0, 0);
        assert_eq!(empty.unique_ratio(), 0.0);
        assert_eq!(empty.duplicate_count(), 0);
    }

    #[test]
    fn test_missing_table_lookup_and_max_share() {
        let table = MissingTable {
            n_rows: 4,
            entries: vec![
                MissingEntry {
                    column: "age".to_string(),
                    missing_count: 1,
                    missing_share: 0.25,
                },
                MissingEntry {
                    column: "city".to_string(),
                    missing_count: 2,
                    missing_share: 0.5,
                },
            ],
        };

        assert_eq!(table.get("age").unwrap().missing_count, 1);
        assert!(table.get("height").is_none());
        assert_eq!(table.max_share(), 0.5);

        let above = table.above(0.3);
        assert_eq!(above.len(), 1);
        assert_eq!(above[0].column, "city");
    }

    #[test]
    fn test_strongest_pairs_ordering() {
        let matrix = CorrelationMatrix {
            columns: vec!["a".into(), "b".into(), "c".into()],
            values: vec![
                vec![Some(1.0), Some(0.2), Some(-0.9)],
                vec![Some(0.2), Some(1.0), None],
                vec![Some(-0.9), None, Some(1.0)],
            ],
        };

        let pairs = matrix.strongest_pairs(5);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].right, "c");
        assert_eq!(pairs[0].coefficient, -0.9);
        assert_eq!(matrix.get("b", "c"), None);
        assert_eq!(matrix.get("a", "b"), Some(0.2));
    }

    #[test]
    fn test_column_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ColumnKind::Categorical).unwrap();
        assert_eq!(json, "\"categorical\"");
        assert_eq!(
            QualityFlag::HasSuspiciousIdDuplicates.to_string(),
            "has_suspicious_id_duplicates"
        );
    }
}
