use crate::config::QualityConfig;
use crate::types::{ColumnKind, ColumnSummary, DatasetSummary, MissingTable, QualityFlag, QualityFlags};
use tracing::debug;

use super::identifiers::is_identifier_like;

/// Rule table: every flag the engine can raise, in evaluation order.
pub const QUALITY_RULES: [QualityFlag; 5] = [
    QualityFlag::TooFewRows,
    QualityFlag::TooManyMissing,
    QualityFlag::HasConstantColumns,
    QualityFlag::HasHighCardinalityCategoricals,
    QualityFlag::HasSuspiciousIdDuplicates,
];

/// Column-level findings the rules are evaluated against.
#[derive(Debug, Default)]
struct Findings {
    max_missing_share: f64,
    constant_columns: Vec<String>,
    high_cardinality_columns: Vec<String>,
    suspicious_id_columns: Vec<String>,
}

/// Derives diagnostic flags and a composite score from a dataset summary.
///
/// Works only on [`DatasetSummary`] and [`MissingTable`]; it never looks at
/// raw data, so results are deterministic for identical inputs.
#[derive(Debug, Clone, Default)]
pub struct QualityFlagEngine {
    config: QualityConfig,
}

impl QualityFlagEngine {
    pub fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Evaluate all rules and compute the composite score.
    pub fn evaluate(&self, summary: &DatasetSummary, missing: &MissingTable) -> QualityFlags {
        let findings = self.collect_findings(summary, missing);

        let triggered: Vec<QualityFlag> = QUALITY_RULES
            .iter()
            .copied()
            .filter(|flag| self.is_triggered(*flag, summary, &findings))
            .collect();

        let deduction: f64 = triggered.iter().map(|flag| self.penalty(*flag)).sum();
        let quality_score = (1.0 - deduction).clamp(0.0, 1.0);

        debug!(
            "Quality flags: triggered={:?}, score={:.3}",
            triggered, quality_score
        );

        QualityFlags {
            too_few_rows: triggered.contains(&QualityFlag::TooFewRows),
            too_many_missing: triggered.contains(&QualityFlag::TooManyMissing),
            has_constant_columns: triggered.contains(&QualityFlag::HasConstantColumns),
            has_high_cardinality_categoricals: triggered
                .contains(&QualityFlag::HasHighCardinalityCategoricals),
            has_suspicious_id_duplicates: triggered
                .contains(&QualityFlag::HasSuspiciousIdDuplicates),
            max_missing_share: findings.max_missing_share,
            quality_score,
            triggered,
            constant_columns: findings.constant_columns,
            high_cardinality_columns: findings.high_cardinality_columns,
            suspicious_id_columns: findings.suspicious_id_columns,
        }
    }

    /// Score deduction for a flag.
    pub fn penalty(&self, flag: QualityFlag) -> f64 {
        let penalties = &self.config.penalties;
        match flag {
            QualityFlag::TooFewRows => penalties.too_few_rows,
            QualityFlag::TooManyMissing => penalties.too_many_missing,
            QualityFlag::HasConstantColumns => penalties.constant_columns,
            QualityFlag::HasHighCardinalityCategoricals => penalties.high_cardinality,
            QualityFlag::HasSuspiciousIdDuplicates => penalties.id_duplicates,
        }
    }

    fn is_triggered(&self, flag: QualityFlag, summary: &DatasetSummary, findings: &Findings) -> bool {
        match flag {
            QualityFlag::TooFewRows => summary.n_rows < self.config.min_rows,
            QualityFlag::TooManyMissing => {
                findings.max_missing_share > self.config.max_missing_share
            }
            QualityFlag::HasConstantColumns => !findings.constant_columns.is_empty(),
            QualityFlag::HasHighCardinalityCategoricals => {
                !findings.high_cardinality_columns.is_empty()
            }
            QualityFlag::HasSuspiciousIdDuplicates => !findings.suspicious_id_columns.is_empty(),
        }
    }

    fn collect_findings(&self, summary: &DatasetSummary, missing: &MissingTable) -> Findings {
        let mut findings = Findings {
            max_missing_share: missing.max_share(),
            ..Findings::default()
        };

        for column in &summary.columns {
            if column.non_missing_count > 0 && column.distinct_count <= 1 {
                findings.constant_columns.push(column.name.clone());
            }
            if self.is_high_cardinality(column, summary.n_rows) {
                findings.high_cardinality_columns.push(column.name.clone());
            }
            if self.has_suspicious_duplicates(column) {
                findings.suspicious_id_columns.push(column.name.clone());
            }
        }

        findings
    }

    /// Categorical columns, and integer columns that look like category codes.
    ///
    /// Identifier-like integer columns are keys, not codes.
    pub fn is_categorical_like(&self, column: &ColumnSummary) -> bool {
        match column.kind {
            ColumnKind::Categorical => true,
            ColumnKind::Numeric => {
                column.integral
                    && !is_identifier_like(&column.name)
                    && column.unique_ratio() <= self.config.coded_category_max_ratio
            }
            ColumnKind::Other => false,
        }
    }

    /// Absolute rule: `high_cardinality_min_distinct` labels at a uniqueness of
    /// at least `high_cardinality_min_share`. Relative rule: distinct / n_rows
    /// above `high_cardinality_ratio` once `min_rows` is reached.
    ///
    /// The uniqueness floor lets 20 codes in 100 rows through and keeps a
    /// 25-value vocabulary in a million rows out; a 25-value column in 200 rows
    /// is still flagged.
    fn is_high_cardinality(&self, column: &ColumnSummary, n_rows: usize) -> bool {
        if !self.is_categorical_like(column) {
            return false;
        }

        if column.distinct_count >= self.config.high_cardinality_min_distinct
            && column.unique_ratio() >= self.config.high_cardinality_min_share
        {
            return true;
        }

        n_rows >= self.config.min_rows
            && column.distinct_count as f64 / n_rows as f64 > self.config.high_cardinality_ratio
    }

    /// A near-unique identifier column that still has repeated values.
    ///
    /// Identifier columns with low uniqueness are foreign keys and repeat by
    /// nature, so they are not flagged.
    fn has_suspicious_duplicates(&self, column: &ColumnSummary) -> bool {
        is_identifier_like(&column.name)
            && column.duplicate_count() > 0
            && column.unique_ratio() >= self.config.id_near_unique_ratio
    }
}

/// Compute quality flags with the default thresholds.
pub fn compute_quality_flags(summary: &DatasetSummary, missing: &MissingTable) -> QualityFlags {
    QualityFlagEngine::default().evaluate(summary, missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FlagPenalties, QualityConfig};
    use crate::types::MissingEntry;

    fn column(name: &str, kind: ColumnKind, non_missing: usize, distinct: usize) -> ColumnSummary {
        ColumnSummary {
            name: name.to_string(),
            kind,
            non_missing_count: non_missing,
            missing_count: 0,
            missing_share: 0.0,
            distinct_count: distinct,
            integral: kind == ColumnKind::Numeric,
            mean: None,
            min: None,
            max: None,
            example_values: vec![],
        }
    }

    fn dataset(n_rows: usize, columns: Vec<ColumnSummary>) -> (DatasetSummary, MissingTable) {
        let entries = columns
            .iter()
            .map(|c| MissingEntry {
                column: c.name.clone(),
                missing_count: c.missing_count,
                missing_share: c.missing_share,
            })
            .collect();
        (
            DatasetSummary {
                n_rows,
                n_cols: columns.len(),
                columns,
            },
            MissingTable { n_rows, entries },
        )
    }

    #[test]
    fn test_clean_dataset_scores_one() {
        let (summary, missing) = dataset(
            100,
            vec![
                column("user_id", ColumnKind::Numeric, 100, 100),
                column("segment", ColumnKind::Categorical, 100, 4),
            ],
        );

        let flags = compute_quality_flags(&summary, &missing);

        assert!(flags.triggered.is_empty());
        assert_eq!(flags.quality_score, 1.0);
    }

    #[test]
    fn test_too_few_rows_alone() {
        let (summary, missing) = dataset(5, vec![column("x", ColumnKind::Numeric, 5, 3)]);

        let flags = compute_quality_flags(&summary, &missing);

        assert!(flags.too_few_rows);
        assert_eq!(flags.triggered, vec![QualityFlag::TooFewRows]);
        assert!(flags.quality_score < 1.0);
        assert!((flags.quality_score - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_high_cardinality_and_id_duplicates_score_half() {
        let (summary, missing) = dataset(
            100,
            vec![
                column("user_id", ColumnKind::Numeric, 100, 99),
                column("col1", ColumnKind::Numeric, 100, 20),
            ],
        );

        let flags = compute_quality_flags(&summary, &missing);

        assert!(!flags.too_few_rows);
        assert!(flags.has_high_cardinality_categoricals);
        assert!(flags.has_suspicious_id_duplicates);
        assert_eq!(flags.quality_score, 0.5);
        assert_eq!(flags.high_cardinality_columns, vec!["col1".to_string()]);
        assert_eq!(flags.suspicious_id_columns, vec!["user_id".to_string()]);
    }

    #[test]
    fn test_id_duplicate_ratio_threshold() {
        let engine = QualityFlagEngine::default();

        // [1, 2, 3, 4, 4]: 4 distinct of 5
        let near_unique = column("user_id", ColumnKind::Numeric, 5, 4);
        assert!(engine.has_suspicious_duplicates(&near_unique));

        // [1, 1, 2, 2, 3, 4]: 4 distinct of 6, a repeating foreign key
        let foreign_key = column("user_id", ColumnKind::Numeric, 6, 4);
        assert!(!engine.has_suspicious_duplicates(&foreign_key));

        let unique = column("user_id", ColumnKind::Numeric, 6, 6);
        assert!(!engine.has_suspicious_duplicates(&unique));

        let not_an_id = column("width", ColumnKind::Numeric, 5, 4);
        assert!(!engine.has_suspicious_duplicates(&not_an_id));
    }

    #[test]
    fn test_categorical_ratio_rule_needs_enough_rows() {
        let engine = QualityFlagEngine::default();
        let names = column("name", ColumnKind::Categorical, 5, 5);

        assert!(!engine.is_high_cardinality(&names, 5));
        let names = column("name", ColumnKind::Categorical, 12, 12);
        assert!(engine.is_high_cardinality(&names, 12));
    }

    #[test]
    fn test_small_vocabulary_in_long_table_is_not_high_cardinality() {
        let engine = QualityFlagEngine::default();

        let country = column("country", ColumnKind::Categorical, 1_000_000, 25);
        assert!(!engine.is_high_cardinality(&country, 1_000_000));

        let codes = column("col1", ColumnKind::Numeric, 100, 20);
        assert!(engine.is_high_cardinality(&codes, 100));

        let (summary, missing) = dataset(1_000_000, vec![country]);
        let flags = compute_quality_flags(&summary, &missing);
        assert!(!flags.has_high_cardinality_categoricals);
        assert_eq!(flags.quality_score, 1.0);
    }

    #[test]
    fn test_float_columns_are_not_categorical_like() {
        let engine = QualityFlagEngine::default();
        let mut measure = column("height", ColumnKind::Numeric, 100, 40);
        measure.integral = false;

        assert!(!engine.is_categorical_like(&measure));
        assert!(!engine.is_high_cardinality(&measure, 100));
    }

    #[test]
    fn test_near_unique_integers_are_not_codes() {
        let engine = QualityFlagEngine::default();
        let counts = column("visits", ColumnKind::Numeric, 100, 95);

        assert!(!engine.is_categorical_like(&counts));
    }

    #[test]
    fn test_too_many_missing_and_constant_columns() {
        let mut sparse = column("notes", ColumnKind::Categorical, 3, 1);
        sparse.missing_count = 9;
        sparse.missing_share = 0.75;
        let (summary, missing) = dataset(12, vec![sparse, column("x", ColumnKind::Numeric, 12, 6)]);

        let flags = compute_quality_flags(&summary, &missing);

        assert!(flags.too_many_missing);
        assert!(flags.has_constant_columns);
        assert_eq!(flags.constant_columns, vec!["notes".to_string()]);
        assert_eq!(flags.max_missing_share, 0.75);
        assert!((flags.quality_score - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_all_flags_clamp_to_zero() {
        let penalties = FlagPenalties {
            too_few_rows: 0.5,
            too_many_missing: 0.5,
            constant_columns: 0.5,
            high_cardinality: 0.5,
            id_duplicates: 0.5,
        };
        let config = QualityConfig::builder()
            .penalties(penalties)
            .high_cardinality_min_distinct(2)
            .build()
            .unwrap();
        let engine = QualityFlagEngine::new(config);

        let mut sparse = column("notes", ColumnKind::Categorical, 1, 1);
        sparse.missing_count = 4;
        sparse.missing_share = 0.8;
        let (summary, missing) = dataset(
            5,
            vec![
                sparse,
                column("order_id", ColumnKind::Numeric, 5, 4),
                column("tag", ColumnKind::Categorical, 5, 3),
            ],
        );

        let flags = engine.evaluate(&summary, &missing);

        assert_eq!(flags.triggered.len(), QUALITY_RULES.len());
        assert_eq!(flags.quality_score, 0.0);
    }

    #[test]
    fn test_empty_dataset_is_defined() {
        let (summary, missing) = dataset(0, vec![column("a", ColumnKind::Numeric, 0, 0)]);

        let flags = compute_quality_flags(&summary, &missing);

        assert!(flags.too_few_rows);
        assert!(!flags.has_constant_columns);
        assert_eq!(flags.max_missing_share, 0.0);
        assert!((flags.quality_score - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_rule_order_is_stable() {
        let (summary, missing) = dataset(
            3,
            vec![
                column("id", ColumnKind::Numeric, 3, 2),
                column("k", ColumnKind::Categorical, 3, 1),
            ],
        );

        let flags = compute_quality_flags(&summary, &missing);

        assert_eq!(
            flags.triggered,
            vec![QualityFlag::TooFewRows, QualityFlag::HasConstantColumns]
        );
        assert!(flags.is_set(QualityFlag::HasConstantColumns));
    }
}
