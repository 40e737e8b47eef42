use crate::categories::top_categories;
use crate::config::QualityConfig;
use crate::correlation::correlation_matrix;
use crate::error::{Result, ResultExt};
use crate::missing::missing_table;
use crate::profiler::summarize_dataset;
use crate::quality::QualityFlagEngine;
use crate::types::{
    CorrelationMatrix, DatasetSummary, MissingTable, QualityFlags, TopCategories,
};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// Report Options
// ============================================================================

/// Parameters controlling what goes into an [`EdaReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Heading of the Markdown report.
    pub title: String,
    /// Maximum number of categorical columns with top-value tables.
    pub max_category_columns: usize,
    /// Rows per top-value table.
    pub top_k: usize,
    /// Only columns missing at least this share are listed in the missing section.
    pub min_missing_share: f64,
    /// Number of strongest correlation pairs listed.
    pub max_correlation_pairs: usize,
    /// Thresholds for the quality flags.
    pub quality: QualityConfig,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "EDA report".to_string(),
            max_category_columns: 5,
            top_k: 5,
            min_missing_share: 0.1,
            max_correlation_pairs: 5,
            quality: QualityConfig::default(),
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// Every EDA pass over one dataset, bundled for output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub title: String,
    pub summary: DatasetSummary,
    pub missing: MissingTable,
    pub correlation: CorrelationMatrix,
    pub top_categories: TopCategories,
    pub quality: QualityFlags,
    #[serde(skip)]
    options: ReportOptions,
}

impl EdaReport {
    /// Run all passes over `df`.
    pub fn build(df: &DataFrame, options: &ReportOptions) -> Result<Self> {
        options.quality.validate()?;

        let summary = summarize_dataset(df).context("While summarizing dataset")?;
        let missing = missing_table(df).context("While computing missing values")?;
        let correlation = correlation_matrix(df).context("While computing correlations")?;
        let top_categories = top_categories(df, options.max_category_columns, options.top_k)
            .context("While computing top categories")?;
        let quality = QualityFlagEngine::new(options.quality.clone()).evaluate(&summary, &missing);

        debug!(
            "Report built: {} rows, {} columns, quality score {:.2}",
            summary.n_rows, summary.n_cols, quality.quality_score
        );

        Ok(Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            title: options.title.clone(),
            summary,
            missing,
            correlation,
            top_categories,
            quality,
            options: options.clone(),
        })
    }

    /// Render the report as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let summary = &self.summary;
        let quality = &self.quality;

        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("Generated: {}\n\n", self.generated_at));
        out.push_str(&format!(
            "Rows: **{}**, columns: **{}**\n\n",
            summary.n_rows, summary.n_cols
        ));

        out.push_str("## Data quality\n\n");
        out.push_str(&format!(
            "- Quality score: **{:.2}**\n",
            quality.quality_score
        ));
        out.push_str(&format!(
            "- Max missing share: **{:.2}%**\n",
            quality.max_missing_share * 100.0
        ));
        out.push_str(&format!("- Too few rows: **{}**\n", quality.too_few_rows));
        out.push_str(&format!(
            "- Too many missing values: **{}**\n",
            quality.too_many_missing
        ));
        out.push_str(&format!(
            "- Constant columns: **{}**{}\n",
            quality.has_constant_columns,
            column_list(&quality.constant_columns)
        ));
        out.push_str(&format!(
            "- High-cardinality categoricals: **{}**{}\n",
            quality.has_high_cardinality_categoricals,
            column_list(&quality.high_cardinality_columns)
        ));
        out.push_str(&format!(
            "- Suspicious id duplicates: **{}**{}\n\n",
            quality.has_suspicious_id_duplicates,
            column_list(&quality.suspicious_id_columns)
        ));

        out.push_str("## Columns\n\n");
        out.push_str("| name | kind | missing | missing % | distinct | mean | min | max |\n");
        out.push_str("|---|---|---|---|---|---|---|---|\n");
        for col in &summary.columns {
            out.push_str(&format!(
                "| {} | {} | {} | {:.1} | {} | {} | {} | {} |\n",
                col.name,
                col.kind,
                col.missing_count,
                col.missing_share * 100.0,
                col.distinct_count,
                format_optional(col.mean),
                format_optional(col.min),
                format_optional(col.max),
            ));
        }
        out.push('\n');

        out.push_str("## Missing values\n\n");
        let missing = self.missing.above(self.options.min_missing_share);
        if missing.is_empty() {
            out.push_str(&format!(
                "No columns missing at least {:.0}% of values.\n\n",
                self.options.min_missing_share * 100.0
            ));
        } else {
            for entry in missing {
                out.push_str(&format!(
                    "- {}: {} ({:.1}%)\n",
                    entry.column,
                    entry.missing_count,
                    entry.missing_share * 100.0
                ));
            }
            out.push('\n');
        }

        out.push_str("## Correlation\n\n");
        let pairs = self
            .correlation
            .strongest_pairs(self.options.max_correlation_pairs);
        if pairs.is_empty() {
            out.push_str("Not enough numeric columns for correlation.\n\n");
        } else {
            for pair in pairs {
                out.push_str(&format!(
                    "- {} ~ {}: {:.3}\n",
                    pair.left, pair.right, pair.coefficient
                ));
            }
            out.push('\n');
        }

        out.push_str("## Top categories\n\n");
        if self.top_categories.is_empty() {
            out.push_str("No categorical columns.\n");
        } else {
            for table in self.top_categories.iter() {
                out.push_str(&format!("### {}\n\n", table.column));
                for entry in &table.entries {
                    out.push_str(&format!("- {}: {}\n", entry.value, entry.count));
                }
                out.push('\n');
            }
        }

        out
    }

    /// Write `report.md`, `report.json` and CSV tables into `dir`.
    ///
    /// Returns the paths written.
    pub fn write_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::new();

        let markdown_path = dir.join("report.md");
        File::create(&markdown_path)?.write_all(self.to_markdown().as_bytes())?;
        written.push(markdown_path);

        let json_path = dir.join("report.json");
        let json = serde_json::to_string_pretty(self)?;
        File::create(&json_path)?.write_all(json.as_bytes())?;
        written.push(json_path);

        let mut summary_df = flatten_summary(&self.summary)?;
        written.push(write_csv(&mut summary_df, &dir.join("summary.csv"))?);

        let mut missing_df = missing_frame(&self.missing)?;
        written.push(write_csv(&mut missing_df, &dir.join("missing.csv"))?);

        if !self.correlation.is_empty() {
            let mut corr_df = correlation_frame(&self.correlation)?;
            written.push(write_csv(&mut corr_df, &dir.join("correlation.csv"))?);
        }

        info!("Report saved: {}", dir.display());
        Ok(written)
    }
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<PathBuf> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .context(format!("Failed to write {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(path.to_path_buf())
}

fn column_list(columns: &[String]) -> String {
    if columns.is_empty() {
        String::new()
    } else {
        format!(" ({})", columns.join(", "))
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map(|v| format!("{:.3}", v)).unwrap_or_default()
}

// ============================================================================
// Display Tables
// ============================================================================

/// Flatten a dataset summary into one display row per column.
pub fn flatten_summary(summary: &DatasetSummary) -> Result<DataFrame> {
    let columns = &summary.columns;

    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    let kinds: Vec<&str> = columns.iter().map(|c| c.kind.as_str()).collect();
    let non_missing: Vec<u64> = columns.iter().map(|c| c.non_missing_count as u64).collect();
    let missing: Vec<u64> = columns.iter().map(|c| c.missing_count as u64).collect();
    let shares: Vec<f64> = columns.iter().map(|c| c.missing_share).collect();
    let distinct: Vec<u64> = columns.iter().map(|c| c.distinct_count as u64).collect();
    let means: Vec<Option<f64>> = columns.iter().map(|c| c.mean).collect();
    let mins: Vec<Option<f64>> = columns.iter().map(|c| c.min).collect();
    let maxs: Vec<Option<f64>> = columns.iter().map(|c| c.max).collect();
    let examples: Vec<String> = columns.iter().map(|c| c.example_values.join(", ")).collect();

    let df = DataFrame::new(vec![
        Column::new("name".into(), names),
        Column::new("kind".into(), kinds),
        Column::new("non_missing".into(), non_missing),
        Column::new("missing_count".into(), missing),
        Column::new("missing_share".into(), shares),
        Column::new("distinct_count".into(), distinct),
        Column::new("mean".into(), means),
        Column::new("min".into(), mins),
        Column::new("max".into(), maxs),
        Column::new("example_values".into(), examples),
    ])?;

    Ok(df)
}

/// Missing table as a DataFrame with `column`, `missing_count`, `missing_share`.
pub fn missing_frame(missing: &MissingTable) -> Result<DataFrame> {
    let columns: Vec<&str> = missing.iter().map(|e| e.column.as_str()).collect();
    let counts: Vec<u64> = missing.iter().map(|e| e.missing_count as u64).collect();
    let shares: Vec<f64> = missing.iter().map(|e| e.missing_share).collect();

    Ok(DataFrame::new(vec![
        Column::new("column".into(), columns),
        Column::new("missing_count".into(), counts),
        Column::new("missing_share".into(), shares),
    ])?)
}

/// Correlation matrix as a DataFrame: a `column` label column plus one column per variable.
pub fn correlation_frame(matrix: &CorrelationMatrix) -> Result<DataFrame> {
    let mut frame_columns = Vec::with_capacity(matrix.len() + 1);
    let labels: Vec<&str> = matrix.columns.iter().map(String::as_str).collect();
    frame_columns.push(Column::new("column".into(), labels));

    for (j, name) in matrix.columns.iter().enumerate() {
        let values: Vec<Option<f64>> = matrix.values.iter().map(|row| row[j]).collect();
        frame_columns.push(Column::new(name.as_str().into(), values));
    }

    Ok(DataFrame::new(frame_columns)?)
}
