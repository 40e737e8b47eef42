//! Pairwise Pearson correlation between numeric columns.
//!
//! Each pair uses only the rows where both columns are present, so a missing
//! value in one column never removes a row from an unrelated pair.

use crate::error::Result;
use crate::profiler::numeric_values;
use crate::types::CorrelationMatrix;
use crate::utils::validate_dataframe;
use polars::prelude::*;
use tracing::debug;

/// Relative tolerance below which a variance is rounding noise.
const VARIANCE_EPSILON: f64 = 4.0 * f64::EPSILON;

/// Co-moments of one column pair, centred on the pair means.
#[derive(Debug, Default, Clone, Copy)]
struct CoMoments {
    sxx: f64,
    syy: f64,
    sxy: f64,
}

impl CoMoments {
    fn add(&mut self, dx: f64, dy: f64) {
        self.sxx += dx * dx;
        self.syy += dy * dy;
        self.sxy += dx * dy;
    }
}

/// Mean computed relative to the first value so large offsets stay out of the sum.
fn shifted_mean(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let mut iter = values.clone();
    let Some(origin) = iter.next() else {
        return 0.0;
    };
    let (count, sum) = values.fold((0usize, 0.0), |(c, s), v| (c + 1, s + (v - origin)));
    origin + sum / count as f64
}

/// True if `sum_sq` is within rounding noise of zero for values around `mean`.
fn is_negligible(sum_sq: f64, mean: f64, n: f64) -> bool {
    let noise = VARIANCE_EPSILON * mean.abs();
    sum_sq <= n * noise * noise
}

/// Pearson correlation between two value vectors over pairwise-complete rows.
///
/// `None` with fewer than two complete rows or when either side has zero
/// variance.
pub(crate) fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let (x0, y0) = pairs[0];
    if pairs.iter().all(|&(a, _)| a == x0) || pairs.iter().all(|&(_, b)| b == y0) {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = shifted_mean(pairs.iter().map(|p| p.0));
    let mean_y = shifted_mean(pairs.iter().map(|p| p.1));

    let mut moments = CoMoments::default();
    for &(a, b) in &pairs {
        moments.add(a - mean_x, b - mean_y);
    }

    if is_negligible(moments.sxx, mean_x, n) || is_negligible(moments.syy, mean_y, n) {
        return None;
    }

    Some((moments.sxy / (moments.sxx * moments.syy).sqrt()).clamp(-1.0, 1.0))
}

/// Compute the correlation matrix over all numeric columns.
///
/// Returns an empty matrix when fewer than two numeric columns exist.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    validate_dataframe(df)?;

    let mut columns = Vec::new();
    let mut series_values = Vec::new();
    for column in df.get_columns() {
        let series = column.as_materialized_series();
        if let Some(values) = numeric_values(series)? {
            columns.push(series.name().to_string());
            series_values.push(values);
        }
    }

    if columns.len() < 2 {
        debug!(
            "Correlation skipped: {} numeric column(s) found",
            columns.len()
        );
        return Ok(CorrelationMatrix::default());
    }

    let k = columns.len();
    let mut values = vec![vec![None; k]; k];
    for i in 0..k {
        values[i][i] = Some(1.0);
        for j in (i + 1)..k {
            let r = pearson(&series_values[i], &series_values[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    debug!("Correlation matrix computed over {} numeric columns", k);

    Ok(CorrelationMatrix { columns, values })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_positive_correlation_with_missing() {
        let df = df![
            "age" => [Some(10i64), Some(20), Some(30), None],
            "height" => [140i64, 150, 160, 170],
            "city" => [Some("A"), Some("B"), Some("A"), None],
        ]
        .unwrap();

        let corr = correlation_matrix(&df).unwrap();

        assert_eq!(corr.columns, vec!["age".to_string(), "height".to_string()]);
        let r = corr.get("age", "height").unwrap();
        assert!((r - 1.0).abs() < 1e-9);
        assert_eq!(corr.get("city", "age"), None);
    }

    #[test]
    fn test_negative_correlation() {
        let df = df!["x" => [1.0f64, 2.0, 3.0, 4.0], "y" => [8.0f64, 6.0, 4.0, 2.0]].unwrap();
        let corr = correlation_matrix(&df).unwrap();

        assert!((corr.get("x", "y").unwrap() + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric_with_unit_diagonal() {
        let df = df![
            "a" => [1.0f64, 2.0, 3.0, 5.0],
            "b" => [2.0f64, 1.0, 4.0, 3.0],
            "c" => [9.0f64, 7.0, 8.0, 1.0],
        ]
        .unwrap();
        let corr = correlation_matrix(&df).unwrap();

        for i in 0..corr.len() {
            assert_eq!(corr.values[i][i], Some(1.0));
            for j in 0..corr.len() {
                assert_eq!(corr.values[i][j], corr.values[j][i]);
            }
        }
    }

    #[test]
    fn test_fewer_than_two_numeric_columns_is_empty() {
        let df = df!["x" => [1i32, 2, 3], "label" => ["a", "b", "c"]].unwrap();
        let corr = correlation_matrix(&df).unwrap();

        assert!(corr.is_empty());
        assert!(corr.values.is_empty());
    }

    #[test]
    fn test_constant_column_is_undefined() {
        let df = df!["x" => [1.0f64, 2.0, 3.0], "k" => [5.0f64, 5.0, 5.0]].unwrap();
        let corr = correlation_matrix(&df).unwrap();

        assert_eq!(corr.get("x", "k"), None);
        assert_eq!(corr.get("k", "k"), Some(1.0));
    }

    #[test]
    fn test_pearson_pairwise_complete() {
        let x = [Some(1.0), None, Some(3.0), Some(4.0)];
        let y = [Some(2.0), Some(100.0), Some(6.0), None];
        // complete rows: (1, 2) and (3, 6)
        assert!((pearson(&x, &y).unwrap() - 1.0).abs() < 1e-9);

        let single = [Some(1.0), None];
        assert_eq!(pearson(&single, &[Some(1.0), Some(2.0)]), None);
    }

    #[test]
    fn test_inexact_constant_is_undefined() {
        // 0.1 has no exact binary form; its sums must not leave a residual variance
        let df = df![
            "k" => [0.1f64; 7],
            "y" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0],
        ]
        .unwrap();
        let corr = correlation_matrix(&df).unwrap();

        assert_eq!(corr.get("k", "y"), None);
        assert_eq!(corr.get("y", "k"), None);
    }

    #[test]
    fn test_large_offset_keeps_correlation() {
        let x: Vec<f64> = (0..100).map(|i| 1e9 + (i % 7) as f64 * 0.001).collect();
        let y: Vec<f64> = (0..100).map(|i| (i % 7) as f64).collect();
        let df = df!["x" => x, "y" => y].unwrap();

        let r = correlation_matrix(&df).unwrap().get("x", "y").unwrap();
        assert!((r - 1.0).abs() < 1e-6, "r = {}", r);
    }

    #[test]
    fn test_wide_integer_ids_correlate() {
        let ids: Vec<i64> = (0..20).map(|i| 1_700_000_000_000_000_001i64 + i * 1_000_000).collect();
        let rank: Vec<i64> = (0..20).collect();
        let df = df!["order_id" => ids, "rank" => rank].unwrap();

        let r = correlation_matrix(&df).unwrap().get("order_id", "rank").unwrap();
        assert!((r - 1.0).abs() < 1e-6, "r = {}", r);
    }
}
