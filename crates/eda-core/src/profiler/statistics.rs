//! Numeric statistics over extracted column values.

/// Mean, minimum and maximum over the non-missing values of a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NumericStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Compute [`NumericStats`], or `None` if every value is missing.
pub(crate) fn numeric_stats(values: &[Option<f64>]) -> Option<NumericStats> {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for v in values.iter().flatten() {
        count += 1;
        sum += v;
        min = min.min(*v);
        max = max.max(*v);
    }

    if count == 0 {
        return None;
    }

    Some(NumericStats {
        mean: sum / count as f64,
        min,
        max,
    })
}

/// True if at least one value is present and all present values are whole numbers.
pub(crate) fn is_integral(values: &[Option<f64>]) -> bool {
    let mut any = false;
    for v in values.iter().flatten() {
        if !v.is_finite() || v.fract() != 0.0 {
            return false;
        }
        any = true;
    }
    any
}
