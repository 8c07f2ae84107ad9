//! Descriptive helpers shared by the statistics.

use crate::error::{Error, Result};

/// Arithmetic mean. `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with the `n - 1` denominator. `NaN` below two values.
pub fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64
}

/// Sample standard deviation.
pub fn sample_std(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// z-scores: `(x - mean) / sample_std`.
///
/// Fails when there are fewer than two values or the values are constant.
pub fn standardize(values: &[f64]) -> Result<Vec<f64>> {
    if values.len() < 2 {
        return Err(Error::degenerate(
            "standardization",
            format!("need at least 2 values, got {}", values.len()),
        ));
    }
    let m = mean(values);
    let sd = sample_std(values);
    if !sd.is_finite() || sd <= 0.0 {
        return Err(Error::degenerate(
            "standardization",
            "values have zero variance",
        ));
    }
    Ok(values.iter().map(|v| (v - m) / sd).collect())
}
