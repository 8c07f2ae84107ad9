//! Global spatial autocorrelation statistics

mod bivariate_moran;
mod moran;

pub use bivariate_moran::GlobalBivariateMoran;
pub use moran::GlobalMoran;

use std::collections::HashMap;

use spatialstats_core::{CsrMatrix, Error, Result};

/// Randomization variance of a Moran-type statistic.
///
/// `S0`, `S1` and `S2` come from `w`; `values` supplies the kurtosis term.
/// Needs at least four observations.
pub(crate) fn moran_variance(statistic: &'static str, w: &CsrMatrix, values: &[f64]) -> Result<f64> {
    let n = w.n();
    if n < 4 {
        return Err(Error::degenerate(
            statistic,
            format!("variance needs at least 4 observations, got {}", n),
        ));
    }

    let s0: f64 = w.values().iter().sum();
    if s0 == 0.0 {
        return Err(Error::degenerate(statistic, "weights sum to zero"));
    }

    // S1 = 1/2 Σ_ij (w_ij + w_ji)^2, accumulated per unordered pair
    let mut pairs: HashMap<(usize, usize), f64> = HashMap::with_capacity(w.nnz());
    let mut diagonal = 0.0;
    for (i, j, v) in w.coordinates() {
        if i == j {
            diagonal += 2.0 * v * v;
        } else {
            *pairs.entry((i.min(j), i.max(j))).or_insert(0.0) += v;
        }
    }
    let s1 = pairs.values().map(|v| v * v).sum::<f64>() + diagonal;

    let s2: f64 = w
        .row_sums()
        .iter()
        .zip(w.col_sums())
        .map(|(r, c)| (r + c).powi(2))
        .sum();

    let s3 = kurtosis(values);
    let nf = n as f64;
    let s4 = (nf * nf - 3.0 * nf + 3.0) * s1 - nf * s2 + 3.0 * s0 * s0;
    let s5 = (nf * nf - nf) * s1 - 2.0 * nf * s2 + 6.0 * s0 * s0;
    let e = -1.0 / (nf - 1.0);

    Ok((nf * s4 - s3 * s5) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0) * s0 * s0) - e * e)
}

/// `(Σz⁴ / n) / (Σz² / n)²` of the deviations from the mean.
fn kurtosis(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let m = values.iter().sum::<f64>() / n;
    let (m2, m4) = values.iter().fold((0.0, 0.0), |(m2, m4), v| {
        let d = (v - m).powi(2);
        (m2 + d, m4 + d * d)
    });
    (m4 / n) / (m2 / n).powi(2)
}

/// Σ_i a_i · b_i
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
