//! Global bivariate Moran's I

use std::fmt::Debug;
use std::hash::Hash;

use spatialstats_core::{CsrMatrix, Error, Result, WeightsMatrix};

use super::{dot, moran_variance};
use crate::statistics::permutation::global_pseudo_p;
use crate::statistics::{standardized_field, GlobalStatistic};

const NAME: &str = "Bivariate Moran's I";

/// Correlation of `x` with the spatial lag of `y`.
///
/// `I = Σ x_i · lag(y)_i / Σ x_i²` over standardized fields and
/// row-standardized weights. The permutation test holds `x` fixed and
/// shuffles `y`.
#[derive(Debug, Clone)]
pub struct GlobalBivariateMoran {
    standardized: CsrMatrix,
    x: Vec<f64>,
    y: Vec<f64>,
    stat: f64,
}

impl GlobalBivariateMoran {
    pub fn new<K>(weights: &WeightsMatrix<K>, x: &[f64], y: &[f64]) -> Result<Self>
    where
        K: Clone + Eq + Hash + Debug,
    {
        weights.check_len(x.len(), "bivariate Moran x")?;
        weights.check_len(y.len(), "bivariate Moran y")?;

        let standardized = weights.standardize().sparse().clone();
        let x = standardized_field(NAME, x)?;
        let y = standardized_field(NAME, y)?;
        let stat = bivariate_i(&standardized, &x, &y)?;

        Ok(Self {
            standardized,
            x,
            y,
            stat,
        })
    }
}

fn bivariate_i(w: &CsrMatrix, x: &[f64], y: &[f64]) -> Result<f64> {
    let y_lag = w.mul_vec(y)?;
    let denominator = dot(x, x);
    if denominator == 0.0 {
        return Err(Error::degenerate(NAME, "sum of squared x deviations is zero"));
    }
    Ok(dot(x, &y_lag) / denominator)
}

impl GlobalStatistic for GlobalBivariateMoran {
    fn name(&self) -> &'static str {
        NAME
    }

    fn stat(&self) -> f64 {
        self.stat
    }

    fn expectation(&self) -> f64 {
        -1.0 / (self.x.len() as f64 - 1.0)
    }

    fn variance(&self) -> Result<f64> {
        moran_variance(NAME, &self.standardized, &self.x)
    }

    fn mc(&self, permutations: usize, seed: Option<u64>) -> Result<f64> {
        let (w, x) = (&self.standardized, &self.x);
        global_pseudo_p(self.stat, &self.y, permutations, seed, |y| {
            bivariate_i(w, x, y).unwrap_or(f64::NAN)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::tests_support::{checkerboard, rook_grid, second_field};
    use approx::assert_relative_eq;

    #[test]
    fn test_stat_and_moments() {
        let bv = GlobalBivariateMoran::new(&rook_grid(), &checkerboard(), &second_field()).unwrap();
        assert_relative_eq!(bv.stat(), -0.08784, epsilon = 1e-5);
        assert_relative_eq!(bv.expectation(), -0.125);
        assert_relative_eq!(bv.variance().unwrap(), 0.0731619, epsilon = 1e-6);
        assert_relative_eq!(bv.z_score().unwrap(), 0.13738, epsilon = 1e-4);
    }

    #[test]
    fn test_mc_in_range() {
        let bv = GlobalBivariateMoran::new(&rook_grid(), &checkerboard(), &second_field()).unwrap();
        let p = bv.mc(99, Some(7)).unwrap();
        assert!(p > 0.0 && p <= 1.0);
        assert_eq!(p, bv.mc(99, Some(7)).unwrap());
    }

    #[test]
    fn test_y_length_checked() {
        let err = GlobalBivariateMoran::new(&rook_grid(), &checkerboard(), &[1.0; 8]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { actual: 8, .. }));
    }
}
