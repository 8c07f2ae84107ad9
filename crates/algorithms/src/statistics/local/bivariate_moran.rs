//! Local bivariate Moran's I

use std::fmt::Debug;
use std::hash::Hash;

use spatialstats_core::{CsrMatrix, Result, WeightsMatrix};

use super::{no_closed_form_result, quads, slot_lag};
use crate::statistics::permutation::{local_pseudo_p, Tail};
use crate::statistics::{standardized_field, Group, LocalStatistic};

const NAME: &str = "Local bivariate Moran's I";

/// `I_i = x_i · lag(y)_i` for standardized `x` and `y`.
///
/// The permutation test holds `x_i` fixed and draws the neighbor sample
/// from `y`.
#[derive(Debug, Clone)]
pub struct LocalBivariateMoran {
    weights: CsrMatrix,
    x: Vec<f64>,
    y: Vec<f64>,
    y_lag: Vec<f64>,
    stat: Vec<f64>,
}

impl LocalBivariateMoran {
    pub fn new<K>(weights: &WeightsMatrix<K>, x: &[f64], y: &[f64]) -> Result<Self>
    where
        K: Clone + Eq + Hash + Debug,
    {
        weights.check_len(x.len(), "local bivariate Moran x")?;
        weights.check_len(y.len(), "local bivariate Moran y")?;

        let weights = weights.standardize().sparse().clone();
        let x = standardized_field(NAME, x)?;
        let y = standardized_field(NAME, y)?;
        let y_lag = weights.mul_vec(&y)?;
        let stat = x.iter().zip(&y_lag).map(|(xi, li)| xi * li).collect();

        Ok(Self {
            weights,
            x,
            y,
            y_lag,
            stat,
        })
    }

    /// Quadrants of `x_i` against the lag of `y`.
    pub fn quads(&self) -> Vec<Group> {
        quads(&self.x, &self.y_lag)
    }
}

impl LocalStatistic for LocalBivariateMoran {
    fn name(&self) -> &'static str {
        NAME
    }

    fn stat(&self) -> &[f64] {
        &self.stat
    }

    fn expectation(&self) -> Result<Vec<f64>> {
        no_closed_form_result(NAME, "expectation")
    }

    fn variance(&self) -> Result<Vec<f64>> {
        no_closed_form_result(NAME, "variance")
    }

    fn mc(&self, permutations: usize, seed: Option<u64>) -> Result<Vec<f64>> {
        let (x, y) = (&self.x, &self.y);
        local_pseudo_p(
            NAME,
            &self.stat,
            &self.weights,
            permutations,
            seed,
            Tail::Signed,
            |i, slots, wts| x[i] * slot_lag(slots, wts, y),
        )
    }

    fn groups(&self) -> Option<Vec<Group>> {
        Some(self.quads())
    }
}
