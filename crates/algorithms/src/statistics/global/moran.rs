//! Global Moran's I

use std::fmt::Debug;
use std::hash::Hash;

use spatialstats_core::{CsrMatrix, Error, Result, WeightsMatrix};

use super::{dot, moran_variance};
use crate::statistics::permutation::global_pseudo_p;
use crate::statistics::{standardized_field, GlobalStatistic};

const NAME: &str = "Moran's I";

/// Global Moran's I.
///
/// `I = Σ z_i · lag(z)_i / Σ z_i²` with `z` the standardized field and the
/// lag taken over row-standardized weights. The variance uses the raw
/// weights as given.
#[derive(Debug, Clone)]
pub struct GlobalMoran {
    raw: CsrMatrix,
    standardized: CsrMatrix,
    z: Vec<f64>,
    stat: f64,
}

impl GlobalMoran {
    pub fn new<K>(weights: &WeightsMatrix<K>, x: &[f64]) -> Result<Self>
    where
        K: Clone + Eq + Hash + Debug,
    {
        weights.check_len(x.len(), "Moran's I values")?;
        if weights.n() < 2 {
            return Err(Error::degenerate(NAME, "need at least 2 observations"));
        }

        let raw = weights.sparse().clone();
        let standardized = weights.standardize().sparse().clone();
        let z = standardized_field(NAME, x)?;
        let stat = moran_i(&standardized, &z)?;

        Ok(Self {
            raw,
            standardized,
            z,
            stat,
        })
    }

    /// Standardized field.
    pub fn z(&self) -> &[f64] {
        &self.z
    }
}

fn moran_i(w: &CsrMatrix, z: &[f64]) -> Result<f64> {
    let lag = w.mul_vec(z)?;
    let denominator = dot(z, z);
    if denominator == 0.0 {
        return Err(Error::degenerate(NAME, "sum of squared deviations is zero"));
    }
    Ok(dot(z, &lag) / denominator)
}

impl GlobalStatistic for GlobalMoran {
    fn name(&self) -> &'static str {
        NAME
    }

    fn stat(&self) -> f64 {
        self.stat
    }

    fn expectation(&self) -> f64 {
        -1.0 / (self.z.len() as f64 - 1.0)
    }

    fn variance(&self) -> Result<f64> {
        moran_variance(NAME, &self.raw, &self.z)
    }

    fn mc(&self, permutations: usize, seed: Option<u64>) -> Result<f64> {
        let w = &self.standardized;
        global_pseudo_p(self.stat, &self.z, permutations, seed, |z| {
            moran_i(w, z).unwrap_or(f64::NAN)
        })
    }
}
