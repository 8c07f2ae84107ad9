//! Local Moran's I

use std::fmt::Debug;
use std::hash::Hash;

use spatialstats_core::descriptive::sample_variance;
use spatialstats_core::{CsrMatrix, Error, Result, WeightsMatrix};

use super::{quads, slot_lag};
use crate::statistics::permutation::{local_pseudo_p, Tail};
use crate::statistics::{standardized_field, Group, LocalStatistic};

const NAME: &str = "Local Moran's I";

/// Local Moran's I
///
/// `I_i = z_i / s² · lag(z)_i` over row-standardized weights, where `s²` is
/// the sample variance of the whole standardized field rather than a
/// per-neighborhood variance (GeoDa's convention).
#[derive(Debug, Clone)]
pub struct LocalMoran {
    weights: CsrMatrix,
    z: Vec<f64>,
    lag: Vec<f64>,
    si2: f64,
    stat: Vec<f64>,
}

impl LocalMoran {
    pub fn new<K>(weights: &WeightsMatrix<K>, x: &[f64]) -> Result<Self>
    where
        K: Clone + Eq + Hash + Debug,
    {
        weights.check_len(x.len(), "local Moran values")?;

        let weights = weights.standardize().sparse().clone();
        let z = standardized_field(NAME, x)?;
        let si2 = sample_variance(&z);
        let lag = weights.mul_vec(&z)?;
        let stat = z.iter().zip(&lag).map(|(zi, li)| zi / si2 * li).collect();

        Ok(Self {
            weights,
            z,
            lag,
            si2,
            stat,
        })
    }

    /// Standardized field.
    pub fn z(&self) -> &[f64] {
        &self.z
    }

    /// Row-standardized lag of the standardized field.
    pub fn lag(&self) -> &[f64] {
        &self.lag
    }

    /// `HH`/`LH`/`LL`/`HL` by the signs of `z_i` and its lag.
    pub fn quads(&self) -> Vec<Group> {
        quads(&self.z, &self.lag)
    }
}

impl LocalStatistic for LocalMoran {
    fn name(&self) -> &'static str {
        NAME
    }

    fn stat(&self) -> &[f64] {
        &self.stat
    }

    fn expectation(&self) -> Result<Vec<f64>> {
        let n = self.z.len() as f64;
        Ok(vec![-1.0 / (n - 1.0); self.z.len()])
    }

    /// `A_i - B_i - E[I]²` with the kurtosis term `b2 = Σz⁴ / (Σz²)²`.
    fn variance(&self) -> Result<Vec<f64>> {
        let n = self.z.len();
        if n < 3 {
            return Err(Error::degenerate(NAME, "variance needs at least 3 observations"));
        }
        let nf = n as f64;
        let (z2, z4) = self
            .z
            .iter()
            .fold((0.0, 0.0), |(a, b), z| (a + z * z, b + z.powi(4)));
        let b2 = z4 / (z2 * z2);
        let e = -1.0 / (nf - 1.0);

        Ok(self
            .weights
            .rows()
            .map(|(_, vals)| {
                let sum_sq: f64 = vals.iter().map(|w| w * w).sum();
                let row_sum: f64 = vals.iter().sum();
                let a = (nf - b2) * sum_sq / (nf - 1.0);
                let b = row_sum * row_sum * (2.0 * b2 - nf) / ((nf - 1.0) * (nf - 2.0));
                a - b - e * e
            })
            .collect())
    }

    fn mc(&self, permutations: usize, seed: Option<u64>) -> Result<Vec<f64>> {
        let (z, si2) = (&self.z, self.si2);
        local_pseudo_p(
            NAME,
            &self.stat,
            &self.weights,
            permutations,
            seed,
            Tail::Signed,
            |i, slots, wts| z[i] / si2 * slot_lag(slots, wts, z),
        )
    }

    fn groups(&self) -> Option<Vec<Group>> {
        Some(self.quads())
    }
}
