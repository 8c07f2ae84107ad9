//! Spatial autocorrelation statistics
//!
//! Global statistics summarize the whole observation set with one value;
//! local statistics give one value per observation. Both families share the
//! same weights handling, lag operators and permutation engine.

pub mod fdr;
pub mod global;
pub mod local;
pub(crate) mod permutation;

#[cfg(test)]
pub(crate) mod tests_support;

use std::fmt;

use serde::Serialize;
use spatialstats_core::{Error, Result};

pub use fdr::fdr;
pub use global::{GlobalBivariateMoran, GlobalMoran};
pub use local::{
    LocalBivariateMoran, LocalGeary, LocalGetisOrd, LocalMoran, MultivariateGeary,
};

/// Parameters for permutation tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermutationParams {
    /// Number of random permutations. Values ending in 9 give round p-values.
    pub permutations: usize,
    /// Seed for the random generator; `None` draws a fresh one per call.
    pub seed: Option<u64>,
}

impl Default for PermutationParams {
    fn default() -> Self {
        Self {
            permutations: 99,
            seed: None,
        }
    }
}

/// Cluster label of an observation.
///
/// Quadrants (`HH`, `LH`, `LL`, `HL`) compare the sign of an observation's
/// standardized value with the sign of its spatial lag. `H`/`L` mark values
/// above or below the mean for Getis-Ord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Group {
    HH,
    LH,
    LL,
    HL,
    H,
    L,
}

impl Group {
    /// Quadrant for a value and its lag, both centered at zero.
    pub fn quadrant(value: f64, lag: f64) -> Self {
        match (value > 0.0, lag > 0.0) {
            (true, true) => Group::HH,
            (false, true) => Group::LH,
            (false, false) => Group::LL,
            (true, false) => Group::HL,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Group::HH => "HH",
            Group::LH => "LH",
            Group::LL => "LL",
            Group::HL => "HL",
            Group::H => "H",
            Group::L => "L",
        };
        f.write_str(label)
    }
}

/// Everything a global statistic reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalSummary {
    pub stat: f64,
    pub expectation: f64,
    pub variance: f64,
    pub z_score: f64,
    pub p: f64,
}

/// Result row of a local statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalSummary<K> {
    pub key: K,
    pub stat: f64,
    pub p: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
}

/// Statistic summarizing the whole observation set.
pub trait GlobalStatistic {
    /// Short display name
    fn name(&self) -> &'static str;

    /// Observed value
    fn stat(&self) -> f64;

    /// Expected value under spatial randomness
    fn expectation(&self) -> f64;

    /// Variance under the randomization assumption
    fn variance(&self) -> Result<f64>;

    /// `(stat - expectation) / sqrt(variance)`
    fn z_score(&self) -> Result<f64> {
        let var = self.variance()?;
        if var.is_nan() || var <= 0.0 {
            return Err(Error::degenerate(
                self.name(),
                format!("non-positive variance {}", var),
            ));
        }
        Ok((self.stat() - self.expectation()) / var.sqrt())
    }

    /// Pseudo p-value from `permutations` random shuffles.
    fn mc(&self, permutations: usize, seed: Option<u64>) -> Result<f64>;

    fn summary(&self, params: &PermutationParams) -> Result<GlobalSummary> {
        Ok(GlobalSummary {
            stat: self.stat(),
            expectation: self.expectation(),
            variance: self.variance()?,
            z_score: self.z_score()?,
            p: self.mc(params.permutations, params.seed)?,
        })
    }
}

/// Statistic with one value per observation.
pub trait LocalStatistic {
    /// Short display name
    fn name(&self) -> &'static str;

    /// Observed value for every observation
    fn stat(&self) -> &[f64];

    /// Expected value per observation. Not every statistic has a closed form.
    fn expectation(&self) -> Result<Vec<f64>>;

    /// Variance per observation. Not every statistic has a closed form.
    fn variance(&self) -> Result<Vec<f64>>;

    /// Per-observation z-scores.
    fn z_score(&self) -> Result<Vec<f64>> {
        let exp = self.expectation()?;
        let var = self.variance()?;
        self.stat()
            .iter()
            .zip(exp.iter().zip(&var))
            .enumerate()
            .map(|(i, (s, (e, v)))| {
                if *v > 0.0 {
                    Ok((s - e) / v.sqrt())
                } else {
                    Err(Error::degenerate_at(
                        self.name(),
                        i,
                        format!("non-positive variance {}", v),
                    ))
                }
            })
            .collect()
    }

    /// Pseudo p-values from conditional randomization.
    fn mc(&self, permutations: usize, seed: Option<u64>) -> Result<Vec<f64>>;

    /// Cluster label per observation, if the statistic defines one.
    fn groups(&self) -> Option<Vec<Group>>;

    /// Join keys, values, p-values and groups into result rows.
    fn summary<K: Clone>(
        &self,
        keys: &[K],
        params: &PermutationParams,
    ) -> Result<Vec<LocalSummary<K>>>
    where
        Self: Sized,
    {
        let stat = self.stat();
        if keys.len() != stat.len() {
            return Err(Error::DimensionMismatch {
                expected: stat.len(),
                actual: keys.len(),
                context: "summary keys",
            });
        }

        let p = self.mc(params.permutations, params.seed)?;
        let groups = self.groups();

        Ok(keys
            .iter()
            .enumerate()
            .map(|(i, key)| LocalSummary {
                key: key.clone(),
                stat: stat[i],
                p: p[i],
                group: groups.as_ref().map(|g| g[i]),
            })
            .collect())
    }
}

/// Standardize a field and label failures with the statistic name.
pub(crate) fn standardized_field(statistic: &'static str, values: &[f64]) -> Result<Vec<f64>> {
    spatialstats_core::descriptive::standardize(values).map_err(|e| match e {
        Error::NumericDegeneracy { reason, .. } => Error::degenerate(statistic, reason),
        other => other,
    })
}
