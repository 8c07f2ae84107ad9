//! Local Getis-Ord G and G*

use std::fmt::Debug;
use std::hash::Hash;

use spatialstats_core::descriptive::mean;
use spatialstats_core::{CsrMatrix, Error, Result, WeightsMatrix};
use tracing::debug;

use super::slot_lag;
use crate::statistics::permutation::{local_pseudo_p, Tail};
use crate::statistics::{Group, LocalStatistic};

const NAME: &str = "Local Getis-Ord";

/// Getis-Ord G and G*.
///
/// G: `G_i = lag(x)_i / Σ_{j≠i} x_j` over row-standardized weights.
/// G*: `G*_i = lag_window(x)_i / Σ_j x_j` over windowed, row-standardized
/// weights, so `x_i` is part of its own neighborhood.
///
/// Values are used as given (not standardized) and are expected to be
/// non-negative.
#[derive(Debug, Clone)]
pub struct LocalGetisOrd {
    star: bool,
    weights: CsrMatrix,
    x: Vec<f64>,
    denominators: Vec<f64>,
    stat: Vec<f64>,
}

impl LocalGetisOrd {
    /// `star: None` picks G* when the weights already have a non-zero trace.
    pub fn new<K>(weights: &WeightsMatrix<K>, x: &[f64], star: Option<bool>) -> Result<Self>
    where
        K: Clone + Eq + Hash + Debug,
    {
        weights.check_len(x.len(), "Getis-Ord values")?;
        let n = x.len();
        let min_n = if star == Some(true) { 2 } else { 3 };
        if n < min_n {
            return Err(Error::degenerate(
                NAME,
                format!("need at least {} observations, got {}", min_n, n),
            ));
        }

        let star = star.unwrap_or_else(|| weights.trace() > 0.0);
        debug!(star, "Getis-Ord variant");

        let prepared = if star {
            weights.window().standardize()
        } else {
            weights.standardize()
        };
        let weights = prepared.sparse().clone();

        let total: f64 = x.iter().sum();
        let denominators: Vec<f64> = if star {
            vec![total; n]
        } else {
            x.iter().map(|xi| total - xi).collect()
        };
        if let Some(i) = denominators.iter().position(|&d| d == 0.0) {
            return Err(Error::degenerate_at(NAME, i, "sum of values in the denominator is zero"));
        }

        let lag = weights.mul_vec(x)?;
        let stat = lag.iter().zip(&denominators).map(|(l, d)| l / d).collect();

        Ok(Self {
            star,
            weights,
            x: x.to_vec(),
            denominators,
            stat,
        })
    }

    /// True for G*, false for G.
    pub fn star(&self) -> bool {
        self.star
    }

    /// Off-diagonal (G) or full (G*) row sum and sum of squares of row `i`.
    fn row_moments(&self, i: usize, cols: &[usize], vals: &[f64]) -> (f64, f64) {
        cols.iter()
            .zip(vals)
            .filter(|&(&j, _)| self.star || j != i)
            .fold((0.0, 0.0), |(s, s2), (_, &w)| (s + w, s2 + w * w))
    }
}

impl LocalStatistic for LocalGetisOrd {
    fn name(&self) -> &'static str {
        NAME
    }

    fn stat(&self) -> &[f64] {
        &self.stat
    }

    /// `W_i / (n - 1)` for G, `W_i / n` for G*.
    fn expectation(&self) -> Result<Vec<f64>> {
        let m = if self.star {
            self.x.len() as f64
        } else {
            self.x.len() as f64 - 1.0
        };
        Ok(self
            .weights
            .rows()
            .enumerate()
            .map(|(i, (cols, vals))| self.row_moments(i, cols, vals).0 / m)
            .collect())
    }

    /// Randomization variance from Getis & Ord (1992).
    fn variance(&self) -> Result<Vec<f64>> {
        let n = self.x.len() as f64;
        let sum: f64 = self.x.iter().sum();
        let sum_sq: f64 = self.x.iter().map(|v| v * v).sum();

        self.weights
            .rows()
            .enumerate()
            .map(|(i, (cols, vals))| {
                let (w, s1) = self.row_moments(i, cols, vals);
                let (m, y1, y2) = if self.star {
                    let y1 = sum / n;
                    (n, y1, sum_sq / n - y1 * y1)
                } else {
                    let xi = self.x[i];
                    let y1 = (sum - xi) / (n - 1.0);
                    (n - 1.0, y1, (sum_sq - xi * xi) / (n - 1.0) - y1 * y1)
                };
                if y1 == 0.0 {
                    return Err(Error::degenerate_at(NAME, i, "mean of the other values is zero"));
                }
                Ok((m * s1 - w * w) / (m * m * (m - 1.0)) * (y2 / (y1 * y1)))
            })
            .collect()
    }

    fn mc(&self, permutations: usize, seed: Option<u64>) -> Result<Vec<f64>> {
        let (x, denominators) = (&self.x, &self.denominators);
        local_pseudo_p(
            NAME,
            &self.stat,
            &self.weights,
            permutations,
            seed,
            Tail::Folded,
            |i, slots, wts| slot_lag(slots, wts, x) / denominators[i],
        )
    }

    /// `H` above the mean, `L` otherwise.
    fn groups(&self) -> Option<Vec<Group>> {
        let m = mean(&self.x);
        Some(
            self.x
                .iter()
                .map(|&v| if v > m { Group::H } else { Group::L })
                .collect(),
        )
    }
}
