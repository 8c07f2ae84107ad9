//! Ripley's K and L functions

use std::f64::consts::PI;

use spatialstats_core::{Error, Result};

use super::PointPattern;
use crate::maybe_rayon::*;

/// Parameters shared by the distance statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceStatisticParams {
    /// Number of distance steps up to a quarter of the shorter bbox side
    pub intervals: usize,
}

impl Default for DistanceStatisticParams {
    fn default() -> Self {
        Self { intervals: 10 }
    }
}

/// Distance bins `w·i` for `i = 0..=intervals + 1`, `w = 0.25 · min side / intervals`.
fn distance_bins(pp: &PointPattern, params: &DistanceStatisticParams) -> Result<Vec<f64>> {
    if params.intervals == 0 {
        return Err(Error::InvalidParameter {
            name: "intervals",
            value: "0".into(),
            reason: "must be at least 1".into(),
        });
    }
    let bbox = pp.bbox();
    let side = bbox.width().min(bbox.height());
    if side <= 0.0 {
        return Err(Error::degenerate(
            "distance statistic",
            "points have a zero-width bounding box",
        ));
    }

    let w = 0.25 * side / params.intervals as f64;
    Ok((0..=params.intervals + 1).map(|i| w * i as f64).collect())
}

/// Ripley's K function over the bounding-box area.
#[derive(Debug, Clone)]
pub struct KStatistic {
    bins: Vec<f64>,
    stat: Vec<f64>,
}

impl KStatistic {
    pub fn new(pp: &PointPattern, params: &DistanceStatisticParams) -> Result<Self> {
        let bins = distance_bins(pp, params)?;
        let n = pp.n() as f64;
        let area = pp.bbox().area();
        let tree = pp.kd_tree();

        // ordered pairs (i, j), i != j, within each bin distance
        let stat = bins
            .iter()
            .map(|&d| {
                let pairs: usize = (0..pp.n())
                    .into_par_iter()
                    .map(|i| {
                        tree.radius_search(pp.points()[i], d)
                            .iter()
                            .filter(|nb| nb.index != i)
                            .count()
                    })
                    .sum();
                area * pairs as f64 / (n * n)
            })
            .collect();

        Ok(Self { bins, stat })
    }

    pub fn bins(&self) -> &[f64] {
        &self.bins
    }

    /// `K(d)` per bin.
    pub fn stat(&self) -> &[f64] {
        &self.stat
    }

    /// `πd²` per bin, the value under complete spatial randomness.
    pub fn expectation(&self) -> Vec<f64> {
        self.bins.iter().map(|d| PI * d * d).collect()
    }
}

/// Variance-stabilized K: `L(d) = sqrt(K(d) / π) - d`.
#[derive(Debug, Clone)]
pub struct LStatistic {
    bins: Vec<f64>,
    stat: Vec<f64>,
}

impl LStatistic {
    pub fn new(pp: &PointPattern, params: &DistanceStatisticParams) -> Result<Self> {
        let k = KStatistic::new(pp, params)?;
        let stat = k
            .stat
            .iter()
            .zip(&k.bins)
            .map(|(kd, d)| (kd / PI).sqrt() - d)
            .collect();
        Ok(Self { bins: k.bins, stat })
    }

    pub fn bins(&self) -> &[f64] {
        &self.bins
    }

    pub fn stat(&self) -> &[f64] {
        &self.stat
    }

    /// Zero for every bin.
    pub fn expectation(&self) -> Vec<f64> {
        vec![0.0; self.bins.len()]
    }
}
