//! Quadrat analysis

use rand::Rng;
use spatialstats_core::descriptive::sample_variance;
use spatialstats_core::{Error, Result};
use tracing::debug;

use super::{BoundingBox, PointPattern};
use crate::index::Point;
use crate::maybe_rayon::*;
use crate::statistics::permutation::{resolve_seed, stream_rng};

/// Grid dimensions for quadrat analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadratParams {
    pub x_regions: usize,
    pub y_regions: usize,
}

impl Default for QuadratParams {
    fn default() -> Self {
        Self {
            x_regions: 3,
            y_regions: 3,
        }
    }
}

/// Chi-squared test of point counts over a regular grid.
///
/// Cells are numbered row-major from the bottom-left corner. The max edges
/// of the box are padded by `1e-5` so points on them fall in the last cell.
#[derive(Debug, Clone)]
pub struct Quadrat<'a> {
    pp: &'a PointPattern,
    bbox: BoundingBox,
    params: QuadratParams,
}

const EDGE_PADDING: f64 = 1e-5;

impl<'a> Quadrat<'a> {
    pub fn new(pp: &'a PointPattern, bbox: BoundingBox, params: QuadratParams) -> Result<Self> {
        if params.x_regions == 0 || params.y_regions == 0 {
            return Err(Error::InvalidParameter {
                name: "regions",
                value: format!("{}x{}", params.x_regions, params.y_regions),
                reason: "need at least one region per axis".into(),
            });
        }
        if params.x_regions * params.y_regions < 2 {
            return Err(Error::InvalidParameter {
                name: "regions",
                value: "1x1".into(),
                reason: "need at least two cells".into(),
            });
        }
        Ok(Self { pp, bbox, params })
    }

    /// Number of cells.
    pub fn m(&self) -> usize {
        self.params.x_regions * self.params.y_regions
    }

    /// Degrees of freedom, `m - 1`.
    pub fn df(&self) -> usize {
        self.m() - 1
    }

    /// Expected count per cell, `n / m`.
    pub fn expectation(&self) -> f64 {
        self.pp.n() as f64 / self.m() as f64
    }

    /// Count per cell. Points outside the box are ignored.
    pub fn counts(&self, points: &[Point]) -> Vec<usize> {
        let mut counts = vec![0; self.m()];
        for p in points {
            if let Some(cell) = self.cell_of(p) {
                counts[cell] += 1;
            }
        }
        counts
    }

    /// Counts of the pattern's own points.
    pub fn quadrat_counts(&self) -> Vec<usize> {
        self.counts(self.pp.points())
    }

    /// `df · s² / expectation` of the observed counts.
    pub fn chi2(&self) -> f64 {
        self.chi2_of(&self.quadrat_counts())
    }

    fn chi2_of(&self, counts: &[usize]) -> f64 {
        let counts: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        self.df() as f64 * sample_variance(&counts) / self.expectation()
    }

    /// Pseudo p-value against complete spatial randomness.
    ///
    /// Each permutation drops `n` points uniformly into the `m` cells and
    /// counts simulated chi² values at least as large as the observed one.
    pub fn mc(&self, permutations: usize, seed: Option<u64>) -> Result<f64> {
        if permutations == 0 {
            return Err(Error::InvalidParameter {
                name: "permutations",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        let seed = resolve_seed(seed);
        let (n, m) = (self.pp.n(), self.m());
        debug!(permutations, seed, m, "quadrat simulation");

        let observed = self.chi2();
        let extreme = (0..permutations)
            .into_par_iter()
            .filter(|&p| {
                let mut rng = stream_rng(seed, p as u64);
                let mut counts = vec![0usize; m];
                for _ in 0..n {
                    counts[rng.gen_range(0..m)] += 1;
                }
                self.chi2_of(&counts) >= observed
            })
            .count();

        Ok((extreme as f64 + 1.0) / (permutations as f64 + 1.0))
    }

    fn cell_of(&self, p: &Point) -> Option<usize> {
        let (min, max) = (self.bbox.min, self.bbox.max);
        let width = max.x + EDGE_PADDING - min.x;
        let height = max.y + EDGE_PADDING - min.y;

        let x_bin = ((p.x - min.x) * self.params.x_regions as f64 / width).floor();
        let y_bin = ((p.y - min.y) * self.params.y_regions as f64 / height).floor();
        if x_bin < 0.0
            || y_bin < 0.0
            || x_bin >= self.params.x_regions as f64
            || y_bin >= self.params.y_regions as f64
        {
            return None;
        }
        Some(x_bin as usize + self.params.x_regions * y_bin as usize)
    }
}

impl PointPattern {
    /// Quadrat analysis over the pattern's own bounding box.
    pub fn quadrat(&self, params: QuadratParams) -> Result<Quadrat<'_>> {
        Quadrat::new(self, self.bbox(), params)
    }
}
