//! Nearest-neighbor distances

use spatialstats_core::descriptive::{mean, sample_std};
use spatialstats_core::{Error, Result};

use super::PointPattern;
use crate::index::Neighbor;
use crate::maybe_rayon::*;

impl PointPattern {
    /// The `k` nearest other points of every point, nearest first.
    ///
    /// `k` is clamped to `n - 1`.
    pub fn knn(&self, k: usize) -> Vec<Vec<Neighbor>> {
        let tree = self.kd_tree();
        let k = k.min(self.n() - 1);
        (0..self.n())
            .into_par_iter()
            .map(|i| {
                tree.knn(self.points[i], k + 1)
                    .into_iter()
                    .filter(|nb| nb.index != i)
                    .take(k)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Distance from every point to its nearest other point.
    pub fn nn_dist(&self) -> Result<Vec<f64>> {
        if self.n() < 2 {
            return Err(Error::degenerate(
                "nearest-neighbor distance",
                "need at least 2 points",
            ));
        }
        Ok(self
            .knn(1)
            .into_iter()
            .filter_map(|row| row.first().map(|nb| nb.distance))
            .collect())
    }

    pub fn mean_nn_dist(&self) -> Result<f64> {
        Ok(mean(&self.nn_dist()?))
    }

    /// Sample standard deviation of the nearest-neighbor distances.
    pub fn stddev_nn_dist(&self) -> Result<f64> {
        Ok(sample_std(&self.nn_dist()?))
    }

    pub fn min_nn_dist(&self) -> Result<f64> {
        Ok(self.nn_dist()?.into_iter().fold(f64::INFINITY, f64::min))
    }

    pub fn max_nn_dist(&self) -> Result<f64> {
        Ok(self.nn_dist()?.into_iter().fold(f64::NEG_INFINITY, f64::max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Point;
    use crate::ppa::fixtures::distance;
    use approx::assert_relative_eq;

    fn pp() -> PointPattern {
        PointPattern::new(distance()).unwrap()
    }

    #[test]
    fn test_knn() {
        let nearest: Vec<usize> = pp().knn(1).iter().map(|row| row[0].index).collect();
        assert_eq!(&nearest[..5], &[4, 5, 5, 2, 0]);
        // (2, 2) is equally close to (1, 2) and (2, 3)
        assert!(nearest[5] == 1 || nearest[5] == 2);
    }

    #[test]
    fn test_knn_excludes_self_and_clamps() {
        let rows = pp().knn(10);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), 5);
            assert!(row.iter().all(|nb| nb.index != i));
        }
    }

    #[test]
    fn test_nn_dist() {
        let d = pp().nn_dist().unwrap();
        let s2 = 2.0_f64.sqrt();
        let expected = [1.5 * s2, 1.0, 1.0, s2, 1.5 * s2, 1.0];
        for (got, want) in d.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_nn_summary() {
        let pp = pp();
        assert_relative_eq!(pp.mean_nn_dist().unwrap(), 1.4428090, epsilon = 1e-6);
        assert_relative_eq!(pp.stddev_nn_dist().unwrap(), 0.5495111, epsilon = 1e-6);
        assert_relative_eq!(pp.min_nn_dist().unwrap(), 1.0);
        assert_relative_eq!(pp.max_nn_dist().unwrap(), 1.5 * 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_single_point() {
        let pp = PointPattern::new(vec![Point::new(1.0, 1.0)]).unwrap();
        assert!(pp.knn(3)[0].is_empty());
        assert!(pp.nn_dist().is_err());
    }
}
