//! Point-based neighbor weights
//!
//! Builds `WeightsMatrix` values from plain coordinates with a `KdTree`.
//! Binary methods give every neighbor weight 1; inverse-distance methods give
//! `1 / (scale · d)^alpha`, where `scale = 1 / min_d` when the smallest
//! neighbor distance in the whole set is below 1, so no weight exceeds 1.
//! An observation is never its own neighbor.

use std::fmt::Debug;
use std::hash::Hash;

use spatialstats_core::{Error, Result, WeightsMatrix};
use tracing::debug;

use crate::index::{KdTree, Neighbor, Point};
use crate::maybe_rayon::*;

/// `k` nearest neighbors, weight 1.
///
/// `k` is clamped to `n - 1`.
pub fn knn_weights<K>(keys: Vec<K>, points: &[Point], k: usize) -> Result<WeightsMatrix<K>>
where
    K: Clone + Eq + Hash + Debug,
{
    let neighbors = knn_lists(&keys, points, k)?;
    binary(keys, neighbors)
}

/// All neighbors within `band`, weight 1.
pub fn distance_band_weights<K>(keys: Vec<K>, points: &[Point], band: f64) -> Result<WeightsMatrix<K>>
where
    K: Clone + Eq + Hash + Debug,
{
    let neighbors = band_lists(&keys, points, band)?;
    binary(keys, neighbors)
}

/// `k` nearest neighbors with inverse-distance weights.
pub fn idw_knn_weights<K>(
    keys: Vec<K>,
    points: &[Point],
    k: usize,
    alpha: f64,
) -> Result<WeightsMatrix<K>>
where
    K: Clone + Eq + Hash + Debug,
{
    check_alpha(alpha)?;
    let neighbors = knn_lists(&keys, points, k)?;
    inverse_distance(keys, neighbors, alpha)
}

/// All neighbors within `band` with inverse-distance weights.
pub fn idw_band_weights<K>(
    keys: Vec<K>,
    points: &[Point],
    band: f64,
    alpha: f64,
) -> Result<WeightsMatrix<K>>
where
    K: Clone + Eq + Hash + Debug,
{
    check_alpha(alpha)?;
    let neighbors = band_lists(&keys, points, band)?;
    inverse_distance(keys, neighbors, alpha)
}

fn check_points<K>(keys: &[K], points: &[Point]) -> Result<()> {
    if keys.len() != points.len() {
        return Err(Error::DimensionMismatch {
            expected: keys.len(),
            actual: points.len(),
            context: "neighbor coordinates",
        });
    }
    Ok(())
}

fn check_alpha(alpha: f64) -> Result<()> {
    if !alpha.is_finite() || alpha <= 0.0 {
        return Err(Error::InvalidParameter {
            name: "alpha",
            value: alpha.to_string(),
            reason: "must be positive".into(),
        });
    }
    Ok(())
}

fn knn_lists<K>(keys: &[K], points: &[Point], k: usize) -> Result<Vec<Vec<Neighbor>>> {
    check_points(keys, points)?;
    if k == 0 {
        return Err(Error::InvalidParameter {
            name: "k",
            value: k.to_string(),
            reason: "must be at least 1".into(),
        });
    }

    let tree = KdTree::build(points);
    let k = k.min(points.len().saturating_sub(1));
    debug!(n = points.len(), k, "k-nearest neighbor search");

    Ok((0..points.len())
        .into_par_iter()
        .map(|i| {
            tree.knn(points[i], k + 1)
                .into_iter()
                .filter(|nb| nb.index != i)
                .take(k)
                .collect::<Vec<_>>()
        })
        .collect())
}

fn band_lists<K>(keys: &[K], points: &[Point], band: f64) -> Result<Vec<Vec<Neighbor>>> {
    check_points(keys, points)?;
    if !band.is_finite() || band <= 0.0 {
        return Err(Error::InvalidParameter {
            name: "band",
            value: band.to_string(),
            reason: "must be a positive distance".into(),
        });
    }

    let tree = KdTree::build(points);
    debug!(n = points.len(), band, "distance band search");

    Ok((0..points.len())
        .into_par_iter()
        .map(|i| {
            tree.radius_search(points[i], band)
                .into_iter()
                .filter(|nb| nb.index != i)
                .collect::<Vec<_>>()
        })
        .collect())
}

fn binary<K>(keys: Vec<K>, neighbors: Vec<Vec<Neighbor>>) -> Result<WeightsMatrix<K>>
where
    K: Clone + Eq + Hash + Debug,
{
    let pairs: Vec<(K, K, f64)> = neighbors
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            let keys = &keys;
            row.iter().map(move |nb| (keys[i].clone(), keys[nb.index].clone(), 1.0))
        })
        .collect();
    WeightsMatrix::from_pairs(keys, pairs)
}

fn inverse_distance<K>(keys: Vec<K>, neighbors: Vec<Vec<Neighbor>>, alpha: f64) -> Result<WeightsMatrix<K>>
where
    K: Clone + Eq + Hash + Debug,
{
    let min_dist = neighbors
        .iter()
        .flatten()
        .map(|nb| nb.distance)
        .fold(f64::INFINITY, f64::min);

    if min_dist == 0.0 {
        return Err(Error::InvalidWeights(
            "coincident points have zero distance; inverse-distance weight is undefined".into(),
        ));
    }
    let scale = if min_dist < 1.0 { 1.0 / min_dist } else { 1.0 };

    let mut pairs = Vec::new();
    for (i, row) in neighbors.iter().enumerate() {
        for nb in row {
            let w = 1.0 / (scale * nb.distance).powf(alpha);
            pairs.push((keys[i].clone(), keys[nb.index].clone(), w));
        }
    }
    WeightsMatrix::from_pairs(keys, pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line() -> Vec<Point> {
        [0.0, 1.0, 3.0, 6.0]
            .iter()
            .map(|&x| Point::new(x, 0.0))
            .collect()
    }

    #[test]
    fn test_knn() {
        let w = knn_weights(vec!["a", "b", "c", "d"], &line(), 1).unwrap();
        assert_eq!(w.neighbors(&"a").unwrap(), vec![(&"b", 1.0)]);
        assert_eq!(w.neighbors(&"c").unwrap(), vec![(&"b", 1.0)]);
        assert_eq!(w.neighbors(&"d").unwrap(), vec![(&"c", 1.0)]);
        assert_eq!(w.trace(), 0.0);
    }

    #[test]
    fn test_knn_clamped() {
        let w = knn_weights(vec![1, 2, 3, 4], &line(), 10).unwrap();
        assert_eq!(w.weight_counts(), vec![3, 3, 3, 3]);
        assert!(knn_weights(vec![1, 2, 3, 4], &line(), 0).is_err());
    }

    #[test]
    fn test_band() {
        let w = distance_band_weights(vec![1, 2, 3, 4], &line(), 2.0).unwrap();
        assert_eq!(w.weight_counts(), vec![1, 2, 1, 0]);
        assert!(distance_band_weights(vec![1, 2, 3, 4], &line(), -1.0).is_err());
    }

    #[test]
    fn test_idw_band_unscaled() {
        let w = idw_band_weights(vec![1, 2, 3, 4], &line(), 3.0, 1.0).unwrap();
        let dense = w.dense();
        assert_relative_eq!(dense[[0, 1]], 1.0);
        assert_relative_eq!(dense[[0, 2]], 1.0 / 3.0);
        assert_relative_eq!(dense[[2, 3]], 1.0 / 3.0);
    }

    #[test]
    fn test_idw_knn_scaled() {
        let points = vec![Point::new(0.0, 0.0), Point::new(0.5, 0.0), Point::new(2.0, 0.0)];
        let w = idw_knn_weights(vec![1, 2, 3], &points, 1, 2.0).unwrap();
        let dense = w.dense();
        // min distance 0.5 scales every distance by 2
        assert_relative_eq!(dense[[0, 1]], 1.0);
        assert_relative_eq!(dense[[2, 1]], 1.0 / 9.0);
    }

    #[test]
    fn test_mismatched_points() {
        let err = knn_weights(vec![1, 2], &line(), 1).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 2, actual: 4, .. }));
    }
}
