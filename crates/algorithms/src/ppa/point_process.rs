//! Random point processes inside a bounding box

use rand::Rng;
use rand_distr::{Distribution, Poisson, Uniform};
use spatialstats_core::{Error, Result};

use super::BoundingBox;
use crate::index::Point;

/// `n` points drawn uniformly from `bbox`.
pub fn generate_from_n<R: Rng + ?Sized>(bbox: &BoundingBox, n: usize, rng: &mut R) -> Vec<Point> {
    let xs = Uniform::new_inclusive(bbox.min.x, bbox.max.x);
    let ys = Uniform::new_inclusive(bbox.min.y, bbox.max.y);
    (0..n)
        .map(|_| Point::new(xs.sample(rng), ys.sample(rng)))
        .collect()
}

/// Homogeneous Poisson process: the point count is Poisson(`lambda`), the
/// locations uniform.
pub fn generate_from_lambda<R: Rng + ?Sized>(
    bbox: &BoundingBox,
    lambda: f64,
    rng: &mut R,
) -> Result<Vec<Point>> {
    let poisson = Poisson::new(lambda).map_err(|e| Error::InvalidParameter {
        name: "lambda",
        value: lambda.to_string(),
        reason: e.to_string(),
    })?;
    let n: f64 = poisson.sample(rng);
    Ok(generate_from_n(bbox, n as usize, rng))
}
