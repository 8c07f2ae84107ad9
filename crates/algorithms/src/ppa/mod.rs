//! Point pattern analysis
//!
//! Descriptive statistics (centrography), nearest-neighbor distances,
//! Ripley's K and L functions, quadrat analysis and simple point processes
//! for a set of plain 2-D points.

mod centrography;
mod distance;
mod distance_stats;
pub mod point_process;
mod quadrat;

pub use centrography::{CenterMedianParams, StdEllipse};
pub use distance_stats::{DistanceStatisticParams, KStatistic, LStatistic};
pub use quadrat::{Quadrat, QuadratParams};

use std::sync::OnceLock;

use serde::Serialize;
use spatialstats_core::{Error, Result};
use tracing::debug;

use crate::index::{KdTree, Point};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn new(min: Point, max: Point) -> Result<Self> {
        if !(min.x <= max.x && min.y <= max.y) {
            return Err(Error::InvalidParameter {
                name: "bbox",
                value: format!("[{:?}, {:?}]", min, max),
                reason: "min corner must not exceed max corner".into(),
            });
        }
        Ok(Self { min, max })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// A set of points with a lazily built k-d tree.
#[derive(Debug, Clone)]
pub struct PointPattern {
    points: Vec<Point>,
    tree: OnceLock<KdTree>,
}

impl PointPattern {
    /// Fails on an empty point set.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::InvalidParameter {
                name: "points",
                value: "0".into(),
                reason: "a point pattern needs at least one point".into(),
            });
        }
        Ok(Self {
            points,
            tree: OnceLock::new(),
        })
    }

    pub fn n(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn kd_tree(&self) -> &KdTree {
        self.tree.get_or_init(|| {
            debug!(n = self.points.len(), "building k-d tree");
            KdTree::build(&self.points)
        })
    }

    /// Smallest box holding every point.
    pub fn bbox(&self) -> BoundingBox {
        let init = (self.points[0], self.points[0]);
        let (min, max) = self.points.iter().fold(init, |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        });
        BoundingBox { min, max }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::index::Point;

    pub(crate) fn pts(raw: &[[f64; 2]]) -> Vec<Point> {
        raw.iter().copied().map(Point::from).collect()
    }

    /// Six points with a duplicated origin.
    pub(crate) fn centrography() -> Vec<Point> {
        pts(&[[0.0, 0.0], [0.0, 0.0], [1.0, 2.0], [2.0, 3.0], [3.0, 4.0], [-1.5, -1.5]])
    }

    pub(crate) fn distance() -> Vec<Point> {
        pts(&[[0.0, 0.0], [1.0, 2.0], [2.0, 3.0], [3.0, 4.0], [-1.5, -1.5], [2.0, 2.0]])
    }
}
