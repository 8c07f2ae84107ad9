//! Centrography: centers, dispersion and shape of a point pattern

use std::cmp::Ordering;
use std::f64::consts::FRAC_PI_2;

use serde::Serialize;
use spatialstats_core::{Error, Result};
use tracing::warn;

use super::PointPattern;
use crate::index::Point;

/// Parameters for the center of minimum distance
#[derive(Debug, Clone, Copy)]
pub struct CenterMedianParams {
    /// Stop when both coordinates move less than this
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for CenterMedianParams {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            max_iterations: 1000,
        }
    }
}

/// Standard deviational ellipse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StdEllipse {
    pub sx: f64,
    pub sy: f64,
    /// Rotation in radians
    pub theta: f64,
}

impl PointPattern {
    pub fn mean_center(&self) -> Point {
        let n = self.n() as f64;
        let (x, y) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(x, y), p| (x + p.x, y + p.y));
        Point::new(x / n, y / n)
    }

    pub fn weighted_mean_center(&self, weights: &[f64]) -> Result<Point> {
        if weights.len() != self.n() {
            return Err(Error::DimensionMismatch {
                expected: self.n(),
                actual: weights.len(),
                context: "weighted mean center",
            });
        }

        let (w_sum, x, y) = self
            .points
            .iter()
            .zip(weights)
            .fold((0.0, 0.0, 0.0), |(s, x, y), (p, w)| (s + w, x + p.x * w, y + p.y * w));
        if w_sum == 0.0 {
            return Err(Error::degenerate("weighted mean center", "weights sum to zero"));
        }
        Ok(Point::new(x / w_sum, y / w_sum))
    }

    /// Root mean squared distance from the mean center.
    pub fn standard_distance(&self) -> f64 {
        let c = self.mean_center();
        let ss: f64 = self.points.iter().map(|p| p.dist_sq(&c)).sum();
        (ss / self.n() as f64).sqrt()
    }

    /// Coordinate-wise median.
    pub fn median(&self) -> Point {
        let mut xs: Vec<f64> = self.points.iter().map(|p| p.x).collect();
        let mut ys: Vec<f64> = self.points.iter().map(|p| p.y).collect();
        xs.sort_by(f64::total_cmp);
        ys.sort_by(f64::total_cmp);

        let n = self.n();
        if n % 2 == 0 {
            Point::new(
                (xs[(n - 1) / 2] + xs[n / 2]) / 2.0,
                (ys[(n - 1) / 2] + ys[n / 2]) / 2.0,
            )
        } else {
            Point::new(xs[n / 2], ys[n / 2])
        }
    }

    /// Center of minimum distance via Weiszfeld iteration from the mean center.
    pub fn center_median(&self, params: &CenterMedianParams) -> Point {
        let mut center = self.mean_center();

        for _ in 0..params.max_iterations {
            let (s, x, y) = self.points.iter().fold((0.0, 0.0, 0.0), |(s, x, y), p| {
                // a center on top of a point would divide by zero
                let inv = 1.0 / p.dist(&center).max(f64::EPSILON);
                (s + inv, x + inv * p.x, y + inv * p.y)
            });
            let next = Point::new(x / s, y / s);
            let converged = (next.x - center.x).abs() <= params.tolerance
                && (next.y - center.y).abs() <= params.tolerance;
            center = next;
            if converged {
                return center;
            }
        }

        warn!(
            max_iterations = params.max_iterations,
            "center median did not converge"
        );
        center
    }

    /// Standard deviational ellipse around the mean center.
    ///
    /// Needs at least three points.
    pub fn sd_ellipse(&self) -> Result<StdEllipse> {
        let n = self.n();
        if n < 3 {
            return Err(Error::degenerate(
                "standard deviational ellipse",
                format!("need at least 3 points, got {}", n),
            ));
        }

        let c = self.mean_center();
        let (xx, yy, xy) = self.points.iter().fold((0.0, 0.0, 0.0), |(xx, yy, xy), p| {
            let dx = p.x - c.x;
            let dy = p.y - c.y;
            (xx + dx * dx, yy + dy * dy, xy + dx * dy)
        });

        // xy == 0 is the limit of the closed form: the major axis lies on x or y
        let theta = if xy == 0.0 {
            if xx > yy {
                FRAC_PI_2
            } else {
                0.0
            }
        } else {
            ((xx - yy + ((xx - yy).powi(2) + 4.0 * xy * xy).sqrt()) / (2.0 * xy)).atan()
        };
        let (sin, cos) = theta.sin_cos();

        let (sx, sy) = self.points.iter().fold((0.0, 0.0), |(sx, sy), p| {
            let dx = p.x - c.x;
            let dy = p.y - c.y;
            (
                sx + (dx * cos - dy * sin).powi(2),
                sy + (dx * sin - dy * cos).powi(2),
            )
        });

        let dof = (n - 2) as f64;
        Ok(StdEllipse {
            sx: (2.0 * sx / dof).sqrt(),
            sy: (2.0 * sy / dof).sqrt(),
            theta,
        })
    }

    /// Convex hull by Graham scan, counter-clockwise from the lowest point.
    ///
    /// Collinear boundary points are dropped.
    pub fn convex_hull(&self) -> Vec<Point> {
        let lowest = self
            .points
            .iter()
            .copied()
            .min_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)))
            .unwrap_or(self.points[0]);

        let mut rest: Vec<Point> = self.points.iter().copied().filter(|p| *p != lowest).collect();
        rest.sort_by(|a, b| match cross(&lowest, a, b) {
            c if c > 0.0 => Ordering::Less,
            c if c < 0.0 => Ordering::Greater,
            _ => lowest.dist_sq(a).total_cmp(&lowest.dist_sq(b)),
        });

        let mut hull = vec![lowest];
        for p in rest {
            while hull.len() > 1 && cross(&hull[hull.len() - 2], &hull[hull.len() - 1], &p) <= 0.0 {
                hull.pop();
            }
            hull.push(p);
        }
        hull
    }
}

/// z-component of `(a - o) × (b - o)`; positive for a left turn.
fn cross(o: &Point, a: &Point, b: &Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppa::fixtures::{centrography, pts};
    use approx::assert_relative_eq;

    fn pp() -> PointPattern {
        PointPattern::new(centrography()).unwrap()
    }

    fn pp_odd() -> PointPattern {
        let mut points = centrography();
        points.push(Point::new(2.0, 2.0));
        PointPattern::new(points).unwrap()
    }

    #[test]
    fn test_mean_center() {
        assert_eq!(pp().mean_center(), Point::new(0.75, 1.25));
    }

    #[test]
    fn test_weighted_mean_center() {
        let c = pp().weighted_mean_center(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_relative_eq!(c.x, 5.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 43.0 / 30.0, epsilon = 1e-12);

        assert!(matches!(
            pp().weighted_mean_center(&[1.0, 2.0]),
            Err(Error::DimensionMismatch { expected: 6, actual: 2, .. })
        ));
    }

    #[test]
    fn test_standard_distance() {
        assert_relative_eq!(pp().standard_distance(), 2.4065881, epsilon = 1e-6);
    }

    #[test]
    fn test_median() {
        assert_eq!(pp().median(), Point::new(0.5, 1.0));
        assert_eq!(pp_odd().median(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_center_median() {
        let c = pp_odd().center_median(&CenterMedianParams::default());
        assert_relative_eq!(c.x, 1.114538, epsilon = 1e-4);
        assert_relative_eq!(c.y, 1.851077, epsilon = 1e-4);
    }

    #[test]
    fn test_sd_ellipse() {
        let e = pp().sd_ellipse().unwrap();
        assert_relative_eq!(e.sx, 0.27544, epsilon = 1e-5);
        assert_relative_eq!(e.sy, 1.11875, epsilon = 1e-5);
        assert_relative_eq!(e.theta, 0.65322, epsilon = 1e-5);
    }

    #[test]
    fn test_sd_ellipse_axis_aligned() {
        // zero covariance, spread along y
        let tall = PointPattern::new(pts(&[
            [0.0, 0.0],
            [0.0, 2.0],
            [0.0, -2.0],
            [1.0, 0.0],
            [-1.0, 0.0],
        ]))
        .unwrap();
        let e = tall.sd_ellipse().unwrap();
        assert_eq!(e.theta, 0.0);
        assert_relative_eq!(e.sx, (4.0f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(e.sy, (16.0f64 / 3.0).sqrt(), epsilon = 1e-12);

        // same shape turned a quarter: the axes swap through theta
        let wide = PointPattern::new(pts(&[
            [0.0, 0.0],
            [2.0, 0.0],
            [-2.0, 0.0],
            [0.0, 1.0],
            [0.0, -1.0],
        ]))
        .unwrap();
        let e = wide.sd_ellipse().unwrap();
        assert_relative_eq!(e.theta, FRAC_PI_2);
        assert_relative_eq!(e.sx, (4.0f64 / 3.0).sqrt(), epsilon = 1e-9);
        assert_relative_eq!(e.sy, (16.0f64 / 3.0).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_convex_hull() {
        let pp = PointPattern::new(pts(&[
            [0.0, 0.0],
            [2.0, 0.0],
            [1.0, 1.0],
            [2.0, 2.0],
            [0.0, 2.0],
            [1.0, 0.0],
            [0.5, 1.5],
        ]))
        .unwrap();
        let hull = pp.convex_hull();
        assert_eq!(
            hull,
            pts(&[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]])
        );
    }
}
