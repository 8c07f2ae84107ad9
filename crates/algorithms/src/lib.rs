//! # SpatialStats Algorithms
//!
//! Spatial statistics built on the weights and lag primitives of
//! `spatialstats-core`.
//!
//! ## Available Algorithm Categories
//!
//! - **statistics**: Global and local Moran's I, local Geary's C, Getis-Ord
//!   G/G*, bivariate and multivariate variants, permutation tests, FDR
//! - **index**: 2-D k-d tree
//! - **neighbors**: k-nearest, distance band and inverse-distance weights
//!   from coordinates
//! - **ppa**: Point pattern analysis (centrography, nearest-neighbor
//!   distances, K/L functions, quadrats, point processes)

pub mod index;
pub mod maybe_rayon;
pub mod neighbors;
pub mod ppa;
pub mod statistics;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::index::{KdTree, Neighbor, Point};
    pub use crate::neighbors::{
        distance_band_weights, idw_band_weights, idw_knn_weights, knn_weights,
    };
    pub use crate::ppa::{
        BoundingBox, CenterMedianParams, DistanceStatisticParams, KStatistic, LStatistic,
        PointPattern, Quadrat, QuadratParams, StdEllipse,
    };
    pub use crate::statistics::{
        fdr, GlobalBivariateMoran, GlobalMoran, GlobalStatistic, GlobalSummary, Group,
        LocalBivariateMoran, LocalGeary, LocalGetisOrd, LocalMoran, LocalStatistic,
        LocalSummary, MultivariateGeary, PermutationParams,
    };
    pub use spatialstats_core::prelude::*;
}
