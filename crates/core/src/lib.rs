//! # SpatialStats Core
//!
//! Core types for spatial autocorrelation analysis.
//!
//! This crate provides:
//! - `WeightsMatrix<K>`: keyed spatial weights with dense, standardized,
//!   windowed and sparse views
//! - `CsrMatrix`: compressed sparse row storage used for every lag product
//! - Lag operators (`neighbor_sum`, `neighbor_average`, `window_sum`, `window_average`)
//! - Descriptive helpers (`mean`, `sample_variance`, `standardize`)

pub mod descriptive;
pub mod error;
pub mod lag;
pub mod weights;

pub use error::{Error, Result};
pub use weights::{CsrMatrix, WeightsMatrix};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::descriptive::{mean, sample_variance, standardize};
    pub use crate::error::{Error, Result};
    pub use crate::lag::{neighbor_average, neighbor_sum, window_average, window_sum};
    pub use crate::weights::{CsrMatrix, WeightsMatrix};
}
