//! Spatial lag operators.
//!
//! Every statistic computes its lag through these functions, so all of them
//! share one multiplication path (`CsrMatrix::mul_vec`).

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::Result;
use crate::weights::WeightsMatrix;

/// `result[i] = Σ_j w_ij · values[j]` with the weights as given.
pub fn neighbor_sum<K>(weights: &WeightsMatrix<K>, values: &[f64]) -> Result<Vec<f64>> {
    weights.check_len(values.len(), "lag values")?;
    weights.sparse().mul_vec(values)
}

/// Lag over the row-standardized weights.
pub fn neighbor_average<K>(weights: &WeightsMatrix<K>, values: &[f64]) -> Result<Vec<f64>>
where
    K: Clone + Eq + Hash + Debug,
{
    neighbor_sum(&weights.standardize(), values)
}

/// Lag over the windowed weights (self included).
pub fn window_sum<K>(weights: &WeightsMatrix<K>, values: &[f64]) -> Result<Vec<f64>>
where
    K: Clone + Eq + Hash + Debug,
{
    neighbor_sum(&weights.window(), values)
}

/// Lag over the windowed, then row-standardized weights.
pub fn window_average<K>(weights: &WeightsMatrix<K>, values: &[f64]) -> Result<Vec<f64>>
where
    K: Clone + Eq + Hash + Debug,
{
    neighbor_sum(&weights.window().standardize(), values)
}
