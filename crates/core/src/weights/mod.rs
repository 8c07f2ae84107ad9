//! Spatial weights: keyed adjacency matrices and their CSR form.

mod csr;
mod matrix;

pub use csr::CsrMatrix;
pub use matrix::WeightsMatrix;
