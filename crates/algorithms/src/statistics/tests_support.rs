//! Shared fixtures: a 3×3 grid with rook contiguity.
//!
//! ```text
//! 6 7 8
//! 3 4 5
//! 0 1 2
//! ```

use spatialstats_core::WeightsMatrix;

pub(crate) fn rook_grid() -> WeightsMatrix<usize> {
    let mut pairs = Vec::new();
    for row in 0..3usize {
        for col in 0..3usize {
            let i = row * 3 + col;
            if col > 0 {
                pairs.push((i, i - 1, 1.0));
            }
            if col < 2 {
                pairs.push((i, i + 1, 1.0));
            }
            if row > 0 {
                pairs.push((i, i - 3, 1.0));
            }
            if row < 2 {
                pairs.push((i, i + 3, 1.0));
            }
        }
    }
    WeightsMatrix::from_pairs((0..9).collect(), pairs).unwrap()
}

pub(crate) fn checkerboard() -> Vec<f64> {
    vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0]
}

/// High values in the bottom two rows, low values on top.
pub(crate) fn clustered() -> Vec<f64> {
    vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0]
}

pub(crate) fn second_field() -> Vec<f64> {
    vec![1.0, 2.0, 2.0, 1.0, 2.0, 2.0, 1.0, 2.0, 2.0]
}
