//! Error types for spatialstats

use thiserror::Error;

/// Main error type for spatialstats operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        context: &'static str,
    },

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Numeric degeneracy in {statistic}{}: {reason}", observation_suffix(.index))]
    NumericDegeneracy {
        statistic: &'static str,
        index: Option<usize>,
        reason: String,
    },

    #[error("Sparse index out of range: {index} >= {bound}")]
    SparseIndexOutOfRange { index: usize, bound: usize },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Algorithm error: {0}")]
    Algorithm(String),
}

impl Error {
    /// Shorthand for a degeneracy that applies to the whole statistic.
    pub fn degenerate(statistic: &'static str, reason: impl Into<String>) -> Self {
        Error::NumericDegeneracy {
            statistic,
            index: None,
            reason: reason.into(),
        }
    }

    /// Shorthand for a degeneracy at a single observation.
    pub fn degenerate_at(statistic: &'static str, index: usize, reason: impl Into<String>) -> Self {
        Error::NumericDegeneracy {
            statistic,
            index: Some(index),
            reason: reason.into(),
        }
    }
}

fn observation_suffix(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" (observation {})", i),
        None => String::new(),
    }
}

/// Result type alias for spatialstats operations
pub type Result<T> = std::result::Result<T, Error>;
