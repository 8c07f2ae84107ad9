//! Local indicators of spatial association

mod bivariate_moran;
mod geary;
mod getis_ord;
mod moran;
mod multivariate_geary;

pub use bivariate_moran::LocalBivariateMoran;
pub use geary::LocalGeary;
pub use getis_ord::LocalGetisOrd;
pub use moran::LocalMoran;
pub use multivariate_geary::MultivariateGeary;

use spatialstats_core::{CsrMatrix, Error, Result};

use super::Group;

/// Quadrant of every observation from its value and lag.
pub(crate) fn quads(values: &[f64], lag: &[f64]) -> Vec<Group> {
    values
        .iter()
        .zip(lag)
        .map(|(&v, &l)| Group::quadrant(v, l))
        .collect()
}

/// Lag of row `i` with `slots` standing in for the row's neighbors.
#[inline]
pub(crate) fn slot_lag(slots: &[usize], weights: &[f64], values: &[f64]) -> f64 {
    slots.iter().zip(weights).map(|(&j, &w)| w * values[j]).sum()
}

/// Local Geary term `Σ_j w_ij (z_i - z_j)²` for every observation.
pub(crate) fn geary_terms(w: &CsrMatrix, z: &[f64]) -> Vec<f64> {
    w.rows()
        .enumerate()
        .map(|(i, (cols, vals))| geary_slot(z, i, cols, vals))
        .collect()
}

#[inline]
pub(crate) fn geary_slot(z: &[f64], i: usize, slots: &[usize], weights: &[f64]) -> f64 {
    slots
        .iter()
        .zip(weights)
        .map(|(&j, &w)| w * (z[i] - z[j]).powi(2))
        .sum()
}

pub(crate) fn no_closed_form(statistic: &'static str, moment: &str) -> Error {
    Error::Algorithm(format!("{} has no analytic {}; use mc()", statistic, moment))
}

pub(crate) fn no_closed_form_result<T>(statistic: &'static str, moment: &str) -> Result<T> {
    Err(no_closed_form(statistic, moment))
}
