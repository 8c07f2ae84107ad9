//! Local Geary's C

use std::fmt::Debug;
use std::hash::Hash;

use spatialstats_core::{CsrMatrix, Result, WeightsMatrix};

use super::{geary_slot, geary_terms, no_closed_form_result, quads};
use crate::statistics::permutation::{local_pseudo_p, Tail};
use crate::statistics::{standardized_field, Group, LocalStatistic};

const NAME: &str = "Local Geary's C";

/// Local Geary's C: `C_i = Σ_j w_ij (z_i - z_j)²` over row-standardized
/// weights. Small values mean similar neighbors.
#[derive(Debug, Clone)]
pub struct LocalGeary {
    weights: CsrMatrix,
    z: Vec<f64>,
    stat: Vec<f64>,
}

impl LocalGeary {
    pub fn new<K>(weights: &WeightsMatrix<K>, x: &[f64]) -> Result<Self>
    where
        K: Clone + Eq + Hash + Debug,
    {
        weights.check_len(x.len(), "local Geary values")?;

        let weights = weights.standardize().sparse().clone();
        let z = standardized_field(NAME, x)?;
        let stat = geary_terms(&weights, &z);

        Ok(Self { weights, z, stat })
    }

    pub fn quads(&self) -> Result<Vec<Group>> {
        let lag = self.weights.mul_vec(&self.z)?;
        Ok(quads(&self.z, &lag))
    }
}

impl LocalStatistic for LocalGeary {
    fn name(&self) -> &'static str {
        NAME
    }

    fn stat(&self) -> &[f64] {
        &self.stat
    }

    fn expectation(&self) -> Result<Vec<f64>> {
        no_closed_form_result(NAME, "expectation")
    }

    fn variance(&self) -> Result<Vec<f64>> {
        no_closed_form_result(NAME, "variance")
    }

    fn mc(&self, permutations: usize, seed: Option<u64>) -> Result<Vec<f64>> {
        let z = &self.z;
        local_pseudo_p(
            NAME,
            &self.stat,
            &self.weights,
            permutations,
            seed,
            Tail::Folded,
            |i, slots, wts| geary_slot(z, i, slots, wts),
        )
    }

    fn groups(&self) -> Option<Vec<Group>> {
        self.quads().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::tests_support::{checkerboard, clustered, rook_grid};
    use approx::assert_relative_eq;
    use spatialstats_core::Error;

    #[test]
    fn test_checkerboard() {
        let geary = LocalGeary::new(&rook_grid(), &checkerboard()).unwrap();
        for &c in geary.stat() {
            assert_relative_eq!(c, 3.6, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_clustered() {
        let geary = LocalGeary::new(&rook_grid(), &clustered()).unwrap();
        let expected = [0.0, 0.0, 0.0, 4.0 / 3.0, 1.0, 4.0 / 3.0, 2.0, 4.0 / 3.0, 2.0];
        for (c, e) in geary.stat().iter().zip(expected) {
            assert_relative_eq!(*c, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_no_analytic_moments() {
        let geary = LocalGeary::new(&rook_grid(), &checkerboard()).unwrap();
        assert!(matches!(geary.expectation(), Err(Error::Algorithm(_))));
        assert!(matches!(geary.variance(), Err(Error::Algorithm(_))));
        assert!(geary.z_score().is_err());
    }

    #[test]
    fn test_mc() {
        let geary = LocalGeary::new(&rook_grid(), &clustered()).unwrap();
        let p = geary.mc(99, Some(3)).unwrap();
        assert_eq!(p, geary.mc(99, Some(3)).unwrap());
        assert!(p.iter().all(|&v| v > 0.0 && v <= 1.0));
        assert_eq!(geary.groups().unwrap().len(), 9);
    }
}
