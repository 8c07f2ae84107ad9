//! Multivariate local Geary

use std::fmt::Debug;
use std::hash::Hash;

use spatialstats_core::{CsrMatrix, Error, Result, WeightsMatrix};

use super::{geary_slot, geary_terms, no_closed_form_result};
use crate::statistics::permutation::{local_pseudo_p, Tail};
use crate::statistics::{standardized_field, Group, LocalStatistic};

const NAME: &str = "Multivariate Geary's C";

/// Mean of the univariate local Geary statistics of `m` fields.
///
/// The permutation test draws one neighbor sample per trial and applies it
/// to every field, so observations move as whole tuples.
#[derive(Debug, Clone)]
pub struct MultivariateGeary {
    weights: CsrMatrix,
    fields: Vec<Vec<f64>>,
    stat: Vec<f64>,
}

impl MultivariateGeary {
    pub fn new<K, F>(weights: &WeightsMatrix<K>, fields: &[F]) -> Result<Self>
    where
        K: Clone + Eq + Hash + Debug,
        F: AsRef<[f64]>,
    {
        if fields.is_empty() {
            return Err(Error::InvalidParameter {
                name: "fields",
                value: "0".into(),
                reason: "need at least one field".into(),
            });
        }

        let weights = weights_checked(weights, fields)?;
        let fields = fields
            .iter()
            .map(|f| standardized_field(NAME, f.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let m = fields.len() as f64;
        let mut stat = vec![0.0; weights.n()];
        for z in &fields {
            for (acc, c) in stat.iter_mut().zip(geary_terms(&weights, z)) {
                *acc += c / m;
            }
        }

        Ok(Self {
            weights,
            fields,
            stat,
        })
    }

    /// Number of fields.
    pub fn m(&self) -> usize {
        self.fields.len()
    }
}

fn weights_checked<K, F>(weights: &WeightsMatrix<K>, fields: &[F]) -> Result<CsrMatrix>
where
    K: Clone + Eq + Hash + Debug,
    F: AsRef<[f64]>,
{
    for f in fields {
        weights.check_len(f.as_ref().len(), "multivariate Geary field")?;
    }
    Ok(weights.standardize().sparse().clone())
}

impl LocalStatistic for MultivariateGeary {
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
        let fields = &self.fields;
        let m = fields.len() as f64;
        local_pseudo_p(
            NAME,
            &self.stat,
            &self.weights,
            permutations,
            seed,
            Tail::Folded,
            |i, slots, wts| {
                fields
                    .iter()
                    .map(|z| geary_slot(z, i, slots, wts))
                    .sum::<f64>()
                    / m
            },
        )
    }

    fn groups(&self) -> Option<Vec<Group>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::local::LocalGeary;
    use crate::statistics::tests_support::{checkerboard, rook_grid, second_field};
    use approx::assert_relative_eq;

    #[test]
    fn test_stat() {
        let mv = MultivariateGeary::new(&rook_grid(), &[checkerboard(), second_field()]).unwrap();
        assert_eq!(mv.m(), 2);
        let expected = [2.8, 2.46667, 1.8, 2.46667, 2.3, 1.8, 2.8, 2.46667, 1.8];
        for (c, e) in mv.stat().iter().zip(expected) {
            assert_relative_eq!(*c, e, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_single_field_matches_geary() {
        let mv = MultivariateGeary::new(&rook_grid(), &[checkerboard()]).unwrap();
        let geary = LocalGeary::new(&rook_grid(), &checkerboard()).unwrap();
        for (a, b) in mv.stat().iter().zip(geary.stat()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rejects_bad_fields() {
        let empty: [Vec<f64>; 0] = [];
        assert!(matches!(
            MultivariateGeary::new(&rook_grid(), &empty),
            Err(Error::InvalidParameter { name: "fields", .. })
        ));
        assert!(matches!(
            MultivariateGeary::new(&rook_grid(), &[checkerboard(), vec![1.0; 3]]),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_mc() {
        let mv = MultivariateGeary::new(&rook_grid(), &[checkerboard(), second_field()]).unwrap();
        let p = mv.mc(99, Some(21)).unwrap();
        assert!(p.iter().all(|&v| v > 0.0 && v <= 1.0));
        assert!(mv.groups().is_none());
    }
}
