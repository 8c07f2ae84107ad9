//! Permutation engines shared by every statistic.
//!
//! Each permutation (global) or observation (local) draws from its own
//! ChaCha stream derived from one seed, so results do not depend on
//! scheduling and are identical with and without the `parallel` feature.

use rand::seq::index::sample;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use spatialstats_core::{CsrMatrix, Error, Result};
use tracing::{debug, warn};

use crate::maybe_rayon::*;

/// How permuted values are compared with the observed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tail {
    /// `>=` for a positive observation, `<=` otherwise.
    Signed,
    /// Tail chosen by which side of the permutation mean the observation lies.
    /// Used for statistics that cannot be negative.
    Folded,
}

pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::thread_rng().gen())
}

pub(crate) fn stream_rng(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

fn check_permutations(permutations: usize) -> Result<()> {
    if permutations == 0 {
        return Err(Error::InvalidParameter {
            name: "permutations",
            value: permutations.to_string(),
            reason: "must be at least 1".into(),
        });
    }
    Ok(())
}

fn pseudo_p(extreme: usize, permutations: usize) -> f64 {
    (extreme as f64 + 1.0) / (permutations as f64 + 1.0)
}

/// Count permuted values at least as extreme as `observed`.
fn count_extreme(observed: f64, permuted: &[f64], tail: Tail) -> usize {
    let upper = match tail {
        Tail::Signed => observed > 0.0,
        Tail::Folded => {
            let mean = permuted.iter().sum::<f64>() / permuted.len() as f64;
            // ties with the mean go to the lower tail
            observed > mean
        }
    };
    if upper {
        permuted.iter().filter(|&&v| v >= observed).count()
    } else {
        permuted.iter().filter(|&&v| v <= observed).count()
    }
}

/// Global permutation test.
///
/// Shuffles `values` once per permutation and recomputes the statistic with
/// `stat_fn`. The observed value is rounded to 5 decimals before comparing so
/// that permutations reproducing it exactly are not lost to float noise.
pub(crate) fn global_pseudo_p<F>(
    observed: f64,
    values: &[f64],
    permutations: usize,
    seed: Option<u64>,
    stat_fn: F,
) -> Result<f64>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    check_permutations(permutations)?;
    let seed = resolve_seed(seed);
    debug!(permutations, seed, "global permutation test");

    let permuted: Vec<f64> = (0..permutations)
        .into_par_iter()
        .map(|p| {
            let mut rng = stream_rng(seed, p as u64);
            let mut shuffled = values.to_vec();
            shuffled.shuffle(&mut rng);
            stat_fn(&shuffled)
        })
        .collect();

    let observed = (observed * 1e5).round() / 1e5;
    Ok(pseudo_p(
        count_extreme(observed, &permuted, Tail::Signed),
        permutations,
    ))
}

/// Local conditional-randomization test.
///
/// For observation `i` the value at `i` stays fixed. Each permutation draws
/// `deg(i)` distinct other observations to stand in for its neighbors; a
/// self-loop in row `i` keeps pointing at `i`. `stat_fn(i, sample, weights)`
/// recomputes the local value where `sample[k]` is the observation placed
/// in the slot of the row's `k`-th entry.
///
/// Observations without neighbors get `p = 1.0`.
pub(crate) fn local_pseudo_p<F>(
    statistic: &'static str,
    observed: &[f64],
    weights: &CsrMatrix,
    permutations: usize,
    seed: Option<u64>,
    tail: Tail,
    stat_fn: F,
) -> Result<Vec<f64>>
where
    F: Fn(usize, &[usize], &[f64]) -> f64 + Sync,
{
    check_permutations(permutations)?;
    let n = weights.n();
    if observed.len() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            actual: observed.len(),
            context: "observed local statistic",
        });
    }

    let seed = resolve_seed(seed);
    debug!(statistic, n, permutations, seed, "conditional randomization");

    let results: Vec<Option<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let (cols, vals) = weights.row(i).ok()?;
            let off_diagonal = cols.iter().filter(|&&j| j != i).count();
            if off_diagonal == 0 {
                return None;
            }

            let mut rng = stream_rng(seed, i as u64);
            let mut slots = vec![i; cols.len()];
            let mut permuted = Vec::with_capacity(permutations);

            for _ in 0..permutations {
                let mut drawn = sample(&mut rng, n - 1, off_diagonal)
                    .into_iter()
                    .map(|k| if k >= i { k + 1 } else { k });
                for (slot, &j) in slots.iter_mut().zip(cols) {
                    if j != i {
                        *slot = drawn.next().unwrap_or(i);
                    }
                }
                permuted.push(stat_fn(i, &slots, vals));
            }

            Some(pseudo_p(
                count_extreme(observed[i], &permuted, tail),
                permutations,
            ))
        })
        .collect();

    let islands = results.iter().filter(|p| p.is_none()).count();
    if islands > 0 {
        warn!(statistic, islands, "observations without neighbors get p = 1");
    }

    Ok(results.into_iter().map(|p| p.unwrap_or(1.0)).collect())
}
