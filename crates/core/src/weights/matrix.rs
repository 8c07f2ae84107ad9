//! Keyed spatial weights matrix.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::OnceLock;

use ndarray::Array2;
use tracing::debug;

use super::csr::CsrMatrix;
use crate::error::{Error, Result};

/// Spatial weights over an ordered set of observation keys.
///
/// `keys` fixes the observation order: row `i` of every dense or sparse view
/// belongs to `keys[i]`. Rows are stored as `(column, weight)` lists sorted by
/// column, with zero weights dropped. Derived matrices (`standardize`,
/// `window`) are new values; an existing matrix is never modified.
#[derive(Debug, Clone)]
pub struct WeightsMatrix<K> {
    keys: Vec<K>,
    index: HashMap<K, usize>,
    rows: Vec<Vec<(usize, f64)>>,
    sparse: OnceLock<CsrMatrix>,
}

impl<K: Clone + Eq + Hash + Debug> WeightsMatrix<K> {
    /// Build from an adjacency map `{key -> [(neighbor, weight)]}`.
    ///
    /// The map must have exactly one entry per key in `keys` (entries may be
    /// empty). Neighbors must be known keys, weights finite and non-negative,
    /// and no neighbor may be listed twice in the same row.
    pub fn new(keys: Vec<K>, adjacency: HashMap<K, Vec<(K, f64)>>) -> Result<Self> {
        let index = index_keys(&keys)?;

        if adjacency.len() != keys.len() {
            return Err(Error::InvalidWeights(format!(
                "adjacency has {} entries for {} observations",
                adjacency.len(),
                keys.len()
            )));
        }

        let mut rows = Vec::with_capacity(keys.len());
        for key in &keys {
            let entries = adjacency.get(key).ok_or_else(|| {
                Error::InvalidWeights(format!("no adjacency entry for key {:?}", key))
            })?;
            let row = entries
                .iter()
                .map(|(neighbor, w)| {
                    let j = *index.get(neighbor).ok_or_else(|| {
                        Error::InvalidWeights(format!(
                            "key {:?} lists unknown neighbor {:?}",
                            key, neighbor
                        ))
                    })?;
                    Ok((j, *w))
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(clean_row(row, key)?);
        }

        Ok(Self::from_parts(keys, index, rows))
    }

    /// Build from `(origin, neighbor, weight)` triples.
    ///
    /// Keys that never appear as an origin get an empty row.
    pub fn from_pairs<I>(keys: Vec<K>, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, K, f64)>,
    {
        let index = index_keys(&keys)?;
        let mut raw: Vec<Vec<(usize, f64)>> = vec![Vec::new(); keys.len()];

        for (origin, neighbor, w) in pairs {
            let i = *index.get(&origin).ok_or_else(|| {
                Error::InvalidWeights(format!("pair origin {:?} is not an observation", origin))
            })?;
            let j = *index.get(&neighbor).ok_or_else(|| {
                Error::InvalidWeights(format!(
                    "key {:?} lists unknown neighbor {:?}",
                    origin, neighbor
                ))
            })?;
            raw[i].push((j, w));
        }

        let rows = raw
            .into_iter()
            .zip(&keys)
            .map(|(row, key)| clean_row(row, key))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_parts(keys, index, rows))
    }

    /// Build from a dense `n × n` matrix aligned with `keys`.
    pub fn from_dense(keys: Vec<K>, dense: &Array2<f64>) -> Result<Self> {
        let n = keys.len();
        if dense.dim() != (n, n) {
            return Err(Error::DimensionMismatch {
                expected: n,
                actual: if dense.nrows() != n { dense.nrows() } else { dense.ncols() },
                context: "dense weights",
            });
        }

        let index = index_keys(&keys)?;
        let rows = dense
            .rows()
            .into_iter()
            .zip(&keys)
            .map(|(row, key)| {
                let entries = row.iter().copied().enumerate().collect();
                clean_row(entries, key)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_parts(keys, index, rows))
    }

    /// Row-standardized copy: every row with neighbors sums to 1.
    ///
    /// Rows without neighbors stay empty. Rows already summing to 1 are kept
    /// as they are, so standardizing twice gives the same matrix.
    pub fn standardize(&self) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let sum: f64 = row.iter().map(|&(_, w)| w).sum();
                if sum == 0.0 || is_unit_sum(sum, row.len()) {
                    row.clone()
                } else {
                    row.iter().map(|&(j, w)| (j, w / sum)).collect()
                }
            })
            .collect();

        self.derive(rows)
    }

    /// Copy with a unit self-loop on every row.
    ///
    /// A matrix whose trace is already non-zero is returned unchanged, so an
    /// existing diagonal is never doubled.
    pub fn window(&self) -> Self {
        if self.trace() != 0.0 {
            return self.clone();
        }

        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut row = row.clone();
                let pos = row.partition_point(|&(j, _)| j < i);
                row.insert(pos, (i, 1.0));
                row
            })
            .collect();

        self.derive(rows)
    }

    fn derive(&self, rows: Vec<Vec<(usize, f64)>>) -> Self {
        Self::from_parts(self.keys.clone(), self.index.clone(), rows)
    }
}

impl<K> WeightsMatrix<K> {
    fn from_parts(keys: Vec<K>, index: HashMap<K, usize>, rows: Vec<Vec<(usize, f64)>>) -> Self {
        Self {
            keys,
            index,
            rows,
            sparse: OnceLock::new(),
        }
    }

    /// Number of observations.
    pub fn n(&self) -> usize {
        self.keys.len()
    }

    /// Observation keys in matrix order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// `(column, weight)` entries of row `i`, sorted by column.
    pub fn row(&self, i: usize) -> Result<&[(usize, f64)]> {
        self.rows
            .get(i)
            .map(Vec::as_slice)
            .ok_or(Error::SparseIndexOutOfRange {
                index: i,
                bound: self.n(),
            })
    }

    /// Dense `n × n` view.
    pub fn dense(&self) -> Array2<f64> {
        let n = self.n();
        let mut dense = Array2::zeros((n, n));
        for (i, row) in self.rows.iter().enumerate() {
            for &(j, w) in row {
                dense[[i, j]] = w;
            }
        }
        dense
    }

    /// CSR view, built on first use and cached.
    pub fn sparse(&self) -> &CsrMatrix {
        self.sparse.get_or_init(|| {
            let csr = CsrMatrix::from_rows(&self.rows);
            debug!(n = csr.n(), nnz = csr.nnz(), "built CSR weights");
            csr
        })
    }

    /// Number of neighbors in each row.
    pub fn weight_counts(&self) -> Vec<usize> {
        self.rows.iter().map(Vec::len).collect()
    }

    /// Sum of the diagonal.
    pub fn trace(&self) -> f64 {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| row.iter().find(|&&(j, _)| j == i).map(|&(_, w)| w))
            .sum()
    }

    /// Sum of all weights (`S0`).
    pub fn total_weight(&self) -> f64 {
        self.rows.iter().flatten().map(|&(_, w)| w).sum()
    }

    /// True when every non-empty row sums to 1.
    pub fn is_standardized(&self) -> bool {
        self.rows.iter().all(|row| {
            let sum: f64 = row.iter().map(|&(_, w)| w).sum();
            row.is_empty() || is_unit_sum(sum, row.len())
        })
    }

    /// Fail with `DimensionMismatch` unless `len` equals the observation count.
    pub fn check_len(&self, len: usize, context: &'static str) -> Result<()> {
        if len != self.n() {
            return Err(Error::DimensionMismatch {
                expected: self.n(),
                actual: len,
                context,
            });
        }
        Ok(())
    }
}

impl<K: Eq + Hash> WeightsMatrix<K> {
    /// Position of `key` in the observation order.
    pub fn index_of(&self, key: &K) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Neighbors of `key` with their weights.
    pub fn neighbors(&self, key: &K) -> Option<Vec<(&K, f64)>> {
        let i = self.index_of(key)?;
        Some(self.rows[i].iter().map(|&(j, w)| (&self.keys[j], w)).collect())
    }
}

impl<K: PartialEq> PartialEq for WeightsMatrix<K> {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys && self.rows == other.rows
    }
}

fn is_unit_sum(sum: f64, len: usize) -> bool {
    (sum - 1.0).abs() <= f64::EPSILON * (len.max(1) as f64) * 4.0
}

fn index_keys<K: Clone + Eq + Hash + Debug>(keys: &[K]) -> Result<HashMap<K, usize>> {
    let mut index = HashMap::with_capacity(keys.len());
    for (i, key) in keys.iter().enumerate() {
        if index.insert(key.clone(), i).is_some() {
            return Err(Error::InvalidWeights(format!(
                "duplicate observation key {:?}",
                key
            )));
        }
    }
    Ok(index)
}

/// Validate one row, drop zero weights and sort by column.
fn clean_row<K: Debug>(mut row: Vec<(usize, f64)>, key: &K) -> Result<Vec<(usize, f64)>> {
    if let Some(&(_, w)) = row.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
        return Err(Error::InvalidWeights(format!(
            "key {:?} has invalid weight {}",
            key, w
        )));
    }

    let mut seen = HashSet::with_capacity(row.len());
    if row.iter().any(|&(j, _)| !seen.insert(j)) {
        return Err(Error::InvalidWeights(format!(
            "key {:?} lists the same neighbor twice",
            key
        )));
    }

    row.retain(|&(_, w)| w != 0.0);
    row.sort_unstable_by_key(|&(j, _)| j);
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn ring() -> WeightsMatrix<&'static str> {
        let adjacency = HashMap::from([
            ("a", vec![("b", 1.0)]),
            ("b", vec![("a", 1.0), ("c", 1.0)]),
            ("c", vec![("b", 1.0)]),
        ]);
        WeightsMatrix::new(vec!["a", "b", "c"], adjacency).unwrap()
    }

    #[test]
    fn test_dense_view() {
        let w = ring();
        assert_eq!(
            w.dense(),
            array![[0.0, 1.0, 0.0], [1.0, 0.0, 1.0], [0.0, 1.0, 0.0]]
        );
        assert_eq!(w.weight_counts(), vec![1, 2, 1]);
        assert_eq!(w.total_weight(), 4.0);
        assert_eq!(w.trace(), 0.0);
    }

    #[test]
    fn test_sparse_matches_dense() {
        let w = ring();
        assert_eq!(w.sparse().to_dense(), w.dense());
        let s = w.standardize();
        assert_eq!(s.sparse().to_dense(), s.dense());
        let win = w.window();
        assert_eq!(win.sparse().to_dense(), win.dense());
    }

    #[test]
    fn test_standardize() {
        let s = ring().standardize();
        assert_eq!(
            s.dense(),
            array![[0.0, 1.0, 0.0], [0.5, 0.0, 0.5], [0.0, 1.0, 0.0]]
        );
        assert!(s.is_standardized());
        assert!(!ring().is_standardized());
    }

    #[test]
    fn test_standardize_idempotent() {
        let keys = vec![0u32, 1, 2, 3];
        let w = WeightsMatrix::from_pairs(
            keys,
            vec![(0, 1, 3.0), (0, 2, 7.0), (0, 3, 1.0), (1, 0, 0.3), (1, 2, 0.7), (2, 3, 9.0)],
        )
        .unwrap();
        let once = w.standardize();
        let twice = once.standardize();
        assert_eq!(once, twice);
        // the island keeps an empty row
        assert!(once.row(3).unwrap().is_empty());
    }

    #[test]
    fn test_window() {
        let win = ring().window();
        assert_eq!(
            win.dense(),
            array![[1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]]
        );
        assert_eq!(win.trace(), 3.0);
        // no duplicate self-loop
        assert_eq!(win.window(), win);

        let ws = win.standardize();
        assert_relative_eq!(ws.dense()[[0, 0]], 0.5);
        assert_relative_eq!(ws.dense()[[1, 1]], 1.0 / 3.0);
    }

    #[test]
    fn test_window_keeps_existing_diagonal() {
        let dense = array![[2.0, 1.0], [1.0, 0.0]];
        let w = WeightsMatrix::from_dense(vec!['x', 'y'], &dense).unwrap();
        assert_eq!(w.window(), w);
    }

    #[test]
    fn test_zero_weights_dropped() {
        let dense = array![[0.0, 0.0], [1.0, 0.0]];
        let w = WeightsMatrix::from_dense(vec![1, 2], &dense).unwrap();
        assert_eq!(w.weight_counts(), vec![0, 1]);
        assert_eq!(w.sparse().nnz(), 1);
    }

    #[test]
    fn test_key_mismatch() {
        let adjacency = HashMap::from([("a", vec![("b", 1.0)]), ("b", vec![])]);
        let err = WeightsMatrix::new(vec!["a", "b", "c"], adjacency).unwrap_err();
        assert!(matches!(err, Error::InvalidWeights(_)));

        let adjacency = HashMap::from([("a", vec![("b", 1.0)]), ("z", vec![])]);
        assert!(WeightsMatrix::new(vec!["a", "b"], adjacency).is_err());
    }

    #[test]
    fn test_invalid_entries() {
        let unknown = HashMap::from([("a", vec![("q", 1.0)]), ("b", vec![])]);
        assert!(WeightsMatrix::new(vec!["a", "b"], unknown).is_err());

        let negative = HashMap::from([("a", vec![("b", -1.0)]), ("b", vec![])]);
        assert!(WeightsMatrix::new(vec!["a", "b"], negative).is_err());

        let duplicate = HashMap::from([("a", vec![("b", 1.0), ("b", 1.0)]), ("b", vec![])]);
        assert!(WeightsMatrix::new(vec!["a", "b"], duplicate).is_err());

        assert!(WeightsMatrix::from_pairs(vec!["a", "a"], Vec::new()).is_err());
    }

    #[test]
    fn test_lookup() {
        let w = ring();
        assert_eq!(w.index_of(&"c"), Some(2));
        assert_eq!(w.index_of(&"z"), None);
        assert_eq!(w.neighbors(&"b").unwrap(), vec![(&"a", 1.0), (&"c", 1.0)]);
        assert!(w.check_len(3, "values").is_ok());
        assert!(matches!(
            w.check_len(4, "values"),
            Err(Error::DimensionMismatch { expected: 3, actual: 4, .. })
        ));
    }
}
