//! Compressed sparse row storage for square weight matrices.

use ndarray::Array2;

use crate::error::{Error, Result};

/// Square `n × n` matrix in compressed sparse row form.
///
/// Row `i` owns the entries `row_index[i]..row_index[i + 1]` of `values`
/// and `col_index`. Zeros are never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    values: Vec<f64>,
    col_index: Vec<usize>,
    row_index: Vec<usize>,
    n: usize,
}

impl CsrMatrix {
    /// Create a CSR matrix from raw parts, validating the layout.
    pub fn new(
        values: Vec<f64>,
        col_index: Vec<usize>,
        row_index: Vec<usize>,
        n: usize,
    ) -> Result<Self> {
        if values.len() != col_index.len() {
            return Err(Error::DimensionMismatch {
                expected: values.len(),
                actual: col_index.len(),
                context: "CSR column index",
            });
        }
        if row_index.len() != n + 1 {
            return Err(Error::DimensionMismatch {
                expected: n + 1,
                actual: row_index.len(),
                context: "CSR row index",
            });
        }
        if row_index[0] != 0 || row_index[n] != values.len() {
            return Err(Error::InvalidWeights(format!(
                "CSR row index must span 0..{}, got {}..{}",
                values.len(),
                row_index[0],
                row_index[n]
            )));
        }
        if row_index.windows(2).any(|w| w[1] < w[0]) {
            return Err(Error::InvalidWeights(
                "CSR row index must be non-decreasing".into(),
            ));
        }
        if let Some(&col) = col_index.iter().find(|&&c| c >= n) {
            return Err(Error::SparseIndexOutOfRange { index: col, bound: n });
        }

        Ok(Self {
            values,
            col_index,
            row_index,
            n,
        })
    }

    /// Build from a dense square matrix, skipping zero entries.
    pub fn from_dense(dense: &Array2<f64>) -> Result<Self> {
        let (rows, cols) = dense.dim();
        if rows != cols {
            return Err(Error::DimensionMismatch {
                expected: rows,
                actual: cols,
                context: "dense weights columns",
            });
        }

        let mut values = Vec::new();
        let mut col_index = Vec::new();
        let mut row_index = Vec::with_capacity(rows + 1);
        row_index.push(0);

        for row in dense.rows() {
            for (j, &w) in row.iter().enumerate() {
                if w != 0.0 {
                    values.push(w);
                    col_index.push(j);
                }
            }
            row_index.push(values.len());
        }

        Ok(Self {
            values,
            col_index,
            row_index,
            n: rows,
        })
    }

    /// Assemble from per-row `(column, weight)` lists that are already valid.
    pub(crate) fn from_rows(rows: &[Vec<(usize, f64)>]) -> Self {
        let nnz = rows.iter().map(Vec::len).sum();
        let mut values = Vec::with_capacity(nnz);
        let mut col_index = Vec::with_capacity(nnz);
        let mut row_index = Vec::with_capacity(rows.len() + 1);
        row_index.push(0);

        for row in rows {
            for &(j, w) in row {
                values.push(w);
                col_index.push(j);
            }
            row_index.push(values.len());
        }

        Self {
            values,
            col_index,
            row_index,
            n: rows.len(),
        }
    }

    /// Number of rows (and columns).
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn col_index(&self) -> &[usize] {
        &self.col_index
    }

    pub fn row_index(&self) -> &[usize] {
        &self.row_index
    }

    /// Column indices and weights of row `i`.
    pub fn row(&self, i: usize) -> Result<(&[usize], &[f64])> {
        self.check_row(i)?;
        Ok(self.row_unchecked(i))
    }

    #[inline]
    pub(crate) fn row_unchecked(&self, i: usize) -> (&[usize], &[f64]) {
        let range = self.row_index[i]..self.row_index[i + 1];
        (&self.col_index[range.clone()], &self.values[range])
    }

    /// Iterate over all rows in order.
    pub fn rows(&self) -> impl Iterator<Item = (&[usize], &[f64])> + '_ {
        (0..self.n).map(move |i| self.row_unchecked(i))
    }

    /// Number of stored neighbors in row `i`.
    pub fn degree(&self, i: usize) -> Result<usize> {
        self.check_row(i)?;
        Ok(self.row_index[i + 1] - self.row_index[i])
    }

    /// Dot product of row `i` with `x`.
    pub fn dot_row(&self, x: &[f64], i: usize) -> Result<f64> {
        self.check_vec(x)?;
        self.check_row(i)?;
        Ok(self.dot_row_unchecked(x, i))
    }

    #[inline]
    fn dot_row_unchecked(&self, x: &[f64], i: usize) -> f64 {
        let (cols, vals) = self.row_unchecked(i);
        cols.iter().zip(vals).map(|(&j, &w)| w * x[j]).sum()
    }

    /// Matrix-vector product `W · x`.
    pub fn mul_vec(&self, x: &[f64]) -> Result<Vec<f64>> {
        self.check_vec(x)?;
        Ok((0..self.n).map(|i| self.dot_row_unchecked(x, i)).collect())
    }

    /// Expand back into a dense `n × n` matrix.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.n, self.n));
        for (i, j, w) in self.coordinates() {
            dense[[i, j]] = w;
        }
        dense
    }

    /// Iterate over stored entries as `(row, col, value)`.
    pub fn coordinates(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.n).flat_map(move |i| {
            let (cols, vals) = self.row_unchecked(i);
            cols.iter().zip(vals).map(move |(&j, &w)| (i, j, w))
        })
    }

    pub fn row_sums(&self) -> Vec<f64> {
        self.rows().map(|(_, vals)| vals.iter().sum()).collect()
    }

    pub fn col_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.n];
        for (&j, &w) in self.col_index.iter().zip(&self.values) {
            sums[j] += w;
        }
        sums
    }

    fn check_row(&self, i: usize) -> Result<()> {
        if i >= self.n {
            return Err(Error::SparseIndexOutOfRange {
                index: i,
                bound: self.n,
            });
        }
        Ok(())
    }

    fn check_vec(&self, x: &[f64]) -> Result<()> {
        if x.len() != self.n {
            return Err(Error::DimensionMismatch {
                expected: self.n,
                actual: x.len(),
                context: "CSR vector operand",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn anti_diagonal() -> CsrMatrix {
        CsrMatrix::from_dense(&array![[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]).unwrap()
    }

    #[test]
    fn test_from_dense_layout() {
        let csr = anti_diagonal();
        assert_eq!(csr.values(), &[1.0, 1.0, 1.0]);
        assert_eq!(csr.col_index(), &[2, 1, 0]);
        assert_eq!(csr.row_index(), &[0, 1, 2, 3]);
        assert_eq!(csr.nnz(), 3);
    }

    #[test]
    fn test_mul_vec() {
        let csr = anti_diagonal();
        assert_eq!(csr.mul_vec(&[1.0, 2.0, 3.0]).unwrap(), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_dot_row() {
        let csr = CsrMatrix::from_dense(&array![[0.0, 0.5, 0.5], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]])
            .unwrap();
        let x = [2.0, 4.0, 6.0];
        assert_eq!(csr.dot_row(&x, 0).unwrap(), 5.0);
        assert_eq!(csr.dot_row(&x, 1).unwrap(), 2.0);
        assert_eq!(csr.dot_row(&x, 2).unwrap(), 0.0);
    }

    #[test]
    fn test_bad_operands() {
        let csr = anti_diagonal();
        assert!(matches!(
            csr.dot_row(&[1.0, 2.0], 0),
            Err(Error::DimensionMismatch { expected: 3, actual: 2, .. })
        ));
        assert_eq!(
            csr.dot_row(&[1.0, 2.0, 3.0], 3),
            Err(Error::SparseIndexOutOfRange { index: 3, bound: 3 })
        );
        assert!(csr.mul_vec(&[1.0; 4]).is_err());
        assert!(csr.row(7).is_err());
    }

    #[test]
    fn test_new_validates_layout() {
        assert!(CsrMatrix::new(vec![1.0], vec![0], vec![0, 1], 1).is_ok());
        // row_index[n] disagrees with nnz
        assert!(CsrMatrix::new(vec![1.0], vec![0], vec![0, 0], 1).is_err());
        // decreasing row_index
        assert!(CsrMatrix::new(vec![1.0, 1.0], vec![0, 1], vec![0, 2, 1, 2], 3).is_err());
        // column beyond n
        assert_eq!(
            CsrMatrix::new(vec![1.0], vec![5], vec![0, 1, 1], 2),
            Err(Error::SparseIndexOutOfRange { index: 5, bound: 2 })
        );
    }

    #[test]
    fn test_dense_round_trip_and_sums() {
        let dense = array![[0.0, 2.0, 0.0], [1.0, 0.0, 3.0], [0.0, 4.0, 0.0]];
        let csr = CsrMatrix::from_dense(&dense).unwrap();
        assert_eq!(csr.to_dense(), dense);
        assert_eq!(csr.row_sums(), vec![2.0, 4.0, 4.0]);
        assert_eq!(csr.col_sums(), vec![1.0, 6.0, 3.0]);
        assert_eq!(csr.degree(1).unwrap(), 2);

        let coords: Vec<_> = csr.coordinates().collect();
        assert_eq!(coords[0], (0, 1, 2.0));
        assert_eq!(coords.len(), 4);
    }

    #[test]
    fn test_non_square_rejected() {
        let dense = Array2::<f64>::zeros((2, 3));
        assert!(CsrMatrix::from_dense(&dense).is_err());
    }
}
