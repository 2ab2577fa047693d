//! Compressed Sparse Row (CSR) matrix format
//!
//! CSR format stores:
//! - `values`: Non-zero entries in row-major order
//! - `col_indices`: Column index for each value, sorted within each row
//! - `row_ptrs`: Index into values/col_indices where each row starts

use crate::traits::{LinearOperator, RealField};
use ndarray::{Array1, Array2};
use std::ops::Range;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Rows above which mat-vec products are split across threads
#[cfg(feature = "rayon")]
const PARALLEL_ROW_THRESHOLD: usize = 246;

/// Compressed Sparse Row (CSR) matrix format
///
/// Memory-efficient storage for sparse matrices with O(nnz) space complexity.
/// Matrix-vector products are O(nnz) instead of O(n²) for dense matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T: RealField> {
    /// Number of rows
    pub num_rows: usize,
    /// Number of columns
    pub num_cols: usize,
    /// Non-zero values in row-major order
    pub values: Vec<T>,
    /// Column indices for each value
    pub col_indices: Vec<usize>,
    /// Row pointers: row_ptrs[i] is the start index in values/col_indices for row i
    /// row_ptrs[num_rows] = nnz (total number of non-zeros)
    pub row_ptrs: Vec<usize>,
}

impl<T: RealField> CsrMatrix<T> {
    /// Create a new empty CSR matrix
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self {
            num_rows,
            num_cols,
            values: Vec::new(),
            col_indices: Vec::new(),
            row_ptrs: vec![0; num_rows + 1],
        }
    }

    /// Create a CSR matrix from a dense matrix
    ///
    /// Only stores entries with magnitude > threshold
    pub fn from_dense(dense: &Array2<T>, threshold: T) -> Self {
        let num_rows = dense.nrows();
        let num_cols = dense.ncols();

        let mut values = Vec::new();
        let mut col_indices = Vec::new();
        let mut row_ptrs = vec![0usize; num_rows + 1];

        for i in 0..num_rows {
            for j in 0..num_cols {
                let val = dense[[i, j]];
                if val.abs() > threshold {
                    values.push(val);
                    col_indices.push(j);
                }
            }
            row_ptrs[i + 1] = values.len();
        }

        Self {
            num_rows,
            num_cols,
            values,
            col_indices,
            row_ptrs,
        }
    }

    /// Create a CSR matrix from COO (Coordinate) format triplets
    ///
    /// Triplets are (row, col, value). Duplicate entries are summed and
    /// explicit zeros are kept, so two operators assembled over the same
    /// element connectivity share one sparsity pattern.
    pub fn from_triplets(
        num_rows: usize,
        num_cols: usize,
        mut triplets: Vec<(usize, usize, T)>,
    ) -> Self {
        // Stable sort keeps the summation order of duplicates deterministic
        triplets.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut values: Vec<T> = Vec::with_capacity(triplets.len());
        let mut col_indices = Vec::with_capacity(triplets.len());
        let mut row_counts = vec![0usize; num_rows];
        let mut last: Option<(usize, usize)> = None;

        for (row, col, val) in triplets {
            assert!(
                row < num_rows && col < num_cols,
                "Triplet ({row}, {col}) out of bounds for {num_rows}x{num_cols} matrix"
            );
            if last == Some((row, col)) {
                if let Some(v) = values.last_mut() {
                    *v += val;
                }
            } else {
                values.push(val);
                col_indices.push(col);
                row_counts[row] += 1;
                last = Some((row, col));
            }
        }

        let mut row_ptrs = Vec::with_capacity(num_rows + 1);
        row_ptrs.push(0);
        let mut acc = 0;
        for count in row_counts {
            acc += count;
            row_ptrs.push(acc);
        }

        Self {
            num_rows,
            num_cols,
            values,
            col_indices,
            row_ptrs,
        }
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Get the range of indices in values/col_indices for a given row
    pub fn row_range(&self, row: usize) -> Range<usize> {
        self.row_ptrs[row]..self.row_ptrs[row + 1]
    }

    /// Get the (col, value) pairs for a row
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = self.row_range(row);
        self.col_indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Position of entry (i, j) in `values`, if it is stored
    pub fn entry_index(&self, i: usize, j: usize) -> Option<usize> {
        let range = self.row_range(i);
        self.col_indices[range.clone()]
            .binary_search(&j)
            .ok()
            .map(|offset| range.start + offset)
    }

    /// Get element at (i, j), returns 0 if not stored
    pub fn get(&self, i: usize, j: usize) -> T {
        self.entry_index(i, j)
            .map_or_else(T::zero, |idx| self.values[idx])
    }

    /// Extract diagonal elements
    pub fn diagonal(&self) -> Array1<T> {
        let n = self.num_rows.min(self.num_cols);
        Array1::from_iter((0..n).map(|i| self.get(i, i)))
    }

    /// Whether both matrices store exactly the same entries
    pub fn same_pattern(&self, other: &CsrMatrix<T>) -> bool {
        self.num_rows == other.num_rows
            && self.num_cols == other.num_cols
            && self.row_ptrs == other.row_ptrs
            && self.col_indices == other.col_indices
    }

    /// Overwrite this matrix with the entries of `other`
    ///
    /// Reuses the existing buffers when the sparsity patterns agree.
    pub fn copy_values_from(&mut self, other: &CsrMatrix<T>) {
        if self.same_pattern(other) {
            self.values.copy_from_slice(&other.values);
        } else {
            self.clone_from(other);
        }
    }

    /// In-place update `self += alpha * other`
    ///
    /// Matrices with identical sparsity are combined entry by entry; otherwise
    /// the union of both patterns is built.
    pub fn add_scaled(&mut self, alpha: T, other: &CsrMatrix<T>) {
        assert_eq!(
            (self.num_rows, self.num_cols),
            (other.num_rows, other.num_cols),
            "Matrix dimension mismatch"
        );

        if self.same_pattern(other) {
            for (a, &b) in self.values.iter_mut().zip(&other.values) {
                *a += alpha * b;
            }
            return;
        }

        let mut triplets = Vec::with_capacity(self.nnz() + other.nnz());
        for i in 0..self.num_rows {
            triplets.extend(self.row_entries(i).map(|(j, v)| (i, j, v)));
            triplets.extend(other.row_entries(i).map(|(j, v)| (i, j, alpha * v)));
        }
        *self = CsrMatrix::from_triplets(self.num_rows, self.num_cols, triplets);
    }

    /// Scale all values by a scalar
    pub fn scale(&mut self, scalar: T) {
        for val in &mut self.values {
            *val *= scalar;
        }
    }

    /// Matrix-vector product: y = A * x
    ///
    /// Uses parallel processing when the `rayon` feature is enabled and the
    /// matrix is large enough to benefit from parallelization.
    pub fn matvec(&self, x: &Array1<T>) -> Array1<T> {
        let mut y = Array1::from_elem(self.num_rows, T::zero());
        self.matvec_into(x, &mut y);
        y
    }

    /// Matrix-vector product into an existing buffer: y = A * x
    pub fn matvec_into(&self, x: &Array1<T>, y: &mut Array1<T>) {
        assert_eq!(x.len(), self.num_cols, "Input vector size mismatch");
        assert_eq!(y.len(), self.num_rows, "Output vector size mismatch");

        #[cfg(feature = "rayon")]
        {
            if self.num_rows >= PARALLEL_ROW_THRESHOLD {
                if let (Some(x_slice), Some(y_slice)) = (x.as_slice(), y.as_slice_mut()) {
                    y_slice.par_iter_mut().enumerate().for_each(|(i, yi)| {
                        *yi = self.row_dot(i, |j| x_slice[j]);
                    });
                    return;
                }
            }
        }

        for (i, yi) in y.iter_mut().enumerate() {
            *yi = self.row_dot(i, |j| x[j]);
        }
    }

    #[inline]
    fn row_dot(&self, row: usize, x: impl Fn(usize) -> T) -> T {
        let mut sum = T::zero();
        for idx in self.row_range(row) {
            sum += self.values[idx] * x(self.col_indices[idx]);
        }
        sum
    }

    /// Quadratic form xᵀ A x
    pub fn quadratic_form(&self, x: &Array1<T>) -> T {
        assert_eq!(
            self.num_rows, self.num_cols,
            "Quadratic form needs a square matrix"
        );
        assert_eq!(x.len(), self.num_cols, "Input vector size mismatch");

        (0..self.num_rows).fold(T::zero(), |acc, i| {
            acc + x[i] * self.row_dot(i, |j| x[j])
        })
    }

    /// Create identity matrix in CSR format
    pub fn identity(n: usize) -> Self {
        Self {
            num_rows: n,
            num_cols: n,
            values: vec![T::one(); n],
            col_indices: (0..n).collect(),
            row_ptrs: (0..=n).collect(),
        }
    }

    /// Convert to dense matrix (for debugging/small matrices)
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::from_elem((self.num_rows, self.num_cols), T::zero());

        for i in 0..self.num_rows {
            for (j, v) in self.row_entries(i) {
                dense[[i, j]] = v;
            }
        }

        dense
    }
}

impl<T: RealField> LinearOperator<T> for CsrMatrix<T> {
    fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn num_cols(&self) -> usize {
        self.num_cols
    }

    fn apply(&self, x: &Array1<T>) -> Array1<T> {
        self.matvec(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn laplacian_1d() -> CsrMatrix<f64> {
        let dense = array![[2.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 2.0]];
        CsrMatrix::from_dense(&dense, 1e-15)
    }

    #[test]
    fn test_csr_from_dense() {
        let csr = laplacian_1d();
        assert_eq!(csr.num_rows, 3);
        assert_eq!(csr.nnz(), 7);
        assert_eq!(csr.row_ptrs, vec![0, 2, 5, 7]);
        assert_relative_eq!(csr.get(1, 2), -1.0);
        assert_relative_eq!(csr.get(0, 2), 0.0);
    }

    #[test]
    fn test_csr_matvec() {
        let csr = laplacian_1d();
        let y = csr.matvec(&array![1.0, 2.0, 3.0]);
        assert_relative_eq!(y[0], 0.0);
        assert_relative_eq!(y[1], 0.0);
        assert_relative_eq!(y[2], 4.0);
    }

    #[test]
    fn test_csr_triplets_duplicate() {
        let triplets = vec![(1, 1, 2.0), (0, 0, 1.0), (1, 1, 3.0), (1, 0, 0.0)];
        let csr = CsrMatrix::from_triplets(2, 2, triplets);

        // explicit zero at (1, 0) is kept in the pattern
        assert_eq!(csr.nnz(), 3);
        assert_eq!(csr.entry_index(1, 0), Some(1));
        assert_relative_eq!(csr.get(1, 1), 5.0);
    }

    #[test]
    fn test_csr_triplets_empty_rows() {
        let csr = CsrMatrix::from_triplets(4, 4, vec![(2, 3, 1.5)]);
        assert_eq!(csr.row_ptrs, vec![0, 0, 0, 1, 1]);
        assert_relative_eq!(csr.get(2, 3), 1.5);
    }

    #[test]
    fn test_add_scaled_same_pattern() {
        let mut a = laplacian_1d();
        let b = laplacian_1d();
        a.add_scaled(0.5, &b);
        assert_relative_eq!(a.get(0, 0), 3.0);
        assert_relative_eq!(a.get(1, 0), -1.5);
        assert_eq!(a.nnz(), 7);
    }

    #[test]
    fn test_add_scaled_different_pattern() {
        let mut a: CsrMatrix<f64> = CsrMatrix::identity(3);
        a.add_scaled(2.0, &laplacian_1d());
        assert_relative_eq!(a.get(0, 0), 5.0);
        assert_relative_eq!(a.get(2, 1), -2.0);
        assert_eq!(a.nnz(), 7);
    }

    #[test]
    fn test_copy_values_from() {
        let mut a = laplacian_1d();
        a.scale(10.0);
        a.copy_values_from(&laplacian_1d());
        assert_eq!(a, laplacian_1d());

        let mut id: CsrMatrix<f64> = CsrMatrix::identity(3);
        id.copy_values_from(&laplacian_1d());
        assert_eq!(id, laplacian_1d());
    }

    #[test]
    fn test_quadratic_form() {
        let csr = laplacian_1d();
        // [1,1,1] · L [1,1,1] = 1 + 0 + 1
        assert_relative_eq!(csr.quadratic_form(&array![1.0, 1.0, 1.0]), 2.0);
    }

    #[test]
    fn test_to_dense_roundtrip() {
        let dense = array![[4.0, 1.0], [1.0, 3.0]];
        let csr = CsrMatrix::from_dense(&dense, 1e-15);
        assert_eq!(csr.to_dense(), dense);
    }

    #[test]
    fn test_linear_operator_impl() {
        let id: CsrMatrix<f64> = CsrMatrix::identity(4);
        assert!(id.is_square());
        let x = array![1.0, 2.0, 3.0, 4.0];
        assert_eq!(LinearOperator::apply(&id, &x), x);
    }
}
