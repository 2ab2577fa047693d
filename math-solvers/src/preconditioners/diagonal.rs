//! Diagonal (Jacobi) preconditioner
//!
//! Simple but effective preconditioner that scales by the diagonal of A.
//! For FEM mass matrices it removes most of the mesh-size dependence of the
//! condition number, which is why the L2 projection uses it.

use crate::sparse::CsrMatrix;
use crate::traits::{Preconditioner, RealField};
use ndarray::Array1;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Diagonal (Jacobi) preconditioner
///
/// M = diag(A), so M^(-1) scales each component by 1/A_ii
#[derive(Debug, Clone)]
pub struct DiagonalPreconditioner<T: RealField> {
    /// Inverse diagonal elements
    inv_diag: Array1<T>,
}

impl<T: RealField> DiagonalPreconditioner<T> {
    /// Create a diagonal preconditioner from a CSR matrix
    pub fn from_csr(matrix: &CsrMatrix<T>) -> Self {
        Self::from_diagonal(&matrix.diagonal())
    }

    /// Create from a diagonal vector directly
    ///
    /// Zero diagonal entries are left unscaled.
    pub fn from_diagonal(diag: &Array1<T>) -> Self {
        let tiny = T::from_f64_lossy(1e-30);
        let inv_diag = diag.mapv(|d| if d.abs() > tiny { d.recip() } else { T::one() });
        Self { inv_diag }
    }
}

impl<T: RealField> Preconditioner<T> for DiagonalPreconditioner<T> {
    fn apply(&self, r: &Array1<T>) -> Array1<T> {
        #[cfg(feature = "rayon")]
        {
            if let (true, Some(r_slice), Some(inv_slice)) =
                (r.len() >= 1000, r.as_slice(), self.inv_diag.as_slice())
            {
                let results: Vec<T> = r_slice
                    .par_iter()
                    .zip(inv_slice.par_iter())
                    .map(|(&ri, &di)| ri * di)
                    .collect();
                return Array1::from_vec(results);
            }
        }

        r.iter()
            .zip(self.inv_diag.iter())
            .map(|(&ri, &di)| ri * di)
            .collect()
    }
}
