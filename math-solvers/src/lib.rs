//! Sparse linear algebra for FEM time stepping
//!
//! This crate provides the linear-system primitives consumed by the wave
//! equation integrator: a CSR sparse matrix with the operator algebra the
//! theta scheme needs, and Conjugate Gradient solvers for the symmetric
//! positive definite systems it produces.
//!
//! # Features
//!
//! - **Sparse Matrices**: CSR format with mat-vec, quadratic forms and `A += αB`
//! - **Iterative Solvers**: CG and preconditioned CG with an initial guess
//! - **Preconditioners**: Identity, Jacobi
//! - **Generic Scalar Types**: Works with f64 and f32
//!
//! # Example
//!
//! ```
//! use solvers::{CgConfig, CsrMatrix, cg_with_guess};
//! use ndarray::array;
//!
//! let matrix = CsrMatrix::from_dense(&array![[4.0, 1.0], [1.0, 3.0]], 1e-15);
//! let rhs = array![1.0, 2.0];
//! let solution = cg_with_guess(&matrix, &rhs, array![0.0, 0.0], &CgConfig::default());
//! assert!(solution.converged);
//! ```

pub mod iterative;
pub mod preconditioners;
pub mod sparse;
pub mod traits;

// Re-export main types
pub use sparse::CsrMatrix;
pub use traits::{LinearOperator, Preconditioner, RealField};

// Re-export iterative solvers
pub use iterative::{CgConfig, CgSolution, cg, cg_with_guess, pcg_with_guess};

// Re-export preconditioners
pub use preconditioners::{DiagonalPreconditioner, IdentityPreconditioner};
