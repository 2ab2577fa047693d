//! Iterative solvers for linear systems
//!
//! The operators produced by the theta scheme are symmetric positive definite
//! (mass matrix, or mass plus a positive multiple of the Laplacian), so the
//! Conjugate Gradient family is all that is needed:
//! - [`cg`]: plain CG from a zero initial guess
//! - [`cg_with_guess`]: CG warm-started from a previous solution
//! - [`pcg_with_guess`]: preconditioned CG with an initial guess

mod cg;

pub use cg::{CgConfig, CgSolution, cg, cg_with_guess, pcg_with_guess};
