//! Boundary condition handling for finite element problems
//!
//! Dirichlet values are interpolated at boundary nodes and imposed on an
//! assembled system by symmetric elimination.

mod dirichlet;

pub use dirichlet::*;
