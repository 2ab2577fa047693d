//! Finite element basis functions
//!
//! Implements the lowest-order Lagrange basis: P1 on triangles and Q1 on
//! quadrilaterals. Degrees of freedom coincide with mesh vertices.

mod lagrange;
mod shape;

pub use lagrange::*;
pub use shape::*;
