//! Numerical quadrature rules for finite element integration
//!
//! Provides Gauss-Legendre rules on quadrilaterals and symmetric rules on
//! triangles.

mod gauss;
mod rules;

pub use gauss::*;
pub use rules::*;
