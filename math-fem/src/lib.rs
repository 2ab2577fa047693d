//! Finite element building blocks for time-dependent scalar problems
//!
//! This crate provides the spatial discretization used by the wave equation
//! integrator: 2D meshes with uniform refinement, the lowest-order Lagrange
//! basis, and assembly of mass and Laplace matrices, load vectors and L2
//! projections, plus Dirichlet elimination on CSR systems.
//!
//! # Features
//!
//! - **2D meshes**: Triangles and quadrilaterals, structured generators, red refinement
//! - **Lagrange elements**: P1 on triangles, Q1 on quadrilaterals
//! - **Assembly**: Mass, stiffness, right-hand side and L2 projection
//! - **Boundary conditions**: Dirichlet values by symmetric elimination
//! - **Parallel assembly**: Element loops on rayon with the `parallel` feature
//!
//! # Example
//!
//! ```
//! use fem::assembly::{assemble_mass, assemble_stiffness};
//! use fem::mesh::hyper_cube;
//!
//! let mesh = hyper_cube(-1.0, 1.0, 3);
//! let mass = assemble_mass(&mesh, 3);
//! let laplace = assemble_stiffness(&mesh, 3);
//! assert_eq!(mass.num_rows, 81);
//! assert!(mass.same_pattern(&laplace));
//! ```

pub mod assembly;
pub mod basis;
pub mod boundary;
pub mod error;
pub mod mesh;
pub mod quadrature;

pub use error::{FemError, Result};

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
