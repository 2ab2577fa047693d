//! Spatial discretization seen by the integrator
//!
//! The integrator only needs the operations below. [`FeDiscretization`]
//! provides them with Q1 elements on a quadrilateral mesh.

use fem::assembly::{assemble_mass, assemble_rhs, assemble_stiffness, project};
use fem::boundary::{BoundaryValues, interpolate_boundary_values};
use fem::mesh::{BoundaryId, Mesh, Point, hyper_cube};
use ndarray::Array1;
use solvers::CsrMatrix;

use crate::config::MeshConfig;

/// Operators and functionals over a fixed finite element space
pub trait Discretization {
    /// Number of degrees of freedom
    fn n_dofs(&self) -> usize;

    /// Number of active cells
    fn n_cells(&self) -> usize;

    /// Location of each degree of freedom
    fn support_points(&self) -> &[Point];

    /// M_ij = (φ_i, φ_j)
    fn assemble_mass(&self) -> CsrMatrix<f64>;

    /// A_ij = (∇φ_i, ∇φ_j)
    fn assemble_stiffness(&self) -> CsrMatrix<f64>;

    /// L2 projection of `f`
    fn project<F>(&self, f: F) -> fem::Result<Array1<f64>>
    where
        F: Fn(&Point) -> f64 + Sync;

    /// F_i = (f, φ_i)
    fn integrate_rhs<F>(&self, f: F) -> Array1<f64>
    where
        F: Fn(&Point) -> f64 + Sync;

    /// Nodal values of `f` on boundary part `tag`
    fn interpolate_boundary_values<F>(&self, tag: BoundaryId, f: F) -> BoundaryValues
    where
        F: Fn(&Point) -> f64;
}

/// Q1 finite elements on a quadrilateral mesh
#[derive(Debug, Clone)]
pub struct FeDiscretization {
    mesh: Mesh,
    /// Gauss points per direction for matrices and projection
    matrix_quadrature: usize,
    /// Gauss points per direction for the forcing integral
    rhs_quadrature: usize,
}

impl FeDiscretization {
    pub fn new(mesh: Mesh) -> Self {
        Self {
            mesh,
            matrix_quadrature: 3,
            rhs_quadrature: 2,
        }
    }

    /// Uniformly refined square from the mesh section of a configuration
    pub fn from_config(config: &MeshConfig) -> Self {
        Self::new(hyper_cube(config.lower, config.upper, config.refinements))
    }

    /// Override the quadrature orders
    pub fn with_quadrature(mut self, matrix_quadrature: usize, rhs_quadrature: usize) -> Self {
        self.matrix_quadrature = matrix_quadrature;
        self.rhs_quadrature = rhs_quadrature;
        self
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

impl Discretization for FeDiscretization {
    fn n_dofs(&self) -> usize {
        self.mesh.num_nodes()
    }

    fn n_cells(&self) -> usize {
        self.mesh.num_elements()
    }

    fn support_points(&self) -> &[Point] {
        &self.mesh.nodes
    }

    fn assemble_mass(&self) -> CsrMatrix<f64> {
        assemble_mass(&self.mesh, self.matrix_quadrature)
    }

    fn assemble_stiffness(&self) -> CsrMatrix<f64> {
        assemble_stiffness(&self.mesh, self.matrix_quadrature)
    }

    fn project<F>(&self, f: F) -> fem::Result<Array1<f64>>
    where
        F: Fn(&Point) -> f64 + Sync,
    {
        project(&self.mesh, self.matrix_quadrature, f)
    }

    fn integrate_rhs<F>(&self, f: F) -> Array1<f64>
    where
        F: Fn(&Point) -> f64 + Sync,
    {
        assemble_rhs(&self.mesh, self.rhs_quadrature, f)
    }

    fn interpolate_boundary_values<F>(&self, tag: BoundaryId, f: F) -> BoundaryValues
    where
        F: Fn(&Point) -> f64,
    {
        interpolate_boundary_values(&self.mesh, tag, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_grid_size() {
        let disc = FeDiscretization::from_config(&MeshConfig::default());
        assert_eq!(disc.n_cells(), 16384);
        assert_eq!(disc.n_dofs(), 129 * 129);
    }

    #[test]
    fn test_operators_match_dofs() {
        let disc = FeDiscretization::from_config(&MeshConfig {
            lower: -1.0,
            upper: 1.0,
            refinements: 2,
        });
        let mass = disc.assemble_mass();
        let laplace = disc.assemble_stiffness();

        assert_eq!(mass.num_rows, disc.n_dofs());
        assert_eq!(laplace.num_rows, disc.n_dofs());
        assert_eq!(disc.support_points().len(), disc.n_dofs());
        assert_eq!(disc.interpolate_boundary_values(0, |_| 1.0).len(), 16);
    }
}
