//! L2 projection onto the finite element space
//!
//! Finds u_h with (u_h, φ_i) = (f, φ_i) for every basis function, i.e.
//! solves M u = F with Jacobi-preconditioned CG.

use super::{assemble_mass, assemble_rhs};
use crate::error::{FemError, Result};
use crate::mesh::{Mesh, Point};
use ndarray::Array1;
use solvers::{CgConfig, CsrMatrix, DiagonalPreconditioner, pcg_with_guess};

/// Relative tolerance for the projection solve
pub const PROJECTION_TOLERANCE: f64 = 1e-12;

/// Project `f` using an already assembled mass matrix
pub fn project_with_mass<F>(
    mesh: &Mesh,
    mass: &CsrMatrix<f64>,
    quad_order: usize,
    f: F,
) -> Result<Array1<f64>>
where
    F: Fn(&Point) -> f64 + Sync,
{
    if mesh.num_elements() == 0 {
        return Err(FemError::EmptyMesh);
    }
    if mass.num_rows != mesh.num_nodes() {
        return Err(FemError::DimensionMismatch {
            expected: mesh.num_nodes(),
            actual: mass.num_rows,
        });
    }

    let rhs = assemble_rhs(mesh, quad_order, f);
    let precond = DiagonalPreconditioner::from_csr(mass);
    let config = CgConfig {
        max_iterations: 5 * mesh.num_nodes().max(100),
        tolerance: PROJECTION_TOLERANCE,
        print_interval: 0,
    };

    let solution = pcg_with_guess(mass, &precond, &rhs, Array1::zeros(rhs.len()), &config);
    if !solution.converged {
        return Err(FemError::ProjectionFailed {
            iterations: solution.iterations,
            residual: solution.residual,
        });
    }

    log::debug!(
        "L2 projection converged in {} iterations",
        solution.iterations
    );
    Ok(solution.x)
}

/// Project `f` onto the nodal space of `mesh`
pub fn project<F>(mesh: &Mesh, quad_order: usize, f: F) -> Result<Array1<f64>>
where
    F: Fn(&Point) -> f64 + Sync,
{
    if mesh.num_elements() == 0 {
        return Err(FemError::EmptyMesh);
    }
    let mass = assemble_mass(mesh, quad_order);
    project_with_mass(mesh, &mass, quad_order, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Mesh, hyper_cube};
    use approx::assert_relative_eq;

    #[test]
    fn test_project_reproduces_bilinear_field() {
        // Q1 contains x·y exactly
        let mesh = hyper_cube(-1.0, 1.0, 2);
        let u = project(&mesh, 3, |p| 1.0 + 2.0 * p.x - p.y + 0.5 * p.x * p.y).unwrap();

        for (i, node) in mesh.nodes.iter().enumerate() {
            let exact = 1.0 + 2.0 * node.x - node.y + 0.5 * node.x * node.y;
            assert_relative_eq!(u[i], exact, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_project_zero() {
        let mesh = hyper_cube(0.0, 1.0, 1);
        let u = project(&mesh, 3, |_| 0.0).unwrap();
        assert!(u.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_project_empty_mesh() {
        let mesh = Mesh::new();
        assert!(matches!(project(&mesh, 3, |_| 1.0), Err(FemError::EmptyMesh)));
    }
}
