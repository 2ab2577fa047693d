//! Validation tests comparing FEM solutions against analytical solutions
//!
//! A manufactured Poisson problem checks that assembly, boundary elimination
//! and CG fit together and converge at the expected rate.

use fem::assembly::{assemble_mass, assemble_rhs, assemble_stiffness, project};
use fem::boundary::{apply_boundary_values, interpolate_boundary_values};
use fem::mesh::{Mesh, hyper_cube, rectangular_mesh_triangles};
use ndarray::Array1;
use solvers::{CgConfig, cg_with_guess};
use std::f64::consts::PI;

/// Nodal max error against an exact field
fn max_nodal_error<F>(mesh: &Mesh, solution: &Array1<f64>, exact: F) -> f64
where
    F: Fn(f64, f64) -> f64,
{
    mesh.nodes
        .iter()
        .zip(solution.iter())
        .map(|(p, u)| (u - exact(p.x, p.y)).abs())
        .fold(0.0, f64::max)
}

/// Solve -Δu = f with u = exact on the boundary
fn solve_poisson(mesh: &Mesh) -> Array1<f64> {
    let exact = |x: f64, y: f64| (PI * x).sin() * (PI * y).sin() + x;
    let source = |x: f64, y: f64| 2.0 * PI * PI * (PI * x).sin() * (PI * y).sin();

    let mut matrix = assemble_stiffness(mesh, 2);
    let mut rhs = assemble_rhs(mesh, 3, |p| source(p.x, p.y));
    let mut solution = Array1::zeros(mesh.num_nodes());
    let values = interpolate_boundary_values(mesh, 0, |p| exact(p.x, p.y));
    apply_boundary_values(&values, &mut matrix, &mut solution, &mut rhs);

    let config = CgConfig {
        max_iterations: 2000,
        tolerance: 1e-12,
        print_interval: 0,
    };
    let result = cg_with_guess(&matrix, &rhs, solution, &config);
    assert!(result.converged, "CG failed: residual {}", result.residual);
    result.x
}

#[test]
fn test_poisson_quads_converges() {
    let exact = |x: f64, y: f64| (PI * x).sin() * (PI * y).sin() + x;

    let coarse = hyper_cube(0.0, 1.0, 3);
    let fine = hyper_cube(0.0, 1.0, 4);
    let e_coarse = max_nodal_error(&coarse, &solve_poisson(&coarse), exact);
    let e_fine = max_nodal_error(&fine, &solve_poisson(&fine), exact);

    assert!(e_fine < 1e-2, "fine error {}", e_fine);
    // second order: halving h divides the error by about four
    assert!(e_coarse / e_fine > 3.0, "rate {}", e_coarse / e_fine);
}

#[test]
fn test_poisson_triangles() {
    let exact = |x: f64, y: f64| (PI * x).sin() * (PI * y).sin() + x;
    let mesh = rectangular_mesh_triangles(0.0, 1.0, 0.0, 1.0, 16, 16);

    let error = max_nodal_error(&mesh, &solve_poisson(&mesh), exact);
    assert!(error < 2e-2, "error {}", error);
}

#[test]
fn test_projection_energy_matches_integral() {
    // ‖P u‖²_M ≈ ∫ u² for a smooth u
    let mesh = hyper_cube(-1.0, 1.0, 4);
    let mass = assemble_mass(&mesh, 3);
    let u = project(&mesh, 3, |p| (PI * p.x).cos()).unwrap();

    // ∫_{[-1,1]²} cos²(πx) = 2
    let l2_sq = mass.quadratic_form(&u);
    assert!((l2_sq - 2.0).abs() < 1e-3, "got {}", l2_sq);
}
