//! Mesh generators for common domains
//!
//! Provides structured meshes on rectangles. All generators tag the whole
//! boundary with id 0.

use super::refinement::refine_global;
use super::types::{ElementType, Mesh, Point};

/// Generate a rectangular mesh with triangular elements
pub fn rectangular_mesh_triangles(
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    nx: usize,
    ny: usize,
) -> Mesh {
    let mut mesh = Mesh::new();
    add_grid_nodes(&mut mesh, x_min, x_max, y_min, y_max, nx, ny);

    // two triangles per cell
    for j in 0..ny {
        for i in 0..nx {
            let n00 = j * (nx + 1) + i;
            let n10 = n00 + 1;
            let n01 = n00 + (nx + 1);
            let n11 = n01 + 1;

            mesh.add_element(ElementType::Triangle, vec![n00, n10, n11]);
            mesh.add_element(ElementType::Triangle, vec![n00, n11, n01]);
        }
    }

    mesh.detect_boundaries();
    mesh
}

/// Generate a rectangular mesh with quadrilateral elements
pub fn rectangular_mesh_quads(
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    nx: usize,
    ny: usize,
) -> Mesh {
    let mut mesh = Mesh::new();
    add_grid_nodes(&mut mesh, x_min, x_max, y_min, y_max, nx, ny);

    for j in 0..ny {
        for i in 0..nx {
            let n00 = j * (nx + 1) + i;
            let n10 = n00 + 1;
            let n01 = n00 + (nx + 1);
            let n11 = n01 + 1;

            mesh.add_element(ElementType::Quadrilateral, vec![n00, n10, n11, n01]);
        }
    }

    mesh.detect_boundaries();
    mesh
}

/// Single-cell square `[lower, upper]²` refined `refinements` times
///
/// Each refinement splits every cell into four, so the result has
/// `4^refinements` cells and `(2^refinements + 1)²` nodes.
pub fn hyper_cube(lower: f64, upper: f64, refinements: usize) -> Mesh {
    let mut mesh = rectangular_mesh_quads(lower, upper, lower, upper, 1, 1);
    refine_global(&mut mesh, refinements);
    mesh
}

/// Generate a unit square mesh with triangles
pub fn unit_square_triangles(n: usize) -> Mesh {
    rectangular_mesh_triangles(0.0, 1.0, 0.0, 1.0, n, n)
}

/// Generate a unit square mesh with quadrilaterals
pub fn unit_square_quads(n: usize) -> Mesh {
    rectangular_mesh_quads(0.0, 1.0, 0.0, 1.0, n, n)
}

fn add_grid_nodes(
    mesh: &mut Mesh,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    nx: usize,
    ny: usize,
) {
    let dx = (x_max - x_min) / nx as f64;
    let dy = (y_max - y_min) / ny as f64;

    for j in 0..=ny {
        for i in 0..=nx {
            let x = x_min + i as f64 * dx;
            let y = y_min + j as f64 * dy;
            mesh.add_node(Point::new(x, y));
        }
    }
}
