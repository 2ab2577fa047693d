//! Shape function evaluation for finite elements
//!
//! Provides a unified interface for evaluating basis functions and their
//! gradients at points of the reference element, plus the geometric map to
//! the physical cell.

use super::lagrange::*;
use crate::mesh::ElementType;

/// Shape functions evaluated at a point
#[derive(Debug, Clone)]
pub struct ShapeValues {
    /// Basis function values [N_0, N_1, ..., N_n]
    pub values: Vec<f64>,
    /// Reference gradients [[dN_0/dxi, dN_0/deta], ...]
    pub gradients: Vec<[f64; 2]>,
}

/// Evaluate shape functions for an element at a reference point
pub fn evaluate_shape(element_type: ElementType, xi: f64, eta: f64) -> ShapeValues {
    match element_type {
        ElementType::Triangle => ShapeValues {
            values: p1_triangle(xi, eta).to_vec(),
            gradients: p1_triangle_grad().to_vec(),
        },
        ElementType::Quadrilateral => ShapeValues {
            values: q1_quadrilateral(xi, eta).to_vec(),
            gradients: q1_quadrilateral_grad(xi, eta).to_vec(),
        },
    }
}

/// Jacobian of the reference-to-physical map
#[derive(Debug, Clone)]
pub struct Jacobian {
    /// [[dx/dxi, dx/deta], [dy/dxi, dy/deta]]
    pub matrix: [[f64; 2]; 2],
    /// Determinant of Jacobian
    pub det: f64,
    /// Inverse of Jacobian (for gradient transformation)
    pub inverse: [[f64; 2]; 2],
}

impl Jacobian {
    /// Compute the Jacobian from reference gradients and node coordinates
    pub fn from_2d(grad_ref: &[[f64; 2]], coords: &[[f64; 2]]) -> Self {
        let mut j = [[0.0; 2]; 2];

        for (g, c) in grad_ref.iter().zip(coords) {
            j[0][0] += g[0] * c[0]; // dx/dxi
            j[0][1] += g[1] * c[0]; // dx/deta
            j[1][0] += g[0] * c[1]; // dy/dxi
            j[1][1] += g[1] * c[1]; // dy/deta
        }

        let det = j[0][0] * j[1][1] - j[0][1] * j[1][0];
        let inv_det = 1.0 / det;

        let inverse = [
            [j[1][1] * inv_det, -j[0][1] * inv_det],
            [-j[1][0] * inv_det, j[0][0] * inv_det],
        ];

        Self {
            matrix: j,
            det,
            inverse,
        }
    }

    /// Transform reference gradients to physical gradients
    /// grad_physical = J^{-T} * grad_ref
    pub fn transform_gradient(&self, grad_ref: &[f64; 2]) -> [f64; 2] {
        [
            self.inverse[0][0] * grad_ref[0] + self.inverse[1][0] * grad_ref[1],
            self.inverse[0][1] * grad_ref[0] + self.inverse[1][1] * grad_ref[1],
        ]
    }

    /// Map a reference point to physical coordinates given the shape values
    pub fn map_point(values: &[f64], coords: &[[f64; 2]]) -> [f64; 2] {
        values
            .iter()
            .zip(coords)
            .fold([0.0, 0.0], |acc, (&n, c)| [acc[0] + n * c[0], acc[1] + n * c[1]])
    }
}
