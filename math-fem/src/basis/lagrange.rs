//! Lagrange basis functions for finite elements
//!
//! Linear P1 on triangles and bilinear Q1 on quadrilaterals.

/// Evaluate P1 triangle basis functions at (xi, eta)
/// Reference triangle: (0,0), (1,0), (0,1)
/// Returns [N0, N1, N2]
pub fn p1_triangle(xi: f64, eta: f64) -> [f64; 3] {
    [1.0 - xi - eta, xi, eta]
}

/// Evaluate P1 triangle basis function gradients (constant)
/// Returns [[dN0/dxi, dN0/deta], [dN1/dxi, dN1/deta], [dN2/dxi, dN2/deta]]
pub fn p1_triangle_grad() -> [[f64; 2]; 3] {
    [[-1.0, -1.0], [1.0, 0.0], [0.0, 1.0]]
}

/// Evaluate Q1 quadrilateral basis functions at (xi, eta)
/// Reference quad: [-1,1] x [-1,1]
/// Nodes: (−1,−1), (1,−1), (1,1), (−1,1)
pub fn q1_quadrilateral(xi: f64, eta: f64) -> [f64; 4] {
    [
        0.25 * (1.0 - xi) * (1.0 - eta),
        0.25 * (1.0 + xi) * (1.0 - eta),
        0.25 * (1.0 + xi) * (1.0 + eta),
        0.25 * (1.0 - xi) * (1.0 + eta),
    ]
}

/// Evaluate Q1 quadrilateral basis function gradients at (xi, eta)
pub fn q1_quadrilateral_grad(xi: f64, eta: f64) -> [[f64; 2]; 4] {
    [
        [-0.25 * (1.0 - eta), -0.25 * (1.0 - xi)],
        [0.25 * (1.0 - eta), -0.25 * (1.0 + xi)],
        [0.25 * (1.0 + eta), 0.25 * (1.0 + xi)],
        [-0.25 * (1.0 + eta), 0.25 * (1.0 - xi)],
    ]
}
