//! Stiffness matrix assembly
//!
//! Assembles the Laplace matrix A where A_ij = ∫ ∇φ_i · ∇φ_j dΩ

use super::{LocalMatrix, assemble_matrix};
use crate::basis::{Jacobian, evaluate_shape};
use crate::mesh::{Element, Mesh};
use crate::quadrature::QuadratureRule;
use solvers::CsrMatrix;

/// Compute the element Laplace matrix
pub fn element_stiffness(mesh: &Mesh, elem: &Element, quad: &QuadratureRule) -> LocalMatrix {
    let coords = mesh.element_coords(elem);
    let n_nodes = coords.len();
    let mut k_local = vec![vec![0.0; n_nodes]; n_nodes];

    for qp in quad.iter() {
        let shape = evaluate_shape(elem.element_type, qp.xi(), qp.eta());
        let jac = Jacobian::from_2d(&shape.gradients, &coords);
        let jxw = jac.det.abs() * qp.weight;

        let grads: Vec<[f64; 2]> = shape
            .gradients
            .iter()
            .map(|g| jac.transform_gradient(g))
            .collect();

        for (i, row) in k_local.iter_mut().enumerate() {
            for (j, k_ij) in row.iter_mut().enumerate() {
                *k_ij += (grads[i][0] * grads[j][0] + grads[i][1] * grads[j][1]) * jxw;
            }
        }
    }

    k_local
}

/// Assemble the global Laplace matrix using `quad_order` Gauss points per direction
pub fn assemble_stiffness(mesh: &Mesh, quad_order: usize) -> CsrMatrix<f64> {
    assemble_matrix(mesh, quad_order, element_stiffness)
}
