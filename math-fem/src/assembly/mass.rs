//! Mass matrix assembly
//!
//! Assembles the mass matrix M where M_ij = ∫ φ_i · φ_j dΩ

use super::{LocalMatrix, assemble_matrix};
use crate::basis::{Jacobian, evaluate_shape};
use crate::mesh::{Element, Mesh};
use crate::quadrature::QuadratureRule;
use solvers::CsrMatrix;

/// Compute the element mass matrix
pub fn element_mass(mesh: &Mesh, elem: &Element, quad: &QuadratureRule) -> LocalMatrix {
    let coords = mesh.element_coords(elem);
    let n_nodes = coords.len();
    let mut m_local = vec![vec![0.0; n_nodes]; n_nodes];

    for qp in quad.iter() {
        let shape = evaluate_shape(elem.element_type, qp.xi(), qp.eta());
        let jac = Jacobian::from_2d(&shape.gradients, &coords);
        let jxw = jac.det.abs() * qp.weight;

        for (i, row) in m_local.iter_mut().enumerate() {
            for (j, m_ij) in row.iter_mut().enumerate() {
                *m_ij += shape.values[i] * shape.values[j] * jxw;
            }
        }
    }

    m_local
}

/// Assemble the global mass matrix using `quad_order` Gauss points per direction
pub fn assemble_mass(mesh: &Mesh, quad_order: usize) -> CsrMatrix<f64> {
    assemble_matrix(mesh, quad_order, element_mass)
}
