//! Load vector assembly
//!
//! Assembles F where F_i = ∫ f · φ_i dΩ for a scalar source f(x).

use crate::basis::{Jacobian, evaluate_shape};
use crate::mesh::{Element, Mesh, Point};
use crate::quadrature::QuadratureRule;
use ndarray::Array1;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Compute the element load vector
pub fn element_rhs<F>(mesh: &Mesh, elem: &Element, quad: &QuadratureRule, source: &F) -> Vec<f64>
where
    F: Fn(&Point) -> f64,
{
    let coords = mesh.element_coords(elem);
    let mut f_local = vec![0.0; coords.len()];

    for qp in quad.iter() {
        let shape = evaluate_shape(elem.element_type, qp.xi(), qp.eta());
        let jac = Jacobian::from_2d(&shape.gradients, &coords);
        let [x, y] = Jacobian::map_point(&shape.values, &coords);
        let fxw = source(&Point::new(x, y)) * jac.det.abs() * qp.weight;

        for (f_i, &phi_i) in f_local.iter_mut().zip(&shape.values) {
            *f_i += phi_i * fxw;
        }
    }

    f_local
}

/// Assemble the global load vector using `quad_order` Gauss points per direction
pub fn assemble_rhs<F>(mesh: &Mesh, quad_order: usize, source: F) -> Array1<f64>
where
    F: Fn(&Point) -> f64 + Sync,
{
    let local = |elem: &Element| {
        let quad = QuadratureRule::new(elem.element_type, quad_order);
        element_rhs(mesh, elem, &quad, &source)
    };

    #[cfg(feature = "parallel")]
    let contributions: Vec<Vec<f64>> = mesh.elements.par_iter().map(local).collect();

    #[cfg(not(feature = "parallel"))]
    let contributions: Vec<Vec<f64>> = mesh.elements.iter().map(local).collect();

    let mut rhs = Array1::zeros(mesh.num_nodes());
    for (elem, f_local) in mesh.elements.iter().zip(contributions) {
        for (&gi, f_i) in elem.nodes.iter().zip(f_local) {
            rhs[gi] += f_i;
        }
    }
    rhs
}
