//! Finite element matrix assembly
//!
//! Assembles mass and stiffness matrices, load vectors and L2 projections
//! from a mesh and the lowest-order Lagrange basis. Matrices come out in CSR
//! form. Every matrix assembled on the same mesh shares one sparsity pattern
//! because element contributions are never dropped, even when they vanish.

mod mass;
mod projection;
mod rhs;
mod stiffness;

pub use mass::*;
pub use projection::*;
pub use rhs::*;
pub use stiffness::*;

use crate::mesh::{Element, Mesh};
use crate::quadrature::QuadratureRule;
use solvers::CsrMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Dense element matrix, indexed by local vertex
pub(crate) type LocalMatrix = Vec<Vec<f64>>;

/// Run `kernel` on every element and scatter the results into a CSR matrix
pub(crate) fn assemble_matrix<F>(mesh: &Mesh, quad_order: usize, kernel: F) -> CsrMatrix<f64>
where
    F: Fn(&Mesh, &Element, &QuadratureRule) -> LocalMatrix + Sync,
{
    let n_dofs = mesh.num_nodes();

    let element_triplets = |elem: &Element| -> Vec<(usize, usize, f64)> {
        let quad = QuadratureRule::new(elem.element_type, quad_order);
        let local = kernel(mesh, elem, &quad);
        let mut triplets = Vec::with_capacity(elem.nodes.len() * elem.nodes.len());
        for (i, &gi) in elem.nodes.iter().enumerate() {
            for (j, &gj) in elem.nodes.iter().enumerate() {
                triplets.push((gi, gj, local[i][j]));
            }
        }
        triplets
    };

    #[cfg(feature = "parallel")]
    let triplets: Vec<(usize, usize, f64)> = mesh
        .elements
        .par_iter()
        .flat_map_iter(element_triplets)
        .collect();

    #[cfg(not(feature = "parallel"))]
    let triplets: Vec<(usize, usize, f64)> =
        mesh.elements.iter().flat_map(element_triplets).collect();

    CsrMatrix::from_triplets(n_dofs, n_dofs, triplets)
}
