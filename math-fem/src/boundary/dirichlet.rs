//! Dirichlet (essential) boundary conditions
//!
//! Imposes u = g on boundary nodes by symmetric elimination in an assembled
//! CSR system. The sparsity pattern is left untouched; eliminated entries are
//! stored as explicit zeros so system matrices can be refilled in place on
//! the next time step.

use crate::mesh::{BoundaryId, Mesh, Point};
use ndarray::Array1;
use solvers::CsrMatrix;
use std::collections::BTreeMap;

/// Prescribed nodal values, keyed by degree of freedom
pub type BoundaryValues = BTreeMap<usize, f64>;

/// Evaluate `g` at every node on boundary edges tagged `marker`
pub fn interpolate_boundary_values<F>(mesh: &Mesh, marker: BoundaryId, g: F) -> BoundaryValues
where
    F: Fn(&Point) -> f64,
{
    mesh.boundary_nodes(marker)
        .into_iter()
        .map(|node| (node, g(&mesh.nodes[node])))
        .collect()
}

/// Apply Dirichlet values to `matrix · solution = rhs`
///
/// For each constrained node i with value g:
/// - b[j] -= A[j, i] · g for every other row j, then A[j, i] = 0
/// - A[i, j] = 0 for j ≠ i, keeping A[i, i] (the mean absolute diagonal
///   stands in when A[i, i] is zero)
/// - b[i] = A[i, i] · g and x[i] = g
///
/// The result stays symmetric if the input was. Applying the same values a
/// second time changes nothing.
///
/// # Panics
///
/// Panics if a constrained node is out of range or its row has no stored
/// diagonal entry. The sparsity pattern is never extended, so assembled
/// matrices always carry their diagonal.
pub fn apply_boundary_values(
    values: &BoundaryValues,
    matrix: &mut CsrMatrix<f64>,
    solution: &mut Array1<f64>,
    rhs: &mut Array1<f64>,
) {
    if values.is_empty() {
        return;
    }
    assert_eq!(matrix.num_rows, matrix.num_cols, "System matrix must be square");
    assert_eq!(rhs.len(), matrix.num_rows, "Right-hand side size mismatch");
    assert_eq!(solution.len(), matrix.num_rows, "Solution size mismatch");

    let n = matrix.num_rows;
    let diagonal = matrix.diagonal();
    let nonzero_diagonals: Vec<f64> = diagonal
        .iter()
        .map(|d| d.abs())
        .filter(|&d| d > 0.0)
        .collect();
    let fallback = if nonzero_diagonals.is_empty() {
        1.0
    } else {
        nonzero_diagonals.iter().sum::<f64>() / nonzero_diagonals.len() as f64
    };

    for (&dof, &g) in values {
        assert!(dof < n, "Boundary dof {} out of range", dof);

        let Some(diag) = matrix.entry_index(dof, dof) else {
            panic!("Constrained dof {} has no stored diagonal", dof);
        };
        if matrix.values[diag] == 0.0 {
            log::warn!("Zero diagonal at constrained dof {}, using {:.3e}", dof, fallback);
            matrix.values[diag] = fallback;
        }
        let a_ii = matrix.values[diag];

        for k in matrix.row_range(dof) {
            let j = matrix.col_indices[k];
            if j == dof {
                continue;
            }
            matrix.values[k] = 0.0;

            // mirror entry A[j, dof]
            if let Some(kt) = matrix.entry_index(j, dof) {
                let a_ji = matrix.values[kt];
                if a_ji != 0.0 {
                    rhs[j] -= a_ji * g;
                    matrix.values[kt] = 0.0;
                }
            }
        }

        rhs[dof] = a_ii * g;
        solution[dof] = g;
    }
}
