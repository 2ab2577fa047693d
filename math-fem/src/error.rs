//! Error types for FEM operations

use thiserror::Error;

/// Errors raised while building discrete operators
#[derive(Error, Debug)]
pub enum FemError {
    #[error("Mesh has no elements")]
    EmptyMesh,

    #[error(
        "L2 projection did not converge after {iterations} iterations (relative residual {residual:.3e})"
    )]
    ProjectionFailed { iterations: usize, residual: f64 },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, FemError>;
