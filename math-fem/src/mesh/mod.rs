//! Mesh types and generators for FEM
//!
//! This module provides 2D mesh data structures, structured generators and
//! uniform refinement.

mod generators;
mod refinement;
mod types;

pub use generators::*;
pub use refinement::*;
pub use types::*;
