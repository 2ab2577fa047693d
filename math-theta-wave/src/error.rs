//! Error types for the wave integrator

use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;

/// The two half-step equations solved per time step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equation {
    /// Displacement equation, matrix `M + θ²k²A`
    U,
    /// Velocity equation, matrix `M`
    V,
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Equation::U => write!(f, "u-equation"),
            Equation::V => write!(f, "v-equation"),
        }
    }
}

/// Errors writing simulation output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

/// Errors that abort a simulation run
#[derive(Error, Debug)]
pub enum WaveError {
    #[error("Setup failed: {0}")]
    Setup(String),

    #[error(
        "CG did not converge for the {equation} at step {step} (t = {time}): {iterations} iterations, relative residual {residual:.3e}"
    )]
    SolverDivergence {
        equation: Equation,
        step: usize,
        time: f64,
        iterations: usize,
        residual: f64,
    },

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

pub type Result<T> = std::result::Result<T, WaveError>;
