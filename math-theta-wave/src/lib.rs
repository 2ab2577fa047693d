//! Wave equation solver with theta-method time stepping
//!
//! Solves `u_tt - Δu = f` with time-dependent Dirichlet data on a finite
//! element discretization. Each time step performs two conjugate gradient
//! solves, one for the displacement U and one for the velocity V, and
//! reports the discrete energy `(VᵀMV + UᵀAU) / 2`.
//!
//! # Example
//!
//! ```no_run
//! use theta_wave::{FeDiscretization, NullSink, SimulationConfig, WaveIntegrator, WaveProblem};
//!
//! let config = SimulationConfig::default();
//! let discretization = FeDiscretization::from_config(&config.mesh);
//! let mut integrator = WaveIntegrator::setup(discretization, WaveProblem::reference(), &config)?;
//! let summary = integrator.run(&mut NullSink)?;
//! println!("{} steps", summary.steps.len());
//! # Ok::<(), theta_wave::WaveError>(())
//! ```

pub mod config;
pub mod discretization;
pub mod error;
pub mod integrator;
pub mod output;
pub mod problem;

pub use config::{
    ConfigError, ConfigFormat, MeshConfig, OutputConfig, SimulationConfig, SolverConfig,
    TimeConfig, load_config, save_config,
};
pub use discretization::{Discretization, FeDiscretization};
pub use error::{Equation, OutputError, Result, WaveError};
pub use integrator::WaveIntegrator;
pub use output::{
    GnuplotWriter, MemorySink, NullSink, OutputFrame, OutputSink, RunSummary, StepReport,
    StoredFrame,
};
pub use problem::{SpaceTimeFn, WaveProblem};
