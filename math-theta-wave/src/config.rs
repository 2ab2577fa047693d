//! Simulation configuration in JSON or TOML
//!
//! Every section has defaults, so an empty file (or no file at all) gives the
//! reference run: `[-1,1]²` refined 7 times, `k = 1/64`, `θ = 0.5`, up to
//! `t = 5`.
//!
//! ## Example TOML Configuration
//!
//! ```toml
//! [mesh]
//! refinements = 5
//!
//! [time]
//! theta = 0.5
//! time_step = 0.03125
//! end_time = 1.0
//!
//! [output]
//! directory = "out"
//! interval = 4
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Result, WaveError};

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Spatial grid
    #[serde(default)]
    pub mesh: MeshConfig,

    /// Time stepping
    #[serde(default)]
    pub time: TimeConfig,

    /// Inner linear solves
    #[serde(default)]
    pub solver: SolverConfig,

    /// Field and summary output
    #[serde(default)]
    pub output: OutputConfig,
}

/// Square domain `[lower, upper]²` with uniform refinement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    #[serde(default = "default_lower")]
    pub lower: f64,

    #[serde(default = "default_upper")]
    pub upper: f64,

    /// Number of global refinements of the single starting cell
    #[serde(default = "default_refinements")]
    pub refinements: usize,
}

fn default_lower() -> f64 {
    -1.0
}
fn default_upper() -> f64 {
    1.0
}
fn default_refinements() -> usize {
    7
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            lower: default_lower(),
            upper: default_upper(),
            refinements: default_refinements(),
        }
    }
}

/// Theta-method parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeConfig {
    /// Blending factor, 0 explicit, 1 implicit, 0.5 Crank-Nicolson
    #[serde(default = "default_theta")]
    pub theta: f64,

    /// Step size k
    #[serde(default = "default_time_step")]
    pub time_step: f64,

    #[serde(default = "default_end_time")]
    pub end_time: f64,

    #[serde(default)]
    pub start_time: f64,
}

fn default_theta() -> f64 {
    0.5
}
fn default_time_step() -> f64 {
    1.0 / 64.0
}
fn default_end_time() -> f64 {
    5.0
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            theta: default_theta(),
            time_step: default_time_step(),
            end_time: default_end_time(),
            start_time: 0.0,
        }
    }
}

/// CG settings for both half-step solves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Relative tolerance, scaled by the right-hand side norm
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_tolerance() -> f64 {
    1e-8
}
fn default_max_iterations() -> usize {
    1000
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl SolverConfig {
    /// CG parameters for the solver crate
    pub fn cg_config(&self) -> solvers::CgConfig<f64> {
        solvers::CgConfig {
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            print_interval: 0,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving `solution-NNN.gnuplot` files
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Emit every n-th step
    #[serde(default = "default_interval")]
    pub interval: usize,

    #[serde(default = "default_true")]
    pub write_fields: bool,

    /// JSON run summary destination
    #[serde(default)]
    pub summary_file: Option<PathBuf>,
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}
fn default_interval() -> usize {
    1
}
fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            interval: default_interval(),
            write_fields: true,
            summary_file: None,
        }
    }
}

impl SimulationConfig {
    /// Reject parameter combinations the integrator cannot run
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(WaveError::Configuration(msg));

        let time = &self.time;
        if !(0.0..=1.0).contains(&time.theta) {
            return invalid(format!("theta must lie in [0, 1], got {}", time.theta));
        }
        if !time.time_step.is_finite() || time.time_step <= 0.0 {
            return invalid(format!(
                "time step must be positive and finite, got {}",
                time.time_step
            ));
        }
        if !time.start_time.is_finite() || !time.end_time.is_finite() {
            return invalid("start and end time must be finite".to_string());
        }
        if time.end_time < time.start_time {
            return invalid(format!(
                "end time {} precedes start time {}",
                time.end_time, time.start_time
            ));
        }

        if !(self.solver.tolerance > 0.0) {
            return invalid(format!(
                "solver tolerance must be positive, got {}",
                self.solver.tolerance
            ));
        }
        if self.solver.max_iterations == 0 {
            return invalid("solver needs at least one iteration".to_string());
        }

        if !(self.mesh.lower < self.mesh.upper) {
            return invalid(format!(
                "mesh bounds must satisfy lower < upper, got [{}, {}]",
                self.mesh.lower, self.mesh.upper
            ));
        }
        if self.mesh.refinements > MAX_REFINEMENTS {
            return invalid(format!(
                "at most {} refinements supported, got {}",
                MAX_REFINEMENTS, self.mesh.refinements
            ));
        }

        if self.output.interval == 0 {
            return invalid("output interval must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Upper bound on global refinements
pub const MAX_REFINEMENTS: usize = 12;

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }
}

/// Load a configuration file; format is picked from the extension
pub fn load_config<P: AsRef<Path>>(path: P) -> std::result::Result<SimulationConfig, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;
    let content = fs::read_to_string(path)?;

    parse_config(&content, format)
}

/// Parse a configuration from a string
pub fn parse_config(
    content: &str,
    format: ConfigFormat,
) -> std::result::Result<SimulationConfig, ConfigError> {
    match format {
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
        }
    }
}

/// Save a configuration; format is picked from the extension
pub fn save_config<P: AsRef<Path>>(
    config: &SimulationConfig,
    path: P,
) -> std::result::Result<(), ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

    let content = serialize_config(config, format)?;
    fs::write(path, content)?;
    Ok(())
}

/// Serialize a configuration to a string
pub fn serialize_config(
    config: &SimulationConfig,
    format: ConfigFormat,
) -> std::result::Result<String, ConfigError> {
    match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::SerializeError(e.to_string())),
        ConfigFormat::Toml => {
            toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Serialize error
    #[error("Serialize error: {0}")]
    SerializeError(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
