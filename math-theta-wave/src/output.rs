//! Output sinks and run summaries
//!
//! The integrator hands every emitted step to an [`OutputSink`] as an
//! [`OutputFrame`]. Sinks decide what to persist.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fem::mesh::Point;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::OutputError;

/// Solution state at one time level
#[derive(Debug, Clone)]
pub struct OutputFrame<'a> {
    /// Step index, 1 for the first completed step
    pub step: usize,
    pub time: f64,
    /// Location of each degree of freedom
    pub points: &'a [Point],
    /// Named nodal fields, "U" and "V"
    pub fields: Vec<(&'a str, &'a Array1<f64>)>,
}

/// Receiver of emitted time steps
pub trait OutputSink {
    fn write_step(&mut self, frame: &OutputFrame<'_>) -> Result<(), OutputError>;
}

/// Discards every frame
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn write_step(&mut self, _frame: &OutputFrame<'_>) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Owned copy of a frame
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFrame {
    pub step: usize,
    pub time: f64,
    pub fields: Vec<(String, Array1<f64>)>,
}

impl StoredFrame {
    /// Field by name
    pub fn field(&self, name: &str) -> Option<&Array1<f64>> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// Keeps every frame in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub frames: Vec<StoredFrame>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputSink for MemorySink {
    fn write_step(&mut self, frame: &OutputFrame<'_>) -> Result<(), OutputError> {
        self.frames.push(StoredFrame {
            step: frame.step,
            time: frame.time,
            fields: frame
                .fields
                .iter()
                .map(|(name, values)| (name.to_string(), (*values).clone()))
                .collect(),
        });
        Ok(())
    }
}

/// Writes `solution-NNN.gnuplot` files, one per step
///
/// Each file holds a header naming the columns and one `x y field...` line
/// per degree of freedom.
#[derive(Debug, Clone)]
pub struct GnuplotWriter {
    directory: PathBuf,
}

impl GnuplotWriter {
    /// Create the writer, creating `directory` if needed
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self, OutputError> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    /// File name for a step, zero-padded to three digits
    pub fn file_name(step: usize) -> String {
        format!("solution-{:03}.gnuplot", step)
    }

    pub fn path_for(&self, step: usize) -> PathBuf {
        self.directory.join(Self::file_name(step))
    }
}

impl OutputSink for GnuplotWriter {
    fn write_step(&mut self, frame: &OutputFrame<'_>) -> Result<(), OutputError> {
        let mut out = BufWriter::new(File::create(self.path_for(frame.step))?);

        write!(out, "# x y")?;
        for (name, _) in &frame.fields {
            write!(out, " {}", name)?;
        }
        writeln!(out)?;
        writeln!(out, "# t = {}", frame.time)?;

        for (i, p) in frame.points.iter().enumerate() {
            write!(out, "{} {}", p.x, p.y)?;
            for (_, values) in &frame.fields {
                write!(out, " {}", values[i])?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Diagnostics of one completed time step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: usize,
    pub time: f64,
    /// CG iterations for the u-equation
    pub u_iterations: usize,
    /// CG iterations for the v-equation
    pub v_iterations: usize,
    /// (VᵀMV + UᵀAU) / 2
    pub energy: f64,
}

/// Record of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub n_dofs: usize,
    pub n_cells: usize,
    pub theta: f64,
    pub time_step: f64,
    /// Energy of the projected initial data
    pub initial_energy: f64,
    pub steps: Vec<StepReport>,
}

impl RunSummary {
    pub fn new(n_dofs: usize, n_cells: usize, theta: f64, time_step: f64, initial_energy: f64) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            n_dofs,
            n_cells,
            theta,
            time_step,
            initial_energy,
            steps: Vec::new(),
        }
    }

    pub fn record(&mut self, report: StepReport) {
        self.steps.push(report);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn total_cg_iterations(&self) -> usize {
        self.steps
            .iter()
            .map(|s| s.u_iterations + s.v_iterations)
            .sum()
    }

    /// Largest |E_n - E_0| over the run
    pub fn max_energy_drift(&self) -> f64 {
        self.steps
            .iter()
            .map(|s| (s.energy - self.initial_energy).abs())
            .fold(0.0, f64::max)
    }

    /// Write the summary as pretty JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), OutputError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| OutputError::Serialize(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}
