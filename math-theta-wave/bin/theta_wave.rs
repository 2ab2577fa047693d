//! Wave equation simulator
//!
//! Runs the theta-method integrator on `[-1,1]²` with a pulse entering
//! through a window on the left boundary. Without arguments the reference
//! configuration is used: 7 refinements, k = 1/64, θ = 0.5, t ∈ [0, 5].
//!
//! Usage:
//!   cargo run --release --bin theta-wave
//!   cargo run --release --bin theta-wave -- --config run.toml --summary summary.json

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use theta_wave::{
    FeDiscretization, GnuplotWriter, NullSink, OutputSink, SimulationConfig, WaveIntegrator,
    WaveProblem, load_config,
};

#[derive(Parser, Debug)]
#[command(name = "theta-wave")]
#[command(about = "Theta-method finite element solver for the wave equation", long_about = None)]
struct Args {
    /// Path to a JSON or TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for solution-NNN.gnuplot files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Do not write field files
    #[arg(long)]
    no_output: bool,

    /// Write a JSON run summary to this file
    #[arg(short, long)]
    summary: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(dir) = args.output_dir {
        config.output.directory = dir;
    }
    if args.no_output {
        config.output.write_fields = false;
    }
    if let Some(path) = args.summary {
        config.output.summary_file = Some(path);
    }

    let discretization = FeDiscretization::from_config(&config.mesh);
    let mut integrator = WaveIntegrator::setup(discretization, WaveProblem::reference(), &config)
        .context("setting up the integrator")?;

    let mut sink: Box<dyn OutputSink> = if config.output.write_fields {
        Box::new(GnuplotWriter::new(&config.output.directory)?)
    } else {
        Box::new(NullSink)
    };

    let summary = integrator.run(sink.as_mut()).context("time stepping failed")?;
    log::info!(
        "Finished {} steps, {} CG iterations in total",
        summary.steps.len(),
        summary.total_cg_iterations()
    );

    if let Some(path) = &config.output.summary_file {
        summary
            .save_json(path)
            .with_context(|| format!("writing summary to {}", path.display()))?;
    }

    Ok(())
}
