//! Benchmark: cost of one theta-method step
//!
//! Measures operator assembly and a full time step (two CG solves) on
//! uniformly refined squares.
//!
//! Run with:
//!   cargo bench -p theta-wave --bench theta_step
//!
//! With parallel assembly:
//!   cargo bench -p theta-wave --bench theta_step --features parallel

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::time::Duration;
use theta_wave::{
    Discretization, FeDiscretization, MeshConfig, SimulationConfig, WaveIntegrator, WaveProblem,
};

fn mesh_config(refinements: usize) -> MeshConfig {
    MeshConfig {
        lower: -1.0,
        upper: 1.0,
        refinements,
    }
}

fn bench_operator_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("operator_assembly");
    group.measurement_time(Duration::from_secs(5));

    for &level in &[4, 5, 6] {
        let disc = FeDiscretization::from_config(&mesh_config(level));
        group.throughput(Throughput::Elements(disc.n_cells() as u64));

        group.bench_with_input(BenchmarkId::new("mass_and_laplace", level), &disc, |b, disc| {
            b.iter(|| {
                let mass = disc.assemble_mass();
                let laplace = disc.assemble_stiffness();
                black_box((mass, laplace))
            });
        });
    }

    group.finish();
}

fn bench_time_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("time_step");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(10));

    for &level in &[4, 5] {
        let mut config = SimulationConfig::default();
        config.mesh = mesh_config(level);
        // never reached during measurement
        config.time.end_time = 1.0e6;

        let disc = FeDiscretization::from_config(&config.mesh);
        group.throughput(Throughput::Elements(disc.n_dofs() as u64));
        let mut integrator =
            WaveIntegrator::setup(disc, WaveProblem::reference(), &config).expect("setup failed");

        group.bench_function(BenchmarkId::new("reference", level), |b| {
            b.iter(|| black_box(integrator.step().expect("step failed")));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_operator_assembly, bench_time_step);
criterion_main!(benches);
