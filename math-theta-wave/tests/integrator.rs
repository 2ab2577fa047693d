//! Behaviour of the theta-method integrator
//!
//! Small FE grids check conservation and boundary driving; a two-node
//! discretization with hand-written operators checks one step exactly.

use approx::assert_relative_eq;
use fem::boundary::BoundaryValues;
use fem::mesh::{BoundaryId, Point};
use ndarray::Array1;
use solvers::CsrMatrix;
use theta_wave::{
    Discretization, Equation, FeDiscretization, MemorySink, MeshConfig, NullSink,
    SimulationConfig, WaveError, WaveIntegrator, WaveProblem,
};

/// Two nodes at x = 0 and x = 1 with fixed operators
struct TwoNode {
    points: [Point; 2],
    mass: CsrMatrix<f64>,
    laplace: CsrMatrix<f64>,
}

impl TwoNode {
    fn new(mass: [[f64; 2]; 2], laplace: [[f64; 2]; 2]) -> Self {
        let to_csr = |m: [[f64; 2]; 2]| {
            CsrMatrix::from_triplets(
                2,
                2,
                vec![
                    (0, 0, m[0][0]),
                    (0, 1, m[0][1]),
                    (1, 0, m[1][0]),
                    (1, 1, m[1][1]),
                ],
            )
        };
        Self {
            points: [Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
            mass: to_csr(mass),
            laplace: to_csr(laplace),
        }
    }

    /// Linear elements on [0, 1]
    fn linear_element() -> Self {
        Self::new(
            [[2.0 / 6.0, 1.0 / 6.0], [1.0 / 6.0, 2.0 / 6.0]],
            [[1.0, -1.0], [-1.0, 1.0]],
        )
    }

    fn nodal<F: Fn(&Point) -> f64>(&self, f: F) -> Array1<f64> {
        self.points.iter().map(f).collect()
    }
}

impl Discretization for TwoNode {
    fn n_dofs(&self) -> usize {
        2
    }

    fn n_cells(&self) -> usize {
        1
    }

    fn support_points(&self) -> &[Point] {
        &self.points
    }

    fn assemble_mass(&self) -> CsrMatrix<f64> {
        self.mass.clone()
    }

    fn assemble_stiffness(&self) -> CsrMatrix<f64> {
        self.laplace.clone()
    }

    fn project<F>(&self, f: F) -> fem::Result<Array1<f64>>
    where
        F: Fn(&Point) -> f64 + Sync,
    {
        Ok(self.nodal(f))
    }

    fn integrate_rhs<F>(&self, f: F) -> Array1<f64>
    where
        F: Fn(&Point) -> f64 + Sync,
    {
        self.nodal(f)
    }

    fn interpolate_boundary_values<F>(&self, _tag: BoundaryId, _f: F) -> BoundaryValues
    where
        F: Fn(&Point) -> f64,
    {
        BoundaryValues::new()
    }
}

fn config(refinements: usize, time_step: f64, end_time: f64) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.mesh = MeshConfig {
        lower: -1.0,
        upper: 1.0,
        refinements,
    };
    config.time.time_step = time_step;
    config.time.end_time = end_time;
    config
}

/// Solve [[a, b], [c, d]] x = r
fn solve_2x2(m: [[f64; 2]; 2], r: [f64; 2]) -> [f64; 2] {
    let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
    [
        (r[0] * m[1][1] - m[0][1] * r[1]) / det,
        (m[0][0] * r[1] - m[1][0] * r[0]) / det,
    ]
}

#[test]
fn test_two_node_single_step_by_hand() {
    let (k, theta) = (0.1, 0.5);
    let mut config = SimulationConfig::default();
    config.time.time_step = k;
    config.time.end_time = k;
    config.solver.tolerance = 1e-12;

    let problem = WaveProblem::zero().with_initial_v(|p, _| if p.x == 0.0 { 1.0 } else { 0.0 });
    let mut integrator = WaveIntegrator::setup(TwoNode::linear_element(), problem, &config).unwrap();

    let m = [[1.0 / 3.0, 1.0 / 6.0], [1.0 / 6.0, 1.0 / 3.0]];
    let a = [[1.0, -1.0], [-1.0, 1.0]];
    let c = theta * theta * k * k;

    // u-equation: rhs = k M V⁻, matrix = M + θ²k²A
    integrator.assemble_u_system(k);
    let rhs_u = [k * m[0][0], k * m[1][0]];
    assert_relative_eq!(integrator.system_rhs()[0], 1.0 / 30.0, epsilon = 1e-15);
    assert_relative_eq!(integrator.system_rhs()[1], 1.0 / 60.0, epsilon = 1e-15);
    let matrix_u = [
        [m[0][0] + c * a[0][0], m[0][1] + c * a[0][1]],
        [m[1][0] + c * a[1][0], m[1][1] + c * a[1][1]],
    ];
    for i in 0..2 {
        for j in 0..2 {
            assert_relative_eq!(integrator.matrix_u().get(i, j), matrix_u[i][j], epsilon = 1e-15);
        }
    }
    let u = solve_2x2(matrix_u, rhs_u);

    // v-equation: rhs = -θk A U + M V⁻, matrix = M
    let au = [a[0][0] * u[0] + a[0][1] * u[1], a[1][0] * u[0] + a[1][1] * u[1]];
    let rhs_v = [-theta * k * au[0] + m[0][0], -theta * k * au[1] + m[1][0]];
    let v = solve_2x2(m, rhs_v);

    let report = integrator.step().unwrap();

    assert_eq!(report.step, 1);
    assert_relative_eq!(report.time, k);
    assert_relative_eq!(integrator.solution_u()[0], u[0], epsilon = 1e-10);
    assert_relative_eq!(integrator.solution_u()[1], u[1], epsilon = 1e-10);
    assert_relative_eq!(integrator.solution_v()[0], v[0], epsilon = 1e-10);
    assert_relative_eq!(integrator.solution_v()[1], v[1], epsilon = 1e-10);
    assert_relative_eq!(integrator.system_rhs()[0], rhs_v[0], epsilon = 1e-12);
    for i in 0..2 {
        for j in 0..2 {
            assert_relative_eq!(integrator.matrix_v().get(i, j), m[i][j], epsilon = 1e-15);
        }
    }

    let expected_energy = 0.5
        * (v[0] * (m[0][0] * v[0] + m[0][1] * v[1])
            + v[1] * (m[1][0] * v[0] + m[1][1] * v[1])
            + u[0] * au[0]
            + u[1] * au[1]);
    assert_relative_eq!(report.energy, expected_energy, epsilon = 1e-10);
}

#[test]
fn test_forcing_enters_both_equations() {
    // A = 0, M = I: U = k V⁻ + θk·Fθ and V = V⁻ + Fθ with Fθ = k F
    let (k, theta) = (0.2, 0.5);
    let mut config = SimulationConfig::default();
    config.time.time_step = k;
    config.time.end_time = k;
    config.solver.tolerance = 1e-12;

    let disc = TwoNode::new([[1.0, 0.0], [0.0, 1.0]], [[0.0, 0.0], [0.0, 0.0]]);
    let problem = WaveProblem::zero().with_forcing(|p, _| 1.0 + p.x);
    let mut integrator = WaveIntegrator::setup(disc, problem, &config).unwrap();

    integrator.step().unwrap();

    let forcing = [k * 1.0, k * 2.0];
    for i in 0..2 {
        assert_relative_eq!(integrator.solution_u()[i], theta * k * forcing[i], epsilon = 1e-12);
        assert_relative_eq!(integrator.solution_v()[i], forcing[i], epsilon = 1e-12);
    }
}

#[test]
fn test_singular_system_reports_divergence() {
    let mut config = SimulationConfig::default();
    config.time.time_step = 0.1;
    config.time.end_time = 1.0;

    // rank-one mass, no stiffness, forcing outside the range
    let disc = TwoNode::new([[1.0, 1.0], [1.0, 1.0]], [[0.0, 0.0], [0.0, 0.0]]);
    let problem = WaveProblem::zero().with_forcing(|p, _| if p.x == 0.0 { 1.0 } else { 0.0 });
    let mut integrator = WaveIntegrator::setup(disc, problem, &config).unwrap();

    let err = integrator.run(&mut NullSink).unwrap_err();

    match err {
        WaveError::SolverDivergence {
            equation, step, ..
        } => {
            assert_eq!(equation, Equation::U);
            assert_eq!(step, 1);
        }
        other => panic!("expected SolverDivergence, got {other:?}"),
    }
    // nothing committed
    assert_eq!(integrator.timestep_number(), 0);
    assert_eq!(integrator.time(), 0.0);
    assert!(integrator.solution_u().iter().all(|&x| x == 0.0));
}

#[test]
fn test_exhausted_iteration_budget_reports_divergence() {
    let mut config = config(3, 1.0 / 64.0, 0.5);
    config.solver.max_iterations = 1;
    let disc = FeDiscretization::from_config(&config.mesh);
    let mut integrator = WaveIntegrator::setup(disc, WaveProblem::reference(), &config).unwrap();

    let err = integrator.run(&mut NullSink).unwrap_err();

    match err {
        WaveError::SolverDivergence {
            equation,
            step,
            iterations,
            residual,
            ..
        } => {
            assert_eq!(equation, Equation::U);
            assert_eq!(step, 1);
            assert_eq!(iterations, 1);
            assert!(residual > 1e-8);
        }
        other => panic!("expected SolverDivergence, got {other:?}"),
    }
    assert_eq!(integrator.timestep_number(), 0);
    assert_eq!(integrator.time(), 0.0);
    assert!(integrator.solution_u().iter().all(|&x| x == 0.0));
    assert!(integrator.solution_v().iter().all(|&x| x == 0.0));
}

#[test]
fn test_failed_v_solve_rolls_back_both_fields() {
    // A = 0, M = diag(1, 2): the u-residual is a multiple of e0 and needs one
    // CG iteration, the v-residual is not and needs two
    let mut config = SimulationConfig::default();
    config.time.time_step = 0.1;
    config.time.end_time = 1.0;
    config.solver.max_iterations = 1;

    let disc = TwoNode::new([[1.0, 0.0], [0.0, 2.0]], [[0.0, 0.0], [0.0, 0.0]]);
    let problem = WaveProblem::zero()
        .with_initial_v(|p, _| if p.x == 0.0 { 1.0 } else { -0.025 })
        .with_forcing(|_, _| 1.0);
    let mut integrator = WaveIntegrator::setup(disc, problem, &config).unwrap();
    let initial_v = integrator.solution_v().clone();

    let err = integrator.step().unwrap_err();

    match err {
        WaveError::SolverDivergence {
            equation,
            step,
            iterations,
            ..
        } => {
            assert_eq!(equation, Equation::V);
            assert_eq!(step, 1);
            assert_eq!(iterations, 1);
        }
        other => panic!("expected SolverDivergence, got {other:?}"),
    }
    assert_eq!(integrator.timestep_number(), 0);
    assert_eq!(integrator.time(), 0.0);
    // U had already been solved for this step
    assert!(integrator.solution_u().iter().all(|&x| x == 0.0));
    assert_eq!(integrator.solution_v(), &initial_v);
}

#[test]
fn test_empty_discretization_fails_setup() {
    let mesh = fem::mesh::Mesh::new();
    let result = WaveIntegrator::setup(
        FeDiscretization::new(mesh),
        WaveProblem::zero(),
        &SimulationConfig::default(),
    );
    assert!(matches!(result, Err(WaveError::Setup(_))));
}

#[test]
fn test_invalid_config_fails_setup() {
    let mut config = config(1, 0.1, 1.0);
    config.time.theta = -0.5;
    let result = WaveIntegrator::setup(
        FeDiscretization::from_config(&config.mesh),
        WaveProblem::zero(),
        &config,
    );
    assert!(matches!(result, Err(WaveError::Configuration(_))));
}

#[test]
fn test_zero_data_stays_zero() {
    let config = config(2, 1.0 / 16.0, 0.5);
    let disc = FeDiscretization::from_config(&config.mesh);
    let mut integrator = WaveIntegrator::setup(disc, WaveProblem::zero(), &config).unwrap();

    let summary = integrator.run(&mut NullSink).unwrap();

    assert_eq!(summary.steps.len(), 8);
    assert!(integrator.solution_u().iter().all(|&x| x == 0.0));
    assert!(integrator.solution_v().iter().all(|&x| x == 0.0));
    assert!(summary.steps.iter().all(|s| s.energy == 0.0));
}

#[test]
fn test_crank_nicolson_conserves_energy() {
    let mut config = config(3, 1.0 / 32.0, 0.5);
    config.solver.tolerance = 1e-12;

    // no boundary part carries id 7, so no constraints apply
    let problem = WaveProblem::zero()
        .with_initial_u(|p, _| (-8.0 * (p.x * p.x + p.y * p.y)).exp())
        .with_boundary_id(7);
    let disc = FeDiscretization::from_config(&config.mesh);
    let mut integrator = WaveIntegrator::setup(disc, problem, &config).unwrap();

    let initial = integrator.energy();
    assert!(initial > 0.0);

    let summary = integrator.run(&mut NullSink).unwrap();

    assert_eq!(summary.steps.len(), 16);
    assert_relative_eq!(summary.initial_energy, initial);
    assert!(
        summary.max_energy_drift() < 1e-8 * initial,
        "drift {} for energy {}",
        summary.max_energy_drift(),
        initial
    );
}

#[test]
fn test_implicit_euler_dissipates_energy() {
    let mut config = config(3, 1.0 / 32.0, 0.25);
    config.time.theta = 1.0;

    let problem = WaveProblem::zero()
        .with_initial_u(|p, _| (-8.0 * (p.x * p.x + p.y * p.y)).exp())
        .with_boundary_id(7);
    let disc = FeDiscretization::from_config(&config.mesh);
    let mut integrator = WaveIntegrator::setup(disc, problem, &config).unwrap();

    let summary = integrator.run(&mut NullSink).unwrap();
    let last = summary.steps.last().unwrap();
    assert!(last.energy < summary.initial_energy);
}

#[test]
fn test_runs_are_deterministic() {
    let config = config(3, 1.0 / 32.0, 0.25);
    let run = || {
        let disc = FeDiscretization::from_config(&config.mesh);
        let mut integrator = WaveIntegrator::setup(disc, WaveProblem::reference(), &config).unwrap();
        let mut sink = MemorySink::new();
        let summary = integrator.run(&mut sink).unwrap();
        (sink.frames, summary.steps)
    };

    let (frames_a, steps_a) = run();
    let (frames_b, steps_b) = run();

    assert_eq!(frames_a.len(), 8);
    assert_eq!(frames_a, frames_b);
    assert_eq!(steps_a, steps_b);
}

#[test]
fn test_reference_boundary_drives_solution() {
    let config = config(3, 1.0 / 64.0, 0.125);
    let disc = FeDiscretization::from_config(&config.mesh);
    let mut integrator = WaveIntegrator::setup(disc, WaveProblem::reference(), &config).unwrap();

    let summary = integrator.run(&mut NullSink).unwrap();

    assert_eq!(integrator.timestep_number(), 8);
    assert_relative_eq!(integrator.time(), 0.125);
    assert!(summary.steps.last().unwrap().energy > 0.0);

    // boundary nodes in the window carry sin(4πt) = 1 at t = 1/8
    let points = integrator.discretization().support_points().to_vec();
    let boundary = integrator.discretization().mesh().boundary_nodes(0);
    let mut window_nodes = 0;
    for node in boundary {
        let p = points[node];
        let expected = if p.x < 0.0 && p.y.abs() < 1.0 / 3.0 { 1.0 } else { 0.0 };
        if expected != 0.0 {
            window_nodes += 1;
        }
        assert_relative_eq!(integrator.solution_u()[node], expected, epsilon = 1e-12);
    }
    assert_eq!(window_nodes, 3);
}

#[test]
fn test_output_interval() {
    let mut config = config(1, 0.1, 1.0);
    config.output.interval = 3;
    let disc = FeDiscretization::from_config(&config.mesh);
    let mut integrator = WaveIntegrator::setup(disc, WaveProblem::reference(), &config).unwrap();

    let mut sink = MemorySink::new();
    let summary = integrator.run(&mut sink).unwrap();

    assert_eq!(summary.steps.len(), 10);
    let emitted: Vec<usize> = sink.frames.iter().map(|f| f.step).collect();
    assert_eq!(emitted, vec![3, 6, 9]);
    assert!(sink.frames.iter().all(|f| f.field("U").is_some() && f.field("V").is_some()));
}
