//! Theta-method time stepping for `u_tt - Δu = f`
//!
//! With V = U_t the semi-discrete system `M U'' + A U = F` is advanced by
//! two linear solves per step:
//!
//! ```text
//! (M + θ²k²A) Uⁿ = M Uⁿ⁻¹ + k M Vⁿ⁻¹ - θ(1-θ)k² A Uⁿ⁻¹ + θk Fθ
//!           M Vⁿ = M Vⁿ⁻¹ - θk A Uⁿ - (1-θ)k A Uⁿ⁻¹ + Fθ
//! ```
//!
//! where `Fθ = θk F(tⁿ) + (1-θ)k F(tⁿ⁻¹)` is computed once per step and
//! shared by both equations. Dirichlet values for U and V are imposed on
//! fresh copies of the operators every step.

use fem::boundary::apply_boundary_values;
use ndarray::Array1;
use solvers::{CgConfig, CsrMatrix, cg_with_guess};

use crate::config::SimulationConfig;
use crate::discretization::Discretization;
use crate::error::{Equation, Result, WaveError};
use crate::output::{OutputFrame, OutputSink, RunSummary, StepReport};
use crate::problem::WaveProblem;

/// Relative slack when comparing the next time level with the end time
const END_TIME_SLACK: f64 = 1e-9;

/// Drives the theta-method over a fixed discretization
pub struct WaveIntegrator<D: Discretization> {
    discretization: D,
    problem: WaveProblem,

    mass: CsrMatrix<f64>,
    laplace: CsrMatrix<f64>,
    matrix_u: CsrMatrix<f64>,
    matrix_v: CsrMatrix<f64>,

    solution_u: Array1<f64>,
    solution_v: Array1<f64>,
    old_solution_u: Array1<f64>,
    old_solution_v: Array1<f64>,
    system_rhs: Array1<f64>,
    forcing_terms: Array1<f64>,
    tmp: Array1<f64>,

    theta: f64,
    time_step: f64,
    start_time: f64,
    end_time: f64,
    time: f64,
    timestep_number: usize,
    output_interval: usize,
    cg: CgConfig<f64>,
}

impl<D: Discretization> WaveIntegrator<D> {
    /// Assemble the operators and project the initial data
    ///
    /// Fails on an invalid configuration or an empty discretization.
    pub fn setup(discretization: D, problem: WaveProblem, config: &SimulationConfig) -> Result<Self> {
        config.validate()?;

        let n_dofs = discretization.n_dofs();
        if n_dofs == 0 {
            return Err(WaveError::Setup(
                "discretization has no degrees of freedom".to_string(),
            ));
        }
        log::info!("Number of active cells: {}", discretization.n_cells());
        log::info!("Number of degrees of freedom: {}", n_dofs);

        let mass = discretization.assemble_mass();
        let laplace = discretization.assemble_stiffness();
        for (name, op) in [("mass", &mass), ("Laplace", &laplace)] {
            if op.num_rows != n_dofs || op.num_cols != n_dofs {
                return Err(WaveError::Setup(format!(
                    "{} matrix is {}x{}, expected {}x{}",
                    name, op.num_rows, op.num_cols, n_dofs, n_dofs
                )));
            }
        }
        log::debug!(
            "Assembled mass ({} nnz) and Laplace ({} nnz) matrices",
            mass.nnz(),
            laplace.nnz()
        );

        // union pattern, so both system matrices can be refilled in place
        let mut matrix_u = mass.clone();
        matrix_u.add_scaled(1.0, &laplace);
        let matrix_v = matrix_u.clone();

        let t0 = config.time.start_time;
        let initial_u = &problem.initial_u;
        let initial_v = &problem.initial_v;
        let old_solution_u = discretization
            .project(|p| initial_u(p, t0))
            .map_err(|e| WaveError::Setup(format!("projecting initial u: {}", e)))?;
        let old_solution_v = discretization
            .project(|p| initial_v(p, t0))
            .map_err(|e| WaveError::Setup(format!("projecting initial v: {}", e)))?;

        Ok(Self {
            discretization,
            problem,
            mass,
            laplace,
            matrix_u,
            matrix_v,
            solution_u: old_solution_u.clone(),
            solution_v: old_solution_v.clone(),
            old_solution_u,
            old_solution_v,
            system_rhs: Array1::zeros(n_dofs),
            forcing_terms: Array1::zeros(n_dofs),
            tmp: Array1::zeros(n_dofs),
            theta: config.time.theta,
            time_step: config.time.time_step,
            start_time: t0,
            end_time: config.time.end_time,
            time: t0,
            timestep_number: 0,
            output_interval: config.output.interval,
            cg: config.solver.cg_config(),
        })
    }

    /// Time of the level `steps` steps after the start
    fn time_at(&self, steps: usize) -> f64 {
        self.start_time + steps as f64 * self.time_step
    }

    /// Time of the next level
    pub fn next_time(&self) -> f64 {
        self.time_at(self.timestep_number + 1)
    }

    /// Whether another step fits before the end time
    pub fn has_next_step(&self) -> bool {
        self.next_time() <= self.end_time + END_TIME_SLACK * self.time_step
    }

    /// Build the u-equation at `time` into `matrix_u` and `system_rhs`
    ///
    /// Also refreshes `forcing_terms` for the v-equation of the same level.
    pub fn assemble_u_system(&mut self, time: f64) {
        let k = self.time_step;
        let theta = self.theta;

        // M U⁻ + k M V⁻ - θ(1-θ)k² A U⁻
        self.mass.matvec_into(&self.old_solution_u, &mut self.system_rhs);
        self.mass.matvec_into(&self.old_solution_v, &mut self.tmp);
        self.system_rhs.scaled_add(k, &self.tmp);
        self.laplace.matvec_into(&self.old_solution_u, &mut self.tmp);
        self.system_rhs
            .scaled_add(-theta * (1.0 - theta) * k * k, &self.tmp);

        let forcing = &self.problem.forcing;
        self.forcing_terms = self.discretization.integrate_rhs(|p| forcing(p, time));
        self.forcing_terms *= theta * k;
        let previous = self.discretization.integrate_rhs(|p| forcing(p, time - k));
        self.forcing_terms.scaled_add((1.0 - theta) * k, &previous);
        self.system_rhs.scaled_add(theta * k, &self.forcing_terms);

        self.matrix_u.copy_values_from(&self.mass);
        self.matrix_u.add_scaled(theta * theta * k * k, &self.laplace);

        let boundary_u = &self.problem.boundary_u;
        let values = self
            .discretization
            .interpolate_boundary_values(self.problem.boundary_id, |p| boundary_u(p, time));
        apply_boundary_values(
            &values,
            &mut self.matrix_u,
            &mut self.solution_u,
            &mut self.system_rhs,
        );
    }

    /// Build the v-equation at `time` from the current U
    pub fn assemble_v_system(&mut self, time: f64) {
        let k = self.time_step;
        let theta = self.theta;

        // -θk A U + M V⁻ - (1-θ)k A U⁻ + Fθ
        self.laplace.matvec_into(&self.solution_u, &mut self.system_rhs);
        self.system_rhs *= -theta * k;
        self.mass.matvec_into(&self.old_solution_v, &mut self.tmp);
        self.system_rhs += &self.tmp;
        self.laplace.matvec_into(&self.old_solution_u, &mut self.tmp);
        self.system_rhs.scaled_add(-(1.0 - theta) * k, &self.tmp);
        self.system_rhs += &self.forcing_terms;

        self.matrix_v.copy_values_from(&self.mass);

        let boundary_v = &self.problem.boundary_v;
        let values = self
            .discretization
            .interpolate_boundary_values(self.problem.boundary_id, |p| boundary_v(p, time));
        apply_boundary_values(
            &values,
            &mut self.matrix_v,
            &mut self.solution_v,
            &mut self.system_rhs,
        );
    }

    /// Advance one step
    ///
    /// On a failed solve the committed state (time, step index, previous
    /// solutions) is left as it was and the working vectors are reset to it.
    pub fn step(&mut self) -> Result<StepReport> {
        let step = self.timestep_number + 1;
        let time = self.time_at(step);

        match self.solve_step(step, time) {
            Ok((u_iterations, v_iterations)) => {
                let energy = self.energy();

                self.old_solution_u.assign(&self.solution_u);
                self.old_solution_v.assign(&self.solution_v);
                self.time = time;
                self.timestep_number = step;

                Ok(StepReport {
                    step,
                    time,
                    u_iterations,
                    v_iterations,
                    energy,
                })
            }
            Err(e) => {
                self.solution_u.assign(&self.old_solution_u);
                self.solution_v.assign(&self.old_solution_v);
                Err(e)
            }
        }
    }

    fn solve_step(&mut self, step: usize, time: f64) -> Result<(usize, usize)> {
        self.assemble_u_system(time);
        let u_iterations = self.solve(Equation::U, step, time)?;

        self.assemble_v_system(time);
        let v_iterations = self.solve(Equation::V, step, time)?;

        Ok((u_iterations, v_iterations))
    }

    fn solve(&mut self, equation: Equation, step: usize, time: f64) -> Result<usize> {
        let (matrix, guess) = match equation {
            Equation::U => (&self.matrix_u, &self.solution_u),
            Equation::V => (&self.matrix_v, &self.solution_v),
        };
        let result = cg_with_guess(matrix, &self.system_rhs, guess.clone(), &self.cg);

        if !result.converged {
            return Err(WaveError::SolverDivergence {
                equation,
                step,
                time,
                iterations: result.iterations,
                residual: result.residual,
            });
        }

        match equation {
            Equation::U => self.solution_u = result.x,
            Equation::V => self.solution_v = result.x,
        }
        Ok(result.iterations)
    }

    /// Advance until the end time, emitting every `output_interval`-th step
    pub fn run(&mut self, sink: &mut dyn OutputSink) -> Result<RunSummary> {
        let mut summary = RunSummary::new(
            self.discretization.n_dofs(),
            self.discretization.n_cells(),
            self.theta,
            self.time_step,
            self.energy(),
        );

        while self.has_next_step() {
            let report = self.step()?;

            log::info!("Time step {} at t={}", report.step, report.time);
            log::info!("   u-equation: {} CG iterations.", report.u_iterations);
            log::info!("   v-equation: {} CG iterations.", report.v_iterations);
            log::info!("   Total energy: {}", report.energy);

            summary.record(report);

            if report.step % self.output_interval == 0 {
                sink.write_step(&self.frame())?;
            }
        }

        summary.finish();
        Ok(summary)
    }

    /// Current state as an output frame
    pub fn frame(&self) -> OutputFrame<'_> {
        OutputFrame {
            step: self.timestep_number,
            time: self.time,
            points: self.discretization.support_points(),
            fields: vec![("U", &self.solution_u), ("V", &self.solution_v)],
        }
    }

    /// Discrete energy (VᵀMV + UᵀAU) / 2
    pub fn energy(&self) -> f64 {
        0.5 * (self.mass.quadratic_form(&self.solution_v)
            + self.laplace.quadratic_form(&self.solution_u))
    }

    pub fn solution_u(&self) -> &Array1<f64> {
        &self.solution_u
    }

    pub fn solution_v(&self) -> &Array1<f64> {
        &self.solution_v
    }

    /// System matrix of the last assembled u-equation
    pub fn matrix_u(&self) -> &CsrMatrix<f64> {
        &self.matrix_u
    }

    /// System matrix of the last assembled v-equation
    pub fn matrix_v(&self) -> &CsrMatrix<f64> {
        &self.matrix_v
    }

    /// Right-hand side of the last assembled equation
    pub fn system_rhs(&self) -> &Array1<f64> {
        &self.system_rhs
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn timestep_number(&self) -> usize {
        self.timestep_number
    }

    pub fn discretization(&self) -> &D {
        &self.discretization
    }
}
