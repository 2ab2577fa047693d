//! Continuous problem data
//!
//! Initial values, forcing and boundary values are plain functions of a
//! point and a time.

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use fem::mesh::{BoundaryId, Point};

/// A scalar field `f(x, t)`
pub type SpaceTimeFn = Arc<dyn Fn(&Point, f64) -> f64 + Send + Sync>;

/// Data for `u_tt - Δu = f` with Dirichlet boundary values
#[derive(Clone)]
pub struct WaveProblem {
    /// u at the start time
    pub initial_u: SpaceTimeFn,
    /// u_t at the start time
    pub initial_v: SpaceTimeFn,
    /// Right-hand side f
    pub forcing: SpaceTimeFn,
    /// Prescribed u on the boundary
    pub boundary_u: SpaceTimeFn,
    /// Prescribed u_t on the boundary, the time derivative of `boundary_u`
    pub boundary_v: SpaceTimeFn,
    /// Boundary part carrying the Dirichlet values
    pub boundary_id: BoundaryId,
}

fn zero_fn() -> SpaceTimeFn {
    Arc::new(|_, _| 0.0)
}

impl WaveProblem {
    /// Everything zero: the solution stays zero
    pub fn zero() -> Self {
        Self {
            initial_u: zero_fn(),
            initial_v: zero_fn(),
            forcing: zero_fn(),
            boundary_u: zero_fn(),
            boundary_v: zero_fn(),
            boundary_id: 0,
        }
    }

    /// Pulse entering from a window on the left side of `[-1,1]²`
    ///
    /// u = sin(4πt) for t ≤ 0.5 on boundary points with x < 0 and |y| < 1/3,
    /// zero elsewhere. Initial data and forcing vanish.
    pub fn reference() -> Self {
        Self::zero()
            .with_boundary_u(|p, t| {
                if in_excitation_window(p, t) {
                    (4.0 * PI * t).sin()
                } else {
                    0.0
                }
            })
            .with_boundary_v(|p, t| {
                if in_excitation_window(p, t) {
                    4.0 * PI * (4.0 * PI * t).cos()
                } else {
                    0.0
                }
            })
    }

    pub fn with_initial_u<F>(mut self, f: F) -> Self
    where
        F: Fn(&Point, f64) -> f64 + Send + Sync + 'static,
    {
        self.initial_u = Arc::new(f);
        self
    }

    pub fn with_initial_v<F>(mut self, f: F) -> Self
    where
        F: Fn(&Point, f64) -> f64 + Send + Sync + 'static,
    {
        self.initial_v = Arc::new(f);
        self
    }

    pub fn with_forcing<F>(mut self, f: F) -> Self
    where
        F: Fn(&Point, f64) -> f64 + Send + Sync + 'static,
    {
        self.forcing = Arc::new(f);
        self
    }

    pub fn with_boundary_u<F>(mut self, f: F) -> Self
    where
        F: Fn(&Point, f64) -> f64 + Send + Sync + 'static,
    {
        self.boundary_u = Arc::new(f);
        self
    }

    pub fn with_boundary_v<F>(mut self, f: F) -> Self
    where
        F: Fn(&Point, f64) -> f64 + Send + Sync + 'static,
    {
        self.boundary_v = Arc::new(f);
        self
    }

    pub fn with_boundary_id(mut self, id: BoundaryId) -> Self {
        self.boundary_id = id;
        self
    }
}

impl Default for WaveProblem {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for WaveProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaveProblem")
            .field("boundary_id", &self.boundary_id)
            .finish_non_exhaustive()
    }
}

fn in_excitation_window(p: &Point, t: f64) -> bool {
    t <= 0.5 && p.x < 0.0 && p.y < 1.0 / 3.0 && p.y > -1.0 / 3.0
}
