//! CG (Conjugate Gradient) solver
//!
//! The Conjugate Gradient method for symmetric positive definite systems.
//! This is the method of choice for SPD matrices as it has optimal convergence.

use crate::traits::{IdentityPreconditioner, LinearOperator, Preconditioner, RealField};
use ndarray::{Array1, Zip};

/// CG solver configuration
#[derive(Debug, Clone)]
pub struct CgConfig<R> {
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Tolerance relative to the right-hand side norm: stop once ‖r‖ ≤ tol·‖b‖
    pub tolerance: R,
    /// Print progress every N iterations (0 = no output)
    pub print_interval: usize,
}

impl Default for CgConfig<f64> {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-8,
            print_interval: 0,
        }
    }
}

/// CG solver result
#[derive(Debug, Clone)]
pub struct CgSolution<T: RealField> {
    /// Solution vector
    pub x: Array1<T>,
    /// Number of iterations
    pub iterations: usize,
    /// Final relative residual ‖r‖ / ‖b‖
    pub residual: T,
    /// Whether convergence was achieved
    pub converged: bool,
}

/// Solve Ax = b using the Conjugate Gradient method, starting from x = 0
///
/// Note: This method is only correct for symmetric positive definite matrices.
pub fn cg<T, A>(operator: &A, b: &Array1<T>, config: &CgConfig<T>) -> CgSolution<T>
where
    T: RealField,
    A: LinearOperator<T>,
{
    let x0 = Array1::from_elem(b.len(), T::zero());
    pcg_with_guess(operator, &IdentityPreconditioner, b, x0, config)
}

/// Solve Ax = b with CG, starting from the initial guess `x0`
pub fn cg_with_guess<T, A>(
    operator: &A,
    b: &Array1<T>,
    x0: Array1<T>,
    config: &CgConfig<T>,
) -> CgSolution<T>
where
    T: RealField,
    A: LinearOperator<T>,
{
    pcg_with_guess(operator, &IdentityPreconditioner, b, x0, config)
}

/// Preconditioned CG starting from the initial guess `x0`
///
/// A zero right-hand side yields the zero vector after 0 iterations. A
/// vanishing curvature `pᵀAp` (singular or indefinite operator) stops the
/// iteration early and reports `converged = false`.
pub fn pcg_with_guess<T, A, P>(
    operator: &A,
    precond: &P,
    b: &Array1<T>,
    x0: Array1<T>,
    config: &CgConfig<T>,
) -> CgSolution<T>
where
    T: RealField,
    A: LinearOperator<T>,
    P: Preconditioner<T>,
{
    assert_eq!(x0.len(), b.len(), "Initial guess size mismatch");
    assert_eq!(operator.num_rows(), b.len(), "Operator size mismatch");

    let b_norm = vector_norm(b);
    if b_norm.is_zero() {
        return CgSolution {
            x: Array1::from_elem(b.len(), T::zero()),
            iterations: 0,
            residual: T::zero(),
            converged: true,
        };
    }

    let threshold = config.tolerance * b_norm;
    let breakdown = T::from_f64_lossy(1e-30);

    let mut x = x0;
    // r = b - A x0
    let mut r = b - &operator.apply(&x);
    let mut r_norm = vector_norm(&r);
    if r_norm <= threshold {
        return CgSolution {
            x,
            iterations: 0,
            residual: r_norm / b_norm,
            converged: true,
        };
    }

    let mut z = precond.apply(&r);
    let mut p = z.clone();
    let mut rho = inner_product(&r, &z);

    for iter in 0..config.max_iterations {
        let q = operator.apply(&p);

        let pq = inner_product(&p, &q);
        if pq.abs() < breakdown {
            return CgSolution {
                x,
                iterations: iter,
                residual: r_norm / b_norm,
                converged: false,
            };
        }

        let alpha = rho / pq;

        // x += alpha * p, r -= alpha * q
        Zip::from(&mut x).and(&p).for_each(|xi, &pi| *xi += alpha * pi);
        Zip::from(&mut r).and(&q).for_each(|ri, &qi| *ri -= alpha * qi);

        r_norm = vector_norm(&r);
        let rel_residual = r_norm / b_norm;

        if config.print_interval > 0 && (iter + 1) % config.print_interval == 0 {
            log::info!(
                "CG iteration {}: relative residual = {:.6e}",
                iter + 1,
                rel_residual.to_f64().unwrap_or(0.0)
            );
        }

        if r_norm <= threshold {
            return CgSolution {
                x,
                iterations: iter + 1,
                residual: rel_residual,
                converged: true,
            };
        }

        z = precond.apply(&r);
        let rho_new = inner_product(&r, &z);
        if rho_new.abs() < breakdown {
            return CgSolution {
                x,
                iterations: iter + 1,
                residual: rel_residual,
                converged: false,
            };
        }

        let beta = rho_new / rho;
        rho = rho_new;

        // p = z + beta * p
        Zip::from(&mut p).and(&z).for_each(|pi, &zi| *pi = zi + beta * *pi);
    }

    CgSolution {
        x,
        iterations: config.max_iterations,
        residual: r_norm / b_norm,
        converged: false,
    }
}

#[inline]
fn inner_product<T: RealField>(x: &Array1<T>, y: &Array1<T>) -> T {
    x.iter()
        .zip(y.iter())
        .fold(T::zero(), |acc, (&xi, &yi)| acc + xi * yi)
}

#[inline]
fn vector_norm<T: RealField>(x: &Array1<T>) -> T {
    inner_product(x, x).sqrt()
}
