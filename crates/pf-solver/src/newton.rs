//! Damped Newton iteration for coupled unknowns.
//!
//! Used when propagation stalls with several mutually dependent unknowns
//! left. The line search backtracks both on residual growth and on steps
//! that leave a variable's domain or make the residual unevaluable.

use crate::error::{SolveError, SolveResult};
use crate::jacobian::finite_difference_jacobian;
use nalgebra::DVector;

/// Newton iteration configuration.
#[derive(Debug, Clone)]
pub struct NewtonConfig {
    /// Maximum Newton iterations.
    pub max_iterations: usize,
    /// Absolute tolerance on the residual norm.
    pub abs_tol: f64,
    /// Relative tolerance against the initial residual norm.
    pub rel_tol: f64,
    /// Relative finite-difference step for the Jacobian.
    pub fd_epsilon: f64,
    /// Line search backtracking factor.
    pub line_search_beta: f64,
    /// Maximum line search iterations per Newton step.
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 60,
            abs_tol: 1e-6,
            rel_tol: 1e-10,
            fd_epsilon: 1e-7,
            line_search_beta: 0.5,
            max_line_search_iters: 30,
        }
    }
}

/// Newton iteration result.
#[derive(Debug)]
pub struct NewtonResult {
    /// Solution vector.
    pub x: DVector<f64>,
    /// Final residual norm.
    pub residual_norm: f64,
    /// Iterations used.
    pub iterations: usize,
}

/// Solve `residual(x) = 0` by damped Newton with a finite-difference
/// Jacobian.
///
/// `admissible` rejects iterates outside the variables' domains; the line
/// search treats a rejected or unevaluable iterate like a residual
/// increase and backtracks. `x0` itself must be admissible and evaluable.
pub fn newton_solve<F, A>(
    x0: DVector<f64>,
    residual: F,
    admissible: A,
    config: &NewtonConfig,
) -> SolveResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolveResult<DVector<f64>>,
    A: Fn(&DVector<f64>) -> bool,
{
    let mut x = x0;
    let mut r = residual(&x)?;
    let mut r_norm = r.norm();
    let r0_norm = r_norm;

    for iter in 0..config.max_iterations {
        if r_norm <= config.abs_tol || r_norm <= config.rel_tol * r0_norm {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
            });
        }

        let jac = finite_difference_jacobian(&x, &residual, config.fd_epsilon)?;
        let dx = jac
            .lu()
            .solve(&(-r.clone()))
            .ok_or_else(|| SolveError::Numeric {
                what: "singular Jacobian in Newton step".to_string(),
            })?;

        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..config.max_line_search_iters {
            let x_new = &x + alpha * &dx;
            if admissible(&x_new) {
                if let Ok(r_new) = residual(&x_new) {
                    let r_new_norm = r_new.norm();
                    if r_new_norm < r_norm || r_new_norm <= config.abs_tol {
                        accepted = Some((x_new, r_new, r_new_norm));
                        break;
                    }
                }
            }
            alpha *= config.line_search_beta;
        }

        match accepted {
            Some((x_new, r_new, r_new_norm)) => {
                x = x_new;
                r = r_new;
                r_norm = r_new_norm;
            }
            None => {
                return Err(SolveError::ConvergenceFailed {
                    what: format!(
                        "line search stagnated at iteration {iter}, residual norm {r_norm:.3e}"
                    ),
                });
            }
        }
    }

    Err(SolveError::ConvergenceFailed {
        what: format!(
            "no convergence in {} iterations, residual norm {:.3e}",
            config.max_iterations, r_norm
        ),
    })
}
