//! Finite-difference Jacobian for the Newton fallback.

use crate::error::{SolveError, SolveResult};
use nalgebra::{DMatrix, DVector};

/// Forward finite-difference Jacobian of `f` at `x`.
///
/// The step for column `j` scales with `|x[j]|`. If the forward-perturbed
/// point cannot be evaluated (a sqrt or ln stepped out of its domain), the
/// column is retried backwards before giving up.
pub fn finite_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolveResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolveResult<DVector<f64>>,
{
    let n = x.len();
    let f_x = f(x)?;
    let m = f_x.len();

    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let dx = epsilon * x[j].abs().max(1.0);

        let mut x_step = x.clone();
        x_step[j] += dx;
        let column = match f(&x_step) {
            Ok(f_step) => (f_step - &f_x) / dx,
            Err(_) => {
                x_step[j] = x[j] - dx;
                let f_step = f(&x_step).map_err(|e| SolveError::Numeric {
                    what: format!("residual not evaluable near Jacobian column {j}: {e}"),
                })?;
                (f_step - &f_x) / (-dx)
            }
        };

        for i in 0..m {
            jac[(i, j)] = column[i];
        }
    }

    Ok(jac)
}
