//! Expression evaluation against a value lookup.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use pf_core::VarId;
use thiserror::Error;

/// Errors that can occur when evaluating an expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Unknown variable {var} in expression")]
    UnknownVariable { var: VarId },

    #[error("Math domain error: {what}")]
    MathDomain { what: &'static str },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Non-finite result from {what}")]
    NonFinite { what: &'static str },
}

pub type EvalResult<T> = Result<T, EvalError>;

/// Minimum divisor magnitude before a division is treated as singular.
const DIV_EPS: f64 = 1e-300;

pub(crate) fn apply_unary(op: UnaryOp, v: f64) -> EvalResult<f64> {
    let out = match op {
        UnaryOp::Neg => -v,
        UnaryOp::Sqrt => {
            if v < 0.0 {
                return Err(EvalError::MathDomain {
                    what: "sqrt of negative value",
                });
            }
            v.sqrt()
        }
        UnaryOp::Exp => v.exp(),
        UnaryOp::Ln => {
            if v <= 0.0 {
                return Err(EvalError::MathDomain {
                    what: "ln of non-positive value",
                });
            }
            v.ln()
        }
        UnaryOp::Sin => v.sin(),
        UnaryOp::Cos => v.cos(),
    };
    if out.is_finite() {
        Ok(out)
    } else {
        Err(EvalError::NonFinite { what: "unary op" })
    }
}

pub(crate) fn apply_binary(op: BinaryOp, a: f64, b: f64) -> EvalResult<f64> {
    let out = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b.abs() < DIV_EPS {
                return Err(EvalError::DivisionByZero);
            }
            a / b
        }
        BinaryOp::Pow => {
            // Fractional powers of negative bases have no real value
            if a < 0.0 && b.fract() != 0.0 {
                return Err(EvalError::MathDomain {
                    what: "fractional power of negative base",
                });
            }
            a.powf(b)
        }
    };
    if out.is_finite() {
        Ok(out)
    } else {
        Err(EvalError::NonFinite { what: "binary op" })
    }
}

impl Expr {
    /// Evaluate the expression, looking up variable values through `values`.
    ///
    /// Fails if a referenced variable has no value or a partial result
    /// leaves the real domain (sqrt/ln of a negative, division by zero,
    /// overflow to infinity).
    pub fn eval(&self, values: &dyn Fn(VarId) -> Option<f64>) -> EvalResult<f64> {
        match self {
            Expr::Const(v) => Ok(*v),
            Expr::Var(id) => values(*id).ok_or(EvalError::UnknownVariable { var: *id }),
            Expr::Unary(op, inner) => apply_unary(*op, inner.eval(values)?),
            Expr::Binary(op, lhs, rhs) => {
                apply_binary(*op, lhs.eval(values)?, rhs.eval(values)?)
            }
        }
    }
}
