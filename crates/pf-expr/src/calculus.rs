//! Symbolic differentiation and polynomial classification.
//!
//! The solver uses these to decide whether a single-unknown equation can
//! be solved in closed form (linear or quadratic residual) before falling
//! back to numeric root finding.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use pf_core::VarId;

/// Peephole-simplifying constructors. Differentiation produces a lot of
/// `0 * x` and `x + 0` noise; without folding it away, a derivative of a
/// linear expression would still structurally reference the variable and
/// defeat linearity detection.
fn add(a: Expr, b: Expr) -> Expr {
    match (a, b) {
        (Expr::Const(x), Expr::Const(y)) => Expr::Const(x + y),
        (Expr::Const(x), b) if x == 0.0 => b,
        (a, Expr::Const(y)) if y == 0.0 => a,
        (a, b) => Expr::Binary(BinaryOp::Add, Box::new(a), Box::new(b)),
    }
}

fn sub(a: Expr, b: Expr) -> Expr {
    match (a, b) {
        (Expr::Const(x), Expr::Const(y)) => Expr::Const(x - y),
        (a, Expr::Const(y)) if y == 0.0 => a,
        (Expr::Const(x), b) if x == 0.0 => neg(b),
        (a, b) => Expr::Binary(BinaryOp::Sub, Box::new(a), Box::new(b)),
    }
}

fn mul(a: Expr, b: Expr) -> Expr {
    match (a, b) {
        (Expr::Const(x), Expr::Const(y)) => Expr::Const(x * y),
        (Expr::Const(x), _) | (_, Expr::Const(x)) if x == 0.0 => Expr::Const(0.0),
        (Expr::Const(x), b) if x == 1.0 => b,
        (a, Expr::Const(y)) if y == 1.0 => a,
        (a, b) => Expr::Binary(BinaryOp::Mul, Box::new(a), Box::new(b)),
    }
}

fn div(a: Expr, b: Expr) -> Expr {
    match (a, b) {
        (Expr::Const(x), _) if x == 0.0 => Expr::Const(0.0),
        (a, Expr::Const(y)) if y == 1.0 => a,
        (a, b) => Expr::Binary(BinaryOp::Div, Box::new(a), Box::new(b)),
    }
}

fn neg(a: Expr) -> Expr {
    match a {
        Expr::Const(x) => Expr::Const(-x),
        a => Expr::Unary(UnaryOp::Neg, Box::new(a)),
    }
}

fn pow(a: Expr, b: Expr) -> Expr {
    match (a, b) {
        (_, Expr::Const(y)) if y == 0.0 => Expr::Const(1.0),
        (a, Expr::Const(y)) if y == 1.0 => a,
        (a, b) => Expr::Binary(BinaryOp::Pow, Box::new(a), Box::new(b)),
    }
}

impl Expr {
    /// Symbolic partial derivative with respect to `var`.
    ///
    /// Power rule for exponents independent of `var`; the general
    /// `u^w` case goes through `u^w * (w' ln u + w u'/u)`.
    pub fn derivative(&self, var: VarId) -> Expr {
        match self {
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Var(id) => Expr::Const(if *id == var { 1.0 } else { 0.0 }),
            Expr::Unary(op, inner) => {
                let u = (**inner).clone();
                let du = inner.derivative(var);
                match op {
                    UnaryOp::Neg => neg(du),
                    UnaryOp::Sqrt => div(du, mul(Expr::Const(2.0), u.sqrt())),
                    UnaryOp::Exp => mul(du, u.exp()),
                    UnaryOp::Ln => div(du, u),
                    UnaryOp::Sin => mul(du, u.cos()),
                    UnaryOp::Cos => neg(mul(du, u.sin())),
                }
            }
            Expr::Binary(op, lhs, rhs) => {
                let u = (**lhs).clone();
                let w = (**rhs).clone();
                let du = lhs.derivative(var);
                let dw = rhs.derivative(var);
                match op {
                    BinaryOp::Add => add(du, dw),
                    BinaryOp::Sub => sub(du, dw),
                    BinaryOp::Mul => add(mul(du, w), mul(u, dw)),
                    BinaryOp::Div => div(
                        sub(mul(du, w.clone()), mul(u, dw)),
                        pow(w, Expr::Const(2.0)),
                    ),
                    BinaryOp::Pow => {
                        if !w.depends_on(var) {
                            // d/dv u^c = c * u^(c-1) * u'
                            mul(
                                mul(w.clone(), pow(u, sub(w, Expr::Const(1.0)))),
                                du,
                            )
                        } else {
                            // u^w * (w' ln u + w u'/u)
                            mul(
                                pow(u.clone(), w.clone()),
                                add(mul(dw, u.clone().ln()), mul(w, div(du, u))),
                            )
                        }
                    }
                }
            }
        }
    }
}

/// Polynomial coefficients of a residual in a single unknown,
/// lowest degree first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Polynomial {
    /// `a1*v + a0`, slope nonzero checked by the caller.
    Linear { a1: f64, a0: f64 },
    /// `a2*v^2 + a1*v + a0`.
    Quadratic { a2: f64, a1: f64, a0: f64 },
}

/// Classify `expr` (all other variables already folded to constants) as a
/// linear or quadratic polynomial in `var`, extracting coefficients.
///
/// Returns `None` for anything of higher or non-polynomial shape; the
/// caller then takes the numeric path.
pub fn classify_polynomial(expr: &Expr, var: VarId) -> Option<Polynomial> {
    let at = |v: f64| expr.eval(&|id| (id == var).then_some(v)).ok();

    let d1 = expr.derivative(var);
    if !d1.depends_on(var) {
        let a1 = d1.eval(&|_| None).ok()?;
        let a0 = at(0.0)?;
        return Some(Polynomial::Linear { a1, a0 });
    }

    let d2 = d1.derivative(var);
    if !d2.depends_on(var) {
        let a2 = d2.eval(&|_| None).ok()? / 2.0;
        let a0 = at(0.0)?;
        let a1 = d1.eval(&|id| (id == var).then_some(0.0)).ok()?;
        // Guard against a simplification miss: the three coefficients must
        // reproduce the residual away from the sample points.
        let check = at(2.0)?;
        if (a2 * 4.0 + a1 * 2.0 + a0 - check).abs() > 1e-6 * check.abs().max(1.0) {
            return None;
        }
        return Some(Polynomial::Quadratic { a2, a1, a0 });
    }

    None
}
