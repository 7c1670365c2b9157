//! Expression AST over registry variables and constants.

use pf_core::VarId;
use std::collections::BTreeSet;
use std::fmt;

/// Binary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// Left operand raised to the right operand.
    Pow,
}

/// Unary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Sqrt,
    Exp,
    Ln,
    Sin,
    Cos,
}

/// An algebraic expression over variable references and constants.
///
/// Expressions are immutable trees; all transformations return new trees.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constant literal value.
    Const(f64),
    /// Reference to a registry variable.
    Var(VarId),
    /// Unary operation.
    Unary(UnaryOp, Box<Expr>),
    /// Binary operation.
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Constant literal.
    pub fn lit(v: f64) -> Self {
        Expr::Const(v)
    }

    /// Variable reference.
    pub fn var(id: VarId) -> Self {
        Expr::Var(id)
    }

    pub fn sqrt(self) -> Self {
        Expr::Unary(UnaryOp::Sqrt, Box::new(self))
    }

    pub fn exp(self) -> Self {
        Expr::Unary(UnaryOp::Exp, Box::new(self))
    }

    pub fn ln(self) -> Self {
        Expr::Unary(UnaryOp::Ln, Box::new(self))
    }

    pub fn sin(self) -> Self {
        Expr::Unary(UnaryOp::Sin, Box::new(self))
    }

    pub fn cos(self) -> Self {
        Expr::Unary(UnaryOp::Cos, Box::new(self))
    }

    /// `self` raised to `exp`.
    pub fn pow(self, exp: impl Into<Expr>) -> Self {
        Expr::Binary(BinaryOp::Pow, Box::new(self), Box::new(exp.into()))
    }

    /// Collect every variable referenced by this expression.
    pub fn free_vars(&self, out: &mut BTreeSet<VarId>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(id) => {
                out.insert(*id);
            }
            Expr::Unary(_, inner) => inner.free_vars(out),
            Expr::Binary(_, lhs, rhs) => {
                lhs.free_vars(out);
                rhs.free_vars(out);
            }
        }
    }

    /// Whether this expression references `var` anywhere.
    pub fn depends_on(&self, var: VarId) -> bool {
        match self {
            Expr::Const(_) => false,
            Expr::Var(id) => *id == var,
            Expr::Unary(_, inner) => inner.depends_on(var),
            Expr::Binary(_, lhs, rhs) => lhs.depends_on(var) || rhs.depends_on(var),
        }
    }

    /// Substitution pass: replace known variables with literals and fold
    /// constant subtrees. Unknown variables are left in place.
    ///
    /// Folding only happens where both operands are finite constants, so a
    /// partially known expression stays exact.
    pub fn fold(&self, values: &dyn Fn(VarId) -> Option<f64>) -> Expr {
        match self {
            Expr::Const(v) => Expr::Const(*v),
            Expr::Var(id) => match values(*id) {
                Some(v) => Expr::Const(v),
                None => Expr::Var(*id),
            },
            Expr::Unary(op, inner) => {
                let inner = inner.fold(values);
                if let Expr::Const(v) = inner {
                    if let Ok(folded) = crate::eval::apply_unary(*op, v) {
                        return Expr::Const(folded);
                    }
                }
                Expr::Unary(*op, Box::new(inner))
            }
            Expr::Binary(op, lhs, rhs) => {
                let lhs = lhs.fold(values);
                let rhs = rhs.fold(values);
                if let (Expr::Const(a), Expr::Const(b)) = (&lhs, &rhs) {
                    if let Ok(folded) = crate::eval::apply_binary(*op, *a, *b) {
                        return Expr::Const(folded);
                    }
                }
                Expr::Binary(*op, Box::new(lhs), Box::new(rhs))
            }
        }
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Const(v)
    }
}

impl From<VarId> for Expr {
    fn from(id: VarId) -> Self {
        Expr::Var(id)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(v) => write!(f, "{v}"),
            Expr::Var(id) => write!(f, "v{id}"),
            Expr::Unary(op, inner) => {
                let name = match op {
                    UnaryOp::Neg => return write!(f, "(-{inner})"),
                    UnaryOp::Sqrt => "sqrt",
                    UnaryOp::Exp => "exp",
                    UnaryOp::Ln => "ln",
                    UnaryOp::Sin => "sin",
                    UnaryOp::Cos => "cos",
                };
                write!(f, "{name}({inner})")
            }
            Expr::Binary(op, lhs, rhs) => {
                let sym = match op {
                    BinaryOp::Add => "+",
                    BinaryOp::Sub => "-",
                    BinaryOp::Mul => "*",
                    BinaryOp::Div => "/",
                    BinaryOp::Pow => "^",
                };
                write!(f, "({lhs} {sym} {rhs})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::Id;

    fn v(i: u32) -> Expr {
        Expr::var(Id::from_index(i))
    }

    #[test]
    fn free_vars_collects_all() {
        let e = (v(0) + v(1)) * v(0).sqrt();
        let mut vars = BTreeSet::new();
        e.free_vars(&mut vars);
        assert_eq!(vars.len(), 2);
        assert!(e.depends_on(Id::from_index(0)));
        assert!(!e.depends_on(Id::from_index(7)));
    }

    #[test]
    fn fold_replaces_known_and_folds_constants() {
        let e = v(0) * 2.0 + v(1);
        let folded = e.fold(&|id| (id.index() == 0).then_some(3.0));
        // 3*2 folds to 6, v1 stays symbolic
        assert_eq!(
            folded,
            Expr::Binary(
                BinaryOp::Add,
                Box::new(Expr::Const(6.0)),
                Box::new(v(1)),
            )
        );
    }

    #[test]
    fn fold_keeps_sqrt_of_negative_symbolic() {
        let e = Expr::lit(-1.0).sqrt();
        // Cannot fold to a finite constant; the tree is preserved
        assert!(matches!(e.fold(&|_| None), Expr::Unary(UnaryOp::Sqrt, _)));
    }

    #[test]
    fn display_is_readable() {
        let e = v(0).pow(2.0) - 4.0;
        assert_eq!(format!("{e}"), "((v0 ^ 2) - 4)");
    }
}
