//! Algebraic equality constraints between expressions.

use pf_core::VarId;
use pf_expr::Expr;
use std::collections::BTreeSet;
use std::fmt;

/// An equality `lhs = rhs` between two expressions.
///
/// Immutable once added to a store. The label is for diagnostics; the
/// optional source names the contributing component.
#[derive(Debug, Clone)]
pub struct Equation {
    label: String,
    source: Option<String>,
    lhs: Expr,
    rhs: Expr,
}

impl Equation {
    pub fn new(label: impl Into<String>, lhs: Expr, rhs: Expr) -> Self {
        Self {
            label: label.into(),
            source: None,
            lhs,
            rhs,
        }
    }

    /// Tag the contributing component (for diagnostics).
    pub fn from_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn lhs(&self) -> &Expr {
        &self.lhs
    }

    pub fn rhs(&self) -> &Expr {
        &self.rhs
    }

    /// `lhs - rhs` as a single expression; zero at a solution.
    pub fn residual(&self) -> Expr {
        self.lhs.clone() - self.rhs.clone()
    }

    /// Every variable this equation references.
    pub fn vars(&self) -> BTreeSet<VarId> {
        let mut out = BTreeSet::new();
        self.lhs.free_vars(&mut out);
        self.rhs.free_vars(&mut out);
        out
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} = {}", self.label, self.lhs, self.rhs)
    }
}
