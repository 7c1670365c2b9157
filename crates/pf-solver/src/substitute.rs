//! Known-value substitution over the equation store.
//!
//! Folds every supplied value into the equations before partitioning, so
//! the structural phase only sees true unknowns. Equations that become
//! fully constant are settled here: consistent ones drop out, inconsistent
//! ones are reported as contradictions.

use pf_core::{Tolerances, VarId};
use pf_expr::Expr;
use pf_system::ConstraintSystem;
use std::collections::BTreeSet;
use tracing::trace;

/// An equation with known values folded in; `unknowns` is what is left.
#[derive(Debug, Clone)]
pub(crate) struct Folded {
    pub label: String,
    pub lhs: Expr,
    pub rhs: Expr,
    pub unknowns: BTreeSet<VarId>,
}

impl Folded {
    /// `lhs - rhs` over the remaining unknowns.
    pub fn residual(&self) -> Expr {
        self.lhs.clone() - self.rhs.clone()
    }
}

/// A fully known equation whose sides disagree.
#[derive(Debug, Clone)]
pub(crate) struct Contradiction {
    pub label: String,
    pub reason: String,
}

/// Fold registry values into every stored equation.
pub(crate) fn fold_system(
    system: &ConstraintSystem,
    tol: Tolerances,
) -> (Vec<Folded>, Vec<Contradiction>) {
    let registry = system.registry();
    let known = |id: VarId| registry.var(id).and_then(|v| v.value);

    let mut folded = Vec::new();
    let mut contradictions = Vec::new();

    for eq in system.store().equations() {
        let lhs = eq.lhs().fold(&known);
        let rhs = eq.rhs().fold(&known);

        let mut unknowns = BTreeSet::new();
        lhs.free_vars(&mut unknowns);
        rhs.free_vars(&mut unknowns);

        if unknowns.is_empty() {
            match (lhs.eval(&known), rhs.eval(&known)) {
                (Ok(l), Ok(r)) => {
                    if (l - r).abs() <= tol.abs.max(tol.rel * l.abs().max(r.abs())) {
                        trace!(label = eq.label(), "constant equation holds, dropped");
                    } else {
                        contradictions.push(Contradiction {
                            label: eq.label().to_string(),
                            reason: format!(
                                "evaluates to {l} on the left and {r} on the right"
                            ),
                        });
                    }
                }
                (Err(e), _) | (_, Err(e)) => {
                    contradictions.push(Contradiction {
                        label: eq.label().to_string(),
                        reason: format!("cannot be evaluated with the supplied values: {e}"),
                    });
                }
            }
            continue;
        }

        folded.push(Folded {
            label: eq.label().to_string(),
            lhs,
            rhs,
            unknowns,
        });
    }

    (folded, contradictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_system::{Equation, VarSpec};

    #[test]
    fn known_values_fold_away() {
        let mut sys = ConstraintSystem::new();
        let a = sys.declare("a", VarSpec::known(2.0)).unwrap();
        let b = sys.declare("b", VarSpec::unknown()).unwrap();
        sys.add_equation(Equation::new(
            "sum",
            Expr::var(a) + Expr::var(b),
            Expr::lit(5.0),
        ))
        .unwrap();

        let (folded, contradictions) = fold_system(&sys, Tolerances::default());
        assert!(contradictions.is_empty());
        assert_eq!(folded.len(), 1);
        assert_eq!(folded[0].unknowns.iter().copied().collect::<Vec<_>>(), vec![b]);
        // a folded to 2.0, so the residual at b = 3 is zero
        assert_eq!(
            folded[0].residual().eval(&|_| Some(3.0)).unwrap(),
            0.0
        );
    }

    #[test]
    fn consistent_constant_equation_drops_out() {
        let mut sys = ConstraintSystem::new();
        let a = sys.declare("a", VarSpec::known(2.0)).unwrap();
        sys.add_equation(Equation::new("fixed", Expr::var(a), Expr::lit(2.0)))
            .unwrap();

        let (folded, contradictions) = fold_system(&sys, Tolerances::default());
        assert!(folded.is_empty());
        assert!(contradictions.is_empty());
    }

    #[test]
    fn inconsistent_constant_equation_is_a_contradiction() {
        let mut sys = ConstraintSystem::new();
        let a = sys.declare("a", VarSpec::known(2.0)).unwrap();
        sys.add_equation(Equation::new("clash", Expr::var(a), Expr::lit(3.0)))
            .unwrap();

        let (folded, contradictions) = fold_system(&sys, Tolerances::default());
        assert!(folded.is_empty());
        assert_eq!(contradictions.len(), 1);
        assert_eq!(contradictions[0].label, "clash");
    }
}
