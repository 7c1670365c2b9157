//! Ordered, append-only collection of equations.

use crate::equation::Equation;
use pf_core::VarId;
use std::collections::BTreeSet;

/// Owns the equations contributed by components, in insertion order.
///
/// No deduplication: redundant equations are permitted and the solver
/// tolerates them (a consistent extra equation verifies cleanly, an
/// inconsistent one flags its partition infeasible).
#[derive(Debug, Default)]
pub struct EquationStore {
    equations: Vec<Equation>,
}

impl EquationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an equation; returns its index.
    pub fn add(&mut self, equation: Equation) -> usize {
        self.equations.push(equation);
        self.equations.len() - 1
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    pub fn get(&self, index: usize) -> Option<&Equation> {
        self.equations.get(index)
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    /// Bipartite incidence: for each equation (by index), the set of
    /// variables it references. The solver partitions work over this.
    pub fn incidence(&self) -> Vec<BTreeSet<VarId>> {
        self.equations.iter().map(|eq| eq.vars()).collect()
    }
}
