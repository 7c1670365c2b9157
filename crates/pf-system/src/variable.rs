//! Variables: named physical quantities with domain predicates.

use pf_core::VarId;

/// Domain predicate a variable's value must satisfy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// Any finite value.
    Free,
    /// Strictly positive.
    Positive,
    /// Zero or positive.
    NonNegative,
    /// Closed interval.
    Range { lo: f64, hi: f64 },
}

impl Domain {
    /// Whether `v` satisfies the predicate.
    pub fn admits(&self, v: f64) -> bool {
        if !v.is_finite() {
            return false;
        }
        match self {
            Domain::Free => true,
            Domain::Positive => v > 0.0,
            Domain::NonNegative => v >= 0.0,
            Domain::Range { lo, hi } => (*lo..=*hi).contains(&v),
        }
    }

    /// Lower/upper bounds usable as a numeric search bracket.
    pub fn bracket(&self) -> (f64, f64) {
        match self {
            Domain::Free => (f64::NEG_INFINITY, f64::INFINITY),
            Domain::Positive | Domain::NonNegative => (0.0, f64::INFINITY),
            Domain::Range { lo, hi } => (*lo, *hi),
        }
    }
}

/// Physical branch-selection policy for variables whose defining equation
/// has several mathematically valid roots (e.g., the subsonic/supersonic
/// solutions of a nozzle area-ratio relation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchPolicy {
    /// Take the smallest domain-valid root.
    PreferSmallest,
    /// Take the largest domain-valid root.
    PreferLargest,
}

/// Declaration request for a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VarSpec {
    pub value: Option<f64>,
    pub domain: Domain,
    pub unit: Option<&'static str>,
    pub branch: Option<BranchPolicy>,
}

impl VarSpec {
    /// An unknown to be solved for.
    pub fn unknown() -> Self {
        Self {
            value: None,
            domain: Domain::Free,
            unit: None,
            branch: None,
        }
    }

    /// A supplied (known) value.
    pub fn known(value: f64) -> Self {
        Self {
            value: Some(value),
            domain: Domain::Free,
            unit: None,
            branch: None,
        }
    }

    pub fn in_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    /// Advisory unit tag; never enforced.
    pub fn with_unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_branch(mut self, branch: BranchPolicy) -> Self {
        self.branch = Some(branch);
        self
    }
}

/// A named quantity in one system instance.
#[derive(Debug, Clone)]
pub struct Variable {
    pub id: VarId,
    pub name: String,
    /// Present if known at declaration or written back by the solver.
    pub value: Option<f64>,
    pub domain: Domain,
    pub unit: Option<&'static str>,
    pub branch: Option<BranchPolicy>,
}

impl Variable {
    pub fn is_known(&self) -> bool {
        self.value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_predicates() {
        assert!(Domain::Free.admits(-5.0));
        assert!(!Domain::Free.admits(f64::NAN));
        assert!(Domain::Positive.admits(1e-12));
        assert!(!Domain::Positive.admits(0.0));
        assert!(Domain::NonNegative.admits(0.0));
        assert!(Domain::Range { lo: 1.0, hi: 2.0 }.admits(1.5));
        assert!(!Domain::Range { lo: 1.0, hi: 2.0 }.admits(2.1));
    }

    #[test]
    fn range_bracket() {
        let (lo, hi) = Domain::Range { lo: 3.0, hi: 9.0 }.bracket();
        assert_eq!((lo, hi), (3.0, 9.0));
    }
}
