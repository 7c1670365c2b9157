//! Solve outcomes: per-partition reports and the aggregate result.

use std::collections::BTreeMap;

/// Aggregate classification of a solve across all partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Every partition resolved all of its unknowns.
    Solved,
    /// Some partitions resolved, others did not (or failures were of
    /// mixed kinds).
    PartiallySolved,
    /// Nothing resolved; every failing partition lacked equations.
    Underdetermined,
    /// Nothing resolved; every failing partition was contradictory.
    Infeasible,
    /// Nothing resolved; every failing partition had an unresolvable
    /// multi-root choice.
    Ambiguous,
}

/// Result for one independent partition of the unknown set.
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionOutcome {
    /// All unknowns of the partition were determined and every equation
    /// verified at the solution.
    Solved,
    /// Fewer informative equations than unknowns; `free` names the
    /// variables left undetermined.
    Underdetermined { free: Vec<String> },
    /// No value satisfies the listed equations together. The first label
    /// is the violated equation; the rest determined the values it was
    /// checked against.
    Infeasible { equations: Vec<String>, reason: String },
    /// Several domain-valid roots and no branch policy to pick one.
    Ambiguous { variable: String, candidates: Vec<f64> },
}

/// One partition's unknowns and how its solve ended.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionReport {
    /// Names of the unknowns assigned to this partition.
    pub unknowns: Vec<String>,
    pub outcome: PartitionOutcome,
}

impl PartitionReport {
    pub fn is_solved(&self) -> bool {
        self.outcome == PartitionOutcome::Solved
    }
}

/// Aggregate result of a solve.
///
/// `values` holds every variable with a value at the end: inputs as
/// supplied plus whatever the solver determined, including values from
/// partitions that only partially resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub classification: Classification,
    pub values: BTreeMap<String, f64>,
    pub partitions: Vec<PartitionReport>,
}

impl SolveOutcome {
    pub fn is_solved(&self) -> bool {
        self.classification == Classification::Solved
    }

    /// Value of a variable by name, if it ended up determined.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Names of all variables left undetermined, across partitions.
    pub fn free_variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for p in &self.partitions {
            if let PartitionOutcome::Underdetermined { free } = &p.outcome {
                out.extend(free.iter().map(String::as_str));
            }
        }
        out
    }

    /// Labels of all equations implicated in a contradiction.
    pub fn conflicting_equations(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for p in &self.partitions {
            if let PartitionOutcome::Infeasible { equations, .. } = &p.outcome {
                for label in equations {
                    if !out.contains(&label.as_str()) {
                        out.push(label.as_str());
                    }
                }
            }
        }
        out
    }
}

/// Derive the aggregate classification from per-partition outcomes.
pub(crate) fn classify(partitions: &[PartitionReport]) -> Classification {
    if partitions.iter().all(PartitionReport::is_solved) {
        return Classification::Solved;
    }
    if partitions.iter().any(PartitionReport::is_solved) {
        return Classification::PartiallySolved;
    }

    let mut kind = None;
    for p in partitions {
        let k = match &p.outcome {
            PartitionOutcome::Solved => continue,
            PartitionOutcome::Underdetermined { .. } => Classification::Underdetermined,
            PartitionOutcome::Infeasible { .. } => Classification::Infeasible,
            PartitionOutcome::Ambiguous { .. } => Classification::Ambiguous,
        };
        match kind {
            None => kind = Some(k),
            Some(prev) if prev != k => return Classification::PartiallySolved,
            Some(_) => {}
        }
    }
    kind.unwrap_or(Classification::Solved)
}
