//! Solve orchestration: fold, partition, propagate, fall back to Newton,
//! verify.
//!
//! Each partition is attacked by propagation first: any equation left with
//! a single open unknown is solved for it in closed form or by scan, and
//! the value feeds the next round. Propagation keeps root choices visible,
//! so branch policies apply exactly where a multi-root equation is
//! resolved. Only a stalled cluster of mutually coupled unknowns goes to
//! the Newton fallback. Every equation of the partition, redundant ones
//! included, is verified at the end.

use crate::error::{SolveError, SolveResult};
use crate::newton::{newton_solve, NewtonConfig};
use crate::outcome::{classify, PartitionOutcome, PartitionReport, SolveOutcome};
use crate::partition::{partition, Partition};
use crate::scalar::{solve_scalar, ScalarOutcome, ScanConfig};
use crate::substitute::{fold_system, Folded};
use nalgebra::DVector;
use pf_core::{Tolerances, VarId};
use pf_system::{BranchPolicy, ConstraintSystem, Domain, VariableRegistry};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

/// Solver configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Numeric comparison tolerances.
    pub tol: Tolerances,
    /// Relative slack for end-of-solve equation verification. Looser than
    /// `tol` because scanned roots carry bisection error.
    pub verify_rel: f64,
    pub newton: NewtonConfig,
    pub scan: ScanConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tol: Tolerances::default(),
            verify_rel: 1e-6,
            newton: NewtonConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}

/// Solve the system's equations for its unknowns.
///
/// Structural faults are the only `Err`; everything else, including an
/// unsolvable system, is described by the returned [`SolveOutcome`].
pub fn solve(system: &ConstraintSystem, config: &SolverConfig) -> SolveResult<SolveOutcome> {
    let registry = system.registry();
    for eq in system.store().equations() {
        for id in eq.vars() {
            if registry.var(id).is_none() {
                return Err(SolveError::Structural {
                    equation: eq.label().to_string(),
                    what: format!("references undeclared variable id {id}"),
                });
            }
        }
    }

    let (folded, contradictions) = fold_system(system, config.tol);
    debug!(
        equations = system.store().len(),
        active = folded.len(),
        contradictions = contradictions.len(),
        "folded known values"
    );

    let mut reports: Vec<PartitionReport> = contradictions
        .into_iter()
        .map(|c| PartitionReport {
            unknowns: Vec::new(),
            outcome: PartitionOutcome::Infeasible {
                equations: vec![c.label],
                reason: c.reason,
            },
        })
        .collect();

    let parts = partition(&folded);
    debug!(partitions = parts.len(), "partitioned unknowns");

    let solved: Vec<(PartitionReport, Vec<(VarId, f64)>)> = parts
        .par_iter()
        .map(|p| solve_partition(p, &folded, registry, config))
        .collect();

    let mut values: BTreeMap<String, f64> = registry
        .iter()
        .filter_map(|v| v.value.map(|x| (v.name.clone(), x)))
        .collect();
    for (report, vals) in solved {
        for (id, x) in vals {
            if let Some(var) = registry.var(id) {
                values.insert(var.name.clone(), x);
            }
        }
        reports.push(report);
    }

    Ok(SolveOutcome {
        classification: classify(&reports),
        values,
        partitions: reports,
    })
}

/// Solve and write every newly determined value back into the registry.
pub fn solve_and_commit(
    system: &mut ConstraintSystem,
    config: &SolverConfig,
) -> SolveResult<SolveOutcome> {
    let outcome = solve(system, config)?;
    let newly: Vec<(VarId, f64)> = outcome
        .values
        .iter()
        .filter_map(|(name, &v)| {
            let var = system.registry().get(name)?;
            (!var.is_known()).then_some((var.id, v))
        })
        .collect();
    for (id, v) in newly {
        system.registry_mut().set_solved(id, v)?;
    }
    Ok(outcome)
}

/// The violated equation's label plus the labels of the equations that
/// determined the values it was checked against.
fn conflict_labels(
    eq: &Folded,
    folded: &[Folded],
    determined_by: &BTreeMap<VarId, usize>,
) -> Vec<String> {
    let mut labels = vec![eq.label.clone()];
    for v in &eq.unknowns {
        if let Some(&ei) = determined_by.get(v) {
            let label = &folded[ei].label;
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
    }
    labels
}

/// Check every listed equation at the assembled values.
fn verify(
    eqs: &[usize],
    folded: &[Folded],
    local: &BTreeMap<VarId, f64>,
    determined_by: &BTreeMap<VarId, usize>,
    config: &SolverConfig,
) -> Result<(), PartitionOutcome> {
    let lookup = |id: VarId| local.get(&id).copied();
    for &ei in eqs {
        let eq = &folded[ei];
        match (eq.lhs.eval(&lookup), eq.rhs.eval(&lookup)) {
            (Ok(l), Ok(r)) => {
                let slack = config
                    .tol
                    .abs
                    .max(config.verify_rel * l.abs().max(r.abs()).max(1.0));
                if (l - r).abs() > slack {
                    return Err(PartitionOutcome::Infeasible {
                        equations: conflict_labels(eq, folded, determined_by),
                        reason: format!(
                            "evaluates to {l} on the left and {r} on the right at the solution"
                        ),
                    });
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                return Err(PartitionOutcome::Infeasible {
                    equations: conflict_labels(eq, folded, determined_by),
                    reason: format!("cannot be evaluated at the solution: {e}"),
                });
            }
        }
    }
    Ok(())
}

/// Solve one partition. Returns the report and whatever values were
/// determined, even on failure.
fn solve_partition(
    part: &Partition,
    folded: &[Folded],
    registry: &VariableRegistry,
    config: &SolverConfig,
) -> (PartitionReport, Vec<(VarId, f64)>) {
    let name_of = |id: VarId| {
        registry
            .var(id)
            .map(|v| v.name.clone())
            .unwrap_or_else(|| format!("id {id}"))
    };
    let unknown_names: Vec<String> = part.unknowns.iter().map(|&v| name_of(v)).collect();
    let report = |outcome: PartitionOutcome, local: &BTreeMap<VarId, f64>| {
        (
            PartitionReport {
                unknowns: unknown_names.clone(),
                outcome,
            },
            local.iter().map(|(&k, &v)| (k, v)).collect(),
        )
    };

    // Structurally identical duplicates (a component contributed twice)
    // carry no information; drop them before counting equations.
    let mut remaining: Vec<usize> = Vec::new();
    for &ei in &part.equations {
        let duplicate = remaining
            .iter()
            .any(|&pj| folded[pj].lhs == folded[ei].lhs && folded[pj].rhs == folded[ei].rhs);
        if !duplicate {
            remaining.push(ei);
        }
    }

    // Cardinality first: a partition with fewer distinct equations than
    // unknowns cannot close regardless of their shape.
    if part.unknowns.len() > remaining.len() {
        return report(
            PartitionOutcome::Underdetermined {
                free: unknown_names.clone(),
            },
            &BTreeMap::new(),
        );
    }

    let mut local: BTreeMap<VarId, f64> = BTreeMap::new();
    let mut determined_by: BTreeMap<VarId, usize> = BTreeMap::new();
    let mut open: BTreeSet<VarId> = part.unknowns.iter().copied().collect();

    // Propagation: repeatedly solve any equation left with one open
    // unknown, in insertion order for determinism.
    loop {
        let mut action = None;
        for (pos, &ei) in remaining.iter().enumerate() {
            let mut open_in_eq = folded[ei]
                .unknowns
                .iter()
                .filter(|&v| !local.contains_key(v));
            if let (Some(&v), None) = (open_in_eq.next(), open_in_eq.next()) {
                action = Some((pos, ei, v));
                break;
            }
        }
        let Some((pos, ei, var)) = action else { break };

        let eq = &folded[ei];
        let residual = eq.residual().fold(&|id| local.get(&id).copied());
        let (domain, branch) = match registry.var(var) {
            Some(v) => (v.domain, v.branch),
            None => (Domain::Free, None),
        };

        match solve_scalar(&residual, var, domain, &config.scan, config.tol) {
            ScalarOutcome::Identity => {
                trace!(label = %eq.label, "equation gives no information, dropped");
                remaining.remove(pos);
            }
            ScalarOutcome::NoRoot { reason } => {
                return report(
                    PartitionOutcome::Infeasible {
                        equations: conflict_labels(eq, folded, &determined_by),
                        reason,
                    },
                    &local,
                );
            }
            ScalarOutcome::Roots(roots) => {
                let value = if roots.len() == 1 {
                    roots[0]
                } else {
                    match branch {
                        Some(BranchPolicy::PreferSmallest) => roots[0],
                        Some(BranchPolicy::PreferLargest) => roots[roots.len() - 1],
                        None => {
                            return report(
                                PartitionOutcome::Ambiguous {
                                    variable: name_of(var),
                                    candidates: roots,
                                },
                                &local,
                            );
                        }
                    }
                };
                trace!(variable = %name_of(var), value, label = %eq.label, "propagated");
                local.insert(var, value);
                determined_by.insert(var, ei);
                open.remove(&var);
                remaining.remove(pos);
            }
        }
    }

    if open.is_empty() {
        if let Err(outcome) = verify(&remaining, folded, &local, &determined_by, config) {
            return report(outcome, &local);
        }
        return report(PartitionOutcome::Solved, &local);
    }

    // Identity drops may have left too few equations for the rest.
    if remaining.len() < open.len() {
        return report(
            PartitionOutcome::Underdetermined {
                free: open.iter().map(|&v| name_of(v)).collect(),
            },
            &local,
        );
    }

    // Coupled cluster: damped Newton over the open unknowns, using as
    // many equations as unknowns; surplus equations verify afterwards.
    let order: Vec<VarId> = open.iter().copied().collect();
    let core: Vec<usize> = remaining.iter().copied().take(order.len()).collect();
    let domains: Vec<Domain> = order
        .iter()
        .map(|&v| registry.var(v).map_or(Domain::Free, |x| x.domain))
        .collect();
    debug!(unknowns = order.len(), "propagation stalled, entering Newton");

    let residual_fn = |x: &DVector<f64>| -> SolveResult<DVector<f64>> {
        let lookup = |id: VarId| {
            local
                .get(&id)
                .copied()
                .or_else(|| order.iter().position(|&v| v == id).map(|i| x[i]))
        };
        let mut r = DVector::zeros(core.len());
        for (row, &ei) in core.iter().enumerate() {
            let l = folded[ei].lhs.eval(&lookup).map_err(|e| SolveError::Numeric {
                what: e.to_string(),
            })?;
            let rr = folded[ei].rhs.eval(&lookup).map_err(|e| SolveError::Numeric {
                what: e.to_string(),
            })?;
            r[row] = l - rr;
        }
        Ok(r)
    };
    let admissible =
        |x: &DVector<f64>| x.iter().zip(&domains).all(|(&v, d)| d.admits(v));
    let x0 = DVector::from_iterator(
        order.len(),
        domains.iter().map(|d| match d {
            Domain::Range { lo, hi } => 0.5 * (lo + hi),
            _ => 1.0,
        }),
    );

    match newton_solve(x0, residual_fn, admissible, &config.newton) {
        Ok(result) => {
            for (i, &v) in order.iter().enumerate() {
                local.insert(v, result.x[i]);
                determined_by.insert(v, core[i.min(core.len() - 1)]);
            }
            if let Err(outcome) = verify(&remaining, folded, &local, &determined_by, config) {
                return report(outcome, &local);
            }
            report(PartitionOutcome::Solved, &local)
        }
        Err(e) => {
            let mut equations: Vec<String> = Vec::new();
            for &ei in &core {
                let label = &folded[ei].label;
                if !equations.contains(label) {
                    equations.push(label.clone());
                }
            }
            report(
                PartitionOutcome::Infeasible {
                    equations,
                    reason: e.to_string(),
                },
                &local,
            )
        }
    }
}
