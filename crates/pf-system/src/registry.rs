//! The canonical set of named variables for one system instance.

use crate::error::{SystemError, SystemResult};
use crate::variable::{Domain, VarSpec, Variable};
use pf_core::{ensure_finite, nearly_equal, Tolerances, VarId};
use std::collections::HashMap;

/// Owns every variable of one system, deduplicated by name.
///
/// Components declare into a shared registry during assembly; two
/// components naming the same variable couple through it. Re-declaration
/// is idempotent when identical and may tighten an earlier declaration
/// (supply a value, domain or branch policy where none was present);
/// anything contradictory is a `NameConflict`.
#[derive(Debug, Default)]
pub struct VariableRegistry {
    vars: Vec<Variable>,
    by_name: HashMap<String, VarId>,
    tol: Tolerances,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable, returning its id.
    ///
    /// No implicit defaults: a variable declared without a value is an
    /// unknown the solver must resolve.
    pub fn declare(&mut self, name: impl Into<String>, spec: VarSpec) -> SystemResult<VarId> {
        let name = name.into();
        if let Some(v) = spec.value {
            ensure_finite(v, "declared value").map_err(SystemError::Core)?;
            if !spec.domain.admits(v) {
                return Err(SystemError::NameConflict {
                    name,
                    reason: format!("known value {v} violates its own domain predicate"),
                });
            }
        }

        if let Some(&id) = self.by_name.get(&name) {
            return self.merge(id, spec);
        }

        let id = VarId::from_index(self.vars.len() as u32);
        self.vars.push(Variable {
            id,
            name: name.clone(),
            value: spec.value,
            domain: spec.domain,
            unit: spec.unit,
            branch: spec.branch,
        });
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Merge a re-declaration into an existing variable.
    fn merge(&mut self, id: VarId, spec: VarSpec) -> SystemResult<VarId> {
        let var = &mut self.vars[id.index() as usize];

        match (var.value, spec.value) {
            (Some(a), Some(b)) if !nearly_equal(a, b, self.tol) => {
                return Err(SystemError::NameConflict {
                    name: var.name.clone(),
                    reason: format!("declared with two different known values ({a} vs {b})"),
                });
            }
            (None, Some(b)) => var.value = Some(b),
            _ => {}
        }

        match (var.domain, spec.domain) {
            (a, b) if a == b => {}
            (Domain::Free, b) => var.domain = b,
            (_, Domain::Free) => {}
            (a, b) => {
                return Err(SystemError::NameConflict {
                    name: var.name.clone(),
                    reason: format!("incompatible domain predicates ({a:?} vs {b:?})"),
                });
            }
        }

        match (var.branch, spec.branch) {
            (Some(a), Some(b)) if a != b => {
                return Err(SystemError::NameConflict {
                    name: var.name.clone(),
                    reason: "conflicting branch-selection policies".into(),
                });
            }
            (None, Some(b)) => var.branch = Some(b),
            _ => {}
        }

        if var.unit.is_none() {
            var.unit = spec.unit;
        }

        // A merged-in value must still satisfy the merged domain
        if let Some(v) = var.value {
            if !var.domain.admits(v) {
                return Err(SystemError::NameConflict {
                    name: var.name.clone(),
                    reason: format!("known value {v} violates the merged domain predicate"),
                });
            }
        }

        Ok(id)
    }

    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.by_name
            .get(name)
            .map(|id| &self.vars[id.index() as usize])
    }

    /// Current value by name, if known or solved.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|v| v.value)
    }

    pub fn id_of(&self, name: &str) -> Option<VarId> {
        self.by_name.get(name).copied()
    }

    /// Variable by id; `None` if the id does not belong to this registry.
    pub fn var(&self, id: VarId) -> Option<&Variable> {
        self.vars.get(id.index() as usize)
    }

    /// Record a solved value (solver write-back).
    pub fn set_solved(&mut self, id: VarId, value: f64) -> SystemResult<()> {
        ensure_finite(value, "solved value").map_err(SystemError::Core)?;
        let var = self
            .vars
            .get_mut(id.index() as usize)
            .ok_or_else(|| SystemError::UnknownVariable {
                name: format!("id {id}"),
            })?;
        var.value = Some(value);
        Ok(())
    }

    /// Variables in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
