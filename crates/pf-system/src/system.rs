//! The Registry+Store aggregate one system instance owns.

use crate::equation::Equation;
use crate::error::{SystemError, SystemResult};
use crate::registry::VariableRegistry;
use crate::store::EquationStore;
use crate::variable::VarSpec;
use pf_core::VarId;

/// Aggregate root: one registry plus one store, created per system
/// instance and populated during assembly.
///
/// Exclusively owned by the facade; components write into it through a
/// mutable borrow during their contribution call and never hold it
/// afterwards. There is no incremental re-solve: when the component set
/// changes, the facade rebuilds a fresh aggregate.
#[derive(Debug, Default)]
pub struct ConstraintSystem {
    registry: VariableRegistry,
    store: EquationStore,
}

impl ConstraintSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable into the shared registry.
    pub fn declare(&mut self, name: impl Into<String>, spec: VarSpec) -> SystemResult<VarId> {
        self.registry.declare(name, spec)
    }

    /// Add an equation, checking that every referenced variable is
    /// declared. An out-of-range id means the expression was built
    /// against a different system instance, which is a component bug.
    pub fn add_equation(&mut self, equation: Equation) -> SystemResult<usize> {
        for id in equation.vars() {
            if self.registry.var(id).is_none() {
                return Err(SystemError::StructuralError {
                    equation: equation.label().to_string(),
                    what: format!("references undeclared variable id {id}"),
                });
            }
        }
        Ok(self.store.add(equation))
    }

    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut VariableRegistry {
        &mut self.registry
    }

    pub fn store(&self) -> &EquationStore {
        &self.store
    }
}
