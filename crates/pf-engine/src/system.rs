//! The propulsion system facade.

use crate::error::{EngineError, EngineResult};
use crate::metrics::Metrics;
use crate::validate::{validate, Finding};
use pf_components::Component;
use pf_solver::{solve_and_commit, SolveOutcome, SolverConfig};
use pf_system::{ConstraintSystem, VarSpec};
use std::sync::OnceLock;
use tracing::debug;

/// A solved system: the assembled registry/store pair plus the outcome.
pub struct Solution {
    pub system: ConstraintSystem,
    pub outcome: SolveOutcome,
}

/// Owns an ordered set of components and solves their combined
/// constraints on demand.
///
/// Assembly and solve run at most once per configuration: the first
/// metric query triggers them and the result is cached until a component
/// is added or the thrust target changes, which rebuilds from scratch.
#[derive(Default)]
pub struct PropulsionSystem {
    components: Vec<Box<dyn Component>>,
    target_thrust: Option<f64>,
    config: SolverConfig,
    cache: OnceLock<Result<Solution, EngineError>>,
}

impl PropulsionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a component; invalidates any cached solve.
    pub fn add_component(&mut self, component: impl Component + 'static) {
        self.components.push(Box::new(component));
        self.cache.take();
    }

    /// Fix the thrust the system must deliver, in N.
    pub fn set_target_thrust(&mut self, thrust: f64) {
        self.target_thrust = Some(thrust);
        self.cache.take();
    }

    /// Summed dry mass of every component that declared one.
    pub fn total_mass(&self) -> Option<f64> {
        let masses: Vec<f64> = self.components.iter().filter_map(|c| c.mass()).collect();
        if masses.is_empty() {
            None
        } else {
            Some(masses.iter().sum())
        }
    }

    fn assemble_and_solve(&self) -> Result<Solution, EngineError> {
        let mut system = ConstraintSystem::new();
        for component in &self.components {
            component.contribute(&mut system)?;
        }
        if let Some(thrust) = self.target_thrust {
            system.declare("thrust", VarSpec::known(thrust).with_unit("N"))?;
        }
        debug!(
            components = self.components.len(),
            variables = system.registry().len(),
            equations = system.store().len(),
            "assembled"
        );
        let outcome = solve_and_commit(&mut system, &self.config)?;
        debug!(classification = ?outcome.classification, "solved");
        Ok(Solution { system, outcome })
    }

    /// Assemble and solve once, returning the cached result thereafter.
    pub fn solution(&self) -> EngineResult<&Solution> {
        match self.cache.get_or_init(|| self.assemble_and_solve()) {
            Ok(solution) => Ok(solution),
            Err(e) => Err(e.clone()),
        }
    }

    /// The solve outcome (classification, values, partition reports).
    pub fn outcome(&self) -> EngineResult<&SolveOutcome> {
        Ok(&self.solution()?.outcome)
    }

    /// Thrust in N.
    pub fn thrust(&self) -> EngineResult<f64> {
        Metrics::new(self.outcome()?).thrust()
    }

    /// Specific impulse in s.
    pub fn specific_impulse(&self) -> EngineResult<f64> {
        Metrics::new(self.outcome()?).specific_impulse()
    }

    /// Exit velocity in m/s.
    pub fn exit_velocity(&self) -> EngineResult<f64> {
        Metrics::new(self.outcome()?).exit_velocity()
    }

    /// Total propellant mass flow in kg/s.
    pub fn total_mass_flow_rate(&self) -> EngineResult<f64> {
        Metrics::new(self.outcome()?).total_mass_flow_rate()
    }

    /// Thrust-to-weight ratio; requires at least one component mass.
    pub fn thrust_to_weight_ratio(&self) -> EngineResult<f64> {
        let mass = self.total_mass().ok_or_else(|| EngineError::MissingInput {
            metric: "thrust_to_weight_ratio".to_string(),
            variable: "total_mass".to_string(),
        })?;
        Metrics::new(self.outcome()?).thrust_to_weight(mass)
    }

    /// Run the post-solve validator.
    pub fn validate(&self) -> EngineResult<Vec<Finding>> {
        let solution = self.solution()?;
        Ok(validate(
            &solution.system,
            &solution.outcome,
            self.total_mass(),
        ))
    }

    /// Human-readable system summary.
    pub fn summary(&self) -> EngineResult<String> {
        let solution = self.solution()?;
        let findings = self.validate()?;
        Ok(crate::summary::render(
            &solution.outcome,
            &findings,
            self.total_mass(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_components::{Propellant, Tank};

    #[test]
    fn total_mass_sums_declared_masses() {
        let mut sys = PropulsionSystem::new();
        sys.add_component(Tank::new("fuel", Propellant::Lh2).with_mass(40.0));
        sys.add_component(Tank::new("oxidizer", Propellant::Lox).with_mass(60.0));
        assert_eq!(sys.total_mass(), Some(100.0));
    }

    #[test]
    fn empty_system_has_no_mass() {
        assert_eq!(PropulsionSystem::new().total_mass(), None);
    }
}
