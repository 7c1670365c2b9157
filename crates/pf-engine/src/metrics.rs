//! Metric evaluation over a solve outcome.
//!
//! Pure lookups plus arithmetic; recomputed on every call. A missing
//! variable fails with the exact name that blocks the requested metric.

use crate::error::{EngineError, EngineResult};
use pf_core::G0_MPS2;
use pf_solver::SolveOutcome;

/// Derived performance metrics read off a solve outcome.
pub struct Metrics<'a> {
    outcome: &'a SolveOutcome,
}

impl<'a> Metrics<'a> {
    pub fn new(outcome: &'a SolveOutcome) -> Self {
        Self { outcome }
    }

    fn require(&self, metric: &str, variable: &str) -> EngineResult<f64> {
        self.outcome
            .value(variable)
            .ok_or_else(|| EngineError::MissingInput {
                metric: metric.to_string(),
                variable: variable.to_string(),
            })
    }

    /// Thrust in N.
    pub fn thrust(&self) -> EngineResult<f64> {
        self.require("thrust", "thrust")
    }

    /// Specific impulse in s.
    pub fn specific_impulse(&self) -> EngineResult<f64> {
        self.require("specific_impulse", "specific_impulse")
    }

    /// Exit velocity in m/s.
    pub fn exit_velocity(&self) -> EngineResult<f64> {
        self.require("exit_velocity", "exit_velocity")
    }

    /// Total propellant mass flow in kg/s.
    pub fn total_mass_flow_rate(&self) -> EngineResult<f64> {
        self.require("total_mass_flow_rate", "total_mass_flow_rate")
    }

    /// Oxidizer-to-fuel mass flow ratio for the given stream names.
    pub fn mixture_ratio(&self, fuel_stream: &str, oxidizer_stream: &str) -> EngineResult<f64> {
        let fuel = self.require("mixture_ratio", &format!("{fuel_stream}_mass_flow_rate"))?;
        let oxidizer =
            self.require("mixture_ratio", &format!("{oxidizer_stream}_mass_flow_rate"))?;
        Ok(oxidizer / fuel)
    }

    /// Thrust-to-weight ratio against the given total mass in kg.
    pub fn thrust_to_weight(&self, total_mass: f64) -> EngineResult<f64> {
        Ok(self.thrust()? / (total_mass * G0_MPS2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_solver::Classification;
    use std::collections::BTreeMap;

    fn outcome(values: &[(&str, f64)]) -> SolveOutcome {
        SolveOutcome {
            classification: Classification::Solved,
            values: values
                .iter()
                .map(|&(k, v)| (k.to_string(), v))
                .collect::<BTreeMap<_, _>>(),
            partitions: Vec::new(),
        }
    }

    #[test]
    fn reads_solved_values() {
        let out = outcome(&[("thrust", 25000.0), ("specific_impulse", 420.0)]);
        let m = Metrics::new(&out);
        assert_eq!(m.thrust().unwrap(), 25000.0);
        assert_eq!(m.specific_impulse().unwrap(), 420.0);
    }

    #[test]
    fn missing_variable_names_the_blocker() {
        let out = outcome(&[("thrust", 25000.0)]);
        let err = Metrics::new(&out).exit_velocity().unwrap_err();
        match err {
            EngineError::MissingInput { metric, variable } => {
                assert_eq!(metric, "exit_velocity");
                assert_eq!(variable, "exit_velocity");
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn thrust_to_weight_uses_standard_gravity() {
        let out = outcome(&[("thrust", 25000.0)]);
        let twr = Metrics::new(&out).thrust_to_weight(267.0).unwrap();
        assert!((twr - 9.548).abs() < 1e-2);
    }
}
