//! Post-solve validation.
//!
//! Re-checks every solved value against its domain predicate, closes the
//! mass balance across the streams, and runs engineering plausibility
//! checks that are advisory rather than binding. Nothing here mutates
//! state; the caller decides what to do with the findings.

use pf_solver::SolveOutcome;
use pf_system::ConstraintSystem;

/// Finding severity. An `Error` invalidates the system even when the
/// solver reported success; a `Warning` flags implausible engineering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    /// A solved value violates its variable's domain predicate.
    DomainViolation,
    /// Stream mass flows do not add up to the chamber inflow.
    ConservationViolation,
    /// A value is outside the plausible engineering range.
    Plausibility,
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    pub message: String,
    /// Implicated variable names.
    pub subjects: Vec<String>,
}

impl Finding {
    fn error(kind: FindingKind, message: String, subjects: Vec<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            message,
            subjects,
        }
    }

    fn warning(message: String, subjects: Vec<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind: FindingKind::Plausibility,
            message,
            subjects,
        }
    }
}

/// Whether any finding is an error.
pub fn has_errors(findings: &[Finding]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Error)
}

/// Relative tolerance for the mass balance closure.
const MASS_CLOSURE_REL: f64 = 1e-6;

/// Run every check against the solved system.
///
/// `total_mass` is the summed component dry mass, if any was declared;
/// it only feeds the thrust-to-weight plausibility check.
pub fn validate(
    system: &ConstraintSystem,
    outcome: &SolveOutcome,
    total_mass: Option<f64>,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    let registry = system.registry();

    // Domain re-check on everything the solve produced. Guards against a
    // numeric path landing outside the declared physical domain.
    for (name, &value) in &outcome.values {
        if let Some(var) = registry.get(name) {
            if !var.domain.admits(value) {
                findings.push(Finding::error(
                    FindingKind::DomainViolation,
                    format!("{name} = {value} violates its domain {:?}", var.domain),
                    vec![name.clone()],
                ));
            }
        }
    }

    // Mass conservation across the streams feeding the chamber
    if let Some(total) = outcome.value("total_mass_flow_rate") {
        let streams: Vec<(&str, f64)> = outcome
            .values
            .iter()
            .filter(|(name, _)| {
                name.ends_with("_mass_flow_rate") && *name != "total_mass_flow_rate"
            })
            .map(|(name, &v)| (name.as_str(), v))
            .collect();
        if !streams.is_empty() {
            let inflow: f64 = streams.iter().map(|(_, v)| v).sum();
            if (total - inflow).abs() > MASS_CLOSURE_REL * total.abs().max(inflow.abs()) {
                let mut subjects = vec!["total_mass_flow_rate".to_string()];
                subjects.extend(streams.iter().map(|(name, _)| name.to_string()));
                findings.push(Finding::error(
                    FindingKind::ConservationViolation,
                    format!(
                        "stream inflow {inflow} kg/s does not close against total {total} kg/s"
                    ),
                    subjects,
                ));
            }
        }
    }

    plausibility(outcome, total_mass, &mut findings);
    findings
}

/// Advisory engineering ranges, after the original design checklist.
fn plausibility(outcome: &SolveOutcome, total_mass: Option<f64>, findings: &mut Vec<Finding>) {
    let mut range = |name: &str, lo: f64, hi: f64, what: &str| {
        if let Some(v) = outcome.value(name) {
            if !(lo..=hi).contains(&v) {
                findings.push(Finding::warning(
                    format!("{what} {v} outside plausible range [{lo}, {hi}]"),
                    vec![name.to_string()],
                ));
            }
        }
    };

    range("specific_impulse", 300.0, 450.0, "specific impulse (s)");
    range("chamber_pressure", 1e6, 20e6, "chamber pressure (Pa)");
    range("expansion_ratio", 10.0, 100.0, "expansion ratio");

    // O/F ratio for the conventional stream pair
    if let (Some(fuel), Some(oxidizer)) = (
        outcome.value("fuel_mass_flow_rate"),
        outcome.value("oxidizer_mass_flow_rate"),
    ) {
        if fuel > 0.0 {
            let of = oxidizer / fuel;
            if !(4.0..=8.0).contains(&of) {
                findings.push(Finding::warning(
                    format!("O/F ratio {of:.2} outside plausible range [4, 8]"),
                    vec![
                        "fuel_mass_flow_rate".to_string(),
                        "oxidizer_mass_flow_rate".to_string(),
                    ],
                ));
            }
        }
    }

    // Pump discharge must reach the chamber
    if let Some(chamber) = outcome.value("chamber_pressure") {
        for stream in ["fuel", "oxidizer"] {
            if let (Some(tank), Some(gain)) = (
                outcome.value(&format!("{stream}_tank_pressure")),
                outcome.value(&format!("{stream}_pump_pressure_gain")),
            ) {
                if tank + gain < chamber {
                    findings.push(Finding::warning(
                        format!(
                            "{stream} pump discharge {} Pa below chamber pressure {chamber} Pa",
                            tank + gain
                        ),
                        vec![
                            format!("{stream}_tank_pressure"),
                            format!("{stream}_pump_pressure_gain"),
                            "chamber_pressure".to_string(),
                        ],
                    ));
                }
            }
        }
    }

    if let (Some(mass), Some(thrust)) = (total_mass, outcome.value("thrust")) {
        if mass > 0.0 && thrust / (mass * pf_core::G0_MPS2) <= 1.0 {
            findings.push(Finding::warning(
                format!("thrust-to-weight ratio below 1 for total mass {mass} kg"),
                vec!["thrust".to_string()],
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_solver::Classification;
    use pf_system::{Domain, VarSpec};
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
    fn flags_domain_violation_as_error() {
        let mut sys = ConstraintSystem::new();
        sys.declare("x", VarSpec::unknown().in_domain(Domain::Positive))
            .unwrap();
        let findings = validate(&sys, &outcome(&[("x", -1.0)]), None);
        assert!(has_errors(&findings));
        assert_eq!(findings[0].kind, FindingKind::DomainViolation);
    }

    #[test]
    fn flags_open_mass_balance() {
        let sys = ConstraintSystem::new();
        let out = outcome(&[
            ("total_mass_flow_rate", 8.4),
            ("fuel_mass_flow_rate", 1.2),
            ("oxidizer_mass_flow_rate", 6.0),
        ]);
        let findings = validate(&sys, &out, None);
        assert!(findings
            .iter()
            .any(|f| f.kind == FindingKind::ConservationViolation));
    }

    #[test]
    fn closed_mass_balance_passes() {
        let sys = ConstraintSystem::new();
        let out = outcome(&[
            ("total_mass_flow_rate", 8.4),
            ("fuel_mass_flow_rate", 1.2),
            ("oxidizer_mass_flow_rate", 7.2),
        ]);
        let findings = validate(&sys, &out, None);
        assert!(!has_errors(&findings));
    }

    #[test]
    fn implausible_isp_is_a_warning_not_an_error() {
        let sys = ConstraintSystem::new();
        let findings = validate(&sys, &outcome(&[("specific_impulse", 800.0)]), None);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
    }
}
