//! Human-readable system summary.

use crate::validate::{Finding, Severity};
use pf_solver::SolveOutcome;
use std::fmt::Write;

/// Render a summary of the solved system and its validation findings.
pub(crate) fn render(
    outcome: &SolveOutcome,
    findings: &[Finding],
    total_mass: Option<f64>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== PROPULSION SYSTEM SUMMARY ===");
    let _ = writeln!(out, "Result: {:?}", outcome.classification);

    let mut line = |label: &str, name: &str, scale: f64, unit: &str| {
        if let Some(v) = outcome.value(name) {
            let _ = writeln!(out, "{label}: {:.2} {unit}", v * scale);
        }
    };
    line("Thrust", "thrust", 1.0, "N");
    line("Specific impulse", "specific_impulse", 1.0, "s");
    line("Exit velocity", "exit_velocity", 1.0, "m/s");
    line("Chamber pressure", "chamber_pressure", 1e-6, "MPa");
    line("Mass flow rate", "total_mass_flow_rate", 1.0, "kg/s");
    line("Fuel flow", "fuel_mass_flow_rate", 1.0, "kg/s");
    line("Oxidizer flow", "oxidizer_mass_flow_rate", 1.0, "kg/s");
    line("Fuel pump power", "fuel_pump_power", 1e-3, "kW");
    line("Oxidizer pump power", "oxidizer_pump_power", 1e-3, "kW");

    if let Some(mass) = total_mass {
        let _ = writeln!(out, "Total mass: {mass:.1} kg");
    }

    let _ = writeln!(out, "--- validation ---");
    if findings.is_empty() {
        let _ = writeln!(out, "all checks passed");
    }
    for finding in findings {
        let tag = match finding.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "warn",
        };
        let _ = writeln!(out, "[{tag}] {}", finding.message);
    }
    out
}
