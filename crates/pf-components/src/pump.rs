//! Turbopump component.

use crate::error::{ComponentError, ComponentResult};
use crate::traits::{given_or_unknown, Component};
use pf_expr::Expr;
use pf_system::{ConstraintSystem, Domain, Equation, VarSpec};

/// A pump raising one stream from tank pressure to feed pressure.
///
/// Contributes two equations: the shaft power balance
/// `power * density * efficiency = pressure_gain * mass_flow_rate`
/// and the feed line chain
/// `chamber_pressure = tank_pressure + pressure_gain - feed_loss`.
#[derive(Debug, Clone)]
pub struct Pump {
    name: String,
    stream: String,
    pressure_gain: Option<f64>,
    efficiency: Option<f64>,
    mass_flow_rate: Option<f64>,
    feed_loss: f64,
    mass: Option<f64>,
}

impl Pump {
    pub fn new(stream: impl Into<String>) -> Self {
        let stream = stream.into();
        Self {
            name: format!("{stream}_pump"),
            stream,
            pressure_gain: None,
            efficiency: None,
            mass_flow_rate: None,
            feed_loss: 0.0,
            mass: None,
        }
    }

    /// Pressure rise across the pump in Pa.
    pub fn with_pressure_gain(mut self, gain: f64) -> Self {
        self.pressure_gain = Some(gain);
        self
    }

    /// Isentropic efficiency, in (0, 1].
    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = Some(efficiency);
        self
    }

    /// Pin the stream's mass flow rate in kg/s.
    pub fn with_mass_flow_rate(mut self, mdot: f64) -> Self {
        self.mass_flow_rate = Some(mdot);
        self
    }

    /// Feed line pressure loss between pump discharge and chamber, Pa.
    pub fn with_feed_loss(mut self, loss: f64) -> Self {
        self.feed_loss = loss;
        self
    }

    /// Dry mass in kg.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }
}

impl Component for Pump {
    fn name(&self) -> &str {
        &self.name
    }

    fn mass(&self) -> Option<f64> {
        self.mass
    }

    fn contribute(&self, system: &mut ConstraintSystem) -> ComponentResult<()> {
        if let Some(eta) = self.efficiency {
            if !(eta > 0.0 && eta <= 1.0) {
                return Err(ComponentError::InvalidArg {
                    what: format!("pump efficiency {eta} must lie in (0, 1]"),
                });
            }
        }
        if self.feed_loss < 0.0 {
            return Err(ComponentError::InvalidArg {
                what: format!("feed loss {} must be non-negative", self.feed_loss),
            });
        }

        let stream = &self.stream;
        let gain = system.declare(
            format!("{stream}_pump_pressure_gain"),
            given_or_unknown(self.pressure_gain)
                .in_domain(Domain::Positive)
                .with_unit("Pa"),
        )?;
        let eta = system.declare(
            format!("{stream}_pump_efficiency"),
            given_or_unknown(self.efficiency).in_domain(Domain::Range { lo: 0.0, hi: 1.0 }),
        )?;
        let mdot = system.declare(
            format!("{stream}_mass_flow_rate"),
            given_or_unknown(self.mass_flow_rate)
                .in_domain(Domain::Positive)
                .with_unit("kg/s"),
        )?;
        let rho = system.declare(
            format!("{stream}_density"),
            VarSpec::unknown()
                .in_domain(Domain::Positive)
                .with_unit("kg/m^3"),
        )?;
        let power = system.declare(
            format!("{stream}_pump_power"),
            VarSpec::unknown()
                .in_domain(Domain::Positive)
                .with_unit("W"),
        )?;
        let tank_p = system.declare(
            format!("{stream}_tank_pressure"),
            VarSpec::unknown()
                .in_domain(Domain::Positive)
                .with_unit("Pa"),
        )?;
        let chamber_p = system.declare(
            "chamber_pressure",
            VarSpec::unknown()
                .in_domain(Domain::Positive)
                .with_unit("Pa"),
        )?;

        // P = dp * (mdot / rho) / eta, written multiplied out so the
        // residual stays polynomial in every unknown
        system.add_equation(
            Equation::new(
                format!("{stream}_pump_power_balance"),
                Expr::var(power) * Expr::var(rho) * Expr::var(eta),
                Expr::var(gain) * Expr::var(mdot),
            )
            .from_source(self.name.clone()),
        )?;
        system.add_equation(
            Equation::new(
                format!("{stream}_feed_line"),
                Expr::var(chamber_p),
                Expr::var(tank_p) + Expr::var(gain) - self.feed_loss,
            )
            .from_source(self.name.clone()),
        )?;
        Ok(())
    }
}
