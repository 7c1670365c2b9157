//! Propellant tank component.

use crate::error::ComponentResult;
use crate::propellant::Propellant;
use crate::traits::{given_or_unknown, Component};
use pf_system::{ConstraintSystem, Domain, VarSpec};

/// A propellant tank feeding one stream.
///
/// Declares the stream's tank pressure, fluid density and mass flow rate.
/// The flow rate is left unknown unless some other component on the
/// stream pins it; the density comes from the propellant record.
#[derive(Debug, Clone)]
pub struct Tank {
    name: String,
    stream: String,
    propellant: Propellant,
    pressure: Option<f64>,
    volume: Option<f64>,
    mass: Option<f64>,
}

impl Tank {
    pub fn new(stream: impl Into<String>, propellant: Propellant) -> Self {
        let stream = stream.into();
        Self {
            name: format!("{stream}_tank"),
            stream,
            propellant,
            pressure: None,
            volume: None,
            mass: None,
        }
    }

    /// Ullage pressure in Pa.
    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }

    /// Tank volume in m^3. Advisory; not constrained.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Dry mass in kg.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn volume(&self) -> Option<f64> {
        self.volume
    }
}

impl Component for Tank {
    fn name(&self) -> &str {
        &self.name
    }

    fn mass(&self) -> Option<f64> {
        self.mass
    }

    fn contribute(&self, system: &mut ConstraintSystem) -> ComponentResult<()> {
        let stream = &self.stream;
        system.declare(
            format!("{stream}_tank_pressure"),
            given_or_unknown(self.pressure)
                .in_domain(Domain::Positive)
                .with_unit("Pa"),
        )?;
        system.declare(
            format!("{stream}_density"),
            VarSpec::known(self.propellant.props().density)
                .in_domain(Domain::Positive)
                .with_unit("kg/m^3"),
        )?;
        system.declare(
            format!("{stream}_mass_flow_rate"),
            VarSpec::unknown()
                .in_domain(Domain::Positive)
                .with_unit("kg/s"),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_pressure_and_flow() {
        let mut sys = ConstraintSystem::new();
        Tank::new("fuel", Propellant::Lh2)
            .with_pressure(2e6)
            .contribute(&mut sys)
            .unwrap();
        assert_eq!(sys.registry().value("fuel_tank_pressure"), Some(2e6));
        assert_eq!(sys.registry().value("fuel_density"), Some(70.8));
        assert!(sys.registry().value("fuel_mass_flow_rate").is_none());
    }

    #[test]
    fn unpressurized_tank_leaves_pressure_unknown() {
        let mut sys = ConstraintSystem::new();
        Tank::new("oxidizer", Propellant::Lox)
            .contribute(&mut sys)
            .unwrap();
        let var = sys.registry().get("oxidizer_tank_pressure").unwrap();
        assert!(var.value.is_none());
        assert_eq!(var.domain, Domain::Positive);
    }
}
