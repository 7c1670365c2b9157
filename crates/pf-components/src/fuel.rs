//! The propellant-properties component.

use crate::error::ComponentResult;
use crate::propellant::Propellant;
use crate::traits::Component;
use pf_system::{ConstraintSystem, Domain, VarSpec};

/// Declares the fluid properties of one propellant stream as known
/// variables, making them available to every component on that stream.
#[derive(Debug, Clone)]
pub struct Fuel {
    name: String,
    stream: String,
    propellant: Propellant,
}

impl Fuel {
    pub fn new(stream: impl Into<String>, propellant: Propellant) -> Self {
        let stream = stream.into();
        Self {
            name: format!("{stream}_propellant"),
            stream,
            propellant,
        }
    }

    pub fn propellant(&self) -> Propellant {
        self.propellant
    }
}

impl Component for Fuel {
    fn name(&self) -> &str {
        &self.name
    }

    fn contribute(&self, system: &mut ConstraintSystem) -> ComponentResult<()> {
        let props = self.propellant.props();
        let stream = &self.stream;
        system.declare(
            format!("{stream}_density"),
            VarSpec::known(props.density)
                .in_domain(Domain::Positive)
                .with_unit("kg/m^3"),
        )?;
        system.declare(
            format!("{stream}_molar_mass"),
            VarSpec::known(props.molar_mass)
                .in_domain(Domain::Positive)
                .with_unit("kg/kmol"),
        )?;
        system.declare(
            format!("{stream}_specific_heat"),
            VarSpec::known(props.specific_heat)
                .in_domain(Domain::Positive)
                .with_unit("J/(kg K)"),
        )?;
        system.declare(
            format!("{stream}_boiling_point"),
            VarSpec::known(props.boiling_point)
                .in_domain(Domain::Positive)
                .with_unit("K"),
        )?;
        Ok(())
    }
}
