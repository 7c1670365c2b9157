//! Combustion chamber component.

use crate::error::{ComponentError, ComponentResult};
use crate::traits::{given_or_unknown, Component};
use pf_expr::Expr;
use pf_system::{ConstraintSystem, Domain, Equation, VarSpec};

/// The combustion chamber joining the fuel and oxidizer streams.
///
/// Contributes the mass balance
/// `total_mass_flow_rate = fuel + oxidizer`
/// and, when a mixture ratio is given,
/// `oxidizer = mixture_ratio * fuel`.
#[derive(Debug, Clone)]
pub struct Chamber {
    name: String,
    fuel_stream: String,
    oxidizer_stream: String,
    pressure: Option<f64>,
    temperature: Option<f64>,
    mixture_ratio: Option<f64>,
    products_molar_mass: Option<f64>,
    throat_area: Option<f64>,
    total_mass_flow_rate: Option<f64>,
    mass: Option<f64>,
}

impl Chamber {
    pub fn new() -> Self {
        Self {
            name: "chamber".into(),
            fuel_stream: "fuel".into(),
            oxidizer_stream: "oxidizer".into(),
            pressure: None,
            temperature: None,
            mixture_ratio: None,
            products_molar_mass: None,
            throat_area: None,
            total_mass_flow_rate: None,
            mass: None,
        }
    }

    /// Rename the inflow streams (defaults are `fuel` and `oxidizer`).
    pub fn with_streams(
        mut self,
        fuel: impl Into<String>,
        oxidizer: impl Into<String>,
    ) -> Self {
        self.fuel_stream = fuel.into();
        self.oxidizer_stream = oxidizer.into();
        self
    }

    /// Chamber stagnation pressure in Pa.
    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }

    /// Chamber stagnation temperature in K.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Oxidizer-to-fuel mass ratio.
    pub fn with_mixture_ratio(mut self, ratio: f64) -> Self {
        self.mixture_ratio = Some(ratio);
        self
    }

    /// Mean molar mass of the combustion products in kg/kmol.
    pub fn with_products_molar_mass(mut self, molar_mass: f64) -> Self {
        self.products_molar_mass = Some(molar_mass);
        self
    }

    /// Throat area in m^2.
    pub fn with_throat_area(mut self, area: f64) -> Self {
        self.throat_area = Some(area);
        self
    }

    /// Pin the total inflow in kg/s.
    pub fn with_total_mass_flow_rate(mut self, mdot: f64) -> Self {
        self.total_mass_flow_rate = Some(mdot);
        self
    }

    /// Dry mass in kg.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }
}

impl Default for Chamber {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Chamber {
    fn name(&self) -> &str {
        &self.name
    }

    fn mass(&self) -> Option<f64> {
        self.mass
    }

    fn contribute(&self, system: &mut ConstraintSystem) -> ComponentResult<()> {
        if let Some(mr) = self.mixture_ratio {
            if mr <= 0.0 {
                return Err(ComponentError::InvalidArg {
                    what: format!("mixture ratio {mr} must be positive"),
                });
            }
        }

        system.declare(
            "chamber_pressure",
            given_or_unknown(self.pressure)
                .in_domain(Domain::Positive)
                .with_unit("Pa"),
        )?;
        system.declare(
            "chamber_temperature",
            given_or_unknown(self.temperature)
                .in_domain(Domain::Positive)
                .with_unit("K"),
        )?;
        system.declare(
            "products_molar_mass",
            given_or_unknown(self.products_molar_mass)
                .in_domain(Domain::Positive)
                .with_unit("kg/kmol"),
        )?;
        system.declare(
            "throat_area",
            given_or_unknown(self.throat_area)
                .in_domain(Domain::Positive)
                .with_unit("m^2"),
        )?;
        let total = system.declare(
            "total_mass_flow_rate",
            given_or_unknown(self.total_mass_flow_rate)
                .in_domain(Domain::Positive)
                .with_unit("kg/s"),
        )?;
        let fuel = system.declare(
            format!("{}_mass_flow_rate", self.fuel_stream),
            VarSpec::unknown()
                .in_domain(Domain::Positive)
                .with_unit("kg/s"),
        )?;
        let oxidizer = system.declare(
            format!("{}_mass_flow_rate", self.oxidizer_stream),
            VarSpec::unknown()
                .in_domain(Domain::Positive)
                .with_unit("kg/s"),
        )?;

        system.add_equation(
            Equation::new(
                "chamber_mass_balance",
                Expr::var(total),
                Expr::var(fuel) + Expr::var(oxidizer),
            )
            .from_source(self.name.clone()),
        )?;
        if let Some(mr) = self.mixture_ratio {
            system.add_equation(
                Equation::new(
                    "chamber_mixture_ratio",
                    Expr::var(oxidizer),
                    Expr::var(fuel) * mr,
                )
                .from_source(self.name.clone()),
            )?;
        }
        Ok(())
    }
}
