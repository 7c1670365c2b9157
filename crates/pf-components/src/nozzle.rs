//! Converging-diverging nozzle component.
//!
//! Carries the isentropic flow relations, which are where the solver's
//! branch selection earns its keep: the area-ratio equation has a
//! subsonic and a supersonic exit-pressure root, and the flow regime flag
//! decides between them.

use crate::error::{ComponentError, ComponentResult};
use crate::traits::{given_or_unknown, Component};
use pf_core::{G0_MPS2, P_ATM_PA, R_UNIVERSAL};
use pf_expr::Expr;
use pf_system::{BranchPolicy, ConstraintSystem, Domain, Equation, VarSpec};

/// Intended flow regime at the nozzle exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRegime {
    /// Fully expanded supersonic flow; the low-pressure root.
    Supersonic,
    /// Subsonic (vented) flow; the high-pressure root.
    Subsonic,
}

/// A nozzle expanding chamber gas to the exit plane.
///
/// Contributes the area-ratio relation, the isentropic exit velocity,
/// the exit area, the thrust equation and the specific impulse
/// definition.
#[derive(Debug, Clone)]
pub struct Nozzle {
    name: String,
    expansion_ratio: Option<f64>,
    throat_area: Option<f64>,
    exit_area: Option<f64>,
    gamma: f64,
    ambient_pressure: f64,
    regime: Option<FlowRegime>,
    mass: Option<f64>,
}

impl Nozzle {
    pub fn new() -> Self {
        Self {
            name: "nozzle".into(),
            expansion_ratio: None,
            throat_area: None,
            exit_area: None,
            gamma: 1.2,
            ambient_pressure: P_ATM_PA,
            regime: None,
            mass: None,
        }
    }

    /// Exit-to-throat area ratio.
    pub fn with_expansion_ratio(mut self, ratio: f64) -> Self {
        self.expansion_ratio = Some(ratio);
        self
    }

    /// Throat area in m^2.
    pub fn with_throat_area(mut self, area: f64) -> Self {
        self.throat_area = Some(area);
        self
    }

    /// Exit area in m^2.
    pub fn with_exit_area(mut self, area: f64) -> Self {
        self.exit_area = Some(area);
        self
    }

    /// Ratio of specific heats of the expanding gas. Defaults to 1.2,
    /// typical for hot combustion products.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Back pressure at the exit plane in Pa. Defaults to one atmosphere.
    pub fn with_ambient_pressure(mut self, pressure: f64) -> Self {
        self.ambient_pressure = pressure;
        self
    }

    /// Declare the intended exit flow regime, disambiguating the
    /// area-ratio equation's two roots.
    pub fn with_regime(mut self, regime: FlowRegime) -> Self {
        self.regime = Some(regime);
        self
    }

    /// Dry mass in kg.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }
}

impl Default for Nozzle {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Nozzle {
    fn name(&self) -> &str {
        &self.name
    }

    fn mass(&self) -> Option<f64> {
        self.mass
    }

    fn contribute(&self, system: &mut ConstraintSystem) -> ComponentResult<()> {
        if self.gamma <= 1.0 {
            return Err(ComponentError::InvalidArg {
                what: format!("gamma {} must exceed 1", self.gamma),
            });
        }
        if self.ambient_pressure < 0.0 {
            return Err(ComponentError::InvalidArg {
                what: format!(
                    "ambient pressure {} must be non-negative",
                    self.ambient_pressure
                ),
            });
        }

        let g = self.gamma;

        let eps = system.declare(
            "expansion_ratio",
            given_or_unknown(self.expansion_ratio).in_domain(Domain::Positive),
        )?;
        let throat = system.declare(
            "throat_area",
            given_or_unknown(self.throat_area)
                .in_domain(Domain::Positive)
                .with_unit("m^2"),
        )?;
        let exit_area = system.declare(
            "exit_area",
            given_or_unknown(self.exit_area)
                .in_domain(Domain::Positive)
                .with_unit("m^2"),
        )?;
        let mut exit_pressure_spec = VarSpec::unknown()
            .in_domain(Domain::Positive)
            .with_unit("Pa");
        if let Some(regime) = self.regime {
            exit_pressure_spec = exit_pressure_spec.with_branch(match regime {
                FlowRegime::Supersonic => BranchPolicy::PreferSmallest,
                FlowRegime::Subsonic => BranchPolicy::PreferLargest,
            });
        }
        let exit_p = system.declare("exit_pressure", exit_pressure_spec)?;
        let exit_v = system.declare(
            "exit_velocity",
            VarSpec::unknown()
                .in_domain(Domain::Positive)
                .with_unit("m/s"),
        )?;
        let thrust = system.declare(
            "thrust",
            VarSpec::unknown()
                .in_domain(Domain::Positive)
                .with_unit("N"),
        )?;
        let isp = system.declare(
            "specific_impulse",
            VarSpec::unknown().in_domain(Domain::Positive).with_unit("s"),
        )?;
        let chamber_p = system.declare(
            "chamber_pressure",
            VarSpec::unknown()
                .in_domain(Domain::Positive)
                .with_unit("Pa"),
        )?;
        let chamber_t = system.declare(
            "chamber_temperature",
            VarSpec::unknown()
                .in_domain(Domain::Positive)
                .with_unit("K"),
        )?;
        let molar_mass = system.declare(
            "products_molar_mass",
            VarSpec::unknown()
                .in_domain(Domain::Positive)
                .with_unit("kg/kmol"),
        )?;
        let total_mdot = system.declare(
            "total_mass_flow_rate",
            VarSpec::unknown()
                .in_domain(Domain::Positive)
                .with_unit("kg/s"),
        )?;

        let ratio = || Expr::var(exit_p) / Expr::var(chamber_p);

        // Area-ratio relation, inverted so the left side is constant:
        //   1 = eps * ((g+1)/2)^(1/(g-1)) * r^(1/g)
        //         * sqrt((g+1)/(g-1) * (1 - r^((g-1)/g)))
        let c = ((g + 1.0) / 2.0).powf(1.0 / (g - 1.0));
        let k = (g + 1.0) / (g - 1.0);
        system.add_equation(
            Equation::new(
                "nozzle_area_ratio",
                Expr::lit(1.0),
                Expr::var(eps)
                    * c
                    * ratio().pow(1.0 / g)
                    * (k * (1.0 - ratio().pow((g - 1.0) / g))).sqrt(),
            )
            .from_source(self.name.clone()),
        )?;

        system.add_equation(
            Equation::new(
                "nozzle_exit_area",
                Expr::var(exit_area),
                Expr::var(eps) * Expr::var(throat),
            )
            .from_source(self.name.clone()),
        )?;

        // Isentropic exit velocity, squared to keep the residual
        // polynomial in the exit velocity:
        //   v^2 = 2 g R / (g-1) * Tc * (1 - r^((g-1)/g)),  R = Ru / M
        system.add_equation(
            Equation::new(
                "nozzle_exit_velocity",
                Expr::var(exit_v).pow(2.0),
                Expr::lit(2.0 * g * R_UNIVERSAL / (g - 1.0)) / Expr::var(molar_mass)
                    * Expr::var(chamber_t)
                    * (1.0 - ratio().pow((g - 1.0) / g)),
            )
            .from_source(self.name.clone()),
        )?;

        // Momentum thrust plus the pressure term at the exit plane
        system.add_equation(
            Equation::new(
                "nozzle_thrust",
                Expr::var(thrust),
                Expr::var(total_mdot) * Expr::var(exit_v)
                    + (Expr::var(exit_p) - self.ambient_pressure) * Expr::var(exit_area),
            )
            .from_source(self.name.clone()),
        )?;

        system.add_equation(
            Equation::new(
                "nozzle_specific_impulse",
                Expr::var(isp) * G0_MPS2,
                Expr::var(exit_v),
            )
            .from_source(self.name.clone()),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contributes_five_equations() {
        let mut sys = ConstraintSystem::new();
        Nozzle::new()
            .with_expansion_ratio(25.0)
            .with_regime(FlowRegime::Supersonic)
            .contribute(&mut sys)
            .unwrap();
        assert_eq!(sys.store().len(), 5);
        let exit_p = sys.registry().get("exit_pressure").unwrap();
        assert_eq!(exit_p.branch, Some(BranchPolicy::PreferSmallest));
    }

    #[test]
    fn no_regime_leaves_branch_open() {
        let mut sys = ConstraintSystem::new();
        Nozzle::new().contribute(&mut sys).unwrap();
        assert_eq!(sys.registry().get("exit_pressure").unwrap().branch, None);
    }

    #[test]
    fn rejects_gamma_at_or_below_one() {
        let mut sys = ConstraintSystem::new();
        let err = Nozzle::new().with_gamma(1.0).contribute(&mut sys).unwrap_err();
        assert!(matches!(err, ComponentError::InvalidArg { .. }));
    }
}
