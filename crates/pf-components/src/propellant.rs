//! Propellant property records.

use pf_core::R_UNIVERSAL;
use std::fmt;
use std::str::FromStr;

/// Cryogenic and storable propellants with tabulated properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Propellant {
    /// Liquid oxygen.
    Lox,
    /// Liquid hydrogen.
    Lh2,
    /// Liquid methane.
    Methane,
}

/// Plain property record for one propellant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropellantProps {
    /// Molar mass in kg/kmol.
    pub molar_mass: f64,
    /// Liquid density in kg/m^3.
    pub density: f64,
    /// Specific heat in J/(kg K).
    pub specific_heat: f64,
    /// Boiling point at 1 atm in K.
    pub boiling_point: f64,
    /// Adiabatic combustion temperature in K.
    pub combustion_temperature: f64,
}

impl Propellant {
    pub fn props(&self) -> PropellantProps {
        match self {
            Propellant::Lox => PropellantProps {
                molar_mass: 32.0,
                density: 1141.0,
                specific_heat: 1700.0,
                boiling_point: 90.19,
                combustion_temperature: 3500.0,
            },
            Propellant::Lh2 => PropellantProps {
                molar_mass: 2.016,
                density: 70.8,
                specific_heat: 14300.0,
                boiling_point: 20.28,
                combustion_temperature: 3500.0,
            },
            Propellant::Methane => PropellantProps {
                molar_mass: 16.04,
                density: 422.8,
                specific_heat: 2200.0,
                boiling_point: 111.65,
                combustion_temperature: 3500.0,
            },
        }
    }

    /// Specific gas constant in J/(kg K).
    pub fn gas_constant(&self) -> f64 {
        R_UNIVERSAL / self.props().molar_mass
    }
}

impl fmt::Display for Propellant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Propellant::Lox => "LOX",
            Propellant::Lh2 => "LH2",
            Propellant::Methane => "Methane",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Propellant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lox" | "oxygen" | "o2" => Ok(Propellant::Lox),
            "lh2" | "hydrogen" | "h2" => Ok(Propellant::Lh2),
            "methane" | "ch4" => Ok(Propellant::Methane),
            other => Err(format!("unknown propellant '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_lookup() {
        let lh2 = Propellant::Lh2.props();
        assert_eq!(lh2.molar_mass, 2.016);
        assert_eq!(lh2.density, 70.8);
        assert_eq!(Propellant::Lox.props().density, 1141.0);
    }

    #[test]
    fn gas_constant_from_molar_mass() {
        // R for LOX = 8314.5 / 32
        assert!((Propellant::Lox.gas_constant() - 259.828).abs() < 1e-2);
    }

    #[test]
    fn parse_round_trip() {
        for p in [Propellant::Lox, Propellant::Lh2, Propellant::Methane] {
            assert_eq!(p.to_string().parse::<Propellant>().unwrap(), p);
        }
        assert!("kerosene".parse::<Propellant>().is_err());
    }
}
