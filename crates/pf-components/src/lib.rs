//! Component catalog for propulsion systems.
//!
//! Contents:
//! - [`Component`]: the contribution contract every variant implements
//! - [`Propellant`]: tabulated propellant property records
//! - [`Tank`], [`Pump`], [`Chamber`], [`Nozzle`], [`Fuel`]: the variants
//!
//! Components never own the constraint system; they declare variables
//! and equations into a shared one during assembly and are not consulted
//! again afterwards.

mod chamber;
mod error;
mod fuel;
mod nozzle;
mod propellant;
mod pump;
mod tank;
mod traits;

pub use chamber::Chamber;
pub use error::{ComponentError, ComponentResult};
pub use fuel::Fuel;
pub use nozzle::{FlowRegime, Nozzle};
pub use propellant::{Propellant, PropellantProps};
pub use pump::Pump;
pub use tank::Tank;
pub use traits::Component;
