//! The component contract.

use crate::error::ComponentResult;
use pf_system::{ConstraintSystem, VarSpec};

/// A physical sub-unit that contributes variables and equations to a
/// shared constraint system.
///
/// Components couple by declaring the same variable name: a tank and a
/// pump both declaring `fuel_mass_flow_rate` end up constraining one
/// shared unknown. Contribution must be idempotent: calling it twice on
/// the same system re-declares identical variables (a merge no-op) and
/// adds redundant equations the solver tolerates.
pub trait Component: Send + Sync {
    /// Diagnostic name, also used to tag contributed equations.
    fn name(&self) -> &str;

    /// Dry mass of the hardware, if specified.
    fn mass(&self) -> Option<f64> {
        None
    }

    /// Declare variables and equations into the shared system.
    fn contribute(&self, system: &mut ConstraintSystem) -> ComponentResult<()>;
}

/// A known value when the caller supplied one, otherwise an unknown for
/// the solver.
pub(crate) fn given_or_unknown(value: Option<f64>) -> VarSpec {
    match value {
        Some(v) => VarSpec::known(v),
        None => VarSpec::unknown(),
    }
}
