//! Engine error types.

use pf_components::ComponentError;
use pf_solver::SolveError;
use pf_system::SystemError;
use thiserror::Error;

/// Errors from assembly, solving and metric queries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A metric query needs a variable the solve did not resolve.
    #[error("Missing input for {metric}: variable '{variable}' was not resolved")]
    MissingInput { metric: String, variable: String },

    /// A component failed to contribute during assembly.
    #[error(transparent)]
    Component(#[from] ComponentError),

    /// Declaration failed during assembly.
    #[error(transparent)]
    System(#[from] SystemError),

    /// The solver hit a structural fault.
    #[error(transparent)]
    Solve(#[from] SolveError),
}

pub type EngineResult<T> = Result<T, EngineError>;
