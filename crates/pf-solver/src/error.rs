//! Solver error types.
//!
//! Only structural and numeric faults surface as `Err`; an unsolvable but
//! well-formed system is reported through [`crate::SolveOutcome`] instead.

use pf_system::SystemError;
use thiserror::Error;

/// Errors from the constraint solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// An equation references a variable the registry does not know.
    #[error("Structural error in equation '{equation}': {what}")]
    Structural { equation: String, what: String },

    /// A numeric operation failed (singular Jacobian, non-finite value).
    #[error("Numeric error: {what}")]
    Numeric { what: String },

    /// Newton iteration exhausted its budget without converging.
    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    /// Error propagated from the system layer.
    #[error(transparent)]
    System(#[from] SystemError),
}

pub type SolveResult<T> = Result<T, SolveError>;
