//! Error types for registry and store operations.

use pf_core::PfError;
use thiserror::Error;

/// Errors raised while assembling a constraint system.
///
/// All of these indicate an authoring bug in a component and abort the
/// system build; solve-time outcomes (underdetermined, infeasible) are
/// data, not errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SystemError {
    #[error("Variable `{name}` redeclared incompatibly: {reason}")]
    NameConflict { name: String, reason: String },

    #[error("Equation `{equation}` is structurally invalid: {what}")]
    StructuralError { equation: String, what: String },

    #[error("Unknown variable `{name}`")]
    UnknownVariable { name: String },

    #[error(transparent)]
    Core(#[from] PfError),
}

pub type SystemResult<T> = Result<T, SystemError>;
