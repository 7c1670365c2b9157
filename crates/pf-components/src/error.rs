//! Component error types.

use pf_system::SystemError;
use thiserror::Error;

/// Errors from component construction and contribution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    /// A constructor or builder argument is physically invalid.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    /// Declaration or equation registration failed.
    #[error(transparent)]
    System(#[from] SystemError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;
