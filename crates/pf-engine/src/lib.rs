//! Propulsion system engine: facade, metrics, validation.
//!
//! Contents:
//! - [`PropulsionSystem`]: owns components, assembles and solves lazily
//! - [`Metrics`]: derived performance values from a solve outcome
//! - [`validate`]: post-solve domain and plausibility checks
//!
//! The facade caches one solve per configuration; adding a component or
//! changing the thrust target rebuilds the constraint system from
//! scratch on the next query.

mod error;
mod metrics;
mod summary;
mod system;
mod validate;

pub use error::{EngineError, EngineResult};
pub use metrics::Metrics;
pub use system::{PropulsionSystem, Solution};
pub use validate::{has_errors, validate, Finding, FindingKind, Severity};
