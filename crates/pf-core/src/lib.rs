//! pf-core: stable foundation for propflow.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs for registry objects)
//! - constants (standard gravity, universal gas constant)
//! - error (shared error types)

pub mod constants;
pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use constants::*;
pub use error::{PfError, PfResult};
pub use ids::*;
pub use numeric::*;
