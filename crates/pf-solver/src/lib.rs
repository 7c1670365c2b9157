//! Constraint solver for assembled equation systems.
//!
//! The solve pipeline:
//! - `substitute`: fold supplied values into every equation
//! - `partition`: split the unknowns into independent clusters
//! - `scalar`: closed-form and scanned roots for single-unknown steps
//! - `newton`: damped Newton fallback for coupled clusters
//! - `solve`: orchestration, verification and outcome aggregation
//!
//! Structural faults come back as [`SolveError`]; a well-formed but
//! unsolvable system is described by [`SolveOutcome`] instead, naming the
//! free variables or conflicting equations involved.

mod error;
mod jacobian;
mod newton;
mod outcome;
mod partition;
mod scalar;
mod solve;
mod substitute;

pub use error::{SolveError, SolveResult};
pub use jacobian::finite_difference_jacobian;
pub use newton::{newton_solve, NewtonConfig, NewtonResult};
pub use outcome::{Classification, PartitionOutcome, PartitionReport, SolveOutcome};
pub use scalar::ScanConfig;
pub use solve::{solve, solve_and_commit, SolverConfig};
