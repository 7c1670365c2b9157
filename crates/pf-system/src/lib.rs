//! pf-system: the shared variable/equation pool one system instance owns.
//!
//! Provides:
//! - `VariableRegistry`: canonical named unknowns/knowns, deduplicated by
//!   name, each with an optional value, a domain predicate and an advisory
//!   unit tag
//! - `EquationStore`: ordered, append-only collection of algebraic
//!   relations with a variable-incidence view for the solver
//! - `ConstraintSystem`: the aggregate the components write into and the
//!   solver consumes
//!
//! # Example
//!
//! ```
//! use pf_system::{ConstraintSystem, Equation, VarSpec, Domain};
//! use pf_expr::Expr;
//!
//! let mut sys = ConstraintSystem::new();
//! let x = sys.declare("x", VarSpec::unknown().in_domain(Domain::Positive)).unwrap();
//! let y = sys.declare("y", VarSpec::known(2.0)).unwrap();
//! sys.add_equation(Equation::new(
//!     "x doubles y",
//!     Expr::var(x),
//!     2.0 * Expr::var(y),
//! )).unwrap();
//! assert_eq!(sys.registry().len(), 2);
//! ```

pub mod equation;
pub mod error;
pub mod registry;
pub mod store;
pub mod system;
pub mod variable;

pub use equation::Equation;
pub use error::{SystemError, SystemResult};
pub use registry::VariableRegistry;
pub use store::EquationStore;
pub use system::ConstraintSystem;
pub use variable::{BranchPolicy, Domain, VarSpec, Variable};
