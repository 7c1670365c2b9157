//! pf-expr: the symbolic expression tree for the constraint engine.
//!
//! The grammar is deliberately small and fixed: arithmetic, powers,
//! exp/log, square root and trigonometry. Enough for isentropic flow
//! relations without pulling in a computer-algebra system.
//!
//! Provides:
//! - `Expr` AST (constant, variable reference, unary op, binary op)
//! - operator-overloaded construction so equations read like the physics
//! - evaluation against a value lookup
//! - constant-folding substitution (the solver's substitution pass)
//! - symbolic differentiation with respect to one variable
//!
//! # Example
//!
//! ```
//! use pf_expr::Expr;
//! use pf_core::VarId;
//!
//! let x = Expr::var(VarId::from_index(0));
//! // x^2 - 4
//! let e = x.clone() * x - 4.0;
//! let v = e.eval(&|_| Some(3.0)).unwrap();
//! assert_eq!(v, 5.0);
//! ```

pub mod ast;
pub mod calculus;
pub mod eval;
pub mod ops;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use calculus::{classify_polynomial, Polynomial};
pub use eval::{EvalError, EvalResult};
