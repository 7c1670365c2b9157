//! Operator overloads so equations can be written like the physics.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use std::ops::{Add, Div, Mul, Neg, Sub};

macro_rules! binary_impl {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait<Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                Expr::Binary($op, Box::new(self), Box::new(rhs))
            }
        }

        impl $trait<f64> for Expr {
            type Output = Expr;
            fn $method(self, rhs: f64) -> Expr {
                Expr::Binary($op, Box::new(self), Box::new(Expr::Const(rhs)))
            }
        }

        impl $trait<Expr> for f64 {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                Expr::Binary($op, Box::new(Expr::Const(self)), Box::new(rhs))
            }
        }
    };
}

binary_impl!(Add, add, BinaryOp::Add);
binary_impl!(Sub, sub, BinaryOp::Sub);
binary_impl!(Mul, mul, BinaryOp::Mul);
binary_impl!(Div, div, BinaryOp::Div);

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::Unary(UnaryOp::Neg, Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::Id;

    #[test]
    fn mixed_arithmetic_builds_expected_tree() {
        let x = Expr::var(Id::from_index(0));
        let e = 2.0 * x.clone() + 1.0;
        let direct = Expr::Binary(
            BinaryOp::Add,
            Box::new(Expr::Binary(
                BinaryOp::Mul,
                Box::new(Expr::Const(2.0)),
                Box::new(x),
            )),
            Box::new(Expr::Const(1.0)),
        );
        assert_eq!(e, direct);
    }

    #[test]
    fn negation() {
        let x = Expr::var(Id::from_index(0));
        assert_eq!(-x.clone(), Expr::Unary(UnaryOp::Neg, Box::new(x)));
    }
}
