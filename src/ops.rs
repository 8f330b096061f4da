//! Operator sugar for building formulas.
//!
//! Arithmetic operators build integer terms and the bitwise operators build
//! boolean connectives:
//!
//! ```
//! use cornersat::formula::Formula;
//!
//! let x = Formula::var("x");
//! let y = Formula::var("y");
//! let f = Formula::ge(x.clone() * 2 - y, Formula::int(0)) & !Formula::eq(x, Formula::int(3));
//! assert_eq!(f.to_string(), "(and (>= (- (* x 2) y) 0) (not (= x 3)))");
//! ```

use std::ops::{Add, BitAnd, BitOr, Mul, Neg, Not, Sub};

use crate::formula::Formula;

impl<T: Into<Formula>> Add<T> for Formula {
    type Output = Formula;

    fn add(self, rhs: T) -> Self::Output {
        Formula::add(self, rhs.into())
    }
}

impl<T: Into<Formula>> Sub<T> for Formula {
    type Output = Formula;

    fn sub(self, rhs: T) -> Self::Output {
        Formula::sub(self, rhs.into())
    }
}

impl<T: Into<Formula>> Mul<T> for Formula {
    type Output = Formula;

    fn mul(self, rhs: T) -> Self::Output {
        Formula::mul(self, rhs.into())
    }
}

impl Neg for Formula {
    type Output = Formula;

    fn neg(self) -> Self::Output {
        Formula::neg(self)
    }
}

impl<T: Into<Formula>> BitAnd<T> for Formula {
    type Output = Formula;

    fn bitand(self, rhs: T) -> Self::Output {
        Formula::and(self, rhs.into())
    }
}

impl<T: Into<Formula>> BitOr<T> for Formula {
    type Output = Formula;

    fn bitor(self, rhs: T) -> Self::Output {
        Formula::or(self, rhs.into())
    }
}

impl Not for Formula {
    type Output = Formula;

    fn not(self) -> Self::Output {
        Formula::not(self)
    }
}
