//! Evaluation of ground formulas.
//!
//! Integer arithmetic is exact (arbitrary precision). `div` and `mod` follow
//! the SMT-LIB convention of Euclidean division: the remainder is always
//! non-negative. Division by zero is reported as an error rather than left
//! uninterpreted.
//!
//! Boolean connectives are evaluated lazily, left to right, so an error in an
//! operand that does not influence the result is not reported.

use std::fmt::{self, Display};

use num_bigint::BigInt;
use num_traits::{Euclid, Zero};

use crate::error::{SolverError, SolverResult, SortError};
use crate::formula::{BinOp, Formula, Sort, UnOp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(BigInt),
    Bool(bool),
}

impl Value {
    pub fn sort(&self) -> Sort {
        match self {
            Value::Int(_) => Sort::Int,
            Value::Bool(_) => Sort::Bool,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl Formula {
    /// Evaluates a ground formula.
    ///
    /// Fails with [`SolverError::NotGround`] on the first free variable reached.
    pub fn evaluate(&self) -> SolverResult<Value> {
        match self {
            Formula::Var(v) => Err(SolverError::NotGround(v.clone())),
            Formula::Int(n) => Ok(Value::Int(n.clone())),
            Formula::Bool(b) => Ok(Value::Bool(*b)),
            Formula::Unary(UnOp::Not, a) => Ok(Value::Bool(!a.eval_bool_in("not")?)),
            Formula::Unary(UnOp::Neg, a) => Ok(Value::Int(-a.eval_int_in("-")?)),
            Formula::Binary(op, a, b) => eval_binary(*op, a, b),
            Formula::Ite(c, t, e) => {
                if c.eval_bool_in("ite")? {
                    t.evaluate()
                } else {
                    e.evaluate()
                }
            }
        }
    }

    /// Evaluates a ground boolean formula.
    pub fn eval_bool(&self) -> SolverResult<bool> {
        self.eval_bool_in("assert")
    }

    fn eval_bool_in(&self, op: &'static str) -> SolverResult<bool> {
        match self.evaluate()? {
            Value::Bool(b) => Ok(b),
            Value::Int(_) => Err(mismatch(op, Sort::Bool, Sort::Int)),
        }
    }

    fn eval_int_in(&self, op: &'static str) -> SolverResult<BigInt> {
        match self.evaluate()? {
            Value::Int(n) => Ok(n),
            Value::Bool(_) => Err(mismatch(op, Sort::Int, Sort::Bool)),
        }
    }
}

fn mismatch(op: &'static str, expected: Sort, found: Sort) -> SolverError {
    SortError { op, expected, found }.into()
}

fn eval_binary(op: BinOp, a: &Formula, b: &Formula) -> SolverResult<Value> {
    let sym = op.symbol();
    let value = match op {
        BinOp::And => Value::Bool(a.eval_bool_in(sym)? && b.eval_bool_in(sym)?),
        BinOp::Or => Value::Bool(a.eval_bool_in(sym)? || b.eval_bool_in(sym)?),
        BinOp::Implies => Value::Bool(!a.eval_bool_in(sym)? || b.eval_bool_in(sym)?),
        BinOp::Iff => Value::Bool(a.eval_bool_in(sym)? == b.eval_bool_in(sym)?),
        _ => {
            let x = a.eval_int_in(sym)?;
            let y = b.eval_int_in(sym)?;
            match op {
                BinOp::Add => Value::Int(x + y),
                BinOp::Sub => Value::Int(x - y),
                BinOp::Mul => Value::Int(x * y),
                BinOp::Div | BinOp::Mod if y.is_zero() => return Err(SolverError::DivisionByZero),
                BinOp::Div => Value::Int(x.div_euclid(&y)),
                BinOp::Mod => Value::Int(x.rem_euclid(&y)),
                BinOp::Eq => Value::Bool(x == y),
                BinOp::Ne => Value::Bool(x != y),
                BinOp::Lt => Value::Bool(x < y),
                BinOp::Le => Value::Bool(x <= y),
                BinOp::Gt => Value::Bool(x > y),
                BinOp::Ge => Value::Bool(x >= y),
                BinOp::And | BinOp::Or | BinOp::Implies | BinOp::Iff => unreachable!(),
            }
        }
    };
    Ok(value)
}
