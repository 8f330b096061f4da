//! Quantifier-free integer formulas.
//!
//! A [`Formula`] is an immutable expression tree over integer variables,
//! integer and boolean constants, and a fixed set of boolean, arithmetic and
//! comparison operators. The grammar is closed: every node is one of the
//! [`Formula`] variants, and traversals are plain recursive `match`es.
//!
//! Formulas are never mutated in place. Operations such as
//! [substitution][Formula::substitute] always build a new tree.
//!
//! # Examples
//!
//! ```
//! use cornersat::formula::Formula;
//!
//! let x = Formula::var("x");
//! let y = Formula::var("y");
//! let f = Formula::le(x + y, Formula::int(1));
//! assert_eq!(f.to_string(), "(<= (+ x y) 1)");
//! ```

use std::fmt::{self, Display};
use std::sync::Arc;

use num_bigint::BigInt;
use num_traits::Signed;

use crate::error::SortError;

/// Integer-sorted free variable, identified by its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(Arc<str>);

impl Var {
    pub fn new(name: impl AsRef<str>) -> Self {
        Var(Arc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Var {
    fn from(name: &str) -> Self {
        Var::new(name)
    }
}

/// Sort (type) of a formula.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Sort {
    Int,
    Bool,
}

impl Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Int => write!(f, "Int"),
            Sort::Bool => write!(f, "Bool"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UnOp {
    Not,
    Neg,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinOp {
    And,
    Or,
    Implies,
    Iff,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl UnOp {
    /// SMT-LIB symbol of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Not => "not",
            UnOp::Neg => "-",
        }
    }

    /// Operand sort, which is also the result sort.
    pub fn sort(self) -> Sort {
        match self {
            UnOp::Not => Sort::Bool,
            UnOp::Neg => Sort::Int,
        }
    }
}

impl BinOp {
    /// SMT-LIB symbol of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Implies => "=>",
            BinOp::Iff => "=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "div",
            BinOp::Mod => "mod",
            BinOp::Eq => "=",
            BinOp::Ne => "distinct",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
        }
    }

    /// Returns `(operand sort, result sort)`.
    pub fn signature(self) -> (Sort, Sort) {
        match self {
            BinOp::And | BinOp::Or | BinOp::Implies | BinOp::Iff => (Sort::Bool, Sort::Bool),
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => (Sort::Int, Sort::Int),
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => (Sort::Int, Sort::Bool),
        }
    }
}

/// Quantifier-free formula over integer variables.
///
/// Sorting, substitution, evaluation, display, cloning and dropping recurse
/// on the tree, so the nesting depth of a formula is bounded by the stack of
/// the thread working on it. Only variable extraction is iterative.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    Var(Var),
    Int(BigInt),
    Bool(bool),
    Unary(UnOp, Box<Formula>),
    Binary(BinOp, Box<Formula>, Box<Formula>),
    Ite(Box<Formula>, Box<Formula>, Box<Formula>),
}

impl Formula {
    pub fn var(name: impl AsRef<str>) -> Self {
        Formula::Var(Var::new(name))
    }

    pub fn int(value: impl Into<BigInt>) -> Self {
        Formula::Int(value.into())
    }

    pub fn bool(value: bool) -> Self {
        Formula::Bool(value)
    }

    pub fn tt() -> Self {
        Formula::Bool(true)
    }

    pub fn ff() -> Self {
        Formula::Bool(false)
    }

    pub fn not(value: Self) -> Self {
        match value {
            Formula::Unary(UnOp::Not, inner) => *inner,
            _ => Formula::Unary(UnOp::Not, Box::new(value)),
        }
    }

    pub fn neg(value: Self) -> Self {
        Formula::Unary(UnOp::Neg, Box::new(value))
    }

    pub fn binary(op: BinOp, lhs: Self, rhs: Self) -> Self {
        Formula::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn and(lhs: Self, rhs: Self) -> Self {
        Formula::binary(BinOp::And, lhs, rhs)
    }

    pub fn or(lhs: Self, rhs: Self) -> Self {
        Formula::binary(BinOp::Or, lhs, rhs)
    }

    pub fn implies(lhs: Self, rhs: Self) -> Self {
        Formula::binary(BinOp::Implies, lhs, rhs)
    }

    pub fn iff(lhs: Self, rhs: Self) -> Self {
        Formula::binary(BinOp::Iff, lhs, rhs)
    }

    pub fn add(lhs: Self, rhs: Self) -> Self {
        Formula::binary(BinOp::Add, lhs, rhs)
    }

    pub fn sub(lhs: Self, rhs: Self) -> Self {
        Formula::binary(BinOp::Sub, lhs, rhs)
    }

    pub fn mul(lhs: Self, rhs: Self) -> Self {
        Formula::binary(BinOp::Mul, lhs, rhs)
    }

    pub fn div(lhs: Self, rhs: Self) -> Self {
        Formula::binary(BinOp::Div, lhs, rhs)
    }

    pub fn modulo(lhs: Self, rhs: Self) -> Self {
        Formula::binary(BinOp::Mod, lhs, rhs)
    }

    pub fn eq(lhs: Self, rhs: Self) -> Self {
        Formula::binary(BinOp::Eq, lhs, rhs)
    }

    pub fn ne(lhs: Self, rhs: Self) -> Self {
        Formula::binary(BinOp::Ne, lhs, rhs)
    }

    pub fn lt(lhs: Self, rhs: Self) -> Self {
        Formula::binary(BinOp::Lt, lhs, rhs)
    }

    pub fn le(lhs: Self, rhs: Self) -> Self {
        Formula::binary(BinOp::Le, lhs, rhs)
    }

    pub fn gt(lhs: Self, rhs: Self) -> Self {
        Formula::binary(BinOp::Gt, lhs, rhs)
    }

    pub fn ge(lhs: Self, rhs: Self) -> Self {
        Formula::binary(BinOp::Ge, lhs, rhs)
    }

    pub fn ite(cond: Self, then: Self, else_: Self) -> Self {
        Formula::Ite(Box::new(cond), Box::new(then), Box::new(else_))
    }

    /// Conjunction of all `formulas`, or `true` if there are none.
    pub fn and_all(formulas: impl IntoIterator<Item = Self>) -> Self {
        formulas
            .into_iter()
            .reduce(Formula::and)
            .unwrap_or_else(Formula::tt)
    }

    /// Sum of all `terms`, or `0` if there are none.
    pub fn add_all(terms: impl IntoIterator<Item = Self>) -> Self {
        terms
            .into_iter()
            .reduce(Formula::add)
            .unwrap_or_else(|| Formula::int(0))
    }

    /// Disjunction of all `formulas`, or `false` if there are none.
    pub fn or_all(formulas: impl IntoIterator<Item = Self>) -> Self {
        formulas
            .into_iter()
            .reduce(Formula::or)
            .unwrap_or_else(Formula::ff)
    }
}

impl Formula {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Formula::Var(_) | Formula::Int(_) | Formula::Bool(_))
    }

    /// Direct sub-formulas, left to right.
    pub fn children(&self) -> Vec<&Formula> {
        match self {
            Formula::Var(_) | Formula::Int(_) | Formula::Bool(_) => vec![],
            Formula::Unary(_, a) => vec![a.as_ref()],
            Formula::Binary(_, a, b) => vec![a.as_ref(), b.as_ref()],
            Formula::Ite(a, b, c) => vec![a.as_ref(), b.as_ref(), c.as_ref()],
        }
    }

    /// Rebuilds this node with every direct sub-formula replaced by `f(child)`.
    ///
    /// Leaves are returned as-is.
    pub fn fmap<F>(&self, mut f: F) -> Formula
    where
        F: FnMut(&Formula) -> Formula,
    {
        match self {
            Formula::Var(_) | Formula::Int(_) | Formula::Bool(_) => self.clone(),
            Formula::Unary(op, a) => Formula::Unary(*op, Box::new(f(a))),
            Formula::Binary(op, a, b) => Formula::Binary(*op, Box::new(f(a)), Box::new(f(b))),
            Formula::Ite(a, b, c) => Formula::Ite(Box::new(f(a)), Box::new(f(b)), Box::new(f(c))),
        }
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        1 + self.children().into_iter().map(Formula::size).sum::<usize>()
    }

    /// Computes the sort of this formula, checking every operator application.
    pub fn sort(&self) -> Result<Sort, SortError> {
        match self {
            Formula::Var(_) | Formula::Int(_) => Ok(Sort::Int),
            Formula::Bool(_) => Ok(Sort::Bool),
            Formula::Unary(op, a) => {
                expect_sort(op.symbol(), op.sort(), a)?;
                Ok(op.sort())
            }
            Formula::Binary(op, a, b) => {
                let (operand, result) = op.signature();
                expect_sort(op.symbol(), operand, a)?;
                expect_sort(op.symbol(), operand, b)?;
                Ok(result)
            }
            Formula::Ite(c, t, e) => {
                expect_sort("ite", Sort::Bool, c)?;
                let sort = t.sort()?;
                expect_sort("ite", sort, e)?;
                Ok(sort)
            }
        }
    }
}

fn expect_sort(op: &'static str, expected: Sort, formula: &Formula) -> Result<(), SortError> {
    let found = formula.sort()?;
    if found == expected {
        Ok(())
    } else {
        Err(SortError { op, expected, found })
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Var(v) => write!(f, "{}", v),
            Formula::Int(n) if n.is_negative() => write!(f, "(- {})", n.abs()),
            Formula::Int(n) => write!(f, "{}", n),
            Formula::Bool(b) => write!(f, "{}", b),
            Formula::Unary(op, a) => write!(f, "({} {})", op.symbol(), a),
            Formula::Binary(op, a, b) => write!(f, "({} {} {})", op.symbol(), a, b),
            Formula::Ite(a, b, c) => write!(f, "(ite {} {} {})", a, b, c),
        }
    }
}

impl From<Var> for Formula {
    fn from(var: Var) -> Self {
        Formula::Var(var)
    }
}

impl From<bool> for Formula {
    fn from(value: bool) -> Self {
        Formula::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Formula {
                fn from(value: $t) -> Self {
                    Formula::int(value)
                }
            }
        )*
    };
}

impl_from_int!(i32, i64, u32, u64);

impl From<BigInt> for Formula {
    fn from(value: BigInt) -> Self {
        Formula::Int(value)
    }
}
