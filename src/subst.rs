//! Substitution of integer constants for free variables.

use num_bigint::BigInt;

use crate::formula::{Formula, Var};

impl Formula {
    /// Returns `self[var := value]`: every occurrence of `var` is replaced by
    /// the integer constant `value`. The rest of the tree is unchanged.
    ///
    /// ```
    /// use cornersat::formula::{Formula, Var};
    /// use num_bigint::BigInt;
    ///
    /// let f = Formula::gt(Formula::var("x"), Formula::var("y"));
    /// let g = f.substitute(&Var::new("x"), &BigInt::from(10));
    /// assert_eq!(g.to_string(), "(> 10 y)");
    /// ```
    pub fn substitute(&self, var: &Var, value: &BigInt) -> Formula {
        match self {
            Formula::Var(v) if v == var => Formula::Int(value.clone()),
            _ if self.is_leaf() => self.clone(),
            _ => self.fmap(|child| child.substitute(var, value)),
        }
    }

    /// Applies the substitutions one after another, each one consuming the
    /// formula produced by the previous one.
    ///
    /// Every substitution only touches its own variable, so for distinct
    /// variables the order does not matter.
    pub fn substitute_all<'a, I>(&self, assignments: I) -> Formula
    where
        I: IntoIterator<Item = (&'a Var, &'a BigInt)>,
    {
        assignments
            .into_iter()
            .fold(self.clone(), |f, (var, value)| f.substitute(var, value))
    }
}
