//! Solution sets: the known bounds of each variable.

use std::collections::HashMap;
use std::fmt::{self, Display};

use num_bigint::BigInt;

use crate::formula::Var;

/// Closed integer interval `[lower, upper]` of possible values of a variable.
///
/// `lower <= upper` is expected but not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SolutionSet {
    lower: BigInt,
    upper: BigInt,
}

impl SolutionSet {
    pub fn new(lower: impl Into<BigInt>, upper: impl Into<BigInt>) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    pub fn lower(&self) -> &BigInt {
        &self.lower
    }

    pub fn upper(&self) -> &BigInt {
        &self.upper
    }

    /// Returns the upper bound if `upper` is set, otherwise the lower one.
    pub fn bound(&self, upper: bool) -> &BigInt {
        if upper {
            &self.upper
        } else {
            &self.lower
        }
    }

    /// Returns `true` if both bounds coincide.
    pub fn is_point(&self) -> bool {
        self.lower == self.upper
    }

    /// Returns `true` if `lower <= upper`.
    pub fn is_well_formed(&self) -> bool {
        self.lower <= self.upper
    }
}

impl Display for SolutionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Source of solution sets, usually an external optimizer.
pub trait SolutionSetProvider {
    fn solution_set(&self, var: &Var) -> Option<SolutionSet>;
}

impl<P: SolutionSetProvider + ?Sized> SolutionSetProvider for &P {
    fn solution_set(&self, var: &Var) -> Option<SolutionSet> {
        (**self).solution_set(var)
    }
}

impl SolutionSetProvider for HashMap<Var, SolutionSet> {
    fn solution_set(&self, var: &Var) -> Option<SolutionSet> {
        self.get(var).cloned()
    }
}

/// Map from variables to their solution sets.
///
/// ```
/// use cornersat::domain::{Domains, SolutionSetProvider};
/// use cornersat::formula::Var;
///
/// let domains = Domains::new().with("x", 0, 10).with("y", -1, 1);
/// assert_eq!(domains.solution_set(&Var::new("x")).unwrap().to_string(), "[0, 10]");
/// assert!(domains.solution_set(&Var::new("z")).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Domains {
    sets: HashMap<Var, SolutionSet>,
}

impl Domains {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`][Domains::insert].
    pub fn with(mut self, name: &str, lower: impl Into<BigInt>, upper: impl Into<BigInt>) -> Self {
        self.insert(Var::new(name), SolutionSet::new(lower, upper));
        self
    }

    /// Sets the solution set of `var`, returning the previous one.
    pub fn insert(&mut self, var: Var, set: SolutionSet) -> Option<SolutionSet> {
        self.sets.insert(var, set)
    }

    pub fn get(&self, var: &Var) -> Option<&SolutionSet> {
        self.sets.get(var)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl SolutionSetProvider for Domains {
    fn solution_set(&self, var: &Var) -> Option<SolutionSet> {
        self.get(var).cloned()
    }
}

impl FromIterator<(Var, SolutionSet)> for Domains {
    fn from_iter<T: IntoIterator<Item = (Var, SolutionSet)>>(iter: T) -> Self {
        Self {
            sets: iter.into_iter().collect(),
        }
    }
}
