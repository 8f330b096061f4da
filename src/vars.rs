//! Free variable extraction.

use std::collections::HashSet;

use log::debug;

use crate::formula::{Formula, Var};

/// Collects the distinct free variables of `formula`, in the order they are
/// first encountered by a depth-first, left-to-right traversal.
///
/// A ground formula yields an empty vector.
///
/// ```
/// use cornersat::formula::{Formula, Var};
/// use cornersat::vars::free_variables;
///
/// let f = Formula::le(Formula::var("y") + Formula::var("x") + Formula::var("y"), Formula::int(1));
/// assert_eq!(free_variables(&f), vec![Var::new("y"), Var::new("x")]);
/// ```
pub fn free_variables(formula: &Formula) -> Vec<Var> {
    let mut seen: HashSet<&Var> = HashSet::new();
    let mut vars = Vec::new();

    // Children are pushed in reverse, so the leftmost child is visited first.
    let mut stack: Vec<&Formula> = vec![formula];
    while let Some(node) = stack.pop() {
        match node {
            Formula::Var(v) => {
                if seen.insert(v) {
                    vars.push(v.clone());
                }
            }
            _ => stack.extend(node.children().into_iter().rev()),
        }
    }

    debug!("free_variables: {:?}", vars);
    vars
}

impl Formula {
    pub fn free_variables(&self) -> Vec<Var> {
        free_variables(self)
    }

    /// Returns `true` if the formula contains no free variables.
    pub fn is_ground(&self) -> bool {
        self.first_free_variable().is_none()
    }

    /// The leftmost free variable, if any.
    pub fn first_free_variable(&self) -> Option<&Var> {
        match self {
            Formula::Var(v) => Some(v),
            _ => self.children().into_iter().find_map(Formula::first_free_variable),
        }
    }
}
