//! Boundary-sampling satisfiability classification.
//!
//! The [`Decider`] classifies a boolean formula over bounded integer variables
//! by checking it at every *corner* of the box spanned by the variables'
//! [solution sets][crate::domain::SolutionSet]:
//!
//! 1. extract the free variables `x_0 .. x_{n-1}` of the query,
//! 2. build the `n x 2^n` [`DecisionMatrix`],
//! 3. for each corner `i`, substitute `x_j` with its upper bound if
//!    `matrix[j][i]` is set and with its lower bound otherwise,
//! 4. ask the oracle about each grounded formula in a fresh session,
//! 5. aggregate: all corners satisfiable is a [`Degree::Tautology`], some is
//!    [`Degree::Sat`], none is [`Degree::Unsat`].
//!
//! This is a heuristic, not a decision procedure: only the `2^n` corners are
//! sampled, never the interior of the box. The number of oracle queries is
//! exponential in the number of variables, and nothing here bounds it unless
//! the caller sets [`DeciderConfig::max_variables`].
//!
//! # Examples
//!
//! ```
//! use cornersat::decide::{Decider, Degree};
//! use cornersat::domain::Domains;
//! use cornersat::formula::Formula;
//! use cornersat::oracle::EvalOracle;
//!
//! let domains = Domains::new().with("x", 0, 10);
//! let decider = Decider::new(domains, EvalOracle::new());
//!
//! let x = Formula::var("x");
//! assert_eq!(decider.decide(&Formula::ge(x.clone(), Formula::int(0))).unwrap(), Degree::Tautology);
//! assert_eq!(decider.decide(&Formula::gt(x.clone(), Formula::int(5))).unwrap(), Degree::Sat);
//! assert_eq!(decider.decide(&Formula::gt(x, Formula::int(10))).unwrap(), Degree::Unsat);
//! ```

use std::fmt::{self, Display};

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::domain::{SolutionSet, SolutionSetProvider};
use crate::error::{DecideError, Result, SortError};
use crate::formula::{Formula, Sort, Var};
use crate::interrupt::Interrupt;
use crate::matrix::DecisionMatrix;
use crate::oracle::{scoped, Oracle, Session};
use crate::vars::free_variables;

/// Three-valued outcome of a decision run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Degree {
    /// No corner is satisfiable.
    Unsat,
    /// Some, but not all, corners are satisfiable.
    Sat,
    /// Every corner is satisfiable.
    Tautology,
}

impl Degree {
    /// Aggregates `satisfiable` out of `total` corner checks.
    pub fn from_counts(satisfiable: usize, total: usize) -> Self {
        debug_assert!(satisfiable <= total);
        if satisfiable == total {
            Degree::Tautology
        } else if satisfiable > 0 {
            Degree::Sat
        } else {
            Degree::Unsat
        }
    }
}

impl Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degree::Unsat => write!(f, "unsat"),
            Degree::Sat => write!(f, "sat"),
            Degree::Tautology => write!(f, "tautology"),
        }
    }
}

/// Outcome of a decision run with per-corner detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CornerReport {
    pub degree: Degree,
    /// Number of satisfiable corners.
    pub satisfiable: usize,
    /// Number of corners, `2^n` for `n` free variables.
    pub total: usize,
    /// `verdicts[i]` tells whether corner `i` is satisfiable.
    pub verdicts: Vec<bool>,
}

impl CornerReport {
    fn from_verdicts(verdicts: Vec<bool>) -> Self {
        let satisfiable = verdicts.iter().filter(|&&sat| sat).count();
        let total = verdicts.len();
        Self {
            degree: Degree::from_counts(satisfiable, total),
            satisfiable,
            total,
            verdicts,
        }
    }
}

/// Configuration of a [`Decider`].
#[derive(Debug, Clone, Default)]
pub struct DeciderConfig {
    /// Upper limit on the number of free variables of a query.
    /// Exceeding it fails the run with [`DecideError::VariableLimit`].
    /// `None` means no limit.
    pub max_variables: Option<usize>,
    /// Worker threads for the parallel strategy.
    /// `None` uses rayon's global pool.
    pub threads: Option<usize>,
}

/// Corner-sampling decider.
#[derive(Debug)]
pub struct Decider<P, O> {
    provider: P,
    oracle: O,
    config: DeciderConfig,
    interrupt: Interrupt,
}

impl<P, O> Decider<P, O>
where
    P: SolutionSetProvider,
    O: Oracle,
{
    pub fn new(provider: P, oracle: O) -> Self {
        Self::with_config(provider, oracle, DeciderConfig::default())
    }

    pub fn with_config(provider: P, oracle: O, config: DeciderConfig) -> Self {
        Self {
            provider,
            oracle,
            config,
            interrupt: Interrupt::new(),
        }
    }

    /// Replaces the cancellation flag observed by this decider.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn config(&self) -> &DeciderConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Handle to the cancellation flag of this decider.
    pub fn interrupt(&self) -> Interrupt {
        self.interrupt.clone()
    }

    /// Looks up the solution set of every variable, in order.
    fn solution_sets(&self, vars: &[Var]) -> Result<Vec<SolutionSet>> {
        vars.iter()
            .map(|var| -> Result<SolutionSet> {
                let set = self
                    .provider
                    .solution_set(var)
                    .ok_or_else(|| DecideError::MissingSolutionSet(var.clone()))?;
                if !set.is_well_formed() {
                    warn!("solution set of {} is inverted: {}", var, set);
                }
                Ok(set)
            })
            .collect()
    }

    /// Grounds `formula` at every corner of its variables' box.
    ///
    /// Returns `2^n` ground formulas for `n` free variables, ordered by corner
    /// index. Corner `i` substitutes each variable `j` with its upper bound if
    /// bit `j` of `i` is set, and with its lower bound otherwise. A ground
    /// `formula` yields itself as the single corner.
    pub fn perform_substitutions(&self, formula: &Formula) -> Result<Vec<Formula>> {
        let vars = free_variables(formula);
        if let Some(limit) = self.config.max_variables {
            if vars.len() > limit {
                return Err(DecideError::VariableLimit {
                    found: vars.len(),
                    limit,
                });
            }
        }

        let matrix = DecisionMatrix::new(vars.len())?;
        let sets = self.solution_sets(&vars)?;
        debug!(
            "perform_substitutions: {} variables, {} corners",
            matrix.num_vars(),
            matrix.num_corners()
        );

        let corners = (0..matrix.num_corners())
            .map(|i| {
                let assignments = vars
                    .iter()
                    .zip(&sets)
                    .zip(matrix.column(i))
                    .map(|((var, set), upper_bit)| (var, set.bound(upper_bit)));
                formula.substitute_all(assignments)
            })
            .collect();
        Ok(corners)
    }

    /// Classifies `query`, checking corners one after another.
    pub fn decide(&self, query: &Formula) -> Result<Degree> {
        self.decide_report(query).map(|report| report.degree)
    }

    /// Like [`decide`][Decider::decide], with per-corner verdicts.
    pub fn decide_report(&self, query: &Formula) -> Result<CornerReport> {
        let corners = self.prepare(query)?;
        let verdicts = corners
            .iter()
            .enumerate()
            .map(|(i, grounded)| check_corner(&self.oracle, &self.interrupt, i, grounded))
            .collect::<Result<Vec<bool>>>()?;
        Ok(self.finish(query, verdicts))
    }

    fn prepare(&self, query: &Formula) -> Result<Vec<Formula>> {
        let sort = query.sort()?;
        if sort != Sort::Bool {
            return Err(SortError {
                op: "decide",
                expected: Sort::Bool,
                found: sort,
            }
            .into());
        }
        if self.interrupt.is_requested() {
            return Err(DecideError::Interrupted);
        }
        self.perform_substitutions(query)
    }

    fn finish(&self, query: &Formula, verdicts: Vec<bool>) -> CornerReport {
        let report = CornerReport::from_verdicts(verdicts);
        info!(
            "decide({}) -> {} ({}/{} corners satisfiable)",
            query, report.degree, report.satisfiable, report.total
        );
        report
    }
}

impl<P, O> Decider<P, O>
where
    P: SolutionSetProvider,
    O: Oracle + Sync,
{
    /// Classifies `query`, checking corners concurrently on a rayon pool.
    ///
    /// Every worker opens, uses and closes its own session. The result is the
    /// same as [`decide`][Decider::decide]; the first failing corner aborts the
    /// run.
    pub fn decide_parallel(&self, query: &Formula) -> Result<Degree> {
        self.decide_parallel_report(query).map(|report| report.degree)
    }

    /// Like [`decide_parallel`][Decider::decide_parallel], with per-corner verdicts.
    pub fn decide_parallel_report(&self, query: &Formula) -> Result<CornerReport> {
        let corners = self.prepare(query)?;
        let oracle = &self.oracle;
        let interrupt = &self.interrupt;
        let run = || {
            corners
                .par_iter()
                .enumerate()
                .map(|(i, grounded)| check_corner(oracle, interrupt, i, grounded))
                .collect::<Result<Vec<bool>>>()
        };
        let verdicts = match self.config.threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(run)?,
            None => run()?,
        };
        Ok(self.finish(query, verdicts))
    }
}

/// Checks one grounded formula in a fresh session.
///
/// Returns `true` if the oracle does not report it unsatisfiable.
fn check_corner<O: Oracle + ?Sized>(
    oracle: &O,
    interrupt: &Interrupt,
    index: usize,
    grounded: &Formula,
) -> Result<bool> {
    if interrupt.is_requested() {
        return Err(DecideError::Interrupted);
    }
    let mut session = scoped(oracle, interrupt)?;
    session.add_constraint(grounded)?;
    let satisfiable = !session.is_unsat()?;
    debug!("corner {}: {} -> {}", index, grounded, if satisfiable { "sat" } else { "unsat" });
    Ok(satisfiable)
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::Domains;
    use crate::error::{SolverError, SolverResult};
    use crate::oracle::{EvalOracle, EvalSession};

    fn x() -> Formula {
        Formula::var("x")
    }

    fn y() -> Formula {
        Formula::var("y")
    }

    fn decider(domains: Domains) -> Decider<Domains, EvalOracle> {
        Decider::new(domains, EvalOracle::new())
    }

    #[test]
    fn test_from_counts() {
        assert_eq!(Degree::from_counts(0, 4), Degree::Unsat);
        assert_eq!(Degree::from_counts(1, 4), Degree::Sat);
        assert_eq!(Degree::from_counts(3, 4), Degree::Sat);
        assert_eq!(Degree::from_counts(4, 4), Degree::Tautology);
        assert_eq!(Degree::from_counts(1, 1), Degree::Tautology);
        assert_eq!(Degree::from_counts(0, 1), Degree::Unsat);
    }

    #[test]
    fn test_degree_display() {
        assert_eq!(Degree::Unsat.to_string(), "unsat");
        assert_eq!(Degree::Sat.to_string(), "sat");
        assert_eq!(Degree::Tautology.to_string(), "tautology");
    }

    #[test]
    fn test_substitutions_one_var() {
        let d = decider(Domains::new().with("x", 0, 10));
        let corners = d.perform_substitutions(&Formula::gt(x(), Formula::int(5))).unwrap();
        assert_eq!(
            corners,
            vec![
                Formula::gt(Formula::int(0), Formula::int(5)),
                Formula::gt(Formula::int(10), Formula::int(5)),
            ]
        );
    }

    #[test]
    fn test_substitutions_two_vars_ordered_by_corner() {
        let d = decider(Domains::new().with("x", 0, 1).with("y", 2, 3));
        let f = Formula::le(x() + y(), Formula::int(1));
        let corners: Vec<String> = d
            .perform_substitutions(&f)
            .unwrap()
            .iter()
            .map(|g| g.to_string())
            .collect();
        assert_eq!(
            corners,
            vec![
                "(<= (+ 0 2) 1)",
                "(<= (+ 1 2) 1)",
                "(<= (+ 0 3) 1)",
                "(<= (+ 1 3) 1)",
            ]
        );
    }

    #[test]
    fn test_substitutions_count_and_ground() {
        let d = decider(Domains::new().with("a", 0, 1).with("b", 0, 1).with("c", 0, 1));
        let f = Formula::and_all([
            Formula::ge(Formula::var("a"), Formula::int(0)),
            Formula::ge(Formula::var("b"), Formula::var("c")),
        ]);
        let corners = d.perform_substitutions(&f).unwrap();
        assert_eq!(corners.len(), 8);
        assert!(corners.iter().all(Formula::is_ground));
    }

    #[test]
    fn test_substitutions_ground_formula() {
        let d = decider(Domains::new());
        let f = Formula::lt(Formula::int(1), Formula::int(2));
        assert_eq!(d.perform_substitutions(&f).unwrap(), vec![f]);
    }

    #[test]
    fn test_missing_solution_set() {
        let d = decider(Domains::new().with("x", 0, 1));
        let err = d.decide(&Formula::gt(x(), y())).unwrap_err();
        assert!(matches!(err, DecideError::MissingSolutionSet(v) if v.name() == "y"));
    }

    #[test]
    fn test_variable_limit() {
        let config = DeciderConfig {
            max_variables: Some(1),
            ..Default::default()
        };
        let d = Decider::with_config(Domains::new().with("x", 0, 1).with("y", 0, 1), EvalOracle::new(), config);
        let err = d.decide(&Formula::gt(x(), y())).unwrap_err();
        assert!(matches!(err, DecideError::VariableLimit { found: 2, limit: 1 }));
    }

    #[test]
    fn test_non_boolean_query() {
        let d = decider(Domains::new().with("x", 0, 1));
        assert!(matches!(d.decide(&(x() + 1)), Err(DecideError::Sort(_))));
    }

    #[test]
    fn test_degenerate_case() {
        let d = decider(Domains::new());
        assert_eq!(d.decide(&Formula::tt()).unwrap(), Degree::Tautology);
        assert_eq!(d.decide(&Formula::ff()).unwrap(), Degree::Unsat);
        let report = d.decide_report(&Formula::tt()).unwrap();
        assert_eq!(report.total, 1);
    }

    #[test]
    fn test_report() {
        let d = decider(Domains::new().with("x", 0, 1).with("y", 0, 1));
        let report = d.decide_report(&Formula::le(x() + y(), Formula::int(1))).unwrap();
        assert_eq!(report.degree, Degree::Sat);
        assert_eq!(report.satisfiable, 3);
        assert_eq!(report.total, 4);
        assert_eq!(report.verdicts, vec![true, true, true, false]);
    }

    #[test]
    fn test_solver_error_propagates() {
        // x = 0 divides by zero
        let d = decider(Domains::new().with("x", 0, 1));
        let f = Formula::eq(Formula::div(Formula::int(1), x()), Formula::int(1));
        let err = d.decide(&f).unwrap_err();
        assert!(matches!(err, DecideError::Solving(SolverError::DivisionByZero)));
        assert_eq!(d.oracle().stats().open(), 0);
    }

    #[test]
    fn test_interrupted_before_start() {
        let d = decider(Domains::new().with("x", 0, 1));
        d.interrupt().request();
        assert!(matches!(d.decide(&Formula::ge(x(), Formula::int(0))), Err(DecideError::Interrupted)));
        assert_eq!(d.oracle().stats().opened(), 0);
    }

    /// Requests `trigger` right after opening the session of corner `at`.
    struct CancellingOracle {
        inner: EvalOracle,
        trigger: Interrupt,
        at: usize,
        sessions: AtomicUsize,
    }

    impl Oracle for CancellingOracle {
        type Session = EvalSession;

        fn open_session(&self, interrupt: &Interrupt) -> SolverResult<EvalSession> {
            let session = self.inner.open_session(interrupt)?;
            if self.sessions.fetch_add(1, Ordering::SeqCst) == self.at {
                self.trigger.request();
            }
            Ok(session)
        }
    }

    fn cancelling(domains: Domains, at: usize) -> Decider<Domains, CancellingOracle> {
        let interrupt = Interrupt::new();
        let oracle = CancellingOracle {
            inner: EvalOracle::new(),
            trigger: interrupt.clone(),
            at,
            sessions: AtomicUsize::new(0),
        };
        Decider::new(domains, oracle).with_interrupt(interrupt)
    }

    #[test]
    fn test_interrupt_reaches_open_session() {
        let d = cancelling(Domains::new().with("x", 0, 1).with("y", 0, 1), 0);
        let err = d.decide(&Formula::le(x() + y(), Formula::int(1))).unwrap_err();
        assert!(matches!(err, DecideError::Interrupted));
        // corner 0 is cancelled in flight, no other corner is started
        let stats = d.oracle().inner.stats();
        assert_eq!(stats.opened(), 1);
        assert_eq!(stats.open(), 0);
    }

    #[test]
    fn test_interrupt_mid_run() {
        let d = cancelling(Domains::new().with("x", 0, 1).with("y", 0, 1), 1);
        assert!(matches!(
            d.decide_report(&Formula::le(x() + y(), Formula::int(1))),
            Err(DecideError::Interrupted)
        ));
        let stats = d.oracle().inner.stats();
        assert_eq!(stats.opened(), 2);
        assert_eq!(stats.open(), 0);
    }

    #[test]
    fn test_interrupt_mid_run_parallel() {
        let d = cancelling(Domains::new().with("x", 0, 3).with("y", 0, 3).with("z", 0, 3), 2);
        let f = Formula::ge(x() + y() + Formula::var("z"), Formula::int(0));
        assert!(matches!(d.decide_parallel(&f), Err(DecideError::Interrupted)));
        assert_eq!(d.oracle().inner.stats().open(), 0);
    }

    #[test]
    fn test_inverted_bounds_used_as_given() {
        let d = decider(Domains::new().with("x", 10, 0));
        let corners = d.perform_substitutions(&Formula::gt(x(), Formula::int(5))).unwrap();
        assert_eq!(
            corners,
            vec![
                Formula::gt(Formula::int(10), Formula::int(5)),
                Formula::gt(Formula::int(0), Formula::int(5)),
            ]
        );
        let report = d.decide_report(&Formula::gt(x(), Formula::int(5))).unwrap();
        assert_eq!(report.verdicts, vec![true, false]);
        assert_eq!(report.degree, Degree::Sat);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let d = decider(Domains::new().with("x", 0, 3).with("y", -2, 2).with("z", 1, 5));
        let z = Formula::var("z");
        let queries = [
            Formula::ge(x() * z.clone() + y(), Formula::int(-2)),
            Formula::lt(x() - y(), z.clone()),
            Formula::gt(x() + y() + z, Formula::int(100)),
        ];
        for q in &queries {
            assert_eq!(d.decide_parallel_report(q).unwrap(), d.decide_report(q).unwrap());
        }
    }

    #[test]
    fn test_parallel_custom_pool() {
        let config = DeciderConfig {
            threads: Some(2),
            ..Default::default()
        };
        let d = Decider::with_config(Domains::new().with("x", 0, 10), EvalOracle::new(), config);
        assert_eq!(d.decide_parallel(&Formula::gt(x(), Formula::int(5))).unwrap(), Degree::Sat);
        assert_eq!(d.oracle().stats().opened(), 2);
        assert_eq!(d.oracle().stats().open(), 0);
    }
}
