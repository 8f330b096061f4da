//! Satisfiability oracles and their solving sessions.
//!
//! An [`Oracle`] hands out [`Session`]s. A session accumulates constraints and
//! answers whether their conjunction is unsatisfiable. Sessions are meant to
//! be short-lived: open one, add a constraint, check, close. [`scoped`] wraps
//! a fresh session in a [`ScopedSession`] guard that closes it on drop, on the
//! error path too.
//!
//! Every session is opened with the [`Interrupt`] of the run it serves, so a
//! cancellation reaches checks that are already in flight.
//!
//! [`EvalOracle`] is a reference oracle for ground formulas: it decides a
//! constraint by evaluating it.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::debug;

use crate::error::{SolverError, SolverResult, SortError};
use crate::formula::{Formula, Sort};
use crate::interrupt::Interrupt;

/// A solving session.
pub trait Session {
    /// Asserts `constraint` in this session.
    fn add_constraint(&mut self, constraint: &Formula) -> SolverResult<()>;

    /// Returns `true` if the conjunction of the asserted constraints is unsatisfiable.
    fn is_unsat(&mut self) -> SolverResult<bool>;

    /// Releases the session. Closing twice is a no-op.
    fn close(&mut self);
}

/// A satisfiability oracle over ground formulas.
pub trait Oracle {
    type Session: Session;

    /// Opens a fresh session. Once `interrupt` is requested, the session
    /// should fail its pending and subsequent checks with
    /// [`SolverError::Interrupted`].
    fn open_session(&self, interrupt: &Interrupt) -> SolverResult<Self::Session>;
}

impl<O: Oracle + ?Sized> Oracle for &O {
    type Session = O::Session;

    fn open_session(&self, interrupt: &Interrupt) -> SolverResult<Self::Session> {
        (**self).open_session(interrupt)
    }
}

/// Session guard: closes the wrapped session when dropped.
#[derive(Debug)]
pub struct ScopedSession<S: Session> {
    inner: S,
}

impl<S: Session> ScopedSession<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Session> Deref for ScopedSession<S> {
    type Target = S;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<S: Session> DerefMut for ScopedSession<S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<S: Session> Drop for ScopedSession<S> {
    fn drop(&mut self) {
        self.inner.close();
    }
}

/// Opens a fresh session of `oracle`, closed when the guard goes out of scope.
pub fn scoped<O: Oracle + ?Sized>(oracle: &O, interrupt: &Interrupt) -> SolverResult<ScopedSession<O::Session>> {
    oracle.open_session(interrupt).map(ScopedSession::new)
}

/// Counters of opened and closed sessions.
#[derive(Debug, Default)]
pub struct SessionStats {
    opened: AtomicUsize,
    closed: AtomicUsize,
}

impl SessionStats {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of sessions opened but not yet closed.
    pub fn open(&self) -> usize {
        // closed first: a session closing in between cannot underflow
        let closed = self.closed();
        self.opened().saturating_sub(closed)
    }
}

/// Oracle deciding ground constraints by evaluation.
///
/// A constraint that still contains a free variable makes the check fail with
/// [`SolverError::NotGround`].
#[derive(Debug, Clone, Default)]
pub struct EvalOracle {
    stats: Arc<SessionStats>,
}

impl EvalOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}

impl Oracle for EvalOracle {
    type Session = EvalSession;

    fn open_session(&self, interrupt: &Interrupt) -> SolverResult<EvalSession> {
        self.stats.opened.fetch_add(1, Ordering::SeqCst);
        Ok(EvalSession {
            constraints: Vec::new(),
            interrupt: interrupt.clone(),
            stats: Arc::clone(&self.stats),
            closed: false,
        })
    }
}

#[derive(Debug)]
pub struct EvalSession {
    constraints: Vec<Formula>,
    interrupt: Interrupt,
    stats: Arc<SessionStats>,
    closed: bool,
}

impl EvalSession {
    fn ensure_usable(&self) -> SolverResult<()> {
        if self.closed {
            return Err(SolverError::SessionClosed);
        }
        if self.interrupt.is_requested() {
            return Err(SolverError::Interrupted);
        }
        Ok(())
    }

    pub fn constraints(&self) -> &[Formula] {
        &self.constraints
    }
}

impl Session for EvalSession {
    fn add_constraint(&mut self, constraint: &Formula) -> SolverResult<()> {
        self.ensure_usable()?;
        let sort = constraint.sort()?;
        if sort != Sort::Bool {
            return Err(SortError {
                op: "assert",
                expected: Sort::Bool,
                found: sort,
            }
            .into());
        }
        self.constraints.push(constraint.clone());
        Ok(())
    }

    fn is_unsat(&mut self) -> SolverResult<bool> {
        self.ensure_usable()?;
        for constraint in &self.constraints {
            if self.interrupt.is_requested() {
                return Err(SolverError::Interrupted);
            }
            if !constraint.eval_bool()? {
                debug!("is_unsat: {} is false", constraint);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.constraints.clear();
            self.stats.closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_empty_session_is_sat() {
        let oracle = EvalOracle::new();
        let mut session = scoped(&oracle, &Interrupt::new()).unwrap();
        assert_eq!(session.is_unsat(), Ok(false));
    }

    #[test]
    fn test_conjunction() {
        let oracle = EvalOracle::new();
        let mut session = scoped(&oracle, &Interrupt::new()).unwrap();
        session.add_constraint(&Formula::gt(Formula::int(2), Formula::int(1))).unwrap();
        assert_eq!(session.is_unsat(), Ok(false));
        session.add_constraint(&Formula::lt(Formula::int(2), Formula::int(1))).unwrap();
        assert_eq!(session.is_unsat(), Ok(true));
        assert_eq!(session.constraints().len(), 2);
    }

    #[test]
    fn test_guard_closes() {
        let oracle = EvalOracle::new();
        {
            let _session = scoped(&oracle, &Interrupt::new()).unwrap();
            assert_eq!(oracle.stats().open(), 1);
        }
        assert_eq!(oracle.stats().opened(), 1);
        assert_eq!(oracle.stats().closed(), 1);
        assert_eq!(oracle.stats().open(), 0);
    }

    #[test]
    fn test_explicit_close_then_drop() {
        let oracle = EvalOracle::new();
        let mut session = scoped(&oracle, &Interrupt::new()).unwrap();
        session.close();
        assert_eq!(session.is_unsat(), Err(SolverError::SessionClosed));
        drop(session);
        assert_eq!(oracle.stats().closed(), 1);
    }

    #[test]
    fn test_non_ground_constraint() {
        let oracle = EvalOracle::new();
        let mut session = scoped(&oracle, &Interrupt::new()).unwrap();
        session.add_constraint(&Formula::ge(Formula::var("x"), Formula::int(0))).unwrap();
        assert!(matches!(session.is_unsat(), Err(SolverError::NotGround(_))));
    }

    #[test]
    fn test_non_boolean_constraint() {
        let oracle = EvalOracle::new();
        let mut session = scoped(&oracle, &Interrupt::new()).unwrap();
        let err = session.add_constraint(&Formula::int(1)).unwrap_err();
        assert!(matches!(err, SolverError::Sort(_)));
    }

    #[test]
    fn test_interrupted() {
        let interrupt = Interrupt::new();
        let oracle = EvalOracle::new();
        let mut session = scoped(&oracle, &interrupt).unwrap();
        session.add_constraint(&Formula::tt()).unwrap();
        interrupt.request();
        assert_eq!(session.is_unsat(), Err(SolverError::Interrupted));
        assert_eq!(
            session.add_constraint(&Formula::tt()),
            Err(SolverError::Interrupted)
        );
    }

    #[test]
    fn test_open_count_never_underflows() {
        let stats = SessionStats::default();
        // a close observed before its open
        stats.closed.fetch_add(1, Ordering::SeqCst);
        assert_eq!(stats.open(), 0);
        stats.opened.fetch_add(2, Ordering::SeqCst);
        assert_eq!(stats.open(), 1);
    }

    #[test]
    fn test_open_count_with_concurrent_sessions() {
        let oracle = EvalOracle::new();
        let interrupt = Interrupt::new();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..1000 {
                        drop(scoped(&oracle, &interrupt).unwrap());
                    }
                });
            }
            for _ in 0..1000 {
                let _ = oracle.stats().open();
            }
        });
        assert_eq!(oracle.stats().opened(), 4000);
        assert_eq!(oracle.stats().open(), 0);
    }
}
