//! Error types.

use thiserror::Error;

use crate::formula::{Sort, Var};

/// Ill-sorted operator application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("sort mismatch in `{op}`: expected {expected}, found {found}")]
pub struct SortError {
    pub op: &'static str,
    pub expected: Sort,
    pub found: Sort,
}

/// Failure of a satisfiability oracle while checking a grounded formula.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// The constraint still contains a free variable.
    #[error("formula is not ground: free variable `{0}`")]
    NotGround(Var),

    #[error(transparent)]
    Sort(#[from] SortError),

    #[error("division by zero")]
    DivisionByZero,

    /// The session was used after being closed.
    #[error("session is closed")]
    SessionClosed,

    /// The check was cancelled through an [`Interrupt`][crate::interrupt::Interrupt].
    #[error("interrupted")]
    Interrupted,

    /// Backend-specific failure reported by an external oracle.
    #[error("solver failure: {0}")]
    Backend(String),
}

/// Failure of a [`Decider`][crate::decide::Decider] run.
///
/// A run that fails never yields a classification.
#[derive(Debug, Error)]
pub enum DecideError {
    #[error("corner check failed: {0}")]
    Solving(#[source] SolverError),

    #[error("decision interrupted")]
    Interrupted,

    #[error("ill-sorted query: {0}")]
    Sort(#[from] SortError),

    #[error("no solution set for variable `{0}`")]
    MissingSolutionSet(Var),

    /// `2^n` corners do not fit into a corner index.
    #[error("too many variables to enumerate corners: {0}")]
    TooManyVariables(usize),

    /// More free variables than the configured limit.
    #[error("{found} free variables exceed the configured limit of {limit}")]
    VariableLimit { found: usize, limit: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl From<SolverError> for DecideError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::Interrupted => DecideError::Interrupted,
            e => DecideError::Solving(e),
        }
    }
}

pub type SolverResult<T> = std::result::Result<T, SolverError>;

pub type Result<T> = std::result::Result<T, DecideError>;
