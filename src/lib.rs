//! # cornersat: corner sampling for bounded integer formulas
//!
//! **`cornersat`** classifies quantifier-free integer formulas by how satisfiable they are
//! over a box of variable bounds. Each free variable comes with a **solution set**, a known
//! interval `[lower, upper]` of its possible values (typically computed by an external optimizer).
//!
//! ## How it works
//!
//! The formula is grounded at every **corner** of the box: every variable is set to either its
//! lower or its upper bound, giving `2^n` ground formulas for `n` variables. Each of them is
//! checked by a satisfiability **oracle** in its own session, and the verdicts are aggregated into
//! a [`Degree`][crate::decide::Degree]:
//!
//! - **tautology**: every corner satisfies the formula,
//! - **sat**: some corners do, others don't,
//! - **unsat**: no corner does.
//!
//! This is a heuristic. Only the corners are sampled, never the interior of the box, so a formula
//! classified as unsat may still have models inside it. The cost is exponential in the number of
//! variables; it is up to the caller to keep that number small.
//!
//! ## Basic Usage
//!
//! ```rust
//! use cornersat::decide::{Decider, Degree};
//! use cornersat::domain::Domains;
//! use cornersat::formula::Formula;
//! use cornersat::oracle::EvalOracle;
//!
//! // 1. Bounds of every variable
//! let domains = Domains::new().with("x", 0, 1).with("y", 0, 1);
//!
//! // 2. The decider, with an oracle for ground formulas
//! let decider = Decider::new(domains, EvalOracle::new());
//!
//! // 3. x + y <= 1 fails only at the corner (1, 1)
//! let f = Formula::le(Formula::var("x") + Formula::var("y"), Formula::int(1));
//! let report = decider.decide_report(&f).unwrap();
//! assert_eq!(report.degree, Degree::Sat);
//! assert_eq!(report.verdicts, vec![true, true, true, false]);
//! ```
//!
//! ## Core Components
//!
//! - **[`decide`]**: the [`Decider`][crate::decide::Decider], which grounds a formula at every corner and classifies it.
//! - **[`matrix`]**: the decision matrix enumerating the corners.
//! - **[`vars`]** and **[`subst`]**: free variable extraction and substitution.
//! - **[`oracle`]**: the [`Oracle`][crate::oracle::Oracle] and [`Session`][crate::oracle::Session] traits, and a reference oracle.
//! - **[`domain`]**: solution sets and their providers.
//! - **[`formula`]**: the formula language.

pub mod decide;
pub mod domain;
pub mod error;
pub mod eval;
pub mod formula;
pub mod interrupt;
pub mod matrix;
pub mod ops;
pub mod oracle;
pub mod subst;
pub mod vars;
