//! Gentzen: a parallel sequent-calculus prover for propositional logic
//!
//! Given two finite multisets of formulae Γ and Δ, `prove` decides whether
//! the sequent Γ ⊢ Δ is derivable in a multiple-conclusion sequent
//! calculus. Three subsystems carry the search:
//!
//! - a lazy collection algebra (`view`) that expresses sequent sides,
//!   rule premises and candidate pairs without copying formulae;
//! - a pool-bounded parallel driver (`parallel`) with short-circuiting
//!   `for_all` / `for_any` evaluation over any view;
//! - an equality oracle (`oracle`) deciding sameness modulo commutativity
//!   and idempotence of the AC connectives, backed by a transactional
//!   union-find (`cache`, `sync`) so repeated comparisons amortize away.
//!
//! ```
//! use gentzen::{prove, Formula};
//!
//! let a = Formula::proposition("a");
//! let b = Formula::proposition("b");
//! let derivable = prove(
//!     vec![a.clone(), Formula::implies(a.clone(), b.clone())],
//!     vec![b],
//! )?;
//! assert!(derivable);
//! # Ok::<(), gentzen::ProverError>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod logic;
pub mod oracle;
pub mod parallel;
pub mod sequent;
pub mod sync;
pub mod view;

pub use config::ProverConfig;
pub use error::{ProverError, Result, SyncError, ViewError};
pub use logic::{Expression, Formula, Substitution, Symbol, SymbolClass, Variable};
pub use oracle::EqualityOracle;
pub use parallel::{CancelToken, Mode, Pool};
pub use sequent::{prove, prove_with, Sequent};
pub use view::{
    Cartesian, Concat, Difference, Empty, Reorder, Shadow, Singleton, Unfold, View, Zip,
};
