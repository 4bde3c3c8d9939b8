//! Sequent proof search
//!
//! A sequent Γ ⊢ Δ is derivable when the empty-sequent axiom applies, when
//! some pair drawn from Γ×Δ is equal under the oracle, or when breaking
//! down one formula yields derivable premises. Breakdown picks its rule by
//! the formula's top symbol and side; conjunctive premises must all prove
//! (`for_all`), disjunctive ones need one witness (`for_any`), and both
//! run on the shared pool.
//!
//! A size heuristic orders the work: cheap candidate pairs first in the
//! axiom search, small formulae first in breakdown.

use crate::config::ProverConfig;
use crate::error::{ProverError, Result};
use crate::logic::{symbol, Formula};
use crate::oracle::EqualityOracle;
use crate::parallel::{CancelToken, Pool};
use crate::view::{Singleton, Unfold, View};
use std::sync::Arc;
use tracing::{debug, trace};

pub(crate) fn guide_positive(formula: &Formula) -> f32 {
    formula.total_size() as f32
}

pub(crate) fn guide_negative(formula: &Formula) -> f32 {
    formula.total_size() as f32
}

/// Cheap pairs first: small formulae of similar size
pub(crate) fn guide_equal(first: &Formula, second: &Formula) -> f32 {
    let one = first.total_size() as f32;
    let two = second.total_size() as f32;
    (one + two) * (1.0 + (one - two).abs())
}

/// A sequent Γ ⊢ Δ together with the resources of its proof attempt.
///
/// Sub-sequents spawned by breakdown share the top-level oracle and pool,
/// so equalities proven in one branch settle queries in every other.
pub struct Sequent {
    left: Unfold<Formula>,
    right: Unfold<Formula>,
    oracle: Arc<EqualityOracle>,
    pool: Arc<Pool>,
}

impl Sequent {
    pub fn new(left: Vec<Formula>, right: Vec<Formula>, config: &ProverConfig) -> Self {
        let pool = Arc::new(Pool::new(config.max_threads));
        let oracle = if config.use_cache {
            EqualityOracle::new(pool.clone())
        } else {
            EqualityOracle::without_cache(pool.clone())
        };
        Sequent {
            left: Unfold::from(left),
            right: Unfold::from(right),
            oracle: Arc::new(oracle),
            pool,
        }
    }

    /// Handle for an embedder's signal handler or watchdog
    pub fn cancel_token(&self) -> CancelToken {
        CancelToken::new(self.pool.clone())
    }

    /// Whether this sequent is derivable.
    pub fn prove(&self) -> Result<bool> {
        debug!(left = self.left.len(), right = self.right.len(), "proving sequent");

        if self.left.is_empty() && self.right.is_empty() {
            return Ok(true);
        }

        let axiom = self
            .left
            .cross(&self.right)
            .sorted(|(first, second)| guide_equal(first, second))
            .for_any(&self.pool, |(first, second)| self.oracle.equal(&first, &second))?;
        if axiom {
            return Ok(true);
        }

        self.left
            .concat(&self.right)
            .sorted(|formula| {
                let negative =
                    if self.left.count(formula) > 0 { guide_negative(formula) } else { 0.0 };
                let positive =
                    if self.right.count(formula) > 0 { guide_positive(formula) } else { 0.0 };
                negative + positive
            })
            .for_any(&self.pool, |formula| self.breakdown(&formula))
    }

    fn sub_prove<L, R>(&self, left: &L, right: &R) -> Result<bool>
    where
        L: View<Item = Formula>,
        R: View<Item = Formula>,
    {
        let next = Sequent {
            left: Unfold::from_view(left)?,
            right: Unfold::from_view(right)?,
            oracle: self.oracle.clone(),
            pool: self.pool.clone(),
        };
        next.prove()
    }

    /// Apply the rule selected by `formula`'s side and top symbol.
    fn breakdown(&self, formula: &Formula) -> Result<bool> {
        trace!(symbol = %formula.symbol(), "breaking down");

        if self.left.count(formula) > 0 {
            let single = Singleton::new(formula.clone());
            let rest = self.left.minus(&single);
            debug_assert!(rest.len() < self.left.len());
            debug_assert_eq!(rest.count(formula), 0);

            return if formula.has_symbol(&symbol::TRUE) {
                self.sub_prove(&rest, &self.right)
            } else if formula.has_symbol(&symbol::FALSE) {
                Ok(true)
            } else if formula.has_symbol(&symbol::NOT) {
                let body = formula.child(0)?.clone();
                self.sub_prove(&rest, &self.right.concat(Singleton::new(body)))
            } else if formula.has_symbol(&symbol::AND) {
                self.sub_prove(&rest.concat(formula.children()), &self.right)
            } else if formula.has_symbol(&symbol::OR) {
                View::sorted(&formula.children(), guide_negative).for_all(
                    &self.pool,
                    |child| self.sub_prove(&rest.concat(Singleton::new(child)), &self.right),
                )
            } else if formula.has_symbol(&symbol::NOR) {
                self.sub_prove(&rest, &self.right.concat(formula.children()))
            } else if formula.has_symbol(&symbol::NAND) {
                View::sorted(&formula.children(), guide_positive).for_all(
                    &self.pool,
                    |child| self.sub_prove(&rest, &self.right.concat(Singleton::new(child))),
                )
            } else if formula.has_symbol(&symbol::IMPL) {
                let antecedent = formula.child(0)?.clone();
                let consequent = formula.child(1)?.clone();
                let branches: &[usize] = &[0, 1];
                View::for_any(&branches, &self.pool, |branch| {
                    if branch == 0 {
                        self.sub_prove(&rest.concat(Singleton::new(consequent.clone())), &self.right)
                    } else {
                        self.sub_prove(&rest, &self.right.concat(Singleton::new(antecedent.clone())))
                    }
                })
            } else if formula.has_symbol(&symbol::RIMPL) {
                let consequent = formula.child(0)?.clone();
                let antecedent = formula.child(1)?.clone();
                let branches: &[usize] = &[0, 1];
                View::for_any(&branches, &self.pool, |branch| {
                    if branch == 0 {
                        self.sub_prove(&rest.concat(Singleton::new(consequent.clone())), &self.right)
                    } else {
                        self.sub_prove(&rest, &self.right.concat(Singleton::new(antecedent.clone())))
                    }
                })
            } else if formula.has_symbol(&symbol::NIMPL) {
                let antecedent = formula.child(0)?.clone();
                let consequent = formula.child(1)?.clone();
                self.sub_prove(
                    &rest.concat(Singleton::new(consequent)),
                    &self.right.concat(Singleton::new(antecedent)),
                )
            } else if formula.has_symbol(&symbol::NRIMPL) {
                let consequent = formula.child(0)?.clone();
                let antecedent = formula.child(1)?.clone();
                self.sub_prove(
                    &rest.concat(Singleton::new(consequent)),
                    &self.right.concat(Singleton::new(antecedent)),
                )
            } else {
                Ok(false)
            };
        }

        if self.right.count(formula) > 0 {
            let single = Singleton::new(formula.clone());
            let rest = self.right.minus(&single);
            debug_assert!(rest.len() < self.right.len());

            return if formula.has_symbol(&symbol::FALSE) {
                self.sub_prove(&self.left, &rest)
            } else if formula.has_symbol(&symbol::TRUE) {
                Ok(true)
            } else if formula.has_symbol(&symbol::NOT) {
                let body = formula.child(0)?.clone();
                self.sub_prove(&self.left.concat(Singleton::new(body)), &rest)
            } else if formula.has_symbol(&symbol::OR) {
                self.sub_prove(&self.left, &rest.concat(formula.children()))
            } else if formula.has_symbol(&symbol::AND) {
                View::sorted(&formula.children(), guide_positive).for_all(
                    &self.pool,
                    |child| self.sub_prove(&self.left, &rest.concat(Singleton::new(child))),
                )
            } else if formula.has_symbol(&symbol::NAND) {
                self.sub_prove(&self.left.concat(formula.children()), &rest)
            } else if formula.has_symbol(&symbol::NOR) {
                View::sorted(&formula.children(), guide_negative).for_all(
                    &self.pool,
                    |child| self.sub_prove(&self.left.concat(Singleton::new(child)), &rest),
                )
            } else if formula.has_symbol(&symbol::IMPL) {
                let antecedent = formula.child(0)?.clone();
                let consequent = formula.child(1)?.clone();
                self.sub_prove(
                    &self.left.concat(Singleton::new(antecedent)),
                    &rest.concat(Singleton::new(consequent)),
                )
            } else if formula.has_symbol(&symbol::RIMPL) {
                let consequent = formula.child(0)?.clone();
                let antecedent = formula.child(1)?.clone();
                self.sub_prove(
                    &self.left.concat(Singleton::new(antecedent)),
                    &rest.concat(Singleton::new(consequent)),
                )
            } else if formula.has_symbol(&symbol::NIMPL) {
                // Recorded disjunctive form, dual in shape to the left-hand
                // implication rule rather than to its own left-hand row.
                let antecedent = formula.child(0)?.clone();
                let consequent = formula.child(1)?.clone();
                let branches: &[usize] = &[0, 1];
                View::for_any(&branches, &self.pool, |branch| {
                    if branch == 0 {
                        self.sub_prove(&self.left.concat(Singleton::new(consequent.clone())), &rest)
                    } else {
                        self.sub_prove(&self.left, &rest.concat(Singleton::new(antecedent.clone())))
                    }
                })
            } else if formula.has_symbol(&symbol::NRIMPL) {
                let consequent = formula.child(0)?.clone();
                let antecedent = formula.child(1)?.clone();
                let branches: &[usize] = &[0, 1];
                View::for_any(&branches, &self.pool, |branch| {
                    if branch == 0 {
                        self.sub_prove(&self.left.concat(Singleton::new(consequent.clone())), &rest)
                    } else {
                        self.sub_prove(&self.left, &rest.concat(Singleton::new(antecedent.clone())))
                    }
                })
            } else {
                Ok(false)
            };
        }

        Err(ProverError::Internal("formula on neither side of the sequent"))
    }
}

/// Decide Γ ⊢ Δ with the default configuration.
pub fn prove(
    left: impl IntoIterator<Item = Formula>,
    right: impl IntoIterator<Item = Formula>,
) -> Result<bool> {
    prove_with(left, right, &ProverConfig::default())
}

/// Decide Γ ⊢ Δ under `config`.
pub fn prove_with(
    left: impl IntoIterator<Item = Formula>,
    right: impl IntoIterator<Item = Formula>,
    config: &ProverConfig,
) -> Result<bool> {
    Sequent::new(left.into_iter().collect(), right.into_iter().collect(), config).prove()
}
