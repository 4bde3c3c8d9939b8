//! Semantic equality oracle
//!
//! Decides whether two formulae are the same modulo commutativity and
//! idempotence of the AC connectives. Verdicts are cached in the
//! union-find, so once a pair has compared equal every later query against
//! either class is settled by a find.
//!
//! The ladder for a cached comparison: node identity, shared root, hash
//! prefilter, deep structural comparison. Hashes respect the oracle's
//! equality (commutative children mix order-insensitively, with duplicate
//! child hashes dropped), so a hash mismatch is a sound `false`; a hash
//! collision merely costs a deep comparison.

use crate::cache::CompareCache;
use crate::error::{ProverError, Result, SyncError};
use crate::logic::formula::Kind;
use crate::logic::{symbol, Formula, Symbol};
use crate::parallel::Pool;
use crate::sequent::guide_equal;
use crate::sync::Gate;
use crate::view::{View, Zip};
use rustc_hash::FxHasher;
use std::hash::Hasher;
use std::sync::Arc;
use tracing::trace;

const MAX_UNLOCKED_EQUAL_FAILURES: usize = 6;
const MAX_LOCKED_EQUAL_FAILURES: usize = 10;

const HASH_SEED: u64 = 0x38a1_0a1c;

/// Connectives whose child order is immaterial
fn commutative(sym: &Symbol) -> bool {
    [
        &symbol::AND,
        &symbol::OR,
        &symbol::NAND,
        &symbol::NOR,
        &symbol::XOR,
        &symbol::NXOR,
        &symbol::EQUIV,
        &symbol::NEQUIV,
    ]
    .into_iter()
    .any(|candidate| candidate == sym)
}

/// Connectives that absorb duplicate children
fn idempotent(sym: &Symbol) -> bool {
    [&symbol::AND, &symbol::OR, &symbol::NAND, &symbol::NOR]
        .into_iter()
        .any(|candidate| candidate == sym)
}

/// Content hash compatible with the oracle's equality.
pub(crate) fn semantic_hash(formula: &Formula) -> u64 {
    let base = formula.symbol().stable_hash(HASH_SEED);
    match formula.kind() {
        Kind::Connective(children) => {
            let mut child_hashes: Vec<u64> = children.as_slice().iter().map(semantic_hash).collect();
            if commutative(formula.symbol()) {
                // Mutual-inclusion equality ignores order and multiplicity,
                // so the hash folds the distinct child hashes commutatively.
                child_hashes.sort_unstable();
                child_hashes.dedup();
                child_hashes.into_iter().fold(base, |accumulator, child| {
                    accumulator.wrapping_add(child.rotate_left(17))
                })
            } else {
                let mut hasher = FxHasher::default();
                hasher.write_u64(base);
                for child in child_hashes {
                    hasher.write_u64(child);
                }
                hasher.finish()
            }
        }
        Kind::Relation(arguments) => {
            let mut hasher = FxHasher::default();
            hasher.write_u64(base);
            for argument in arguments {
                hasher.write_u64(argument.hash_seeded(HASH_SEED));
            }
            hasher.finish()
        }
        Kind::Quantifier(variable, body) => {
            let mut hasher = FxHasher::default();
            hasher.write_u64(base);
            hasher.write(variable.name().as_bytes());
            hasher.write_u64(semantic_hash(body));
            hasher.finish()
        }
    }
}

/// Equality decisions shared across one proof attempt
pub struct EqualityOracle {
    cache: Option<CompareCache>,
    gate: Gate,
    pool: Arc<Pool>,
}

impl EqualityOracle {
    pub fn new(pool: Arc<Pool>) -> Self {
        EqualityOracle { cache: Some(CompareCache::new()), gate: Gate::new(), pool }
    }

    /// An oracle that compares structurally on every call
    pub fn without_cache(pool: Arc<Pool>) -> Self {
        EqualityOracle { cache: None, gate: Gate::new(), pool }
    }

    /// Whether `one` and `two` are equal modulo the AC connectives.
    ///
    /// Transaction conflicts are retried; after the unlocked budget runs
    /// out the attempt holds the gate exclusively, and exhausting the
    /// locked budget too surfaces the conflict.
    pub fn equal(&self, one: &Formula, two: &Formula) -> Result<bool> {
        let Some(cache) = &self.cache else {
            if one.ptr_eq(two) {
                return Ok(true);
            }
            return self.deep_equal(one, two);
        };

        let mut failures = 0;
        loop {
            let attempt =
                self.cached_equal(cache, one, two, failures >= MAX_UNLOCKED_EQUAL_FAILURES);
            match attempt {
                Err(ProverError::Sync(SyncError::TransactionConflict)) => {
                    failures += 1;
                    if failures > MAX_UNLOCKED_EQUAL_FAILURES + MAX_LOCKED_EQUAL_FAILURES {
                        return Err(SyncError::TransactionConflict.into());
                    }
                }
                outcome => return outcome,
            }
        }
    }

    fn cached_equal(
        &self,
        cache: &CompareCache,
        one: &Formula,
        two: &Formula,
        exclusive: bool,
    ) -> Result<bool> {
        {
            let mut gate = self.gate.enter();
            if exclusive {
                gate.upgrade()?;
            }
            if one.ptr_eq(two) {
                return Ok(true);
            }
            if cache.find(one.key(), two.key())? {
                return Ok(true);
            }
            let hash_one = cache.hash(one.key(), || semantic_hash(one))?;
            let hash_two = cache.hash(two.key(), || semantic_hash(two))?;
            if hash_one != hash_two {
                return Ok(false);
            }
        }
        // The gate is released here: the deep comparison fans out workers
        // that re-enter equal().
        if self.deep_equal(one, two)? {
            let mut gate = self.gate.enter();
            if exclusive {
                gate.upgrade()?;
            }
            cache.join(one.key(), two.key())?;
            trace!(one = %one, two = %two, "joined equal formulae");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Structural comparison modulo the AC connectives.
    fn deep_equal(&self, one: &Formula, two: &Formula) -> Result<bool> {
        if one.symbol() != two.symbol() {
            return Ok(false);
        }
        if one.identical(two) {
            return Ok(true);
        }
        match (one.kind(), two.kind()) {
            (Kind::Connective(left), Kind::Connective(right)) => {
                let sym = one.symbol();
                if commutative(sym) {
                    if !idempotent(sym) && left.len() != right.len() {
                        return Ok(false);
                    }
                    if !self.included(left, right)? {
                        return Ok(false);
                    }
                    self.included(right, left)
                } else {
                    if left.len() != right.len() {
                        return Ok(false);
                    }
                    let pairs = Zip::new(&left[..], &right[..])?;
                    pairs
                        .sorted(|(first, second)| -guide_equal(first, second))
                        .for_all(&self.pool, |(first, second)| self.equal(&first, &second))
                }
            }
            (Kind::Relation(left), Kind::Relation(right)) => Ok(left.len() == right.len()
                && left.iter().zip(right).all(|(first, second)| first.identical(second))),
            (Kind::Quantifier(..), Kind::Quantifier(..)) => {
                Err(ProverError::UnsupportedSymbol(one.symbol().clone()))
            }
            _ => Ok(false),
        }
    }

    /// Every formula of `these` has an equal partner among `those`.
    fn included(&self, these: &[Formula], those: &[Formula]) -> Result<bool> {
        View::for_all(&these, &self.pool, |sub| {
            View::sorted(&those, |candidate| guide_equal(&sub, candidate))
                .for_any(&self.pool, |candidate| self.equal(&sub, &candidate))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oracle() -> EqualityOracle {
        EqualityOracle::new(Arc::new(Pool::new(4)))
    }

    fn atom(name: &str) -> Formula {
        Formula::proposition(name)
    }

    #[test]
    fn clones_are_equal_by_identity() {
        let oracle = oracle();
        let a = atom("a");
        assert_eq!(oracle.equal(&a, &a.clone()), Ok(true));
    }

    #[test]
    fn distinct_atoms_differ() {
        let oracle = oracle();
        assert_eq!(oracle.equal(&atom("a"), &atom("b")), Ok(false));
        assert_eq!(oracle.equal(&atom("a"), &atom("a")), Ok(true));
    }

    #[test]
    fn conjunction_commutes() {
        let oracle = oracle();
        let (a, b) = (atom("a"), atom("b"));
        let one = Formula::and(vec![a.clone(), b.clone()]);
        let two = Formula::and(vec![b, a]);
        assert_eq!(oracle.equal(&one, &two), Ok(true));
        // The verdict is monotone.
        assert_eq!(oracle.equal(&one, &two), Ok(true));
        assert_eq!(oracle.equal(&two, &one), Ok(true));
    }

    #[test]
    fn disjunction_absorbs_duplicates() {
        let oracle = oracle();
        let (a, b) = (atom("a"), atom("b"));
        let one = Formula::or(vec![a.clone(), a.clone(), b.clone()]);
        let two = Formula::or(vec![b, a]);
        assert_eq!(oracle.equal(&one, &two), Ok(true));
    }

    #[test]
    fn xor_commutes_but_keeps_arity() {
        let oracle = oracle();
        let (a, b) = (atom("a"), atom("b"));
        assert_eq!(
            oracle.equal(
                &Formula::xor(vec![a.clone(), b.clone()]),
                &Formula::xor(vec![b.clone(), a.clone()])
            ),
            Ok(true)
        );
        assert_eq!(
            oracle.equal(
                &Formula::xor(vec![a.clone(), b.clone()]),
                &Formula::xor(vec![a.clone(), a])
            ),
            Ok(false)
        );
    }

    #[test]
    fn implication_keeps_its_order() {
        let oracle = oracle();
        let (a, b) = (atom("a"), atom("b"));
        let forward = Formula::implies(a.clone(), b.clone());
        let backward = Formula::implies(b.clone(), a.clone());
        assert_eq!(oracle.equal(&forward, &backward), Ok(false));
        assert_eq!(oracle.equal(&forward, &Formula::implies(a, b)), Ok(true));
    }

    #[test]
    fn equality_reaches_under_nesting() {
        let oracle = oracle();
        let (a, b, c) = (atom("a"), atom("b"), atom("c"));
        let one = Formula::and(vec![Formula::or(vec![a.clone(), b.clone()]), c.clone()]);
        let two = Formula::and(vec![c, Formula::or(vec![b, a])]);
        assert_eq!(oracle.equal(&one, &two), Ok(true));
    }

    #[test]
    fn hash_agrees_on_equal_formulae() {
        let (a, b, c) = (atom("a"), atom("b"), atom("c"));
        assert_eq!(
            semantic_hash(&Formula::and(vec![a.clone(), b.clone()])),
            semantic_hash(&Formula::and(vec![b.clone(), a.clone()]))
        );
        assert_eq!(
            semantic_hash(&Formula::or(vec![a.clone(), a.clone(), b.clone()])),
            semantic_hash(&Formula::or(vec![b.clone(), a.clone()]))
        );
        assert_eq!(
            semantic_hash(&Formula::and(vec![Formula::or(vec![a.clone(), b.clone()]), c.clone()])),
            semantic_hash(&Formula::and(vec![c.clone(), Formula::or(vec![b.clone(), a.clone()])]))
        );
        assert_ne!(
            semantic_hash(&Formula::implies(a.clone(), b.clone())),
            semantic_hash(&Formula::implies(b, a))
        );
    }

    #[test]
    fn relation_atoms_compare_by_arguments() {
        use crate::logic::Expression;

        let oracle = oracle();
        let x = Expression::variable("x");
        let y = Expression::variable("y");
        let xx_one = Formula::relation(symbol::EQUAL, vec![x.clone(), x.clone()]).unwrap();
        let xx_two = Formula::relation(symbol::EQUAL, vec![x.clone(), x]).unwrap();
        let yy = Formula::relation(symbol::EQUAL, vec![y.clone(), y]).unwrap();

        assert_eq!(oracle.equal(&xx_one, &xx_two), Ok(true));
        assert_eq!(oracle.equal(&xx_one, &yy), Ok(false));
    }

    #[test]
    fn quantifiers_are_not_compared() {
        use crate::logic::Variable;

        let oracle = EqualityOracle::without_cache(Arc::new(Pool::new(2)));
        let body = atom("a");
        let one = Formula::for_all(Variable::new("x"), body.clone());
        let two = Formula::for_all(Variable::new("y"), body);
        assert!(matches!(
            oracle.equal(&one, &two),
            Err(ProverError::UnsupportedSymbol(_))
        ));
    }

    #[test]
    fn uncached_oracle_agrees() {
        let oracle = EqualityOracle::without_cache(Arc::new(Pool::new(2)));
        let (a, b) = (atom("a"), atom("b"));
        let one = Formula::and(vec![a.clone(), b.clone()]);
        let two = Formula::and(vec![b.clone(), a.clone()]);
        assert_eq!(oracle.equal(&one, &two), Ok(true));
        assert_eq!(oracle.equal(&a, &b), Ok(false));
    }
}
