//! End-to-end derivability checks through the public API

use gentzen::logic::symbol;
use gentzen::{prove, prove_with, Expression, Formula, ProverConfig};

fn atom(name: &str) -> Formula {
    Formula::proposition(name)
}

#[test]
fn empty_sequent() {
    assert_eq!(prove(vec![], vec![]), Ok(true));
}

#[test]
fn axioms_and_non_axioms() {
    let (a, b) = (atom("a"), atom("b"));
    assert_eq!(prove(vec![a.clone()], vec![a.clone()]), Ok(true));
    assert_eq!(prove(vec![a.clone()], vec![b.clone()]), Ok(false));
    assert_eq!(prove(vec![a.clone()], vec![b.clone(), a.clone()]), Ok(true));
    assert_eq!(prove(vec![a.clone(), b], vec![a]), Ok(true));
}

#[test]
fn law_of_excluded_middle() {
    let a = atom("a");
    assert_eq!(prove(vec![], vec![a.clone() | !a]), Ok(true));
}

#[test]
fn modus_ponens() {
    let (a, b) = (atom("a"), atom("b"));
    assert_eq!(prove(vec![a.clone(), a << b.clone()], vec![b]), Ok(true));
}

#[test]
fn implication_is_transitive() {
    let (a, b, c) = (atom("a"), atom("b"), atom("c"));
    assert_eq!(
        prove(
            vec![a.clone() << b.clone(), b << c.clone()],
            vec![a << c]
        ),
        Ok(true)
    );
}

#[test]
fn converse_is_not_entailed() {
    let (a, b) = (atom("a"), atom("b"));
    assert_eq!(prove(vec![a.clone() << b.clone()], vec![b << a]), Ok(false));
}

#[test]
fn sugar_matches_the_longhand_constructors() {
    let (a, b) = (atom("a"), atom("b"));
    assert_eq!(
        prove(
            vec![a.clone() & b.clone()],
            vec![Formula::and(vec![a.clone(), b.clone()])]
        ),
        Ok(true)
    );
    assert_eq!(
        prove(vec![a.clone() | b.clone()], vec![Formula::or(vec![b, a])]),
        Ok(true)
    );
}

#[test]
fn conjunction_and_disjunction_interact() {
    let (a, b) = (atom("a"), atom("b"));
    assert_eq!(prove(vec![a.clone() & b.clone()], vec![a.clone()]), Ok(true));
    assert_eq!(prove(vec![a.clone() | b.clone()], vec![b.clone()]), Ok(false));
    assert_eq!(
        prove(vec![a.clone() | b.clone(), !a], vec![b]),
        Ok(true)
    );
}

#[test]
fn negation_swaps_sides() {
    let a = atom("a");
    assert_eq!(prove(vec![!a.clone(), a.clone()], vec![]), Ok(true));
    assert_eq!(prove(vec![], vec![!a.clone(), a]), Ok(true));
}

#[test]
fn truth_and_falsity_are_units() {
    assert_eq!(prove(vec![], vec![Formula::truth()]), Ok(true));
    assert_eq!(prove(vec![Formula::falsity()], vec![]), Ok(true));
    assert_eq!(prove(vec![atom("a")], vec![Formula::truth()]), Ok(true));
    assert_eq!(prove(vec![Formula::falsity()], vec![Formula::falsity()]), Ok(true));
}

#[test]
fn case_analysis() {
    let (a, b) = (atom("a"), atom("b"));
    assert_eq!(
        prove(
            vec![a.clone() << b.clone(), !a << b.clone()],
            vec![b]
        ),
        Ok(true)
    );
}

#[test]
fn conjunction_of_consequents() {
    let (a, b, c) = (atom("a"), atom("b"), atom("c"));
    assert_eq!(
        prove(
            vec![a.clone() << b.clone(), a.clone() << c.clone()],
            vec![a << (b & c)]
        ),
        Ok(true)
    );
}

#[test]
fn derivability_is_stable_under_permutation() {
    let (a, b, c) = (atom("a"), atom("b"), atom("c"));
    let gamma = vec![a.clone() << b.clone(), b.clone() << c.clone()];
    let delta = vec![a.clone() << c.clone(), atom("d")];

    let mut gamma_permuted = gamma.clone();
    gamma_permuted.reverse();
    let mut delta_permuted = delta.clone();
    delta_permuted.reverse();

    assert_eq!(prove(gamma.clone(), delta.clone()), Ok(true));
    assert_eq!(prove(gamma_permuted.clone(), delta.clone()), Ok(true));
    assert_eq!(prove(gamma, delta_permuted.clone()), Ok(true));
    assert_eq!(prove(gamma_permuted, delta_permuted), Ok(true));
}

#[test]
fn commutative_goals_close_through_the_oracle() {
    let (a, b) = (atom("a"), atom("b"));
    assert_eq!(
        prove(vec![a.clone() % b.clone()], vec![b.clone() % a.clone()]),
        Ok(true)
    );
    assert_eq!(
        prove(vec![a.clone() ^ b.clone()], vec![b ^ a]),
        Ok(true)
    );
}

#[test]
fn relation_atoms_close_only_on_identical_arguments() {
    let x = Expression::variable("x");
    let y = Expression::variable("y");
    let xx = Formula::relation(symbol::EQUAL, vec![x.clone(), x.clone()]).unwrap();
    let xx_again = Formula::relation(symbol::EQUAL, vec![x.clone(), x]).unwrap();
    let yy = Formula::relation(symbol::EQUAL, vec![y.clone(), y]).unwrap();

    assert_eq!(prove(vec![xx.clone()], vec![xx_again]), Ok(true));
    assert_eq!(prove(vec![xx], vec![yy]), Ok(false));
}

#[test]
fn currying_an_implication() {
    let (a, b, c) = (atom("a"), atom("b"), atom("c"));
    // ((a ∧ b) → c) ⊢ (a → (b → c))
    assert_eq!(
        prove(
            vec![(a.clone() & b.clone()) << c.clone()],
            vec![a << (b << c)]
        ),
        Ok(true)
    );
}

#[test]
fn reverse_implication_mirrors_implication() {
    let (a, b) = (atom("a"), atom("b"));
    // b → a and a ← b coincide.
    assert_eq!(
        prove(
            vec![b.clone() << a.clone()],
            vec![a.clone() >> b.clone()]
        ),
        Ok(true)
    );
    assert_eq!(prove(vec![a.clone() >> b.clone()], vec![b << a]), Ok(true));
}

#[test]
fn verdicts_match_without_the_cache() {
    let config = ProverConfig { use_cache: false, ..ProverConfig::default() };
    let (a, b) = (atom("a"), atom("b"));
    assert_eq!(
        prove_with(vec![a.clone(), a.clone() << b.clone()], vec![b.clone()], &config),
        Ok(true)
    );
    assert_eq!(prove_with(vec![a.clone()], vec![b], &config), Ok(false));
    assert_eq!(prove_with(vec![], vec![a.clone() | !a], &config), Ok(true));
}
