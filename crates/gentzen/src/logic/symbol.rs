//! Logical symbols
//!
//! A symbol is an immutable atom carrying a display name and a class
//! (connective, relation or quantifier). The fixed catalogue below covers
//! the connectives understood by the prover; `Symbol::proposition` mints
//! fresh nullary connectives for use as propositional atoms.

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::hash::Hasher;

/// Classification of a symbol, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolClass {
    Connective,
    Relation,
    Quantifier,
}

/// An immutable symbol: display name plus class.
///
/// Equality and hashing cover both fields, so a relation and a connective
/// with the same name stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    name: Cow<'static, str>,
    class: SymbolClass,
}

impl Symbol {
    pub const fn connective(name: &'static str) -> Self {
        Symbol { name: Cow::Borrowed(name), class: SymbolClass::Connective }
    }

    pub const fn relation(name: &'static str) -> Self {
        Symbol { name: Cow::Borrowed(name), class: SymbolClass::Relation }
    }

    pub const fn quantifier(name: &'static str) -> Self {
        Symbol { name: Cow::Borrowed(name), class: SymbolClass::Quantifier }
    }

    /// Mint a propositional atom: a connective that takes no children.
    pub fn proposition(name: &str) -> Self {
        Symbol { name: Cow::Owned(name.to_owned()), class: SymbolClass::Connective }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> SymbolClass {
        self.class
    }

    pub fn is_connective(&self) -> bool {
        self.class == SymbolClass::Connective
    }

    pub fn is_relation(&self) -> bool {
        self.class == SymbolClass::Relation
    }

    pub fn is_quantifier(&self) -> bool {
        self.class == SymbolClass::Quantifier
    }

    /// Content hash, stable across processes and runs.
    pub fn stable_hash(&self, seed: u64) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write_u64(seed);
        hasher.write_u8(match self.class {
            SymbolClass::Connective => 0,
            SymbolClass::Relation => 1,
            SymbolClass::Quantifier => 2,
        });
        hasher.write(self.name.as_bytes());
        hasher.finish()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub const NOT: Symbol = Symbol::connective("¬");

pub const AND: Symbol = Symbol::connective("∧");
pub const OR: Symbol = Symbol::connective("∨");
pub const NAND: Symbol = Symbol::connective("⊼");
pub const NOR: Symbol = Symbol::connective("⊽");

pub const XOR: Symbol = Symbol::connective("⊻");
pub const NXOR: Symbol = Symbol::connective("⩝");
pub const EQUIV: Symbol = Symbol::connective("↔");
pub const NEQUIV: Symbol = Symbol::connective("↮");

pub const IMPL: Symbol = Symbol::connective("→");
pub const NIMPL: Symbol = Symbol::connective("↛");
pub const RIMPL: Symbol = Symbol::connective("←");
pub const NRIMPL: Symbol = Symbol::connective("↚");

pub const TRUE: Symbol = Symbol::connective("⊤");
pub const FALSE: Symbol = Symbol::connective("⊥");
pub const ID: Symbol = Symbol::connective("⍳");

pub const FORALL: Symbol = Symbol::quantifier("∀");
pub const EXISTS: Symbol = Symbol::quantifier("∃");

pub const IDENT: Symbol = Symbol::relation("≡");
pub const NIDENT: Symbol = Symbol::relation("≢");
pub const EQUAL: Symbol = Symbol::relation("=");
pub const NEQUAL: Symbol = Symbol::relation("≠");

pub const PRED: Symbol = Symbol::relation("<");
pub const SUCC: Symbol = Symbol::relation(">");
pub const EPRED: Symbol = Symbol::relation("≤");
pub const ESUCC: Symbol = Symbol::relation("≥");
pub const NPRED: Symbol = Symbol::relation("≮");
pub const NSUCC: Symbol = Symbol::relation("≯");
