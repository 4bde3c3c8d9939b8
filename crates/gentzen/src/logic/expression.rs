//! The term sub-language: variables and transparent references
//!
//! Expressions form the arguments of relation atoms. References share an
//! existing expression without copying it; every operation looks through
//! them, so a reference is indistinguishable from its target.

use crate::error::ViewError;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hasher;
use std::sync::Arc;

/// A named variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Mapping from variables to replacement expressions
pub type Substitution = HashMap<Variable, Expression>;

/// A term expression.
///
/// Function application is an extension point; the prover only exercises
/// variables and references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Variable(Variable),
    Reference(Arc<Expression>),
}

impl Expression {
    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(Variable::new(name))
    }

    pub fn reference(target: Expression) -> Self {
        Expression::Reference(Arc::new(target))
    }

    /// Follow reference chains to the underlying expression.
    fn resolve(&self) -> &Expression {
        let mut current = self;
        while let Expression::Reference(target) = current {
            current = target;
        }
        current
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.resolve(), Expression::Variable(_))
    }

    pub fn is_ground(&self) -> bool {
        match self.resolve() {
            Expression::Variable(_) => false,
            Expression::Reference(target) => target.is_ground(),
        }
    }

    pub fn free_variables(&self) -> HashSet<Variable> {
        match self.resolve() {
            Expression::Variable(variable) => HashSet::from([variable.clone()]),
            Expression::Reference(target) => target.free_variables(),
        }
    }

    /// Content hash, stable across runs and transparent to references.
    pub fn hash_seeded(&self, seed: u64) -> u64 {
        match self.resolve() {
            Expression::Variable(variable) => {
                let mut hasher = FxHasher::default();
                hasher.write_u64(seed);
                hasher.write(variable.name().as_bytes());
                hasher.finish()
            }
            Expression::Reference(target) => target.hash_seeded(seed),
        }
    }

    /// Syntactic structural equality, transparent to references.
    pub fn identical(&self, other: &Expression) -> bool {
        match (self.resolve(), other.resolve()) {
            (Expression::Variable(one), Expression::Variable(two)) => one == two,
            _ => false,
        }
    }

    /// Number of immediate children
    pub fn size(&self) -> usize {
        match self.resolve() {
            Expression::Variable(_) => 0,
            Expression::Reference(target) => target.size(),
        }
    }

    pub fn child(&self, index: usize) -> Result<Expression, ViewError> {
        match self.resolve() {
            Expression::Variable(_) => Err(ViewError::Index { index, len: 0 }),
            Expression::Reference(target) => target.child(index),
        }
    }

    pub fn count(&self, child: &Expression) -> usize {
        match self.resolve() {
            Expression::Variable(_) => 0,
            Expression::Reference(target) => target.count(child),
        }
    }

    pub fn substitute(&self, substitution: &Substitution) -> Expression {
        match self.resolve() {
            Expression::Variable(variable) => match substitution.get(variable) {
                Some(replacement) => replacement.clone(),
                None => self.clone(),
            },
            Expression::Reference(target) => target.substitute(substitution),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolve() {
            Expression::Variable(variable) => write!(f, "{}", variable),
            Expression::Reference(target) => write!(f, "{}", target),
        }
    }
}
