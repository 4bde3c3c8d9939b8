//! Error types for the prover

use crate::logic::{Symbol, SymbolClass};
use thiserror::Error;

/// Errors raised by the collection views
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("index {index} out of range for view of length {len}")]
    Index { index: usize, len: usize },

    #[error("iterators address different views")]
    ForeignIterator,

    #[error("zipped views differ in length ({left} vs {right})")]
    Length { left: usize, right: usize },
}

/// Errors raised by the locking and transaction layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The validator rejected a commit; callers retry up to their budget.
    #[error("transaction validation failed")]
    TransactionConflict,

    /// Upgrading a gate guard that already holds the exclusive lock.
    #[error("gate is already upgraded")]
    AlreadyUpgraded,

    /// Downgrading a gate guard that holds no exclusive lock.
    #[error("gate is not upgraded")]
    NotUpgraded,
}

/// Top-level error type of the prover
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProverError {
    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    /// A formula was constructed with a symbol of the wrong class.
    #[error("symbol {symbol} cannot head a {expected:?} node")]
    MalformedFormula { symbol: Symbol, expected: SymbolClass },

    /// The operation has no rule for this symbol.
    #[error("unsupported symbol {0}")]
    UnsupportedSymbol(Symbol),

    #[error("internal invariant violated: {0}")]
    Internal(&'static str),
}

pub type Result<T> = std::result::Result<T, ProverError>;
