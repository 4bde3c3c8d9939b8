//! Shared-state primitives: the transactional map and the upgradeable gate

pub mod gate;
pub mod transaction;

pub use gate::{Gate, GateGuard};
pub use transaction::{SharedMap, Transaction};
