//! Shared gate with explicit upgrade from shared to exclusive mode

use crate::error::SyncError;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A read/write gate whose guards can trade their shared hold for the
/// exclusive one.
///
/// The shared hold is released before the exclusive acquisition, so state
/// observed before an upgrade must be revalidated after it.
#[derive(Default)]
pub struct Gate {
    lock: RwLock<()>,
}

impl Gate {
    pub fn new() -> Self {
        Gate::default()
    }

    /// Enter in shared mode.
    pub fn enter(&self) -> GateGuard<'_> {
        GateGuard { lock: &self.lock, read: Some(self.lock.read()), write: None }
    }
}

pub struct GateGuard<'a> {
    lock: &'a RwLock<()>,
    read: Option<RwLockReadGuard<'a, ()>>,
    write: Option<RwLockWriteGuard<'a, ()>>,
}

impl GateGuard<'_> {
    pub fn is_upgraded(&self) -> bool {
        self.write.is_some()
    }

    /// Trade the shared hold for the exclusive one. Upgrading twice is a
    /// deadlock in the making and fails instead.
    pub fn upgrade(&mut self) -> Result<(), SyncError> {
        if self.write.is_some() {
            return Err(SyncError::AlreadyUpgraded);
        }
        self.read = None;
        self.write = Some(self.lock.write());
        Ok(())
    }

    /// Return to shared mode.
    pub fn downgrade(&mut self) -> Result<(), SyncError> {
        if self.write.is_none() {
            return Err(SyncError::NotUpgraded);
        }
        self.write = None;
        self.read = Some(self.lock.read());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrade_and_downgrade_round_trip() {
        let gate = Gate::new();
        let mut guard = gate.enter();
        assert!(!guard.is_upgraded());
        assert_eq!(guard.upgrade(), Ok(()));
        assert!(guard.is_upgraded());
        assert_eq!(guard.downgrade(), Ok(()));
        assert!(!guard.is_upgraded());
    }

    #[test]
    fn double_upgrade_is_refused() {
        let gate = Gate::new();
        let mut guard = gate.enter();
        assert_eq!(guard.upgrade(), Ok(()));
        assert_eq!(guard.upgrade(), Err(SyncError::AlreadyUpgraded));
    }

    #[test]
    fn downgrade_without_upgrade_is_refused() {
        let gate = Gate::new();
        let mut guard = gate.enter();
        assert_eq!(guard.downgrade(), Err(SyncError::NotUpgraded));
    }

    #[test]
    fn readers_share_the_gate() {
        let gate = Gate::new();
        let first = gate.enter();
        let second = gate.enter();
        assert!(!first.is_upgraded());
        assert!(!second.is_upgraded());
    }
}
