//! Optimistic transactions over a shared map
//!
//! A transaction buffers reads, writes and erasures against a map behind a
//! read/write lock. Reads go through the buffers first (writes, then
//! erasures, then the read cache) and fall back to the backing map under a
//! shared lock, memoizing what they saw. Nothing reaches the backing map
//! until `commit`.
//!
//! Commit applies the buffered changes under the exclusive lock while
//! recording the displaced value of every touched key, then hands a fresh
//! tester transaction to the caller's validator. A rejected validation
//! restores the displaced values and fails with the conflict error; the
//! caller decides how often to retry.

use crate::error::SyncError;
use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use std::hash::Hash;

/// A map shared between threads, mutated through transactions
pub struct SharedMap<K, V> {
    map: RwLock<IndexMap<K, V>>,
}

impl<K, V> SharedMap<K, V>
where
    K: Copy + Eq + Hash,
    V: Copy + PartialEq,
{
    pub fn new() -> Self {
        SharedMap { map: RwLock::new(IndexMap::new()) }
    }

    pub fn begin(&self) -> Transaction<'_, K, V> {
        Transaction {
            backing: self,
            reads: IndexMap::new(),
            writes: IndexMap::new(),
            counts: IndexMap::new(),
            erases: IndexSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }

    /// Copy of the current backing state
    pub fn snapshot(&self) -> IndexMap<K, V> {
        self.map.read().clone()
    }
}

impl<K, V> Default for SharedMap<K, V>
where
    K: Copy + Eq + Hash,
    V: Copy + PartialEq,
{
    fn default() -> Self {
        SharedMap::new()
    }
}

/// One transaction against a `SharedMap`
pub struct Transaction<'a, K, V> {
    backing: &'a SharedMap<K, V>,
    reads: IndexMap<K, V>,
    writes: IndexMap<K, V>,
    counts: IndexMap<K, bool>,
    erases: IndexSet<K>,
}

impl<K, V> Transaction<'_, K, V>
where
    K: Copy + Eq + Hash,
    V: Copy + PartialEq,
{
    /// Read through writes, erasures and the read cache, then the backing
    /// map under a shared lock.
    pub fn get(&mut self, key: K) -> Option<V> {
        if let Some(&value) = self.writes.get(&key) {
            return Some(value);
        }
        if self.erases.contains(&key) {
            return None;
        }
        if let Some(&value) = self.reads.get(&key) {
            return Some(value);
        }
        let fetched = self.backing.map.read().get(&key).copied();
        if let Some(value) = fetched {
            self.reads.insert(key, value);
        }
        self.counts.insert(key, fetched.is_some());
        fetched
    }

    pub fn set(&mut self, key: K, value: V) {
        self.erases.swap_remove(&key);
        self.writes.insert(key, value);
    }

    pub fn erase(&mut self, key: K) {
        self.writes.swap_remove(&key);
        self.erases.insert(key);
    }

    /// Whether the key is present, memoizing backing lookups.
    pub fn contains(&mut self, key: K) -> bool {
        if self.writes.contains_key(&key) {
            return true;
        }
        if self.erases.contains(&key) {
            return false;
        }
        if let Some(&present) = self.counts.get(&key) {
            return present;
        }
        let present = self.backing.map.read().contains_key(&key);
        self.counts.insert(key, present);
        present
    }

    pub fn size(&self) -> usize {
        self.backing.map.read().len() - self.erases.len() + self.writes.len()
    }

    /// Entries as this transaction sees them: writes first, then cached
    /// reads, then backing entries, each key exactly once.
    pub fn entries(&self) -> Vec<(K, V)> {
        let mut visited = Vec::new();
        for (&key, &value) in &self.writes {
            visited.push((key, value));
        }
        for (&key, &value) in &self.reads {
            if self.writes.contains_key(&key) || self.erases.contains(&key) {
                continue;
            }
            visited.push((key, value));
        }
        let map = self.backing.map.read();
        for (&key, &value) in map.iter() {
            if self.writes.contains_key(&key)
                || self.erases.contains(&key)
                || self.reads.contains_key(&key)
            {
                continue;
            }
            visited.push((key, value));
        }
        visited
    }

    /// Apply the buffered changes, then let `validator` inspect the live
    /// map through a tester transaction. Rejection restores every
    /// displaced entry and fails with the conflict error.
    pub fn commit(
        self,
        validator: impl FnOnce(&mut Transaction<'_, K, V>) -> bool,
    ) -> Result<(), SyncError> {
        let mut displaced: IndexMap<K, Option<V>> = IndexMap::new();
        {
            let mut map = self.backing.map.write();
            for (&key, &value) in &self.writes {
                let previous = map.insert(key, value);
                displaced.entry(key).or_insert(previous);
            }
            for &key in &self.erases {
                let previous = map.swap_remove(&key);
                displaced.entry(key).or_insert(previous);
            }
        }

        let mut tester = self.backing.begin();
        if validator(&mut tester) {
            return Ok(());
        }

        let mut map = self.backing.map.write();
        for (key, previous) in displaced {
            match previous {
                Some(value) => {
                    map.insert(key, value);
                }
                None => {
                    map.swap_remove(&key);
                }
            }
        }
        Err(SyncError::TransactionConflict)
    }
}
