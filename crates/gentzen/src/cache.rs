//! Union-find over formula identities with a memoized hash table
//!
//! Both tables are keyed by node address and sit behind the transaction
//! layer, so concurrent provers can query and merge equivalence classes
//! without coarse locking. Every operation retries a bounded number of
//! validation conflicts before surfacing the error.

use crate::error::SyncError;
use crate::sync::transaction::{SharedMap, Transaction};

const MAX_HASH_FAILURES: usize = 2;
const MAX_JOIN_FAILURES: usize = 4;
const MAX_FIND_FAILURES: usize = 4;

/// Equivalence classes of formula identities plus their cached hashes
pub struct CompareCache {
    hashes: SharedMap<usize, u64>,
    parents: SharedMap<usize, usize>,
}

impl CompareCache {
    pub fn new() -> Self {
        CompareCache { hashes: SharedMap::new(), parents: SharedMap::new() }
    }

    /// Memoized content hash for the node behind `key`; `compute` runs at
    /// most once per key that reaches the table.
    pub fn hash(&self, key: usize, compute: impl Fn() -> u64) -> Result<u64, SyncError> {
        let mut failures = 0;
        loop {
            let mut store = self.hashes.begin();
            let result = match store.get(key) {
                Some(found) => found,
                None => {
                    let fresh = compute();
                    store.set(key, fresh);
                    fresh
                }
            };
            match store.commit(|tester| tester.get(key) == Some(result)) {
                Ok(()) => return Ok(result),
                Err(error) => {
                    failures += 1;
                    if failures >= MAX_HASH_FAILURES {
                        return Err(error);
                    }
                }
            }
        }
    }

    /// Whether `one` and `two` already share a root. Both chains are
    /// compressed: every visited node is rewritten to its root.
    pub fn find(&self, one: usize, two: usize) -> Result<bool, SyncError> {
        let mut failures = 0;
        loop {
            let mut store = self.parents.begin();
            let root_one = Self::compress(&mut store, one);
            let root_two = Self::compress(&mut store, two);
            let result = root_one == root_two;
            match store
                .commit(|tester| tester.get(one) == Some(root_one) && tester.get(two) == Some(root_two))
            {
                Ok(()) => return Ok(result),
                Err(error) => {
                    failures += 1;
                    if failures > MAX_FIND_FAILURES {
                        return Err(error);
                    }
                }
            }
        }
    }

    fn compress(store: &mut Transaction<'_, usize, usize>, start: usize) -> usize {
        let mut node = start;
        let mut chain = vec![start];
        while let Some(parent) = store.get(node) {
            if parent == node {
                break;
            }
            node = parent;
            chain.push(node);
        }
        for visited in chain {
            store.set(visited, node);
        }
        node
    }

    /// Merge the classes of `one` and `two`. The higher key becomes the
    /// child, so roots are deterministic within a run.
    pub fn join(&self, one: usize, two: usize) -> Result<(), SyncError> {
        let mut failures = 0;
        loop {
            let mut store = self.parents.begin();
            let parent_one = match store.get(one) {
                Some(parent) => parent,
                None => {
                    store.set(one, one);
                    one
                }
            };
            let parent_two = match store.get(two) {
                Some(parent) => parent,
                None => {
                    store.set(two, two);
                    two
                }
            };
            if parent_one > parent_two {
                store.set(one, parent_two);
            } else if parent_two > parent_one {
                store.set(two, parent_one);
            }
            match store.commit(|tester| tester.get(one) == tester.get(two)) {
                Ok(()) => return Ok(()),
                Err(error) => {
                    failures += 1;
                    if failures >= MAX_JOIN_FAILURES {
                        return Err(error);
                    }
                }
            }
        }
    }
}

impl Default for CompareCache {
    fn default() -> Self {
        CompareCache::new()
    }
}
