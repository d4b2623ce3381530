//! Per-key async mutexes.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A table of mutexes, one per key, created on first use.
///
/// Holders of different keys never wait on each other. The table only grows;
/// keys are credit limits, which are never removed.
#[derive(Debug)]
pub struct KeyedLocks<K: Eq + Hash> {
    slots: DashMap<K, Arc<Mutex<()>>>,
}

impl<K: Eq + Hash> KeyedLocks<K> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Waits for exclusive access to `key`.
    ///
    /// The shard guard of the map is released before awaiting, so a slow
    /// holder never blocks lookups of other keys.
    pub async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        let slot = Arc::clone(&self.slots.entry(key).or_default());
        slot.lock_owned().await
    }

    /// Number of keys that have been locked at least once.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no key has been locked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<K: Eq + Hash> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self::new()
    }
}
