//! Small time-to-live cache for backend metadata.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;
use std::time::Duration;
use tokio::time::Instant;

struct CachedValue<V> {
    value: V,
    stored_at: Instant,
}

/// Map whose entries expire `ttl` after insertion. A zero TTL disables it.
///
/// A poisoned lock is treated as a miss.
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CachedValue<V>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Creates an empty cache.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns a fresh value for `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        if self.ttl.is_zero() {
            return None;
        }
        let entries = self.entries.read().ok()?;
        entries
            .get(key)
            .filter(|cached| cached.stored_at.elapsed() < self.ttl)
            .map(|cached| cached.value.clone())
    }

    /// Stores `value` under `key`.
    pub fn insert(&self, key: K, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|_, cached| cached.stored_at.elapsed() < self.ttl);
            entries.insert(
                key,
                CachedValue {
                    value,
                    stored_at: Instant::now(),
                },
            );
        }
    }

    /// Drops every entry.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}
