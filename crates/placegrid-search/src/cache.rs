//! In-memory cache of aggregate results.
//!
//! Each entry carries two expiry clocks: an absolute deadline fixed at insert
//! time and a sliding window renewed on every hit. Whichever runs out first
//! evicts the entry. Values are shared as `Arc`s and never mutated.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use placegrid_core::AggregateResult;
use tokio::time::Instant;

/// Expiry policy for one cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    /// Maximum lifetime from insertion.
    pub absolute: Duration,
    /// Maximum idle time between reads.
    pub sliding: Duration,
}

impl Default for Expiry {
    fn default() -> Self {
        Self {
            absolute: Duration::from_secs(300),
            sliding: Duration::from_secs(120),
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    value: Arc<AggregateResult>,
    expires_at: Instant,
    sliding: Duration,
    last_access: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at || now.duration_since(self.last_access) >= self.sliding
    }
}

/// Concurrent fingerprint-to-result map safe to share across requests.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: DashMap<String, CacheEntry>,
}

impl ResultCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live value for `key` and renews its sliding window.
    pub fn get(&self, key: &str) -> Option<Arc<AggregateResult>> {
        let now = Instant::now();
        if let Some(mut entry) = self.entries.get_mut(key) {
            if !entry.is_expired(now) {
                entry.last_access = now;
                return Some(Arc::clone(&entry.value));
            }
        }
        // Guard dropped above; re-check so a fresh concurrent insert survives.
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    /// Stores `value` under `key`, replacing any previous entry, and sweeps
    /// out anything that has expired.
    pub fn insert(&self, key: String, value: Arc<AggregateResult>, expiry: Expiry) {
        let now = Instant::now();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + expiry.absolute,
                sliding: expiry.sliding,
                last_access: now,
            },
        );
    }

    /// Number of entries that have not expired yet.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|entry| !entry.value().is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
