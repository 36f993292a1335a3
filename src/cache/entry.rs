//! Persisted cache entry and statistics.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// One stored record: a cached response payload plus bookkeeping metadata.
///
/// Serialized as JSON under its own key in the backend. The `key` is the
/// identity: at most one entry exists per derived key at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    /// The successful upstream payload, stored verbatim.
    pub response: Value,
    /// Creation time in epoch milliseconds. Immutable after insertion;
    /// a fresh write for the same key creates a new entry with a new
    /// timestamp.
    pub timestamp: u64,
    /// Number of cache-hit reads served from this entry. Monotonically
    /// non-decreasing; resets only when the entry is recreated.
    pub hit_count: u64,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, response: Value) -> Self {
        Self {
            key: key.into(),
            response,
            timestamp: now_ms(),
            hit_count: 0,
        }
    }

    /// Expiry check: `now - timestamp > ttl`.
    pub fn is_expired(&self, ttl_ms: u64) -> bool {
        now_ms().saturating_sub(self.timestamp) > ttl_ms
    }
}

/// Aggregate statistics over the valid entries of one cache namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub total_hits: u64,
    /// Timestamp (epoch ms) of the oldest valid entry, if any exist.
    pub oldest_entry: Option<u64>,
    /// Timestamp (epoch ms) of the newest valid entry, if any exist.
    pub newest_entry: Option<u64>,
}

/// Milliseconds since the Unix epoch.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
