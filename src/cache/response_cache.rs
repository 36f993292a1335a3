//! The response cache core.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::backend::CacheBackend;
use super::entry::{CacheEntry, CacheStats};
use super::key::CacheKeyGenerator;

/// Default maximum number of live entries.
pub const DEFAULT_MAX_ENTRIES: usize = 100;
/// Default entry time-to-live (30 days).
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

const DEFAULT_PREFIX: &str = "tone_cache";
const DEFAULT_VERSION: &str = "v1";

/// Configuration for a [`ResponseCache`].
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Namespace prefix distinguishing this cache's keys from unrelated
    /// data in the same backend.
    pub prefix: String,
    /// Format version embedded in every key. Bumping it orphans old
    /// entries instead of breaking on them; orphans drain via expiry,
    /// eviction or `clear`.
    pub version: String,
    pub max_entries: usize,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            version: DEFAULT_VERSION.to_string(),
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl: DEFAULT_TTL,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Client-side cache for successful rewrite responses.
///
/// Keeps at most one entry per logical request (normalized text + tone +
/// context), bounded in age by [`CacheConfig::ttl`] and in size by
/// [`CacheConfig::max_entries`]. Eviction is a least-frequently-used /
/// oldest-first hybrid: a single sort by `(hit_count, timestamp)` keeps
/// the entries that are both popular and recent.
///
/// Every operation fails open: storage faults are logged and degraded to
/// misses or no-ops, never returned to the caller.
pub struct ResponseCache {
    backend: Arc<dyn CacheBackend>,
    keygen: CacheKeyGenerator,
    config: CacheConfig,
}

impl ResponseCache {
    pub fn new(backend: Arc<dyn CacheBackend>, config: CacheConfig) -> Self {
        let keygen = CacheKeyGenerator::new(&config.prefix, &config.version);
        Self {
            backend,
            keygen,
            config,
        }
    }

    /// A cache over `backend` with the default namespace, TTL and capacity.
    pub fn with_defaults(backend: Arc<dyn CacheBackend>) -> Self {
        Self::new(backend, CacheConfig::default())
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Look up the cached response for a request.
    ///
    /// On a hit the entry's hit count is incremented and persisted, and a
    /// copy of the stored payload is returned with `cached: true` and
    /// `cache_hit_count` merged in. Expired and unparsable entries are
    /// removed on the way out and reported as misses.
    pub fn get(&self, text: &str, tone: &str, context: Option<&str>) -> Option<Value> {
        let key = self.keygen.generate(text, tone, context);
        let raw = match self.backend.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(backend = self.backend.name(), error = %e, "cache read failed, treating as miss");
                return None;
            }
        };
        let mut entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(%key, error = %e, "unparsable cache entry, dropping");
                self.remove_quietly(&key);
                return None;
            }
        };
        if entry.is_expired(self.ttl_ms()) {
            self.remove_quietly(&key);
            return None;
        }

        entry.hit_count += 1;
        match serde_json::to_string(&entry) {
            // A failed write loses this increment; the hit is still served.
            Ok(updated) => {
                if let Err(e) = self.backend.set(&key, &updated) {
                    warn!(%key, error = %e, "failed to persist hit count");
                }
            }
            Err(e) => warn!(%key, error = %e, "failed to serialize cache entry"),
        }
        debug!(%key, hits = entry.hit_count, "cache hit");
        Some(annotate(entry.response, entry.hit_count))
    }

    /// Store a successful response payload, unconditionally overwriting
    /// any entry for the same request. A fresh write resets the hit count
    /// and timestamp. Runs the capacity pass afterwards; storage faults
    /// make the whole call a logged no-op.
    pub fn set(&self, text: &str, tone: &str, response: &Value, context: Option<&str>) {
        let key = self.keygen.generate(text, tone, context);
        let entry = CacheEntry::new(key.clone(), response.clone());
        match serde_json::to_string(&entry) {
            Ok(raw) => {
                if let Err(e) = self.backend.set(&key, &raw) {
                    warn!(%key, error = %e, "cache write failed");
                    return;
                }
                debug!(%key, "stored response");
            }
            Err(e) => {
                warn!(%key, error = %e, "failed to serialize response");
                return;
            }
        }
        self.enforce_capacity();
    }

    /// Remove every entry in this cache's namespace, returning how many
    /// were removed. Keys outside the namespace are untouched.
    pub fn clear(&self) -> usize {
        let mut removed = 0;
        for key in self.namespace_keys() {
            if self.remove_quietly(&key) {
                removed += 1;
            }
        }
        debug!(removed, "cache cleared");
        removed
    }

    /// Remove expired and unparsable entries, returning how many were
    /// removed. Idempotent; safe to call at any time.
    pub fn cleanup_expired(&self) -> usize {
        let ttl_ms = self.ttl_ms();
        let mut removed = 0;
        for key in self.namespace_keys() {
            let stale = match self.backend.get(&key) {
                Ok(Some(raw)) => match serde_json::from_str::<CacheEntry>(&raw) {
                    Ok(entry) => entry.is_expired(ttl_ms),
                    Err(_) => true,
                },
                _ => false,
            };
            if stale && self.remove_quietly(&key) {
                removed += 1;
            }
        }
        debug!(removed, "expired cleanup");
        removed
    }

    /// Aggregate statistics over the valid entries in the namespace.
    /// Unparsable entries are skipped silently.
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        for key in self.namespace_keys() {
            let raw = match self.backend.get(&key) {
                Ok(Some(raw)) => raw,
                _ => continue,
            };
            let entry: CacheEntry = match serde_json::from_str(&raw) {
                Ok(entry) => entry,
                Err(_) => continue,
            };
            stats.total_entries += 1;
            stats.total_hits += entry.hit_count;
            stats.oldest_entry = Some(
                stats
                    .oldest_entry
                    .map_or(entry.timestamp, |t| t.min(entry.timestamp)),
            );
            stats.newest_entry = Some(
                stats
                    .newest_entry
                    .map_or(entry.timestamp, |t| t.max(entry.timestamp)),
            );
        }
        stats
    }

    /// Capacity pass run after every write: drop unparsable entries, then
    /// evict from the front of the `(hit_count, timestamp)` ascending
    /// order until the live count fits `max_entries`.
    fn enforce_capacity(&self) {
        let mut survivors: Vec<(String, u64, u64)> = Vec::new();
        for key in self.namespace_keys() {
            match self.backend.get(&key) {
                Ok(Some(raw)) => match serde_json::from_str::<CacheEntry>(&raw) {
                    Ok(entry) => survivors.push((key, entry.hit_count, entry.timestamp)),
                    Err(_) => {
                        self.remove_quietly(&key);
                    }
                },
                _ => {}
            }
        }
        if survivors.len() <= self.config.max_entries {
            return;
        }
        survivors.sort_by_key(|e| (e.1, e.2));
        let excess = survivors.len() - self.config.max_entries;
        for (key, _, _) in survivors.iter().take(excess) {
            self.remove_quietly(key);
        }
        debug!(evicted = excess, "capacity cleanup");
    }

    fn namespace_keys(&self) -> Vec<String> {
        let namespace = self.keygen.namespace();
        match self.backend.keys() {
            Ok(keys) => keys
                .into_iter()
                .filter(|k| k.starts_with(&namespace))
                .collect(),
            Err(e) => {
                warn!(backend = self.backend.name(), error = %e, "cache scan failed");
                Vec::new()
            }
        }
    }

    fn remove_quietly(&self, key: &str) -> bool {
        match self.backend.remove(key) {
            Ok(()) => true,
            Err(e) => {
                warn!(%key, error = %e, "cache remove failed");
                false
            }
        }
    }

    fn ttl_ms(&self) -> u64 {
        self.config.ttl.as_millis() as u64
    }
}

/// Merge the cache metadata fields into a copy of the payload. Non-object
/// payloads (not produced by any StyleTalk endpoint) pass through
/// unannotated.
fn annotate(mut response: Value, hit_count: u64) -> Value {
    if let Value::Object(ref mut map) = response {
        map.insert("cached".to_string(), Value::Bool(true));
        map.insert("cache_hit_count".to_string(), Value::from(hit_count));
    }
    response
}
