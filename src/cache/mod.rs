//! 响应缓存模块：在昂贵的后端调用前提供本地的、带过期与容量上限的结果缓存。
//!
//! # Response Caching Module
//!
//! This module provides the client-side response cache that sits in front
//! of expensive network calls to the StyleTalk backend. One entry is kept
//! per distinct request; entries expire after a configurable TTL and the
//! live set is bounded by a configurable capacity.
//!
//! ## Overview
//!
//! Caching is valuable for:
//! - Skipping duplicate rewrite requests entirely (instant responses)
//! - Reducing backend load and AI-provider costs
//! - Surfacing a per-entry hit count the UI can display
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ResponseCache`] | The cache core: get/set, expiry, hit counting, eviction |
//! | [`CacheConfig`] | Namespace, version, TTL and capacity configuration |
//! | [`CacheBackend`] | Trait for the underlying key/value medium |
//! | [`MemoryBackend`] | In-memory backend for tests and ephemeral sessions |
//! | [`JsonFileBackend`] | Persistent single-file JSON backend |
//! | [`CacheKeyGenerator`] | Deterministic key derivation from request parameters |
//! | [`CacheStats`] | Aggregate entry/hit statistics |
//!
//! ## Example
//!
//! ```rust
//! use styletalk_client::cache::{CacheConfig, MemoryBackend, ResponseCache};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let backend = Arc::new(MemoryBackend::new());
//! let config = CacheConfig::new()
//!     .with_max_entries(200)
//!     .with_ttl(Duration::from_secs(7 * 24 * 60 * 60));
//! let cache = ResponseCache::new(backend, config);
//!
//! cache.set("Hello World", "formal", &serde_json::json!({"ok": true}), None);
//! // Case and surrounding whitespace do not matter:
//! assert!(cache.get("  hello world ", "FORMAL", None).is_some());
//! ```
//!
//! ## Failure semantics
//!
//! The cache fails open. Every storage-layer fault (unavailable medium,
//! quota, corrupted entries) is caught, logged via `tracing`, and degraded
//! to a miss, a no-op or a zero count. No cache operation ever returns an
//! error to its caller.

mod backend;
mod entry;
mod key;
mod response_cache;

pub use backend::{CacheBackend, JsonFileBackend, MemoryBackend, StoreError, StoreResult};
pub use entry::{CacheEntry, CacheStats};
pub use key::CacheKeyGenerator;
pub use response_cache::{CacheConfig, ResponseCache, DEFAULT_MAX_ENTRIES, DEFAULT_TTL};
