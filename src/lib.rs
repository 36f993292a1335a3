//! # styletalk-client
//!
//! StyleTalk 客户端库：本地响应缓存、后端 API 绑定与 GIF 推荐客户端。
//!
//! Client library for the StyleTalk tone-shifting assistant. The backend
//! rewrites user-authored text into a requested tone (formal, casual,
//! Gen-Z, ...) with grammar corrections and emoji suggestions; this crate
//! gives the browser extension and the web dashboard one shared way to
//! call it, and one shared cache in front of it.
//!
//! ## Core Philosophy
//!
//! - **Cache-First**: every cacheable call consults the local response
//!   cache before touching the network, and populates it afterwards
//! - **Fail-Open**: the cache never breaks the feature it optimizes;
//!   storage faults degrade to misses, never to errors
//! - **Pluggable Persistence**: the storage medium behind the cache is a
//!   trait, so tests run on an in-memory fake and applications pick a
//!   durable backend
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Normalized-key, TTL-expiring, capacity-bounded response cache |
//! | [`client`] | Typed client for the StyleTalk backend API |
//! | [`gif`] | Tenor GIF search with process-lifetime memoization |
//! | [`types`] | Request/response wire types |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use styletalk_client::cache::{MemoryBackend, ResponseCache};
//! use styletalk_client::types::ToneShiftRequest;
//! use styletalk_client::StyleTalkClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> styletalk_client::Result<()> {
//!     let cache = ResponseCache::with_defaults(Arc::new(MemoryBackend::new()));
//!     let client = StyleTalkClient::builder()
//!         .with_base_url("http://localhost:5000")
//!         .with_cache(cache)
//!         .build()?;
//!
//!     let request = ToneShiftRequest::new("hey, need that report asap", "formal");
//!     let shifted = client.shift_tone(&request).await?;
//!     println!("{}", shifted.transformed_text);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod gif;
pub mod types;

// Re-export main types for convenience
pub use cache::{CacheBackend, CacheConfig, CacheStats, JsonFileBackend, MemoryBackend, ResponseCache};
pub use client::{StyleTalkClient, StyleTalkClientBuilder};
pub use gif::{TenorClient, TenorGif};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::Error;
