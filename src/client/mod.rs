//! 后端 API 客户端模块：在每次网络调用前后透明地查询和填充响应缓存。
//!
//! # Backend API Client Module
//!
//! Typed client for the StyleTalk backend. The cacheable endpoints
//! (tone shift, quick shift, text rewrite) consult an attached
//! [`crate::cache::ResponseCache`] before the network and store every
//! successful payload after it; the rest are plain passthroughs.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`StyleTalkClient`] | The API client |
//! | [`StyleTalkClientBuilder`] | Base URL, token, cache and timeout wiring |
//!
//! ## Example
//!
//! ```rust,no_run
//! use styletalk_client::cache::{MemoryBackend, ResponseCache};
//! use styletalk_client::types::ToneShiftRequest;
//! use styletalk_client::StyleTalkClient;
//! use std::sync::Arc;
//!
//! # async fn run() -> styletalk_client::Result<()> {
//! let client = StyleTalkClient::builder()
//!     .with_base_url("http://localhost:5000")
//!     .with_cache(ResponseCache::with_defaults(Arc::new(MemoryBackend::new())))
//!     .build()?;
//!
//! let request = ToneShiftRequest::new("hey, need that report", "formal");
//! let first = client.shift_tone(&request).await?; // network
//! let second = client.shift_tone(&request).await?; // cache, instant
//! assert!(second.is_cached());
//! # Ok(())
//! # }
//! ```

mod builder;
mod core;

pub use builder::StyleTalkClientBuilder;
pub use core::StyleTalkClient;
