//! Tenor GIF search client.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

use super::cache::GifCache;
use crate::{Error, Result};

const TENOR_BASE_URL: &str = "https://tenor.googleapis.com/v2";

/// Curated search queries per tone. Unknown tones fall back to `casual`.
static TONE_QUERIES: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    map.insert("formal", &["professional", "business", "handshake", "office"]);
    map.insert("casual", &["happy", "thumbs up", "smile", "friendly"]);
    map.insert("genz", &["fire", "vibes", "mood", "cool", "lit"]);
    map.insert("concise", &["fast", "quick", "lightning", "speed"]);
    map.insert("detailed", &["thinking", "explaining", "reading", "study"]);
    map.insert("grammar", &["correct", "checkmark", "success", "perfect"]);
    map.insert("neutral", &["thumbs up", "okay", "good", "nice"]);
    map.insert("translation", &["world", "languages", "travel", "hello"]);
    map
});

/// One GIF result in the shape StyleTalk surfaces to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenorGif {
    pub id: String,
    pub url: String,
    /// Smaller rendition for previews: tinygif, falling back to nanogif,
    /// falling back to the full gif.
    pub preview: String,
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    id: String,
    #[serde(default)]
    title: String,
    media_formats: MediaFormats,
}

#[derive(Deserialize, Default)]
struct MediaFormats {
    gif: Option<MediaFormat>,
    tinygif: Option<MediaFormat>,
    nanogif: Option<MediaFormat>,
}

#[derive(Deserialize)]
struct MediaFormat {
    url: String,
    #[serde(default)]
    dims: Vec<u32>,
}

impl SearchResult {
    /// Results without a full-size gif rendition are dropped.
    fn into_gif(self) -> Option<TenorGif> {
        let gif = self.media_formats.gif?;
        let preview = self
            .media_formats
            .tinygif
            .or(self.media_formats.nanogif)
            .map(|f| f.url)
            .unwrap_or_else(|| gif.url.clone());
        Some(TenorGif {
            id: self.id,
            url: gif.url,
            preview,
            title: self.title,
            width: gif.dims.first().copied().unwrap_or(0),
            height: gif.dims.get(1).copied().unwrap_or(0),
        })
    }
}

/// Client for the Tenor v2 search API.
///
/// Search results are memoized in a [`GifCache`] for the process
/// lifetime; the featured feed is not, since it changes between calls.
pub struct TenorClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    cache: GifCache,
    query_cursor: AtomicUsize,
}

impl TenorClient {
    /// Build a client with the API key resolved from the OS keyring
    /// (`styletalk`/`tenor`), then the `TENOR_API_KEY` environment
    /// variable.
    pub fn new() -> Result<Self> {
        let api_key = resolve_api_key().ok_or_else(|| {
            Error::configuration("Tenor API key not found (keyring or TENOR_API_KEY)")
        })?;
        Ok(Self::with_api_key(api_key))
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: TENOR_BASE_URL.to_string(),
            api_key: api_key.into(),
            cache: GifCache::new(),
            query_cursor: AtomicUsize::new(0),
        }
    }

    /// Override the API base URL. Intended for tests against a mock
    /// server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Search GIFs matching a tone, memoized per (tone, limit).
    ///
    /// Each call on a cold key rotates to the next curated query for the
    /// tone, so repeated sessions see variety without a RNG.
    pub async fn search_by_tone(&self, tone: &str, limit: usize) -> Result<Vec<TenorGif>> {
        let cache_key = GifCache::key("tone", tone, limit);
        if let Some(gifs) = self.cache.get(&cache_key) {
            debug!(tone, "gif cache hit");
            return Ok(gifs);
        }

        let queries = TONE_QUERIES
            .get(tone)
            .copied()
            .unwrap_or_else(|| TONE_QUERIES["casual"]);
        let query = queries[self.query_cursor.fetch_add(1, Ordering::Relaxed) % queries.len()];
        debug!(tone, query, "searching gifs");

        let limit_s = limit.to_string();
        let gifs = self
            .fetch(
                "/search",
                &[
                    ("q", query),
                    ("limit", &limit_s),
                    ("media_filter", "gif,tinygif"),
                    ("contentfilter", "medium"),
                ],
            )
            .await?;
        self.cache.insert(cache_key, gifs.clone());
        Ok(gifs)
    }

    /// Free-text GIF search, memoized per (query, limit).
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<TenorGif>> {
        let cache_key = GifCache::key("custom", query, limit);
        if let Some(gifs) = self.cache.get(&cache_key) {
            debug!(query, "gif cache hit");
            return Ok(gifs);
        }

        let limit_s = limit.to_string();
        let gifs = self
            .fetch(
                "/search",
                &[
                    ("q", query),
                    ("limit", &limit_s),
                    ("media_filter", "gif,tinygif"),
                ],
            )
            .await?;
        self.cache.insert(cache_key, gifs.clone());
        Ok(gifs)
    }

    /// Trending GIFs. Not memoized: the featured feed changes between
    /// calls.
    pub async fn featured(&self, limit: usize) -> Result<Vec<TenorGif>> {
        let limit_s = limit.to_string();
        self.fetch(
            "/featured",
            &[("limit", &limit_s), ("media_filter", "gif,tinygif")],
        )
        .await
    }

    /// Drop every memoized search result.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Number of memoized lookups.
    pub fn cached_lookups(&self) -> usize {
        self.cache.len()
    }

    async fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<TenorGif>> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())]);
        for (k, v) in params {
            request = request.query(&[(k, v)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: format!("Tenor API error: {}", status),
            });
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed
            .results
            .into_iter()
            .filter_map(SearchResult::into_gif)
            .collect())
    }
}

fn resolve_api_key() -> Option<String> {
    if let Ok(entry) = keyring::Entry::new("styletalk", "tenor") {
        if let Ok(key) = entry.get_password() {
            return Some(key);
        }
    }
    std::env::var("TENOR_API_KEY").ok()
}
