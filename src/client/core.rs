//! StyleTalk backend API client.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::builder::StyleTalkClientBuilder;
use crate::cache::ResponseCache;
use crate::types::{
    AvailableTonesResponse, HealthStatus, TextRewriteMultipleRequest, TextRewriteMultipleResponse,
    TextRewriteRequest, TextRewriteResponse, ToneShiftRequest, ToneShiftResponse,
};
use crate::{Error, Result};

/// Typed client for the StyleTalk backend.
///
/// When a [`ResponseCache`] is attached, the cacheable endpoints consult
/// it before the network and store every successful payload after it.
/// Identical concurrent misses are not coalesced: both fetch, both
/// write, and the second write wins. That lost work is accepted for a
/// best-effort performance cache.
pub struct StyleTalkClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    cache: Option<ResponseCache>,
}

impl StyleTalkClient {
    pub fn builder() -> StyleTalkClientBuilder {
        StyleTalkClientBuilder::new()
    }

    pub(super) fn from_parts(
        http: reqwest::Client,
        base_url: String,
        api_token: Option<String>,
        cache: Option<ResponseCache>,
    ) -> Self {
        Self {
            http,
            base_url,
            api_token,
            cache,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The attached response cache, if any. Exposed so callers can
    /// surface stats or trigger cleanup from settings screens.
    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthStatus> {
        self.request(Method::GET, "/health", None::<&()>, false)
            .await
    }

    /// `POST /api/tone/shift`: tone-shift `text` into `target_tone`.
    ///
    /// A cache hit skips the network entirely and carries `cached: true`
    /// plus the running hit count.
    pub async fn shift_tone(&self, request: &ToneShiftRequest) -> Result<ToneShiftResponse> {
        self.cached_tone_call("/api/tone/shift", request, true).await
    }

    /// `POST /api/tone/quick-shift`: tone shift without the bearer
    /// token. The backend exposes this for unauthenticated extension
    /// use; caching behaves exactly as in [`Self::shift_tone`].
    pub async fn quick_shift(&self, request: &ToneShiftRequest) -> Result<ToneShiftResponse> {
        self.cached_tone_call("/api/tone/quick-shift", request, false)
            .await
    }

    /// `GET /api/tone/tones`: tone presets the backend supports.
    pub async fn available_tones(&self) -> Result<AvailableTonesResponse> {
        self.request(Method::GET, "/api/tone/tones", None::<&()>, false)
            .await
    }

    /// `POST /api/text/rewrite`: rewrite `text` in one tone with
    /// emotion/intent detection. Cached by (text, tone).
    pub async fn rewrite(&self, request: &TextRewriteRequest) -> Result<TextRewriteResponse> {
        if let Some(hit) = self.cache_lookup(&request.text, &request.tone, None) {
            return Ok(hit);
        }
        let response: TextRewriteResponse = self
            .request(Method::POST, "/api/text/rewrite", Some(request), false)
            .await?;
        if response.success && !response.is_cached() {
            self.cache_store(&request.text, &request.tone, None, &response);
        }
        Ok(response)
    }

    /// `POST /api/text/rewrite-multiple`: rewrite `text` in several
    /// tones with one backend call. The aggregate is not cached
    /// client-side; per-tone caching happens in [`Self::rewrite`].
    pub async fn rewrite_multiple(
        &self,
        request: &TextRewriteMultipleRequest,
    ) -> Result<TextRewriteMultipleResponse> {
        self.request(Method::POST, "/api/text/rewrite-multiple", Some(request), false)
            .await
    }

    /// Dashboard-style fan-out: one [`Self::rewrite`] per tone, issued
    /// concurrently. Results come back in tone order, each independently
    /// cached.
    pub async fn rewrite_variations(
        &self,
        text: &str,
        tones: &[&str],
    ) -> Vec<Result<TextRewriteResponse>> {
        let calls = tones.iter().map(|tone| {
            let request = TextRewriteRequest::new(text, *tone);
            async move { self.rewrite(&request).await }
        });
        futures::future::join_all(calls).await
    }

    /// `GET /api/tone/cache/stats`: statistics from the backend's own
    /// server-side cache (not the local one).
    pub async fn backend_cache_stats(&self) -> Result<Value> {
        self.request(Method::GET, "/api/tone/cache/stats", None::<&()>, true)
            .await
    }

    /// `DELETE /api/tone/cache/clear`: clear the backend's server-side
    /// cache for the authenticated user.
    pub async fn clear_backend_cache(&self) -> Result<Value> {
        self.request(Method::DELETE, "/api/tone/cache/clear", None::<&()>, true)
            .await
    }

    async fn cached_tone_call(
        &self,
        path: &str,
        request: &ToneShiftRequest,
        authed: bool,
    ) -> Result<ToneShiftResponse> {
        if let Some(hit) =
            self.cache_lookup(&request.text, &request.target_tone, request.context.as_deref())
        {
            return Ok(hit);
        }
        let response: ToneShiftResponse =
            self.request(Method::POST, path, Some(request), authed).await?;
        if response.success && !response.is_cached() {
            self.cache_store(
                &request.text,
                &request.target_tone,
                request.context.as_deref(),
                &response,
            );
        }
        Ok(response)
    }

    /// Consult the cache, deserializing the annotated payload into the
    /// endpoint's response type. A payload that no longer matches the
    /// expected shape (e.g. written by a different endpoint for the same
    /// text and tone) degrades to a miss.
    fn cache_lookup<T: DeserializeOwned>(
        &self,
        text: &str,
        tone: &str,
        context: Option<&str>,
    ) -> Option<T> {
        let cache = self.cache.as_ref()?;
        let hit = cache.get(text, tone, context)?;
        match serde_json::from_value(hit) {
            Ok(response) => Some(response),
            Err(e) => {
                debug!(error = %e, "cached payload shape mismatch, refetching");
                None
            }
        }
    }

    fn cache_store<T: Serialize>(&self, text: &str, tone: &str, context: Option<&str>, response: &T) {
        let cache = match &self.cache {
            Some(cache) => cache,
            None => return,
        };
        match serde_json::to_value(response) {
            Ok(payload) => cache.set(text, tone, &payload, context),
            Err(e) => debug!(error = %e, "response not serializable, skipping cache store"),
        }
    }

    async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        authed: bool,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(method, &url)
            .header("x-styletalk-request-id", Uuid::new_v4().to_string());
        if authed {
            if let Some(token) = &self.api_token {
                request = request.bearer_auth(token);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(Error::from);
        }

        // Error bodies carry `{"error": "..."}`; fall back to the status
        // line when the body is absent or not JSON.
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| format!("request failed with status {}", status));
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}
