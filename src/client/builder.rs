//! Client construction.

use std::time::Duration;
use url::Url;

use super::core::StyleTalkClient;
use crate::cache::ResponseCache;
use crate::Result;

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`StyleTalkClient`].
pub struct StyleTalkClientBuilder {
    base_url: String,
    api_token: Option<String>,
    cache: Option<ResponseCache>,
    timeout: Duration,
}

impl StyleTalkClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            cache: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Bearer token attached to authenticated endpoints. When not set,
    /// the builder falls back to the OS keyring (`styletalk`/`backend`)
    /// and then the `STYLETALK_API_TOKEN` environment variable.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Attach a response cache. Without one, every call goes to the
    /// network.
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<StyleTalkClient> {
        let base_url = self.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;

        let http = reqwest::Client::builder().timeout(self.timeout).build()?;
        let api_token = self.api_token.or_else(resolve_api_token);
        Ok(StyleTalkClient::from_parts(
            http, base_url, api_token, self.cache,
        ))
    }
}

impl Default for StyleTalkClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_api_token() -> Option<String> {
    if let Ok(entry) = keyring::Entry::new("styletalk", "backend") {
        if let Ok(token) = entry.get_password() {
            return Some(token);
        }
    }
    std::env::var("STYLETALK_API_TOKEN").ok()
}
