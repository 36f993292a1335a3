//! Wire types for the StyleTalk backend API.
//!
//! Field sets mirror the backend's JSON contracts. `cached` and
//! `cache_hit_count` are additive fields on cacheable responses: absent
//! on fresh network results, set when a payload is served from cache.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request body for `/api/tone/shift` and `/api/tone/quick-shift`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneShiftRequest {
    pub text: String,
    pub target_tone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_meaning: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Whether the backend should consult its own server-side cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_cache: Option<bool>,
}

impl ToneShiftRequest {
    pub fn new(text: impl Into<String>, target_tone: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_tone: target_tone.into(),
            context: None,
            preserve_meaning: None,
            temperature: None,
            use_cache: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Token accounting reported by the backend's AI provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Response from the tone-shift endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneShiftResponse {
    pub success: bool,
    pub original_text: String,
    pub transformed_text: String,
    pub target_tone: String,
    #[serde(default)]
    pub tone_description: String,
    #[serde(default)]
    pub model_used: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_hit_count: Option<u64>,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToneShiftResponse {
    /// Whether this payload was served from a cache rather than computed.
    pub fn is_cached(&self) -> bool {
        self.cached == Some(true)
    }
}

/// Request body for `/api/text/rewrite`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRewriteRequest {
    pub text: String,
    pub tone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_cache: Option<bool>,
}

impl TextRewriteRequest {
    pub fn new(text: impl Into<String>, tone: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: tone.into(),
            use_cache: None,
        }
    }
}

/// Response from `/api/text/rewrite`: one rewritten variant plus detected
/// emotion and intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRewriteResponse {
    pub success: bool,
    pub original: String,
    pub rewritten: String,
    pub tone: String,
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub intent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_hit_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TextRewriteResponse {
    pub fn is_cached(&self) -> bool {
        self.cached == Some(true)
    }
}

/// Request body for `/api/text/rewrite-multiple`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRewriteMultipleRequest {
    pub text: String,
    pub tones: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_cache: Option<bool>,
}

/// One tone variant in a multi-tone rewrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextVariation {
    pub tone: String,
    pub rewritten: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_hit_count: Option<u64>,
}

/// Response from `/api/text/rewrite-multiple`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRewriteMultipleResponse {
    pub success: bool,
    pub original: String,
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub total_variations: usize,
    #[serde(default)]
    pub variations: Vec<TextVariation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response from `/api/tone/tones`: tone id mapped to its description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableTonesResponse {
    pub success: bool,
    pub tones: BTreeMap<String, String>,
    pub total: usize,
}

/// Response from `/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}
