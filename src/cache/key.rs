//! Cache key derivation.

use serde::Serialize;

/// Canonical record serialized into the hashed key string. Field order is
/// fixed by the struct definition.
#[derive(Serialize)]
struct NormalizedRequest<'a> {
    text: &'a str,
    tone: &'a str,
    context: &'a str,
}

/// Derives storage keys of the form `<prefix>_<version>_<hash>` from
/// request parameters.
///
/// Text, tone and context are lower-cased and trimmed first, so requests
/// differing only in letter case or surrounding whitespace share a key.
/// The hash is a fast 32-bit polynomial hash, not a cryptographic one:
/// collisions are an accepted low-probability risk for a performance
/// cache, self-correcting on the next write or expiry.
#[derive(Debug, Clone)]
pub struct CacheKeyGenerator {
    prefix: String,
    version: String,
}

impl CacheKeyGenerator {
    pub fn new(prefix: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            version: version.into(),
        }
    }

    /// Derive the storage key for a request. Deterministic: equal
    /// normalized inputs always produce the same key.
    pub fn generate(&self, text: &str, tone: &str, context: Option<&str>) -> String {
        let text = normalize(text);
        let tone = normalize(tone);
        let context = normalize(context.unwrap_or(""));
        let record = NormalizedRequest {
            text: &text,
            tone: &tone,
            context: &context,
        };
        let canonical = serde_json::to_string(&record).unwrap_or_default();
        format!(
            "{}_{}_{}",
            self.prefix,
            self.version,
            hash32(&canonical).unsigned_abs()
        )
    }

    /// The namespace prefix shared by every key this generator produces,
    /// regardless of version. Used to scope scans and clears so unrelated
    /// stored data is never touched.
    pub fn namespace(&self) -> String {
        format!("{}_", self.prefix)
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// 32-bit polynomial hash: `h = h * 31 + char`, wrapping.
fn hash32(s: &str) -> i32 {
    let mut hash: i32 = 0;
    for c in s.chars() {
        hash = hash.wrapping_mul(31).wrapping_add(c as i32);
    }
    hash
}
