use thiserror::Error;

/// Unified error type for the StyleTalk client.
///
/// Storage faults inside the response cache never surface here: the cache
/// recovers them locally and the only visible effect is a colder cache.
/// These variants cover the network boundary and construction-time
/// configuration.
#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
        }
    }

    /// Whether this error carries an HTTP status from the backend.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
