//! Pipeline configuration.
//!
//! Everything the pipeline needs is passed in explicitly through
//! [`SpritsitConfig`]; there is no process-wide settings object.
//!
//! # Example
//!
//! ```rust
//! use spritsit_core::{RemoteConfig, SpritsitConfig};
//!
//! let config = SpritsitConfig::builder()
//!     .max_word_len(30)
//!     .remote(RemoteConfig::new("https://reader.example/api/parser", "secret"))
//!     .timeout(10)
//!     .build();
//! assert_eq!(config.max_word_len, 30);
//! assert_eq!(config.fetch.timeout, 10);
//! ```

use crate::lang::DEFAULT_LANG;
use crate::normalize::DEFAULT_MAX_WORD_LEN;

/// Default prefix for the PDF preprocessing redirect.
pub const DEFAULT_PREPROCESS_URL: &str = "https://docs.google.com/viewer?embedded=true&url=";

/// Default remote reader endpoint.
pub const DEFAULT_REMOTE_API_URL: &str = "https://www.readability.com/api/content/v1/parser";

/// HTTP client configuration for fetching source documents.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: "Mozilla/5.0 (compatible; Spritsit/1.0)".to_string() }
    }
}

/// Remote reader API endpoint and credentials.
#[derive(Clone)]
pub struct RemoteConfig {
    /// Endpoint receiving `url` and `token` query parameters.
    pub api_url: String,
    /// API token.
    pub token: String,
}

impl RemoteConfig {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self { api_url: api_url.into(), token: token.into() }
    }
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Configuration for the whole pipeline.
#[derive(Debug, Clone)]
pub struct SpritsitConfig {
    /// Words longer than this many chars get soft breaks (default: 24).
    pub max_word_len: usize,

    /// Language reported when detection fails (default: "en").
    pub fallback_lang: String,

    /// Prefix of the PDF preprocessing redirect; the encoded source URL is appended.
    pub preprocess_url: String,

    /// Remote reader API; `None` skips the remote attempt.
    pub remote: Option<RemoteConfig>,

    /// Source fetching options.
    pub fetch: FetchConfig,
}

impl Default for SpritsitConfig {
    fn default() -> Self {
        Self {
            max_word_len: DEFAULT_MAX_WORD_LEN,
            fallback_lang: DEFAULT_LANG.to_string(),
            preprocess_url: DEFAULT_PREPROCESS_URL.to_string(),
            remote: None,
            fetch: FetchConfig::default(),
        }
    }
}

impl SpritsitConfig {
    /// Creates a new builder for SpritsitConfig.
    pub fn builder() -> SpritsitConfigBuilder {
        SpritsitConfigBuilder::new()
    }
}

/// Builder for SpritsitConfig.
pub struct SpritsitConfigBuilder {
    config: SpritsitConfig,
}

impl SpritsitConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: SpritsitConfig::default() }
    }

    /// Sets the overlength word threshold.
    pub fn max_word_len(mut self, value: usize) -> Self {
        self.config.max_word_len = value;
        self
    }

    /// Sets the fallback language.
    pub fn fallback_lang(mut self, value: impl Into<String>) -> Self {
        self.config.fallback_lang = value.into();
        self
    }

    /// Sets the PDF preprocessing redirect prefix.
    pub fn preprocess_url(mut self, value: impl Into<String>) -> Self {
        self.config.preprocess_url = value.into();
        self
    }

    /// Enables the remote reader.
    pub fn remote(mut self, value: RemoteConfig) -> Self {
        self.config.remote = Some(value);
        self
    }

    /// Sets the HTTP timeout in seconds.
    pub fn timeout(mut self, value: u64) -> Self {
        self.config.fetch.timeout = value;
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    /// Builds the config.
    pub fn build(self) -> SpritsitConfig {
        self.config
    }
}

impl Default for SpritsitConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpritsitConfig::default();
        assert_eq!(config.max_word_len, 24);
        assert_eq!(config.fallback_lang, "en");
        assert!(config.remote.is_none());
        assert_eq!(config.fetch.timeout, 30);
        assert!(config.fetch.user_agent.contains("Spritsit"));
    }

    #[test]
    fn test_builder() {
        let config = SpritsitConfig::builder()
            .max_word_len(12)
            .fallback_lang("fr")
            .preprocess_url("https://pdf.example/?src=")
            .user_agent("test-agent")
            .build();

        assert_eq!(config.max_word_len, 12);
        assert_eq!(config.fallback_lang, "fr");
        assert_eq!(config.preprocess_url, "https://pdf.example/?src=");
        assert_eq!(config.fetch.user_agent, "test-agent");
    }

    #[test]
    fn test_remote_token_is_redacted() {
        let remote = RemoteConfig::new("https://api.example", "hunter2");
        let debug = format!("{remote:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("api.example"));
    }
}
