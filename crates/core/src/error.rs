//! Error types for Spritsit operations.
//!
//! This module defines the main error type [`SpritsitError`] which represents
//! the failures a caller can observe from the pipeline. Several failure
//! classes never reach the caller: remote extraction errors, hyphenator
//! construction errors, and per-chunk extraction errors are recovered where
//! they occur and only logged.
//!
//! # Example
//!
//! ```rust
//! use spritsit_core::{SpritsitError, Result};
//!
//! fn require_html(html: &str) -> Result<&str> {
//!     if html.trim().is_empty() {
//!         return Err(SpritsitError::Extraction("empty input".to_string()));
//!     }
//!     Ok(html)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fetching, extraction, and normalization.
///
/// # Example
///
/// ```rust
/// use spritsit_core::SpritsitError;
///
/// let err = SpritsitError::UnsupportedContentType {
///     mime: "image/png".to_string(),
///     url: "https://example.com/cat.png".to_string(),
/// };
/// assert!(err.is_unsupported());
/// ```
#[derive(Error, Debug)]
pub enum SpritsitError {
    /// HTTP request errors from reqwest.
    ///
    /// Wraps network errors, DNS failures, connection issues, and other
    /// transport-level problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Non-success HTTP status from the source or the remote reader.
    #[error("HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The fetched resource is of a type the pipeline cannot handle.
    ///
    /// This is terminal: no fallback is attempted.
    #[error("Unsupported content type {mime:?} for {url}")]
    UnsupportedContentType { mime: String, url: String },

    /// Invalid character encoding.
    ///
    /// Returned when a local input is not valid UTF-8.
    #[error("Invalid character encoding")]
    InvalidEncoding,

    /// EPUB container could not be opened or read.
    #[error("EPUB error: {0}")]
    EpubError(String),

    /// The remote reader returned JSON that does not match the payload schema.
    #[error("Invalid remote payload: {0}")]
    RemotePayload(#[from] serde_json::Error),

    /// The boilerplate extractor failed on a chunk.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// Hyphenation dictionary could not be built for a language.
    #[error("No hyphenation dictionary for language {0:?}")]
    Hyphenation(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read and write errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output rendering errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SpritsitError {
    /// Whether this error means "the pipeline does not implement this content type".
    pub fn is_unsupported(&self) -> bool {
        matches!(self, SpritsitError::UnsupportedContentType { .. })
    }
}

/// Result type alias for SpritsitError.
pub type Result<T> = std::result::Result<T, SpritsitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpritsitError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_unsupported_content_type() {
        let err = SpritsitError::UnsupportedContentType {
            mime: "image/png".to_string(),
            url: "https://example.com/a.png".to_string(),
        };
        assert!(err.is_unsupported());
        assert!(err.to_string().contains("image/png"));
    }

    #[test]
    fn test_timeout_error() {
        let err = SpritsitError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
        assert!(!err.is_unsupported());
    }

    #[test]
    fn test_http_status_error() {
        let err = SpritsitError::HttpStatus { status: 404, url: "https://example.com".to_string() };
        assert!(err.to_string().contains("404"));
    }
}
