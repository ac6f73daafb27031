//! Remote reader API.
//!
//! The remote service answers `GET <api_url>?url=..&token=..` with a JSON
//! payload carrying readable HTML. Only the fields of [`RemotePayload`] are
//! read; anything else in the response is ignored. A failed attempt never
//! reaches the caller: it turns into an empty document so the pipeline can
//! fall back to local extraction.

use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use crate::config::RemoteConfig;
use crate::document::{CleanDocument, Direction};
use crate::fetch::RawSource;
use crate::{Result, SpritsitError};

/// Known fields of a remote reader response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemotePayload {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// Readable HTML.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    /// Any value other than `false`/`null` flags the payload as an error.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl RemotePayload {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(SpritsitError::from)
    }

    pub fn is_error(&self) -> bool {
        match &self.error {
            None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => false,
            Some(_) => true,
        }
    }

    /// Builds the document for `url` from this payload.
    ///
    /// An error payload yields an empty document; none of its fields are trusted.
    pub fn into_document(self, url: &str) -> CleanDocument {
        let mut doc = CleanDocument::new(url);
        if self.is_error() {
            return doc;
        }

        doc.offer_title(self.title);
        doc.offer_author(self.author);

        match self.direction.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("rtl") => doc.set_direction(Direction::Rtl),
            Some("ltr") => doc.set_direction(Direction::Ltr),
            _ => {}
        }

        if let Some(html) = self.content {
            doc.set_raw_html(html);
        }
        doc
    }
}

/// Builds the API request URL for `url`.
pub fn request_url(config: &RemoteConfig, url: &str) -> Result<Url> {
    Url::parse_with_params(&config.api_url, &[("url", url), ("token", config.token.as_str())])
        .map_err(|e| SpritsitError::InvalidUrl(format!("remote api url: {e}")))
}

/// Asks the remote reader for `url`.
///
/// Transport, HTTP, and decoding failures are logged and produce an empty
/// document.
pub async fn read_remote(source: &dyn RawSource, config: &RemoteConfig, url: &str) -> CleanDocument {
    match try_read_remote(source, config, url).await {
        Ok(doc) => doc,
        Err(err) => {
            warn!(url = %url, "Remote extraction failed: {err}");
            CleanDocument::new(url)
        }
    }
}

async fn try_read_remote(source: &dyn RawSource, config: &RemoteConfig, url: &str) -> Result<CleanDocument> {
    let request = request_url(config, url)?;
    let raw = source.fetch(request.as_str()).await?;
    let payload = RemotePayload::from_json(&raw.into_text()?)?;

    if payload.is_error() {
        info!(url = %url, "Remote reader flagged an error");
    }
    Ok(payload.into_document(url))
}
