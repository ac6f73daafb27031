//! Raw content fetching from URLs, files, and stdin.
//!
//! Every source yields a [`RawContent`]: the body plus its classification
//! (`html`, `epub`, `pdf`, `json`). The pipeline reaches the network only
//! through the [`RawSource`] trait, so the HTTP implementation can be swapped
//! for a fake in tests.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::document::UrlType;
use crate::{Result, SpritsitError};

/// Body of a fetched resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawBody {
    /// Decoded text (HTML or JSON).
    Text(String),
    /// Undecoded bytes (containers).
    Binary(Vec<u8>),
}

/// A fetched resource and its classification.
#[derive(Debug, Clone)]
pub struct RawContent {
    /// MIME type as reported (or inferred for local inputs).
    pub mime: String,
    /// Classification the pipeline branches on.
    pub kind: UrlType,
    pub body: RawBody,
}

impl RawContent {
    pub fn html(html: impl Into<String>) -> Self {
        Self { mime: "text/html".to_string(), kind: UrlType::Html, body: RawBody::Text(html.into()) }
    }

    pub fn json(json: impl Into<String>) -> Self {
        Self { mime: "application/json".to_string(), kind: UrlType::Json, body: RawBody::Text(json.into()) }
    }

    pub fn epub(bytes: Vec<u8>) -> Self {
        Self { mime: "application/epub+zip".to_string(), kind: UrlType::Epub, body: RawBody::Binary(bytes) }
    }

    pub fn pdf() -> Self {
        Self { mime: "application/pdf".to_string(), kind: UrlType::Pdf, body: RawBody::Binary(Vec::new()) }
    }

    /// The body as text; binary bodies must be valid UTF-8.
    pub fn into_text(self) -> Result<String> {
        match self.body {
            RawBody::Text(text) => Ok(text),
            RawBody::Binary(bytes) => String::from_utf8(bytes).map_err(|_| SpritsitError::InvalidEncoding),
        }
    }

    /// The body as bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self.body {
            RawBody::Text(text) => text.into_bytes(),
            RawBody::Binary(bytes) => bytes,
        }
    }
}

/// Where the pipeline gets bytes from.
#[async_trait]
pub trait RawSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawContent>;
}

/// Classifies a response by MIME type, falling back to the URL suffix for
/// generic binary types and then to HTML.
///
/// # Errors
///
/// [`SpritsitError::UnsupportedContentType`] for MIME types outside
/// `{json, html, epub, pdf}`.
pub fn classify(mime: &str, url: &str) -> Result<UrlType> {
    match UrlType::from_mime(mime) {
        Some(UrlType::Unknown) => match UrlType::from_url_suffix(url) {
            UrlType::Unknown => Ok(UrlType::Html),
            kind => Ok(kind),
        },
        Some(kind) => Ok(kind),
        None => Err(SpritsitError::UnsupportedContentType { mime: mime.to_string(), url: url.to_string() }),
    }
}

#[cfg(feature = "fetch")]
pub use http::HttpFetcher;

#[cfg(feature = "fetch")]
mod http {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::Client;
    use reqwest::header::CONTENT_TYPE;
    use tracing::{debug, info};
    use url::Url;

    use super::{RawBody, RawContent, RawSource, classify};
    use crate::config::FetchConfig;
    use crate::document::UrlType;
    use crate::{Result, SpritsitError};

    /// [`RawSource`] over HTTP(S).
    ///
    /// Follows redirects, decodes gzip/deflate transfer encodings, and
    /// decodes text bodies using the response charset.
    #[derive(Debug, Clone)]
    pub struct HttpFetcher {
        client: Client,
        timeout: u64,
    }

    impl HttpFetcher {
        pub fn new(config: &FetchConfig) -> Result<Self> {
            let client = Client::builder()
                .timeout(Duration::from_secs(config.timeout))
                .user_agent(config.user_agent.clone())
                .gzip(true)
                .deflate(true)
                .build()
                .map_err(SpritsitError::HttpError)?;

            Ok(Self { client, timeout: config.timeout })
        }
    }

    #[async_trait]
    impl RawSource for HttpFetcher {
        async fn fetch(&self, url: &str) -> Result<RawContent> {
            let parsed_url = Url::parse(url).map_err(|e| SpritsitError::InvalidUrl(e.to_string()))?;

            let response = self
                .client
                .get(parsed_url)
                .header(
                    "Accept",
                    "text/html,application/xhtml+xml,application/json,application/epub+zip;q=0.9,*/*;q=0.8",
                )
                .header("Accept-Language", "en-US,en;q=0.9")
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() { SpritsitError::Timeout { timeout: self.timeout } } else { SpritsitError::HttpError(e) }
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(SpritsitError::HttpStatus { status: status.as_u16(), url: response.url().to_string() });
            }

            let mime = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();

            let host = response.url().host_str().unwrap_or_default().to_string();
            info!(host = %host, mime = %mime, "Opening mime type");

            let kind = classify(&mime, response.url().as_str())?;

            let body = match kind {
                UrlType::Pdf => {
                    debug!("Not downloading PDF body");
                    RawBody::Binary(Vec::new())
                }
                UrlType::Epub => RawBody::Binary(response.bytes().await?.to_vec()),
                _ => RawBody::Text(response.text().await?),
            };

            Ok(RawContent { mime, kind, body })
        }
    }
}

/// Reads a local file, classifying it by extension.
///
/// `.epub` and `.pdf` are containers; everything else is read as UTF-8 HTML.
pub fn fetch_file(path: &str) -> Result<RawContent> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        return Err(SpritsitError::FileNotFound(path_buf));
    }

    match UrlType::from_url_suffix(path) {
        UrlType::Epub => Ok(RawContent::epub(fs::read(&path_buf)?)),
        UrlType::Pdf => Ok(RawContent::pdf()),
        _ => {
            let bytes = fs::read(&path_buf)?;
            let html = String::from_utf8(bytes).map_err(|_| SpritsitError::InvalidEncoding)?;
            Ok(RawContent::html(html))
        }
    }
}

/// Reads HTML from standard input until EOF.
pub fn fetch_stdin() -> Result<RawContent> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    Ok(RawContent::html(buffer))
}
