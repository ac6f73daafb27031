//! The extraction pipeline: remote reader first, local extraction second.
//!
//! # Example
//!
//! ```rust,no_run
//! use spritsit_core::{Spritsit, SpritsitConfig};
//!
//! # async fn run() -> spritsit_core::Result<()> {
//! let spritsit = Spritsit::new(SpritsitConfig::default())?;
//! let doc = spritsit.extract("https://example.com/article").await?;
//! println!("{} words", doc.word_count());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::{debug, info};
use url::form_urlencoded::byte_serialize;

use crate::assemble::assemble;
use crate::chunks::html_chunks;
use crate::config::SpritsitConfig;
use crate::document::{CleanDocument, UrlType};
use crate::extract::BoilerplateExtractor;
use crate::fetch::{RawContent, RawSource};
use crate::hyphenate::EmbeddedDictionaries;
use crate::lang::DEFAULT_LANG;
use crate::normalize::Normalizer;
use crate::remote::read_remote;
use crate::{Result, SpritsitError};

/// Request-independent pipeline state.
///
/// Holds no per-document data, so one instance can serve any number of
/// concurrent extractions.
pub struct Spritsit {
    config: SpritsitConfig,
    source: Arc<dyn RawSource>,
    extractor: Arc<dyn BoilerplateExtractor>,
    normalizer: Normalizer,
}

impl Spritsit {
    /// Builds the pipeline with the HTTP fetcher and the default extractor.
    #[cfg(feature = "fetch")]
    pub fn new(config: SpritsitConfig) -> Result<Self> {
        let source = Arc::new(crate::fetch::HttpFetcher::new(&config.fetch)?);
        let extractor = Arc::new(crate::extract::SmoothieExtractor::default());
        Ok(Self::with_parts(config, source, extractor))
    }

    /// Builds the pipeline from explicit collaborators.
    pub fn with_parts(
        config: SpritsitConfig, source: Arc<dyn RawSource>, extractor: Arc<dyn BoilerplateExtractor>,
    ) -> Self {
        let mut normalizer = Normalizer::new(config.max_word_len);
        if config.fallback_lang != DEFAULT_LANG {
            normalizer = normalizer
                .with_fallback_lang(config.fallback_lang.clone())
                .with_hyphenators(Arc::new(EmbeddedDictionaries::new(&config.fallback_lang)));
        }
        Self { config, source, extractor, normalizer }
    }

    /// Replaces the normalizer.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn config(&self) -> &SpritsitConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Extracts and normalizes the document at `url`.
    ///
    /// URLs ending in `.epub` or `.pdf` skip the remote reader. Any other URL
    /// is offered to the remote reader when one is configured; an empty or
    /// failed remote answer falls through to local extraction.
    ///
    /// # Errors
    ///
    /// Only the local fetch can fail the pipeline: transport errors and
    /// [`SpritsitError::UnsupportedContentType`] are returned as is.
    pub async fn extract(&self, url: &str) -> Result<CleanDocument> {
        let kind = UrlType::from_url_suffix(url);

        let doc = match kind {
            UrlType::Epub | UrlType::Pdf => {
                debug!(url = %url, kind = ?kind, "Skipping remote reader");
                CleanDocument::typed(url, kind)
            }
            _ => {
                let remote = self.try_remote(url).await;
                if !remote.is_empty() {
                    return Ok(remote);
                }
                let mut doc = CleanDocument::typed(url, kind);
                doc.offer_title(remote.title().map(str::to_string));
                doc.offer_author(remote.author().map(str::to_string));
                doc
            }
        };

        info!(url = %url, "Falling back to local extraction");
        let raw = self.source.fetch(url).await?;
        self.process_raw(doc, raw)
    }

    /// Remote attempt; an empty document when there is no remote reader.
    async fn try_remote(&self, url: &str) -> CleanDocument {
        let Some(remote) = &self.config.remote else {
            info!(url = %url, "No remote reader configured");
            return CleanDocument::new(url);
        };

        let mut doc = read_remote(self.source.as_ref(), remote, url).await;
        if !doc.is_empty() {
            doc.set_url_type(UrlType::Html);
            self.normalizer.textify(&mut doc);
        }
        doc
    }

    /// Runs local extraction over already fetched content.
    ///
    /// PDF content is terminal: the document gets a preprocessing redirect
    /// and is not normalized. HTML and EPUB content are assembled chunk by
    /// chunk.
    pub fn process_raw(&self, mut doc: CleanDocument, raw: RawContent) -> Result<CleanDocument> {
        let kind = raw.kind;
        doc.set_url_type(kind);

        match kind {
            UrlType::Pdf => {
                let encoded: String = byte_serialize(doc.url().as_bytes()).collect();
                let hint = format!("{}{}", self.config.preprocess_url, encoded);
                info!(url = %doc.url(), "Redirecting PDF to preprocessor");
                doc.mark_preprocess(hint);
            }
            UrlType::Html => {
                let html = raw.into_text()?;
                assemble(&mut doc, html_chunks(html), self.extractor.as_ref(), &self.normalizer);
            }
            #[cfg(feature = "epub")]
            UrlType::Epub => {
                let chunks = crate::chunks::epub_chunks(raw.into_bytes())?;
                assemble(&mut doc, chunks, self.extractor.as_ref(), &self.normalizer);
            }
            _ => {
                return Err(SpritsitError::UnsupportedContentType { mime: raw.mime, url: doc.url().to_string() });
            }
        }

        Ok(doc)
    }
}

impl std::fmt::Debug for Spritsit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spritsit")
            .field("config", &self.config)
            .field("normalizer", &self.normalizer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemoteConfig;
    use crate::document::Content;
    use crate::extract::ExtractedContent;
    use crate::lang::tests::FixedDetector;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::Ordering;

    const READER: &str = "https://reader.example/api/parser";

    /// Serves a canned remote answer and a canned page, recording requests.
    struct FakeSource {
        remote: Option<&'static str>,
        page: RawContent,
        requests: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn new(remote: Option<&'static str>, page: RawContent) -> Arc<Self> {
            Arc::new(Self { remote, page, requests: Mutex::new(Vec::new()) })
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RawSource for FakeSource {
        async fn fetch(&self, url: &str) -> Result<RawContent> {
            self.requests.lock().unwrap().push(url.to_string());
            if url.starts_with(READER) {
                return match self.remote {
                    Some(json) => Ok(RawContent::json(json)),
                    None => Err(SpritsitError::HttpStatus { status: 503, url: url.to_string() }),
                };
            }
            Ok(self.page.clone())
        }
    }

    struct PassThrough;

    impl BoilerplateExtractor for PassThrough {
        fn extract(&self, html: &str, _url: Option<&str>) -> Result<ExtractedContent> {
            Ok(ExtractedContent { title: Some("Local Title".to_string()), content: html.to_string() })
        }
    }

    fn pipeline(source: Arc<FakeSource>, detector: Arc<FixedDetector>) -> Spritsit {
        let config = SpritsitConfig::builder().remote(RemoteConfig::new(READER, "secret")).build();
        let normalizer = Normalizer::new(config.max_word_len).with_detector(detector);
        Spritsit::with_parts(config, source, Arc::new(PassThrough)).with_normalizer(normalizer)
    }

    #[tokio::test]
    async fn test_pdf_skips_remote_and_normalizer() {
        let source = FakeSource::new(Some(r#"{"content":"<p>never</p>"}"#), RawContent::pdf());
        let detector = Arc::new(FixedDetector::new(Some("en")));
        let spritsit = pipeline(source.clone(), detector.clone());

        let doc = spritsit.extract("https://example.com/paper.pdf").await.unwrap();

        assert_eq!(source.requests(), vec!["https://example.com/paper.pdf".to_string()]);
        assert_eq!(doc.url_type(), UrlType::Pdf);
        assert_eq!(doc.content(), &Content::Unset);
        assert_eq!(doc.word_count(), 0);
        assert_eq!(
            doc.preprocess(),
            Some("https://docs.google.com/viewer?embedded=true&url=https%3A%2F%2Fexample.com%2Fpaper.pdf")
        );
        assert_eq!(detector.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_success_is_final() {
        let source = FakeSource::new(
            Some(r#"{"title":"Remote","author":"Ann","content":"<p>Remote body</p>"}"#),
            RawContent::html("<p>local page</p>"),
        );
        let spritsit = pipeline(source.clone(), Arc::new(FixedDetector::new(Some("en"))));

        let doc = spritsit.extract("https://example.com/post").await.unwrap();

        assert_eq!(source.requests().len(), 1);
        assert!(source.requests()[0].starts_with(READER));
        assert_eq!(doc.title(), Some("Remote"));
        assert_eq!(doc.text(), Some("Remote body\n"));
        assert_eq!(doc.word_count(), 2);
        assert_eq!(doc.lang(), Some("en"));
        assert_eq!(doc.url_type(), UrlType::Html);
    }

    #[tokio::test]
    async fn test_remote_error_falls_back() {
        let source = FakeSource::new(
            Some(r#"{"error":true,"title":"Ignored","content":"<p>bad</p>"}"#),
            RawContent::html("<p>local page text</p>"),
        );
        let spritsit = pipeline(source.clone(), Arc::new(FixedDetector::new(Some("en"))));

        let doc = spritsit.extract("https://example.com/post").await.unwrap();

        assert_eq!(source.requests().len(), 2);
        assert_eq!(source.requests()[1], "https://example.com/post");
        assert_eq!(doc.title(), Some("Local Title"));
        assert_eq!(doc.text(), Some("local page text\n"));
        assert_eq!(doc.word_count(), 3);
    }

    #[tokio::test]
    async fn test_remote_transport_failure_falls_back() {
        let source = FakeSource::new(None, RawContent::html("<p>fallback</p>"));
        let spritsit = pipeline(source.clone(), Arc::new(FixedDetector::new(Some("en"))));

        let doc = spritsit.extract("https://example.com/post").await.unwrap();
        assert_eq!(doc.text(), Some("fallback\n"));
    }

    #[tokio::test]
    async fn test_blank_remote_keeps_title() {
        let source =
            FakeSource::new(Some(r#"{"title":"Remote Title","content":"  "}"#), RawContent::html("<p>local</p>"));
        let spritsit = pipeline(source, Arc::new(FixedDetector::new(Some("en"))));

        let doc = spritsit.extract("https://example.com/post").await.unwrap();
        assert_eq!(doc.title(), Some("Remote Title"));
        assert_eq!(doc.text(), Some("local\n"));
    }

    #[tokio::test]
    async fn test_without_remote_goes_local() {
        let source = FakeSource::new(Some(r#"{"content":"<p>unused</p>"}"#), RawContent::html("<p>page</p>"));
        let config = SpritsitConfig::default();
        let spritsit = Spritsit::with_parts(config, source.clone(), Arc::new(PassThrough));

        let doc = spritsit.extract("https://example.com/post").await.unwrap();
        assert_eq!(source.requests(), vec!["https://example.com/post".to_string()]);
        assert_eq!(doc.text(), Some("page\n"));
    }

    #[tokio::test]
    async fn test_json_page_is_unsupported() {
        let source = FakeSource::new(None, RawContent::json("{}"));
        let spritsit = pipeline(source, Arc::new(FixedDetector::new(Some("en"))));

        let result = spritsit.extract("https://example.com/api").await;
        assert!(matches!(result, Err(SpritsitError::UnsupportedContentType { .. })));
    }

    #[test]
    fn test_process_raw_html() {
        let spritsit = pipeline(
            FakeSource::new(None, RawContent::pdf()),
            Arc::new(FixedDetector::new(Some("ar"))),
        );
        let doc = spritsit.process_raw(CleanDocument::new("page.html"), RawContent::html("<p>مرحبا بالعالم</p>")).unwrap();

        assert_eq!(doc.lang(), Some("ar"));
        assert_eq!(doc.direction(), Some(crate::document::Direction::Rtl));
        assert_eq!(doc.word_count(), 2);
    }
}
