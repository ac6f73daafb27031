//! Boilerplate removal.
//!
//! The pipeline only needs "raw page HTML in, readable fragment and title
//! out". [`BoilerplateExtractor`] is that seam; [`SmoothieExtractor`] fills it
//! with `dom_smoothie`, a port of Mozilla's Readability.

use std::panic::{self, AssertUnwindSafe};

use dom_smoothie::{Config, Readability};

use crate::{Result, SpritsitError};

/// Configuration for content extraction
#[derive(Debug, Clone, Default)]
pub struct ExtractConfig {
    /// Maximum elements to parse (0 = unlimited)
    pub max_elements: usize,
}

/// The result of content extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Best-guess title, if the extractor found one
    pub title: Option<String>,
    /// Readable HTML fragment
    pub content: String,
}

/// Reduces a raw HTML page to its readable sub-tree.
pub trait BoilerplateExtractor: Send + Sync {
    fn extract(&self, html: &str, url: Option<&str>) -> Result<ExtractedContent>;
}

/// [`BoilerplateExtractor`] backed by `dom_smoothie`.
#[derive(Debug, Clone, Default)]
pub struct SmoothieExtractor {
    config: ExtractConfig,
}

impl SmoothieExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }
}

impl BoilerplateExtractor for SmoothieExtractor {
    fn extract(&self, html: &str, url: Option<&str>) -> Result<ExtractedContent> {
        let max_elements = if self.config.max_elements == 0 { usize::MAX } else { self.config.max_elements };
        let config = Config { max_elements_to_parse: max_elements, ..Default::default() };

        // dom_smoothie can panic on some malformed input.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut readability = Readability::new(html, url, Some(config))?;
            readability.parse()
        }));

        let article = match outcome {
            Ok(Ok(article)) => article,
            Ok(Err(err)) => return Err(SpritsitError::Extraction(err.to_string())),
            Err(_) => return Err(SpritsitError::Extraction("extractor panicked".to_string())),
        };

        let title = Some(article.title.trim().to_string()).filter(|t| !t.is_empty());
        Ok(ExtractedContent { title, content: article.content.to_string() })
    }
}
