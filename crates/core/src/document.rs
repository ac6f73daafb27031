//! The clean document record produced by the pipeline.
//!
//! A [`CleanDocument`] is created empty when a request starts (only the URL
//! is known), filled either from a remote reader payload or chunk by chunk by
//! local extraction, normalized in place, and finally serialized for the
//! response. Its `content` is staged: it holds readable HTML until the
//! normalizer runs and plain text afterwards. The two stages are separate
//! [`Content`] variants so a caller can never mistake one for the other.

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::lang::LangGuess;

/// Source classification used to pick a chunk source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlType {
    Html,
    Epub,
    Pdf,
    Json,
    #[default]
    Unknown,
}

impl UrlType {
    /// Classifies a URL by its path suffix (`.epub`, `.pdf`).
    ///
    /// Query strings and fragments are ignored. Anything else is
    /// [`UrlType::Unknown`] until the resource is actually fetched.
    pub fn from_url_suffix(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or_default().to_ascii_lowercase();

        if path.ends_with(".epub") {
            UrlType::Epub
        } else if path.ends_with(".pdf") {
            UrlType::Pdf
        } else {
            UrlType::Unknown
        }
    }

    /// Classifies a `Content-Type` value, ignoring parameters such as `charset`.
    ///
    /// Returns `None` for MIME types the pipeline does not handle. Generic
    /// binary types and an empty value come back as [`UrlType::Unknown`] so the
    /// caller can fall back to the URL suffix.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

        match essence.as_str() {
            "application/json" | "text/json" => Some(UrlType::Json),
            "text/html" | "application/xhtml+xml" | "text/plain" => Some(UrlType::Html),
            "application/epub+zip" => Some(UrlType::Epub),
            "application/pdf" => Some(UrlType::Pdf),
            "" | "application/octet-stream" | "binary/octet-stream" => Some(UrlType::Unknown),
            _ => None,
        }
    }
}

/// Writing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    /// `rtl` for Hebrew and Arabic, `ltr` for everything else.
    pub fn for_lang(lang: &str) -> Self {
        match lang {
            "he" | "ar" => Direction::Rtl,
            _ => Direction::Ltr,
        }
    }
}

/// Document content at the two stages of its life.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Content {
    /// Nothing extracted yet.
    #[default]
    Unset,
    /// Readable HTML waiting for normalization.
    Raw(String),
    /// Normalized plain text, one paragraph per line.
    Normalized(String),
}

impl Content {
    /// True when there is no content or only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Content::Unset => true,
            Content::Raw(s) | Content::Normalized(s) => s.trim().is_empty(),
        }
    }

    /// Readable HTML, if normalization has not run yet.
    pub fn raw_html(&self) -> Option<&str> {
        match self {
            Content::Raw(html) => Some(html),
            _ => None,
        }
    }

    /// Normalized text, if normalization has run.
    pub fn text(&self) -> Option<&str> {
        match self {
            Content::Normalized(text) => Some(text),
            _ => None,
        }
    }
}

impl Serialize for Content {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Content::Unset => serializer.serialize_none(),
            Content::Raw(s) | Content::Normalized(s) => serializer.serialize_str(s),
        }
    }
}

/// Readable document fetched from a source URL.
///
/// Fields are private so the record's invariants hold: the URL never changes,
/// `title` is first-writer-wins, and the language accumulator stays internal.
///
/// # Example
///
/// ```rust
/// use spritsit_core::CleanDocument;
///
/// let mut doc = CleanDocument::new("https://example.com/post");
/// doc.offer_title(Some("First".to_string()));
/// doc.offer_title(Some("Second".to_string()));
/// assert_eq!(doc.title(), Some("First"));
/// assert!(doc.is_empty());
/// ```
#[derive(Debug, Serialize)]
pub struct CleanDocument {
    url: String,
    title: Option<String>,
    author: Option<String>,
    content: Content,
    word_count: usize,
    lang: Option<String>,
    direction: Option<Direction>,
    url_type: UrlType,
    #[serde(skip_serializing_if = "Option::is_none")]
    preprocess: Option<String>,
    #[serde(skip)]
    guess: LangGuess,
}

impl CleanDocument {
    /// Creates an empty document for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            author: None,
            content: Content::Unset,
            word_count: 0,
            lang: None,
            direction: None,
            url_type: UrlType::Unknown,
            preprocess: None,
            guess: LangGuess::default(),
        }
    }

    /// Creates an empty document already classified as `url_type`.
    pub fn typed(url: impl Into<String>, url_type: UrlType) -> Self {
        let mut doc = Self::new(url);
        doc.url_type = url_type;
        doc
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Normalized text, or `None` before normalization.
    pub fn text(&self) -> Option<&str> {
        self.content.text()
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn url_type(&self) -> UrlType {
        self.url_type
    }

    pub fn preprocess(&self) -> Option<&str> {
        self.preprocess.as_deref()
    }

    /// Fills the title only if none is known yet. Blank titles are ignored.
    pub fn offer_title(&mut self, title: Option<String>) {
        if self.title.is_some() {
            return;
        }
        self.title = title.filter(|t| !t.trim().is_empty());
    }

    /// Fills the author only if none is known yet. Blank values are ignored.
    pub fn offer_author(&mut self, author: Option<String>) {
        if self.author.is_some() {
            return;
        }
        self.author = author.filter(|a| !a.trim().is_empty());
    }

    /// Pins the writing direction; the normalizer will not override it.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = Some(direction);
    }

    pub fn set_url_type(&mut self, url_type: UrlType) {
        self.url_type = url_type;
    }

    /// Stages readable HTML for the next normalization pass.
    pub fn set_raw_html(&mut self, html: impl Into<String>) {
        self.content = Content::Raw(html.into());
    }

    /// Marks the document as handed off to an external preprocessor.
    ///
    /// Terminal: the content is cleared and no normalization follows.
    pub fn mark_preprocess(&mut self, hint: impl Into<String>) {
        self.url_type = UrlType::Pdf;
        self.content = Content::Unset;
        self.preprocess = Some(hint.into());
    }

    /// A document is empty when its content is unset or blank.
    pub fn is_empty(&self) -> bool {
        self.content.is_blank()
    }

    pub(crate) fn take_raw_html(&mut self) -> Option<String> {
        match std::mem::take(&mut self.content) {
            Content::Raw(html) => Some(html),
            other => {
                self.content = other;
                None
            }
        }
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.content = Content::Normalized(text);
    }

    pub(crate) fn clear_content(&mut self) {
        self.content = Content::Unset;
    }

    pub(crate) fn add_words(&mut self, count: usize) {
        self.word_count += count;
    }

    pub(crate) fn set_lang(&mut self, lang: String) {
        if self.direction.is_none() {
            self.direction = Some(Direction::for_lang(&lang));
        }
        self.lang = Some(lang);
    }

    pub(crate) fn guess_mut(&mut self) -> &mut LangGuess {
        &mut self.guess
    }

    #[cfg(test)]
    pub(crate) fn guess(&self) -> &LangGuess {
        &self.guess
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com/book.epub", UrlType::Epub)]
    #[case("https://example.com/BOOK.EPUB?dl=1", UrlType::Epub)]
    #[case("https://example.com/paper.pdf#page=2", UrlType::Pdf)]
    #[case("https://example.com/article", UrlType::Unknown)]
    #[case("https://example.com/pdf/index.html", UrlType::Unknown)]
    fn test_url_suffix(#[case] url: &str, #[case] expected: UrlType) {
        assert_eq!(UrlType::from_url_suffix(url), expected);
    }

    #[rstest]
    #[case("text/html; charset=utf-8", Some(UrlType::Html))]
    #[case("application/json", Some(UrlType::Json))]
    #[case("application/epub+zip", Some(UrlType::Epub))]
    #[case("Application/PDF", Some(UrlType::Pdf))]
    #[case("application/octet-stream", Some(UrlType::Unknown))]
    #[case("image/png", None)]
    fn test_from_mime(#[case] mime: &str, #[case] expected: Option<UrlType>) {
        assert_eq!(UrlType::from_mime(mime), expected);
    }

    #[rstest]
    #[case("ar", Direction::Rtl)]
    #[case("he", Direction::Rtl)]
    #[case("fr", Direction::Ltr)]
    #[case("en", Direction::Ltr)]
    fn test_direction_for_lang(#[case] lang: &str, #[case] expected: Direction) {
        assert_eq!(Direction::for_lang(lang), expected);
    }

    #[test]
    fn test_title_first_writer_wins() {
        let mut doc = CleanDocument::new("https://example.com");
        doc.offer_title(Some("   ".to_string()));
        assert_eq!(doc.title(), None);
        doc.offer_title(Some("Container Title".to_string()));
        doc.offer_title(Some("Chunk Title".to_string()));
        assert_eq!(doc.title(), Some("Container Title"));
    }

    #[test]
    fn test_preset_direction_is_kept() {
        let mut doc = CleanDocument::new("https://example.com");
        doc.set_direction(Direction::Rtl);
        doc.set_lang("fr".to_string());
        assert_eq!(doc.direction(), Some(Direction::Rtl));
        assert_eq!(doc.lang(), Some("fr"));
    }

    #[test]
    fn test_lang_derives_direction() {
        let mut doc = CleanDocument::new("https://example.com");
        doc.set_lang("ar".to_string());
        assert_eq!(doc.direction(), Some(Direction::Rtl));
    }

    #[test]
    fn test_staged_content() {
        let mut doc = CleanDocument::new("https://example.com");
        assert!(doc.is_empty());

        doc.set_raw_html("<p>Hi</p>");
        assert_eq!(doc.content().raw_html(), Some("<p>Hi</p>"));
        assert_eq!(doc.text(), None);
        assert!(!doc.is_empty());

        let html = doc.take_raw_html();
        assert_eq!(html.as_deref(), Some("<p>Hi</p>"));
        doc.set_text("Hi\n".to_string());
        assert_eq!(doc.text(), Some("Hi\n"));
        assert_eq!(doc.take_raw_html(), None);
        assert_eq!(doc.text(), Some("Hi\n"));
    }

    #[test]
    fn test_mark_preprocess_clears_content() {
        let mut doc = CleanDocument::new("https://example.com/a.pdf");
        doc.set_raw_html("<p>stale</p>");
        doc.mark_preprocess("https://viewer.example/?url=a.pdf");
        assert!(doc.is_empty());
        assert_eq!(doc.url_type(), UrlType::Pdf);
        assert_eq!(doc.preprocess(), Some("https://viewer.example/?url=a.pdf"));
    }

    #[test]
    fn test_serialization_skips_internal_state() {
        let mut doc = CleanDocument::typed("https://example.com", UrlType::Html);
        doc.offer_title(Some("Title".to_string()));
        doc.set_text("Hello\n".to_string());
        doc.add_words(1);
        doc.set_lang("en".to_string());

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["url"], "https://example.com");
        assert_eq!(json["title"], "Title");
        assert_eq!(json["author"], serde_json::Value::Null);
        assert_eq!(json["content"], "Hello\n");
        assert_eq!(json["word_count"], 1);
        assert_eq!(json["lang"], "en");
        assert_eq!(json["direction"], "ltr");
        assert_eq!(json["url_type"], "html");
        assert!(json.get("preprocess").is_none());
        assert!(json.get("guess").is_none());
    }
}
