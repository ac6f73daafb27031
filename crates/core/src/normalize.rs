//! Readable HTML to clean paragraph text.
//!
//! [`Normalizer::textify`] flattens a readable HTML fragment into text,
//! splits it into paragraphs, cleans every word, and records word count,
//! language, and direction on the owning [`CleanDocument`].
//!
//! # Example
//!
//! ```rust
//! use spritsit_core::{CleanDocument, Normalizer};
//!
//! let normalizer = Normalizer::default();
//! let mut doc = CleanDocument::new("https://example.com");
//! doc.set_raw_html("<p>Hello<br/>World!</p>");
//! normalizer.textify(&mut doc);
//!
//! assert_eq!(doc.text(), Some("Hello World!\n"));
//! assert_eq!(doc.word_count(), 2);
//! ```

use std::sync::{Arc, LazyLock};

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::document::CleanDocument;
use crate::hyphenate::{EmbeddedDictionaries, HyphenatorFactory};
use crate::lang::{DEFAULT_LANG, LangGuess, LanguageDetector, WhatlangDetector};

/// Elements that end a paragraph.
const BLOCK_ELEMENTS: [&str; 6] = ["p", "div", "h1", "h2", "h3", "h4"];

/// Elements whose text is never readable.
const SKIPPED_ELEMENTS: [&str; 6] = ["head", "title", "script", "style", "noscript", "template"];

/// Injected around block elements.
const PARAGRAPH_MARK: &str = "\n\n";

/// Default overlength threshold, in chars.
pub const DEFAULT_MAX_WORD_LEN: usize = 24;

/// Em dash used to rejoin long-dash splits.
pub const EM_DASH: &str = "\u{2014}";

/// Optional spaces, a newline, then any whitespace.
static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\S\n]*\n\s*").unwrap());

static LONG_DASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

/// Converts readable HTML into normalized text on a document.
///
/// Holds only configuration and collaborator handles; all per-document state
/// lives in the document itself, so one normalizer serves any number of
/// requests.
#[derive(Clone)]
pub struct Normalizer {
    max_word_len: usize,
    fallback_lang: String,
    detector: Arc<dyn LanguageDetector>,
    hyphenators: Arc<dyn HyphenatorFactory>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORD_LEN)
    }
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("max_word_len", &self.max_word_len)
            .field("fallback_lang", &self.fallback_lang)
            .finish_non_exhaustive()
    }
}

impl Normalizer {
    /// Creates a normalizer with `whatlang` detection and embedded dictionaries.
    pub fn new(max_word_len: usize) -> Self {
        Self {
            max_word_len,
            fallback_lang: DEFAULT_LANG.to_string(),
            detector: Arc::new(WhatlangDetector),
            hyphenators: Arc::new(EmbeddedDictionaries::new(DEFAULT_LANG)),
        }
    }

    /// Replaces the language detector.
    pub fn with_detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Replaces the hyphenator factory.
    pub fn with_hyphenators(mut self, hyphenators: Arc<dyn HyphenatorFactory>) -> Self {
        self.hyphenators = hyphenators;
        self
    }

    /// Sets the language used when detection gives up.
    pub fn with_fallback_lang(mut self, lang: impl Into<String>) -> Self {
        self.fallback_lang = lang.into();
        self
    }

    pub fn max_word_len(&self) -> usize {
        self.max_word_len
    }

    /// Normalizes the document's staged HTML in place.
    ///
    /// No-op unless the document holds non-blank raw HTML. Afterwards the
    /// content is one cleaned paragraph per line (each line ends in `\n`),
    /// `word_count` has grown by the number of words, and `lang` and
    /// `direction` are set. A direction set earlier is kept.
    pub fn textify(&self, doc: &mut CleanDocument) {
        if self.normalize_paragraphs(doc) {
            self.resolve_lang(doc);
        }
    }

    /// [`textify`](Self::textify) without resolving the language.
    ///
    /// Every paragraph is still offered to the document's language
    /// accumulator, so several fragments can be normalized before one
    /// [`resolve_lang`](Self::resolve_lang) call. Returns whether the
    /// document held HTML to normalize.
    pub fn normalize_paragraphs(&self, doc: &mut CleanDocument) -> bool {
        let Some(html) = doc.take_raw_html() else {
            return false;
        };
        if html.trim().is_empty() {
            doc.set_raw_html(html);
            return false;
        }

        let flat = flatten_html(&html);
        let mut text = String::with_capacity(flat.len());
        let mut words_total = 0;

        for paragraph in split_paragraphs(&flat) {
            let words: Vec<&str> = paragraph.split_whitespace().collect();
            if words.is_empty() {
                continue;
            }

            let guess = doc.guess_mut();
            guess.update_corpus(&words.join(" "), words.len());

            let cleaned: Vec<String> = words.iter().map(|word| self.clean_word(word, paragraph, guess)).collect();

            text.push_str(&cleaned.join(" "));
            text.push('\n');
            words_total += words.len();
        }

        debug!(words = words_total, "Normalized content");
        doc.set_text(text);
        doc.add_words(words_total);
        true
    }

    /// Detects the document language from its accumulated corpus and sets
    /// `lang`, and `direction` unless one is already set.
    pub fn resolve_lang(&self, doc: &mut CleanDocument) {
        let lang = doc.guess_mut().get_lang(self.detector.as_ref(), &self.fallback_lang).to_string();
        debug!(lang = %lang, "Resolved document language");
        doc.set_lang(lang);
    }

    /// Applies the long-dash and overlength rules to one token.
    fn clean_word(&self, word: &str, context: &str, guess: &mut LangGuess) -> String {
        if LONG_DASH.is_match(word) {
            return LONG_DASH
                .split(word)
                .map(|fragment| self.clean_word(fragment, context, guess))
                .collect::<Vec<_>>()
                .join(EM_DASH);
        }

        if word.chars().count() <= self.max_word_len {
            return word.to_string();
        }

        guess
            .get_hyphenator(context, self.detector.as_ref(), self.hyphenators.as_ref(), &self.fallback_lang)
            .wrap(word, self.max_word_len)
    }
}

/// Flattens an HTML fragment to text, padding element boundaries.
///
/// Every element is followed by a space so adjacent inline text never fuses;
/// block elements are surrounded by a paragraph mark instead.
pub fn flatten_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());
    flatten_into(fragment.root_element(), &mut out);
    out
}

fn flatten_into(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }

        let Some(child_el) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child_el.value().name();

        if SKIPPED_ELEMENTS.contains(&name) {
            out.push(' ');
            continue;
        }

        let block = BLOCK_ELEMENTS.contains(&name);
        if block {
            out.push_str(PARAGRAPH_MARK);
        }
        flatten_into(child_el, out);
        if block {
            out.push_str(PARAGRAPH_MARK);
        } else {
            out.push(' ');
        }
    }
}

/// Splits flattened text on blank-line-like whitespace, dropping empty parts.
pub fn split_paragraphs(text: &str) -> impl Iterator<Item = &str> {
    PARAGRAPH_BREAK.split(text).map(str::trim).filter(|p| !p.is_empty())
}
