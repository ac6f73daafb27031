//! Language detection and the per-document language accumulator.
//!
//! Detection is lazy. The normalizer offers every paragraph to
//! a [`LangGuess`] as it goes, the accumulator keeps one representative
//! sample, and the detector runs at most once per document when the language
//! is first needed.

use std::fmt;

use tracing::{debug, warn};

use crate::hyphenate::{Hyphenate, HyphenatorFactory};

/// Samples larger than this many words stop replacing a reasonable corpus.
pub const CORPUS_MAX_WORDS: usize = 256;

/// A corpus of this many words or fewer is always replaced by a larger one.
pub const CORPUS_MIN_WORDS: usize = 3;

/// Fallback language when detection gives up.
pub const DEFAULT_LANG: &str = "en";

/// Language detection engine.
///
/// `None` means the engine could not tell.
pub trait LanguageDetector: Send + Sync {
    fn guess(&self, text: &str) -> Option<String>;
}

/// [`LanguageDetector`] backed by `whatlang`, reporting ISO 639-1 codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn guess(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text)?;
        let code = info.lang().code();
        Some(iso639_1(code).unwrap_or(code).to_string())
    }
}

/// Maps whatlang's ISO 639-3 codes onto two-letter codes.
fn iso639_1(code: &str) -> Option<&'static str> {
    let two = match code {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" | "arb" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "nb",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        _ => return None,
    };
    Some(two)
}

/// Per-document language accumulator.
///
/// Holds the best corpus seen so far plus memoized detection and
/// hyphenator results. It lives inside one
/// [`CleanDocument`](crate::CleanDocument) and is never shared or serialized.
#[derive(Default)]
pub struct LangGuess {
    corpus: String,
    corpus_words: usize,
    lang: Option<String>,
    hyphenator: Option<Box<dyn Hyphenate>>,
}

impl fmt::Debug for LangGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LangGuess")
            .field("corpus_words", &self.corpus_words)
            .field("lang", &self.lang)
            .field("hyphenator", &self.hyphenator.as_ref().map(|h| h.language().to_string()))
            .finish()
    }
}

impl LangGuess {
    /// Offers a paragraph as the detection sample.
    ///
    /// The candidate replaces the current corpus iff it has strictly more
    /// words and either stays within [`CORPUS_MAX_WORDS`] or the current
    /// corpus has no more than [`CORPUS_MIN_WORDS`]. Returns whether it was
    /// taken.
    pub fn update_corpus(&mut self, candidate: &str, word_count: usize) -> bool {
        let larger = word_count > self.corpus_words;
        let acceptable = word_count <= CORPUS_MAX_WORDS || self.corpus_words <= CORPUS_MIN_WORDS;

        if larger && acceptable {
            self.corpus = candidate.to_string();
            self.corpus_words = word_count;
            true
        } else {
            false
        }
    }

    /// The chosen sample.
    pub fn corpus(&self) -> &str {
        &self.corpus
    }

    /// Word count of the chosen sample.
    pub fn corpus_words(&self) -> usize {
        self.corpus_words
    }

    /// Language detected so far, without triggering detection.
    pub fn cached_lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// Detects the corpus language once and caches it.
    ///
    /// An undetectable corpus resolves to `fallback`.
    pub fn get_lang(&mut self, detector: &dyn LanguageDetector, fallback: &str) -> &str {
        self.lang
            .get_or_insert_with(|| {
                let lang = detect_or(detector, &self.corpus, fallback);
                debug!(lang = %lang, corpus_words = self.corpus_words, "Detected document language");
                lang
            })
            .as_str()
    }

    /// Returns the hyphenator for this document, building it on first use.
    ///
    /// The language is the cached detection result when there is one;
    /// otherwise `context` (the paragraph being cleaned) is detected on the
    /// spot without caching that result as the document language. When no
    /// dictionary can be built, the factory's pre-built fallback is cached
    /// instead and the failure is only logged.
    pub fn get_hyphenator(
        &mut self, context: &str, detector: &dyn LanguageDetector, factory: &dyn HyphenatorFactory, fallback: &str,
    ) -> &dyn Hyphenate {
        let cached_lang = &self.lang;

        let hyphenator = self.hyphenator.get_or_insert_with(|| {
            let lang = match cached_lang {
                Some(lang) => lang.clone(),
                None => detect_or(detector, context, fallback),
            };

            match factory.create(&lang) {
                Ok(hyphenator) => hyphenator,
                Err(err) => {
                    warn!(lang = %lang, "Falling back to default hyphenator: {err}");
                    factory.fallback()
                }
            }
        });

        &**hyphenator
    }
}

fn detect_or(detector: &dyn LanguageDetector, text: &str, fallback: &str) -> String {
    match detector.guess(text) {
        Some(lang) if !lang.is_empty() && lang != "unknown" => lang,
        _ => fallback.to_string(),
    }
}
