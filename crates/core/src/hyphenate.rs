//! Soft-break insertion for overlong words.
//!
//! A [`Hyphenate`] implementation turns one long token into the same
//! characters with soft hyphens (U+00AD) at the chosen break points, so a
//! reader can wrap it without the text changing. The dictionary-backed
//! implementation uses the `hyphenation` crate's embedded Knuth-Liang
//! patterns and hard-splits any piece the patterns leave too long.

use std::sync::Arc;

use hyphenation::{Hyphenator, Language, Load, Standard};
use tracing::warn;

use crate::{Result, SpritsitError};

/// Invisible unless the line actually breaks there.
pub const SOFT_HYPHEN: char = '\u{00AD}';

/// Something that can insert soft breaks into a word.
pub trait Hyphenate: Send + Sync {
    /// Returns `word` with soft breaks so that no piece exceeds `max_len` chars.
    fn wrap(&self, word: &str, max_len: usize) -> String;

    /// Language this hyphenator was built for.
    fn language(&self) -> &str;
}

/// Builds hyphenators by language code.
pub trait HyphenatorFactory: Send + Sync {
    fn create(&self, lang: &str) -> Result<Box<dyn Hyphenate>>;

    /// Default-language hyphenator used when `create` fails.
    fn fallback(&self) -> Box<dyn Hyphenate>;
}

/// Hyphenator backed by a pattern dictionary.
pub struct DictionaryHyphenator {
    lang: String,
    dictionary: Arc<Standard>,
}

impl Hyphenate for DictionaryHyphenator {
    fn wrap(&self, word: &str, max_len: usize) -> String {
        let breaks = self.dictionary.hyphenate(word).breaks;
        join_pieces(word, &breaks, max_len)
    }

    fn language(&self) -> &str {
        &self.lang
    }
}

/// Dictionary-free hyphenator that cuts every `max_len` chars.
#[derive(Debug, Clone, Default)]
pub struct SplitHyphenator;

impl Hyphenate for SplitHyphenator {
    fn wrap(&self, word: &str, max_len: usize) -> String {
        join_pieces(word, &[], max_len)
    }

    fn language(&self) -> &str {
        "none"
    }
}

/// Factory over the dictionaries compiled into the `hyphenation` crate.
///
/// The fallback dictionary is loaded once at construction. If even that
/// fails, [`SplitHyphenator`] stands in for it.
pub struct EmbeddedDictionaries {
    fallback_lang: String,
    fallback: Option<Arc<Standard>>,
}

impl EmbeddedDictionaries {
    pub fn new(fallback_lang: &str) -> Self {
        let fallback = match load(fallback_lang) {
            Ok(dict) => Some(Arc::new(dict)),
            Err(err) => {
                warn!(lang = fallback_lang, "Default hyphenation dictionary unavailable: {err}");
                None
            }
        };

        Self { fallback_lang: fallback_lang.to_string(), fallback }
    }
}

impl Default for EmbeddedDictionaries {
    fn default() -> Self {
        Self::new(crate::lang::DEFAULT_LANG)
    }
}

impl HyphenatorFactory for EmbeddedDictionaries {
    fn create(&self, lang: &str) -> Result<Box<dyn Hyphenate>> {
        if lang == self.fallback_lang {
            return Ok(self.fallback());
        }
        let dictionary = Arc::new(load(lang)?);
        Ok(Box::new(DictionaryHyphenator { lang: lang.to_string(), dictionary }))
    }

    fn fallback(&self) -> Box<dyn Hyphenate> {
        match &self.fallback {
            Some(dictionary) => {
                Box::new(DictionaryHyphenator { lang: self.fallback_lang.clone(), dictionary: Arc::clone(dictionary) })
            }
            None => Box::new(SplitHyphenator),
        }
    }
}

fn load(lang: &str) -> Result<Standard> {
    let language = dictionary_language(lang).ok_or_else(|| SpritsitError::Hyphenation(lang.to_string()))?;
    Standard::from_embedded(language).map_err(|e| SpritsitError::Hyphenation(format!("{lang}: {e}")))
}

/// Pattern dictionary for a two-letter language code.
fn dictionary_language(lang: &str) -> Option<Language> {
    let language = match lang {
        "af" => Language::Afrikaans,
        "bg" => Language::Bulgarian,
        "ca" => Language::Catalan,
        "cs" => Language::Czech,
        "da" => Language::Danish,
        "de" => Language::German1996,
        "el" => Language::GreekMono,
        "en" => Language::EnglishUS,
        "eo" => Language::Esperanto,
        "es" => Language::Spanish,
        "et" => Language::Estonian,
        "fi" => Language::Finnish,
        "fr" => Language::French,
        "hi" => Language::Hindi,
        "hr" => Language::Croatian,
        "hu" => Language::Hungarian,
        "id" => Language::Indonesian,
        "it" => Language::Italian,
        "ka" => Language::Georgian,
        "la" => Language::Latin,
        "lt" => Language::Lithuanian,
        "lv" => Language::Latvian,
        "nb" => Language::NorwegianBokmal,
        "nl" => Language::Dutch,
        "pl" => Language::Polish,
        "pt" => Language::Portuguese,
        "ro" => Language::Romanian,
        "ru" => Language::Russian,
        "sk" => Language::Slovak,
        "sl" => Language::Slovenian,
        "sv" => Language::Swedish,
        "ta" => Language::Tamil,
        "te" => Language::Telugu,
        "th" => Language::Thai,
        "tr" => Language::Turkish,
        "uk" => Language::Ukrainian,
        _ => return None,
    };
    Some(language)
}

/// Packs the dictionary segments of `word` greedily into pieces of at most
/// `max_len` chars and joins them with soft hyphens.
///
/// `breaks` are byte offsets of allowed break points. Segments longer than
/// `max_len` on their own are cut at char boundaries.
fn join_pieces(word: &str, breaks: &[usize], max_len: usize) -> String {
    let max_len = max_len.max(1);

    let mut segments = Vec::with_capacity(breaks.len() + 1);
    let mut start = 0;
    for &at in breaks {
        if at > start && at < word.len() && word.is_char_boundary(at) {
            segments.push(&word[start..at]);
            start = at;
        }
    }
    segments.push(&word[start..]);

    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for segment in segments {
        let seg_len = segment.chars().count();
        if current_len > 0 && current_len + seg_len > max_len {
            pieces.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(segment);
        current_len += seg_len;
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    let mut out = String::with_capacity(word.len() + pieces.len() * SOFT_HYPHEN.len_utf8());
    for piece in pieces.iter().flat_map(|p| hard_split(p, max_len)) {
        if !out.is_empty() {
            out.push(SOFT_HYPHEN);
        }
        out.push_str(&piece);
    }
    out
}

fn hard_split(piece: &str, max_len: usize) -> Vec<String> {
    let chars: Vec<char> = piece.chars().collect();
    chars.chunks(max_len).map(|chunk| chunk.iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(wrapped: &str) -> Vec<&str> {
        wrapped.split(SOFT_HYPHEN).collect()
    }

    #[test]
    fn test_split_hyphenator_preserves_characters() {
        let wrapped = SplitHyphenator.wrap("internationalization", 5);
        assert_eq!(wrapped.replace(SOFT_HYPHEN, ""), "internationalization");
        assert_eq!(pieces(&wrapped), vec!["inter", "natio", "naliz", "ation"]);
    }

    #[test]
    fn test_join_pieces_packs_segments() {
        // "hy|phen|a|tion"
        let wrapped = join_pieces("hyphenation", &[2, 6, 7], 7);
        assert_eq!(pieces(&wrapped), vec!["hyphena", "tion"]);
    }

    #[test]
    fn test_join_pieces_ignores_bad_offsets() {
        let wrapped = join_pieces("héllo", &[2, 0, 99], 10);
        assert_eq!(wrapped, "héllo");
    }

    #[test]
    fn test_short_word_unchanged() {
        assert_eq!(join_pieces("cat", &[], 5), "cat");
    }

    #[test]
    fn test_english_dictionary_wraps() {
        let factory = EmbeddedDictionaries::default();
        let hyphenator = factory.create("en").unwrap();
        let wrapped = hyphenator.wrap("internationalization", 5);

        assert!(wrapped.contains(SOFT_HYPHEN));
        assert_eq!(wrapped.replace(SOFT_HYPHEN, ""), "internationalization");
        assert!(pieces(&wrapped).iter().all(|p| p.chars().count() <= 5));
    }

    #[test]
    fn test_unknown_language_fails() {
        let factory = EmbeddedDictionaries::default();
        assert!(matches!(factory.create("he"), Err(SpritsitError::Hyphenation(_))));
        assert_eq!(factory.fallback().language(), "en");
    }

    #[test]
    fn test_zero_max_len_does_not_loop() {
        let wrapped = SplitHyphenator.wrap("abc", 0);
        assert_eq!(pieces(&wrapped), vec!["a", "b", "c"]);
    }
}
