pub mod assemble;
pub mod chunks;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod hyphenate;
pub mod lang;
pub mod normalize;
pub mod pipeline;
pub mod remote;

pub use assemble::assemble;
#[cfg(feature = "epub")]
pub use chunks::epub_chunks;
pub use chunks::{ChunkSet, html_chunks};
pub use config::{
    DEFAULT_PREPROCESS_URL, DEFAULT_REMOTE_API_URL, FetchConfig, RemoteConfig, SpritsitConfig, SpritsitConfigBuilder,
};
pub use document::{CleanDocument, Content, Direction, UrlType};
pub use error::{Result, SpritsitError};
pub use extract::{BoilerplateExtractor, ExtractConfig, ExtractedContent, SmoothieExtractor};
#[cfg(feature = "fetch")]
pub use fetch::HttpFetcher;
pub use fetch::{RawBody, RawContent, RawSource, classify, fetch_file, fetch_stdin};
pub use formatters::{JsonConfig, JsonFormatter, TextFormatter, convert_to_json, convert_to_text, is_valid_callback};
pub use hyphenate::{
    DictionaryHyphenator, EmbeddedDictionaries, Hyphenate, HyphenatorFactory, SOFT_HYPHEN, SplitHyphenator,
};
pub use lang::{LangGuess, LanguageDetector, WhatlangDetector};
pub use normalize::{DEFAULT_MAX_WORD_LEN, Normalizer, flatten_html, split_paragraphs};
pub use pipeline::Spritsit;
pub use remote::{RemotePayload, read_remote};
