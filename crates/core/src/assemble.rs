//! Per-chunk extraction and normalization for local sources.

use tracing::{debug, warn};
use url::Url;

use crate::chunks::ChunkSet;
use crate::document::CleanDocument;
use crate::extract::{BoilerplateExtractor, ExtractedContent};
use crate::normalize::Normalizer;

/// Runs boilerplate removal and normalization over every chunk and merges
/// the results into `doc`.
///
/// Chunks are processed in order. Blank chunks are skipped without
/// disturbing the order or the title fallback. A chunk the extractor fails
/// on is normalized from its raw HTML. The extractor only sees the document
/// URL when it is absolute; file paths and `stdin` are passed as no URL.
///
/// Afterwards the title is the first known of: the title already on `doc`,
/// the container title, the title of the first chunk that produced text.
/// The author comes from the container. Content is the concatenation of the
/// chunk texts, and the word count is their sum (added to whatever `doc`
/// already counted). The language is resolved once, from the corpus
/// gathered across all chunks.
pub fn assemble(doc: &mut CleanDocument, set: ChunkSet, extractor: &dyn BoilerplateExtractor, normalizer: &Normalizer) {
    let ChunkSet { title, author, chunks } = set;
    let base_url = Url::parse(doc.url()).ok().map(String::from);
    let mut chunk_title: Option<String> = None;
    let mut texts: Vec<String> = Vec::with_capacity(chunks.len());
    let mut normalized_any = false;

    for (index, chunk) in chunks.into_iter().enumerate() {
        if chunk.trim().is_empty() {
            debug!(chunk = index, "Skipping empty chunk");
            continue;
        }

        let ExtractedContent { title: extracted_title, content } = match extractor.extract(&chunk, base_url.as_deref()) {
            Ok(extracted) => extracted,
            Err(err) => {
                warn!(chunk = index, "Extraction failed, using raw chunk: {err}");
                ExtractedContent { title: None, content: chunk }
            }
        };

        doc.set_raw_html(content);
        normalized_any |= normalizer.normalize_paragraphs(doc);

        if let Some(text) = doc.text().filter(|t| !t.is_empty()) {
            texts.push(text.to_string());
            if chunk_title.is_none() {
                chunk_title = extracted_title.filter(|t| !t.trim().is_empty());
            }
        }
    }

    doc.offer_title(title);
    doc.offer_title(chunk_title);
    doc.offer_author(author);

    if normalized_any {
        normalizer.resolve_lang(doc);
    }

    if texts.is_empty() {
        doc.clear_content();
    } else {
        doc.set_text(texts.concat());
    }
}
