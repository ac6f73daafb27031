//! Chunk sources.
//!
//! An HTML page is a single chunk. An EPUB container yields one chunk per
//! spine entry, in reading order, together with the container-level title
//! and author.

/// Raw HTML chunks of one source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkSet {
    /// Container-level title.
    pub title: Option<String>,
    /// Container-level author; several creators are joined with ", ".
    pub author: Option<String>,
    /// Raw HTML per chunk. Non-document entries are kept as empty strings
    /// so positions match the container order.
    pub chunks: Vec<String>,
}

/// Wraps a whole HTML page as a single chunk.
pub fn html_chunks(html: impl Into<String>) -> ChunkSet {
    ChunkSet { title: None, author: None, chunks: vec![html.into()] }
}

#[cfg(feature = "epub")]
pub use container::epub_chunks;

#[cfg(feature = "epub")]
mod container {
    use std::io::Cursor;

    use epub::doc::EpubDoc;
    use tracing::{debug, info};

    use super::ChunkSet;
    use crate::{Result, SpritsitError};

    /// Opens an EPUB from memory and reads its spine.
    ///
    /// # Errors
    ///
    /// [`SpritsitError::EpubError`] if the bytes are not a readable container.
    pub fn epub_chunks(bytes: Vec<u8>) -> Result<ChunkSet> {
        let mut doc = EpubDoc::from_reader(Cursor::new(bytes)).map_err(|e| SpritsitError::EpubError(e.to_string()))?;

        let title = doc.mdata("title").map(|item| item.value.trim().to_string()).filter(|t| !t.is_empty());
        let creators: Vec<String> = doc
            .metadata
            .iter()
            .filter(|item| item.property == "creator")
            .map(|item| item.value.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        let author = if creators.is_empty() { None } else { Some(creators.join(", ")) };

        let mut chunks = Vec::new();
        loop {
            match doc.get_current_str() {
                Some((content, mime)) if mime.contains("html") => chunks.push(content),
                Some((_, mime)) => {
                    debug!(chunk = chunks.len(), mime = %mime, "Skipping non-document entry");
                    chunks.push(String::new());
                }
                None => chunks.push(String::new()),
            }

            if !doc.go_next() {
                break;
            }
        }

        info!(chunks = chunks.len(), title = ?title, "Opened EPUB container");
        Ok(ChunkSet { title, author, chunks })
    }
}
