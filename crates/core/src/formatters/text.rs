use crate::document::CleanDocument;

/// Render a document as `title\n\nurl\n\ncontent\n\n`.
///
/// Missing fields render as empty strings.
pub fn convert_to_text(doc: &CleanDocument) -> String {
    let fields = [doc.title().unwrap_or_default(), doc.url(), doc.text().unwrap_or_default()];

    let mut output = String::with_capacity(fields.iter().map(|f| f.len() + 2).sum());
    for field in fields {
        output.push_str(field);
        output.push_str("\n\n");
    }
    output
}

/// Plain text formatter
#[derive(Debug, Clone, Default)]
pub struct TextFormatter;

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn convert(&self, doc: &CleanDocument) -> String {
        convert_to_text(doc)
    }
}
