use crate::document::CleanDocument;
use crate::{Result, SpritsitError};

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
    /// JSONP callback; the document is emitted as `callback(...)`
    pub callback: Option<String>,
}

/// True if `name` is usable as a JSONP callback.
///
/// Only ASCII letters, digits, `_`, `$` and `.` are accepted.
pub fn is_valid_callback(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'))
}

/// Serialize a document to JSON, optionally wrapped for JSONP
pub fn convert_to_json(doc: &CleanDocument, config: &JsonConfig) -> Result<String> {
    let json = if config.pretty { serde_json::to_string_pretty(doc) } else { serde_json::to_string(doc) };
    let json = json.map_err(|e| SpritsitError::Serialization(e.to_string()))?;

    match config.callback.as_deref() {
        None => Ok(json),
        Some(callback) if is_valid_callback(callback) => Ok(format!("{callback}({json})")),
        Some(callback) => Err(SpritsitError::Serialization(format!("invalid JSONP callback {callback:?}"))),
    }
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, doc: &CleanDocument) -> Result<String> {
        convert_to_json(doc, &self.config)
    }
}
