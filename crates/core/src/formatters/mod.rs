pub mod json;
pub mod text;

pub use json::{JsonConfig, JsonFormatter, convert_to_json, is_valid_callback};
pub use text::{TextFormatter, convert_to_text};
