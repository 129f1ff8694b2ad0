//! Structured error types for the check request core.
//!
//! Three variants cover the real error sources: JSON input that does not
//! match the schema, an input shape the generator refuses to render, and
//! file I/O at the edges (config loading, the CLI).

use thiserror::Error;

/// The unified error type returned by the public API.
#[derive(Debug, Error)]
pub enum ReefError {
    /// JSON input failed to parse as a record or config.
    #[error("Failed to parse input: {source}{}", render_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// The input breaks a precondition of the generator (no line items,
    /// blank vendor, duplicate dimension keys). This is a bug in the
    /// caller, not a user-facing validation message.
    #[error("Contract violation: {0}")]
    Contract(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn render_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for ReefError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the check request schema. Check field names (camelCase) and that lineItems is present.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        ReefError::Parse { source: e, hint }
    }
}
