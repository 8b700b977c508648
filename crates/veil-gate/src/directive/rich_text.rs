//! Rich-text runs and their flattening to plain text.
//!
//! The content store delivers a block title as a list of runs. Each run is
//! either a bare string or an array whose first element is the literal text
//! followed by formatting annotations:
//!
//! ```json
//! ["plain ", ["bold", [["b"]]], ["link", [["a", "https://example.com"]]]]
//! ```

use serde::Deserialize;
use serde_json::Value;

/// One run of a rich-text title.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextRun {
    /// Bare string run.
    Plain(String),
    /// Structured run: literal text first, annotations after.
    Rich(Vec<Value>),
}

impl TextRun {
    /// Literal text of this run.
    fn text(&self, index: usize) -> Result<&str, NormalizeError> {
        match self {
            Self::Plain(text) => Ok(text),
            Self::Rich(parts) => match parts.first() {
                None => Ok(""),
                Some(Value::String(text)) => Ok(text),
                Some(_) => Err(NormalizeError::NonTextRun { index }),
            },
        }
    }
}

impl From<&str> for TextRun {
    fn from(text: &str) -> Self {
        Self::Plain(text.to_owned())
    }
}

/// Rich text with an unexpected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// The title is not a list of runs.
    #[error("rich text is not a list of runs: {0}")]
    Shape(String),
    /// A structured run does not start with its literal text.
    #[error("run {index} does not start with text")]
    NonTextRun {
        /// Zero-based position of the offending run.
        index: usize,
    },
}

/// Parse a raw title value into runs.
///
/// # Errors
///
/// Returns [`NormalizeError::Shape`] if the value is not an array of runs.
pub fn runs_from_value(value: &Value) -> Result<Vec<TextRun>, NormalizeError> {
    Vec::<TextRun>::deserialize(value).map_err(|e| NormalizeError::Shape(e.to_string()))
}

/// Concatenate the literal text of all runs in order, without trimming.
///
/// # Errors
///
/// Returns [`NormalizeError::NonTextRun`] for a structured run whose first
/// element is not a string.
pub fn flatten(runs: &[TextRun]) -> Result<String, NormalizeError> {
    let mut out = String::new();
    for (index, run) in runs.iter().enumerate() {
        out.push_str(run.text(index)?);
    }
    Ok(out)
}

/// Flatten runs and trim surrounding whitespace.
///
/// # Errors
///
/// Same as [`flatten`].
pub fn normalize(runs: &[TextRun]) -> Result<String, NormalizeError> {
    flatten(runs).map(|text| text.trim().to_owned())
}
