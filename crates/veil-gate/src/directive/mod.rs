//! Gating directive extraction.
//!
//! [`parse`] is the strict grammar and reports what it found as a
//! [`ParseOutcome`]. [`extract`] and [`extract_code`] are the entry points the
//! page pipeline calls once per block: they apply the degrade-to-none policy,
//! so a malformed directive or oddly shaped rich text simply renders the block
//! as ordinary content.
//!
//! # Example
//!
//! ```
//! use veil_gate::directive::{TextRun, extract};
//! use veil_gate::{BlockType, GateSpec};
//!
//! let runs = vec![TextRun::from("{{password:abc}} hidden")];
//! assert_eq!(
//!     extract(BlockType::Quote, &runs),
//!     Some(GateSpec::password("abc", "hidden"))
//! );
//!
//! let runs = vec![TextRun::from("{{password:abc")];
//! assert_eq!(extract(BlockType::Text, &runs), None);
//! ```

mod parser;
mod rich_text;

pub use parser::{Marker, ParseOutcome, parse};
pub use rich_text::{NormalizeError, TextRun, flatten, normalize, runs_from_value};

use crate::{BlockType, GateSpec};

/// Extract a gate from a block's rich-text runs.
///
/// Returns `None` for unsupported block kinds, text without a directive,
/// malformed directives, and runs that cannot be normalized.
#[must_use]
pub fn extract(block_type: BlockType, runs: &[TextRun]) -> Option<GateSpec> {
    if !block_type.is_gateable() {
        return None;
    }

    let text = match normalize(runs) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("skipping gate detection for {block_type} block: {e}");
            return None;
        }
    };

    resolve(block_type, &text)
}

/// Extract a gate from the literal text of a code block.
#[must_use]
pub fn extract_code(code: &str) -> Option<GateSpec> {
    resolve(BlockType::Code, code.trim())
}

/// Apply the degrade-to-none policy to a parse outcome.
fn resolve(block_type: BlockType, text: &str) -> Option<GateSpec> {
    match parse(text) {
        ParseOutcome::Matched(gate) => {
            tracing::debug!(
                "found {} gate in {block_type} block",
                if gate.uses_default_credential() {
                    "encrypted"
                } else {
                    "password"
                }
            );
            Some(gate)
        }
        ParseOutcome::Malformed(marker) => {
            tracing::debug!(
                "unterminated {} directive in {block_type} block, rendering as text",
                marker.literal()
            );
            None
        }
        ParseOutcome::NoDirective => None,
    }
}
