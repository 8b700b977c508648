//! Gating directive grammar.
//!
//! ```text
//! {{password:<secret>}}<payload>
//! {{encrypted:<payload>}}
//! ```
//!
//! The first `}}` after an opening marker closes the capture. Text before the
//! opening marker is ignored, as is anything after the closing `}}` of the
//! encrypted form.

use crate::GateSpec;

const CLOSE: &str = "}}";

/// Opening marker of a gating directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `{{password:`
    Password,
    /// `{{encrypted:`
    Encrypted,
}

impl Marker {
    /// Literal opening text of the marker.
    #[must_use]
    pub fn literal(self) -> &'static str {
        match self {
            Self::Password => "{{password:",
            Self::Encrypted => "{{encrypted:",
        }
    }
}

/// Result of scanning text for a gating directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// A complete directive was found.
    Matched(GateSpec),
    /// The marker is present but the closing `}}` is missing.
    Malformed(Marker),
    /// No marker at all.
    NoDirective,
}

/// Scan `text` for a gating directive.
///
/// The password marker takes precedence: once `{{password:` occurs anywhere in
/// the text, the encrypted form is never considered, even if the password
/// directive turns out to be malformed.
#[must_use]
pub fn parse(text: &str) -> ParseOutcome {
    if let Some(rest) = after_marker(text, Marker::Password) {
        return match rest.split_once(CLOSE) {
            Some((secret, payload)) => {
                ParseOutcome::Matched(GateSpec::password(secret.trim(), payload.trim()))
            }
            None => ParseOutcome::Malformed(Marker::Password),
        };
    }

    if let Some(rest) = after_marker(text, Marker::Encrypted) {
        return match rest.split_once(CLOSE) {
            Some((payload, _)) => ParseOutcome::Matched(GateSpec::encrypted(payload.trim())),
            None => ParseOutcome::Malformed(Marker::Encrypted),
        };
    }

    ParseOutcome::NoDirective
}

/// Text following the first occurrence of `marker`.
fn after_marker(text: &str, marker: Marker) -> Option<&str> {
    let literal = marker.literal();
    text.find(literal).map(|start| &text[start + literal.len()..])
}
