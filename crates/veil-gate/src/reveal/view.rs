//! Views of a gated block.

use std::fmt::Write;

use veil_config::Messages;

use crate::html::escape_html;

/// What a [`RevealController`](super::RevealController) currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealView<'a> {
    /// Inert placeholder shown before the environment is ready.
    Pending {
        /// Placeholder text.
        loading: &'a str,
    },
    /// Credential form.
    Locked {
        /// Memo key of the gate, exposed for client wiring.
        fingerprint: &'a str,
        /// Current input.
        attempt: &'a str,
        /// Message of the last failed attempt.
        error: Option<&'a str>,
        /// Labels of the form.
        messages: &'a Messages,
    },
    /// The withheld content, with no controls.
    Revealed {
        /// Payload shown verbatim.
        payload: &'a str,
    },
}

impl RevealView<'_> {
    /// Render the view as an HTML fragment.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    /// Append the view as an HTML fragment to `out`.
    pub fn write_html(&self, out: &mut String) {
        match *self {
            Self::Pending { loading } => {
                write!(
                    out,
                    r#"<div class="veil-pending" aria-busy="true">{}</div>"#,
                    escape_html(loading)
                )
                .unwrap();
            }
            Self::Locked {
                fingerprint,
                attempt,
                error,
                messages,
            } => {
                write!(
                    out,
                    r#"<div class="veil-locked" data-veil-key="{}">"#,
                    escape_html(fingerprint)
                )
                .unwrap();
                out.push_str(r#"<div class="veil-lock-icon" aria-hidden="true">🔒</div>"#);
                write!(
                    out,
                    r#"<p class="veil-label">{}</p>"#,
                    escape_html(&messages.locked_label)
                )
                .unwrap();
                write!(
                    out,
                    r#"<div class="veil-form"><input type="password" class="veil-input" value="{}" placeholder="{}" data-submit-key="Enter"><button type="button" class="veil-unlock">{}</button></div>"#,
                    escape_html(attempt),
                    escape_html(&messages.placeholder),
                    escape_html(&messages.unlock)
                )
                .unwrap();
                if let Some(error) = error {
                    write!(
                        out,
                        r#"<p class="veil-error" role="alert">{}</p>"#,
                        escape_html(error)
                    )
                    .unwrap();
                }
                out.push_str("</div>");
            }
            Self::Revealed { payload } => {
                write!(
                    out,
                    r#"<div class="veil-revealed">{}</div>"#,
                    escape_html(payload)
                )
                .unwrap();
            }
        }
    }
}
