//! Session memo keys.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Number of leading payload characters that identify a gate.
pub const FINGERPRINT_PREFIX_CHARS: usize = 20;

/// Memo key for a payload.
///
/// Derived from the first [`FINGERPRINT_PREFIX_CHARS`] characters only, so two
/// gates whose payloads share that prefix share their reveal state.
#[must_use]
pub fn fingerprint(payload: &str) -> String {
    let prefix: String = payload.chars().take(FINGERPRINT_PREFIX_CHARS).collect();
    format!("revealed-{}", URL_SAFE_NO_PAD.encode(prefix))
}
