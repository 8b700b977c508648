//! Reveal state machine for one gated block.
//!
//! A [`RevealController`] moves through three phases:
//!
//! ```text
//! Pending --environment_ready()--> Locked --submit() ok--> Revealed
//!                  |                  ^  |
//!                  |                  +--+ submit() mismatch
//!                  +--memo hit-------------------------> Revealed
//! ```
//!
//! `Pending` renders an inert placeholder and touches neither the credential
//! nor the session memo. It is left exactly once. `Revealed` is terminal.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use veil_gate::{GateSpec, RevealController, RevealPhase};
//! use veil_memo::{MemoryMemo, SessionMemo};
//!
//! let memo: Arc<dyn SessionMemo> = Arc::new(MemoryMemo::new());
//! let spec = GateSpec::password("abc", "hidden");
//! let mut gate = RevealController::new(spec.clone(), "unused", Arc::clone(&memo));
//!
//! gate.environment_ready();
//! gate.set_attempt("abc");
//! assert_eq!(gate.submit(), RevealPhase::Revealed);
//!
//! // A fresh controller for the same payload starts revealed
//! let mut again = RevealController::new(spec, "unused", memo);
//! assert_eq!(again.environment_ready(), RevealPhase::Revealed);
//! ```

mod fingerprint;
mod view;

pub use fingerprint::{FINGERPRINT_PREFIX_CHARS, fingerprint};
pub use view::RevealView;

use std::sync::Arc;

use veil_config::Messages;
use veil_memo::SessionMemo;

use crate::GateSpec;

/// Key that submits the credential while the input is focused.
pub const SUBMIT_KEY: &str = "Enter";

/// Lifecycle phase of a [`RevealController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    /// Environment not confirmed yet; nothing is compared or stored.
    Pending,
    /// Waiting for the correct credential.
    Locked,
    /// Payload visible until the controller is dropped.
    Revealed,
}

/// User-facing state of a gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealState {
    /// Current credential input.
    pub attempted_credential: String,
    /// Whether the payload is visible. Never goes back to `false`.
    pub revealed: bool,
    /// Message of the last failed attempt.
    pub error_message: Option<String>,
}

/// Gates one [`GateSpec`] behind a credential.
pub struct RevealController {
    gate: GateSpec,
    default_credential: String,
    memo: Arc<dyn SessionMemo>,
    messages: Messages,
    clear_error_on_input: bool,
    fingerprint: String,
    phase: RevealPhase,
    state: RevealState,
}

impl RevealController {
    /// Create a controller in the [`RevealPhase::Pending`] phase.
    ///
    /// `default_credential` unlocks gates without their own secret.
    #[must_use]
    pub fn new(
        gate: GateSpec,
        default_credential: impl Into<String>,
        memo: Arc<dyn SessionMemo>,
    ) -> Self {
        let fingerprint = fingerprint(&gate.payload);
        Self {
            gate,
            default_credential: default_credential.into(),
            memo,
            messages: Messages::default(),
            clear_error_on_input: false,
            fingerprint,
            phase: RevealPhase::Pending,
            state: RevealState::default(),
        }
    }

    /// Set the user-facing strings.
    #[must_use]
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Clear the error message whenever the input changes.
    #[must_use]
    pub fn with_clear_error_on_input(mut self, clear: bool) -> Self {
        self.clear_error_on_input = clear;
        self
    }

    /// Signal that the runtime environment (and its session storage) is available.
    ///
    /// Moves `Pending` to `Revealed` when the session memo remembers this
    /// payload, otherwise to `Locked`. Later calls change nothing.
    pub fn environment_ready(&mut self) -> RevealPhase {
        if self.phase != RevealPhase::Pending {
            return self.phase;
        }

        if self.memo.try_get(&self.fingerprint) == Some(true) {
            tracing::debug!("restoring revealed gate {}", self.fingerprint);
            self.reveal();
        } else {
            self.phase = RevealPhase::Locked;
        }
        self.phase
    }

    /// Update the pending credential input.
    ///
    /// Only meaningful while locked; ignored in other phases.
    pub fn set_attempt(&mut self, credential: impl Into<String>) {
        if self.phase != RevealPhase::Locked {
            return;
        }
        self.state.attempted_credential = credential.into();
        if self.clear_error_on_input {
            self.state.error_message = None;
        }
    }

    /// Compare the pending input with the required credential.
    ///
    /// Exact, case-sensitive comparison without trimming. A match reveals the
    /// payload and records it in the session memo; a mismatch sets the error
    /// message and keeps the input for correction.
    pub fn submit(&mut self) -> RevealPhase {
        if self.phase != RevealPhase::Locked {
            return self.phase;
        }

        if self.state.attempted_credential == self.required_credential() {
            self.reveal();
            self.memo.try_set(&self.fingerprint, true);
        } else {
            tracing::debug!("incorrect credential for gate {}", self.fingerprint);
            self.state.error_message = Some(self.messages.incorrect_credential.clone());
        }
        self.phase
    }

    /// Handle a key press on the credential input. [`SUBMIT_KEY`] submits.
    pub fn handle_key(&mut self, key: &str) -> RevealPhase {
        if key == SUBMIT_KEY {
            self.submit()
        } else {
            self.phase
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Current user-facing state.
    #[must_use]
    pub fn current_state(&self) -> &RevealState {
        &self.state
    }

    /// The gate this controller protects.
    #[must_use]
    pub fn gate(&self) -> &GateSpec {
        &self.gate
    }

    /// Session memo key of this gate.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// The view for the current phase.
    #[must_use]
    pub fn view(&self) -> RevealView<'_> {
        match self.phase {
            RevealPhase::Pending => RevealView::Pending {
                loading: &self.messages.loading,
            },
            RevealPhase::Locked => RevealView::Locked {
                fingerprint: &self.fingerprint,
                attempt: &self.state.attempted_credential,
                error: self.state.error_message.as_deref(),
                messages: &self.messages,
            },
            RevealPhase::Revealed => RevealView::Revealed {
                payload: &self.gate.payload,
            },
        }
    }

    /// Render the current view as an HTML fragment.
    #[must_use]
    pub fn render_html(&self) -> String {
        self.view().to_html()
    }

    fn required_credential(&self) -> &str {
        self.gate
            .secret
            .as_deref()
            .unwrap_or(&self.default_credential)
    }

    fn reveal(&mut self) {
        self.phase = RevealPhase::Revealed;
        self.state.revealed = true;
        self.state.error_message = None;
    }
}
