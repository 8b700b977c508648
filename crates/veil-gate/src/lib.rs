//! Gated content for rendered documents.
//!
//! Blocks of a document can withhold their content behind a credential by
//! embedding a directive in their text:
//!
//! ```text
//! {{password:<secret>}}<payload>
//! {{encrypted:<payload>}}
//! ```
//!
//! # Architecture
//!
//! - [`directive`]: detects a directive in a block's text and extracts a
//!   [`GateSpec`]. Never fails outward: anything unexpected renders the block
//!   as ordinary content.
//! - [`RevealController`]: the Pending/Locked/Revealed state machine of one
//!   gate, remembering successful reveals in a [`veil_memo::SessionMemo`].
//! - [`PageRenderer`]: walks a [`Page`] and splices gate views in place of
//!   the default rendering of gated blocks.
//!
//! The secret travels with the page and is compared in plaintext. This is an
//! access nudge, not a confidentiality mechanism.

mod block;
pub mod directive;
mod gate_spec;
mod html;
mod page;
mod reveal;

pub use block::BlockType;
pub use gate_spec::GateSpec;
pub use html::escape_html;
pub use page::{Block, BlockProperties, GatedBlock, Page, PageError, PageRenderer, scan};
pub use reveal::{
    FINGERPRINT_PREFIX_CHARS, RevealController, RevealPhase, RevealState, RevealView, SUBMIT_KEY,
    fingerprint,
};
