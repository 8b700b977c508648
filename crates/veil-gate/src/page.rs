//! Page model and the block-rendering pipeline.
//!
//! A [`Page`] is a tree of blocks exported from the content store as JSON:
//!
//! ```json
//! {
//!   "title": "Team notes",
//!   "blocks": [
//!     { "id": "b1", "type": "text", "properties": { "title": [["Hello"]] } },
//!     { "id": "b2", "type": "toggle", "properties": { "title": ["{{encrypted:psst}}"] },
//!       "children": [] }
//!   ]
//! }
//! ```
//!
//! [`PageRenderer`] walks the tree in document order. Every gateable block is
//! checked for a directive; a gated block is replaced by the view of its
//! [`RevealController`], everything else gets the default rendering. The
//! children of a gated block are rendered only once it is revealed.

use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use veil_config::Messages;
use veil_memo::SessionMemo;

use crate::directive::{self, NormalizeError, TextRun};
use crate::html::escape_html;
use crate::{BlockType, GateSpec, RevealController, RevealPhase};

/// Page loading error.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("Invalid page JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A document exported from the content store.
#[derive(Debug, Deserialize)]
pub struct Page {
    /// Page title.
    #[serde(default)]
    pub title: Option<String>,
    /// Top-level blocks in document order.
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Page {
    /// Parse a page from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Json`] if the document is not a valid page.
    pub fn from_json(json: &str) -> Result<Self, PageError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a page file.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, PageError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Find a block anywhere in the tree by id.
    #[must_use]
    pub fn find_block(&self, id: &str) -> Option<&Block> {
        find_in(&self.blocks, id)
    }
}

fn find_in<'a>(blocks: &'a [Block], id: &str) -> Option<&'a Block> {
    blocks.iter().find_map(|block| {
        if block.id == id {
            Some(block)
        } else {
            find_in(&block.children, id)
        }
    })
}

/// One block of a page.
#[derive(Debug, Deserialize)]
pub struct Block {
    /// Block id.
    pub id: String,
    /// Block kind.
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// Block properties. Absent for empty blocks.
    #[serde(default)]
    pub properties: Option<BlockProperties>,
    /// Nested blocks.
    #[serde(default)]
    pub children: Vec<Block>,
}

/// Properties of a block.
#[derive(Debug, Default, Deserialize)]
pub struct BlockProperties {
    /// Rich-text title, kept raw so a malformed title only affects its block.
    #[serde(default)]
    pub title: Option<Value>,
}

impl Block {
    /// Rich-text runs of the title, `None` when the block has no title.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Shape`] if the title is not a list of runs.
    pub fn title_runs(&self) -> Result<Option<Vec<TextRun>>, NormalizeError> {
        self.properties
            .as_ref()
            .and_then(|p| p.title.as_ref())
            .map(directive::runs_from_value)
            .transpose()
    }

    /// Flattened title text. Blocks with an unreadable title render as empty.
    #[must_use]
    pub fn text(&self) -> String {
        match self.title_runs() {
            Ok(Some(runs)) => directive::flatten(&runs).unwrap_or_else(|e| {
                tracing::warn!("cannot flatten title of block {}: {e}", self.id);
                String::new()
            }),
            Ok(None) => String::new(),
            Err(e) => {
                tracing::warn!("cannot read title of block {}: {e}", self.id);
                String::new()
            }
        }
    }

    /// Gate carried by this block, if any.
    ///
    /// Code blocks are read as literal text, other kinds as rich text. A block
    /// without a title never carries a gate.
    #[must_use]
    pub fn gate(&self) -> Option<GateSpec> {
        if !self.block_type.is_gateable() {
            return None;
        }

        let runs = match self.title_runs() {
            Ok(Some(runs)) => runs,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("skipping gate detection for block {}: {e}", self.id);
                return None;
            }
        };

        if self.block_type == BlockType::Code {
            let code = directive::flatten(&runs)
                .inspect_err(|e| tracing::warn!("cannot read code block {}: {e}", self.id))
                .ok()?;
            directive::extract_code(&code)
        } else {
            directive::extract(self.block_type, &runs)
        }
    }
}

/// A gated block found by [`scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatedBlock {
    /// Block id.
    pub id: String,
    /// Block kind.
    pub block_type: BlockType,
    /// Extracted gate.
    pub gate: GateSpec,
}

/// List all gated blocks of a page in document order.
#[must_use]
pub fn scan(page: &Page) -> Vec<GatedBlock> {
    let mut found = Vec::new();
    scan_into(&page.blocks, &mut found);
    found
}

fn scan_into(blocks: &[Block], found: &mut Vec<GatedBlock>) {
    for block in blocks {
        if let Some(gate) = block.gate() {
            found.push(GatedBlock {
                id: block.id.clone(),
                block_type: block.block_type,
                gate,
            });
        }
        scan_into(&block.children, found);
    }
}

/// Renders pages to HTML, substituting gated blocks.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use veil_gate::{Page, PageRenderer};
/// use veil_memo::NullMemo;
///
/// let page = Page::from_json(r#"{"blocks": [
///     {"id": "a", "type": "text", "properties": {"title": ["Public"]}},
///     {"id": "b", "type": "quote", "properties": {"title": ["{{password:k}}Private"]}}
/// ]}"#).unwrap();
///
/// let html = PageRenderer::new("unused", Arc::new(NullMemo))
///     .with_environment_ready(true)
///     .render(&page);
///
/// assert!(html.contains("<p>Public</p>"));
/// assert!(html.contains("veil-locked"));
/// assert!(!html.contains("Private"));
/// ```
pub struct PageRenderer {
    default_credential: String,
    memo: Arc<dyn SessionMemo>,
    messages: Messages,
    clear_error_on_input: bool,
    environment_ready: bool,
}

impl PageRenderer {
    /// Create a renderer. Gated blocks render as pending placeholders
    /// unless [`with_environment_ready`](Self::with_environment_ready) is set.
    #[must_use]
    pub fn new(default_credential: impl Into<String>, memo: Arc<dyn SessionMemo>) -> Self {
        Self {
            default_credential: default_credential.into(),
            memo,
            messages: Messages::default(),
            clear_error_on_input: false,
            environment_ready: false,
        }
    }

    /// Set the user-facing strings of gated views.
    #[must_use]
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Clear gate error messages when the input changes.
    #[must_use]
    pub fn with_clear_error_on_input(mut self, clear: bool) -> Self {
        self.clear_error_on_input = clear;
        self
    }

    /// Signal the environment as ready to every gate created by this renderer.
    #[must_use]
    pub fn with_environment_ready(mut self, ready: bool) -> Self {
        self.environment_ready = ready;
        self
    }

    /// Build the controller for a gate with this renderer's settings.
    ///
    /// The controller is returned in its initial phase; the environment
    /// signal is applied by [`render`](Self::render) only.
    #[must_use]
    pub fn controller(&self, gate: GateSpec) -> RevealController {
        RevealController::new(gate, self.default_credential.clone(), Arc::clone(&self.memo))
            .with_messages(self.messages.clone())
            .with_clear_error_on_input(self.clear_error_on_input)
    }

    /// Render a page as an HTML article.
    #[must_use]
    pub fn render(&self, page: &Page) -> String {
        let mut out = String::from(r#"<article class="veil-page">"#);
        if let Some(title) = &page.title {
            write!(out, r#"<h1 class="page-title">{}</h1>"#, escape_html(title)).unwrap();
        }
        self.render_blocks(&page.blocks, &mut out);
        out.push_str("</article>");
        out
    }

    fn render_blocks(&self, blocks: &[Block], out: &mut String) {
        let mut open_list: Option<&str> = None;

        for block in blocks {
            let list_tag = match block.block_type {
                BlockType::BulletedList => Some("ul"),
                BlockType::NumberedList => Some("ol"),
                _ => None,
            };
            if open_list != list_tag {
                if let Some(tag) = open_list {
                    write!(out, "</{tag}>").unwrap();
                }
                if let Some(tag) = list_tag {
                    write!(out, "<{tag}>").unwrap();
                }
                open_list = list_tag;
            }

            self.render_block(block, out);
        }

        if let Some(tag) = open_list {
            write!(out, "</{tag}>").unwrap();
        }
    }

    fn render_block(&self, block: &Block, out: &mut String) {
        let Some(gate) = block.gate() else {
            self.render_default(block, out);
            return;
        };

        let mut controller = self.controller(gate);
        if self.environment_ready {
            controller.environment_ready();
        }

        let in_list = matches!(
            block.block_type,
            BlockType::BulletedList | BlockType::NumberedList
        );
        if in_list {
            out.push_str("<li>");
        }
        write!(
            out,
            r#"<div class="veil-gate" data-block-id="{}" data-block-type="{}">"#,
            escape_html(&block.id),
            block.block_type
        )
        .unwrap();
        controller.view().write_html(out);
        out.push_str("</div>");
        // Children belong to the gated block and stay hidden until it is revealed
        if controller.phase() == RevealPhase::Revealed {
            self.render_children(block, out);
        }
        if in_list {
            out.push_str("</li>");
        }
    }

    fn render_default(&self, block: &Block, out: &mut String) {
        let text = escape_html(&block.text());

        match block.block_type {
            BlockType::Text => write!(out, "<p>{text}</p>").unwrap(),
            BlockType::Quote => write!(out, "<blockquote>{text}</blockquote>").unwrap(),
            BlockType::BulletedList | BlockType::NumberedList => {
                write!(out, "<li>{text}").unwrap();
                self.render_children(block, out);
                out.push_str("</li>");
                return;
            }
            BlockType::Header => write!(out, "<h1>{text}</h1>").unwrap(),
            BlockType::SubHeader => write!(out, "<h2>{text}</h2>").unwrap(),
            BlockType::SubSubHeader => write!(out, "<h3>{text}</h3>").unwrap(),
            BlockType::Callout => {
                write!(out, r#"<aside class="callout">{text}"#).unwrap();
                self.render_children(block, out);
                out.push_str("</aside>");
                return;
            }
            BlockType::Toggle => {
                write!(out, "<details><summary>{text}</summary>").unwrap();
                self.render_children(block, out);
                out.push_str("</details>");
                return;
            }
            BlockType::Code => write!(out, "<pre><code>{text}</code></pre>").unwrap(),
            BlockType::Unsupported => write!(out, "<div>{text}</div>").unwrap(),
        }
        self.render_children(block, out);
    }

    fn render_children(&self, block: &Block, out: &mut String) {
        if block.children.is_empty() {
            return;
        }
        out.push_str(r#"<div class="block-children">"#);
        self.render_blocks(&block.children, out);
        out.push_str("</div>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use veil_memo::{MemoryMemo, NullMemo};

    fn page(json: &str) -> Page {
        Page::from_json(json).unwrap()
    }

    #[test]
    fn test_block_gate_text() {
        let page = page(
            r#"{"blocks": [{"id": "a", "type": "callout",
                "properties": {"title": [["{{password:", [["b"]]], "k}} secret"]}}]}"#,
        );
        assert_eq!(
            page.blocks[0].gate(),
            Some(GateSpec::password("k", "secret"))
        );
    }

    #[test]
    fn test_block_gate_code() {
        let page = page(
            r#"{"blocks": [{"id": "a", "type": "code",
                "properties": {"title": [["{{encrypted:let x = 1;}}"]]}}]}"#,
        );
        assert_eq!(
            page.blocks[0].gate(),
            Some(GateSpec::encrypted("let x = 1;"))
        );
    }

    #[test]
    fn test_block_without_title_has_no_gate() {
        let page = page(r#"{"blocks": [{"id": "a", "type": "text"}]}"#);
        assert_eq!(page.blocks[0].gate(), None);
        assert_eq!(page.blocks[0].text(), "");
    }

    #[test]
    fn test_malformed_title_degrades() {
        let page = page(
            r#"{"blocks": [
                {"id": "a", "type": "text", "properties": {"title": "{{encrypted:x}}"}},
                {"id": "b", "type": "text", "properties": {"title": ["fine"]}}
            ]}"#,
        );
        assert_eq!(page.blocks[0].gate(), None);

        let html = PageRenderer::new("d", Arc::new(NullMemo)).render(&page);
        assert!(html.contains("<p></p>"));
        assert!(html.contains("<p>fine</p>"));
    }

    #[test]
    fn test_unsupported_block_is_never_gated() {
        let page = page(
            r#"{"blocks": [{"id": "a", "type": "tweet",
                "properties": {"title": ["{{encrypted:x}}"]}}]}"#,
        );
        assert_eq!(page.blocks[0].block_type, BlockType::Unsupported);
        assert_eq!(page.blocks[0].gate(), None);

        let html = PageRenderer::new("d", Arc::new(NullMemo)).render(&page);
        assert!(html.contains("<div>{{encrypted:x}}</div>"));
    }

    #[test]
    fn test_find_block_nested() {
        let page = page(
            r#"{"blocks": [{"id": "a", "type": "toggle", "children": [
                {"id": "b", "type": "text", "children": [{"id": "c", "type": "quote"}]}
            ]}]}"#,
        );
        assert_eq!(page.find_block("c").map(|b| b.block_type), Some(BlockType::Quote));
        assert!(page.find_block("missing").is_none());
    }

    #[test]
    fn test_scan_in_document_order() {
        let page = page(
            r#"{"blocks": [
                {"id": "a", "type": "text", "properties": {"title": ["{{encrypted:one}}"]}},
                {"id": "b", "type": "toggle", "properties": {"title": ["plain"]}, "children": [
                    {"id": "c", "type": "quote", "properties": {"title": ["{{password:k}}two"]}}
                ]},
                {"id": "d", "type": "text", "properties": {"title": ["{{password:broken"]}}
            ]}"#,
        );

        let gated = scan(&page);
        assert_eq!(
            gated,
            vec![
                GatedBlock {
                    id: "a".to_owned(),
                    block_type: BlockType::Text,
                    gate: GateSpec::encrypted("one"),
                },
                GatedBlock {
                    id: "c".to_owned(),
                    block_type: BlockType::Quote,
                    gate: GateSpec::password("k", "two"),
                },
            ]
        );
    }

    #[test]
    fn test_render_default_blocks() {
        let page = page(
            r#"{"title": "Notes & more", "blocks": [
                {"id": "1", "type": "header", "properties": {"title": ["Intro"]}},
                {"id": "2", "type": "bulleted_list", "properties": {"title": ["one"]}},
                {"id": "3", "type": "bulleted_list", "properties": {"title": ["two"]}},
                {"id": "4", "type": "numbered_list", "properties": {"title": ["first"]}},
                {"id": "5", "type": "code", "properties": {"title": [["a < b"]]}},
                {"id": "6", "type": "toggle", "properties": {"title": ["More"]}, "children": [
                    {"id": "7", "type": "text", "properties": {"title": ["inside"]}}
                ]}
            ]}"#,
        );

        let html = PageRenderer::new("d", Arc::new(NullMemo)).render(&page);

        assert_eq!(
            html,
            concat!(
                r#"<article class="veil-page">"#,
                r#"<h1 class="page-title">Notes &amp; more</h1>"#,
                "<h1>Intro</h1>",
                "<ul><li>one</li><li>two</li></ul>",
                "<ol><li>first</li></ol>",
                "<pre><code>a &lt; b</code></pre>",
                r#"<details><summary>More</summary><div class="block-children"><p>inside</p></div></details>"#,
                "</article>"
            )
        );
    }

    #[test]
    fn test_render_gated_pending_by_default() {
        let page = page(
            r#"{"blocks": [{"id": "g", "type": "text",
                "properties": {"title": ["{{password:k}}hidden"]}}]}"#,
        );

        let html = PageRenderer::new("d", Arc::new(NullMemo)).render(&page);

        assert!(html.contains(r#"<div class="veil-gate" data-block-id="g" data-block-type="text">"#));
        assert!(html.contains("veil-pending"));
        assert!(!html.contains("hidden"));
    }

    #[test]
    fn test_render_gated_locked_when_ready() {
        let page = page(
            r#"{"blocks": [{"id": "g", "type": "bulleted_list",
                "properties": {"title": ["{{encrypted:hidden}}"]}}]}"#,
        );

        let html = PageRenderer::new("d", Arc::new(NullMemo))
            .with_environment_ready(true)
            .render(&page);

        assert!(html.contains(r#"<ul><li><div class="veil-gate""#));
        assert!(html.contains("veil-locked"));
        assert!(html.ends_with("</li></ul></article>"));
    }

    #[test]
    fn test_render_gated_revealed_from_memo() {
        let memo = Arc::new(MemoryMemo::new());
        let renderer = PageRenderer::new("d", memo).with_environment_ready(true);

        let gate = GateSpec::password("k", "hidden");
        let mut controller = renderer.controller(gate);
        controller.environment_ready();
        controller.set_attempt("k");
        controller.submit();

        let page = page(
            r#"{"blocks": [{"id": "g", "type": "quote",
                "properties": {"title": ["{{password:k}}hidden"]}}]}"#,
        );
        let html = renderer.render(&page);

        assert!(html.contains(r#"<div class="veil-revealed">hidden</div>"#));
    }

    #[test]
    fn test_locked_toggle_hides_children() {
        let page = page(
            r#"{"blocks": [{"id": "t", "type": "toggle",
                "properties": {"title": ["{{password:k}}Open me"]},
                "children": [{"id": "c", "type": "text", "properties": {"title": ["Quarterly body"]}}]}]}"#,
        );

        let pending = PageRenderer::new("d", Arc::new(NullMemo)).render(&page);
        let locked = PageRenderer::new("d", Arc::new(NullMemo))
            .with_environment_ready(true)
            .render(&page);

        for html in [pending, locked] {
            assert!(!html.contains("Quarterly body"));
            assert!(!html.contains("block-children"));
        }
    }

    #[test]
    fn test_revealed_callout_shows_children() {
        let memo = Arc::new(MemoryMemo::new());
        memo.try_set(&crate::fingerprint("Open me"), true);
        let page = page(
            r#"{"blocks": [{"id": "t", "type": "callout",
                "properties": {"title": ["{{password:k}}Open me"]},
                "children": [{"id": "c", "type": "text", "properties": {"title": ["Quarterly body"]}}]}]}"#,
        );

        let html = PageRenderer::new("d", memo)
            .with_environment_ready(true)
            .render(&page);

        assert!(html.contains(
            r#"<div class="veil-revealed">Open me</div></div><div class="block-children"><p>Quarterly body</p></div>"#
        ));
    }

    #[test]
    fn test_render_malformed_directive_passes_text_through() {
        let page = page(
            r#"{"blocks": [{"id": "m", "type": "quote",
                "properties": {"title": ["{{password:abc"]}}]}"#,
        );

        let html = PageRenderer::new("d", Arc::new(NullMemo)).render(&page);
        assert!(html.contains("<blockquote>{{password:abc</blockquote>"));
    }

    #[test]
    fn test_invalid_page_json() {
        let err = Page::from_json(r#"{"blocks": [{"type": "text"}]}"#).unwrap_err();
        assert!(matches!(err, PageError::Json(_)));
    }
}
