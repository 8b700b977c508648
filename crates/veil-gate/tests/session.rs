//! End-to-end gate behavior across re-renders of one session.

use std::sync::Arc;

use veil_gate::directive::{TextRun, extract};
use veil_gate::{BlockType, GateSpec, Page, PageRenderer, RevealController, RevealPhase, scan};
use veil_memo::{FileMemo, SessionMemo};

const PAGE: &str = r#"{
    "title": "Launch plan",
    "blocks": [
        {"id": "intro", "type": "text", "properties": {"title": [["Public intro"]]}},
        {"id": "budget", "type": "callout",
         "properties": {"title": [["{{password:", [["b"]]], ["q3-plan}} Budget is 42k"]]}},
        {"id": "names", "type": "toggle",
         "properties": {"title": ["{{encrypted:Codename Heron}}"]}},
        {"id": "draft", "type": "quote",
         "properties": {"title": ["{{password:unfinished"]}}
    ]
}"#;

fn unlock(memo: &Arc<dyn SessionMemo>, gate: GateSpec, credential: &str) -> RevealPhase {
    let mut controller = RevealController::new(gate, "password123", Arc::clone(memo));
    controller.environment_ready();
    controller.set_attempt(credential);
    controller.submit()
}

#[test]
fn test_reveal_survives_rerender_within_session() {
    let tmp = tempfile::tempdir().unwrap();
    let memo: Arc<dyn SessionMemo> = Arc::new(FileMemo::new(tmp.path().join("memo"), "tab-1"));
    let page = Page::from_json(PAGE).unwrap();

    let gated = scan(&page);
    let ids: Vec<&str> = gated.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, ["budget", "names"]);

    assert_eq!(
        unlock(&memo, gated[0].gate.clone(), "q3-plan"),
        RevealPhase::Revealed
    );

    // Re-render with a fresh memo handle on the same session
    let memo: Arc<dyn SessionMemo> = Arc::new(FileMemo::new(tmp.path().join("memo"), "tab-1"));
    let html = PageRenderer::new("password123", memo)
        .with_environment_ready(true)
        .render(&page);

    assert!(html.contains(r#"<div class="veil-revealed">Budget is 42k</div>"#));
    assert!(!html.contains("Codename Heron"));
    assert!(html.contains("<blockquote>{{password:unfinished</blockquote>"));
}

#[test]
fn test_new_session_locks_again() {
    let tmp = tempfile::tempdir().unwrap();
    let memo: Arc<dyn SessionMemo> = Arc::new(FileMemo::new(tmp.path().join("memo"), "tab-1"));
    let gate = GateSpec::encrypted("Codename Heron");

    assert_eq!(
        unlock(&memo, gate.clone(), "password123"),
        RevealPhase::Revealed
    );

    let memo: Arc<dyn SessionMemo> = Arc::new(FileMemo::new(tmp.path().join("memo"), "tab-2"));
    let mut controller = RevealController::new(gate, "password123", memo);
    assert_eq!(controller.environment_ready(), RevealPhase::Locked);
}

#[test]
fn test_wrong_credential_is_retryable() {
    let tmp = tempfile::tempdir().unwrap();
    let memo: Arc<dyn SessionMemo> = Arc::new(FileMemo::new(tmp.path().join("memo"), "tab-1"));
    let mut controller =
        RevealController::new(GateSpec::password("abc", "hidden"), "password123", memo);
    controller.environment_ready();

    controller.set_attempt("xyz");
    assert_eq!(controller.submit(), RevealPhase::Locked);
    assert!(!controller.current_state().revealed);
    assert!(controller.current_state().error_message.is_some());
    assert!(controller.render_html().contains("veil-error"));

    controller.set_attempt("abc");
    assert_eq!(controller.handle_key("Enter"), RevealPhase::Revealed);
}

#[test]
fn test_extract_properties() {
    let cases = [
        ("no directive here", None),
        (
            "{{password: s }} p ",
            Some(GateSpec::password("s", "p")),
        ),
        ("{{encrypted: p }}", Some(GateSpec::encrypted("p"))),
        (
            "{{password:x}}{{encrypted:y}}",
            Some(GateSpec::password("x", "{{encrypted:y}}")),
        ),
        ("{{password:abc", None),
    ];

    for (text, expected) in cases {
        let runs = vec![TextRun::from(text)];
        assert_eq!(extract(BlockType::Text, &runs), expected, "{text:?}");
        assert_eq!(
            extract(BlockType::Text, &runs),
            extract(BlockType::Text, &runs)
        );
    }
}
