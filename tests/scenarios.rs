// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The six named end-to-end scenarios as standalone checks, separate
//! from the module-level unit tests each component already carries. S5 and
//! S6 spin up the real offload worker thread — no mocked channel — since the
//! whole point of those two is genuine cross-thread message ordering.

use maple_syntax::cache::DocumentHighlightState;
use maple_syntax::edit::EditNotification;
use maple_syntax::token::{LanguageId, LineStateKind, TokenType};
use maple_syntax::worker::{WorkerHandle, WorkerResponse};
use std::time::Duration;

fn lines(src: &[&str]) -> Vec<String> {
    src.iter().map(|s| s.to_string()).collect()
}

fn edit(changed_from_line: usize, total_line_count: usize, version: u64) -> EditNotification {
    EditNotification { changed_from_line, total_line_count, version }
}

/// S1 — Block comment propagation.
#[test]
fn s1_block_comment_propagates_across_lines() {
    let doc = lines(&["/*", " * hi", " */"]);
    let state = DocumentHighlightState::full_init(LanguageId::JavaScript, &doc, 0);

    assert_eq!(state.get_tokens(0).unwrap()[0].kind, TokenType::Comment);

    // line 1's state before/after are both block-comment; we can observe this
    // indirectly: line 2 (0-indexed) closes the comment and exits normal.
    assert_eq!(state.get_tokens(1).unwrap()[0].kind, TokenType::Comment);
    assert_eq!(state.get_tokens(2).unwrap()[0].kind, TokenType::Comment);

    // Re-running line 3 standalone from a block-comment entry state confirms
    // both its entry and exit are block-comment until the closer.
    let (_, exit) = maple_syntax::lexer::tokenize_line(
        LanguageId::JavaScript,
        " * hi",
        maple_syntax::token::LineState::block_comment(),
    );
    assert_eq!(exit.kind, LineStateKind::BlockComment);

    let (_, exit) = maple_syntax::lexer::tokenize_line(
        LanguageId::JavaScript,
        " */",
        maple_syntax::token::LineState::block_comment(),
    );
    assert_eq!(exit.kind, LineStateKind::Normal);
}

/// S2 — Early exit after local edit: only the edited line is retokenized.
#[test]
fn s2_early_exit_reuses_unaffected_lines_by_reference() {
    let doc = lines(&["const a = 1;", "const b = 2;", "const c = 3;", "const d = 4;", "const e = 5;"]);
    let mut state = DocumentHighlightState::full_init(LanguageId::JavaScript, &doc, 0);
    let before: Vec<_> = (0..5).map(|i| state.get_tokens(i).unwrap().to_vec()).collect();

    let mut edited = doc.clone();
    edited[1] = "const b = 999;".to_string();
    let changed = state.update(&edited, edit(2, edited.len(), 1));

    assert!(changed);
    assert_eq!(state.get_tokens(0).unwrap(), before[0].as_slice());
    assert_ne!(state.get_tokens(1).unwrap(), before[1].as_slice());
    for i in 2..5 {
        assert_eq!(state.get_tokens(i).unwrap(), before[i].as_slice(), "line {i} should be untouched");
    }
}

/// S3 — An edit inside a block comment forces retokenization of everything
/// after it, since the comment's exit state is unchanged but its content is.
#[test]
fn s3_state_propagation_forces_resuffix() {
    let doc = lines(&["/*", " * comment", " */", "const x = 1;"]);
    let mut state = DocumentHighlightState::full_init(LanguageId::JavaScript, &doc, 0);

    let mut edited = doc.clone();
    edited[2] = " * still comment".to_string();
    state.update(&edited, edit(3, edited.len(), 1));

    assert_eq!(state.get_tokens(2).unwrap()[0].kind, TokenType::Comment);
    assert_eq!(state.get_tokens(3).unwrap()[0].kind, TokenType::Comment);
    assert!(state.get_tokens(3).unwrap().iter().all(|t| t.kind == TokenType::Comment));
}

/// S4 — Python triple-quoted string spanning three lines.
#[test]
fn s4_python_triple_quoted_string_spans_lines() {
    let doc = lines(&["\"\"\"doc", "still doc", "end\"\"\""]);
    let state = DocumentHighlightState::full_init(LanguageId::Python, &doc, 0);

    for i in 0..3 {
        let tokens = state.get_tokens(i).unwrap();
        assert_eq!(tokens.len(), 1, "line {i} should be a single string token");
        assert_eq!(tokens[0].kind, TokenType::String);
    }
}

/// S5 — A delayed, outdated worker response must be dropped.
#[test]
fn s5_outdated_worker_response_is_dropped() {
    let handle = WorkerHandle::spawn(LanguageId::JavaScript, lines(&["const a = 1;"]), 1);
    // init@v=1 is in flight. Immediately issue update@v=2 before draining.
    handle.send_update(LanguageId::JavaScript, 1, lines(&["const a = 2;"]), 1, 2);

    let mut responses = Vec::new();
    for _ in 0..2 {
        responses.push(handle.recv_blocking(Duration::from_secs(2)).unwrap());
    }

    // Simulate the driver applying responses as they arrive, filtering by
    // last_sent_version.
    let last_sent_version = 2u64;
    let mut applied_version = None;
    for response in responses {
        if response.version() < last_sent_version {
            continue;
        }
        applied_version = Some(response.version());
    }

    assert_eq!(applied_version, Some(2), "only the v=2 update should be applied");
}

/// S6 — Language change mid-document triggers a full reinit in the background.
#[test]
fn s6_language_change_triggers_full_reinit_in_background() {
    let handle = WorkerHandle::spawn(LanguageId::JavaScript, lines(&["const a = 1;", "const b = 2;", "const c = 3;"]), 1);
    handle.recv_blocking(Duration::from_secs(2)).unwrap();

    handle.send_update(LanguageId::Python, 1, lines(&["x = 1", "y = 2", "z = 3"]), 3, 2);
    let response = handle.recv_blocking(Duration::from_secs(2)).unwrap();

    match response {
        WorkerResponse::InitComplete { version, lines } => {
            assert_eq!(version, 2);
            assert_eq!(lines.len(), 3);
            assert_eq!(lines[0].tokens[0].kind, TokenType::Identifier);
        }
        other => panic!("expected a full reinit on language change, got {other:?}"),
    }
}

/// Boundary behaviors not already covered by a named scenario.
mod boundaries {
    use super::*;

    #[test]
    fn empty_document_has_no_lines() {
        let state = DocumentHighlightState::full_init(LanguageId::JavaScript, &[], 0);
        assert_eq!(state.line_count(), 0);
        assert!(state.get_tokens(0).is_none());
    }

    #[test]
    fn single_empty_line_has_no_tokens() {
        let state = DocumentHighlightState::full_init(LanguageId::Python, &lines(&[""]), 0);
        assert_eq!(state.line_count(), 1);
        assert!(state.get_tokens(0).unwrap().is_empty());
    }

    #[test]
    fn whitespace_only_line_is_a_single_whitespace_token() {
        let state = DocumentHighlightState::full_init(LanguageId::JavaScript, &lines(&["    "]), 0);
        let tokens = state.get_tokens(0).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenType::Whitespace);
    }

    #[test]
    fn unterminated_block_comment_at_last_line_stays_open() {
        let state = DocumentHighlightState::full_init(LanguageId::JavaScript, &lines(&["const a = 1;", "/* never closes"]), 0);
        assert_eq!(state.get_tokens(1).unwrap()[0].kind, TokenType::Comment);
    }

    #[test]
    fn template_string_with_embedded_expression_at_last_line() {
        let state = DocumentHighlightState::full_init(LanguageId::JavaScript, &lines(&["const s = `hi ${name}`;"]), 0);
        assert!(state.get_tokens(0).unwrap().iter().any(|t| t.kind == TokenType::String));
    }

    #[test]
    fn triple_quoted_string_continuing_past_end_of_document() {
        let state = DocumentHighlightState::full_init(LanguageId::Python, &lines(&["\"\"\"still open"]), 0);
        assert_eq!(state.get_tokens(0).unwrap()[0].kind, TokenType::String);
    }

    /// A blank line in the middle of an open triple-quoted string must not
    /// panic on a zero-length token; it just contributes no tokens while the
    /// triple-string state carries straight through it.
    #[test]
    fn blank_line_mid_triple_quoted_string_produces_no_tokens_and_stays_open() {
        let state = DocumentHighlightState::full_init(LanguageId::Python, &lines(&["\"\"\"doc", "", "still open"]), 0);
        assert!(state.get_tokens(1).unwrap().is_empty());
        assert_eq!(state.get_tokens(2).unwrap()[0].kind, TokenType::String);
    }

    /// Same hazard for a template string: a blank continuation line must not
    /// panic on a zero-length token.
    #[test]
    fn blank_line_mid_template_string_produces_no_tokens_and_stays_open() {
        let state = DocumentHighlightState::full_init(LanguageId::JavaScript, &lines(&["const s = `still open", "", "more text"]), 0);
        assert!(state.get_tokens(1).unwrap().is_empty());
        assert_eq!(state.get_tokens(2).unwrap()[0].kind, TokenType::String);
    }

    #[test]
    fn shrink_to_zero_then_regrow() {
        let mut state = DocumentHighlightState::full_init(LanguageId::JavaScript, &lines(&["const a = 1;", "const b = 2;"]), 0);
        state.update(&[], edit(1, 0, 1));
        assert_eq!(state.line_count(), 0);

        state.update(&lines(&["const c = 3;"]), edit(1, 1, 2));
        assert_eq!(state.line_count(), 1);
        assert_eq!(state.get_tokens(0).unwrap()[0].kind, TokenType::Keyword);
    }

    #[test]
    fn delete_all_lines_but_one() {
        let doc = lines(&["const a = 1;", "const b = 2;", "const c = 3;"]);
        let mut state = DocumentHighlightState::full_init(LanguageId::JavaScript, &doc, 0);
        state.update(&lines(&["const a = 1;"]), edit(1, 1, 1));
        assert_eq!(state.line_count(), 1);
    }

    #[test]
    fn idempotent_update_with_unchanged_version_is_a_no_op() {
        // Same version number as the cache already holds, even though the
        // text passed in differs: the no-op check is version-keyed, not
        // content-keyed, so the differing text must never be picked up.
        let doc = lines(&["const a = 1;"]);
        let mut state = DocumentHighlightState::full_init(LanguageId::JavaScript, &doc, 3);

        let mut different_text = doc.clone();
        different_text[0] = "let a = 2;".to_string();
        assert!(!state.update(&different_text, edit(1, different_text.len(), 3)));

        assert_eq!(state.version(), 3);
        assert_eq!(state.get_tokens(0).unwrap()[0].kind, TokenType::Keyword);
    }

    #[test]
    fn determinism_two_full_tokenizations_agree() {
        let doc = lines(&["def f(x): return x * 2", "", "class Foo: pass"]);
        let a = DocumentHighlightState::full_init(LanguageId::Python, &doc, 0);
        let b = DocumentHighlightState::full_init(LanguageId::Python, &doc, 0);
        for i in 0..doc.len() {
            assert_eq!(a.get_tokens(i), b.get_tokens(i));
        }
    }
}
