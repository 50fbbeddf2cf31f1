// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The document-level highlight cache: one [`LineHighlight`] per line,
//! chained by [`crate::token::LineState`], rebuilt incrementally on edit instead
//! of from scratch.

use crate::edit::EditNotification;
use crate::lexer::tokenize_line;
use crate::token::{LanguageId, LineState, Token};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// One line's cached tokenization result: the tokens themselves, plus the state
/// the line was entered and exited with. `exit_state` is what lets an
/// incremental update early-exit: once a recomputed line's exit state
/// matches what's already cached for it, every line after it is still valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineHighlight {
    pub tokens: Vec<Token>,
    pub entry_state: LineState,
    pub exit_state: LineState,
}

/// The cache for one document: one language, one token cache per line, one
/// monotonic version counter bumped on every update that changes anything.
/// No-op updates — identical text, identical change range — must not bump
/// the version.
#[derive(Debug, Clone)]
pub struct DocumentHighlightState {
    language: LanguageId,
    lines: Vec<LineHighlight>,
    version: u64,
}

impl DocumentHighlightState {
    /// Tokenizes every line of a freshly opened document, chaining entry/exit
    /// states from `language.initial_state()` and recording `version` as the
    /// cache's starting version.
    pub fn full_init(language: LanguageId, lines: &[String], version: u64) -> Self {
        let mut state = Self { language, lines: Vec::with_capacity(lines.len()), version };
        let mut entry = language.initial_state();
        for (idx, text) in lines.iter().enumerate() {
            let (tokens, exit) = tokenize_line(language, text, entry);
            trace!(line = idx, token_count = tokens.len(), "full_init tokenized line");
            state.lines.push(LineHighlight { tokens, entry_state: entry, exit_state: exit });
            entry = exit;
        }
        debug_assert_chain_is_consistent(&state.lines);
        debug!(language = ?state.language, line_count = state.lines.len(), version, "document cache initialized");
        state
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub(crate) fn lines(&self) -> &[LineHighlight] {
        &self.lines
    }

    /// Merges an offloaded `update-complete` response: replaces `lines[from..]`
    /// with the worker's suffix, truncates to match, and stamps the response's
    /// version. `from` is 0-indexed.
    pub(crate) fn apply_remote_suffix(&mut self, from: usize, suffix: Vec<LineHighlight>, version: u64) {
        let from = from.min(self.lines.len());
        self.lines.truncate(from);
        self.lines.extend(suffix);
        self.version = version;
        debug_assert_chain_is_consistent(&self.lines);
    }

    /// Adopts an offloaded `init-complete` response: the background computed
    /// the whole chain from scratch, so the driver just replaces its language
    /// and lines wholesale.
    pub(crate) fn adopt_remote_full(&mut self, language: LanguageId, lines: Vec<LineHighlight>, version: u64) {
        self.language = language;
        self.lines = lines;
        self.version = version;
        debug_assert_chain_is_consistent(&self.lines);
    }

    pub fn get_tokens(&self, line: usize) -> Option<&[Token]> {
        self.lines.get(line).map(|l| l.tokens.as_slice())
    }

    /// Discards every cached line and re-tokenizes under `language`, used when
    /// the document's declared language changes. Stamps `version`
    /// unconditionally, even if the resulting tokens happen to be identical to
    /// what was cached before, since the *language* changed.
    pub fn reinit(&mut self, language: LanguageId, lines: &[String], version: u64) {
        *self = Self::full_init(language, lines, version);
    }

    /// Re-tokenizes starting at `edit.changed_from_line` using the full
    /// current text. `lines` is the document's complete, current line array —
    /// the cache doesn't retain a diff, only the previous token cache, so the
    /// caller always supplies the full post-edit text.
    ///
    /// If `edit.version` equals the cache's current version this is a no-op
    /// per SPEC_FULL.md's idempotence property and returns `false` without
    /// touching `lines` or `version`. Otherwise re-tokenizes line by line from
    /// `edit.changed_from_line`, stopping as soon as a recomputed line's
    /// `(entry_state, exit_state)` pair matches what's already cached there —
    /// everything after that line is guaranteed unaffected since retokenizing
    /// it would reproduce the same chain. Lines past the end of the old cache
    /// (insertions) are always computed. Returns `true` once the cache has
    /// been updated to `edit.version`.
    pub fn update(&mut self, lines: &[String], edit: EditNotification) -> bool {
        if edit.version == self.version {
            trace!(version = edit.version, "incremental update was a no-op, version unchanged");
            return false;
        }

        let old_len = self.lines.len();
        let new_len = lines.len();
        let start = edit.changed_from_line.saturating_sub(1).min(old_len);
        let mut entry = if start == 0 {
            self.language.initial_state()
        } else {
            self.lines[start - 1].exit_state
        };

        let mut new_lines = self.lines[..start].to_vec();
        // The old cache has nothing to reuse past its own end, and the early-exit
        // tail must never be copied past the new document's end either.
        let reusable_tail_end = old_len.min(new_len);

        let mut idx = start;
        while idx < new_len {
            let (tokens, exit) = tokenize_line(self.language, &lines[idx], entry);
            let highlight = LineHighlight { tokens, entry_state: entry, exit_state: exit };

            let early_exit = idx < old_len && self.lines[idx] == highlight;

            new_lines.push(highlight);
            entry = exit;

            if early_exit {
                trace!(line = idx, "incremental update early-exit: cache unchanged from here");
                if idx + 1 < reusable_tail_end {
                    new_lines.extend_from_slice(&self.lines[idx + 1..reusable_tail_end]);
                    entry = self.lines[reusable_tail_end - 1].exit_state;
                }
                idx = reusable_tail_end;
                // A grown document still has genuinely new lines past the old
                // cache's end; keep tokenizing those instead of stopping here.
                continue;
            }

            idx += 1;
        }

        self.lines = new_lines;
        self.version = edit.version;
        debug_assert_chain_is_consistent(&self.lines);
        debug!(from_line = edit.changed_from_line, new_version = self.version, "document cache updated");
        true
    }
}

/// Debug-only check that every line's `entry_state` matches the previous
/// line's `exit_state`. Never runs in release builds; a violation here is a
/// driver/cache bug, not something a caller can trigger through valid input.
fn debug_assert_chain_is_consistent(lines: &[LineHighlight]) {
    if cfg!(debug_assertions) {
        let mut prev_exit: Option<LineState> = None;
        for line in lines {
            if let Some(prev) = prev_exit {
                debug_assert_eq!(line.entry_state, prev, "chain invariant violated: entry state must equal previous exit state");
            }
            prev_exit = Some(line.exit_state);
        }
    }
}
