// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Edit descriptors the driver consumes.
//!
//! [`TextChangeNotification`] is the ergonomic, classified descriptor an
//! embedder's buffer integration produces; it lowers to [`PendingEdit`], the
//! minimal `{changed_from_line, version}` shape a [`crate::driver::DocumentSource`]
//! accessor yields. The driver assembles the full [`EditNotification`] triple
//! the cache's incremental update actually consumes from that `PendingEdit`
//! plus the document's current line count, since only the driver knows both.
//! Deliberately decoupled from any particular text-buffer/undo-stack
//! representation — this crate only needs to know where a change started and
//! what line count and version resulted.

use serde::{Deserialize, Serialize};

/// The minimal edit descriptor the document cache's incremental update
/// consumes: the first line whose text may differ, the document's new
/// total line count, and a version strictly greater than the cache's current
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditNotification {
    /// 1-indexed; lines before this one are guaranteed unchanged.
    pub changed_from_line: usize,
    pub total_line_count: usize,
    pub version: u64,
}

/// What the driver's edit-metadata accessor yields between edits: just
/// enough to know where re-tokenization must start, plus the version that
/// edit produced. The accessor clears this once the driver consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEdit {
    pub changed_from_line: usize,
    pub version: u64,
}

/// The kind of text change that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextChangeType {
    Insert,
    Delete,
    Replace,
    /// Several changes collapsed into one notification (e.g. undo/redo).
    Multiple,
}

/// A richer, classified edit descriptor that an embedder's buffer
/// integration can build directly from its own insert/delete/replace
/// operations, instead of hand-computing `changed_from_line` itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChangeNotification {
    pub start_line: usize,
    pub end_line: usize,
    pub line_delta: isize,
    pub change_type: TextChangeType,
}

impl TextChangeNotification {
    pub fn new(start_line: usize, end_line: usize, line_delta: isize, change_type: TextChangeType) -> Self {
        Self { start_line, end_line, line_delta, change_type }
    }

    pub fn single_line(line: usize, change_type: TextChangeType) -> Self {
        Self::new(line, line, 0, change_type)
    }

    pub fn insert(start_line: usize, lines_added: usize) -> Self {
        Self::new(start_line, start_line + lines_added, lines_added as isize, TextChangeType::Insert)
    }

    pub fn delete(start_line: usize, lines_deleted: usize) -> Self {
        Self::new(start_line, start_line, -(lines_deleted as isize), TextChangeType::Delete)
    }

    pub fn replace(start_line: usize, end_line: usize, line_delta: isize) -> Self {
        Self::new(start_line, end_line, line_delta, TextChangeType::Replace)
    }

    pub fn into_pending(self, version: u64) -> PendingEdit {
        PendingEdit { changed_from_line: self.start_line, version }
    }
}
