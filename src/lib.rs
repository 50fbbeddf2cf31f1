// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The incremental, stateful, line-oriented syntax-tokenization engine that
//! powers Maple's editor.
//!
//! Four pieces, leaves first:
//!
//! - [`lexer`] — one hand-written, pure `(line_text, entry_state) -> (tokens,
//!   exit_state)` function per language. No external tokenizer crate; that's
//!   the entire reason this crate exists.
//! - [`cache`] — [`cache::DocumentHighlightState`], the per-document ordered
//!   sequence of [`cache::LineHighlight`] records, kept in lockstep with the
//!   text buffer via an early-exit incremental update.
//! - [`driver`] — [`driver::Driver`], the caller-facing facade that owns one
//!   cache per open document and picks in-process vs. offloaded execution.
//! - [`worker`] — the offload transport: a background thread mirroring the
//!   cache for documents too large to tokenize on the caller's thread, with
//!   outdated-response filtering.
//!
//! [`edit`] carries the wire-level edit descriptors all three higher layers
//! pass between each other.
//!
//! Out of scope, by design: rendering highlighted spans, the text
//! buffer/undo stack itself, collaborative editing, and theming. This crate
//! only ever hands back [`token::Token`] spans; what a consumer does with
//! them is someone else's module.

pub mod cache;
pub mod driver;
pub mod edit;
pub mod lexer;
pub mod token;
pub mod worker;

pub use cache::{DocumentHighlightState, LineHighlight};
pub use driver::{Driver, DocumentSource, DriverConfig};
pub use edit::{EditNotification, PendingEdit, TextChangeNotification, TextChangeType};
pub use token::{LanguageId, LineState, LineStateKind, QuoteFlavor, Token, TokenType};
pub use worker::{WorkerError, WorkerHandle, WorkerRequest, WorkerResponse};
