// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The line tokenizer family: one hand-written lexer per language, sharing
//! the scanning primitives in [`common`] and the normal-state dispatch in
//! [`engine`] through a [`profile::LanguageProfile`]. [`tokenize_line`] is the
//! single entry point the document cache and driver call through.

mod common;
mod engine;
pub mod javascript;
mod plaintext;
mod profile;
pub mod python;

use crate::token::{LanguageId, LineState, Token};
use javascript::JsFlavor;

/// Tokenizes one line under `language`, entering with `state`. Pure function
/// of entry state and line text. Returns the line's tokens and the
/// state the *next* line should be entered with.
pub fn tokenize_line(language: LanguageId, line: &str, state: LineState) -> (Vec<Token>, LineState) {
    match language {
        LanguageId::JavaScript => javascript::tokenize_line(JsFlavor::JavaScript, line, state),
        LanguageId::TypeScript => javascript::tokenize_line(JsFlavor::TypeScript, line, state),
        LanguageId::Python => python::tokenize_line(line, state),
        LanguageId::PlainText => plaintext::tokenize_line(line, state),
    }
}
