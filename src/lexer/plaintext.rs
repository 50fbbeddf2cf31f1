// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Plain text tokenization: no language grammar. Per the contract, a line
//! is covered by exactly one token — `whitespace` if the line is entirely
//! space/tab, `identifier` otherwise — and state never leaves `Normal`.

use crate::token::{LineState, Token, TokenType};

pub fn tokenize_line(line: &str, _state: LineState) -> (Vec<Token>, LineState) {
    let mut tokens = Vec::new();
    if !line.is_empty() {
        let all_whitespace = line.chars().all(|c| c == ' ' || c == '\t');
        let kind = if all_whitespace { TokenType::Whitespace } else { TokenType::Identifier };
        tokens.push(Token::new(kind, 0, line.len()));
    }

    (tokens, LineState::normal())
}
