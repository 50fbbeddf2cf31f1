// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The shared data model every line tokenizer and the document cache build on:
//! [`LanguageId`], [`TokenType`], [`Token`] and [`LineState`].

use serde::{Deserialize, Serialize};

/// Languages the tokenizer family supports. Closed set by design: adding a
/// language means adding both a variant here and a module under `lexer/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageId {
    JavaScript,
    TypeScript,
    Python,
    PlainText,
}

impl LanguageId {
    /// The language's initial line state, entering the first line of a fresh document.
    pub fn initial_state(self) -> LineState {
        LineState::normal()
    }
}

/// Classification of a lexeme. Closed set; every token carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    Keyword,
    String,
    Number,
    Comment,
    Operator,
    Punctuation,
    Identifier,
    Function,
    Class,
    Constant,
    Variable,
    Parameter,
    Property,
    Tag,
    Attribute,
    Regex,
    Whitespace,
    Unknown,
}

/// A classified, length-bounded span within a single line.
///
/// Invariant: `start + length <= line_text.len()`; tokens within a line are
/// strictly ordered by `start` and non-overlapping, and their spans concatenate to
/// cover the full line with no gaps. `length` is always greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenType,
    pub start: usize,
    pub length: usize,
}

impl Token {
    pub fn new(kind: TokenType, start: usize, length: usize) -> Self {
        debug_assert!(length > 0, "tokens must cover at least one byte");
        Self { kind, start, length }
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// The lexical mode a line is entered or exited in.
///
/// `template_expression_depth` is only meaningful for `TemplateString` (nesting
/// depth of `${ }` expressions reached so far) and `TripleString` (quote flavor:
/// 1 = double, 2 = single). `Normal` and `BlockComment` always carry depth 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineState {
    pub kind: LineStateKind,
    pub template_expression_depth: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStateKind {
    Normal,
    BlockComment,
    TemplateString,
    TripleString,
}

/// Quote flavor encoded in a `TripleString` state's depth field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteFlavor {
    Double,
    Single,
}

impl QuoteFlavor {
    pub fn encode(self) -> u32 {
        match self {
            QuoteFlavor::Double => 1,
            QuoteFlavor::Single => 2,
        }
    }

    pub fn decode(depth: u32) -> Self {
        match depth {
            2 => QuoteFlavor::Single,
            _ => QuoteFlavor::Double,
        }
    }

    pub fn quote_str(self) -> &'static str {
        match self {
            QuoteFlavor::Double => "\"\"\"",
            QuoteFlavor::Single => "'''",
        }
    }
}

impl LineState {
    pub fn normal() -> Self {
        Self { kind: LineStateKind::Normal, template_expression_depth: 0 }
    }

    pub fn block_comment() -> Self {
        Self { kind: LineStateKind::BlockComment, template_expression_depth: 0 }
    }

    pub fn template_string(depth: u32) -> Self {
        Self { kind: LineStateKind::TemplateString, template_expression_depth: depth }
    }

    pub fn triple_string(flavor: QuoteFlavor) -> Self {
        Self { kind: LineStateKind::TripleString, template_expression_depth: flavor.encode() }
    }

    pub fn is_normal(&self) -> bool {
        self.kind == LineStateKind::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_normal_for_every_language() {
        for lang in [LanguageId::JavaScript, LanguageId::TypeScript, LanguageId::Python, LanguageId::PlainText] {
            assert_eq!(lang.initial_state(), LineState::normal());
        }
    }

    #[test]
    fn quote_flavor_round_trips_through_depth() {
        assert_eq!(QuoteFlavor::decode(QuoteFlavor::Double.encode()), QuoteFlavor::Double);
        assert_eq!(QuoteFlavor::decode(QuoteFlavor::Single.encode()), QuoteFlavor::Single);
    }

    #[test]
    fn token_end_is_start_plus_length() {
        let t = Token::new(TokenType::Identifier, 4, 3);
        assert_eq!(t.end(), 7);
    }
}
