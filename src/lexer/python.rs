// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Python line tokenization. Shares the engine's normal-state dispatch
//! with JavaScript/TypeScript; owns only its keyword/builtin/constant tables and
//! the triple-quoted string continuation logic the engine delegates back here.

use crate::lexer::common::NumberGrammar;
use crate::lexer::engine::{continue_block_comment, dispatch_normal, scan_body, BodyScan};
use crate::lexer::profile::LanguageProfile;
use crate::token::{LineState, LineStateKind, QuoteFlavor, Token, TokenType};
use once_cell::sync::Lazy;
use std::collections::HashSet;

static PY_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
        "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is",
        "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with",
        "yield",
    ]
    .into_iter()
    .collect()
});

static PY_CONSTANTS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["True", "False", "None", "NotImplemented", "Ellipsis"].into_iter().collect());

static PY_BUILTINS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "print", "len", "range", "str", "int", "float", "bool", "list", "dict", "set", "tuple",
        "type", "isinstance", "issubclass", "super", "open", "enumerate", "zip", "map", "filter",
        "sorted", "reversed", "sum", "min", "max", "abs", "round", "input", "iter", "next",
        "staticmethod", "classmethod", "property", "self", "cls",
    ]
    .into_iter()
    .collect()
});

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        keywords: &PY_KEYWORDS,
        builtins: &PY_BUILTINS,
        constants: &PY_CONSTANTS,
        line_comment: Some("#"),
        supports_block_comments: false,
        supports_template_strings: false,
        supports_triple_strings: true,
        supports_decorators: true,
        number_grammar: NumberGrammar { allow_bigint_suffix: false, allow_complex_suffix: true, allow_octal_prefix: true },
    }
}

pub fn tokenize_line(line: &str, state: LineState) -> (Vec<Token>, LineState) {
    let profile = profile();
    let mut tokens = Vec::new();

    let exit = match state.kind {
        LineStateKind::Normal => dispatch_normal(&profile, line, 0, &mut tokens),
        LineStateKind::TripleString => {
            continue_triple_string(&profile, line, QuoteFlavor::decode(state.template_expression_depth), &mut tokens)
        }
        LineStateKind::BlockComment => continue_block_comment(&profile, line, &mut tokens),
        LineStateKind::TemplateString => unreachable!("Python never enters TemplateString"),
    };

    (tokens, exit)
}

/// If `line[pos..]` starts with a triple-quote opener (`"""` or `'''`), returns
/// which flavor. Shared with [`crate::lexer::engine::dispatch_normal`] so the
/// engine can open triple strings without Python having its own copy of the
/// normal-state loop.
pub(crate) fn triple_quote_flavor_at(line: &str, pos: usize) -> Option<QuoteFlavor> {
    if line[pos..].starts_with("\"\"\"") {
        Some(QuoteFlavor::Double)
    } else if line[pos..].starts_with("'''") {
        Some(QuoteFlavor::Single)
    } else {
        None
    }
}

/// Resumes a line entered inside a triple-quoted string. Scans for the
/// matching closer; if found, emits one string token and resumes `normal`
/// dispatch for the remainder, otherwise the whole line is string body and the
/// state carries over unchanged.
fn continue_triple_string(profile: &LanguageProfile, line: &str, flavor: QuoteFlavor, out: &mut Vec<Token>) -> LineState {
    match scan_body(line, 0, flavor.quote_str(), None) {
        BodyScan::Closed(end) => {
            out.push(Token::new(TokenType::String, 0, end));
            dispatch_normal(profile, line, end, out)
        }
        BodyScan::Opened(_) => unreachable!("triple strings have no interpolation marker"),
        BodyScan::Unterminated => {
            if !line.is_empty() {
                out.push(Token::new(TokenType::String, 0, line.len()));
            }
            LineState::triple_string(flavor)
        }
    }
}
