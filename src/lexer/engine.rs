// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The shared `normal`-state dispatch loop used by every language that has
//! one (JavaScript, TypeScript, Python). Plain text bypasses this engine entirely
//! (it returns one whitespace/identifier token covering the line).

use crate::lexer::common::{
    find_after, is_delimiter_char, is_identifier_start, scan_identifier, scan_number,
    scan_operator_run, scan_to_end_of_line, scan_whitespace,
};
use crate::lexer::profile::{LanguageProfile, WordClass};
use crate::token::{LineState, Token, TokenType};

/// Result of scanning forward from inside a template-literal or triple-quoted
/// string body for whichever closer or interpolation marker applies.
pub(crate) enum BodyScan {
    /// The body closed on this line; `end` is one past the closing marker.
    Closed(usize),
    /// A `${` interpolation opened (template strings only); `end` is one past it.
    Opened(usize),
    /// Neither was found; the construct continues to the next line.
    Unterminated,
}

/// Scans an unescaped occurrence of `close` starting at `pos`, honoring `\`
/// escapes. Used for both triple-quoted string bodies (`close` = `"""`/`'''`,
/// no interpolation) and template-literal bodies (`close` = `` ` ``, interpolation
/// = `${`).
pub(crate) fn scan_body(line: &str, pos: usize, close: &str, interpolation: Option<&str>) -> BodyScan {
    let mut i = pos;
    while i < line.len() {
        let c = line[i..].chars().next().unwrap();
        if c == '\\' {
            i += c.len_utf8();
            if i < line.len() {
                let escaped = line[i..].chars().next().unwrap();
                i += escaped.len_utf8();
            }
            continue;
        }
        if line[i..].starts_with(close) {
            return BodyScan::Closed(i + close.len());
        }
        if let Some(marker) = interpolation {
            if line[i..].starts_with(marker) {
                return BodyScan::Opened(i + marker.len());
            }
        }
        i += c.len_utf8();
    }
    BodyScan::Unterminated
}

/// Runs the shared `normal`-state dispatch table from `start` to the end of
/// `line`, appending tokens to `out`. Returns the exit state: `Normal` unless the
/// line ends inside a block comment (JS/TS), which is the only multi-line
/// construct this engine itself can open (template/triple strings are opened by
/// the caller before or after delegating to this function).
pub(crate) fn dispatch_normal(profile: &LanguageProfile, line: &str, start: usize, out: &mut Vec<Token>) -> LineState {
    let mut pos = start;
    let len = line.len();

    while pos < len {
        let c = line[pos..].chars().next().unwrap();

        if c == ' ' || c == '\t' {
            let end = scan_whitespace(line, pos);
            out.push(Token::new(TokenType::Whitespace, pos, end - pos));
            pos = end;
            continue;
        }

        if let Some(marker) = profile.line_comment {
            if line[pos..].starts_with(marker) {
                let end = scan_to_end_of_line(line);
                out.push(Token::new(TokenType::Comment, pos, end - pos));
                pos = end;
                continue;
            }
        }

        if profile.supports_block_comments && line[pos..].starts_with("/*") {
            match find_after(line, pos + 2, "*/") {
                Some(end) => {
                    out.push(Token::new(TokenType::Comment, pos, end - pos));
                    pos = end;
                    continue;
                }
                None => {
                    out.push(Token::new(TokenType::Comment, pos, len - pos));
                    return LineState::block_comment();
                }
            }
        }

        if profile.supports_triple_strings {
            if let Some(flavor) = crate::lexer::python::triple_quote_flavor_at(line, pos) {
                let body_start = pos + 3;
                match scan_body(line, body_start, flavor.quote_str(), None) {
                    BodyScan::Closed(end) => {
                        out.push(Token::new(TokenType::String, pos, end - pos));
                        pos = end;
                        continue;
                    }
                    BodyScan::Opened(_) => unreachable!("triple strings have no interpolation marker"),
                    BodyScan::Unterminated => {
                        out.push(Token::new(TokenType::String, pos, len - pos));
                        return LineState::triple_string(flavor);
                    }
                }
            }
        }

        if profile.supports_template_strings && c == '`' {
            return crate::lexer::javascript::open_template_string(profile, line, pos, out);
        }

        if c == '"' || c == '\'' {
            let (end, _terminated) = crate::lexer::common::scan_quoted_string_body(line, pos + 1, c);
            out.push(Token::new(TokenType::String, pos, end - pos));
            pos = end;
            continue;
        }

        if profile.supports_decorators && c == '@' {
            out.push(Token::new(TokenType::Keyword, pos, 1));
            pos += 1;
            let ws_end = scan_whitespace(line, pos);
            if ws_end > pos {
                out.push(Token::new(TokenType::Whitespace, pos, ws_end - pos));
                pos = ws_end;
            }
            if pos < len && is_identifier_start(line[pos..].chars().next().unwrap()) {
                let end = scan_identifier(line, pos);
                out.push(Token::new(TokenType::Function, pos, end - pos));
                pos = end;
            }
            continue;
        }

        let is_digit_start = c.is_ascii_digit()
            || (c == '.' && line[pos + 1..].chars().next().is_some_and(|n| n.is_ascii_digit()));
        if is_digit_start {
            let end = scan_number(line, pos, &profile.number_grammar);
            out.push(Token::new(TokenType::Number, pos, end - pos));
            pos = end;
            continue;
        }

        if is_identifier_start(c) {
            let end = scan_identifier(line, pos);
            let word = &line[pos..end];
            let kind = classify_identifier(profile, line, word, end);
            out.push(Token::new(kind, pos, end - pos));
            pos = end;
            continue;
        }

        if crate::lexer::common::is_operator_char(c) {
            let end = scan_operator_run(line, pos);
            out.push(Token::new(TokenType::Operator, pos, end - pos));
            pos = end;
            continue;
        }

        if is_delimiter_char(c) {
            out.push(Token::new(TokenType::Punctuation, pos, c.len_utf8()));
            pos += c.len_utf8();
            continue;
        }

        out.push(Token::new(TokenType::Unknown, pos, c.len_utf8()));
        pos += c.len_utf8();
    }

    LineState::normal()
}

/// Classifies a scanned identifier via the lookup chain: keyword/builtin/
/// constant sets first, then the `identifier(` function lookahead, then the
/// class heuristic (starts uppercase, contains a lowercase letter somewhere).
fn classify_identifier(profile: &LanguageProfile, line: &str, word: &str, end: usize) -> TokenType {
    match profile.classify_word(word) {
        WordClass::Keyword => return TokenType::Keyword,
        WordClass::Constant => return TokenType::Constant,
        WordClass::Builtin => return TokenType::Function,
        WordClass::Plain => {}
    }

    let after_ws = scan_whitespace(line, end);
    if line[after_ws..].starts_with('(') {
        return TokenType::Function;
    }

    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        if first.is_uppercase() && word.chars().any(|c| c.is_lowercase()) {
            return TokenType::Class;
        }
    }

    TokenType::Identifier
}

/// Shared `block-comment` entry-state handling: scan for `*/`; if found,
/// emit one comment token up to and including it and continue in `normal` for the
/// remainder of the line; otherwise the whole line is one comment token and the
/// state stays `block-comment`.
pub(crate) fn continue_block_comment(profile: &LanguageProfile, line: &str, out: &mut Vec<Token>) -> LineState {
    if line.is_empty() {
        return LineState::block_comment();
    }
    match find_after(line, 0, "*/") {
        Some(end) => {
            out.push(Token::new(TokenType::Comment, 0, end));
            dispatch_normal(profile, line, end, out)
        }
        None => {
            out.push(Token::new(TokenType::Comment, 0, line.len()));
            LineState::block_comment()
        }
    }
}
