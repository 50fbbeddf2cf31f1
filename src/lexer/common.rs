// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Character-class scanning primitives shared by the JavaScript/TypeScript and
//! Python line tokenizers. None of this knows
//! about keywords or token classification — it only finds the end of a run of
//! bytes belonging to one lexical shape. Per-language modules own everything
//! language-specific (keyword tables, comment introducers, whether triple-quoted
//! strings exist) and call into here for the parts that don't vary.
//!
//! All positions are byte offsets into the line's UTF-8 representation.

const OPERATOR_CHARS: &[char] = &['+', '-', '*', '/', '%', '=', '!', '<', '>', '&', '|', '^', '~', '?'];
const DELIMITER_CHARS: &[char] = &[',', '.', ';', ':', '(', ')', '[', ']', '{', '}'];

pub fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(&c)
}

pub fn is_delimiter_char(c: char) -> bool {
    DELIMITER_CHARS.contains(&c)
}

pub fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

pub fn is_identifier_continue(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphanumeric()
}

/// Consumes a run of consecutive space/tab characters starting at `pos`.
/// Returns the end position; callers should only invoke this when `line[pos..]`
/// starts with whitespace.
pub fn scan_whitespace(line: &str, pos: usize) -> usize {
    let mut end = pos;
    for c in line[pos..].chars() {
        if c == ' ' || c == '\t' {
            end += c.len_utf8();
        } else {
            break;
        }
    }
    end
}

/// Consumes the rest of the line (a `//` or `#` line comment).
pub fn scan_to_end_of_line(line: &str) -> usize {
    line.len()
}

/// Scans forward from `pos` for `needle`, returning the byte offset just past it
/// if found. Used for `*/`, `` ` ``, `${`, `'''`, `"""` closers.
pub fn find_after(line: &str, pos: usize, needle: &str) -> Option<usize> {
    line[pos..].find(needle).map(|i| pos + i + needle.len())
}

/// Consumes an identifier starting at `pos` (caller has verified `is_identifier_start`
/// holds for the first char). Returns the end position.
pub fn scan_identifier(line: &str, pos: usize) -> usize {
    let mut end = pos;
    for c in line[pos..].chars() {
        if is_identifier_continue(c) {
            end += c.len_utf8();
        } else {
            break;
        }
    }
    end
}

/// Consumes a maximal run of operator characters starting at `pos`.
pub fn scan_operator_run(line: &str, pos: usize) -> usize {
    let mut end = pos;
    for c in line[pos..].chars() {
        if is_operator_char(c) {
            end += c.len_utf8();
        } else {
            break;
        }
    }
    end
}

/// Scans a single/double-quoted string literal body starting just after the
/// opening quote at `pos` (the quote itself is not included in `pos`'s scan).
/// Handles `\` escapes. Returns `(end, terminated)`: `end` is the byte offset one
/// past the closing quote when terminated, or `line.len()` when not; `terminated`
/// tells the caller whether the closing quote was found on this line.
///
/// Unterminated single/double-quoted strings consume to end of line and the
/// tokenizer falls back to `Normal` state regardless, rather than carrying an
/// "unterminated string" state across the line break.
pub fn scan_quoted_string_body(line: &str, pos: usize, quote: char) -> (usize, bool) {
    let mut i = pos;
    while i < line.len() {
        let c = line[i..].chars().next().unwrap();
        if c == '\\' {
            // Consume the backslash and whatever follows it (even if that's the
            // quote character itself), so `\"` doesn't end the string early.
            i += c.len_utf8();
            if i < line.len() {
                let escaped = line[i..].chars().next().unwrap();
                i += escaped.len_utf8();
            }
            continue;
        }
        if c == quote {
            return (i + c.len_utf8(), true);
        }
        i += c.len_utf8();
    }
    (line.len(), false)
}

/// Numeric literal scan parameters, since the exact suffix/prefix grammar differs
/// per language (hex/binary/octal prefixes, `n` BigInt suffix in JS/TS,
/// `j`/`J` complex suffix in Python).
pub struct NumberGrammar {
    pub allow_bigint_suffix: bool,
    pub allow_complex_suffix: bool,
    pub allow_octal_prefix: bool,
}

/// Consumes a numeric literal starting at `pos`. Caller has verified the first
/// character is a decimal digit, or `.` followed by a digit.
pub fn scan_number(line: &str, pos: usize, grammar: &NumberGrammar) -> usize {
    let rest = &line[pos..];
    let mut chars = rest.char_indices().peekable();

    // Radix-prefixed integer literals: 0x.., 0b.., 0o.. (Python only).
    if let Some((_, '0')) = chars.peek().copied() {
        let after_zero = &rest[1..];
        let radix_char = after_zero.chars().next();
        let is_radix = matches!(radix_char, Some('x') | Some('X') | Some('b') | Some('B'))
            || (grammar.allow_octal_prefix && matches!(radix_char, Some('o') | Some('O')));
        if is_radix {
            let mut end = pos + 1 + radix_char.unwrap().len_utf8();
            for c in line[end..].chars() {
                if c.is_alphanumeric() || c == '_' {
                    end += c.len_utf8();
                } else {
                    break;
                }
            }
            return end;
        }
    }

    let mut end = pos;
    let mut seen_dot = false;
    let mut seen_exp = false;
    for c in rest.chars() {
        if c.is_ascii_digit() || c == '_' {
            end += c.len_utf8();
        } else if c == '.' && !seen_dot && !seen_exp {
            seen_dot = true;
            end += c.len_utf8();
        } else if (c == 'e' || c == 'E') && !seen_exp {
            seen_exp = true;
            end += c.len_utf8();
            // Optional sign right after the exponent marker.
            if let Some(sign) = line[end..].chars().next() {
                if sign == '+' || sign == '-' {
                    end += sign.len_utf8();
                }
            }
        } else {
            break;
        }
    }

    if grammar.allow_bigint_suffix {
        if let Some(c) = line[end..].chars().next() {
            if c == 'n' {
                end += c.len_utf8();
            }
        }
    }
    if grammar.allow_complex_suffix {
        if let Some(c) = line[end..].chars().next() {
            if c == 'j' || c == 'J' {
                end += c.len_utf8();
            }
        }
    }

    end
}
