//! Declaration parsing.
//!
//! Turns the text of one environment file into declarations. The grammar is
//! line oriented with one exception: a quoted value may span several physical
//! lines.
//!
//! ```text
//! [whitespace] [export <whitespace>] KEY <separator> [value] [# comment]
//!
//! KEY        = 1*( ALPHA / DIGIT / "_" / "." / "-" )
//! separator  = [whitespace] "=" [whitespace]
//!            / ":" 1*whitespace
//! value      = 'single' / "double" / `backtick` / unquoted
//! ```
//!
//! The parser never fails. Lines that do not match the grammar are skipped.
//!
//! The scanner walks the normalized text byte by byte. Every byte the grammar
//! cares about is ASCII, so slicing at the positions it finds always lands on
//! a character boundary.

use crate::environment::EnvironmentLayer;
use std::borrow::Cow;

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;

/// The quote kind that delimited a declaration's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteKind {
    /// The value was not quoted.
    None,
    /// `'value'`: kept literally.
    Single,
    /// `"value"`: `\n` and `\r` are expanded.
    Double,
    /// `` `value` ``: kept literally.
    Backtick,
}

impl QuoteKind {
    fn opening(byte: u8) -> Option<Self> {
        match byte {
            b'\'' => Some(Self::Single),
            b'"' => Some(Self::Double),
            b'`' => Some(Self::Backtick),
            _ => None,
        }
    }

    fn delimiter(self) -> Option<u8> {
        match self {
            Self::None => None,
            Self::Single => Some(b'\''),
            Self::Double => Some(b'"'),
            Self::Backtick => Some(b'`'),
        }
    }
}

/// A single `KEY=value` declaration as it appears in one file.
///
/// The value is fully resolved: surrounding quotes are stripped and, for
/// double-quoted values, escape sequences are expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDeclaration {
    pub key: String,
    pub value: String,
    pub quote: QuoteKind,
}

/// Parses declaration text into a layer.
///
/// When `empty_as_undefined` is set, keys whose resolved value is empty or
/// only whitespace are left out of the layer instead of being stored empty.
/// A key declared twice in the same text keeps its last value.
///
/// # Examples
///
/// ```
/// use envstack_core::parse;
///
/// let layer = parse("HOST=localhost # dev only\nEMPTY=\n", true);
///
/// assert_eq!(layer.get("HOST"), Some("localhost"));
/// assert!(!layer.contains_key("EMPTY"));
///
/// let layer = parse("EMPTY=\n", false);
/// assert_eq!(layer.get("EMPTY"), Some(""));
/// ```
pub fn parse(content: &str, empty_as_undefined: bool) -> EnvironmentLayer {
    let mut layer = EnvironmentLayer::new();
    for declaration in declarations(content) {
        if empty_as_undefined && declaration.value.trim().is_empty() {
            continue;
        }
        layer.insert(declaration.key, declaration.value);
    }
    layer
}

/// Returns the declarations found in `content`, in file order.
///
/// Unlike [`parse`], repeated keys are all reported and empty values are
/// never dropped.
pub fn declarations(content: &str) -> Declarations {
    Declarations {
        text: normalize_newlines(content).into_owned(),
        pos: 0,
    }
}

/// Converts `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(content: &str) -> Cow<'_, str> {
    if !content.contains('\r') {
        return Cow::Borrowed(content);
    }
    Cow::Owned(content.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Iterator over the declarations of one file. Created by [`declarations`].
#[derive(Debug, Clone)]
pub struct Declarations {
    text: String,
    pos: usize,
}

impl Iterator for Declarations {
    type Item = RawDeclaration;

    fn next(&mut self) -> Option<RawDeclaration> {
        let scanner = Scanner::new(&self.text);
        while self.pos < self.text.len() {
            let line_start = self.pos;
            match scanner.declaration(line_start) {
                Some((declaration, end)) => {
                    self.pos = end + 1;
                    return Some(declaration);
                }
                None => self.pos = scanner.line_end(line_start) + 1,
            }
        }
        None
    }
}

enum Separator {
    /// The value starts at the given offset.
    Value(usize),
    /// A key with no separator at all.
    Bare,
}

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
        }
    }

    /// Attempts to read a declaration starting at `line_start`.
    ///
    /// Returns the declaration and the offset of the line feed (or end of
    /// text) terminating it.
    fn declaration(&self, line_start: usize) -> Option<(RawDeclaration, usize)> {
        let start = self.skip_inline_space(line_start);
        if let Some(after_export) = self.export_prefix(start) {
            if let Some(found) = self.declaration_at(after_export) {
                return Some(found);
            }
        }
        self.declaration_at(start)
    }

    fn export_prefix(&self, pos: usize) -> Option<usize> {
        let rest = &self.bytes[pos..];
        let keyword = b"export";
        let separated = rest.get(keyword.len()).copied().is_some_and(is_inline_space);
        if rest.starts_with(keyword) && separated {
            Some(self.skip_inline_space(pos + keyword.len()))
        } else {
            None
        }
    }

    fn declaration_at(&self, key_start: usize) -> Option<(RawDeclaration, usize)> {
        let mut key_end = key_start;
        while self.bytes.get(key_end).copied().is_some_and(is_key_byte) {
            key_end += 1;
        }
        if key_end == key_start {
            return None;
        }

        let key = self.text[key_start..key_end].to_string();
        let (value, quote, end) = match self.separator(key_end)? {
            Separator::Value(value_start) => self.value(value_start),
            Separator::Bare => (String::new(), QuoteKind::None, self.line_end(key_end)),
        };

        let value = if quote == QuoteKind::Double {
            expand_escapes(&value)
        } else {
            value
        };

        Some((RawDeclaration { key, value, quote }, end))
    }

    fn separator(&self, key_end: usize) -> Option<Separator> {
        let after_space = self.skip_inline_space(key_end);
        match self.bytes.get(after_space) {
            Some(b'=') => Some(Separator::Value(self.skip_inline_space(after_space + 1))),
            Some(b':') if after_space == key_end => match self.bytes.get(key_end + 1) {
                Some(&b) if is_inline_space(b) => {
                    Some(Separator::Value(self.skip_inline_space(key_end + 1)))
                }
                // `KEY:` at the end of a line declares an empty value.
                Some(b'\n') => Some(Separator::Value(key_end + 1)),
                _ => None,
            },
            None | Some(b'\n') => Some(Separator::Bare),
            Some(b'#') if after_space > key_end => Some(Separator::Bare),
            _ => None,
        }
    }

    fn value(&self, start: usize) -> (String, QuoteKind, usize) {
        if let Some(kind) = self.bytes.get(start).copied().and_then(QuoteKind::opening) {
            if let Some(found) = self.quoted(start, kind) {
                return found;
            }
        }
        self.unquoted(start)
    }

    /// Reads a quoted span opening at `start`.
    ///
    /// The span ends at the next matching quote that is not preceded by a
    /// backslash, on this line or a later one. Only whitespace and a comment
    /// may follow the closing quote; anything else makes the value unquoted.
    fn quoted(&self, start: usize, kind: QuoteKind) -> Option<(String, QuoteKind, usize)> {
        let quote = kind.delimiter()?;
        let mut i = start + 1;
        let close = loop {
            match self.bytes.get(i) {
                None => return None,
                Some(b'\\') if self.bytes.get(i + 1) == Some(&quote) => i += 2,
                Some(&b) if b == quote => break i,
                Some(_) => i += 1,
            }
        };

        let end = self.trailing(close + 1)?;
        Some((self.text[start + 1..close].to_string(), kind, end))
    }

    fn unquoted(&self, start: usize) -> (String, QuoteKind, usize) {
        let end = self.line_end(start);
        let raw = &self.text[start..end];
        let raw = match raw.find('#') {
            Some(comment) => &raw[..comment],
            None => raw,
        };
        let value = raw.trim();

        // `'a' 'b'` or `'a\'` land here; they are still single-quoted once
        // the outer pair is stripped.
        let bytes = value.as_bytes();
        if bytes.len() >= 2 && bytes[0] == bytes[bytes.len() - 1] {
            if let Some(kind) = QuoteKind::opening(bytes[0]) {
                return (value[1..value.len() - 1].to_string(), kind, end);
            }
        }

        (value.to_string(), QuoteKind::None, end)
    }

    /// Accepts whitespace and an optional comment up to the end of the line.
    fn trailing(&self, pos: usize) -> Option<usize> {
        let pos = self.skip_inline_space(pos);
        match self.bytes.get(pos) {
            None | Some(b'\n') => Some(pos),
            Some(b'#') => Some(self.line_end(pos)),
            Some(_) => None,
        }
    }

    fn skip_inline_space(&self, mut pos: usize) -> usize {
        while self.bytes.get(pos).copied().is_some_and(is_inline_space) {
            pos += 1;
        }
        pos
    }

    fn line_end(&self, pos: usize) -> usize {
        self.bytes[pos..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.bytes.len(), |offset| pos + offset)
    }
}

fn is_key_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'.' | b'-')
}

fn is_inline_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\x0b' | b'\x0c')
}

fn expand_escapes(value: &str) -> String {
    value.replace("\\n", "\n").replace("\\r", "\r")
}
