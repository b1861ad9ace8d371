//! PostScript string literal encoding
//!
//! Key text is untrusted as far as PostScript syntax goes: a stray `)` or
//! `\` would end or corrupt the literal. Everything is escaped so each byte
//! survives exactly, and only printable ASCII appears unescaped.

use std::fmt::Write;

/// Escape `text` for the inside of a `( ... )` literal
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for b in text.bytes() {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x08 => out.push_str("\\b"),
            0x0c => out.push_str("\\f"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out
}

/// Build a complete string literal from `segments`
///
/// Segments are joined with a backslash-newline, which PostScript drops
/// inside strings, so the source stays line-oriented while the value is the
/// plain concatenation of the segments.
pub fn string_literal<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::from("(");
    for (i, segment) in segments.into_iter().enumerate() {
        if i > 0 {
            out.push_str("\\\n");
        }
        out.push_str(&escape(segment));
    }
    out.push(')');
    out
}

/// Split `text` into pieces of at most `width` characters
pub fn chunks(text: &str, width: usize) -> Vec<&str> {
    let width = width.max(1);
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == width {
            pieces.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}
