//! Line scanning: input repair, line splitting and column tracking.
//!
//! The block parser works on one logical line at a time. Every line handed
//! out by [`Lines`] excludes its terminator; the parser copies it into a
//! buffer ending in a single `\n`, so CR, LF and CRLF all look the same.

use crate::error::MalformedUnicode;
use crate::limits::MAX_INPUT_LEN;
use crate::Range;
use memchr::{memchr, memchr2};
use std::borrow::Cow;

pub const TAB_STOP: usize = 4;
pub const CODE_INDENT: usize = 4;

const BOM: &[u8] = b"\xEF\xBB\xBF";
const REPLACEMENT: &[u8] = "\u{FFFD}".as_bytes();

/// Longest prefix of `input` within `limit` bytes that does not split a
/// UTF-8 sequence.
fn clamp_input(input: &[u8], limit: usize) -> &[u8] {
    if input.len() <= limit {
        return input;
    }
    let mut end = limit;
    while end > 0 && limit - end < 3 && input[end] & 0xC0 == 0x80 {
        end -= 1;
    }
    tracing::warn!(len = input.len(), kept = end, "truncating oversized input");
    &input[..end]
}

/// Skip a byte order mark and repair the input.
///
/// NUL bytes always become U+FFFD. With `validate_utf8`, invalid sequences
/// become U+FFFD as well and are reported with their offset in `input`;
/// without it they pass through untouched.
pub fn prepare_input(input: &[u8], validate_utf8: bool) -> (Cow<'_, [u8]>, Vec<MalformedUnicode>) {
    let (body, base) = match input.strip_prefix(BOM) {
        Some(rest) => (rest, BOM.len()),
        None => (input, 0),
    };
    let body = clamp_input(body, MAX_INPUT_LEN);
    let mut malformed = Vec::new();

    let has_nul = memchr(0, body).is_some();
    let needs_repair = validate_utf8 && std::str::from_utf8(body).is_err();
    if !has_nul && !needs_repair {
        return (Cow::Borrowed(body), malformed);
    }

    let mut out = Vec::with_capacity(body.len() + 16);
    let mut pos = 0;
    while pos < body.len() {
        let rest = &body[pos..];
        let (good, bad) = if needs_repair {
            match std::str::from_utf8(rest) {
                Ok(_) => (rest.len(), 0),
                Err(e) => {
                    let good = e.valid_up_to();
                    (good, e.error_len().unwrap_or(rest.len() - good))
                }
            }
        } else {
            (rest.len(), 0)
        };
        push_replacing_nul(&mut out, &rest[..good]);
        if bad > 0 {
            let bad_unicode = MalformedUnicode {
                offset: base + pos + good,
                len: bad,
            };
            tracing::warn!(offset = bad_unicode.offset, len = bad, "replacing malformed UTF-8");
            out.extend_from_slice(REPLACEMENT);
            malformed.push(bad_unicode);
        }
        pos += good + bad;
    }
    (Cow::Owned(out), malformed)
}

fn push_replacing_nul(out: &mut Vec<u8>, mut bytes: &[u8]) {
    while let Some(i) = memchr(0, bytes) {
        out.extend_from_slice(&bytes[..i]);
        out.extend_from_slice(REPLACEMENT);
        bytes = &bytes[i + 1..];
    }
    out.extend_from_slice(bytes);
}

/// One logical line of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line {
    /// Line content without its terminator.
    pub range: Range,
    /// 1-based line number.
    pub number: usize,
}

/// Iterator over the lines of prepared input.
pub struct Lines<'a> {
    input: &'a [u8],
    pos: usize,
    number: usize,
}

impl<'a> Lines<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            number: 0,
        }
    }
}

impl Iterator for Lines<'_> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        if self.pos >= self.input.len() {
            return None;
        }
        let start = self.pos;
        let (end, next) = match memchr2(b'\n', b'\r', &self.input[start..]) {
            Some(i) => {
                let end = start + i;
                if self.input[end] == b'\r' && self.input.get(end + 1) == Some(&b'\n') {
                    (end, end + 2)
                } else {
                    (end, end + 1)
                }
            }
            None => (self.input.len(), self.input.len()),
        };
        self.pos = next;
        self.number += 1;
        Some(Line {
            range: Range::from_usize(start, end),
            number: self.number,
        })
    }
}

/// Byte at `pos`, or 0 past the end. Prepared input never contains NUL.
#[inline]
pub fn byte_at(line: &[u8], pos: usize) -> u8 {
    line.get(pos).copied().unwrap_or(0)
}

#[inline]
pub fn is_space_or_tab(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

#[inline]
pub fn is_line_end(b: u8) -> bool {
    b == b'\n' || b == b'\r' || b == 0
}

/// Column-aware position within the current line.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineState {
    /// Byte offset of the next unconsumed character.
    pub offset: usize,
    /// Column of `offset`, counting tabs to the next multiple of four.
    pub column: usize,
    pub first_nonspace: usize,
    pub first_nonspace_column: usize,
    /// Columns between `column` and `first_nonspace_column`.
    pub indent: usize,
    /// Nothing but whitespace remains on the line.
    pub blank: bool,
    /// `offset` sits on a tab of which some columns were consumed.
    pub partially_consumed_tab: bool,
}

impl LineState {
    pub fn find_first_nonspace(&mut self, line: &[u8]) {
        let mut chars_to_tab = TAB_STOP - (self.column % TAB_STOP);
        self.first_nonspace = self.offset;
        self.first_nonspace_column = self.column;
        loop {
            match byte_at(line, self.first_nonspace) {
                b' ' => {
                    self.first_nonspace += 1;
                    self.first_nonspace_column += 1;
                    chars_to_tab -= 1;
                    if chars_to_tab == 0 {
                        chars_to_tab = TAB_STOP;
                    }
                }
                b'\t' => {
                    self.first_nonspace += 1;
                    self.first_nonspace_column += chars_to_tab;
                    chars_to_tab = TAB_STOP;
                }
                _ => break,
            }
        }
        self.indent = self.first_nonspace_column - self.column;
        self.blank = is_line_end(byte_at(line, self.first_nonspace));
    }

    /// Consume `count` bytes, or `count` columns when `columns` is set.
    pub fn advance_offset(&mut self, line: &[u8], mut count: usize, columns: bool) {
        while count > 0 {
            match byte_at(line, self.offset) {
                0 => break,
                b'\t' => {
                    let chars_to_tab = TAB_STOP - (self.column % TAB_STOP);
                    if columns {
                        self.partially_consumed_tab = chars_to_tab > count;
                        let advance = chars_to_tab.min(count);
                        self.column += advance;
                        if !self.partially_consumed_tab {
                            self.offset += 1;
                        }
                        count -= advance;
                    } else {
                        self.partially_consumed_tab = false;
                        self.column += chars_to_tab;
                        self.offset += 1;
                        count -= 1;
                    }
                }
                _ => {
                    self.partially_consumed_tab = false;
                    self.offset += 1;
                    self.column += 1;
                    count -= 1;
                }
            }
        }
    }

    /// Move to the first non-space character.
    pub fn advance_to_first_nonspace(&mut self, line: &[u8]) {
        let count = self.first_nonspace.saturating_sub(self.offset);
        self.advance_offset(line, count, false);
    }

    /// Move to the terminating newline.
    pub fn advance_to_line_end(&mut self, line: &[u8]) {
        let count = line.len().saturating_sub(1).saturating_sub(self.offset);
        self.advance_offset(line, count, false);
    }
}
