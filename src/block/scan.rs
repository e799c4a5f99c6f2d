//! Block start recognizers.
//!
//! Each function looks at the current line buffer (always terminated by
//! `\n`) at a given offset and reports whether a block marker starts there.

use crate::limits::MAX_LIST_MARKER_DIGITS;
use crate::scanner::{byte_at, is_line_end, is_space_or_tab};
use crate::tree::{ListData, ListDelimiter, ListKind};

/// Offset of the first byte after `pos` that is not a space or tab.
fn skip_spaces(line: &[u8], mut pos: usize) -> usize {
    while is_space_or_tab(byte_at(line, pos)) {
        pos += 1;
    }
    pos
}

fn run_length(line: &[u8], pos: usize, ch: u8) -> usize {
    line.get(pos..).map_or(0, |rest| rest.iter().take_while(|&&b| b == ch).count())
}

/// `***`, `---` or `___`, with optional spaces or tabs between the markers.
pub(crate) fn thematic_break(line: &[u8], pos: usize) -> bool {
    let marker = byte_at(line, pos);
    if !matches!(marker, b'*' | b'-' | b'_') {
        return false;
    }
    let mut count = 0;
    let mut i = pos;
    loop {
        match byte_at(line, i) {
            b if b == marker => count += 1,
            b if is_space_or_tab(b) => {}
            b if is_line_end(b) => break,
            _ => return false,
        }
        i += 1;
    }
    count >= 3
}

/// Opening `#` run of an ATX heading.
pub(crate) struct AtxStart {
    pub level: u8,
    /// Bytes of the marker and the spaces after it.
    pub len: usize,
}

pub(crate) fn atx_heading_start(line: &[u8], pos: usize) -> Option<AtxStart> {
    let level = run_length(line, pos, b'#');
    if level == 0 || level > 6 {
        return None;
    }
    let after = pos + level;
    let next = byte_at(line, after);
    if !is_space_or_tab(next) && !is_line_end(next) {
        return None;
    }
    Some(AtxStart {
        level: level as u8,
        len: skip_spaces(line, after) - pos,
    })
}

/// Opening code fence: returns the fence character and run length.
pub(crate) fn open_code_fence(line: &[u8], pos: usize) -> Option<(u8, usize)> {
    let ch = byte_at(line, pos);
    if ch != b'`' && ch != b'~' {
        return None;
    }
    let len = run_length(line, pos, ch);
    if len < 3 {
        return None;
    }
    if ch == b'`' && line[pos + len..].contains(&b'`') {
        return None;
    }
    Some((ch, len))
}

/// Closing fence of at least `min_len` `ch` characters followed only by
/// spaces or tabs.
pub(crate) fn close_code_fence(line: &[u8], pos: usize, ch: u8, min_len: usize) -> bool {
    let len = run_length(line, pos, ch);
    len >= min_len && len >= 3 && is_line_end(byte_at(line, skip_spaces(line, pos + len)))
}

/// Setext underline: 1 for `=`, 2 for `-`.
pub(crate) fn setext_underline(line: &[u8], pos: usize) -> Option<u8> {
    let level = match byte_at(line, pos) {
        b'=' => 1,
        b'-' => 2,
        _ => return None,
    };
    let len = run_length(line, pos, line[pos]);
    is_line_end(byte_at(line, skip_spaces(line, pos + len))).then_some(level)
}

/// A list marker and the number of bytes it occupies.
pub(crate) struct ListMarker {
    pub data: ListData,
    pub len: usize,
}

/// Bullet (`-`, `+`, `*`) or ordered (`1.`, `1)`) list marker.
///
/// When the marker would interrupt a paragraph the item must not be empty,
/// and an ordered item must start at 1.
pub(crate) fn list_marker(line: &[u8], pos: usize, interrupts_paragraph: bool) -> Option<ListMarker> {
    let c = byte_at(line, pos);
    let (data, len) = if matches!(c, b'-' | b'+' | b'*') {
        let data = ListData {
            kind: ListKind::Bullet,
            delimiter: ListDelimiter::Period,
            bullet_char: c,
            start: 1,
            tight: false,
            marker_offset: 0,
            padding: 0,
        };
        (data, 1)
    } else if c.is_ascii_digit() {
        let digits = line[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits > MAX_LIST_MARKER_DIGITS {
            return None;
        }
        let delimiter = match byte_at(line, pos + digits) {
            b'.' => ListDelimiter::Period,
            b')' => ListDelimiter::Paren,
            _ => return None,
        };
        let start = line[pos..pos + digits]
            .iter()
            .fold(0u32, |n, &b| n * 10 + u32::from(b - b'0'));
        let data = ListData {
            kind: ListKind::Ordered,
            delimiter,
            bullet_char: 0,
            start,
            tight: false,
            marker_offset: 0,
            padding: 0,
        };
        (data, digits + 1)
    } else {
        return None;
    };

    let next = byte_at(line, pos + len);
    if !is_space_or_tab(next) && !is_line_end(next) {
        return None;
    }
    if interrupts_paragraph {
        if is_line_end(byte_at(line, skip_spaces(line, pos + len))) {
            return None;
        }
        if data.kind == ListKind::Ordered && data.start != 1 {
            return None;
        }
    }
    Some(ListMarker { data, len })
}
