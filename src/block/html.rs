//! HTML block start and end conditions.

use crate::escape::starts_with_ignore_case;
use crate::inline::html::{scan_closing_tag, scan_open_tag, scan_tag_name};
use crate::scanner::{byte_at, is_line_end, is_space_or_tab};
use memchr::memmem;

/// Raw text elements; their blocks run until the matching end tag.
const RAW_TEXT_TAGS: [&[u8]; 4] = [b"pre", b"script", b"style", b"textarea"];

/// Tags that open an HTML block ending at a blank line.
const BLOCK_TAGS: [&[u8]; 62] = [
    b"address", b"article", b"aside", b"base", b"basefont", b"blockquote", b"body", b"caption",
    b"center", b"col", b"colgroup", b"dd", b"details", b"dialog", b"dir", b"div", b"dl", b"dt",
    b"fieldset", b"figcaption", b"figure", b"footer", b"form", b"frame", b"frameset", b"h1", b"h2",
    b"h3", b"h4", b"h5", b"h6", b"head", b"header", b"hr", b"html", b"iframe", b"legend", b"li",
    b"link", b"main", b"menu", b"menuitem", b"nav", b"noframes", b"ol", b"optgroup", b"option", b"p",
    b"param", b"search", b"section", b"summary", b"table", b"tbody", b"td", b"tfoot", b"th", b"thead",
    b"title", b"tr", b"track", b"ul",
];

fn is_one_of(name: &[u8], list: &[&[u8]]) -> bool {
    list.iter().any(|tag| name.eq_ignore_ascii_case(tag))
}

/// Which HTML block, 1 through 7, starts at the beginning of `line`.
///
/// Type 7 cannot interrupt a paragraph.
pub(crate) fn block_start(line: &[u8], in_paragraph: bool) -> Option<u8> {
    if byte_at(line, 0) != b'<' {
        return None;
    }
    let rest = &line[1..];

    if let Some(name_end) = scan_tag_name(line, 1) {
        let name = &line[1..name_end];
        let next = byte_at(line, name_end);
        if is_one_of(name, &RAW_TEXT_TAGS) && (is_space_or_tab(next) || is_line_end(next) || next == b'>') {
            return Some(1);
        }
    }
    if rest.starts_with(b"!--") {
        return Some(2);
    }
    if rest.starts_with(b"?") {
        return Some(3);
    }
    if rest.starts_with(b"![CDATA[") {
        return Some(5);
    }
    if rest.first() == Some(&b'!') && byte_at(rest, 1).is_ascii_alphabetic() {
        return Some(4);
    }

    let name_start = if rest.first() == Some(&b'/') { 2 } else { 1 };
    let name_end = name_start
        + line[name_start..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count();
    if name_end > name_start && is_one_of(&line[name_start..name_end], &BLOCK_TAGS) {
        let next = byte_at(line, name_end);
        if is_space_or_tab(next)
            || is_line_end(next)
            || next == b'>'
            || (next == b'/' && byte_at(line, name_end + 1) == b'>')
        {
            return Some(6);
        }
    }

    if !in_paragraph && complete_tag_line(line) {
        return Some(7);
    }
    None
}

/// A lone open or closing tag, other than a raw text element, followed
/// only by whitespace.
fn complete_tag_line(line: &[u8]) -> bool {
    let (name_start, end) = if byte_at(line, 1) == b'/' {
        (2, scan_closing_tag(line, 2))
    } else {
        (1, scan_open_tag(line, 1))
    };
    let Some(end) = end else {
        return false;
    };
    if let Some(name_end) = scan_tag_name(line, name_start) {
        if is_one_of(&line[name_start..name_end], &RAW_TEXT_TAGS) {
            return false;
        }
    }
    line[end..].iter().all(|&b| is_space_or_tab(b) || is_line_end(b))
}

/// Whether `line` ends an HTML block of types 1 through 5.
pub(crate) fn block_end(block_type: u8, line: &[u8]) -> bool {
    match block_type {
        1 => RAW_TEXT_TAGS.iter().any(|tag| contains_end_tag(line, tag)),
        2 => memmem::find(line, b"-->").is_some(),
        3 => memmem::find(line, b"?>").is_some(),
        4 => line.contains(&b'>'),
        5 => memmem::find(line, b"]]>").is_some(),
        _ => false,
    }
}

fn contains_end_tag(line: &[u8], tag: &[u8]) -> bool {
    let mut i = 0;
    while let Some(offset) = memmem::find(&line[i..], b"</") {
        let start = i + offset + 2;
        let rest = &line[start..];
        if starts_with_ignore_case(rest, tag) && rest.get(tag.len()) == Some(&b'>') {
            return true;
        }
        i = start;
    }
    false
}
