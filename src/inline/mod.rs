//! Inline parser.
//!
//! One left-to-right pass over the text of a paragraph or heading builds
//! inline nodes directly under the block:
//! 1. Plain runs, escapes, entities, code spans, autolinks and raw HTML
//!    become nodes as soon as they are recognized.
//! 2. Delimiter runs become text nodes and are pushed on the delimiter stack;
//!    `[` and `![` are pushed on the bracket stack.
//! 3. A `]` tries to close the top bracket as an inline or reference link,
//!    then resolves emphasis inside it.
//! 4. Emphasis for the remaining delimiters is resolved at the end.

mod code_span;
pub(crate) mod delimiter;
mod emphasis;
pub(crate) mod html;
pub(crate) mod links;
mod smart;

use crate::cursor::Cursor;
use crate::entity::{decode_entities, decode_entity_into};
use crate::escape::is_ascii_punctuation;
use crate::link_ref::LinkRefStore;
use crate::tree::{Document, LineBreak, LinkData, NodeId, NodeValue, Sourcepos};
use crate::Options;
use code_span::{normalize_code, BacktickCache};
use delimiter::{classify, Bracket, DelimiterStack};
use links::{
    clean_title, clean_url, is_space_char, scan_autolink_email, scan_autolink_uri, scan_link_destination,
    scan_link_label, scan_link_title, scan_spacechars,
};

/// Bytes that interrupt a plain text run.
const SPECIAL: [bool; 256] = special_table(false);
/// [`SPECIAL`] plus the characters smart punctuation rewrites.
const SMART_SPECIAL: [bool; 256] = special_table(true);

const fn special_table(smart: bool) -> [bool; 256] {
    let mut table = [false; 256];
    let chars = b"\n\r`\\&<*_[]!";
    let mut i = 0;
    while i < chars.len() {
        table[chars[i] as usize] = true;
        i += 1;
    }
    if smart {
        table[b'"' as usize] = true;
        table[b'\'' as usize] = true;
        table[b'.' as usize] = true;
        table[b'-' as usize] = true;
    }
    table
}

/// Inline parser with buffers reused across blocks.
#[derive(Debug, Default)]
pub struct InlineParser {
    delimiters: DelimiterStack,
    brackets: Vec<Bracket>,
    backticks: BacktickCache,
}

impl InlineParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` and append the resulting inlines to `parent`.
    pub fn parse(&mut self, doc: &mut Document, parent: NodeId, text: &[u8], refs: &LinkRefStore, options: &Options) {
        let end = text.iter().rposition(|&b| !is_space_char(b)).map_or(0, |i| i + 1);
        self.delimiters.clear();
        self.brackets.clear();
        self.backticks.reset();

        let mut subject = Subject {
            doc,
            parent,
            cursor: Cursor::new(&text[..end]),
            refs,
            smart: options.smart_punctuation,
            delimiters: &mut self.delimiters,
            brackets: &mut self.brackets,
            backticks: &mut self.backticks,
        };
        while !subject.cursor.is_eof() {
            subject.parse_inline();
        }
        subject.process_emphasis(0);
    }
}

/// State for parsing one block's inline content.
struct Subject<'a> {
    doc: &'a mut Document,
    parent: NodeId,
    cursor: Cursor<'a>,
    refs: &'a LinkRefStore,
    smart: bool,
    delimiters: &'a mut DelimiterStack,
    brackets: &'a mut Vec<Bracket>,
    backticks: &'a mut BacktickCache,
}

impl Subject<'_> {
    fn parse_inline(&mut self) {
        let Some(c) = self.cursor.peek() else {
            return;
        };
        match c {
            b'\n' | b'\r' => self.handle_newline(),
            b'`' => self.handle_backticks(),
            b'\\' => self.handle_backslash(),
            b'&' => self.handle_entity(),
            b'<' => self.handle_pointy_brace(),
            b'*' | b'_' => self.handle_delim(c),
            b'\'' | b'"' if self.smart => self.handle_delim(c),
            b'-' if self.smart => self.handle_hyphen(),
            b'.' if self.smart => self.handle_period(),
            b'[' => {
                self.cursor.bump();
                let node = self.push_text(b"[");
                self.push_bracket(false, node);
            }
            b'!' => {
                self.cursor.bump();
                if self.cursor.eat(b'[') {
                    let node = self.push_text(b"![");
                    self.push_bracket(true, node);
                } else {
                    self.push_text(b"!");
                }
            }
            b']' => self.handle_close_bracket(),
            _ => self.handle_text(),
        }
    }

    fn append(&mut self, value: NodeValue) -> NodeId {
        let node = self.doc.alloc(value, Sourcepos::default());
        self.doc.append_child(self.parent, node);
        node
    }

    fn push_text(&mut self, text: &[u8]) -> NodeId {
        self.append(NodeValue::Text(text.to_vec()))
    }

    fn handle_text(&mut self) {
        let input = self.cursor.input();
        let start = self.cursor.offset();
        let table = if self.smart { &SMART_SPECIAL } else { &SPECIAL };
        let end = input[start + 1..]
            .iter()
            .position(|&b| table[b as usize])
            .map_or(input.len(), |i| start + 1 + i);
        self.cursor.set_offset(end);

        let mut text = &input[start..end];
        if matches!(self.cursor.peek(), Some(b'\n' | b'\r')) {
            let trimmed = text.iter().rposition(|&b| !is_space_char(b)).map_or(0, |i| i + 1);
            text = &text[..trimmed];
        }
        if !text.is_empty() {
            self.push_text(text);
        }
    }

    /// Two or more spaces before a line ending make a hard break.
    fn handle_newline(&mut self) {
        let input = self.cursor.input();
        let newline = self.cursor.offset();
        self.cursor.skip_line_end();
        let hard = newline >= 2 && input[newline - 1] == b' ' && input[newline - 2] == b' ';
        self.cursor.skip_spaces();
        let kind = if hard { LineBreak::Hard } else { LineBreak::Soft };
        self.append(NodeValue::LineBreak(kind));
    }

    fn handle_backslash(&mut self) {
        self.cursor.bump();
        match self.cursor.peek() {
            Some(b) if is_ascii_punctuation(b) => {
                self.cursor.bump();
                self.push_text(&[b]);
            }
            Some(b'\n' | b'\r') => {
                self.cursor.skip_line_end();
                self.cursor.skip_spaces();
                self.append(NodeValue::LineBreak(LineBreak::Hard));
            }
            _ => {
                self.push_text(b"\\");
            }
        }
    }

    fn handle_entity(&mut self) {
        self.cursor.bump();
        let mut decoded = Vec::new();
        match decode_entity_into(&mut decoded, self.cursor.remaining_slice()) {
            Some(consumed) => {
                self.cursor.advance(consumed);
                self.append(NodeValue::Text(decoded));
            }
            None => {
                self.push_text(b"&");
            }
        }
    }

    fn handle_backticks(&mut self) {
        let input = self.cursor.input();
        let start = self.cursor.offset();
        let open_len = self.cursor.skip_while(|b| b == b'`');
        let after_open = self.cursor.offset();
        match self.backticks.find_closer(input, after_open, open_len) {
            Some(end) => {
                self.cursor.set_offset(end);
                let code = normalize_code(&input[after_open..end - open_len]);
                self.append(NodeValue::Code(code));
            }
            None => {
                self.push_text(&input[start..after_open]);
            }
        }
    }

    /// Autolink, raw HTML, or a literal `<`.
    fn handle_pointy_brace(&mut self) {
        let input = self.cursor.input();
        let lt = self.cursor.offset();
        self.cursor.bump();
        let pos = lt + 1;

        if let Some(len) = scan_autolink_uri(input, pos) {
            self.cursor.set_offset(pos + len);
            self.push_autolink(&input[pos..pos + len - 1], false);
        } else if let Some(len) = scan_autolink_email(input, pos) {
            self.cursor.set_offset(pos + len);
            self.push_autolink(&input[pos..pos + len - 1], true);
        } else if let Some(len) = html::scan_html_tag(input, lt) {
            self.cursor.set_offset(lt + len);
            self.append(NodeValue::HtmlInline(input[lt..lt + len].to_vec()));
        } else {
            self.push_text(b"<");
        }
    }

    fn push_autolink(&mut self, raw: &[u8], email: bool) {
        let mut url = Vec::with_capacity(raw.len() + 7);
        if email {
            url.extend_from_slice(b"mailto:");
        }
        url.extend_from_slice(&decode_entities(raw));
        let link = self.append(NodeValue::Link(LinkData {
            url,
            title: Vec::new(),
            from_reference: false,
        }));
        let text = self.doc.alloc(NodeValue::Text(decode_entities(raw)), Sourcepos::default());
        self.doc.append_child(link, text);
    }

    fn handle_delim(&mut self, c: u8) {
        let input = self.cursor.input();
        let start = self.cursor.offset();
        let before = char_before(input, start);
        let length = if c == b'\'' || c == b'"' {
            self.cursor.bump();
            1
        } else {
            self.cursor.skip_while(|b| b == c)
        };
        let end = self.cursor.offset();
        let after = char_at(input, end);
        let (can_open, can_close) = classify(c, before, after);

        let node = match c {
            b'\'' => self.push_text(smart::RIGHT_SINGLE_QUOTE.as_bytes()),
            b'"' if can_close => self.push_text(smart::RIGHT_DOUBLE_QUOTE.as_bytes()),
            b'"' => self.push_text(smart::LEFT_DOUBLE_QUOTE.as_bytes()),
            _ => self.push_text(&input[start..end]),
        };
        if can_open || can_close {
            self.delimiters.push(c, length, can_open, can_close, node);
        }
    }

    fn handle_hyphen(&mut self) {
        self.cursor.bump();
        if !self.cursor.at(b'-') {
            self.push_text(b"-");
            return;
        }
        let count = 1 + self.cursor.skip_while(|b| b == b'-');
        let mut out = Vec::with_capacity(count * 3);
        smart::dashes(&mut out, count);
        self.append(NodeValue::Text(out));
    }

    fn handle_period(&mut self) {
        self.cursor.bump();
        if !self.cursor.eat(b'.') {
            self.push_text(b".");
        } else if self.cursor.eat(b'.') {
            self.push_text(smart::ELLIPSIS.as_bytes());
        } else {
            self.push_text(b"..");
        }
    }

    fn push_bracket(&mut self, image: bool, node: NodeId) {
        if let Some(last) = self.brackets.last_mut() {
            last.bracket_after = true;
        }
        self.brackets.push(Bracket {
            node,
            position: self.cursor.offset(),
            image,
            active: true,
            bracket_after: false,
            delimiter_bottom: self.delimiters.height(),
        });
    }

    fn handle_close_bracket(&mut self) {
        self.cursor.bump();
        let after_bracket = self.cursor.offset();

        let Some(&opener) = self.brackets.last() else {
            self.push_text(b"]");
            return;
        };
        if !opener.active {
            self.brackets.pop();
            self.push_text(b"]");
            return;
        }

        let link = match self.scan_inline_link(after_bracket) {
            Some(link) => Some(link),
            None => self.scan_reference_link(&opener, after_bracket),
        };
        let Some(link) = link else {
            self.brackets.pop();
            self.cursor.set_offset(after_bracket);
            self.push_text(b"]");
            return;
        };

        let value = if opener.image {
            NodeValue::Image(link)
        } else {
            NodeValue::Link(link)
        };
        let node = self.doc.alloc(value, Sourcepos::default());
        self.doc.insert_before(opener.node, node);
        let mut child = self.doc.next_sibling(opener.node);
        while let Some(current) = child {
            child = self.doc.next_sibling(current);
            self.doc.append_child(node, current);
        }
        self.doc.detach(opener.node);

        self.process_emphasis(opener.delimiter_bottom);
        self.brackets.pop();

        // Links may not contain other links. Everything below the first
        // inactive opener was already deactivated by an earlier link.
        if !opener.image {
            for bracket in self.brackets.iter_mut().rev() {
                if bracket.image {
                    continue;
                }
                if !bracket.active {
                    break;
                }
                bracket.active = false;
            }
        }
    }

    /// `(destination "title")` right after the closing bracket.
    fn scan_inline_link(&mut self, pos: usize) -> Option<LinkData> {
        let input = self.cursor.input();
        if input.get(pos) != Some(&b'(') {
            return None;
        }
        let dest_start = pos + 1 + scan_spacechars(input, pos + 1);
        let (consumed, dest) = scan_link_destination(input, dest_start)?;
        let dest_end = dest_start + consumed;
        let title_start = dest_end + scan_spacechars(input, dest_end);
        // A title must be separated from the destination by whitespace.
        let title_end = if title_start == dest_end {
            title_start
        } else {
            title_start + scan_link_title(input, title_start)
        };
        let end = title_end + scan_spacechars(input, title_end);
        if input.get(end) != Some(&b')') {
            return None;
        }
        self.cursor.set_offset(end + 1);
        Some(LinkData {
            url: clean_url(dest.slice(input)),
            title: clean_title(&input[title_start..title_end]),
            from_reference: false,
        })
    }

    /// Full, collapsed or shortcut reference after the closing bracket.
    fn scan_reference_link(&mut self, opener: &Bracket, after_bracket: usize) -> Option<LinkData> {
        let input = self.cursor.input();
        let explicit = match scan_link_label(input, after_bracket) {
            Some((end, label)) => {
                self.cursor.set_offset(end);
                Some(label.slice(input))
            }
            None => {
                self.cursor.set_offset(after_bracket);
                None
            }
        };
        let label = match explicit {
            Some(label) if !label.is_empty() => label,
            _ if !opener.bracket_after => &input[opener.position..after_bracket - 1],
            Some(label) => label,
            None => return None,
        };
        let def = self.refs.lookup(label)?;
        Some(LinkData {
            url: def.url.clone(),
            title: def.title.clone(),
            from_reference: true,
        })
    }
}

/// Character ending at `pos`, or a newline at the start of input.
fn char_before(input: &[u8], pos: usize) -> char {
    if pos == 0 {
        return '\n';
    }
    let mut start = pos - 1;
    while start > 0 && pos - start < 4 && input[start] & 0xC0 == 0x80 {
        start -= 1;
    }
    std::str::from_utf8(&input[start..pos])
        .ok()
        .and_then(|s| s.chars().next_back())
        .unwrap_or('\n')
}

/// Character starting at `pos`, or a newline at the end of input.
fn char_at(input: &[u8], pos: usize) -> char {
    let Some(&first) = input.get(pos) else {
        return '\n';
    };
    let width = match first {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return '\n',
    };
    input
        .get(pos..pos + width)
        .and_then(|bytes| std::str::from_utf8(bytes).ok())
        .and_then(|s| s.chars().next())
        .unwrap_or('\n')
}
