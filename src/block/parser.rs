//! Block parser implementation.
//!
//! Each line is processed in three steps:
//! 1. Walk the open blocks from the root and consume the continuation
//!    markers each one requires (`>`, item indentation, code indentation).
//! 2. Try block starts on what is left, opening new containers.
//! 3. Add the remaining text to the innermost block, either as a lazy
//!    paragraph continuation or after closing the blocks that did not match.

use super::html;
use super::scan::{
    atx_heading_start, close_code_fence, list_marker, open_code_fence, setext_underline, thematic_break,
};
use crate::entity::decode_entities;
use crate::escape::unescape_into;
use crate::inline::InlineParser;
use crate::limits::MAX_LIST_DEPTH;
use crate::link_ref::{parse_reference, LinkRefStore};
use crate::scanner::{byte_at, is_line_end, is_space_or_tab, LineState, Lines, CODE_INDENT};
use crate::tree::{
    CodeBlockData, Document, HeadingData, HtmlBlockData, LineColumn, ListData, NodeId, NodeKind, NodeValue, Sourcepos,
};
use crate::Options;
use smallvec::SmallVec;

/// Per-block state that only lives while the block is open.
#[derive(Debug, Default)]
struct BlockScratch {
    /// Raw lines of a paragraph, heading or code block.
    content: Vec<u8>,
    last_line_blank: bool,
    /// The end position was fixed when the block was closed early.
    end_fixed: bool,
}

/// Result of checking one open block against the current line.
enum Continuation {
    Matched,
    Unmatched,
    /// The line closed a fenced code block and needs no further work.
    LineDone,
}

/// Which block starts at the current position.
enum BlockStart {
    BlockQuote,
    AtxHeading { level: u8, len: usize },
    CodeFence { ch: u8, len: usize },
    HtmlBlock(u8),
    SetextUnderline(u8),
    ThematicBreak,
    ListItem { data: ListData, len: usize },
    IndentedCode,
}

/// Block parser state.
pub struct BlockParser<'a> {
    /// Prepared input bytes.
    input: &'a [u8],
    doc: Document,
    refs: LinkRefStore,
    /// Open blocks from the root down to the innermost one.
    open: SmallVec<[NodeId; 16]>,
    /// Open blocks that matched the current line.
    matched: usize,
    /// Indexed by node.
    scratch: Vec<BlockScratch>,
    /// Current line with a single trailing `\n`.
    line: Vec<u8>,
    state: LineState,
    line_number: usize,
    /// Length of the previous line without its terminator.
    last_line_length: usize,
    finished: bool,
}

impl<'a> BlockParser<'a> {
    /// Create a new block parser.
    pub fn new(input: &'a [u8]) -> Self {
        let doc = Document::new();
        let mut open = SmallVec::new();
        open.push(doc.root());
        Self {
            input,
            doc,
            refs: LinkRefStore::new(),
            open,
            matched: 1,
            scratch: Vec::new(),
            line: Vec::with_capacity(128),
            state: LineState::default(),
            line_number: 0,
            last_line_length: 0,
            finished: false,
        }
    }

    /// Parse block structure, then the inline content of every paragraph and
    /// heading.
    pub fn parse(mut self, options: &Options) -> Document {
        for line in Lines::new(self.input) {
            let text = line.range.slice(self.input);
            self.process_line(text);
        }
        self.finish();
        tracing::debug!(
            lines = self.line_number,
            nodes = self.doc.len(),
            references = self.refs.len(),
            "block structure parsed"
        );

        let leaves: Vec<NodeId> = self
            .doc
            .descendants(self.doc.root())
            .filter(|&id| matches!(self.doc.kind(id), NodeKind::Paragraph | NodeKind::Heading))
            .collect();
        let mut inlines = InlineParser::new();
        for &id in &leaves {
            let content = self
                .scratch
                .get_mut(id.index())
                .map(|s| std::mem::take(&mut s.content))
                .unwrap_or_default();
            inlines.parse(&mut self.doc, id, &content, &self.refs, options);
        }
        tracing::debug!(blocks = leaves.len(), nodes = self.doc.len(), "inline content parsed");
        self.doc
    }

    fn process_line(&mut self, text: &[u8]) {
        self.line.clear();
        self.line.extend_from_slice(text);
        self.line.push(b'\n');
        self.state = LineState::default();
        self.line_number += 1;

        #[cfg(feature = "trace")]
        tracing::trace!(line = self.line_number, open = self.open.len(), "processing line");

        if let Some(container) = self.check_open_blocks() {
            let container = self.open_new_blocks(container);
            self.add_text(container);
        }
        self.last_line_length = text.len();
    }

    /// Step 1. Returns the innermost matched block, or `None` when the line
    /// was consumed by a closing code fence.
    fn check_open_blocks(&mut self) -> Option<NodeId> {
        self.matched = 1;
        for i in 1..self.open.len() {
            let node = self.open[i];
            self.state.find_first_nonspace(&self.line);
            match self.continues(node) {
                Continuation::Matched => self.matched = i + 1,
                Continuation::Unmatched => break,
                Continuation::LineDone => {
                    // The fence is the innermost block; everything above it matched.
                    self.open.truncate(i);
                    self.matched = i;
                    self.fix_end(node, self.line_number, self.line.len() - 1);
                    self.finalize(node);
                    return None;
                }
            }
        }
        Some(self.open[self.matched - 1])
    }

    fn continues(&mut self, node: NodeId) -> Continuation {
        let st = self.state;
        match self.doc.value(node) {
            NodeValue::BlockQuote => {
                if st.indent <= 3 && byte_at(&self.line, st.first_nonspace) == b'>' {
                    self.state.advance_offset(&self.line, st.indent + 1, true);
                    if is_space_or_tab(byte_at(&self.line, self.state.offset)) {
                        self.state.advance_offset(&self.line, 1, true);
                    }
                    Continuation::Matched
                } else {
                    Continuation::Unmatched
                }
            }
            NodeValue::Item(data) => {
                let width = data.marker_offset + data.padding;
                if st.indent >= width {
                    self.state.advance_offset(&self.line, width, true);
                    Continuation::Matched
                } else if st.blank && self.doc.first_child(node).is_some() {
                    self.state.advance_to_first_nonspace(&self.line);
                    Continuation::Matched
                } else {
                    Continuation::Unmatched
                }
            }
            NodeValue::CodeBlock(code) if code.fenced => {
                if st.indent <= 3
                    && close_code_fence(&self.line, st.first_nonspace, code.fence_char, code.fence_length)
                {
                    return Continuation::LineDone;
                }
                let mut strip = code.fence_offset;
                while strip > 0 && is_space_or_tab(byte_at(&self.line, self.state.offset)) {
                    self.state.advance_offset(&self.line, 1, true);
                    strip -= 1;
                }
                Continuation::Matched
            }
            NodeValue::CodeBlock(_) => {
                if st.indent >= CODE_INDENT {
                    self.state.advance_offset(&self.line, CODE_INDENT, true);
                    Continuation::Matched
                } else if st.blank {
                    self.state.advance_to_first_nonspace(&self.line);
                    Continuation::Matched
                } else {
                    Continuation::Unmatched
                }
            }
            NodeValue::HtmlBlock(html) => {
                if html.block_type <= 5 || !st.blank {
                    Continuation::Matched
                } else {
                    Continuation::Unmatched
                }
            }
            NodeValue::Paragraph if !st.blank => Continuation::Matched,
            NodeValue::List(_) => Continuation::Matched,
            _ => Continuation::Unmatched,
        }
    }

    /// Step 2. Returns the block that receives the rest of the line.
    fn open_new_blocks(&mut self, mut container: NodeId) -> NodeId {
        let tip = self.tip();
        let all_matched = self.matched == self.open.len();
        let mut maybe_lazy = self.doc.kind(tip) == NodeKind::Paragraph;

        while !matches!(self.doc.kind(container), NodeKind::CodeBlock | NodeKind::HtmlBlock) {
            self.state.find_first_nonspace(&self.line);
            let Some(start) = self.detect_start(container, all_matched, maybe_lazy) else {
                break;
            };
            let column = self.state.first_nonspace + 1;
            let fnp = self.state.first_nonspace;

            container = match start {
                BlockStart::BlockQuote => {
                    let count = fnp + 1 - self.state.offset;
                    self.state.advance_offset(&self.line, count, false);
                    if is_space_or_tab(byte_at(&self.line, self.state.offset)) {
                        self.state.advance_offset(&self.line, 1, true);
                    }
                    self.add_child(container, NodeValue::BlockQuote, column)
                }
                BlockStart::AtxHeading { level, len } => {
                    let count = fnp + len - self.state.offset;
                    self.state.advance_offset(&self.line, count, false);
                    let value = NodeValue::Heading(HeadingData { level, setext: false });
                    self.add_child(container, value, column)
                }
                BlockStart::CodeFence { ch, len } => {
                    let value = NodeValue::CodeBlock(CodeBlockData {
                        fenced: true,
                        fence_char: ch,
                        fence_length: len,
                        fence_offset: fnp - self.state.offset,
                        ..CodeBlockData::default()
                    });
                    let node = self.add_child(container, value, column);
                    let count = fnp + len - self.state.offset;
                    self.state.advance_offset(&self.line, count, false);
                    node
                }
                BlockStart::HtmlBlock(block_type) => {
                    // The tag is part of the block's text; the offset stays put.
                    let value = NodeValue::HtmlBlock(HtmlBlockData {
                        block_type,
                        literal: Vec::new(),
                    });
                    self.add_child(container, value, column)
                }
                BlockStart::SetextUnderline(level) => {
                    if self.resolve_references(container) {
                        *self.doc.value_mut(container) = NodeValue::Heading(HeadingData { level, setext: true });
                        self.state.advance_to_line_end(&self.line);
                        self.fix_end(container, self.line_number, self.line.len() - 1);
                    }
                    container
                }
                BlockStart::ThematicBreak => {
                    let node = self.add_child(container, NodeValue::ThematicBreak, column);
                    self.state.advance_to_line_end(&self.line);
                    node
                }
                BlockStart::ListItem { mut data, len } => {
                    let count = fnp + len - self.state.offset;
                    self.state.advance_offset(&self.line, count, false);
                    data.padding = self.item_padding(len);
                    data.marker_offset = self.state.indent;

                    let continues_list = match self.doc.value(container) {
                        NodeValue::List(list) => list.matches(&data),
                        _ => false,
                    };
                    let list = if continues_list {
                        container
                    } else {
                        self.add_child(container, NodeValue::List(data), column)
                    };
                    self.add_child(list, NodeValue::Item(data), column)
                }
                BlockStart::IndentedCode => {
                    self.state.advance_offset(&self.line, CODE_INDENT, true);
                    let column = self.state.offset + 1;
                    self.add_child(container, NodeValue::CodeBlock(CodeBlockData::default()), column)
                }
            };

            if matches!(
                self.doc.kind(container),
                NodeKind::Paragraph | NodeKind::Heading | NodeKind::CodeBlock
            ) {
                break;
            }
            maybe_lazy = false;
        }
        container
    }

    fn detect_start(&self, container: NodeId, all_matched: bool, maybe_lazy: bool) -> Option<BlockStart> {
        let st = &self.state;
        let line = &self.line[..];
        let fnp = st.first_nonspace;
        let indented = st.indent >= CODE_INDENT;
        let in_paragraph = self.doc.kind(container) == NodeKind::Paragraph;

        if indented {
            return (!maybe_lazy && !st.blank).then_some(BlockStart::IndentedCode);
        }
        if byte_at(line, fnp) == b'>' {
            return Some(BlockStart::BlockQuote);
        }
        if let Some(atx) = atx_heading_start(line, fnp) {
            return Some(BlockStart::AtxHeading {
                level: atx.level,
                len: atx.len,
            });
        }
        if let Some((ch, len)) = open_code_fence(line, fnp) {
            return Some(BlockStart::CodeFence { ch, len });
        }
        if let Some(block_type) = html::block_start(&line[fnp..], in_paragraph) {
            return Some(BlockStart::HtmlBlock(block_type));
        }
        if in_paragraph {
            if let Some(level) = setext_underline(line, fnp) {
                return Some(BlockStart::SetextUnderline(level));
            }
        }
        if !(in_paragraph && !all_matched) && thematic_break(line, fnp) {
            return Some(BlockStart::ThematicBreak);
        }
        if self.list_depth() < MAX_LIST_DEPTH {
            if let Some(marker) = list_marker(line, fnp, in_paragraph) {
                return Some(BlockStart::ListItem {
                    data: marker.data,
                    len: marker.len,
                });
            }
        }
        None
    }

    /// Columns from the start of the marker to the item's content, with the
    /// offset left at the content.
    fn item_padding(&mut self, marker_len: usize) -> usize {
        let saved = self.state;
        while self.state.column - saved.column <= 5 && is_space_or_tab(byte_at(&self.line, self.state.offset)) {
            self.state.advance_offset(&self.line, 1, true);
        }
        let spaces = self.state.column - saved.column;
        let at_end = is_line_end(byte_at(&self.line, self.state.offset));
        if spaces >= 5 || spaces < 1 || at_end {
            // Content starts after one space; the rest is indentation of
            // an indented code block or blank.
            self.state = saved;
            if spaces > 0 {
                self.state.advance_offset(&self.line, 1, true);
            }
            marker_len + 1
        } else {
            marker_len + spaces
        }
    }

    fn list_depth(&self) -> usize {
        self.open[..self.matched]
            .iter()
            .filter(|&&id| self.doc.kind(id) == NodeKind::List)
            .count()
    }

    /// Step 3.
    fn add_text(&mut self, mut container: NodeId) {
        self.state.find_first_nonspace(&self.line);
        let blank = self.state.blank;

        if blank {
            if let Some(last) = self.doc.last_child(container) {
                self.scratch_mut(last).last_line_blank = true;
            }
        }
        let last_line_blank = blank
            && match self.doc.value(container) {
                NodeValue::BlockQuote | NodeValue::Heading(_) | NodeValue::ThematicBreak => false,
                NodeValue::CodeBlock(code) => !code.fenced,
                NodeValue::Item(_) => {
                    self.doc.first_child(container).is_some()
                        || self.doc.sourcepos(container).start.line != self.line_number
                }
                _ => true,
            };
        self.scratch_mut(container).last_line_blank = last_line_blank;
        let mut ancestor = self.doc.parent(container);
        while let Some(id) = ancestor {
            self.scratch_mut(id).last_line_blank = false;
            ancestor = self.doc.parent(id);
        }

        let tip = self.tip();
        let lazy = self.open.len() > self.matched
            && container == self.open[self.matched - 1]
            && !blank
            && self.doc.kind(tip) == NodeKind::Paragraph;
        if lazy {
            self.add_line(tip, self.line.len());
            return;
        }

        self.close_unmatched();
        match self.doc.value(container) {
            NodeValue::CodeBlock(_) => self.add_line(container, self.line.len()),
            NodeValue::HtmlBlock(html) => {
                let block_type = html.block_type;
                self.add_line(container, self.line.len());
                if html::block_end(block_type, &self.line[self.state.first_nonspace..]) {
                    self.close_tip();
                }
            }
            _ if blank => {}
            NodeValue::Paragraph | NodeValue::Heading(_) => {
                let end = match self.doc.value(container) {
                    NodeValue::Heading(h) if !h.setext => chop_trailing_hashes(&self.line, self.state.first_nonspace),
                    _ => self.line.len(),
                };
                self.state.advance_to_first_nonspace(&self.line);
                self.add_line(container, end);
            }
            _ => {
                let column = self.state.first_nonspace + 1;
                container = self.add_child(container, NodeValue::Paragraph, column);
                self.state.advance_to_first_nonspace(&self.line);
                self.add_line(container, self.line.len());
            }
        }
    }

    /// Append the line from the current offset up to `end` to the block's
    /// content.
    fn add_line(&mut self, node: NodeId, end: usize) {
        let mut offset = self.state.offset;
        let partial_tab = self.state.partially_consumed_tab;
        let column = self.state.column;
        let idx = node.index();
        self.ensure_scratch(node);
        let content = &mut self.scratch[idx].content;
        if partial_tab {
            offset += 1;
            let spaces = crate::scanner::TAB_STOP - column % crate::scanner::TAB_STOP;
            content.extend(std::iter::repeat_n(b' ', spaces));
        }
        if offset < end {
            content.extend_from_slice(&self.line[offset..end]);
        }
        if end < self.line.len() {
            content.push(b'\n');
        }
    }

    fn add_child(&mut self, parent: NodeId, value: NodeValue, column: usize) -> NodeId {
        self.close_unmatched();
        let kind = value.kind();
        let mut parent = parent;
        while !self.doc.kind(parent).can_contain(kind) {
            self.close_tip();
            parent = self.tip();
        }
        let node = self.doc.alloc(value, Sourcepos::new(self.line_number, column, 0, 0));
        self.doc.append_child(parent, node);
        self.ensure_scratch(node);
        self.open.push(node);
        self.matched = self.open.len();
        node
    }

    fn tip(&self) -> NodeId {
        self.open.last().copied().unwrap_or_else(|| self.doc.root())
    }

    fn close_unmatched(&mut self) {
        while self.open.len() > self.matched {
            self.close_tip();
        }
    }

    fn close_tip(&mut self) {
        if self.open.len() <= 1 {
            return;
        }
        if let Some(node) = self.open.pop() {
            self.finalize(node);
        }
        self.matched = self.matched.min(self.open.len());
    }

    fn finish(&mut self) {
        self.finished = true;
        while self.open.len() > 1 {
            self.close_tip();
        }
        let root = self.doc.root();
        self.finalize(root);
    }

    fn ensure_scratch(&mut self, node: NodeId) {
        if self.scratch.len() <= node.index() {
            self.scratch.resize_with(node.index() + 1, BlockScratch::default);
        }
    }

    fn scratch_mut(&mut self, node: NodeId) -> &mut BlockScratch {
        self.ensure_scratch(node);
        &mut self.scratch[node.index()]
    }

    fn last_line_blank(&self, node: NodeId) -> bool {
        self.scratch.get(node.index()).is_some_and(|s| s.last_line_blank)
    }

    fn fix_end(&mut self, node: NodeId, line: usize, column: usize) {
        self.doc.sourcepos_mut(node).end = LineColumn { line, column };
        self.scratch_mut(node).end_fixed = true;
    }

    fn finalize(&mut self, node: NodeId) {
        if !self.scratch.get(node.index()).is_some_and(|s| s.end_fixed) {
            let end = if self.finished || self.doc.kind(node) == NodeKind::Document {
                LineColumn {
                    line: self.line_number.max(1),
                    column: self.last_line_length,
                }
            } else {
                LineColumn {
                    line: self.line_number - 1,
                    column: self.last_line_length,
                }
            };
            self.doc.sourcepos_mut(node).end = end;
        }

        match self.doc.kind(node) {
            NodeKind::Paragraph => {
                if !self.resolve_references(node) {
                    self.doc.detach(node);
                }
            }
            NodeKind::CodeBlock => self.finalize_code(node),
            NodeKind::HtmlBlock => {
                let literal = std::mem::take(&mut self.scratch_mut(node).content);
                if let NodeValue::HtmlBlock(html) = self.doc.value_mut(node) {
                    html.literal = literal;
                }
            }
            NodeKind::List => self.finalize_list(node),
            _ => {}
        }
    }

    /// Strip reference definitions from the start of a paragraph. Returns
    /// whether any other content remains.
    fn resolve_references(&mut self, node: NodeId) -> bool {
        self.ensure_scratch(node);
        let content = &mut self.scratch[node.index()].content;
        let mut pos = 0;
        while content.get(pos) == Some(&b'[') {
            match parse_reference(&content[pos..], &mut self.refs) {
                Some(consumed) if consumed > 0 => pos += consumed,
                _ => break,
            }
        }
        if pos > 0 {
            content.drain(..pos);
        }
        content.iter().any(|&b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
    }

    fn finalize_code(&mut self, node: NodeId) {
        let mut content = std::mem::take(&mut self.scratch_mut(node).content);
        let NodeValue::CodeBlock(code) = self.doc.value_mut(node) else {
            return;
        };
        if code.fenced {
            let first_line_end = content.iter().position(|&b| b == b'\n').unwrap_or(content.len());
            let decoded = decode_entities(&content[..first_line_end]);
            let trimmed = trim_ascii_whitespace(&decoded);
            let mut info = Vec::with_capacity(trimmed.len());
            unescape_into(&mut info, trimmed);
            code.info = info;
            let body_start = (first_line_end + 1).min(content.len());
            content.drain(..body_start);
        } else {
            // Drop trailing blank lines.
            match content.iter().rposition(|&b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r')) {
                Some(last) => {
                    let cut = content[last..]
                        .iter()
                        .position(|&b| b == b'\n')
                        .map_or(content.len(), |i| last + i);
                    content.truncate(cut);
                }
                None => content.clear(),
            }
            content.push(b'\n');
        }
        code.literal = content;
    }

    fn finalize_list(&mut self, list: NodeId) {
        let mut tight = true;
        let mut item = self.doc.first_child(list);
        'items: while let Some(current) = item {
            let next = self.doc.next_sibling(current);
            if next.is_some() && self.last_line_blank(current) {
                tight = false;
                break;
            }
            let mut sub = self.doc.first_child(current);
            while let Some(child) = sub {
                let child_next = self.doc.next_sibling(child);
                if (next.is_some() || child_next.is_some()) && self.ends_with_blank_line(child) {
                    tight = false;
                    break 'items;
                }
                sub = child_next;
            }
            item = next;
        }

        #[cfg(feature = "trace")]
        tracing::trace!(line = self.doc.sourcepos(list).start.line, tight, "list closed");
        if let NodeValue::List(data) = self.doc.value_mut(list) {
            data.tight = tight;
        }
        let items: SmallVec<[NodeId; 8]> = self.doc.children(list).collect();
        for id in items {
            if let NodeValue::Item(data) = self.doc.value_mut(id) {
                data.tight = tight;
            }
        }
    }

    fn ends_with_blank_line(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.last_line_blank(id) {
                return true;
            }
            current = match self.doc.kind(id) {
                NodeKind::List | NodeKind::Item => self.doc.last_child(id),
                _ => None,
            };
        }
        false
    }
}

/// End of an ATX heading's content, before any closing `#` sequence and
/// trailing whitespace. `start` is where the content begins.
fn chop_trailing_hashes(line: &[u8], start: usize) -> usize {
    let mut end = line.len();
    while end > start && matches!(line[end - 1], b' ' | b'\t' | b'\n') {
        end -= 1;
    }
    let mut hashes = end;
    while hashes > start && line[hashes - 1] == b'#' {
        hashes -= 1;
    }
    if hashes == end {
        return end;
    }
    if hashes == start {
        return start;
    }
    if is_space_or_tab(line[hashes - 1]) {
        let mut trimmed = hashes;
        while trimmed > start && is_space_or_tab(line[trimmed - 1]) {
            trimmed -= 1;
        }
        trimmed
    } else {
        end
    }
}

fn trim_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let is_ws = |b: &u8| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0B' | b'\x0C');
    let start = bytes.iter().position(|b| !is_ws(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !is_ws(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Document {
        BlockParser::new(input.as_bytes()).parse(&Options::default())
    }

    fn kinds(doc: &Document, id: NodeId) -> Vec<NodeKind> {
        doc.children(id).map(|c| doc.kind(c)).collect()
    }

    fn only_child(doc: &Document, id: NodeId) -> NodeId {
        let children: Vec<_> = doc.children(id).collect();
        assert_eq!(children.len(), 1, "expected one child, got {:?}", kinds(doc, id));
        children[0]
    }

    #[test]
    fn test_paragraphs_and_blank_lines() {
        let doc = parse("aaa\nbbb\n\nccc\n");
        assert_eq!(kinds(&doc, doc.root()), vec![NodeKind::Paragraph, NodeKind::Paragraph]);
    }

    #[test]
    fn test_atx_heading_closing_sequence() {
        let doc = parse("## foo ##\n# bar#\n### ###\n");
        let headings: Vec<_> = doc.children(doc.root()).collect();
        assert_eq!(doc.heading_level(headings[0]), Some(2));
        let text = doc.first_child(headings[0]).unwrap();
        assert_eq!(doc.literal(text), Some(&b"foo"[..]));
        let text = doc.first_child(headings[1]).unwrap();
        assert_eq!(doc.literal(text), Some(&b"bar#"[..]));
        assert_eq!(doc.first_child(headings[2]), None);
    }

    #[test]
    fn test_setext_heading() {
        let doc = parse("Foo\nbar\n---\n");
        let heading = only_child(&doc, doc.root());
        assert_eq!(doc.value(heading), &NodeValue::Heading(HeadingData { level: 2, setext: true }));
        assert_eq!(doc.sourcepos(heading), Sourcepos::new(1, 1, 3, 3));
    }

    #[test]
    fn test_setext_after_reference_definition_stays_text() {
        let doc = parse("[foo]: /url\n===\n");
        let para = only_child(&doc, doc.root());
        assert_eq!(doc.kind(para), NodeKind::Paragraph);
    }

    #[test]
    fn test_reference_only_paragraph_removed() {
        let doc = parse("[foo]: /url \"title\"\n");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_thematic_break_vs_list() {
        let doc = parse("* * *\n- foo\n");
        assert_eq!(kinds(&doc, doc.root()), vec![NodeKind::ThematicBreak, NodeKind::List]);
    }

    #[test]
    fn test_fenced_code_info_and_literal() {
        let doc = parse("``` rust&#32;x \\*\nfn main() {}\n```\nafter\n");
        let code = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.fence_info(code), Some(&b"rust x *"[..]));
        assert_eq!(doc.literal(code), Some(&b"fn main() {}\n"[..]));
        assert_eq!(doc.sourcepos(code), Sourcepos::new(1, 1, 3, 3));
        assert_eq!(doc.kind(doc.last_child(doc.root()).unwrap()), NodeKind::Paragraph);
    }

    #[test]
    fn test_fenced_code_strips_fence_indent() {
        let doc = parse("  ```\n  aaa\n    bbb\naaa\n  ```\n");
        let code = only_child(&doc, doc.root());
        assert_eq!(doc.literal(code), Some(&b"aaa\n  bbb\naaa\n"[..]));
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let doc = parse("```\nabc\n\n");
        let code = only_child(&doc, doc.root());
        assert_eq!(doc.literal(code), Some(&b"abc\n\n"[..]));
    }

    #[test]
    fn test_indented_code_drops_trailing_blank_lines() {
        let doc = parse("    foo\n\n    bar\n\n\n");
        let code = only_child(&doc, doc.root());
        assert_eq!(doc.literal(code), Some(&b"foo\n\nbar\n"[..]));
    }

    #[test]
    fn test_indented_code_cannot_interrupt_paragraph() {
        let doc = parse("foo\n    bar\n");
        assert_eq!(kinds(&doc, doc.root()), vec![NodeKind::Paragraph]);
    }

    #[test]
    fn test_partial_tab_in_code() {
        let doc = parse(">\t\tfoo\n");
        let quote = only_child(&doc, doc.root());
        let code = only_child(&doc, quote);
        assert_eq!(doc.literal(code), Some(&b"  foo\n"[..]));
    }

    #[test]
    fn test_block_quote_lazy_continuation() {
        let doc = parse("> foo\nbar\n");
        let quote = only_child(&doc, doc.root());
        assert_eq!(doc.kind(quote), NodeKind::BlockQuote);
        let para = only_child(&doc, quote);
        assert_eq!(doc.kind(para), NodeKind::Paragraph);
    }

    #[test]
    fn test_lazy_line_cannot_be_setext_underline() {
        let doc = parse("> foo\n---\n");
        assert_eq!(kinds(&doc, doc.root()), vec![NodeKind::BlockQuote, NodeKind::ThematicBreak]);
    }

    #[test]
    fn test_tight_and_loose_lists() {
        let doc = parse("- a\n- b\n\n- c\n");
        let list = only_child(&doc, doc.root());
        assert!(!doc.list_data(list).unwrap().tight);
        for item in doc.children(list) {
            assert!(!doc.list_data(item).unwrap().tight);
        }

        let doc = parse("- a\n- b\n  - c\n");
        let list = only_child(&doc, doc.root());
        assert!(doc.list_data(list).unwrap().tight);
    }

    #[test]
    fn test_blank_line_between_nested_blocks_loosens() {
        let doc = parse("- a\n\n  b\n");
        let list = only_child(&doc, doc.root());
        assert!(!doc.list_data(list).unwrap().tight);
    }

    #[test]
    fn test_list_kind_change_starts_new_list() {
        let doc = parse("- foo\n+ bar\n1. one\n2) two\n");
        assert_eq!(kinds(&doc, doc.root()), vec![NodeKind::List; 4]);
    }

    #[test]
    fn test_ordered_list_start_and_padding() {
        let doc = parse("3.  foo\n    bar\n");
        let list = only_child(&doc, doc.root());
        let data = doc.list_data(list).unwrap();
        assert_eq!(data.start, 3);
        let item = only_child(&doc, list);
        assert_eq!(doc.list_data(item).unwrap().padding, 4);
        assert_eq!(kinds(&doc, item), vec![NodeKind::Paragraph]);
    }

    #[test]
    fn test_list_item_with_indented_code() {
        let doc = parse("-     code\n");
        let list = only_child(&doc, doc.root());
        let item = only_child(&doc, list);
        let code = only_child(&doc, item);
        assert_eq!(doc.literal(code), Some(&b"code\n"[..]));
    }

    #[test]
    fn test_empty_item_then_content() {
        let doc = parse("-\n  foo\n");
        let list = only_child(&doc, doc.root());
        let item = only_child(&doc, list);
        assert_eq!(kinds(&doc, item), vec![NodeKind::Paragraph]);
    }

    #[test]
    fn test_html_block_ends_at_blank_line() {
        let doc = parse("<div>\n*hi*\n\ntext\n");
        assert_eq!(kinds(&doc, doc.root()), vec![NodeKind::HtmlBlock, NodeKind::Paragraph]);
        let html = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.literal(html), Some(&b"<div>\n*hi*\n"[..]));
    }

    #[test]
    fn test_html_block_end_condition() {
        let doc = parse("<!-- a\n\nb -->\nafter\n");
        let html = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.literal(html), Some(&b"<!-- a\n\nb -->\n"[..]));
        assert_eq!(kinds(&doc, doc.root()), vec![NodeKind::HtmlBlock, NodeKind::Paragraph]);
    }

    #[test]
    fn test_deep_nesting_stops_opening_lists() {
        let input = "- ".repeat(MAX_LIST_DEPTH + 20) + "x\n";
        let doc = parse(&input);
        let depth = doc
            .descendants(doc.root())
            .filter(|&id| doc.kind(id) == NodeKind::List)
            .count();
        assert_eq!(depth, MAX_LIST_DEPTH);
    }

    #[test]
    fn test_paragraph_sourcepos() {
        let doc = parse("hello\nworld\n\n# h\n");
        let para = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.sourcepos(para), Sourcepos::new(1, 1, 2, 5));
        assert_eq!(doc.sourcepos(doc.root()), Sourcepos::new(1, 1, 4, 3));
    }

    #[test]
    fn test_chop_trailing_hashes() {
        assert_eq!(chop_trailing_hashes(b"foo ##\n", 0), 3);
        assert_eq!(chop_trailing_hashes(b"foo#\n", 0), 4);
        assert_eq!(chop_trailing_hashes(b"###\n", 0), 0);
        assert_eq!(chop_trailing_hashes(b"foo  \n", 0), 3);
    }
}
