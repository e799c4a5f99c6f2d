//! Document tree stored as an arena of nodes.
//!
//! Nodes are addressed by [`NodeId`] and linked through parent, sibling and
//! child indices, so the whole tree lives in one `Vec` and needs no reference
//! counting. Nodes removed while parsing stay in the arena, detached.

use crate::error::{Error, MalformedUnicode, TreeError};
use std::fmt;

/// Index of a node inside its [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    fn from_index(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        Self(index as u32)
    }
}

/// A 1-based line and column in the source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

/// Source span of a node, inclusive on both ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Sourcepos {
    pub start: LineColumn,
    pub end: LineColumn,
}

impl Sourcepos {
    pub const fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start: LineColumn {
                line: start_line,
                column: start_column,
            },
            end: LineColumn {
                line: end_line,
                column: end_column,
            },
        }
    }
}

impl fmt::Display for Sourcepos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// Bullet or ordered list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListKind {
    Bullet,
    Ordered,
}

/// Delimiter following an ordered list number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListDelimiter {
    Period,
    Paren,
}

/// Attributes shared by a list and its items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListData {
    pub kind: ListKind,
    pub delimiter: ListDelimiter,
    /// `-`, `+` or `*` for bullet lists, 0 for ordered lists.
    pub bullet_char: u8,
    pub start: u32,
    pub tight: bool,
    /// Columns of indentation before the marker.
    pub marker_offset: usize,
    /// Width of the marker plus the spaces after it.
    pub padding: usize,
}

impl ListData {
    /// Tight bullet list using `bullet_char`.
    pub const fn bullet(bullet_char: u8) -> Self {
        Self {
            kind: ListKind::Bullet,
            delimiter: ListDelimiter::Period,
            bullet_char,
            start: 1,
            tight: true,
            marker_offset: 0,
            padding: 2,
        }
    }

    /// Tight ordered list counting from `start`.
    pub const fn ordered(start: u32, delimiter: ListDelimiter) -> Self {
        Self {
            kind: ListKind::Ordered,
            delimiter,
            bullet_char: 0,
            start,
            tight: true,
            marker_offset: 0,
            padding: 3,
        }
    }

    /// Whether an item with these attributes continues a list with `other`.
    pub fn matches(&self, other: &ListData) -> bool {
        self.kind == other.kind
            && self.delimiter == other.delimiter
            && self.bullet_char == other.bullet_char
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HeadingData {
    /// 1 through 6.
    pub level: u8,
    pub setext: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CodeBlockData {
    pub fenced: bool,
    pub fence_char: u8,
    pub fence_length: usize,
    pub fence_offset: usize,
    /// Info string with escapes and entities resolved.
    pub info: Vec<u8>,
    pub literal: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct HtmlBlockData {
    /// Start condition that opened the block, 1 through 7.
    pub block_type: u8,
    pub literal: Vec<u8>,
}

/// Destination and title of a link or image.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LinkData {
    pub url: Vec<u8>,
    pub title: Vec<u8>,
    /// Resolved through a link reference definition.
    pub from_reference: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineBreak {
    Hard,
    Soft,
}

/// Kind-specific payload of a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeValue {
    Document,
    BlockQuote,
    List(ListData),
    Item(ListData),
    Heading(HeadingData),
    Paragraph,
    CodeBlock(CodeBlockData),
    HtmlBlock(HtmlBlockData),
    ThematicBreak,
    Text(Vec<u8>),
    Emph,
    Strong,
    Link(LinkData),
    Image(LinkData),
    Code(Vec<u8>),
    LineBreak(LineBreak),
    HtmlInline(Vec<u8>),
}

/// Node kind without payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    BlockQuote,
    List,
    Item,
    Heading,
    Paragraph,
    CodeBlock,
    HtmlBlock,
    ThematicBreak,
    Text,
    Emph,
    Strong,
    Link,
    Image,
    Code,
    LineBreak,
    HtmlInline,
}

impl NodeKind {
    /// Block-level kinds.
    pub const fn is_block(self) -> bool {
        matches!(
            self,
            Self::Document
                | Self::BlockQuote
                | Self::List
                | Self::Item
                | Self::Heading
                | Self::Paragraph
                | Self::CodeBlock
                | Self::HtmlBlock
                | Self::ThematicBreak
        )
    }

    /// Whether a node of this kind may hold a child of `child` kind.
    pub const fn can_contain(self, child: NodeKind) -> bool {
        match self {
            Self::Document | Self::BlockQuote | Self::Item => {
                child.is_block() && !matches!(child, Self::Item | Self::Document)
            }
            Self::List => matches!(child, Self::Item),
            Self::Paragraph | Self::Heading | Self::Emph | Self::Strong | Self::Link | Self::Image => {
                !child.is_block()
            }
            _ => false,
        }
    }
}

impl NodeValue {
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Document => NodeKind::Document,
            Self::BlockQuote => NodeKind::BlockQuote,
            Self::List(_) => NodeKind::List,
            Self::Item(_) => NodeKind::Item,
            Self::Heading(_) => NodeKind::Heading,
            Self::Paragraph => NodeKind::Paragraph,
            Self::CodeBlock(_) => NodeKind::CodeBlock,
            Self::HtmlBlock(_) => NodeKind::HtmlBlock,
            Self::ThematicBreak => NodeKind::ThematicBreak,
            Self::Text(_) => NodeKind::Text,
            Self::Emph => NodeKind::Emph,
            Self::Strong => NodeKind::Strong,
            Self::Link(_) => NodeKind::Link,
            Self::Image(_) => NodeKind::Image,
            Self::Code(_) => NodeKind::Code,
            Self::LineBreak(_) => NodeKind::LineBreak,
            Self::HtmlInline(_) => NodeKind::HtmlInline,
        }
    }
}

/// One arena slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub value: NodeValue,
    pub sourcepos: Sourcepos,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

impl Node {
    fn new(value: NodeValue, sourcepos: Sourcepos) -> Self {
        Self {
            value,
            sourcepos,
            parent: None,
            first_child: None,
            last_child: None,
            prev: None,
            next: None,
        }
    }
}

/// A parsed Markdown document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
    malformed: Vec<MalformedUnicode>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document holding only its root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeValue::Document, Sourcepos::new(1, 1, 1, 0))],
            malformed: Vec::new(),
        }
    }

    /// The `Document` node.
    #[inline]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of arena slots, including detached nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first_child(self.root()).is_none()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn value(&self, id: NodeId) -> &NodeValue {
        &self.nodes[id.index()].value
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].value.kind()
    }

    #[inline]
    pub fn sourcepos(&self, id: NodeId) -> Sourcepos {
        self.nodes[id.index()].sourcepos
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    #[inline]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].first_child
    }

    #[inline]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].last_child
    }

    #[inline]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].next
    }

    #[inline]
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].prev
    }

    /// Iterate over the direct children of `id`.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.first_child(id),
        }
    }

    /// Iterate over `id` and everything below it in document order.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.traverse(id).filter_map(|edge| match edge {
            NodeEdge::Start(node) => Some(node),
            NodeEdge::End(_) => None,
        })
    }

    /// Iterate over enter/exit events for the subtree rooted at `id`.
    pub fn traverse(&self, id: NodeId) -> Traverse<'_> {
        Traverse {
            doc: self,
            root: id,
            next: Some(NodeEdge::Start(id)),
        }
    }

    /// Literal content of text, code, inline HTML, code block and HTML block nodes.
    pub fn literal(&self, id: NodeId) -> Option<&[u8]> {
        match self.value(id) {
            NodeValue::Text(text) | NodeValue::Code(text) | NodeValue::HtmlInline(text) => Some(text),
            NodeValue::CodeBlock(code) => Some(&code.literal),
            NodeValue::HtmlBlock(html) => Some(&html.literal),
            _ => None,
        }
    }

    /// Destination of a link or image.
    pub fn url(&self, id: NodeId) -> Option<&[u8]> {
        match self.value(id) {
            NodeValue::Link(link) | NodeValue::Image(link) => Some(&link.url),
            _ => None,
        }
    }

    /// Title of a link or image; empty when none was given.
    pub fn title(&self, id: NodeId) -> Option<&[u8]> {
        match self.value(id) {
            NodeValue::Link(link) | NodeValue::Image(link) => Some(&link.title),
            _ => None,
        }
    }

    pub fn heading_level(&self, id: NodeId) -> Option<u8> {
        match self.value(id) {
            NodeValue::Heading(heading) => Some(heading.level),
            _ => None,
        }
    }

    /// List attributes of a list or list item.
    pub fn list_data(&self, id: NodeId) -> Option<&ListData> {
        match self.value(id) {
            NodeValue::List(list) | NodeValue::Item(list) => Some(list),
            _ => None,
        }
    }

    /// Info string of a fenced code block.
    pub fn fence_info(&self, id: NodeId) -> Option<&[u8]> {
        match self.value(id) {
            NodeValue::CodeBlock(code) => Some(&code.info),
            _ => None,
        }
    }

    /// Invalid UTF-8 sequences that were replaced while parsing.
    pub fn malformed_unicode(&self) -> &[MalformedUnicode] {
        &self.malformed
    }

    /// Fail with the first repaired sequence, if any.
    pub fn check_unicode(&self) -> Result<(), Error> {
        match self.malformed.first() {
            Some(bad) => Err(Error::MalformedUnicode(*bad)),
            None => Ok(()),
        }
    }

    /// Drive `visitor` over the whole tree.
    pub fn walk<V: Visitor>(&self, visitor: &mut V) {
        let mut edges = self.traverse(self.root());
        while let Some(edge) = edges.next() {
            match edge {
                NodeEdge::Start(id) => {
                    if visitor.visit_start(self, id) == Visit::SkipChildren {
                        edges.skip_subtree(id);
                        visitor.visit_end(self, id);
                    }
                }
                NodeEdge::End(id) => visitor.visit_end(self, id),
            }
        }
    }

    /// Merge adjacent text siblings throughout the tree.
    pub fn normalize(&mut self) {
        let mut id = 0;
        while id < self.nodes.len() {
            let node = NodeId::from_index(id);
            if self.is_attached(node) && self.kind(node) == NodeKind::Text {
                while let Some(next) = self.next_sibling(node) {
                    let NodeValue::Text(extra) = &self.nodes[next.index()].value else {
                        break;
                    };
                    let extra = extra.clone();
                    if let NodeValue::Text(text) = &mut self.nodes[id].value {
                        text.extend_from_slice(&extra);
                    }
                    self.detach(next);
                }
            }
            id += 1;
        }
    }

    fn is_attached(&self, id: NodeId) -> bool {
        id == self.root() || self.parent(id).is_some()
    }

    // --- editing ---

    /// Create a detached node. It renders once attached below the root.
    pub fn create(&mut self, value: NodeValue) -> NodeId {
        self.alloc(value, Sourcepos::default())
    }

    /// Make `child` the last child of `parent`, moving it if it is attached elsewhere.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        self.check_placement(parent, child)?;
        self.append_child(parent, child);
        Ok(())
    }

    /// Create a node as the last child of `parent`.
    ///
    /// # Example
    /// ```
    /// use marktree::{Document, NodeValue, Options};
    ///
    /// let mut doc = Document::new();
    /// let para = doc.append_new(doc.root(), NodeValue::Paragraph).unwrap();
    /// doc.append_new(para, NodeValue::Text(b"hi".to_vec())).unwrap();
    /// assert!(doc.append_new(para, NodeValue::Paragraph).is_err());
    /// assert_eq!(marktree::render_html(&doc, &Options::default()), b"<p>hi</p>\n");
    /// ```
    pub fn append_new(&mut self, parent: NodeId, value: NodeValue) -> Result<NodeId, Error> {
        check_contains(self.kind(parent), value.kind())?;
        let id = self.create(value);
        self.append_child(parent, id);
        Ok(id)
    }

    /// Move `new` right before `sibling`.
    pub fn place_before(&mut self, sibling: NodeId, new: NodeId) -> Result<(), Error> {
        let parent = self.parent(sibling).ok_or(TreeError::NoParent)?;
        self.check_placement(parent, new)?;
        if new != sibling && self.previous_sibling(sibling) != Some(new) {
            self.insert_before(sibling, new);
        }
        Ok(())
    }

    /// Move `new` right after `sibling`.
    pub fn place_after(&mut self, sibling: NodeId, new: NodeId) -> Result<(), Error> {
        let parent = self.parent(sibling).ok_or(TreeError::NoParent)?;
        self.check_placement(parent, new)?;
        if new != sibling && self.next_sibling(sibling) != Some(new) {
            self.insert_after(sibling, new);
        }
        Ok(())
    }

    /// Detach `id` and its subtree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
    }

    /// Put the children of `id` in its place and detach it.
    pub fn unwrap_node(&mut self, id: NodeId) -> Result<(), Error> {
        let parent = self.parent(id).ok_or(TreeError::NoParent)?;
        let parent_kind = self.kind(parent);
        if let Some(child) = self.children(id).find(|&child| !parent_kind.can_contain(self.kind(child))) {
            return Err(TreeError::CannotContain {
                parent: parent_kind,
                child: self.kind(child),
            }
            .into());
        }
        while let Some(child) = self.first_child(id) {
            self.insert_before(id, child);
        }
        self.detach(id);
        Ok(())
    }

    /// Swap the value of `id`, returning the old one. The new kind must fit
    /// both the parent and the existing children.
    pub fn set_value(&mut self, id: NodeId, value: NodeValue) -> Result<NodeValue, Error> {
        let kind = value.kind();
        if let Some(parent) = self.parent(id) {
            check_contains(self.kind(parent), kind)?;
        }
        if id == self.root() && kind != NodeKind::Document {
            return Err(TreeError::NoParent.into());
        }
        for child in self.children(id) {
            check_contains(kind, self.kind(child))?;
        }
        Ok(std::mem::replace(self.value_mut(id), value))
    }

    /// Offer every node below the root to `rewriter`, children before their
    /// parent, and apply what it returns.
    ///
    /// Stops at the first edit that would break the structure. Edits made
    /// before that are kept.
    pub fn rewrite<R: Rewriter + ?Sized>(&mut self, rewriter: &mut R) -> Result<(), Error> {
        let root = self.root();
        let order: Vec<NodeId> = self
            .traverse(root)
            .filter_map(|edge| match edge {
                NodeEdge::End(id) if id != root => Some(id),
                _ => None,
            })
            .collect();
        for id in order {
            match rewriter.rewrite(self, id) {
                Rewrite::Keep => {}
                Rewrite::Replace(value) => {
                    self.set_value(id, value)?;
                }
                Rewrite::Remove => self.detach(id),
                Rewrite::Unwrap => self.unwrap_node(id)?,
            }
        }
        Ok(())
    }

    fn check_placement(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        check_contains(self.kind(parent), self.kind(child))?;
        let mut ancestor = Some(parent);
        while let Some(node) = ancestor {
            if node == child {
                return Err(TreeError::Cycle);
            }
            ancestor = self.parent(node);
        }
        Ok(())
    }

    // --- construction, used by the parsers ---

    pub(crate) fn set_malformed(&mut self, malformed: Vec<MalformedUnicode>) {
        self.malformed = malformed;
    }

    pub(crate) fn value_mut(&mut self, id: NodeId) -> &mut NodeValue {
        &mut self.nodes[id.index()].value
    }

    pub(crate) fn sourcepos_mut(&mut self, id: NodeId) -> &mut Sourcepos {
        &mut self.nodes[id.index()].sourcepos
    }

    /// Allocate a detached node.
    pub(crate) fn alloc(&mut self, value: NodeValue, sourcepos: Sourcepos) -> NodeId {
        assert!(self.nodes.len() < u32::MAX as usize, "document arena is full");
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node::new(value, sourcepos));
        id
    }

    /// Detach `child` from wherever it is and make it the last child of `parent`.
    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = Some(parent);
            node.prev = last;
        }
        match last {
            Some(last) => self.nodes[last.index()].next = Some(child),
            None => self.nodes[parent.index()].first_child = Some(child),
        }
        self.nodes[parent.index()].last_child = Some(child);
    }

    /// Detach `new` and place it right after `sibling`.
    pub(crate) fn insert_after(&mut self, sibling: NodeId, new: NodeId) {
        self.detach(new);
        let parent = self.nodes[sibling.index()].parent;
        let next = self.nodes[sibling.index()].next;
        {
            let node = &mut self.nodes[new.index()];
            node.parent = parent;
            node.prev = Some(sibling);
            node.next = next;
        }
        self.nodes[sibling.index()].next = Some(new);
        match next {
            Some(next) => self.nodes[next.index()].prev = Some(new),
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent.index()].last_child = Some(new);
                }
            }
        }
    }

    /// Detach `new` and place it right before `sibling`.
    pub(crate) fn insert_before(&mut self, sibling: NodeId, new: NodeId) {
        match self.nodes[sibling.index()].prev {
            Some(prev) => self.insert_after(prev, new),
            None => {
                self.detach(new);
                let parent = self.nodes[sibling.index()].parent;
                {
                    let node = &mut self.nodes[new.index()];
                    node.parent = parent;
                    node.next = Some(sibling);
                }
                self.nodes[sibling.index()].prev = Some(new);
                if let Some(parent) = parent {
                    self.nodes[parent.index()].first_child = Some(new);
                }
            }
        }
    }

    /// Unlink `id` from its parent and siblings. Its own children stay attached to it.
    pub(crate) fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &mut self.nodes[id.index()];
            let links = (node.parent, node.prev, node.next);
            node.parent = None;
            node.prev = None;
            node.next = None;
            links
        };
        match prev {
            Some(prev) => self.nodes[prev.index()].next = next,
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent.index()].first_child = next;
                }
            }
        }
        match next {
            Some(next) => self.nodes[next.index()].prev = prev,
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent.index()].last_child = prev;
                }
            }
        }
    }
}

fn check_contains(parent: NodeKind, child: NodeKind) -> Result<(), TreeError> {
    if parent.can_contain(child) {
        Ok(())
    } else {
        Err(TreeError::CannotContain { parent, child })
    }
}

/// Iterator over a node's children.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.next_sibling(current);
        Some(current)
    }
}

/// Entering or leaving a node during traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeEdge {
    Start(NodeId),
    End(NodeId),
}

/// Depth-first traversal producing [`NodeEdge`]s.
pub struct Traverse<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeEdge>,
}

impl Traverse<'_> {
    /// Continue after `id` as if its children had been visited.
    fn skip_subtree(&mut self, id: NodeId) {
        self.next = self.after_end(id);
    }

    fn after_end(&self, id: NodeId) -> Option<NodeEdge> {
        if id == self.root {
            return None;
        }
        match self.doc.next_sibling(id) {
            Some(sibling) => Some(NodeEdge::Start(sibling)),
            None => self.doc.parent(id).map(NodeEdge::End),
        }
    }
}

impl Iterator for Traverse<'_> {
    type Item = NodeEdge;

    fn next(&mut self) -> Option<NodeEdge> {
        let edge = self.next?;
        self.next = match edge {
            NodeEdge::Start(id) => match self.doc.first_child(id) {
                Some(child) => Some(NodeEdge::Start(child)),
                None => Some(NodeEdge::End(id)),
            },
            NodeEdge::End(id) => self.after_end(id),
        };
        Some(edge)
    }
}

/// What to do after entering a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visit {
    Children,
    SkipChildren,
}

/// Callbacks for [`Document::walk`].
pub trait Visitor {
    fn visit_start(&mut self, doc: &Document, id: NodeId) -> Visit {
        let _ = (doc, id);
        Visit::Children
    }

    fn visit_end(&mut self, doc: &Document, id: NodeId) {
        let _ = (doc, id);
    }
}

/// What a [`Rewriter`] does with a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rewrite {
    Keep,
    /// Swap in a new value. Children stay attached.
    Replace(NodeValue),
    /// Drop the node together with its subtree.
    Remove,
    /// Put the node's children in its place.
    Unwrap,
}

/// Callbacks for [`Document::rewrite`].
pub trait Rewriter {
    fn rewrite(&mut self, doc: &Document, id: NodeId) -> Rewrite;
}

impl<F> Rewriter for F
where
    F: FnMut(&Document, NodeId) -> Rewrite,
{
    fn rewrite(&mut self, doc: &Document, id: NodeId) -> Rewrite {
        self(doc, id)
    }
}
