//! marktree: CommonMark Markdown to HTML with an indexed document tree
//!
//! Parsing runs in two phases. The block parser consumes the input line by
//! line and builds the container structure, collecting link reference
//! definitions on the way. The inline parser then turns the text of every
//! paragraph and heading into inline nodes. The result is a [`Document`], an
//! arena of nodes addressed by [`NodeId`], which [`render_html`] turns into
//! HTML matching the CommonMark reference implementation.
//!
//! # Design Principles
//! - No regex: pure byte-level scanning
//! - Linear time on all inputs, including pathological nesting and
//!   delimiter runs
//! - Safe by default: raw HTML and dangerous URLs are suppressed unless
//!   [`Options::unsafe_raw_html`] is set
//!
//! # Example
//! ```
//! use marktree::{parse, render_html, NodeKind, Options};
//!
//! let options = Options::default();
//! let doc = parse(b"# Hello\n\n*World*", &options);
//! let heading = doc.first_child(doc.root()).unwrap();
//! assert_eq!(doc.kind(heading), NodeKind::Heading);
//! assert_eq!(doc.heading_level(heading), Some(1));
//!
//! let html = render_html(&doc, &options);
//! assert_eq!(html, b"<h1>Hello</h1>\n<p><em>World</em></p>\n");
//! ```

pub mod block;
pub mod cursor;
mod entity;
pub mod error;
pub mod escape;
pub mod inline;
pub mod limits;
pub mod link_ref;
pub mod range;
pub mod render;
pub mod scanner;
pub mod tree;

use std::io;

// Re-export primary types
pub use block::BlockParser;
pub use error::{Error, MalformedUnicode, TreeError};
pub use inline::InlineParser;
pub use link_ref::{LinkRefDef, LinkRefStore};
pub use range::Range;
pub use render::{HtmlRenderer, HtmlWriter};
pub use tree::{
    CodeBlockData, Document, HeadingData, HtmlBlockData, LineBreak, LineColumn, LinkData, ListData, ListDelimiter,
    ListKind, Node, NodeEdge, NodeId, NodeKind, NodeValue, Rewrite, Rewriter, Sourcepos, Visit, Visitor,
};

/// Parsing/rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Curly quotes, en and em dashes, and ellipses.
    pub smart_punctuation: bool,
    /// Emit raw HTML and dangerous URLs as written. Off by default, when raw
    /// HTML renders as `<!-- raw HTML omitted -->`.
    pub unsafe_raw_html: bool,
    /// Replace invalid UTF-8 with U+FFFD and record where it was found.
    pub validate_utf8: bool,
    /// Render soft line breaks as `<br />`.
    pub hard_breaks: bool,
    /// Add `data-sourcepos` attributes to block elements.
    pub source_positions: bool,
    /// Merge adjacent text nodes after parsing.
    pub normalize: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            smart_punctuation: false,
            unsafe_raw_html: false,
            validate_utf8: true,
            hard_breaks: false,
            source_positions: false,
            normalize: false,
        }
    }
}

/// Parse Markdown into a document tree.
///
/// Parsing never fails. Malformed UTF-8 is repaired and reported through
/// [`Document::malformed_unicode`].
pub fn parse(input: &[u8], options: &Options) -> Document {
    let (prepared, malformed) = scanner::prepare_input(input, options.validate_utf8);
    let mut doc = BlockParser::new(&prepared).parse(options);
    doc.set_malformed(malformed);
    if options.normalize {
        doc.normalize();
    }
    doc
}

/// Render a document to HTML.
pub fn render_html(doc: &Document, options: &Options) -> Vec<u8> {
    HtmlRenderer::new(options).render(doc)
}

/// Render a document to HTML and write it to `sink`.
///
/// # Example
/// ```
/// let options = marktree::Options::default();
/// let doc = marktree::parse(b"hi", &options);
/// let mut out = Vec::new();
/// marktree::write_html(&doc, &options, &mut out).unwrap();
/// assert_eq!(out, b"<p>hi</p>\n");
/// ```
pub fn write_html<W: io::Write>(doc: &Document, options: &Options, mut sink: W) -> Result<(), Error> {
    let html = render_html(doc, options);
    sink.write_all(&html)?;
    sink.flush()?;
    Ok(())
}

/// Convert Markdown to HTML.
///
/// This is the primary API for simple use cases.
///
/// # Example
/// ```
/// let html = marktree::to_html("# Hello\n\nWorld");
/// assert!(html.contains("<h1>Hello</h1>"));
/// assert!(html.contains("<p>World</p>"));
/// ```
pub fn to_html(input: &str) -> String {
    to_html_with_options(input, &Options::default())
}

/// Convert Markdown to HTML with options.
pub fn to_html_with_options(input: &str, options: &Options) -> String {
    let doc = parse(input.as_bytes(), options);
    HtmlRenderer::with_writer(options, HtmlWriter::with_capacity_for(input.len()))
        .render_to_writer(&doc)
        .into_string()
}
