//! HTML rendering of a parsed [`Document`].
//!
//! [`HtmlWriter`] owns the output buffer and knows how to spell each tag;
//! [`HtmlRenderer`] walks the tree and decides which tags to write.

use crate::escape::{escape_href_into, escape_text_into, is_dangerous_url};
use crate::tree::{Document, LineBreak, ListKind, NodeId, NodeValue, Sourcepos, Visit, Visitor};
use crate::Options;

const RAW_HTML_OMITTED: &str = "<!-- raw HTML omitted -->";

/// HTML output writer with a pre-allocated, reusable buffer.
///
/// # Example
/// ```
/// use marktree::HtmlWriter;
///
/// let mut writer = HtmlWriter::with_capacity_for(1000);
/// writer.write_str("<p>");
/// writer.write_escaped_text(b"Hello <World>");
/// writer.write_str("</p>");
///
/// let html = writer.into_string();
/// assert_eq!(html, "<p>Hello &lt;World&gt;</p>");
/// ```
#[derive(Debug)]
pub struct HtmlWriter {
    out: Vec<u8>,
}

impl HtmlWriter {
    /// Create a new writer with default capacity.
    #[inline]
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(1024),
        }
    }

    /// Create with capacity based on the expected input size.
    ///
    /// Typical HTML is ~1.25x the Markdown it came from.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        let capacity = input_len + input_len / 4;
        Self {
            out: Vec::with_capacity(capacity),
        }
    }

    /// Write raw bytes without escaping.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    /// Write a static string (compile-time known).
    #[inline]
    pub fn write_str(&mut self, s: &'static str) {
        self.out.extend_from_slice(s.as_bytes());
    }

    /// Write a single byte.
    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        self.out.push(b);
    }

    /// Write text with HTML escaping.
    #[inline]
    pub fn write_escaped_text(&mut self, text: &[u8]) {
        escape_text_into(&mut self.out, text);
    }

    /// Write a URL percent-encoded for an `href` or `src` attribute.
    #[inline]
    pub fn write_escaped_href(&mut self, url: &[u8]) {
        escape_href_into(&mut self.out, url);
    }

    /// Start a new line unless the output is empty or already at one.
    #[inline]
    pub fn cr(&mut self) {
        if self.out.last().is_some_and(|&b| b != b'\n') {
            self.out.push(b'\n');
        }
    }

    /// Current output length.
    #[inline]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.out
    }

    /// Take ownership of the output buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.out
    }

    /// Take ownership as a `String`.
    ///
    /// Output mirrors the input bytes, so input parsed without UTF-8
    /// validation may need lossy conversion.
    pub fn into_string(self) -> String {
        match String::from_utf8(self.out) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }

    // --- HTML Tag Helpers ---

    /// Write `<tag` with an optional `data-sourcepos` attribute, leaving the
    /// tag open.
    #[inline]
    fn start_tag(&mut self, tag: &'static str, sourcepos: Option<Sourcepos>) {
        self.write_byte(b'<');
        self.write_str(tag);
        self.write_sourcepos(sourcepos);
    }

    fn write_sourcepos(&mut self, sourcepos: Option<Sourcepos>) {
        if let Some(pos) = sourcepos {
            self.write_str(" data-sourcepos=\"");
            self.write_usize(pos.start.line);
            self.write_byte(b':');
            self.write_usize(pos.start.column);
            self.write_byte(b'-');
            self.write_usize(pos.end.line);
            self.write_byte(b':');
            self.write_usize(pos.end.column);
            self.write_byte(b'"');
        }
    }

    /// Write opening tag: `<tag>`
    #[inline]
    pub fn open_tag(&mut self, tag: &'static str, sourcepos: Option<Sourcepos>) {
        self.start_tag(tag, sourcepos);
        self.write_byte(b'>');
    }

    /// Write opening tag with newline: `<tag>\n`
    #[inline]
    pub fn open_tag_nl(&mut self, tag: &'static str, sourcepos: Option<Sourcepos>) {
        self.open_tag(tag, sourcepos);
        self.write_byte(b'\n');
    }

    /// Write closing tag: `</tag>`
    #[inline]
    pub fn close_tag(&mut self, tag: &'static str) {
        self.write_str("</");
        self.write_str(tag);
        self.write_byte(b'>');
    }

    /// Write closing tag with newline: `</tag>\n`
    #[inline]
    pub fn close_tag_nl(&mut self, tag: &'static str) {
        self.close_tag(tag);
        self.write_byte(b'\n');
    }

    // --- Common HTML Elements ---

    /// Write heading start: `<hN>`
    #[inline]
    pub fn heading_start(&mut self, level: u8, sourcepos: Option<Sourcepos>) {
        debug_assert!((1..=6).contains(&level));
        self.start_tag(heading_tag(level), sourcepos);
        self.write_byte(b'>');
    }

    /// Write heading end: `</hN>\n`
    #[inline]
    pub fn heading_end(&mut self, level: u8) {
        self.close_tag_nl(heading_tag(level));
    }

    /// Write a whole code block. Only the first word of `info` names the
    /// language.
    pub fn code_block(&mut self, info: &[u8], literal: &[u8], sourcepos: Option<Sourcepos>) {
        self.start_tag("pre", sourcepos);
        let lang_len = info
            .iter()
            .position(|&b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0B' | b'\x0C'))
            .unwrap_or(info.len());
        if lang_len == 0 {
            self.write_str("><code>");
        } else {
            self.write_str("><code class=\"language-");
            self.write_escaped_text(&info[..lang_len]);
            self.write_str("\">");
        }
        self.write_escaped_text(literal);
        self.write_str("</code></pre>\n");
    }

    /// Write thematic break: `<hr />\n`
    #[inline]
    pub fn thematic_break(&mut self, sourcepos: Option<Sourcepos>) {
        self.start_tag("hr", sourcepos);
        self.write_str(" />\n");
    }

    /// Write ordered list start: `<ol>\n` or `<ol start="N">\n`
    pub fn ol_start(&mut self, start: u32, sourcepos: Option<Sourcepos>) {
        self.write_str("<ol");
        if start != 1 {
            self.write_str(" start=\"");
            self.write_usize(start as usize);
            self.write_byte(b'"');
        }
        self.write_sourcepos(sourcepos);
        self.write_str(">\n");
    }

    /// Write inline code: `<code>escaped_content</code>`
    #[inline]
    pub fn inline_code(&mut self, content: &[u8]) {
        self.write_str("<code>");
        self.write_escaped_text(content);
        self.write_str("</code>");
    }

    /// Write line break: `<br />\n`
    #[inline]
    pub fn line_break(&mut self) {
        self.write_str("<br />\n");
    }

    fn write_usize(&mut self, mut n: usize) {
        if n == 0 {
            self.write_byte(b'0');
            return;
        }

        let mut buf = [0u8; 20];
        let mut i = buf.len();
        while n > 0 {
            i -= 1;
            buf[i] = b'0' + (n % 10) as u8;
            n /= 10;
        }
        self.write_bytes(&buf[i..]);
    }
}

fn heading_tag(level: u8) -> &'static str {
    match level {
        1 => "h1",
        2 => "h2",
        3 => "h3",
        4 => "h4",
        5 => "h5",
        _ => "h6",
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Tree walker producing CommonMark reference HTML.
pub struct HtmlRenderer<'o> {
    options: &'o Options,
    writer: HtmlWriter,
}

impl<'o> HtmlRenderer<'o> {
    pub fn new(options: &'o Options) -> Self {
        Self::with_writer(options, HtmlWriter::new())
    }

    /// Render into `writer`, appending to whatever it already holds.
    pub fn with_writer(options: &'o Options, writer: HtmlWriter) -> Self {
        Self { options, writer }
    }

    /// Render `doc` and return the HTML bytes.
    pub fn render(self, doc: &Document) -> Vec<u8> {
        self.render_to_writer(doc).into_vec()
    }

    /// Render `doc` and hand back the writer.
    pub fn render_to_writer(mut self, doc: &Document) -> HtmlWriter {
        doc.walk(&mut self);
        tracing::debug!(bytes = self.writer.len(), "rendered HTML");
        self.writer
    }

    fn sourcepos(&self, doc: &Document, id: NodeId) -> Option<Sourcepos> {
        self.options.source_positions.then(|| doc.sourcepos(id))
    }

    fn write_url(&mut self, url: &[u8]) {
        if self.options.unsafe_raw_html || !is_dangerous_url(url) {
            self.writer.write_escaped_href(url);
        }
    }

    fn write_title(&mut self, title: &[u8]) {
        if !title.is_empty() {
            self.writer.write_str("\" title=\"");
            self.writer.write_escaped_text(title);
        }
    }

    fn write_raw_html(&mut self, literal: &[u8]) {
        if self.options.unsafe_raw_html {
            self.writer.write_bytes(literal);
        } else {
            self.writer.write_str(RAW_HTML_OMITTED);
        }
    }

    /// Image descriptions render as plain text inside `alt`.
    fn write_plain_text(&mut self, doc: &Document, image: NodeId) {
        for id in doc.descendants(image).skip(1) {
            match doc.value(id) {
                NodeValue::Text(text) | NodeValue::Code(text) | NodeValue::HtmlInline(text) => {
                    self.writer.write_escaped_text(text);
                }
                NodeValue::LineBreak(_) => self.writer.write_byte(b' '),
                _ => {}
            }
        }
    }
}

/// Paragraphs directly inside an item of a tight list render without `<p>`.
fn in_tight_list(doc: &Document, paragraph: NodeId) -> bool {
    match doc.parent(paragraph).map(|parent| doc.value(parent)) {
        Some(NodeValue::Item(data)) => data.tight,
        _ => false,
    }
}

impl Visitor for HtmlRenderer<'_> {
    fn visit_start(&mut self, doc: &Document, id: NodeId) -> Visit {
        let sourcepos = self.sourcepos(doc, id);
        match doc.value(id) {
            NodeValue::Document => {}
            NodeValue::BlockQuote => {
                self.writer.cr();
                self.writer.open_tag_nl("blockquote", sourcepos);
            }
            NodeValue::List(list) => {
                self.writer.cr();
                match list.kind {
                    ListKind::Bullet => self.writer.open_tag_nl("ul", sourcepos),
                    ListKind::Ordered => self.writer.ol_start(list.start, sourcepos),
                }
            }
            NodeValue::Item(_) => {
                self.writer.cr();
                self.writer.open_tag("li", sourcepos);
            }
            NodeValue::Heading(heading) => {
                self.writer.cr();
                self.writer.heading_start(heading.level, sourcepos);
            }
            NodeValue::Paragraph => {
                if !in_tight_list(doc, id) {
                    self.writer.cr();
                    self.writer.open_tag("p", sourcepos);
                }
            }
            NodeValue::CodeBlock(code) => {
                self.writer.cr();
                self.writer.code_block(&code.info, &code.literal, sourcepos);
            }
            NodeValue::HtmlBlock(html) => {
                self.writer.cr();
                self.write_raw_html(&html.literal);
                self.writer.cr();
            }
            NodeValue::ThematicBreak => {
                self.writer.cr();
                self.writer.thematic_break(sourcepos);
            }
            NodeValue::Text(text) => self.writer.write_escaped_text(text),
            NodeValue::LineBreak(LineBreak::Hard) => self.writer.line_break(),
            NodeValue::LineBreak(LineBreak::Soft) => {
                if self.options.hard_breaks {
                    self.writer.line_break();
                } else {
                    self.writer.write_byte(b'\n');
                }
            }
            NodeValue::Code(code) => self.writer.inline_code(code),
            NodeValue::HtmlInline(html) => self.write_raw_html(html),
            NodeValue::Emph => self.writer.write_str("<em>"),
            NodeValue::Strong => self.writer.write_str("<strong>"),
            NodeValue::Link(link) => {
                self.writer.write_str("<a href=\"");
                self.write_url(&link.url);
                self.write_title(&link.title);
                self.writer.write_str("\">");
            }
            NodeValue::Image(link) => {
                self.writer.write_str("<img src=\"");
                self.write_url(&link.url);
                self.writer.write_str("\" alt=\"");
                self.write_plain_text(doc, id);
                return Visit::SkipChildren;
            }
        }
        Visit::Children
    }

    fn visit_end(&mut self, doc: &Document, id: NodeId) {
        match doc.value(id) {
            NodeValue::BlockQuote => {
                self.writer.cr();
                self.writer.close_tag_nl("blockquote");
            }
            NodeValue::List(list) => match list.kind {
                ListKind::Bullet => self.writer.close_tag_nl("ul"),
                ListKind::Ordered => self.writer.close_tag_nl("ol"),
            },
            NodeValue::Item(_) => self.writer.close_tag_nl("li"),
            NodeValue::Heading(heading) => self.writer.heading_end(heading.level),
            NodeValue::Paragraph => {
                if !in_tight_list(doc, id) {
                    self.writer.close_tag_nl("p");
                }
            }
            NodeValue::Emph => self.writer.close_tag("em"),
            NodeValue::Strong => self.writer.close_tag("strong"),
            NodeValue::Link(_) => self.writer.close_tag("a"),
            NodeValue::Image(link) => {
                self.write_title(&link.title);
                self.writer.write_str("\" />");
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(input: &str) -> String {
        render_with(input, &Options::default())
    }

    fn render_with(input: &str, options: &Options) -> String {
        let doc = crate::parse(input.as_bytes(), options);
        String::from_utf8(HtmlRenderer::new(options).render(&doc)).unwrap()
    }

    #[test]
    fn test_writer_escaped_text() {
        let mut writer = HtmlWriter::new();
        writer.write_escaped_text(b"<script>");
        assert_eq!(writer.as_bytes(), b"&lt;script&gt;");
    }

    #[test]
    fn test_writer_cr() {
        let mut writer = HtmlWriter::new();
        writer.cr();
        assert!(writer.is_empty());
        writer.write_str("<p>");
        writer.cr();
        writer.cr();
        assert_eq!(writer.as_bytes(), b"<p>\n");
    }

    #[test]
    fn test_writer_heading_levels() {
        for level in 1..=6 {
            let mut writer = HtmlWriter::new();
            writer.heading_start(level, None);
            writer.heading_end(level);
            let expected = format!("<h{level}></h{level}>\n");
            assert_eq!(writer.into_string(), expected);
        }
    }

    #[test]
    fn test_writer_code_block_language() {
        let mut writer = HtmlWriter::new();
        writer.code_block(b"rust ignore", b"a < b\n", None);
        assert_eq!(
            writer.into_string(),
            "<pre><code class=\"language-rust\">a &lt; b\n</code></pre>\n"
        );
    }

    #[test]
    fn test_writer_ol_start() {
        let mut writer = HtmlWriter::new();
        writer.ol_start(5, None);
        writer.ol_start(1, Some(Sourcepos::new(1, 1, 2, 4)));
        assert_eq!(
            writer.into_string(),
            "<ol start=\"5\">\n<ol data-sourcepos=\"1:1-2:4\">\n"
        );
    }

    #[test]
    fn test_write_usize() {
        let mut writer = HtmlWriter::new();
        writer.write_usize(0);
        writer.write_byte(b' ');
        writer.write_usize(1234567890);
        assert_eq!(writer.as_bytes(), b"0 1234567890");
    }

    #[test]
    fn test_into_string_is_lossy() {
        let mut writer = HtmlWriter::new();
        writer.write_bytes(b"a\xFFb");
        assert_eq!(writer.into_string(), "a\u{FFFD}b");
    }

    #[test]
    fn test_blocks() {
        assert_eq!(render("# Hi\n\n---\n\n> q\n"), "<h1>Hi</h1>\n<hr />\n<blockquote>\n<p>q</p>\n</blockquote>\n");
    }

    #[test]
    fn test_tight_list_omits_paragraphs() {
        assert_eq!(render("- a\n- b\n"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
        assert_eq!(
            render("1. a\n\n2. b\n"),
            "<ol>\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_nested_tight_list() {
        assert_eq!(
            render("- a\n  - b\n"),
            "<ul>\n<li>a\n<ul>\n<li>b</li>\n</ul>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_ordered_start() {
        assert_eq!(render("7. x\n"), "<ol start=\"7\">\n<li>x</li>\n</ol>\n");
    }

    #[test]
    fn test_code_blocks() {
        assert_eq!(render("    a\n"), "<pre><code>a\n</code></pre>\n");
        assert_eq!(
            render("```js x\n<b>\n```\n"),
            "<pre><code class=\"language-js\">&lt;b&gt;\n</code></pre>\n"
        );
    }

    #[test]
    fn test_raw_html_omitted_by_default() {
        assert_eq!(render("<div>\nhi\n</div>\n"), "<!-- raw HTML omitted -->\n");
        assert_eq!(render("a <b>c</b>\n"), "<p>a <!-- raw HTML omitted -->c<!-- raw HTML omitted --></p>\n");
    }

    #[test]
    fn test_raw_html_passes_when_unsafe() {
        let options = Options {
            unsafe_raw_html: true,
            ..Options::default()
        };
        assert_eq!(render_with("<div>\nhi\n</div>\n", &options), "<div>\nhi\n</div>\n");
        assert_eq!(render_with("a <b>c</b>\n", &options), "<p>a <b>c</b></p>\n");
    }

    #[test]
    fn test_dangerous_urls() {
        assert_eq!(render("[x](javascript:alert(1))\n"), "<p><a href=\"\">x</a></p>\n");
        assert_eq!(
            render("![x](data:image/png;base64,AAA)\n"),
            "<p><img src=\"data:image/png;base64,AAA\" alt=\"x\" /></p>\n"
        );
    }

    #[test]
    fn test_link_and_image() {
        assert_eq!(
            render("[a *b*](/u \"t&\")\n"),
            "<p><a href=\"/u\" title=\"t&amp;\">a <em>b</em></a></p>\n"
        );
        assert_eq!(
            render("![foo *bar* `c`](/i.png \"t\")\n"),
            "<p><img src=\"/i.png\" alt=\"foo bar c\" title=\"t\" /></p>\n"
        );
    }

    #[test]
    fn test_breaks() {
        assert_eq!(render("a\nb\n"), "<p>a\nb</p>\n");
        assert_eq!(render("a  \nb\n"), "<p>a<br />\nb</p>\n");
        let options = Options {
            hard_breaks: true,
            ..Options::default()
        };
        assert_eq!(render_with("a\nb\n", &options), "<p>a<br />\nb</p>\n");
    }

    #[test]
    fn test_source_positions() {
        let options = Options {
            source_positions: true,
            ..Options::default()
        };
        assert_eq!(
            render_with("# h\n\n- a\n", &options),
            "<h1 data-sourcepos=\"1:1-1:3\">h</h1>\n\
             <ul data-sourcepos=\"3:1-3:3\">\n\
             <li data-sourcepos=\"3:1-3:3\">a</li>\n\
             </ul>\n"
        );
    }
}
