//! Block-level parser for Markdown.
//!
//! The block parser is line-oriented and builds the container structure of
//! the document:
//! - Block quotes, lists and list items
//! - Thematic breaks
//! - ATX and setext headings
//! - Fenced and indented code blocks
//! - HTML blocks
//! - Paragraphs, with link reference definitions extracted
//!
//! Paragraph and heading text is kept aside and handed to the inline parser
//! once every reference definition in the document is known.

mod html;
mod parser;
mod scan;

pub use parser::BlockParser;
