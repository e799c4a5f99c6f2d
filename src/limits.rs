//! Bounds on constructs whose scanning could otherwise go superlinear.

/// Longest input parsed, in bytes. The rest is dropped so that repaired
/// offsets and node ids stay within `u32`.
pub const MAX_INPUT_LEN: usize = 512 << 20;

/// Maximum nesting depth of lists. Deeper markers are read as paragraph text.
pub const MAX_LIST_DEPTH: usize = 100;

/// Longest backtick run tracked for code span matching.
/// Longer runs never open a code span.
pub const MAX_CODE_SPAN_BACKTICKS: usize = 1000;

/// Maximum unbalanced parentheses inside a bare link destination.
pub const MAX_LINK_PAREN_DEPTH: usize = 32;

/// Maximum digits in an ordered list marker.
pub const MAX_LIST_MARKER_DIGITS: usize = 9;

/// Maximum characters between the brackets of a link label.
pub const MAX_LINK_LABEL_LENGTH: usize = 999;

/// Longest entity name considered for `&name;`.
pub const MAX_ENTITY_NAME_LENGTH: usize = 32;

/// Maximum length of an autolink URI scheme.
pub const MAX_URI_SCHEME_LENGTH: usize = 32;
