//! Scanners for link syntax.
//!
//! Covers destinations, titles and labels, shared by inline links and
//! link reference definitions, plus URI and email autolinks. Every scanner
//! takes the whole subject and a start offset and never allocates.

use crate::entity::decode_entities_into;
use crate::escape::{is_ascii_punctuation, unescape_into};
use crate::limits::{MAX_LINK_LABEL_LENGTH, MAX_LINK_PAREN_DEPTH, MAX_URI_SCHEME_LENGTH};
use crate::Range;

#[inline]
pub(crate) fn is_space_char(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Count whitespace bytes (line endings included) starting at `pos`.
pub(crate) fn scan_spacechars(input: &[u8], pos: usize) -> usize {
    input.get(pos..).map_or(0, |rest| rest.iter().take_while(|&&b| is_space_char(b)).count())
}

/// Scan a link destination at `pos`.
///
/// Returns the bytes consumed and the range of the destination itself, which
/// excludes the angle brackets of the `<...>` form.
pub(crate) fn scan_link_destination(input: &[u8], pos: usize) -> Option<(usize, Range)> {
    if input.get(pos) != Some(&b'<') {
        return scan_bare_destination(input, pos);
    }
    let mut i = pos + 1;
    while i < input.len() {
        match input[i] {
            b'>' => {
                i += 1;
                break;
            }
            b'\\' => i += 2,
            b'\n' | b'<' => return None,
            _ => i += 1,
        }
    }
    if i >= input.len() {
        return None;
    }
    Some((i - pos, Range::from_usize(pos + 1, i - 1)))
}

fn scan_bare_destination(input: &[u8], pos: usize) -> Option<(usize, Range)> {
    let mut i = pos;
    let mut depth = 0usize;
    while i < input.len() {
        let b = input[i];
        if b == b'\\' && input.get(i + 1).is_some_and(|&n| is_ascii_punctuation(n)) {
            i += 2;
        } else if b == b'(' {
            depth += 1;
            i += 1;
            if depth > MAX_LINK_PAREN_DEPTH {
                return None;
            }
        } else if b == b')' {
            if depth == 0 {
                break;
            }
            depth -= 1;
            i += 1;
        } else if is_space_char(b) || b.is_ascii_control() {
            if i == pos {
                return None;
            }
            break;
        } else {
            i += 1;
        }
    }
    if i >= input.len() || depth != 0 {
        return None;
    }
    Some((i - pos, Range::from_usize(pos, i)))
}

/// Length of a link title at `pos`, delimiters included; 0 when there is none.
pub(crate) fn scan_link_title(input: &[u8], pos: usize) -> usize {
    let (open, close) = match input.get(pos) {
        Some(b'"') => (b'"', b'"'),
        Some(b'\'') => (b'\'', b'\''),
        Some(b'(') => (b'(', b')'),
        _ => return 0,
    };
    let mut i = pos + 1;
    while i < input.len() {
        let b = input[i];
        if b == b'\\' && input.get(i + 1).is_some_and(|&n| is_ascii_punctuation(n)) {
            i += 2;
            continue;
        }
        if b == close {
            return i + 1 - pos;
        }
        if open == b'(' && b == b'(' {
            return 0;
        }
        i += 1;
    }
    0
}

/// Scan a `[label]` at `pos`.
///
/// Returns the offset just past `]` and the trimmed label between the
/// brackets. Fails on an unescaped `[` or a label longer than
/// [`MAX_LINK_LABEL_LENGTH`].
pub(crate) fn scan_link_label(input: &[u8], pos: usize) -> Option<(usize, Range)> {
    if input.get(pos) != Some(&b'[') {
        return None;
    }
    let mut i = pos + 1;
    let mut length = 0;
    loop {
        match input.get(i) {
            None | Some(b'[') => return None,
            Some(b']') => break,
            Some(b'\\') => {
                i += 1;
                length += 1;
                if input.get(i).is_some_and(|&n| is_ascii_punctuation(n)) {
                    i += 1;
                    length += 1;
                }
            }
            Some(_) => {
                i += 1;
                length += 1;
            }
        }
        if length > MAX_LINK_LABEL_LENGTH {
            return None;
        }
    }
    let (start, end) = trim_range(input, pos + 1, i);
    Some((i + 1, Range::from_usize(start, end)))
}

fn trim_range(input: &[u8], mut start: usize, mut end: usize) -> (usize, usize) {
    while start < end && is_space_char(input[start]) {
        start += 1;
    }
    while end > start && is_space_char(input[end - 1]) {
        end -= 1;
    }
    (start, end)
}

fn trim(bytes: &[u8]) -> &[u8] {
    let (start, end) = trim_range(bytes, 0, bytes.len());
    &bytes[start..end]
}

/// Scan a URI autolink whose `<` sits just before `pos`.
/// Returns the length up to and including `>`.
pub(crate) fn scan_autolink_uri(input: &[u8], pos: usize) -> Option<usize> {
    let rest = input.get(pos..)?;
    if !rest.first()?.is_ascii_alphabetic() {
        return None;
    }
    let scheme = 1 + rest[1..]
        .iter()
        .take(MAX_URI_SCHEME_LENGTH)
        .take_while(|&&b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'+' | b'-'))
        .count();
    if !(2..=MAX_URI_SCHEME_LENGTH).contains(&scheme) || rest.get(scheme) != Some(&b':') {
        return None;
    }
    let mut i = scheme + 1;
    while let Some(&b) = rest.get(i) {
        match b {
            b'>' => return Some(i + 1),
            b'<' => return None,
            b if b <= 0x20 => return None,
            _ => i += 1,
        }
    }
    None
}

/// Scan an email autolink whose `<` sits just before `pos`.
/// Returns the length up to and including `>`.
pub(crate) fn scan_autolink_email(input: &[u8], pos: usize) -> Option<usize> {
    let rest = input.get(pos..)?;
    let local = rest
        .iter()
        .take_while(|&&b| b.is_ascii_alphanumeric() || b".!#$%&'*+/=?^_`{|}~-".contains(&b))
        .count();
    if local == 0 || rest.get(local) != Some(&b'@') {
        return None;
    }
    let mut i = local + 1;
    loop {
        let label = rest[i..]
            .iter()
            .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'-')
            .count();
        if label == 0 || label > 63 || rest[i] == b'-' || rest[i + label - 1] == b'-' {
            return None;
        }
        i += label;
        match rest.get(i) {
            Some(b'.') => i += 1,
            Some(b'>') => return Some(i + 1),
            _ => return None,
        }
    }
}

/// Resolve a raw destination: trim it, then decode entities and escapes.
pub(crate) fn clean_url(raw: &[u8]) -> Vec<u8> {
    let raw = trim(raw);
    if raw.is_empty() {
        return Vec::new();
    }
    let mut decoded = Vec::with_capacity(raw.len());
    decode_entities_into(&mut decoded, raw);
    let mut out = Vec::with_capacity(decoded.len());
    unescape_into(&mut out, &decoded);
    out
}

/// Resolve a raw title: strip its delimiters, then decode entities and escapes.
pub(crate) fn clean_title(raw: &[u8]) -> Vec<u8> {
    let inner = match (raw.first(), raw.last()) {
        (Some(b'"'), Some(b'"')) | (Some(b'\''), Some(b'\'')) | (Some(b'('), Some(b')')) if raw.len() >= 2 => {
            &raw[1..raw.len() - 1]
        }
        _ => raw,
    };
    let mut decoded = Vec::with_capacity(inner.len());
    decode_entities_into(&mut decoded, inner);
    let mut out = Vec::with_capacity(decoded.len());
    unescape_into(&mut out, &decoded);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest(input: &[u8]) -> Option<(usize, &[u8])> {
        scan_link_destination(input, 0).map(|(n, r)| (n, r.slice(input)))
    }

    #[test]
    fn test_bare_destination() {
        assert_eq!(dest(b"/url)"), Some((4, &b"/url"[..])));
        assert_eq!(dest(b"a(b)c )"), Some((5, &b"a(b)c"[..])));
        assert_eq!(dest(b"a\\)b)"), Some((4, &b"a\\)b"[..])));
        assert_eq!(dest(b")"), Some((0, &b""[..])));
    }

    #[test]
    fn test_bare_destination_failures() {
        assert_eq!(dest(b"(unbalanced)"), None);
        assert_eq!(dest(b"a(b)"), None);
        assert_eq!(dest(b" x)"), None);
    }

    #[test]
    fn test_bare_destination_paren_limit() {
        let mut deep = vec![b'('; MAX_LINK_PAREN_DEPTH + 1];
        deep.extend(vec![b')'; MAX_LINK_PAREN_DEPTH + 2]);
        assert_eq!(dest(&deep), None);
    }

    #[test]
    fn test_pointy_destination() {
        assert_eq!(dest(b"<my url>)"), Some((8, &b"my url"[..])));
        assert_eq!(dest(b"<>)"), Some((2, &b""[..])));
        assert_eq!(dest(b"<a\nb>)"), None);
        assert_eq!(dest(b"<a<b>)"), None);
    }

    #[test]
    fn test_titles() {
        assert_eq!(scan_link_title(b"\"ti\\\"tle\")", 0), 9);
        assert_eq!(scan_link_title(b"'x')", 0), 3);
        assert_eq!(scan_link_title(b"(x)", 0), 3);
        assert_eq!(scan_link_title(b"(x(y))", 0), 0);
        assert_eq!(scan_link_title(b"\"open", 0), 0);
        assert_eq!(scan_link_title(b"x", 0), 0);
    }

    #[test]
    fn test_labels() {
        let input = b"[ Foo  bar ]: x";
        let (end, label) = scan_link_label(input, 0).unwrap();
        assert_eq!(end, 12);
        assert_eq!(label.slice(input), b"Foo  bar");
        assert!(scan_link_label(b"[a[b]", 0).is_none());
        assert!(scan_link_label(b"[a\\]b]", 0).is_some());
        assert!(scan_link_label(b"[open", 0).is_none());
    }

    #[test]
    fn test_label_length_limit() {
        let mut long = vec![b'['];
        long.extend(vec![b'a'; MAX_LINK_LABEL_LENGTH + 1]);
        long.push(b']');
        assert!(scan_link_label(&long, 0).is_none());
    }

    #[test]
    fn test_uri_autolinks() {
        assert_eq!(scan_autolink_uri(b"http://foo.bar>", 0), Some(15));
        assert_eq!(scan_autolink_uri(b"a+b:c>", 0), Some(6));
        assert_eq!(scan_autolink_uri(b"m:abc>", 0), None);
        assert_eq!(scan_autolink_uri(b"http://a b>", 0), None);
        assert_eq!(scan_autolink_uri(b"foo.bar.baz>", 0), None);
    }

    #[test]
    fn test_email_autolinks() {
        assert_eq!(scan_autolink_email(b"foo@bar.example.com>", 0), Some(20));
        assert_eq!(scan_autolink_email(b"foo+special@Bar.baz-bar0.com>", 0), Some(29));
        assert_eq!(scan_autolink_email(b"foo\\+@bar.example.com>", 0), None);
        assert_eq!(scan_autolink_email(b"a@-b.com>", 0), None);
    }

    #[test]
    fn test_clean_url_and_title() {
        assert_eq!(clean_url(b"  /f&ouml;\\*  "), "/fö*".as_bytes());
        assert_eq!(clean_title(b"\"a \\\"b\\\" &amp;\""), b"a \"b\" &");
        assert_eq!(clean_title(b"(paren)"), b"paren");
    }
}
