//! Raw HTML recognition: tags, comments, processing instructions,
//! declarations and CDATA sections.

use memchr::memmem;

#[inline]
fn is_html_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

fn skip_html_space(input: &[u8], mut i: usize) -> usize {
    while input.get(i).is_some_and(|&b| is_html_space(b)) {
        i += 1;
    }
    i
}

/// Length of the raw HTML construct starting with the `<` at `pos`.
pub(crate) fn scan_html_tag(input: &[u8], pos: usize) -> Option<usize> {
    if input.get(pos) != Some(&b'<') {
        return None;
    }
    let start = pos + 1;
    let end = match *input.get(start)? {
        b'!' => scan_bang(input, start + 1)?,
        b'?' => memmem::find(&input[start + 1..], b"?>").map(|i| start + 1 + i + 2)?,
        b'/' => scan_closing_tag(input, start + 1)?,
        b if b.is_ascii_alphabetic() => scan_open_tag(input, start)?,
        _ => return None,
    };
    Some(end - pos)
}

/// After `<!`: comment, CDATA section or declaration.
fn scan_bang(input: &[u8], i: usize) -> Option<usize> {
    let rest = &input[i..];
    if let Some(body) = rest.strip_prefix(b"--") {
        if body.starts_with(b">") {
            return Some(i + 3);
        }
        if body.starts_with(b"->") {
            return Some(i + 4);
        }
        return memmem::find(body, b"-->").map(|j| i + 2 + j + 3);
    }
    if let Some(body) = rest.strip_prefix(b"[CDATA[") {
        return memmem::find(body, b"]]>").map(|j| i + 7 + j + 3);
    }
    if rest.first()?.is_ascii_alphabetic() {
        return memchr::memchr(b'>', rest).map(|j| i + j + 1);
    }
    None
}

/// Offset just past a tag name starting at `i`.
pub(crate) fn scan_tag_name(input: &[u8], i: usize) -> Option<usize> {
    if !input.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    let mut end = i + 1;
    while input.get(end).is_some_and(|&b| b.is_ascii_alphanumeric() || b == b'-') {
        end += 1;
    }
    Some(end)
}

/// Open tag whose name starts at `i`. Returns the offset past `>`.
pub(crate) fn scan_open_tag(input: &[u8], i: usize) -> Option<usize> {
    let mut i = scan_tag_name(input, i)?;
    loop {
        let after_space = skip_html_space(input, i);
        if after_space == i {
            break;
        }
        match scan_attribute(input, after_space) {
            Some(end) => i = end,
            None => {
                i = after_space;
                break;
            }
        }
    }
    if input.get(i) == Some(&b'/') {
        i += 1;
    }
    (input.get(i) == Some(&b'>')).then_some(i + 1)
}

/// Closing tag whose name starts at `i` (after `</`).
pub(crate) fn scan_closing_tag(input: &[u8], i: usize) -> Option<usize> {
    let i = skip_html_space(input, scan_tag_name(input, i)?);
    (input.get(i) == Some(&b'>')).then_some(i + 1)
}

fn scan_attribute(input: &[u8], i: usize) -> Option<usize> {
    let first = *input.get(i)?;
    if !(first.is_ascii_alphabetic() || first == b'_' || first == b':') {
        return None;
    }
    let mut end = i + 1;
    while input
        .get(end)
        .is_some_and(|&b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b':' | b'-'))
    {
        end += 1;
    }
    let eq = skip_html_space(input, end);
    if input.get(eq) != Some(&b'=') {
        return Some(end);
    }
    let value = skip_html_space(input, eq + 1);
    match input.get(value)? {
        &quote @ (b'"' | b'\'') => {
            let close = memchr::memchr(quote, &input[value + 1..])?;
            Some(value + 1 + close + 1)
        }
        _ => {
            let len = input[value..]
                .iter()
                .take_while(|&&b| !is_html_space(b) && !b"\"'=<>`".contains(&b))
                .count();
            (len > 0).then_some(value + len)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(input: &str) -> Option<usize> {
        scan_html_tag(input.as_bytes(), 0)
    }

    #[test]
    fn test_open_tags() {
        assert_eq!(tag("<a>"), Some(3));
        assert_eq!(tag("<bab/>x"), Some(6));
        assert_eq!(tag("<a  /><b2\ndata=\"foo\" >"), Some(6));
        assert_eq!(tag("<a foo=\"bar\" bam = 'baz <em>\"</em>'\n_boolean zoop:33=zoop:33 />"), Some(63));
        assert_eq!(tag("<Foo bar=baz>"), Some(13));
    }

    #[test]
    fn test_invalid_open_tags() {
        assert_eq!(tag("<33>"), None);
        assert_eq!(tag("<__>"), None);
        assert_eq!(tag("<a h*#ref=\"hi\">"), None);
        assert_eq!(tag("<a href=\"hi'>"), None);
        assert_eq!(tag("<a href='bar'title=title>"), None);
        assert_eq!(tag("< a>"), None);
    }

    #[test]
    fn test_closing_tags() {
        assert_eq!(tag("</a>"), Some(4));
        assert_eq!(tag("</foo >"), Some(7));
        assert_eq!(tag("</a href=\"foo\">"), None);
    }

    #[test]
    fn test_comments() {
        assert_eq!(tag("<!-- x -->y"), Some(10));
        assert_eq!(tag("<!-->"), Some(5));
        assert_eq!(tag("<!--->"), Some(6));
        assert_eq!(tag("<!-- open"), None);
    }

    #[test]
    fn test_other_constructs() {
        assert_eq!(tag("<?php echo $a; ?>"), Some(17));
        assert_eq!(tag("<!ELEMENT br EMPTY>"), Some(19));
        assert_eq!(tag("<![CDATA[>&<]]>"), Some(15));
        assert_eq!(tag("<!>"), None);
    }
}
