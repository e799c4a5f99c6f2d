//! HTML and URL escaping, plus backslash unescaping.
//!
//! Fast-path optimized: scans for the first escapable byte, then bulk-copies
//! the segments between escapes.

use memchr::{memchr, memchr3};

/// Bytes that need escaping in HTML text and attribute values.
const TEXT_ESCAPE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'&' as usize] = true;
    table[b'"' as usize] = true;
    table
};

/// Bytes that may appear unencoded in an `href`.
const HREF_SAFE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    let mut b = 0;
    while b < 256 {
        table[b] = (b as u8).is_ascii_alphanumeric();
        b += 1;
    }
    let safe = b"-_.+!*(),%#@?=;:/$~&'";
    let mut i = 0;
    while i < safe.len() {
        table[safe[i] as usize] = true;
        i += 1;
    }
    table
};

/// Escape `&`, `<`, `>` and `"` into `out`.
///
/// # Example
/// ```
/// use marktree::escape::escape_text_into;
///
/// let mut out = Vec::new();
/// escape_text_into(&mut out, b"<a href=\"x\">");
/// assert_eq!(out, b"&lt;a href=&quot;x&quot;&gt;");
/// ```
#[inline]
pub fn escape_text_into(out: &mut Vec<u8>, input: &[u8]) {
    let mut pos = match first_text_escape(input) {
        Some(p) => p,
        None => {
            out.extend_from_slice(input);
            return;
        }
    };
    out.extend_from_slice(&input[..pos]);

    while pos < input.len() {
        let scan_start = pos;
        while pos < input.len() && !TEXT_ESCAPE_TABLE[input[pos] as usize] {
            pos += 1;
        }
        if pos > scan_start {
            out.extend_from_slice(&input[scan_start..pos]);
        }
        if pos < input.len() {
            let escape_seq: &[u8] = match input[pos] {
                b'<' => b"&lt;",
                b'>' => b"&gt;",
                b'&' => b"&amp;",
                _ => b"&quot;",
            };
            out.extend_from_slice(escape_seq);
            pos += 1;
        }
    }
}

#[inline]
fn first_text_escape(input: &[u8]) -> Option<usize> {
    match (memchr3(b'<', b'>', b'&', input), memchr(b'"', input)) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Write a URL for an `href` or `src` attribute.
///
/// Unsafe bytes are percent-encoded, `&` and `'` become entities, and
/// existing `%XX` sequences pass through unchanged.
pub fn escape_href_into(out: &mut Vec<u8>, input: &[u8]) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut i = 0;
    while i < input.len() {
        let start = i;
        while i < input.len() && HREF_SAFE_TABLE[input[i] as usize] && input[i] != b'&' && input[i] != b'\'' {
            i += 1;
        }
        out.extend_from_slice(&input[start..i]);
        if i >= input.len() {
            break;
        }
        match input[i] {
            b'&' => out.extend_from_slice(b"&amp;"),
            b'\'' => out.extend_from_slice(b"&#x27;"),
            b => {
                out.push(b'%');
                out.push(HEX[(b >> 4) as usize]);
                out.push(HEX[(b & 0xF) as usize]);
            }
        }
        i += 1;
    }
}

/// Whether `b` can be backslash-escaped.
#[inline]
pub fn is_ascii_punctuation(b: u8) -> bool {
    b.is_ascii_punctuation()
}

/// Drop backslashes that escape ASCII punctuation.
pub fn unescape_into(out: &mut Vec<u8>, input: &[u8]) {
    let mut i = 0;
    while i < input.len() {
        let Some(offset) = memchr(b'\\', &input[i..]) else {
            out.extend_from_slice(&input[i..]);
            return;
        };
        let slash = i + offset;
        out.extend_from_slice(&input[i..slash]);
        match input.get(slash + 1) {
            Some(&next) if is_ascii_punctuation(next) => {
                out.push(next);
                i = slash + 2;
            }
            _ => {
                out.push(b'\\');
                i = slash + 1;
            }
        }
    }
}

/// Whether a URL should be blanked out when raw HTML is not allowed.
///
/// `javascript:`, `vbscript:` and `file:` are always rejected; `data:` only
/// passes for PNG, GIF, JPEG and WebP images. Comparison ignores case.
pub fn is_dangerous_url(url: &[u8]) -> bool {
    const SAFE_DATA: [&[u8]; 4] = [b"image/png", b"image/gif", b"image/jpeg", b"image/webp"];

    if starts_with_ignore_case(url, b"data:") {
        let rest = &url[5..];
        return !SAFE_DATA.iter().any(|kind| starts_with_ignore_case(rest, kind));
    }
    [&b"javascript:"[..], b"vbscript:", b"file:"]
        .iter()
        .any(|scheme| starts_with_ignore_case(url, scheme))
}

#[inline]
pub fn starts_with_ignore_case(haystack: &[u8], prefix: &[u8]) -> bool {
    haystack.len() >= prefix.len() && haystack[..prefix.len()].eq_ignore_ascii_case(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escape_text(input: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        escape_text_into(&mut out, input);
        out
    }

    fn href(input: &[u8]) -> String {
        let mut out = Vec::new();
        escape_href_into(&mut out, input);
        String::from_utf8(out).unwrap()
    }

    fn unescape(input: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        unescape_into(&mut out, input);
        out
    }

    #[test]
    fn test_escape_text_basic() {
        assert_eq!(escape_text(b"Hello, World!"), b"Hello, World!");
        assert_eq!(escape_text(b""), b"");
    }

    #[test]
    fn test_escape_text_mixed() {
        assert_eq!(
            escape_text(b"<a href=\"test\">link & stuff</a>"),
            b"&lt;a href=&quot;test&quot;&gt;link &amp; stuff&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_text_leaves_single_quote() {
        assert_eq!(escape_text(b"it's"), b"it's");
    }

    #[test]
    fn test_escape_at_boundaries() {
        assert_eq!(escape_text(b"<"), b"&lt;");
        assert_eq!(escape_text(b"hello<"), b"hello&lt;");
        assert_eq!(escape_text(b"<<<"), b"&lt;&lt;&lt;");
    }

    #[test]
    fn test_href_percent_encodes() {
        assert_eq!(href(b"/my uri"), "/my%20uri");
        assert_eq!(href("föö".as_bytes()), "f%C3%B6%C3%B6");
        assert_eq!(href(b"a\\b"), "a%5Cb");
        assert_eq!(href(b"[x]"), "%5Bx%5D");
    }

    #[test]
    fn test_href_keeps_safe_bytes() {
        assert_eq!(href(b"https://x.org/a?b=c;d#e"), "https://x.org/a?b=c;d#e");
        assert_eq!(href(b"%20already"), "%20already");
    }

    #[test]
    fn test_href_entities() {
        assert_eq!(href(b"?a=1&b='2'"), "?a=1&amp;b=&#x27;2&#x27;");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(b"\\*foo\\*"), b"*foo*");
        assert_eq!(unescape(b"\\a\\"), b"\\a\\");
        assert_eq!(unescape(b"\\\\"), b"\\");
    }

    #[test]
    fn test_dangerous_urls() {
        assert!(is_dangerous_url(b"javascript:alert(1)"));
        assert!(is_dangerous_url(b"JAVASCRIPT:alert(1)"));
        assert!(is_dangerous_url(b"vbscript:x"));
        assert!(is_dangerous_url(b"file:///etc/passwd"));
        assert!(is_dangerous_url(b"data:text/html;base64,xx"));
        assert!(!is_dangerous_url(b"data:image/png;base64,xx"));
        assert!(!is_dangerous_url(b"https://example.com"));
        assert!(!is_dangerous_url(b"/javascript:"));
    }
}
