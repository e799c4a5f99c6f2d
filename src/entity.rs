//! Entity and numeric character references.

use crate::limits::MAX_ENTITY_NAME_LENGTH;
use entities::ENTITIES;
use memchr::memchr;
use rustc_hash::FxHashMap;
use std::sync::OnceLock;

const REPLACEMENT: char = '\u{FFFD}';

/// Decode a character reference at the start of `input`, which begins just
/// after the `&`. Appends the decoded text to `out` and returns the number
/// of bytes consumed, including the closing `;`.
pub fn decode_entity_into(out: &mut Vec<u8>, input: &[u8]) -> Option<usize> {
    if input.first() == Some(&b'#') {
        return decode_numeric(out, input);
    }
    decode_named(out, input)
}

fn decode_numeric(out: &mut Vec<u8>, input: &[u8]) -> Option<usize> {
    let (digits_start, radix, max_digits) = match input.get(1) {
        Some(b'x' | b'X') => (2, 16, 6),
        Some(b) if b.is_ascii_digit() => (1, 10, 7),
        _ => return None,
    };
    let digits = input[digits_start..]
        .iter()
        .take_while(|b| b.is_ascii_hexdigit() && (radix == 16 || b.is_ascii_digit()))
        .count();
    if digits == 0 || digits > max_digits {
        return None;
    }
    let end = digits_start + digits;
    if input.get(end) != Some(&b';') {
        return None;
    }
    let mut code: u32 = 0;
    for &b in &input[digits_start..end] {
        let digit = (b as char).to_digit(radix)?;
        code = code * radix + digit;
    }
    let ch = match code {
        0 => REPLACEMENT,
        code => char::from_u32(code).unwrap_or(REPLACEMENT),
    };
    push_char(out, ch);
    Some(end + 1)
}

fn decode_named(out: &mut Vec<u8>, input: &[u8]) -> Option<usize> {
    if !input.first()?.is_ascii_alphabetic() {
        return None;
    }
    let len = input
        .iter()
        .take(MAX_ENTITY_NAME_LENGTH + 1)
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if len < 2 || len > MAX_ENTITY_NAME_LENGTH || input.get(len) != Some(&b';') {
        return None;
    }
    let decoded = lookup_named(&input[..len])?;
    out.extend_from_slice(decoded.as_bytes());
    Some(len + 1)
}

/// Characters for an HTML5 entity name written without `&` and `;`.
fn lookup_named(name: &[u8]) -> Option<&'static str> {
    static TABLE: OnceLock<FxHashMap<&'static [u8], &'static str>> = OnceLock::new();
    let table = TABLE.get_or_init(|| {
        ENTITIES
            .iter()
            .filter_map(|entity| {
                // Legacy forms without the semicolon are not valid in Markdown.
                let name = entity.entity.strip_prefix('&')?.strip_suffix(';')?;
                Some((name.as_bytes(), entity.characters))
            })
            .collect()
    });
    table.get(name).copied()
}

fn push_char(out: &mut Vec<u8>, ch: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
}

/// Replace every valid character reference in `input`.
pub fn decode_entities_into(out: &mut Vec<u8>, input: &[u8]) {
    let mut i = 0;
    while let Some(offset) = memchr(b'&', &input[i..]) {
        let amp = i + offset;
        out.extend_from_slice(&input[i..amp]);
        match decode_entity_into(out, &input[amp + 1..]) {
            Some(consumed) => i = amp + 1 + consumed,
            None => {
                out.push(b'&');
                i = amp + 1;
            }
        }
    }
    out.extend_from_slice(&input[i..]);
}

pub fn decode_entities(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    decode_entities_into(&mut out, input);
    out
}
