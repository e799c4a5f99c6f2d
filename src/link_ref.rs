//! Link reference definitions.

use crate::cursor::Cursor;
use crate::inline::links::{clean_title, clean_url, is_space_char, scan_link_destination, scan_link_label, scan_link_title};
use rustc_hash::FxHashMap;
use unicode_casefold::UnicodeCaseFold;

/// A link reference definition (URL + title, already unescaped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRefDef {
    pub url: Vec<u8>,
    /// Empty when the definition had no title.
    pub title: Vec<u8>,
}

/// Store of link reference definitions, keyed by normalized label.
#[derive(Debug, Default, Clone)]
pub struct LinkRefStore {
    defs: Vec<LinkRefDef>,
    by_label: FxHashMap<String, usize>,
}

impl LinkRefStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition if its label is new. First definition wins.
    /// Returns false when the label was already defined or normalizes to nothing.
    pub fn insert(&mut self, label: &[u8], def: LinkRefDef) -> bool {
        let Some(key) = normalize_label(label) else {
            return false;
        };
        if self.by_label.contains_key(&key) {
            return false;
        }
        tracing::trace!(label = %key, "link reference defined");
        self.by_label.insert(key, self.defs.len());
        self.defs.push(def);
        true
    }

    /// Find the definition for a raw label as written in a link.
    pub fn lookup(&self, label: &[u8]) -> Option<&LinkRefDef> {
        let key = normalize_label(label)?;
        self.by_label.get(&key).map(|&idx| &self.defs[idx])
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Normalize a link label: Unicode case fold, collapse runs of whitespace
/// to one space, trim. Escapes and entities are kept as written.
///
/// Returns `None` for labels that are empty after normalization.
pub fn normalize_label(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars().case_fold() {
        if ch.is_ascii() && is_space_char(ch as u8) {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }
    if out.is_empty() { None } else { Some(out) }
}

/// Parse one reference definition at the start of `input`.
///
/// On success the definition is added to `store` (unless its label is
/// taken) and the number of bytes consumed, through the end of the line, is
/// returned.
pub fn parse_reference(input: &[u8], store: &mut LinkRefStore) -> Option<usize> {
    let (after_label, label) = scan_link_label(input, 0)?;
    if label.is_empty() {
        return None;
    }
    let mut cursor = Cursor::new_at(input, after_label);
    if !cursor.eat(b':') {
        return None;
    }

    cursor.skip_spnl();
    let (consumed, url) = scan_link_destination(input, cursor.offset())?;
    cursor.advance(consumed);

    let before_title = cursor.offset();
    cursor.skip_spnl();
    let title_len = if cursor.offset() == before_title {
        0
    } else {
        scan_link_title(input, cursor.offset())
    };
    let title = if title_len > 0 {
        let start = cursor.offset();
        cursor.advance(title_len);
        Some(cursor.slice_from(start))
    } else {
        cursor.set_offset(before_title);
        None
    };

    cursor.skip_spaces();
    if !cursor.skip_line_end() {
        if title.is_none() {
            return None;
        }
        // The title may have been a paragraph line; retry without it.
        cursor.set_offset(before_title);
        cursor.skip_spaces();
        if !cursor.skip_line_end() {
            return None;
        }
        store.insert(
            label.slice(input),
            LinkRefDef {
                url: clean_url(url.slice(input)),
                title: Vec::new(),
            },
        );
        return Some(cursor.offset());
    }

    store.insert(
        label.slice(input),
        LinkRefDef {
            url: clean_url(url.slice(input)),
            title: title.map(clean_title).unwrap_or_default(),
        },
    );
    Some(cursor.offset())
}
