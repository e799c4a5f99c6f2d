//! Delimiter and bracket stacks.
//!
//! Delimiter runs live in a `Vec` and are chained through `prev`/`next`
//! indices, so removal is O(1) and indices stay stable. A removed entry is
//! left in place as a tombstone; entries above a stack bottom are dropped
//! wholesale once emphasis for that bottom has been processed.

use crate::tree::NodeId;
use unicode_categories::UnicodeCategories;

/// A run of `*`, `_`, `'` or `"` that may open or close.
#[derive(Debug, Clone, Copy)]
pub struct Delimiter {
    pub ch: u8,
    /// Run length as scanned; matching rules look at this, not at what is left.
    pub length: usize,
    pub can_open: bool,
    pub can_close: bool,
    /// Text node holding the run.
    pub node: NodeId,
    prev: Option<usize>,
    next: Option<usize>,
    removed: bool,
}

#[derive(Debug, Default)]
pub struct DelimiterStack {
    entries: Vec<Delimiter>,
    last: Option<usize>,
}

impl DelimiterStack {
    /// Index the next pushed entry will get.
    #[inline]
    pub fn height(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, ch: u8, length: usize, can_open: bool, can_close: bool, node: NodeId) -> usize {
        let idx = self.entries.len();
        if let Some(last) = self.last {
            self.entries[last].next = Some(idx);
        }
        self.entries.push(Delimiter {
            ch,
            length,
            can_open,
            can_close,
            node,
            prev: self.last,
            next: None,
            removed: false,
        });
        self.last = Some(idx);
        idx
    }

    #[inline]
    pub fn get(&self, idx: usize) -> &Delimiter {
        &self.entries[idx]
    }

    #[inline]
    pub fn prev(&self, idx: usize) -> Option<usize> {
        self.entries[idx].prev
    }

    #[inline]
    pub fn next(&self, idx: usize) -> Option<usize> {
        self.entries[idx].next
    }

    /// Unlink an entry.
    pub fn remove(&mut self, idx: usize) {
        let Delimiter { prev, next, removed, .. } = self.entries[idx];
        if removed {
            return;
        }
        if let Some(p) = prev {
            self.entries[p].next = next;
        }
        match next {
            Some(n) => self.entries[n].prev = prev,
            None => self.last = prev,
        }
        let entry = &mut self.entries[idx];
        entry.removed = true;
        entry.prev = None;
        entry.next = None;
    }

    /// Lowest live entry at or above `bottom`.
    pub fn first_above(&self, bottom: usize) -> Option<usize> {
        let mut candidate = None;
        let mut cursor = self.last;
        while let Some(idx) = cursor {
            if idx < bottom {
                break;
            }
            candidate = Some(idx);
            cursor = self.entries[idx].prev;
        }
        candidate
    }

    /// Drop every entry at or above `bottom`.
    pub fn truncate(&mut self, bottom: usize) {
        let mut cursor = self.last;
        while let Some(idx) = cursor {
            if idx < bottom {
                break;
            }
            cursor = self.entries[idx].prev;
        }
        self.last = cursor;
        if let Some(last) = cursor {
            self.entries[last].next = None;
        }
        self.entries.truncate(bottom.min(self.entries.len()));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last = None;
    }
}

/// An unmatched `[` or `![`.
#[derive(Debug, Clone, Copy)]
pub struct Bracket {
    /// Text node holding `[` or `![`.
    pub node: NodeId,
    /// Subject offset just past the opening bracket.
    pub position: usize,
    pub image: bool,
    /// Cleared once a link closes around it; links cannot nest.
    pub active: bool,
    /// Another bracket was opened after this one.
    pub bracket_after: bool,
    /// Delimiter stack height when the bracket was pushed.
    pub delimiter_bottom: usize,
}

/// Unicode whitespace for flanking: space separators plus tab, LF, FF and CR.
#[inline]
pub fn is_flanking_space(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r') || c.is_separator_space()
}

/// Unicode punctuation for flanking: general categories P and S.
#[inline]
pub fn is_flanking_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || c.is_punctuation() || c.is_symbol()
}

/// Decide whether a delimiter run can open and close, given the characters
/// on either side. Start and end of input count as a newline.
pub fn classify(ch: u8, before: char, after: char) -> (bool, bool) {
    let left_flanking = !is_flanking_space(after)
        && (!is_flanking_punctuation(after) || is_flanking_space(before) || is_flanking_punctuation(before));
    let right_flanking = !is_flanking_space(before)
        && (!is_flanking_punctuation(before) || is_flanking_space(after) || is_flanking_punctuation(after));
    match ch {
        b'_' => (
            left_flanking && (!right_flanking || is_flanking_punctuation(before)),
            right_flanking && (!left_flanking || is_flanking_punctuation(after)),
        ),
        b'\'' | b'"' => (left_flanking && !right_flanking && before != ']' && before != ')', right_flanking),
        _ => (left_flanking, right_flanking),
    }
}
