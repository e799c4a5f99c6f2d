//! Emphasis, strong emphasis and smart quote resolution.
//!
//! Walks closers left to right and searches backwards for an opener of the
//! same character. Failed searches raise a per-class floor ("openers
//! bottom") so the same openers are never scanned twice for closers of that
//! class, keeping the pass linear.

use super::smart::{LEFT_DOUBLE_QUOTE, LEFT_SINGLE_QUOTE, RIGHT_DOUBLE_QUOTE, RIGHT_SINGLE_QUOTE};
use super::Subject;
use crate::tree::{NodeId, NodeValue, Sourcepos};

/// Row of the openers-bottom table for a delimiter character.
fn char_class(ch: u8) -> usize {
    match ch {
        b'*' => 0,
        b'_' => 1,
        b'\'' => 2,
        _ => 3,
    }
}

impl Subject<'_> {
    /// Resolve every delimiter at or above `bottom`, then drop them.
    pub(super) fn process_emphasis(&mut self, bottom: usize) {
        // Indexed by character, then by closer length % 3 and whether it can open.
        let mut openers_bottom = [[bottom; 6]; 4];

        let mut closer = self.delimiters.first_above(bottom);
        while let Some(c) = closer {
            let close = *self.delimiters.get(c);
            if !close.can_close {
                closer = self.delimiters.next(c);
                continue;
            }

            let row = char_class(close.ch);
            let column = close.length % 3 + if close.can_open { 3 } else { 0 };
            let floor = openers_bottom[row][column];

            let mut found = None;
            let mut candidate = self.delimiters.prev(c);
            while let Some(o) = candidate {
                if o < bottom || o < floor {
                    break;
                }
                let open = self.delimiters.get(o);
                if open.ch == close.ch && open.can_open {
                    // A run that can both open and close only pairs with
                    // another if their combined length is not a multiple of
                    // three, unless both lengths are.
                    let odd_match = (close.can_open || open.can_close)
                        && close.length % 3 != 0
                        && (open.length + close.length) % 3 == 0;
                    if !odd_match {
                        found = Some(o);
                        break;
                    }
                }
                candidate = self.delimiters.prev(o);
            }

            let next = self.delimiters.next(c);
            match close.ch {
                b'*' | b'_' => {
                    closer = match found {
                        Some(o) => self.insert_emphasis(o, c),
                        None => next,
                    };
                }
                quote => {
                    let (left, right) = if quote == b'\'' {
                        (LEFT_SINGLE_QUOTE, RIGHT_SINGLE_QUOTE)
                    } else {
                        (LEFT_DOUBLE_QUOTE, RIGHT_DOUBLE_QUOTE)
                    };
                    self.set_text(close.node, right);
                    if let Some(o) = found {
                        let open_node = self.delimiters.get(o).node;
                        self.set_text(open_node, left);
                        self.delimiters.remove(o);
                        self.delimiters.remove(c);
                    }
                    closer = next;
                }
            }

            if found.is_none() {
                openers_bottom[row][column] = c;
                if !close.can_open {
                    self.delimiters.remove(c);
                }
            }
        }

        self.delimiters.truncate(bottom);
    }

    /// Wrap the nodes between an opener and a closer in `Emph` or `Strong`.
    /// Returns the closer to continue with.
    fn insert_emphasis(&mut self, o: usize, c: usize) -> Option<usize> {
        let opener = *self.delimiters.get(o);
        let closer = *self.delimiters.get(c);
        let opener_chars = self.text_len(opener.node);
        let closer_chars = self.text_len(closer.node);
        let used = if opener_chars >= 2 && closer_chars >= 2 { 2 } else { 1 };
        self.shrink_text(opener.node, used);
        self.shrink_text(closer.node, used);

        // Delimiters between the pair can no longer match anything.
        let mut between = self.delimiters.prev(c);
        while let Some(d) = between {
            if d == o {
                break;
            }
            between = self.delimiters.prev(d);
            self.delimiters.remove(d);
        }

        let value = if used == 1 { NodeValue::Emph } else { NodeValue::Strong };
        let emph = self.doc.alloc(value, Sourcepos::default());
        let mut child = self.doc.next_sibling(opener.node);
        while let Some(current) = child {
            if current == closer.node {
                break;
            }
            child = self.doc.next_sibling(current);
            self.doc.append_child(emph, current);
        }
        self.doc.insert_after(opener.node, emph);

        if opener_chars == used {
            self.doc.detach(opener.node);
            self.delimiters.remove(o);
        }
        if closer_chars == used {
            self.doc.detach(closer.node);
            let next = self.delimiters.next(c);
            self.delimiters.remove(c);
            next
        } else {
            Some(c)
        }
    }

    fn text_len(&self, node: NodeId) -> usize {
        match self.doc.value(node) {
            NodeValue::Text(text) => text.len(),
            _ => 0,
        }
    }

    fn shrink_text(&mut self, node: NodeId, by: usize) {
        if let NodeValue::Text(text) = self.doc.value_mut(node) {
            let keep = text.len().saturating_sub(by);
            text.truncate(keep);
        }
    }

    fn set_text(&mut self, node: NodeId, replacement: &str) {
        if let NodeValue::Text(text) = self.doc.value_mut(node) {
            text.clear();
            text.extend_from_slice(replacement.as_bytes());
        }
    }
}
