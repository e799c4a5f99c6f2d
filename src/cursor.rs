//! Byte cursor over an inline subject.
//!
//! Bounds-checked and index based: the inline parser keeps rewinding to saved
//! positions, so the position is a plain `usize` callers can store and restore.

/// A position within a byte slice.
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[inline]
    pub const fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    #[inline]
    pub const fn new_at(input: &'a [u8], pos: usize) -> Self {
        Self { input, pos }
    }

    #[inline]
    pub const fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Current offset from the start of the input.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.pos
    }

    /// Jump to `pos`, clamped to the end of input.
    #[inline]
    pub fn set_offset(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    #[inline]
    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Current byte, or `None` at end of input.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    pub fn at(&self, b: u8) -> bool {
        self.peek() == Some(b)
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    #[inline]
    pub fn bump(&mut self) {
        self.advance(1);
    }

    /// Consume `b` if it is next.
    #[inline]
    pub fn eat(&mut self, b: u8) -> bool {
        if self.at(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume bytes while `pred` holds. Returns how many were consumed.
    #[inline]
    pub fn skip_while<F: Fn(u8) -> bool>(&mut self, pred: F) -> usize {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.pos += 1;
        }
        self.pos - start
    }

    /// Skip spaces and tabs.
    #[inline]
    pub fn skip_spaces(&mut self) -> usize {
        self.skip_while(|b| b == b' ' || b == b'\t')
    }

    /// Skip spaces, tabs and at most one line ending, then more spaces.
    pub fn skip_spnl(&mut self) {
        self.skip_spaces();
        if self.eat(b'\r') {
            self.eat(b'\n');
        } else {
            self.eat(b'\n');
        }
        self.skip_spaces();
    }

    /// Consume a line ending. End of input also counts.
    pub fn skip_line_end(&mut self) -> bool {
        let mut seen = false;
        if self.eat(b'\r') {
            seen = true;
        }
        if self.eat(b'\n') {
            seen = true;
        }
        seen || self.is_eof()
    }

    /// Bytes from `start` up to the cursor.
    #[inline]
    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        &self.input[start..self.pos]
    }

    #[inline]
    pub fn remaining_slice(&self) -> &'a [u8] {
        &self.input[self.pos.min(self.input.len())..]
    }
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let preview: String = self
            .remaining_slice()
            .iter()
            .take(20)
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect();
        f.debug_struct("Cursor")
            .field("pos", &self.pos)
            .field("len", &self.input.len())
            .field("preview", &preview)
            .finish()
    }
}
