//! Byte spans into the prepared input.

/// Half-open byte span stored as two `u32`s, so inputs are limited to 4GB.
///
/// Scanners hand these out instead of slices so the caller decides which
/// buffer to borrow from.
///
/// # Example
/// ```
/// use marktree::Range;
///
/// let input = b"[label]: /url";
/// let label = Range::new(1, 6);
/// assert_eq!(label.slice(input), b"label");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

impl Range {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Offsets past `u32::MAX` saturate. Parsed input never gets that long.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self {
            start: u32::try_from(start).unwrap_or(u32::MAX),
            end: u32::try_from(end).unwrap_or(u32::MAX),
        }
    }

    #[inline]
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        &input[self.start as usize..self.end as usize]
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
