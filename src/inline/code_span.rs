//! Code span matching.
//!
//! A closing run must have exactly the opener's length. The first failed
//! search scans to the end of the subject and records where runs of each
//! length were last seen, so later openers of a length with no run ahead
//! fail without rescanning.

use crate::limits::MAX_CODE_SPAN_BACKTICKS;
use memchr::memchr;

#[derive(Debug, Default)]
pub struct BacktickCache {
    scanned_to_end: bool,
    /// Start offset of the last run seen, indexed by run length.
    last_seen: Vec<usize>,
}

impl BacktickCache {
    pub fn reset(&mut self) {
        self.scanned_to_end = false;
        self.last_seen.clear();
    }

    /// Find the run closing an opener of `open_len` backticks, searching from
    /// `pos`. Returns the offset just past the closing run.
    pub fn find_closer(&mut self, input: &[u8], mut pos: usize, open_len: usize) -> Option<usize> {
        if open_len > MAX_CODE_SPAN_BACKTICKS {
            return None;
        }
        if self.last_seen.is_empty() {
            self.last_seen.resize(MAX_CODE_SPAN_BACKTICKS + 1, 0);
        }
        if self.scanned_to_end && self.last_seen[open_len] <= pos {
            return None;
        }
        loop {
            let Some(offset) = memchr(b'`', &input[pos..]) else {
                self.scanned_to_end = true;
                return None;
            };
            let start = pos + offset;
            let len = input[start..].iter().take_while(|&&b| b == b'`').count();
            pos = start + len;
            if len <= MAX_CODE_SPAN_BACKTICKS {
                self.last_seen[len] = start;
            }
            if len == open_len {
                return Some(pos);
            }
        }
    }
}

/// Turn raw span content into its literal: line endings become spaces, and
/// one space is stripped from each end when both ends have one and the
/// content is not all spaces.
pub fn normalize_code(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        match raw[i] {
            b'\r' => {
                if raw.get(i + 1) != Some(&b'\n') {
                    out.push(b' ');
                }
            }
            b'\n' => out.push(b' '),
            b => out.push(b),
        }
        i += 1;
    }
    if out.len() >= 2 && out[0] == b' ' && out[out.len() - 1] == b' ' && out.iter().any(|&b| b != b' ') {
        out.pop();
        out.remove(0);
    }
    out
}
