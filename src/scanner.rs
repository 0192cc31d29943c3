use std::ops::Range;

use memchr::memmem;

const OPEN: &[u8] = b"{{";
const CLOSE: &[u8] = b"}}";

/// One `{{ ... }}` occurrence as it appears in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMacro<'a> {
    /// The exact matched text, braces included
    pub full: &'a str,
    /// The body between the braces with surrounding whitespace stripped
    pub inner: &'a str,
    /// Byte offset of the opening braces
    pub offset: usize,
}

/// Left-to-right scanner over the macros of a single text.
///
/// The body runs to the first `}}` after the opening braces and may span lines.
/// An opening `{{` with no closing `}}` after it ends the scan.
#[derive(Debug)]
pub struct Scanner<'a> {
    source: &'a str,
    byte_idx: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, byte_idx: 0 }
    }

    pub fn scan_next(&mut self) -> Option<(RawMacro<'a>, Range<usize>)> {
        if self.byte_idx >= self.source.len() {
            return None;
        }

        let bytes = self.source.as_bytes();
        let Some(p) = memmem::find(&bytes[self.byte_idx..], OPEN) else {
            self.byte_idx = self.source.len();
            return None;
        };
        let open = self.byte_idx + p;
        let body_start = open + OPEN.len();

        let Some(q) = memmem::find(&bytes[body_start..], CLOSE) else {
            // Any later `{{` would need this same missing `}}`.
            self.byte_idx = self.source.len();
            return None;
        };
        let body_end = body_start + q;
        let end = body_end + CLOSE.len();
        self.byte_idx = end;

        // Braces are ASCII, so every bound above sits on a char boundary.
        let raw = RawMacro {
            full: &self.source[open..end],
            inner: self.source[body_start..body_end].trim(),
            offset: open,
        };
        Some((raw, open..end))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = RawMacro<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scan_next().map(|(raw, _)| raw)
    }
}
