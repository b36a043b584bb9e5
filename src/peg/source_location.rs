//! Source Location Utilities
//!
//! Line/column calculation for diagnostics and line-range lookups used by the
//! scope detectors. Newline scanning goes through `memchr`.

use std::fmt;
use std::ops::Range;

/// A position in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    /// Byte offset from start of input
    pub offset: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, counted in characters)
    pub column: usize,
}

impl SourcePosition {
    /// Create a new source position
    #[inline]
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Create a position at the start of input
    #[inline]
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Calculate position from a byte offset in the input
    ///
    /// Offsets past the end clamp to the end of input. Offsets inside a
    /// multi-byte character clamp back to its first byte.
    pub fn from_offset(input: &str, offset: usize) -> Self {
        let mut offset = offset.min(input.len());
        while !input.is_char_boundary(offset) {
            offset -= 1;
        }

        let before = &input.as_bytes()[..offset];
        let line = memchr::memchr_iter(b'\n', before).count() + 1;
        let line_start = memchr::memrchr(b'\n', before).map_or(0, |i| i + 1);
        let column = input[line_start..offset].chars().count() + 1;

        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::start()
    }
}

/// Byte ranges of every line in `input`, each including its trailing newline
///
/// A final line without a newline is included when non-empty. Empty input
/// has no lines.
pub fn line_ranges(input: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for newline in memchr::memchr_iter(b'\n', input.as_bytes()) {
        ranges.push(start..newline + 1);
        start = newline + 1;
    }
    if start < input.len() {
        ranges.push(start..input.len());
    }
    ranges
}

/// Index into `ranges` of the line holding `offset`
///
/// An offset at the very end of the input belongs to the last line.
pub fn line_index(ranges: &[Range<usize>], offset: usize) -> Option<usize> {
    let last = ranges.len().checked_sub(1)?;
    ranges
        .iter()
        .position(|range| range.contains(&offset))
        .or_else(|| (offset >= ranges[last].end).then_some(last))
}
