//! Source positions.
//!
//! Every node, token and diagnostic carries a [`TextRange`] of byte offsets
//! into its file's text.

use std::fmt;
use std::ops::Range;

/// A byte offset into source text.
pub type TextPos = u32;

/// A half-open byte range `[pos, end)`.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TextRange {
    pub pos: TextPos,
    pub end: TextPos,
}

impl TextRange {
    #[inline]
    pub fn new(pos: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= pos);
        Self { pos, end }
    }

    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self { pos, end: pos }
    }

    #[inline]
    pub fn len(&self) -> TextPos {
        self.end - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.pos && pos < self.end
    }

    /// Like [`contains`](Self::contains) but also accepts `end`.
    #[inline]
    pub fn contains_inclusive(&self, pos: TextPos) -> bool {
        pos >= self.pos && pos <= self.end
    }

    #[inline]
    pub fn contains_range(&self, other: TextRange) -> bool {
        other.pos >= self.pos && other.end <= self.end
    }

    pub fn cover(&self, other: TextRange) -> TextRange {
        TextRange::new(self.pos.min(other.pos), self.end.max(other.end))
    }

    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.pos as usize..self.end as usize
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.pos, self.end)
    }
}

impl From<Range<TextPos>> for TextRange {
    fn from(range: Range<TextPos>) -> Self {
        TextRange::new(range.start, range.end)
    }
}

/// 0-based line and column of a byte offset.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LineAndColumn {
    pub line: u32,
    pub column: u32,
}

/// Byte offsets of line starts, for turning positions into `line:column`.
#[derive(Debug, Clone)]
pub struct LineMap {
    line_starts: Vec<TextPos>,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(memchr::memchr_iter(b'\n', text.as_bytes()).map(|i| (i + 1) as TextPos));
        Self { line_starts }
    }

    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(line) => (line - 1) as u32,
        }
    }

    pub fn line_and_column_of(&self, pos: TextPos) -> LineAndColumn {
        let line = self.line_of(pos);
        LineAndColumn {
            line,
            column: pos - self.line_starts[line as usize],
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_contains() {
        let range = TextRange::new(5, 10);
        assert_eq!(range.len(), 5);
        assert!(range.contains(5));
        assert!(!range.contains(10));
        assert!(range.contains_inclusive(10));
        assert!(range.contains_range(TextRange::new(6, 9)));
        assert!(!range.contains_range(TextRange::new(4, 9)));
    }

    #[test]
    fn test_cover() {
        let a = TextRange::new(3, 6);
        let b = TextRange::new(8, 12);
        assert_eq!(a.cover(b), TextRange::new(3, 12));
    }

    #[test]
    fn test_line_map() {
        let map = LineMap::new("let a;\nlet b;\n\nlet c;");
        assert_eq!(map.line_count(), 4);
        assert_eq!(map.line_of(0), 0);
        assert_eq!(map.line_of(6), 0);
        assert_eq!(map.line_of(7), 1);
        assert_eq!(map.line_of(14), 2);
        let lc = map.line_and_column_of(19);
        assert_eq!(lc, LineAndColumn { line: 3, column: 4 });
    }
}
