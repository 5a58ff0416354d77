//! Source location tracking for diagnostics and line tables.

use std::fmt;

/// A position in a source file.
///
/// Only the start of the node is tracked; the emitter needs nothing more
/// than the line for its line table and diagnostics point at the column.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub col: u32,
}

impl Span {
    /// Create a new span.
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// A span at column 1 of `line`.
    #[inline]
    pub fn line(line: u32) -> Self {
        Self { line, col: 1 }
    }

    /// Whether this span carries a real location.
    #[inline]
    pub fn is_known(&self) -> bool {
        self.line != 0
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
