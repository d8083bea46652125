//! Source positions and spans.
//!
//! Positions are 1-based `(line, column)` pairs ordered lexicographically,
//! so span containment can be decided without a file-offset table. File
//! identity is carried by the enclosing [`SourceFile`](super::SourceFile),
//! not by the position itself.

use std::fmt;

/// A 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pos {
    /// Line number, starting at 1.
    pub line: u32,
    /// Column number, starting at 1.
    pub col: u32,
}

impl Pos {
    /// Create a position from line and column.
    #[inline]
    #[must_use]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A source range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// First position covered by the node.
    pub start: Pos,
    /// Last position covered by the node.
    pub end: Pos,
}

impl Span {
    /// Create a span from start and end positions.
    #[inline]
    #[must_use]
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    /// Create a single-position span.
    #[inline]
    #[must_use]
    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Whether `pos` falls inside this span.
    ///
    /// The start is exclusive and the end inclusive: a node strictly after
    /// the opening token of a scope is inside it, while the opening token
    /// itself is not. This is the containment rule the excluder uses to
    /// find the innermost scope around a marker comment.
    #[must_use]
    pub fn contains(&self, pos: Pos) -> bool {
        pos > self.start && pos <= self.end
    }
}
