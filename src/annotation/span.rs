//! Span identity shared by entities, relations and the undo journal.

use std::fmt;

/// Inclusive range of global token indices.
///
/// The display form `"{start}-{end}"` is the one identity key for a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Build a span from two endpoints in either order
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn single(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    /// Number of tokens covered
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Global indices covered, in order
    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Identity key used for lookups and log output
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Map both endpoints through `f`; `None` if either endpoint has no image.
    pub fn remap(&self, f: impl Fn(usize) -> Option<usize>) -> Option<Span> {
        let start = f(self.start)?;
        let end = f(self.end)?;
        (start <= end).then_some(Span { start, end })
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Identity of a relation: the ordered pair of endpoint spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationKey {
    pub source: Span,
    pub target: Span,
}

impl fmt::Display for RelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
