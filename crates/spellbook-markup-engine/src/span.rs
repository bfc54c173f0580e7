use serde::Serialize;

/// A byte range `[start, end)` into the text buffer.
///
/// Scanners work with spans rather than copied text; slicing the buffer with
/// any span reproduces the exact source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// True if the two half-open spans share at least one byte.
    #[must_use]
    pub fn overlaps(self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Slices `text` with this span, returning `""` when it falls outside.
    pub fn slice(self, text: &str) -> &str {
        text.get(self.start..self.end).unwrap_or("")
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

/// A span together with the text it covers, as handed to collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl TagSpan {
    pub fn from_span(text: &str, span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
            text: span.slice(text).to_string(),
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}
