use serde::{Deserialize, Serialize};

use crate::scan::window::floor_boundary;

/// A selection in the text buffer, as byte offsets.
///
/// `start == end` is a plain cursor. The constructor swaps reversed ends so
/// `start <= end` always holds, deserialized values included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawSelection")]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

#[derive(Deserialize)]
struct RawSelection {
    start: usize,
    end: usize,
}

impl From<RawSelection> for Selection {
    fn from(raw: RawSelection) -> Self {
        Self::new(raw.start, raw.end)
    }
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// A collapsed selection at `at`.
    pub fn cursor(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Clamps both ends to `text` and moves them onto char boundaries.
    #[must_use]
    pub fn clamped(self, text: &str) -> Self {
        Self::new(floor_boundary(text, self.start), floor_boundary(text, self.end))
    }

    /// The selected slice of `text`. Callers clamp first.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.start..self.end).unwrap_or("")
    }
}

impl From<std::ops::Range<usize>> for Selection {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}
