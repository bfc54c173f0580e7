use serde::Serialize;

/// Default radius, in bytes, of the window scanned for inline markers.
pub const DEFAULT_INLINE_WINDOW: usize = 20;

/// Clamps `offset` to `text` and moves it down onto a char boundary.
pub fn floor_boundary(text: &str, offset: usize) -> usize {
    let mut i = offset.min(text.len());
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Clamps `offset` to `text` and moves it up onto a char boundary.
pub fn ceil_boundary(text: &str, offset: usize) -> usize {
    let mut i = offset.min(text.len());
    while !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// The bounded slice of the buffer around the cursor.
///
/// Inline parity scans run over this window only, which keeps every
/// keystroke's recomputation proportional to the radius, not the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextWindow {
    /// Window text.
    pub text: String,
    /// Cursor position relative to the window start.
    pub position: usize,
    /// Absolute start of the window in the buffer.
    pub start: usize,
    /// Absolute end of the window in the buffer.
    pub end: usize,
}

impl ContextWindow {
    /// Builds the window of `radius` bytes on each side of `position`.
    pub fn around(text: &str, position: usize, radius: usize) -> Self {
        let position = floor_boundary(text, position);
        let start = floor_boundary(text, position.saturating_sub(radius));
        let end = ceil_boundary(text, position.saturating_add(radius));
        Self {
            text: text[start..end].to_string(),
            position: position - start,
            start,
            end,
        }
    }

    /// Absolute cursor position in the buffer.
    pub fn cursor(&self) -> usize {
        self.start + self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_clamped_at_buffer_edges() {
        let w = ContextWindow::around("short", 2, 20);
        assert_eq!(w.text, "short");
        assert_eq!((w.start, w.end, w.position), (0, 5, 2));
    }

    #[test]
    fn window_is_bounded_by_radius() {
        let text = "a".repeat(100);
        let w = ContextWindow::around(&text, 50, 20);
        assert_eq!((w.start, w.end), (30, 70));
        assert_eq!(w.position, 20);
        assert_eq!(w.cursor(), 50);
    }

    #[test]
    fn window_widens_to_char_boundaries() {
        // "é" occupies bytes 1..3
        let w = ContextWindow::around("xéy", 3, 1);
        assert_eq!(w.text, "éy");
        assert_eq!(w.start, 1);
        assert_eq!(w.position, 2);
    }

    #[test]
    fn out_of_range_position_clamps_to_end() {
        let w = ContextWindow::around("abc", 40, 2);
        assert_eq!(w.cursor(), 3);
        assert_eq!(w.text, "bc");
    }

    #[test]
    fn boundaries_clamp_and_round() {
        let text = "hé";
        assert_eq!(floor_boundary(text, 2), 1);
        assert_eq!(ceil_boundary(text, 2), 3);
        assert_eq!(floor_boundary(text, 99), 3);
    }
}
