use super::cursor::Cursor;

/// Inline markers whose odd/even occurrence count decides "inside".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `**`
    Bold,
    /// `*`, never counting `**` runs
    Italic,
    /// `` ` ``, never counting fence markers
    InlineCode,
}

impl Marker {
    pub const fn marker(self) -> &'static str {
        match self {
            Marker::Bold => "**",
            Marker::Italic => "*",
            Marker::InlineCode => "`",
        }
    }

    /// The longer marker sharing this one's character, skipped during scans.
    pub const fn exclude(self) -> Option<&'static str> {
        match self {
            Marker::Bold => None,
            Marker::Italic => Some("**"),
            Marker::InlineCode => Some(super::fence::FENCE),
        }
    }

    /// Whether `position` in `text` falls inside an odd run of this marker.
    pub fn contains(self, text: &str, position: usize) -> bool {
        inside_marker(text, position, self.marker(), self.exclude())
    }
}

/// Returns true when an odd number of `marker` occurrences precede `position`.
///
/// Scans from index 0 every time. At each index `exclude` is checked first
/// and skipped whole without counting, so `*` parity is never corrupted by
/// `**` runs. Positions past the end scan the whole text.
pub fn inside_marker(text: &str, position: usize, marker: &str, exclude: Option<&str>) -> bool {
    if marker.is_empty() {
        return false;
    }
    let exclude = exclude.filter(|ex| !ex.is_empty());
    let limit = position.min(text.len());

    let mut cur = Cursor::new(text);
    let mut count = 0usize;
    while cur.i < limit {
        if let Some(ex) = exclude
            && cur.starts_with(ex.as_bytes())
        {
            cur.bump_n(ex.len());
            continue;
        }
        if cur.starts_with(marker.as_bytes()) {
            count += 1;
            cur.bump_n(marker.len());
        } else {
            cur.bump();
        }
    }
    count % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("**bold**", 4, true)]
    #[case("**bold**", 8, false)]
    #[case("**a** **b", 9, true)]
    #[case("plain text", 5, false)]
    #[case("", 0, false)]
    fn bold_parity(#[case] text: &str, #[case] position: usize, #[case] inside: bool) {
        assert_eq!(Marker::Bold.contains(text, position), inside);
    }

    #[rstest]
    #[case("*it*", 2, true)]
    #[case("**bold** and *it", 16, true)]
    #[case("**bold**", 4, false)]
    #[case("****", 4, false)]
    fn italic_ignores_double_asterisks(
        #[case] text: &str,
        #[case] position: usize,
        #[case] inside: bool,
    ) {
        assert_eq!(Marker::Italic.contains(text, position), inside);
    }

    #[test]
    fn inline_code_ignores_fences() {
        assert!(!Marker::InlineCode.contains("```\ncode", 6));
        assert!(Marker::InlineCode.contains("say `hi", 6));
    }

    #[test]
    fn exclude_is_checked_before_marker() {
        // "***" at 0: the "**" exclude wins, leaving one "*" counted
        assert!(inside_marker("***x", 4, "*", Some("**")));
    }

    #[test]
    fn empty_marker_is_never_inside() {
        assert!(!inside_marker("anything", 3, "", None));
    }

    #[test]
    fn position_past_end_scans_everything() {
        assert!(inside_marker("`open", 500, "`", None));
    }

    #[test]
    fn marker_straddling_position_still_counts() {
        // the run starting at index 1 is counted even though it ends past 2
        assert!(inside_marker("a**b", 2, "**", None));
    }
}
