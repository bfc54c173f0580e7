use std::sync::LazyLock;

use regex::Regex;

use crate::span::Span;

/// Starts an opening tag.
pub const OPEN_DELIM: &str = "{~";
/// Ends an opening tag.
pub const OPEN_END_DELIM: &str = "~}";
/// The closing tag.
pub const CLOSE_TAG: &str = "{~~}";
/// Name reported for an opening tag with no name in it.
pub const DEFAULT_BLOCK_NAME: &str = "SpellBlock";

/// `{~ name params ~}`. Lazy and `~`-free inside, so it never runs across a
/// closing tag, and never matches `{~~}` itself.
static OPENING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{~\s*([^~]+?)\s*~\}").expect("valid opening tag pattern"));
static CLOSING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{~~\}").expect("valid closing tag pattern"));

/// An opening tag found by the pattern scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningTag {
    /// The whole tag, `{~` through `~}`.
    pub span: Span,
    /// The interior between the delimiters (name and parameters).
    pub interior: Span,
}

/// All opening tags in `text`, left to right.
pub fn opening_tags(text: &str) -> Vec<OpeningTag> {
    OPENING_TAG
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let interior = caps.get(1)?;
            Some(OpeningTag {
                span: Span::new(whole.start(), whole.end()),
                interior: Span::new(interior.start(), interior.end()),
            })
        })
        .collect()
}

/// All closing tags in `text`, left to right.
pub fn closing_tags(text: &str) -> Vec<Span> {
    CLOSING_TAG
        .find_iter(text)
        .map(|m| Span::new(m.start(), m.end()))
        .collect()
}

/// The first closing tag starting at or after `from`.
pub fn next_closing_tag(text: &str, from: usize) -> Option<Span> {
    let rest = text.get(from..)?;
    rest.find(CLOSE_TAG)
        .map(|i| Span::new(from + i, from + i + CLOSE_TAG.len()))
}

/// True if a closing tag `{~~}` starts at byte `at`.
pub fn is_closing_tag_at(text: &str, at: usize) -> bool {
    text.as_bytes()
        .get(at..)
        .is_some_and(|rest| rest.starts_with(CLOSE_TAG.as_bytes()))
}

/// First whitespace-delimited token of the interior, or the default name.
pub fn block_name(interior: &str) -> String {
    interior
        .split_whitespace()
        .next()
        .unwrap_or(DEFAULT_BLOCK_NAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_tag_interior_excludes_padding() {
        let tags = opening_tags(r#"{~  card title="x"  ~}"#);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].span, Span::new(0, 22));
        assert_eq!(tags[0].interior.slice(r#"{~  card title="x"  ~}"#), r#"card title="x""#);
    }

    #[test]
    fn closing_tag_is_not_an_opening_tag() {
        assert!(opening_tags("{~~}").is_empty());
        assert_eq!(closing_tags("{~~}"), vec![Span::new(0, 4)]);
    }

    #[test]
    fn sequential_tags_are_found_separately() {
        let text = "{~ a ~}X{~~}{~ b ~}Y{~~}";
        let opens: Vec<_> = opening_tags(text).iter().map(|t| t.span).collect();
        assert_eq!(opens, vec![Span::new(0, 7), Span::new(12, 19)]);
        assert_eq!(closing_tags(text), vec![Span::new(8, 12), Span::new(20, 24)]);
    }

    #[test]
    fn tilde_in_parameters_is_not_a_tag() {
        assert!(opening_tags("{~ card sep=~ ~}").is_empty());
    }

    #[test]
    fn block_name_takes_first_token() {
        assert_eq!(block_name("  alert type=\"warning\" "), "alert");
        assert_eq!(block_name("   "), DEFAULT_BLOCK_NAME);
    }

    #[test]
    fn next_closing_tag_searches_forward() {
        let text = "{~~} body {~~}";
        assert_eq!(next_closing_tag(text, 1), Some(Span::new(10, 14)));
        assert_eq!(next_closing_tag(text, 11), None);
        assert_eq!(next_closing_tag(text, 99), None);
    }

    #[test]
    fn closing_tag_detection_at_offset() {
        assert!(is_closing_tag_at("x{~~}", 1));
        assert!(!is_closing_tag_at("x{~ a ~}", 1));
    }
}
