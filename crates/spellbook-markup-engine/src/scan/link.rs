use std::sync::LazyLock;

use regex::Regex;

use super::window::ContextWindow;

/// Default radius, in bytes, of the window scanned for links and images.
pub const DEFAULT_LINK_WINDOW: usize = 100;

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]\(.*?\)").expect("valid link pattern"));
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[.*?\]\(.*?\)").expect("valid image pattern"));

/// Bracketed inline constructs that are matched whole rather than by parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `[text](url)`, never the bracket part of an image
    Link,
    /// `![alt](url)`
    Image,
}

impl LinkKind {
    /// Whether the window's cursor lies within a match, both ends included.
    pub fn contains(self, window: &ContextWindow) -> bool {
        let text = window.text.as_str();
        let pos = window.position;
        match self {
            LinkKind::Image => IMAGE
                .find_iter(text)
                .any(|m| m.start() <= pos && pos <= m.end()),
            LinkKind::Link => LINK
                .find_iter(text)
                .filter(|m| !text[..m.start()].ends_with('!'))
                .any(|m| m.start() <= pos && pos <= m.end()),
        }
    }
}
