//! # Formatting Context
//!
//! Composes the scanners into one immutable snapshot of "what the cursor is
//! inside". Nothing is cached: every query rescans from the text it is given.

use serde::{Deserialize, Serialize};

use crate::directive::{BalanceMatcher, DirectiveContext, DirectiveMatcher};
use crate::scan::{
    ContextWindow, LineInfo, LinkKind, Marker, classify_line, inside_fence, line_at,
    link::DEFAULT_LINK_WINDOW, window::DEFAULT_INLINE_WINDOW,
};
use crate::selection::Selection;

/// Tunables for context assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextOptions {
    /// Radius in bytes of the window scanned for inline markers.
    pub inline_window: usize,
    /// Radius in bytes of the window scanned for links and images.
    pub link_window: usize,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            inline_window: DEFAULT_INLINE_WINDOW,
            link_window: DEFAULT_LINK_WINDOW,
        }
    }
}

/// Everything known about the cursor position, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattingContext {
    pub selection: Selection,
    pub line: LineInfo,
    pub window: ContextWindow,
    pub is_header1: bool,
    pub is_header2: bool,
    pub is_header3: bool,
    pub is_ordered_list: bool,
    pub is_unordered_list: bool,
    pub is_code_block: bool,
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_inline_code: bool,
    pub is_link: bool,
    pub is_image: bool,
    pub directive: Option<DirectiveContext>,
}

impl FormattingContext {
    /// Header level 1-3 of the current line, if any.
    pub fn header_level(&self) -> Option<u8> {
        match (self.is_header1, self.is_header2, self.is_header3) {
            (true, _, _) => Some(1),
            (_, true, _) => Some(2),
            (_, _, true) => Some(3),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        self.is_ordered_list || self.is_unordered_list
    }
}

/// Builds [`FormattingContext`]s with a fixed set of options and matcher.
pub struct ContextAssembler {
    options: ContextOptions,
    matcher: Box<dyn DirectiveMatcher>,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(ContextOptions::default())
    }
}

impl ContextAssembler {
    pub fn new(options: ContextOptions) -> Self {
        Self {
            options,
            matcher: Box::new(BalanceMatcher),
        }
    }

    /// Swaps the directive matcher.
    pub fn with_matcher(mut self, matcher: impl DirectiveMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    /// Computes the context at `selection.start`.
    ///
    /// The selection is clamped to the buffer first, so this never fails.
    pub fn context(&self, text: &str, selection: Selection) -> FormattingContext {
        let selection = selection.clamped(text);
        let position = selection.start;

        let line = line_at(text, position);
        let class = classify_line(&line.text);
        let window = ContextWindow::around(text, position, self.options.inline_window);
        let link_window = ContextWindow::around(text, position, self.options.link_window);

        let ctx = FormattingContext {
            selection,
            is_header1: class.is_header1,
            is_header2: class.is_header2,
            is_header3: class.is_header3,
            is_ordered_list: class.is_ordered_list,
            is_unordered_list: class.is_unordered_list,
            is_code_block: inside_fence(text, position),
            is_bold: Marker::Bold.contains(&window.text, window.position),
            is_italic: Marker::Italic.contains(&window.text, window.position),
            is_inline_code: Marker::InlineCode.contains(&window.text, window.position),
            is_link: LinkKind::Link.contains(&link_window),
            is_image: LinkKind::Image.contains(&link_window),
            directive: self.matcher.directive_at(text, position),
            line,
            window,
        };

        log::trace!(
            "context at {position}: header={:?} list={} code_block={} directive={:?}",
            ctx.header_level(),
            ctx.is_list(),
            ctx.is_code_block,
            ctx.directive.as_ref().map(|d| d.block_name.as_str()),
        );
        ctx
    }
}

/// Context query with default options.
pub fn formatting_context(text: &str, selection: Selection) -> FormattingContext {
    ContextAssembler::default().context(text, selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn header_line_with_bold_span() {
        let text = "## Title **strong** end";
        let ctx = formatting_context(text, Selection::cursor(12));
        assert!(ctx.is_header2);
        assert_eq!(ctx.header_level(), Some(2));
        assert!(ctx.is_bold);
        assert!(!ctx.is_italic);
        assert!(!ctx.is_code_block);
        assert_eq!(ctx.directive, None);
    }

    #[test]
    fn inline_scan_is_bounded_by_window() {
        // the opening "**" is 30 bytes back, outside a 20 byte window
        let text = format!("**{}x", "a".repeat(28));
        let pos = text.len() - 1;
        assert!(!formatting_context(&text, Selection::cursor(pos)).is_bold);

        let wide = ContextAssembler::new(ContextOptions {
            inline_window: 64,
            ..Default::default()
        });
        assert!(wide.context(&text, Selection::cursor(pos)).is_bold);
    }

    #[test]
    fn cursor_inside_link() {
        let text = "read [the docs](https://example.org) first";
        let ctx = formatting_context(text, Selection::cursor(10));
        assert!(ctx.is_link);
        assert!(!ctx.is_image);
    }

    #[test]
    fn cursor_inside_image() {
        let text = "logo: ![alt](logo.png)";
        let ctx = formatting_context(text, Selection::cursor(text.find("logo.png").unwrap()));
        assert!(ctx.is_image);
        assert!(!ctx.is_link);
    }

    #[test]
    fn cursor_outside_link_and_image() {
        let text = "[t](u) and ![a](u) then prose";
        let ctx = formatting_context(text, Selection::cursor(text.len() - 2));
        assert!(!ctx.is_link);
        assert!(!ctx.is_image);
    }

    #[test]
    fn link_window_is_configurable() {
        let text = format!("[{}](u)", "t".repeat(40));
        let narrow = ContextAssembler::new(ContextOptions {
            link_window: 10,
            ..Default::default()
        });
        assert!(!narrow.context(&text, Selection::cursor(20)).is_link);
        assert!(formatting_context(&text, Selection::cursor(20)).is_link);
    }

    #[test]
    fn uses_selection_start() {
        let text = "- item\nplain";
        let ctx = formatting_context(text, Selection::new(10, 2));
        assert_eq!(ctx.selection, Selection::new(2, 10));
        assert!(ctx.is_unordered_list);
        assert_eq!(ctx.line.text, "- item");
    }

    #[test]
    fn out_of_range_selection_is_clamped() {
        let ctx = formatting_context("1. one", Selection::new(40, 90));
        assert_eq!(ctx.selection, Selection::cursor(6));
        assert!(ctx.is_ordered_list);
        assert_eq!(ctx.line.cursor_offset, 6);
    }

    #[test]
    fn code_block_and_directive_together() {
        let text = "{~ card ~}\n```\ncode\n```\n{~~}";
        let ctx = formatting_context(text, Selection::cursor(text.find("code").unwrap()));
        assert!(ctx.is_code_block);
        assert_eq!(ctx.directive.map(|d| d.block_name), Some("card".to_string()));
    }

    struct NeverMatches;

    impl DirectiveMatcher for NeverMatches {
        fn directive_at(&self, _text: &str, _position: usize) -> Option<DirectiveContext> {
            None
        }
    }

    #[test]
    fn matcher_is_replaceable() {
        let text = "{~ card ~}Body{~~}";
        let assembler = ContextAssembler::default().with_matcher(NeverMatches);
        assert_eq!(assembler.context(text, Selection::cursor(12)).directive, None);
        assert!(formatting_context(text, Selection::cursor(12)).directive.is_some());
    }
}
