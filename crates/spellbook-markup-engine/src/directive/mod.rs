//! # Directive Tags
//!
//! Directives are the custom container markup `{~ name params ~} body {~~}`.
//! This module answers which directive, if any, encloses the cursor.
//!
//! ## Modules
//!
//! - **`tag`**: delimiters, the opening/closing tag patterns and name extraction
//! - **`matcher`**: the `DirectiveMatcher` seam and the balance-counting matcher
//!
//! ## Nesting
//!
//! Nesting is positional only. The matcher counts openings and closings
//! before the cursor; the most recent unmatched opening wins. There is no
//! structural validation, and parameters containing a literal `~` are not
//! recognised as tags. Malformed or unterminated tags resolve to `None`.

pub mod matcher;
pub mod tag;

use serde::Serialize;

use crate::span::TagSpan;

pub use matcher::{BalanceMatcher, DirectiveMatcher};
pub use tag::{CLOSE_TAG, DEFAULT_BLOCK_NAME, OPEN_DELIM, OPEN_END_DELIM};

/// The directive enclosing the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectiveContext {
    /// First token of the opening tag, `"SpellBlock"` when the tag is empty.
    pub block_name: String,
    /// True when the cursor sits inside the opening tag's own parameters.
    pub is_within_opening_tag: bool,
    pub opening_tag: TagSpan,
    pub closing_tag: TagSpan,
    /// Everything between the opening tag's end and the closing tag's start.
    pub content: TagSpan,
    /// Cursor offset from `content.start`; `None` inside the opening tag.
    pub cursor_offset_in_content: Option<usize>,
}

/// Finds the directive around `position` with the default matcher.
pub fn directive_at(text: &str, position: usize) -> Option<DirectiveContext> {
    BalanceMatcher.directive_at(text, position)
}
