use crate::scan::window::floor_boundary;
use crate::span::{Span, TagSpan};

use super::DirectiveContext;
use super::tag::{
    OPEN_DELIM, OPEN_END_DELIM, block_name, closing_tags, is_closing_tag_at, next_closing_tag,
    opening_tags,
};

/// Resolves the directive enclosing a cursor position.
///
/// Implementations must be total: malformed input yields `None`, never a panic.
pub trait DirectiveMatcher {
    fn directive_at(&self, text: &str, position: usize) -> Option<DirectiveContext>;
}

/// Counts openings against closings before the cursor.
///
/// The closing tag is always the first `{~~}` after the cursor (or after the
/// opening tag, when the cursor is inside one); it is not paired structurally.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceMatcher;

impl DirectiveMatcher for BalanceMatcher {
    fn directive_at(&self, text: &str, position: usize) -> Option<DirectiveContext> {
        let position = floor_boundary(text, position);
        if let Some(found) = within_opening_tag(text, position) {
            return found;
        }
        within_body(text, position)
    }
}

/// Nearest `{~` ending at or before `position` that does not start a `{~~}`.
fn nearest_open_delim(text: &str, position: usize) -> Option<usize> {
    let mut end = position;
    loop {
        let idx = text[..end].rfind(OPEN_DELIM)?;
        if !is_closing_tag_at(text, idx) {
            return Some(idx);
        }
        end = idx;
    }
}

/// Cursor inside an opening tag's parameter list.
///
/// The outer `None` means "not inside a tag, keep looking"; `Some(None)`
/// means the cursor is inside a tag that has no closing tag.
fn within_opening_tag(text: &str, position: usize) -> Option<Option<DirectiveContext>> {
    let open = nearest_open_delim(text, position)?;
    let interior_start = open + OPEN_DELIM.len();
    let interior_end = interior_start + text[interior_start..].find(OPEN_END_DELIM)?;
    if !(interior_start..=interior_end).contains(&position) {
        return None;
    }

    let opening = Span::new(open, interior_end + OPEN_END_DELIM.len());
    let Some(closing) = next_closing_tag(text, opening.end) else {
        log::trace!("opening tag at {open} has no closing tag");
        return Some(None);
    };

    Some(Some(DirectiveContext {
        block_name: block_name(&text[interior_start..interior_end]),
        is_within_opening_tag: true,
        opening_tag: TagSpan::from_span(text, opening),
        closing_tag: TagSpan::from_span(text, closing),
        content: TagSpan::from_span(text, Span::new(opening.end, closing.start)),
        cursor_offset_in_content: None,
    }))
}

/// Cursor inside a directive body.
fn within_body(text: &str, position: usize) -> Option<DirectiveContext> {
    let before = &text[..position];
    let openings = opening_tags(before);
    let closings = closing_tags(before);
    if openings.len() <= closings.len() {
        return None;
    }

    // Replay both tag streams in order; a closing pops the latest opening.
    let mut stack = Vec::new();
    let mut closes = closings.iter().peekable();
    for tag in &openings {
        while closes.next_if(|c| c.start < tag.span.start).is_some() {
            stack.pop();
        }
        stack.push(*tag);
    }
    for _ in closes {
        stack.pop();
    }
    let enclosing = stack.pop()?;

    let Some(closing) = next_closing_tag(text, position) else {
        log::trace!(
            "directive opened at {} is not closed after {position}",
            enclosing.span.start
        );
        return None;
    };

    Some(DirectiveContext {
        block_name: block_name(enclosing.interior.slice(text)),
        is_within_opening_tag: false,
        opening_tag: TagSpan::from_span(text, enclosing.span),
        closing_tag: TagSpan::from_span(text, closing),
        content: TagSpan::from_span(text, Span::new(enclosing.span.end, closing.start)),
        cursor_offset_in_content: Some(position - enclosing.span.end),
    })
}
