//! Inline wrap operations: the selection is wrapped in a start and end marker.

use crate::selection::Selection;

use super::FormatEdit;

/// Wraps `selection` in `open`/`close`.
///
/// A non-empty selection keeps its text selected inside the new markers. An
/// empty one gets `placeholder` inserted between them, selected.
pub fn wrap(text: &str, selection: Selection, open: &str, close: &str, placeholder: &str) -> FormatEdit {
    let inner = if selection.is_collapsed() {
        placeholder
    } else {
        selection.slice(text)
    };

    let mut out = String::with_capacity(text.len() + open.len() + inner.len() + close.len());
    out.push_str(&text[..selection.start]);
    out.push_str(open);
    out.push_str(inner);
    out.push_str(close);
    out.push_str(&text[selection.end..]);

    let start = selection.start + open.len();
    FormatEdit {
        text: out,
        selection: Selection::new(start, start + inner.len()),
    }
}

/// `[text](url)` around the selection.
pub fn link(text: &str, selection: Selection, url: &str, placeholder: &str) -> FormatEdit {
    wrap(text, selection, "[", &format!("]({url})"), placeholder)
}

/// `![alt](url)` around the selection.
pub fn image(text: &str, selection: Selection, url: &str, placeholder: &str) -> FormatEdit {
    wrap(text, selection, "![", &format!("]({url})"), placeholder)
}
