//! Line-level operations: prefixes, fenced code blocks and list continuation.

use crate::scan::line::{line_at, list_continuation, strip_header_prefix, strip_list_prefix};
use crate::scan::{FENCE, LineInfo};
use crate::selection::Selection;

use super::{FormatEdit, FormatError, Operation, inline};

/// Prefixes that replace each other instead of stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixFamily {
    Header,
    List,
}

impl PrefixFamily {
    fn strip(self, line: &str) -> Option<&str> {
        match self {
            PrefixFamily::Header => strip_header_prefix(line),
            PrefixFamily::List => strip_list_prefix(line),
        }
    }
}

fn replace_line(text: &str, line: &LineInfo, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..line.start]);
    out.push_str(replacement);
    out.push_str(&text[line.end..]);
    out
}

/// Puts `prefix` at the start of the current line.
///
/// A blank line becomes just the prefix. An existing prefix of the same
/// family is swapped out; anything else is kept after the new prefix.
pub fn set_line_prefix(
    text: &str,
    selection: Selection,
    prefix: &str,
    family: PrefixFamily,
) -> FormatEdit {
    let line = line_at(text, selection.start);
    let replacement = if line.is_blank() {
        prefix.to_string()
    } else {
        let rest = family.strip(&line.text).unwrap_or(&line.text);
        format!("{prefix}{rest}")
    };

    FormatEdit {
        text: replace_line(text, &line, &replacement),
        selection: Selection::cursor(line.start + prefix.len()),
    }
}

/// Fences the selection, or the current line.
pub fn code_block(text: &str, selection: Selection) -> FormatEdit {
    let open = format!("{FENCE}\n");
    let close = format!("\n{FENCE}");

    if !selection.is_collapsed() {
        return inline::wrap(text, selection, &open, &close, "");
    }

    let line = line_at(text, selection.start);
    let body = if line.is_blank() { "" } else { line.text.as_str() };
    FormatEdit {
        text: replace_line(text, &line, &format!("{open}{body}{close}")),
        selection: Selection::cursor(line.start + open.len()),
    }
}

/// Enter on a list item.
///
/// An item with nothing after its marker is cleared, ending the list. Any
/// other item gets a newline plus the next marker at the cursor.
pub fn continue_list(text: &str, selection: Selection) -> Result<FormatEdit, FormatError> {
    let line = line_at(text, selection.start);
    let Some(next) = list_continuation(&line.text) else {
        return Err(FormatError::NotApplicable {
            operation: Operation::ContinueList,
            reason: "cursor is not on a list item".to_string(),
        });
    };

    if strip_list_prefix(&line.text).is_some_and(|rest| rest.trim().is_empty()) {
        return Ok(FormatEdit {
            text: replace_line(text, &line, ""),
            selection: Selection::cursor(line.start),
        });
    }

    let insert = format!("\n{next}");
    let mut out = String::with_capacity(text.len() + insert.len());
    out.push_str(&text[..selection.start]);
    out.push_str(&insert);
    out.push_str(&text[selection.end..]);
    Ok(FormatEdit {
        text: out,
        selection: Selection::cursor(selection.start + insert.len()),
    })
}
