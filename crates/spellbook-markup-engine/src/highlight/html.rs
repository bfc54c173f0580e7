use std::fmt::Write;

use html_escape::encode_text;

use super::{HighlightSpan, highlight_spans};

const PLAIN_STYLE: &str = "color: transparent;";

/// Renders precomputed spans of `text` as overlay HTML.
///
/// Plain text is kept (transparent) so the overlay occupies exactly the same
/// space as the editing surface underneath it.
pub fn render_spans(text: &str, spans: &[HighlightSpan]) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for span in spans {
        let content = span.text(text);
        if content.is_empty() {
            continue;
        }
        let escaped = encode_text(content);
        // writing into a String cannot fail
        let _ = match span.kind.css_class() {
            Some(class) => write!(out, r#"<span class="{class}">{escaped}</span>"#),
            None => write!(out, r#"<span style="{PLAIN_STYLE}">{escaped}</span>"#),
        };
    }
    out
}

/// Highlights `text` and renders the overlay HTML in one go.
pub fn render_html(text: &str) -> String {
    render_spans(text, &highlight_spans(text))
}
