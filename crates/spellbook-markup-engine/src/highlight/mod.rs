//! # Directive Highlight Overlay
//!
//! Splits the buffer into spans that either carry directive tag syntax or
//! plain text. The spans tile the buffer exactly: concatenating their text
//! gives back the input, so an overlay drawn from them lines up with the
//! editing surface character for character.
//!
//! ## Modules
//!
//! - **`html`**: renders spans as the transparent-text HTML overlay
//!
//! Only tag syntax is highlighted. Directive bodies, Markdown and everything
//! else are plain spans.

pub mod html;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::span::Span;

pub use html::render_html;

/// Opening tag split into delimiter, interior and delimiter. The interior is
/// lazy and may be empty, so `{~~}` also matches here; closing tags win ties.
static OVERLAY_OPENING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\{~\s*)([^~]*?)(\s*~\})").expect("valid overlay opening pattern")
});
static OVERLAY_CLOSING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{~~\}").expect("valid overlay closing pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    /// Anything that is not tag syntax.
    Plain,
    /// `{~` or `~}` of an opening tag, with adjacent whitespace.
    SyntaxOpen,
    /// The directive name.
    Name,
    /// Everything after the name inside the opening tag.
    Params,
    /// A `{~~}` closing tag.
    SyntaxClose,
}

impl HighlightKind {
    /// CSS class used by the HTML overlay; `None` for plain text.
    pub const fn css_class(self) -> Option<&'static str> {
        match self {
            HighlightKind::Plain => None,
            HighlightKind::SyntaxOpen => Some("spellblock-syntax-open"),
            HighlightKind::Name => Some("spellblock-name"),
            HighlightKind::Params => Some("spellblock-params"),
            HighlightKind::SyntaxClose => Some("spellblock-syntax-close"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub kind: HighlightKind,
    pub span: Span,
}

impl HighlightSpan {
    fn new(kind: HighlightKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source)
    }
}

#[derive(Debug, Clone, Copy)]
enum Candidate {
    Closing(Span),
    Opening {
        whole: Span,
        open: Span,
        interior: Span,
        close: Span,
    },
}

impl Candidate {
    fn span(&self) -> Span {
        match self {
            Candidate::Closing(span) => *span,
            Candidate::Opening { whole, .. } => *whole,
        }
    }

    /// Closing tags sort ahead of openings starting at the same offset.
    fn sort_key(&self) -> (usize, u8) {
        match self {
            Candidate::Closing(span) => (span.start, 0),
            Candidate::Opening { whole, .. } => (whole.start, 1),
        }
    }
}

fn candidates(text: &str) -> Vec<Candidate> {
    let mut found: Vec<Candidate> = OVERLAY_CLOSING
        .find_iter(text)
        .map(|m| Candidate::Closing(Span::new(m.start(), m.end())))
        .collect();

    found.extend(OVERLAY_OPENING.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let open = caps.get(1)?;
        let interior = caps.get(2)?;
        let close = caps.get(3)?;
        Some(Candidate::Opening {
            whole: Span::new(whole.start(), whole.end()),
            open: Span::new(open.start(), open.end()),
            interior: Span::new(interior.start(), interior.end()),
            close: Span::new(close.start(), close.end()),
        })
    }));

    found.sort_by_key(Candidate::sort_key);
    found
}

/// Splits `text` into plain and tag-syntax spans covering all of it.
pub fn highlight_spans(text: &str) -> Vec<HighlightSpan> {
    let mut accepted: Vec<Candidate> = Vec::new();
    for cand in candidates(text) {
        if !accepted.iter().any(|a| a.span().overlaps(cand.span())) {
            accepted.push(cand);
        }
    }

    let mut spans = Vec::with_capacity(accepted.len() * 4 + 1);
    let mut last = 0;
    for cand in &accepted {
        let span = cand.span();
        if span.start > last {
            spans.push(HighlightSpan::new(HighlightKind::Plain, last, span.start));
        }
        match *cand {
            Candidate::Closing(span) => {
                spans.push(HighlightSpan::new(HighlightKind::SyntaxClose, span.start, span.end));
            }
            Candidate::Opening {
                open,
                interior,
                close,
                ..
            } => {
                spans.push(HighlightSpan::new(HighlightKind::SyntaxOpen, open.start, open.end));
                if !interior.is_empty() {
                    let name_len = interior
                        .slice(text)
                        .find(char::is_whitespace)
                        .unwrap_or(interior.len());
                    let name_end = interior.start + name_len;
                    spans.push(HighlightSpan::new(HighlightKind::Name, interior.start, name_end));
                    if name_end < interior.end {
                        spans.push(HighlightSpan::new(HighlightKind::Params, name_end, interior.end));
                    }
                }
                spans.push(HighlightSpan::new(HighlightKind::SyntaxOpen, close.start, close.end));
            }
        }
        last = span.end;
    }
    if last < text.len() {
        spans.push(HighlightSpan::new(HighlightKind::Plain, last, text.len()));
    }

    log::trace!(
        "highlighted {} directive tags in {} bytes",
        accepted.len(),
        text.len()
    );
    spans
}

/// Remembers the last buffer it highlighted and skips unchanged ones.
#[derive(Debug, Default)]
pub struct Highlighter {
    last_text: Option<String>,
    spans: Vec<HighlightSpan>,
    html: String,
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-highlights `text` if it differs from the last call; returns whether
    /// anything was recomputed.
    pub fn update(&mut self, text: &str) -> bool {
        if self.last_text.as_deref() == Some(text) {
            return false;
        }
        self.spans = highlight_spans(text);
        self.html = html::render_spans(text, &self.spans);
        self.last_text = Some(text.to_string());
        true
    }

    pub fn spans(&self) -> &[HighlightSpan] {
        &self.spans
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}
