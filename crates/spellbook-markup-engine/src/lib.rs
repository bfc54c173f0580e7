pub mod context;
pub mod directive;
pub mod format;
pub mod highlight;
pub mod scan;
pub mod schedule;
pub mod selection;
pub mod span;

// Re-export key types for easier usage
pub use context::{ContextAssembler, ContextOptions, FormattingContext, formatting_context};
pub use directive::{BalanceMatcher, DirectiveContext, DirectiveMatcher, directive_at};
pub use format::{
    DirectiveTemplate, FormatEdit, FormatEngine, FormatError, FormatOptions, FormatOutcome,
    FormatParams, Operation, ParamValue, Placeholders, apply_format,
};
pub use highlight::{HighlightKind, HighlightSpan, Highlighter, highlight_spans, render_html};
pub use schedule::Debouncer;
pub use selection::Selection;
pub use span::{Span, TagSpan};
