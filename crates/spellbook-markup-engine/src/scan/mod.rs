//! # Cursor Scanners
//!
//! Leaf scanners answering "is the cursor inside X" over a plain `&str`.
//! Every scanner is a pure function of `(text, position)`.
//!
//! ## Modules
//!
//! - **`cursor`**: forward-only byte `Cursor` for the marker scans
//! - **`window`**: the bounded window around the cursor used by inline scans,
//!   plus char-boundary helpers that keep every offset in bounds
//! - **`parity`**: odd/even marker counting for inline spans (`**`, `*`, `` ` ``)
//! - **`link`**: whole-match containment for links and images
//! - **`line`**: current-line extraction and prefix classification
//! - **`fence`**: fenced code block toggling with the fail-open closer check
//!
//! ## Offsets
//!
//! All offsets are byte offsets. Out-of-range offsets are clamped to the
//! buffer and moved onto a char boundary before any slicing happens.

pub mod cursor;
pub mod fence;
pub mod line;
pub mod link;
pub mod parity;
pub mod window;

pub use cursor::Cursor;
pub use fence::{FENCE, inside_fence};
pub use line::{LineClass, LineInfo, classify_line, line_at, list_continuation};
pub use link::LinkKind;
pub use parity::{Marker, inside_marker};
pub use window::{ContextWindow, ceil_boundary, floor_boundary};
