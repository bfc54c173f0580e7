//! # Format Commands
//!
//! Pure `(text, selection) -> (text, selection)` transformations. Nothing here
//! touches a live widget; the host writes the result back and re-queries the
//! context.
//!
//! ## Modules
//!
//! - **`operation`**: the `Operation` enum and its name parsing
//! - **`inline`**: wrap operations (bold, italic, inline code, link, image)
//! - **`block`**: line prefixes, fenced code blocks, list continuation
//! - **`directive`**: directive templates and their insertion
//!
//! ## Declined commands
//!
//! [`apply_format`] never fails. Unknown operations, missing parameters and
//! commands that do not apply at the cursor come back as
//! [`FormatOutcome::Declined`] with the input echoed, so the host can report
//! the reason without losing the edit session.

pub mod block;
pub mod directive;
pub mod inline;
pub mod operation;

use serde::{Deserialize, Serialize};

use crate::directive::DEFAULT_BLOCK_NAME;
use crate::selection::Selection;

pub use block::PrefixFamily;
pub use directive::{DirectiveParam, DirectiveTemplate, ParamValue};
pub use operation::Operation;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Unknown format operation: {0}")]
    UnknownOperation(String),
    #[error("Operation {operation} requires parameter `{parameter}`")]
    MissingParameter {
        operation: Operation,
        parameter: &'static str,
    },
    #[error("Operation {operation} does not apply here: {reason}")]
    NotApplicable { operation: Operation, reason: String },
}

/// New buffer text and selection after a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatEdit {
    pub text: String,
    pub selection: Selection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    Applied(FormatEdit),
    /// The command did not run; `edit` is the unchanged input.
    Declined { edit: FormatEdit, reason: FormatError },
}

impl FormatOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FormatOutcome::Applied(_))
    }

    pub fn edit(&self) -> &FormatEdit {
        match self {
            FormatOutcome::Applied(edit) | FormatOutcome::Declined { edit, .. } => edit,
        }
    }

    pub fn into_edit(self) -> FormatEdit {
        match self {
            FormatOutcome::Applied(edit) | FormatOutcome::Declined { edit, .. } => edit,
        }
    }

    pub fn reason(&self) -> Option<&FormatError> {
        match self {
            FormatOutcome::Applied(_) => None,
            FormatOutcome::Declined { reason, .. } => Some(reason),
        }
    }
}

/// Text inserted when a wrap command runs on an empty selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    pub bold: String,
    pub italic: String,
    pub code: String,
    pub link_text: String,
    pub image_alt: String,
    /// Link and image target when the host supplies none.
    pub url: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            bold: "bold text".to_string(),
            italic: "italic text".to_string(),
            code: "code".to_string(),
            link_text: "text".to_string(),
            image_alt: "alt".to_string(),
            url: "url".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Directive name used when a command carries no template.
    pub default_directive: String,
    pub directive_placeholder: String,
    pub placeholders: Placeholders,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            default_directive: DEFAULT_BLOCK_NAME.to_string(),
            directive_placeholder: "Content goes here".to_string(),
            placeholders: Placeholders::default(),
        }
    }
}

/// Host state a command may need.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatParams {
    pub url: Option<String>,
    pub directive: Option<DirectiveTemplate>,
    /// The directive most recently inserted, for quick insert.
    pub last_directive: Option<DirectiveTemplate>,
}

#[derive(Debug, Clone, Default)]
pub struct FormatEngine {
    options: FormatOptions,
}

impl FormatEngine {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Runs `operation`. The selection is clamped to `text` first.
    pub fn apply(
        &self,
        text: &str,
        selection: Selection,
        operation: Operation,
        params: &FormatParams,
    ) -> Result<FormatEdit, FormatError> {
        let sel = selection.clamped(text);
        let ph = &self.options.placeholders;
        let url = params.url.as_deref().unwrap_or(&ph.url);

        let edit = match operation {
            Operation::Bold => inline::wrap(text, sel, "**", "**", &ph.bold),
            Operation::Italic => inline::wrap(text, sel, "*", "*", &ph.italic),
            Operation::InlineCode => inline::wrap(text, sel, "`", "`", &ph.code),
            Operation::Link => inline::link(text, sel, url, &ph.link_text),
            Operation::Image => inline::image(text, sel, url, &ph.image_alt),
            Operation::Header1 => block::set_line_prefix(text, sel, "# ", PrefixFamily::Header),
            Operation::Header2 => block::set_line_prefix(text, sel, "## ", PrefixFamily::Header),
            Operation::Header3 => block::set_line_prefix(text, sel, "### ", PrefixFamily::Header),
            Operation::OrderedList => block::set_line_prefix(text, sel, "1. ", PrefixFamily::List),
            Operation::UnorderedList => {
                block::set_line_prefix(text, sel, "- ", PrefixFamily::List)
            }
            Operation::CodeBlock => block::code_block(text, sel),
            Operation::Directive => {
                let template = params.directive.clone().unwrap_or_else(|| {
                    DirectiveTemplate::new(self.options.default_directive.clone())
                });
                directive::insert(text, sel, &template, &self.options.directive_placeholder)
            }
            Operation::QuickInsertDirective => {
                let template =
                    params
                        .last_directive
                        .as_ref()
                        .ok_or(FormatError::MissingParameter {
                            operation,
                            parameter: "last_directive",
                        })?;
                directive::insert(text, sel, template, &self.options.directive_placeholder)
            }
            Operation::ContinueList => block::continue_list(text, sel)?,
        };
        Ok(edit)
    }

    /// Parses `name` and runs it, folding every failure into a declined outcome.
    pub fn run(
        &self,
        text: &str,
        selection: Selection,
        name: &str,
        params: &FormatParams,
    ) -> FormatOutcome {
        let result = name
            .parse::<Operation>()
            .and_then(|op| self.apply(text, selection, op, params));

        match result {
            Ok(edit) => FormatOutcome::Applied(edit),
            Err(reason) => {
                log::debug!("format command `{name}` declined: {reason}");
                FormatOutcome::Declined {
                    edit: FormatEdit {
                        text: text.to_string(),
                        selection,
                    },
                    reason,
                }
            }
        }
    }
}

/// Format command with default options.
pub fn apply_format(
    text: &str,
    selection: Selection,
    operation: &str,
    params: &FormatParams,
) -> FormatOutcome {
    FormatEngine::default().run(text, selection, operation, params)
}
