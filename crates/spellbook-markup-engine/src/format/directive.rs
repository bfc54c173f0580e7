//! Directive template insertion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::directive::{CLOSE_TAG, OPEN_DELIM, OPEN_END_DELIM};
use crate::selection::Selection;

use super::FormatEdit;

/// A parameter value as written into an opening tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Int(n) => write!(f, "{n}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Str(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Float(x)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveParam {
    pub name: String,
    pub value: ParamValue,
}

/// A directive to insert: its name and parameters in declaration order.
///
/// Hosts build these from whatever catalog of directives they load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveTemplate {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<DirectiveParam>,
}

impl DirectiveTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.push(DirectiveParam {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// The opening tag. Parameters go one per line, indented by four spaces.
    pub fn opening_tag(&self) -> String {
        let mut tag = format!("{OPEN_DELIM} {}", self.name);
        if self.parameters.is_empty() {
            tag.push(' ');
        } else {
            tag.push('\n');
            for p in &self.parameters {
                tag.push_str(&format!("    {}={}\n", p.name, p.value));
            }
        }
        tag.push_str(OPEN_END_DELIM);
        tag
    }

    /// Full template text and the byte range of `body` inside it.
    pub fn render(&self, body: &str) -> (String, std::ops::Range<usize>) {
        let mut out = self.opening_tag();
        out.push('\n');
        let body_start = out.len();
        out.push_str(body);
        out.push('\n');
        out.push_str(CLOSE_TAG);
        (out, body_start..body_start + body.len())
    }
}

/// Newlines needed before an insertion so it starts after a blank line.
fn leading_newlines(before: &str) -> &'static str {
    if before.is_empty() || before == "\n" || before.ends_with("\n\n") {
        ""
    } else if before.ends_with('\n') {
        "\n"
    } else {
        "\n\n"
    }
}

/// Inserts `template` at the selection.
///
/// A selected range becomes the directive body; otherwise `placeholder` does.
/// Either way the body ends up selected.
pub fn insert(
    text: &str,
    selection: Selection,
    template: &DirectiveTemplate,
    placeholder: &str,
) -> FormatEdit {
    let before = &text[..selection.start];
    let after = &text[selection.end..];
    let body = if selection.is_collapsed() {
        placeholder
    } else {
        selection.slice(text)
    };

    let lead = leading_newlines(before);
    let (rendered, body_range) = template.render(body);
    let trail = if after.is_empty() || after.starts_with('\n') {
        ""
    } else {
        "\n"
    };

    let mut out = String::with_capacity(text.len() + lead.len() + rendered.len() + trail.len());
    out.push_str(before);
    out.push_str(lead);
    out.push_str(&rendered);
    out.push_str(trail);
    out.push_str(after);

    let base = selection.start + lead.len();
    FormatEdit {
        text: out,
        selection: Selection::new(base + body_range.start, base + body_range.end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const BODY: &str = "Content goes here";

    #[test]
    fn plain_template() {
        let (text, body) = DirectiveTemplate::new("card").render(BODY);
        assert_eq!(text, "{~ card ~}\nContent goes here\n{~~}");
        assert_eq!(&text[body], BODY);
    }

    #[test]
    fn parameters_are_listed_one_per_line() {
        let template = DirectiveTemplate::new("alert")
            .param("type", "warning")
            .param("level", 2_i64)
            .param("dismissible", true);
        assert_eq!(
            template.opening_tag(),
            "{~ alert\n    type=\"warning\"\n    level=2\n    dismissible=true\n~}"
        );
    }

    #[rstest]
    #[case("", "")]
    #[case("\n", "")]
    #[case("para\n\n", "")]
    #[case("para\n", "\n")]
    #[case("para", "\n\n")]
    fn blank_line_before_insertion(#[case] before: &str, #[case] lead: &str) {
        assert_eq!(leading_newlines(before), lead);
    }

    #[test]
    fn inserts_after_paragraph_and_selects_body() {
        let edit = insert("intro", Selection::cursor(5), &DirectiveTemplate::new("card"), BODY);
        assert_eq!(edit.text, "intro\n\n{~ card ~}\nContent goes here\n{~~}");
        assert_eq!(edit.selection.slice(&edit.text), BODY);
    }

    #[test]
    fn text_after_on_same_line_is_pushed_down() {
        let edit = insert("a\n\nb", Selection::cursor(3), &DirectiveTemplate::new("x"), BODY);
        assert_eq!(edit.text, "a\n\n{~ x ~}\nContent goes here\n{~~}\nb");
        assert_eq!(edit.selection.slice(&edit.text), BODY);
    }

    #[test]
    fn selection_becomes_body() {
        let edit = insert("keep this", Selection::new(5, 9), &DirectiveTemplate::new("note"), BODY);
        assert_eq!(edit.text, "keep \n\n{~ note ~}\nthis\n{~~}");
        assert_eq!(edit.selection.slice(&edit.text), "this");
    }

    #[test]
    fn values_deserialize_untagged() {
        let template: DirectiveTemplate = serde_json::from_str(
            r#"{"name":"card","parameters":[{"name":"w","value":1.5},{"name":"t","value":"x"}]}"#,
        )
        .unwrap();
        assert_eq!(template.parameters[0].value, ParamValue::Float(1.5));
        assert_eq!(template.parameters[1].value, ParamValue::Str("x".into()));
    }
}
