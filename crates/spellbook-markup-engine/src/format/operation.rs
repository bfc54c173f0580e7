use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::FormatError;

/// A markup operation a host can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Bold,
    Italic,
    InlineCode,
    Link,
    Image,
    Header1,
    Header2,
    Header3,
    OrderedList,
    UnorderedList,
    CodeBlock,
    Directive,
    /// Inserts the directive the host last used.
    QuickInsertDirective,
    /// Continues (or ends) the list on Enter.
    ContinueList,
}

impl Operation {
    pub const ALL: [Operation; 14] = [
        Operation::Bold,
        Operation::Italic,
        Operation::InlineCode,
        Operation::Link,
        Operation::Image,
        Operation::Header1,
        Operation::Header2,
        Operation::Header3,
        Operation::OrderedList,
        Operation::UnorderedList,
        Operation::CodeBlock,
        Operation::Directive,
        Operation::QuickInsertDirective,
        Operation::ContinueList,
    ];

    /// Canonical camelCase name.
    pub const fn name(self) -> &'static str {
        match self {
            Operation::Bold => "bold",
            Operation::Italic => "italic",
            Operation::InlineCode => "inlineCode",
            Operation::Link => "link",
            Operation::Image => "image",
            Operation::Header1 => "header1",
            Operation::Header2 => "header2",
            Operation::Header3 => "header3",
            Operation::OrderedList => "orderedList",
            Operation::UnorderedList => "unorderedList",
            Operation::CodeBlock => "codeBlock",
            Operation::Directive => "directive",
            Operation::QuickInsertDirective => "quickInsertDirective",
            Operation::ContinueList => "continueList",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = FormatError;

    /// Accepts camelCase, kebab-case and snake_case spellings, plus the short
    /// aliases the toolbar uses (`code`, `h1`, `spellblock`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        let op = match folded.as_str() {
            "bold" => Operation::Bold,
            "italic" => Operation::Italic,
            "code" | "inlinecode" => Operation::InlineCode,
            "link" => Operation::Link,
            "image" => Operation::Image,
            "h1" | "header1" => Operation::Header1,
            "h2" | "header2" => Operation::Header2,
            "h3" | "header3" => Operation::Header3,
            "ol" | "orderedlist" => Operation::OrderedList,
            "ul" | "unorderedlist" => Operation::UnorderedList,
            "codeblock" => Operation::CodeBlock,
            "directive" | "spellblock" => Operation::Directive,
            "quickinsert" | "quickinsertdirective" => Operation::QuickInsertDirective,
            "continuelist" => Operation::ContinueList,
            _ => return Err(FormatError::UnknownOperation(s.to_string())),
        };
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("bold", Operation::Bold)]
    #[case("orderedList", Operation::OrderedList)]
    #[case("ordered-list", Operation::OrderedList)]
    #[case("unordered_list", Operation::UnorderedList)]
    #[case("code", Operation::InlineCode)]
    #[case("codeBlock", Operation::CodeBlock)]
    #[case("H2", Operation::Header2)]
    #[case(" spellblock ", Operation::Directive)]
    fn parses_aliases(#[case] name: &str, #[case] op: Operation) {
        assert_eq!(name.parse::<Operation>().unwrap(), op);
    }

    #[test]
    fn canonical_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(op.to_string().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = "strikethrough".parse::<Operation>().unwrap_err();
        assert!(matches!(err, FormatError::UnknownOperation(name) if name == "strikethrough"));
    }
}
