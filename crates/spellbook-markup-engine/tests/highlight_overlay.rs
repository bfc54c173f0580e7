mod common;

use common::fixture;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use rstest::rstest;
use spellbook_markup_engine::{HighlightKind, highlight_spans, render_html};

#[rstest]
#[case("directives/nested_card")]
#[case("directives/opening_params")]
#[case("directives/unclosed")]
#[case("blocks/code_fence")]
#[case("inline/mixed")]
fn spans_reassemble_the_buffer(#[case] name: &str) {
    let (text, _) = fixture(name);
    let joined: String = highlight_spans(&text).iter().map(|s| s.text(&text)).collect();
    assert_eq!(joined, text);
}

#[test]
fn render_is_idempotent() {
    let (text, _) = fixture("directives/nested_card");
    let first = render_html(&text);
    assert_eq!(render_html(&text), first);
}

#[test]
fn closing_tag_is_highlighted_once() {
    let spans = highlight_spans("{~~}");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].kind, HighlightKind::SyntaxClose);
}

#[test]
fn escapes_html_in_directive_parameters() {
    assert_snapshot!(
        render_html("{~ card note=\"<b>\" ~}"),
        @r#"<span class="spellblock-syntax-open">{~ </span><span class="spellblock-name">card</span><span class="spellblock-params"> note="&lt;b&gt;"</span><span class="spellblock-syntax-open"> ~}</span>"#
    );
}

#[test]
fn multiline_opening_tag() {
    let text = "{~ alert\n    type=\"warn\"\n~}\nBody\n{~~}";
    let kinds: Vec<_> = highlight_spans(text).iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            HighlightKind::SyntaxOpen,
            HighlightKind::Name,
            HighlightKind::Params,
            HighlightKind::SyntaxOpen,
            HighlightKind::Plain,
            HighlightKind::SyntaxClose,
        ]
    );
}
