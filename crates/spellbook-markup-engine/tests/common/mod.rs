/// Marks the cursor in fixture files; removed before the text is used.
pub const CURSOR: char = '‸';

/// Loads `tests/fixtures/{name}.md` and returns the text without the cursor
/// marker plus the marker's byte offset.
#[allow(dead_code)]
pub fn fixture(name: &str) -> (String, usize) {
    let raw = std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    split_cursor(&raw)
}

/// Splits an inline `‸` marker out of `marked`.
#[allow(dead_code)]
pub fn split_cursor(marked: &str) -> (String, usize) {
    let at = marked
        .find(CURSOR)
        .unwrap_or_else(|| panic!("no cursor marker in {marked:?}"));
    let mut text = marked.to_string();
    text.remove(at);
    (text, at)
}
