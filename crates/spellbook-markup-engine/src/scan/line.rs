use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::window::floor_boundary;

static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s").expect("valid ordered list pattern"));
static HEADER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6} ").expect("valid header prefix pattern"));
static LIST_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.\s|- |\* )").expect("valid list prefix pattern"));

/// The line containing the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineInfo {
    /// Line text without its trailing newline.
    pub text: String,
    /// Absolute offset of the first byte of the line.
    pub start: usize,
    /// Absolute offset of the newline ending the line (or buffer end).
    pub end: usize,
    /// Cursor offset relative to `start`.
    pub cursor_offset: usize,
}

impl LineInfo {
    /// True if the line holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Returns the line around `offset`; the offset is clamped first.
pub fn line_at(text: &str, offset: usize) -> LineInfo {
    let offset = floor_boundary(text, offset);
    let start = text[..offset].rfind('\n').map_or(0, |nl| nl + 1);
    let end = text[offset..].find('\n').map_or(text.len(), |nl| offset + nl);
    LineInfo {
        text: text[start..end].to_string(),
        start,
        end,
        cursor_offset: offset - start,
    }
}

/// Block facts about a single line, independent of where the cursor sits in it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineClass {
    pub is_header1: bool,
    pub is_header2: bool,
    pub is_header3: bool,
    pub is_ordered_list: bool,
    pub is_unordered_list: bool,
}

impl LineClass {
    /// Header level 1-3, if any.
    pub fn header_level(&self) -> Option<u8> {
        match (self.is_header1, self.is_header2, self.is_header3) {
            (true, _, _) => Some(1),
            (_, true, _) => Some(2),
            (_, _, true) => Some(3),
            _ => None,
        }
    }
}

/// Classifies a line by its prefix.
///
/// Headers count the leading `#` run, which must be followed by a space:
/// 1, 2 and 3 map to H1-H3 and longer runs are not headers at all.
pub fn classify_line(line: &str) -> LineClass {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    let level = if hashes > 0 && line[hashes..].starts_with(' ') {
        hashes
    } else {
        0
    };

    LineClass {
        is_header1: level == 1,
        is_header2: level == 2,
        is_header3: level == 3,
        is_ordered_list: ORDERED_ITEM.is_match(line),
        is_unordered_list: line.starts_with("- ") || line.starts_with("* "),
    }
}

/// Strips a `#`..`######` header prefix, if present.
pub fn strip_header_prefix(line: &str) -> Option<&str> {
    HEADER_PREFIX.find(line).map(|m| &line[m.end()..])
}

/// Strips an ordered (`12. `, `12.<tab>`) or unordered (`- `, `* `) list prefix, if present.
pub fn strip_list_prefix(line: &str) -> Option<&str> {
    LIST_PREFIX.find(line).map(|m| &line[m.end()..])
}

/// The prefix that continues the list on the next line.
///
/// `2. ` continues as `3. `; bullets repeat themselves.
pub fn list_continuation(line: &str) -> Option<String> {
    if let Some(caps) = ORDERED_ITEM.captures(line) {
        return Some(format!("{}. ", increment_decimal(&caps[1])));
    }
    if line.starts_with("- ") {
        Some("- ".to_string())
    } else if line.starts_with("* ") {
        Some("* ".to_string())
    } else {
        None
    }
}

/// Adds one to a run of ASCII digits of any length.
fn increment_decimal(digits: &str) -> String {
    let mut out = digits.as_bytes().to_vec();
    for b in out.iter_mut().rev() {
        if *b == b'9' {
            *b = b'0';
        } else {
            *b += 1;
            return String::from_utf8_lossy(&out).into_owned();
        }
    }
    out.insert(0, b'1');
    String::from_utf8_lossy(&out).into_owned()
}
