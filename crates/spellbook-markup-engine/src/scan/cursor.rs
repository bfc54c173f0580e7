/// Forward-only byte cursor used by the marker scans.
#[derive(Clone)]
pub struct Cursor<'a> {
    s: &'a [u8],
    /// Current index into the scanned text.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            s: s.as_bytes(),
            i: 0,
        }
    }

    /// Whether the rest of the text starts with `pat`. False past the end.
    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s.get(self.i..).is_some_and(|rest| rest.starts_with(pat))
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.s.get(self.i).copied()?;
        self.i += 1;
        Some(b)
    }

    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }
}
