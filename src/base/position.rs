//! Line/column positions for diagnostics.
//!
//! Offsets in the syntax tree are byte offsets ([`TextSize`]); fatal errors
//! report positions as 1-based `line:column` so they can be pasted into an
//! editor.

use std::fmt;

use text_size::TextSize;

/// A position in source code (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Maps byte offsets to line/column pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first character of every line.
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset as u32 + 1);
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a position. The column counts bytes.
    pub fn position(&self, offset: TextSize) -> Position {
        let offset: u32 = offset.into();
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Position::new(line, (offset - self.line_starts[line]) as usize)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
