//! Byte offset to line/column conversion

use crate::Location;

/// Start offsets of every line in a source file
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// 1-indexed (line, column) of a byte offset; columns count bytes like tree-sitter
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        (line + 1, offset - self.line_starts[line] + 1)
    }

    /// Location spanning `[start, end)`
    pub fn location(&self, start: usize, end: usize) -> Location {
        let (line, column) = self.position(start);
        let (end_line, end_column) = self.position(end);
        Location::new(line, column).with_end(end_line, end_column)
    }

    /// 0-indexed line and UTF-16 column of a byte offset, the unit LSP positions use.
    /// `source` must be the text this index was built from.
    pub fn utf16_position(&self, source: &str, offset: usize) -> (usize, usize) {
        let mut offset = offset.min(self.len).min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let column = source[self.line_starts[line]..offset].encode_utf16().count();
        (line, column)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
