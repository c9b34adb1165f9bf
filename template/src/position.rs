//! Mapping from `proc-macro2` line/column positions to byte offsets.

use proc_macro2::{LineColumn, Span};

/// Source text with a line index.
///
/// Lines are 1-based and columns count characters, matching the positions
/// `proc-macro2` reports for spans of parsed text.
pub struct SourceText<'a> {
    code: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> SourceText<'a> {
    pub fn new(code: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(code.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { code, line_starts }
    }

    pub fn code(&self) -> &'a str {
        self.code
    }

    /// Byte offset of a line/column position, clamped to the end of the text.
    pub fn offset(&self, at: LineColumn) -> usize {
        let Some(&line_start) = at.line.checked_sub(1).and_then(|i| self.line_starts.get(i))
        else {
            return self.code.len();
        };
        self.code[line_start..]
            .char_indices()
            .nth(at.column)
            .map_or(self.code.len(), |(i, _)| line_start + i)
    }

    pub fn start(&self, span: Span) -> usize {
        self.offset(span.start())
    }

    pub fn end(&self, span: Span) -> usize {
        self.offset(span.end())
    }

    pub fn slice(&self, span: Span) -> &'a str {
        &self.code[self.start(span)..self.end(span)]
    }
}
