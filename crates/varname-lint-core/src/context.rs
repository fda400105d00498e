//! Context types for rule execution.

use crate::types::Location;
use std::ops::Range;
use std::path::Path;

/// Context provided to rules for one configuration file.
///
/// Parsed HCL nodes only carry byte spans; the context owns the mapping
/// from those spans back to the line/column pairs used in diagnostics.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path to the file, as reported in diagnostics.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str) -> Self {
        Self { path, content }
    }

    /// Calculates the 1-indexed line and column for a byte offset.
    ///
    /// Columns count characters, not bytes. Offsets past the end of the
    /// content clamp to the end; offsets inside a multi-byte character
    /// resolve to that character.
    #[must_use]
    pub fn position_at(&self, offset: usize) -> (usize, usize) {
        let mut offset = offset.min(self.content.len());
        while !self.content.is_char_boundary(offset) {
            offset -= 1;
        }

        let before = &self.content[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;

        (line, column)
    }

    /// Builds a [`Location`] for a byte span in this file.
    #[must_use]
    pub fn location(&self, span: Range<usize>) -> Location {
        let (line, column) = self.position_at(span.start);
        Location::new(self.path.to_path_buf(), line, column)
            .with_span(span.start, span.end.saturating_sub(span.start))
    }
}
