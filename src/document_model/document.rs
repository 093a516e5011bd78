use super::line_index::LineIndex;
use std::fs;
use std::path::{Path, PathBuf};

/// A selection as a pair of byte offsets, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// What the find engine needs from an editor document.
///
/// The engine only reads the text; the selection is the one thing it writes,
/// when navigating to a match or restoring the pre-search selection.
pub trait DocumentAccess {
    fn text(&self) -> &str;

    fn selection(&self) -> Selection;

    fn set_selection(&mut self, start: usize, end: usize);

    fn line_of_offset(&self, offset: usize) -> usize;

    fn line_count(&self) -> usize;

    fn selected_text(&self) -> &str {
        let selection = self.selection();
        self.text().get(selection.start..selection.end).unwrap_or("")
    }
}

/// In-memory document: normalized text, its line index and a selection.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: Option<PathBuf>,
    text: String,
    lines: LineIndex,
    selection: Selection,
}

impl Document {
    pub fn new() -> Self {
        Self::from_string(String::new())
    }

    pub fn from_string(content: String) -> Self {
        // CRLF and lone CR both become LF; offsets are over the normalized text
        let text = if content.contains('\r') {
            content.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            content
        };

        Self {
            filename: None,
            lines: LineIndex::new(&text),
            text,
            selection: Selection::default(),
        }
    }

    pub fn from_file(filename: &Path) -> Result<Self, std::io::Error> {
        let content = fs::read_to_string(filename)?;
        let mut document = Self::from_string(content);
        document.filename = Some(filename.to_path_buf());
        Ok(document)
    }

    /// Replaces the whole text, keeping the selection inside the new bounds.
    pub fn set_text(&mut self, content: String) {
        let filename = self.filename.take();
        let selection = self.selection;

        *self = Self::from_string(content);
        self.filename = filename;
        self.set_selection(selection.start, selection.end);
    }

    pub fn get_line(&self, line: usize) -> Option<&str> {
        self.lines.line_range(line).map(|range| &self.text[range])
    }

    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.lines.line_start(line)
    }

    /// (line, byte column) of `offset`.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        self.lines.position(offset)
    }

    pub fn display_name(&self) -> &str {
        self.filename
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("[No Name]")
    }

    fn clamp_offset(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentAccess for Document {
    fn text(&self) -> &str {
        &self.text
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        self.selection = Selection::new(self.clamp_offset(start), self.clamp_offset(end));
    }

    fn line_of_offset(&self, offset: usize) -> usize {
        self.lines.line_of(offset)
    }

    fn line_count(&self) -> usize {
        self.lines.line_count()
    }
}
