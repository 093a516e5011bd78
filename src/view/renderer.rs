use super::highlights::{FIND_GROUP, HighlightManager};
use super::view_model::EditorView;
use crate::document_model::{Document, DocumentAccess, Selection};
use crate::prompt::Minibuffer;
use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Color, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType, size},
};
use std::fmt::Write as _;
use std::io::{self, Write, stdout};
use unicode_width::UnicodeWidthChar;

#[derive(Clone)]
pub struct RenderParams<'a> {
    pub view: &'a EditorView,
    pub prompt: Option<&'a Minibuffer>,
    pub status_message: &'a str,
    /// (1-based index, total) of the selected match, when there is one.
    pub match_info: Option<(usize, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellStyle {
    Plain,
    Match,
    Selected,
}

pub struct View {
    last_lines: Vec<String>,
    last_status: String,
    last_terminal_size: (u16, u16),
    scroll_offset: usize,
    needs_full_redraw: bool,
    tab_stop: usize,
}

impl View {
    pub fn new() -> Self {
        Self {
            last_lines: Vec::new(),
            last_status: String::new(),
            last_terminal_size: (0, 0),
            scroll_offset: 0,
            needs_full_redraw: true,
            tab_stop: 4, // default to 4 spaces
        }
    }

    pub fn set_tab_stop(&mut self, tab_stop: usize) {
        if self.tab_stop != tab_stop && tab_stop > 0 {
            self.tab_stop = tab_stop;
            self.needs_full_redraw = true;
        }
    }

    pub fn force_redraw(&mut self) {
        self.needs_full_redraw = true;
    }

    pub fn render(&mut self, params: &RenderParams<'_>) -> io::Result<()> {
        let (width, height) = size()?;
        let mut out = stdout();

        if self.last_terminal_size != (width, height) {
            self.last_terminal_size = (width, height);
            self.needs_full_redraw = true;
        }
        if self.needs_full_redraw {
            execute!(out, Clear(ClearType::All))?;
            self.needs_full_redraw = false;
            self.last_lines.clear();
            self.last_status.clear();
        }

        let document = &params.view.document;
        let rows = height.saturating_sub(1) as usize;
        // last column is the overview gutter
        let text_width = (width as usize).saturating_sub(1).max(1);

        let (caret_line, _) = document.position(document.selection().start);
        self.adjust_scroll(caret_line, rows);

        let marked = params.view.overview.marked_rows(document.line_count(), rows);
        let visible_lines: Vec<String> = (0..rows)
            .map(|i| {
                let mut line = self.compose_line(
                    document,
                    &params.view.highlights,
                    self.scroll_offset + i,
                    text_width,
                );
                line.push_str(&overview_cell(marked[i]));
                line
            })
            .collect();

        // Only redraw changed lines
        for (i, line) in visible_lines.iter().enumerate() {
            if self.last_lines.get(i) != Some(line) {
                queue!(out, cursor::MoveTo(0, i as u16), Clear(ClearType::CurrentLine))?;
                write!(out, "{line}")?;
            }
        }
        self.last_lines = visible_lines;

        let status = match params.prompt {
            Some(prompt) => format!("{}: {}", prompt.label(), prompt.text()),
            None => match params.match_info {
                Some((index, total)) if params.status_message.is_empty() => {
                    format!("match {index} of {total}")
                }
                _ => params.status_message.to_string(),
            },
        };
        if self.last_status != status {
            queue!(out, cursor::MoveTo(0, rows as u16), Clear(ClearType::CurrentLine))?;
            write!(out, "{}", clip_to_width(&status, width as usize))?;
            self.last_status = status;
        }

        let (cursor_row, cursor_col) = match params.prompt {
            Some(prompt) => {
                let before = &prompt.text()[..prompt.cursor()];
                (rows, prompt.label().len() + 2 + self.display_width(before))
            }
            None => {
                let (line, column) = document.position(document.selection().start);
                let text = document.get_line(line).unwrap_or_default();
                let column = self.display_width(&text[..column.min(text.len())]);
                (line.saturating_sub(self.scroll_offset), column)
            }
        };
        queue!(out, cursor::MoveTo(cursor_col as u16, cursor_row as u16))?;

        out.flush()
    }

    fn adjust_scroll(&mut self, caret_line: usize, visible_lines: usize) {
        if caret_line < self.scroll_offset {
            self.scroll_offset = caret_line;
        } else if visible_lines > 0 && caret_line >= self.scroll_offset + visible_lines {
            self.scroll_offset = caret_line + 1 - visible_lines;
        }
    }

    /// One screen row: the line's text expanded and styled, padded or clipped
    /// to `width` display columns.
    fn compose_line(
        &self,
        document: &Document,
        highlights: &HighlightManager,
        line: usize,
        width: usize,
    ) -> String {
        let (Some(text), Some(line_start)) = (document.get_line(line), document.line_start(line))
        else {
            return " ".repeat(width);
        };

        let selection = document.selection();
        let mut result = String::new();
        let mut column = 0;
        let mut current = CellStyle::Plain;

        for (idx, ch) in text.char_indices() {
            let offset = line_start + idx;
            let cell_width = match ch {
                '\t' => self.tab_stop - column % self.tab_stop,
                c => c.width().unwrap_or(1),
            };
            if column + cell_width > width {
                break;
            }

            let style = cell_style(selection, highlights, offset);
            if style != current {
                push_style(&mut result, style);
                current = style;
            }
            if ch == '\t' {
                result.push_str(&" ".repeat(cell_width));
            } else {
                result.push(ch);
            }
            column += cell_width;
        }

        if current != CellStyle::Plain {
            push_style(&mut result, CellStyle::Plain);
        }
        result.push_str(&" ".repeat(width - column));
        result
    }

    /// Display columns taken by `text`, with tabs expanded to the tab stop.
    fn display_width(&self, text: &str) -> usize {
        text.chars().fold(0, |column, ch| match ch {
            '\t' => ((column / self.tab_stop) + 1) * self.tab_stop,
            c => column + c.width().unwrap_or(1),
        })
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_style(selection: Selection, highlights: &HighlightManager, offset: usize) -> CellStyle {
    if selection.start <= offset && offset < selection.end {
        CellStyle::Selected
    } else if highlights.covers(FIND_GROUP, offset) {
        CellStyle::Match
    } else {
        CellStyle::Plain
    }
}

fn push_style(out: &mut String, style: CellStyle) {
    // writing into a String cannot fail
    let _ = match style {
        CellStyle::Plain => write!(out, "{}{}", SetAttribute(Attribute::Reset), ResetColor),
        CellStyle::Match => write!(
            out,
            "{}{}{}",
            SetAttribute(Attribute::Reset),
            SetBackgroundColor(Color::Yellow),
            SetForegroundColor(Color::Black)
        ),
        CellStyle::Selected => write!(
            out,
            "{}{}",
            ResetColor,
            SetAttribute(Attribute::Reverse)
        ),
    };
}

fn overview_cell(marked: bool) -> String {
    if marked {
        format!("{}\u{2590}{}", SetForegroundColor(Color::Yellow), ResetColor)
    } else {
        "\u{2502}".to_string()
    }
}

fn clip_to_width(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        used += ch.width().unwrap_or(1);
        if used > width {
            return &text[..idx];
        }
    }
    text
}
