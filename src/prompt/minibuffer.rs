use super::PromptClient;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Pending,
    Accepted(String),
    Canceled,
}

/// Single-line prompt that streams every edit to its client.
#[derive(Debug)]
pub struct Minibuffer {
    label: String,
    text: String,
    cursor: usize, // byte offset, always on a char boundary
    history: Vec<String>,
    history_pos: Option<usize>,
    draft: String,
}

impl Minibuffer {
    /// Opens the prompt with the client's initial value and reports that
    /// value as the first change, so the client can preview it immediately.
    pub fn open<C: ?Sized, P: PromptClient<C>>(
        client: &mut P,
        cx: &mut C,
        history: Vec<String>,
    ) -> Self {
        let text = client.initial_value(cx).unwrap_or_default();
        let minibuffer = Self {
            label: client.prompt().to_string(),
            cursor: text.len(),
            text,
            history,
            history_pos: None,
            draft: String::new(),
        };
        client.value_changed(cx, &minibuffer.text);
        minibuffer
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle_key<C: ?Sized, P: PromptClient<C>>(
        &mut self,
        key: &KeyEvent,
        client: &mut P,
        cx: &mut C,
    ) -> PromptOutcome {
        if client.special_key(cx, key) {
            return PromptOutcome::Pending;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        let changed = match key.code {
            KeyCode::Esc => {
                client.canceled(cx);
                return PromptOutcome::Canceled;
            }
            KeyCode::Enter => {
                if !client.is_valid(&self.text) {
                    trace!(value = %self.text, "refusing to accept invalid value");
                    return PromptOutcome::Pending;
                }
                if client.accepted(cx, &self.text) {
                    return PromptOutcome::Accepted(self.text.clone());
                }
                return PromptOutcome::Pending;
            }
            KeyCode::Char('u') if ctrl => self.replace_text(String::new()),
            KeyCode::Char('a') if ctrl => self.move_to(0),
            KeyCode::Char('e') if ctrl => self.move_to(self.text.len()),
            KeyCode::Char(c) if !ctrl && !alt => {
                self.text.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                self.history_pos = None;
                true
            }
            KeyCode::Backspace => match self.text[..self.cursor].chars().next_back() {
                Some(c) => {
                    self.cursor -= c.len_utf8();
                    self.text.remove(self.cursor);
                    self.history_pos = None;
                    true
                }
                None => false,
            },
            KeyCode::Delete => {
                if self.cursor < self.text.len() {
                    self.text.remove(self.cursor);
                    self.history_pos = None;
                    true
                } else {
                    false
                }
            }
            KeyCode::Left => {
                let prev = self.text[..self.cursor]
                    .chars()
                    .next_back()
                    .map_or(0, |c| self.cursor - c.len_utf8());
                self.move_to(prev)
            }
            KeyCode::Right => {
                let next = self.text[self.cursor..]
                    .chars()
                    .next()
                    .map_or(self.cursor, |c| self.cursor + c.len_utf8());
                self.move_to(next)
            }
            KeyCode::Home => self.move_to(0),
            KeyCode::End => self.move_to(self.text.len()),
            KeyCode::Up => self.history_back(),
            KeyCode::Down => self.history_forward(),
            _ => false,
        };

        if changed {
            client.value_changed(cx, &self.text);
        }
        PromptOutcome::Pending
    }

    // Cursor movement never counts as a change.
    fn move_to(&mut self, cursor: usize) -> bool {
        self.cursor = cursor;
        false
    }

    fn replace_text(&mut self, text: String) -> bool {
        if text == self.text {
            return false;
        }
        self.cursor = text.len();
        self.text = text;
        true
    }

    fn history_back(&mut self) -> bool {
        let pos = match self.history_pos {
            None if self.history.is_empty() => return false,
            None => {
                self.draft = self.text.clone();
                self.history.len() - 1
            }
            Some(0) => return false,
            Some(pos) => pos - 1,
        };
        self.history_pos = Some(pos);
        self.replace_text(self.history[pos].clone())
    }

    fn history_forward(&mut self) -> bool {
        match self.history_pos {
            None => false,
            Some(pos) if pos + 1 < self.history.len() => {
                self.history_pos = Some(pos + 1);
                self.replace_text(self.history[pos + 1].clone())
            }
            Some(_) => {
                self.history_pos = None;
                let draft = std::mem::take(&mut self.draft);
                self.replace_text(draft)
            }
        }
    }
}
