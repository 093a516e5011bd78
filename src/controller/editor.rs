use crate::config::{FindConfig, RcLoader};
use crate::controller::key_handler::{Command, KeyHandler};
use crate::document_model::{Document, DocumentAccess};
use crate::history::StringHistory;
use crate::prompt::{Minibuffer, PromptOutcome};
use crate::search::{FindAction, FindContext, FindOutcome};
use crate::status::{StatusLine, StatusReporter};
use crate::view::{EditorView, RenderParams, View};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use std::io::stdout;
use tracing::{debug, info};

/// Hosts one document and drives the find action from the keyboard.
pub struct EditorController {
    view: EditorView,
    find: FindAction,
    history: StringHistory,
    status: StatusLine,
    renderer: View,
    prompt: Option<Minibuffer>,
}

impl EditorController {
    pub fn new(document: Document) -> Self {
        Self {
            view: EditorView::new(document),
            find: FindAction::new(),
            history: StringHistory::default(),
            status: StatusLine::new(),
            renderer: View::new(),
            prompt: None,
        }
    }

    pub fn apply_config(&mut self, config: &FindConfig) {
        RcLoader::apply_config(&mut self.find, &mut self.history, config);
        self.renderer.set_tab_stop(config.tab_stop);
    }

    pub fn view(&self) -> &EditorView {
        &self.view
    }

    pub fn find(&self) -> &FindAction {
        &self.find
    }

    pub fn status_message(&self) -> &str {
        self.status.message()
    }

    pub fn is_prompt_open(&self) -> bool {
        self.prompt.is_some()
    }

    /// Runs find-all without opening the prompt, then selects the first match.
    pub fn find_in_text(&mut self, pattern: &str) -> FindOutcome {
        let mut cx = FindContext {
            view: &mut self.view,
            status: &mut self.status,
            history: &mut self.history,
        };
        let outcome = self.find.find_in_text(&mut cx, pattern);
        if let Some(first) = self.find.matches().first().copied() {
            self.view.document.set_selection(first.start, first.end);
        }
        outcome
    }

    pub fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen)?;

        let result = self.run_loop();

        disable_raw_mode()?;
        execute!(stdout(), LeaveAlternateScreen)?;

        result
    }

    fn run_loop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!(document = self.view.document.display_name(), "editor started");
        loop {
            let selection = self.view.document.selection();
            let match_info = self
                .find
                .match_index(selection)
                .map(|index| (index, self.find.matches().len()));

            let params = RenderParams {
                view: &self.view,
                prompt: self.prompt.as_ref(),
                status_message: self.status.message(),
                match_info,
            };
            self.renderer.render(&params)?;

            if let Event::Key(key_event) = event::read()? {
                // Ignore key release events on platforms that report them
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                if self.handle_key(key_event) {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handles one keystroke. Returns true when the editor should quit.
    pub fn handle_key(&mut self, key_event: KeyEvent) -> bool {
        if self.prompt.is_some() {
            self.handle_prompt_key(&key_event);
            return false;
        }

        let Some(command) = KeyHandler::parse_key(&key_event) else {
            return false;
        };
        self.execute(command)
    }

    fn handle_prompt_key(&mut self, key_event: &KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };

        let mut cx = FindContext {
            view: &mut self.view,
            status: &mut self.status,
            history: &mut self.history,
        };
        match prompt.handle_key(key_event, &mut self.find, &mut cx) {
            PromptOutcome::Pending => {}
            PromptOutcome::Accepted(pattern) => {
                debug!(%pattern, "prompt closed");
                self.prompt = None;
            }
            PromptOutcome::Canceled => {
                self.status.clear();
                self.prompt = None;
            }
        }
    }

    fn execute(&mut self, command: Command) -> bool {
        match command {
            Command::OpenFind => {
                let mut cx = FindContext {
                    view: &mut self.view,
                    status: &mut self.status,
                    history: &mut self.history,
                };
                self.prompt = self.find.invoke(Some(&mut cx));
            }
            Command::FindNext => {
                self.status.clear();
                if self.find.find_next(&mut self.view).is_none() {
                    self.report_no_match();
                }
            }
            Command::FindPrevious => {
                self.status.clear();
                if self.find.find_previous(&mut self.view).is_none() {
                    self.report_no_match();
                }
            }
            Command::RepeatFind => {
                let mut cx = FindContext {
                    view: &mut self.view,
                    status: &mut self.status,
                    history: &mut self.history,
                };
                if let FindOutcome::Cleared = self.find.repeat_last_find(&mut cx) {
                    self.status.show_status("No previous pattern");
                }
            }
            Command::ClearMatches => {
                self.find.remove_all_matches(&mut self.view);
                self.status.clear();
            }
            Command::MoveLeft => self.move_horizontal(false),
            Command::MoveRight => self.move_horizontal(true),
            Command::MoveUp => self.move_vertical(false),
            Command::MoveDown => self.move_vertical(true),
            Command::MoveDocumentStart => self.view.document.set_selection(0, 0),
            Command::MoveDocumentEnd => {
                let end = self.view.document.text().len();
                self.view.document.set_selection(end, end);
            }
            Command::Redraw => self.renderer.force_redraw(),
            Command::Quit => return true,
        }
        false
    }

    fn report_no_match(&mut self) {
        let message = match self.find.current_pattern() {
            Some(pattern) => format!("Pattern not found: {pattern}"),
            None => "No previous pattern".to_string(),
        };
        self.status.show_status(&message);
    }

    fn move_horizontal(&mut self, forward: bool) {
        let document = &mut self.view.document;
        let caret = document.selection().start;
        let text = document.text();
        let target = if forward {
            text[caret..].chars().next().map_or(caret, |c| caret + c.len_utf8())
        } else {
            text[..caret].chars().next_back().map_or(caret, |c| caret - c.len_utf8())
        };
        document.set_selection(target, target);
    }

    fn move_vertical(&mut self, down: bool) {
        let document = &mut self.view.document;
        let (line, column) = document.position(document.selection().start);
        let target_line = if down {
            line + 1
        } else if let Some(line) = line.checked_sub(1) {
            line
        } else {
            return;
        };

        let (Some(start), Some(text)) = (document.line_start(target_line), document.get_line(target_line))
        else {
            return;
        };
        let target = start + column.min(text.len());
        document.set_selection(target, target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::Selection;
    use crate::search::SessionState;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn press(controller: &mut EditorController, code: KeyCode) -> bool {
        controller.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(controller: &mut EditorController, text: &str) {
        for c in text.chars() {
            press(controller, KeyCode::Char(c));
        }
    }

    fn controller(text: &str) -> EditorController {
        EditorController::new(Document::from_string(text.to_string()))
    }

    #[test]
    fn test_prompt_updates_matches_while_typing() {
        let mut editor = controller("one two\ntwo three\n");

        press(&mut editor, KeyCode::Char('/'));
        assert!(editor.is_prompt_open());

        type_text(&mut editor, "tw");
        assert_eq!(editor.find().matches().len(), 2);
        assert_eq!(editor.status_message(), "Found 2 matches for \"tw\"");
        assert!(editor.view().overview.contains(0));
        assert!(editor.view().overview.contains(1));

        press(&mut editor, KeyCode::Enter);
        assert!(!editor.is_prompt_open());
        assert_eq!(editor.find().state(), SessionState::Accepted);
        assert_eq!(editor.find().current_pattern(), Some("tw"));
    }

    #[test]
    fn test_navigation_after_accept() {
        let mut editor = controller("ab ab ab");

        press(&mut editor, KeyCode::Char('/'));
        type_text(&mut editor, "ab");
        press(&mut editor, KeyCode::Enter);

        press(&mut editor, KeyCode::Char('n'));
        assert_eq!(editor.view().document.selection(), Selection::new(3, 5));
        press(&mut editor, KeyCode::Char('N'));
        assert_eq!(editor.view().document.selection(), Selection::new(0, 2));
        press(&mut editor, KeyCode::Char('N'));
        assert_eq!(editor.view().document.selection(), Selection::new(6, 8));
    }

    #[test]
    fn test_control_keys_navigate_inside_prompt() {
        let mut editor = controller("x ab ab");

        press(&mut editor, KeyCode::Char('/'));
        type_text(&mut editor, "ab");
        editor.handle_key(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL));

        assert!(editor.is_prompt_open());
        assert_eq!(editor.view().document.selection(), Selection::new(2, 4));
    }

    #[test]
    fn test_escape_in_prompt_restores_selection() {
        let mut editor = controller("ab ab");
        press(&mut editor, KeyCode::Char('l'));

        press(&mut editor, KeyCode::Char('/'));
        type_text(&mut editor, "ab");
        editor.handle_key(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL));
        press(&mut editor, KeyCode::Esc);

        assert!(!editor.is_prompt_open());
        assert_eq!(editor.view().document.selection(), Selection::caret(1));
        assert!(editor.view().highlights.is_empty(crate::view::FIND_GROUP));
        assert_eq!(editor.find().state(), SessionState::Canceled);
    }

    #[test]
    fn test_find_in_text_selects_first_match() {
        let mut editor = controller("alpha\nbeta alpha\n");

        assert_eq!(editor.find_in_text("alpha"), FindOutcome::Found(2));
        assert_eq!(editor.view().document.selection(), Selection::new(0, 5));
    }

    #[test]
    fn test_next_without_pattern_reports() {
        let mut editor = controller("text");

        press(&mut editor, KeyCode::Char('n'));
        assert_eq!(editor.status_message(), "No previous pattern");
    }

    #[test]
    fn test_vertical_movement_clamps_column() {
        let mut editor = controller("long line\nab\n");

        press(&mut editor, KeyCode::End);
        press(&mut editor, KeyCode::Char('g'));
        for _ in 0..6 {
            press(&mut editor, KeyCode::Right);
        }
        press(&mut editor, KeyCode::Down);
        assert_eq!(editor.view().document.selection(), Selection::caret(12));
        press(&mut editor, KeyCode::Up);
        assert_eq!(editor.view().document.selection(), Selection::caret(2));
    }

    #[test]
    fn test_quit() {
        let mut editor = controller("");
        assert!(!press(&mut editor, KeyCode::Char('x')));
        assert!(press(&mut editor, KeyCode::Char('q')));
    }
}
