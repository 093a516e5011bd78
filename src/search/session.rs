use super::navigator::{MatchNavigator, NavAction};
use super::pattern::{CaseSetting, Pattern, PatternError, escape_literal};
use super::scanner::{Match, scan_with};
use crate::document_model::{DocumentAccess, Selection};
use crate::history::HistoryStore;
use crate::keymap::SpecialKeys;
use crate::prompt::{Minibuffer, PromptClient};
use crate::status::StatusReporter;
use crate::view::{FIND_GROUP, TextView};
use crossterm::event::KeyEvent;
use tracing::{debug, trace};

pub const PROMPT: &str = "Find";

/// Everything a find operation touches besides its own state.
pub struct FindContext<'a> {
    pub view: &'a mut dyn TextView,
    pub status: &'a mut dyn StatusReporter,
    pub history: &'a mut dyn HistoryStore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
    Accepted,
    Canceled,
}

/// Result of one run of the find-all algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindOutcome {
    /// Empty pattern: highlights and markers cleared, nothing reported.
    Cleared,
    Found(usize),
    /// Pattern did not compile; the previous matches are still displayed.
    Invalid(PatternError),
}

#[derive(Debug)]
enum State {
    Idle,
    Active { initial_selection: Selection },
    Accepted,
    Canceled,
}

/// The find command for one editor window.
///
/// Owns the last pattern, the matches of the last successful scan and the
/// interactive session state. The view is passed into every call; the
/// action keeps no reference to it between calls.
#[derive(Debug)]
pub struct FindAction {
    current_pattern: Option<String>,
    matches: Vec<Match>,
    state: State,
    case_setting: CaseSetting,
    navigator: MatchNavigator,
    keys: SpecialKeys,
}

impl Default for FindAction {
    fn default() -> Self {
        Self::new()
    }
}

impl FindAction {
    pub fn new() -> Self {
        Self {
            current_pattern: None,
            matches: Vec::new(),
            state: State::Idle,
            case_setting: CaseSetting::default(),
            navigator: MatchNavigator::default(),
            keys: SpecialKeys::default(),
        }
    }

    pub fn set_case_setting(&mut self, case_setting: CaseSetting) {
        self.case_setting = case_setting;
    }

    pub fn set_wrap_search(&mut self, wrap_search: bool) {
        self.navigator = MatchNavigator::new(wrap_search);
    }

    pub fn keys_mut(&mut self) -> &mut SpecialKeys {
        &mut self.keys
    }

    pub fn current_pattern(&self) -> Option<&str> {
        self.current_pattern.as_deref()
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn state(&self) -> SessionState {
        match self.state {
            State::Idle => SessionState::Idle,
            State::Active { .. } => SessionState::Active,
            State::Accepted => SessionState::Accepted,
            State::Canceled => SessionState::Canceled,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active { .. })
    }

    /// The find command. Opens the prompt for the focused view; with nothing
    /// focused, or with a session already running, it does nothing.
    pub fn invoke(&mut self, focused: Option<&mut FindContext<'_>>) -> Option<Minibuffer> {
        let Some(cx) = focused else {
            trace!("find invoked without a focused document");
            return None;
        };
        if self.is_active() {
            debug!("find invoked while a session is already active");
            return None;
        }

        let history = cx.history.as_list();
        Some(Minibuffer::open(self, cx, history))
    }

    /// Starts a session on `document` and returns the prompt's initial value.
    pub fn begin(&mut self, document: &dyn DocumentAccess) -> Option<String> {
        let initial_selection = document.selection();
        self.state = State::Active { initial_selection };
        debug!(?initial_selection, "find session started");

        let selected = document.selected_text();
        if selected.is_empty() {
            self.current_pattern.clone()
        } else {
            Some(escape_literal(selected))
        }
    }

    pub fn is_valid(&self, value: &str) -> bool {
        Pattern::new(value, self.case_setting).compile().is_ok()
    }

    /// Runs find-all for `pattern`: compile, scan, redraw highlights and
    /// markers, report the count. A pattern that fails to compile only
    /// reports the diagnostic.
    pub fn find_all_matches(&mut self, cx: &mut FindContext<'_>, pattern: Option<&str>) -> FindOutcome {
        let Some(source) = pattern.filter(|p| !p.is_empty()) else {
            self.remove_all_matches(cx.view);
            self.current_pattern = None;
            return FindOutcome::Cleared;
        };

        let compiled = match Pattern::new(source, self.case_setting).compile() {
            Ok(compiled) => compiled,
            Err(err) => {
                debug!(pattern = source, error = %err, "pattern failed to compile");
                cx.status.show_status(&err.to_string());
                return FindOutcome::Invalid(err);
            }
        };

        let matches = {
            let document = cx.view.document();
            scan_with(&compiled, document.text(), |offset| document.line_of_offset(offset))
        };

        self.remove_all_matches(cx.view);
        let highlights = cx.view.highlights_mut();
        for m in &matches {
            highlights.add_highlight(FIND_GROUP, m.start, m.end);
        }
        let overview = cx.view.overview_mut();
        for m in &matches {
            overview.add_matching_line(m.line);
        }

        let count = matches.len();
        self.matches = matches;
        self.current_pattern = Some(source.to_string());

        debug!(pattern = source, matches = count, "find-all");
        cx.status.show_status(&found_message(count, source));
        FindOutcome::Found(count)
    }

    pub fn remove_all_matches(&mut self, view: &mut dyn TextView) {
        view.highlights_mut().remove_all(FIND_GROUP);
        view.overview_mut().clear_matching_lines();
        self.matches.clear();
    }

    /// Runs find-all for `pattern` without a prompt.
    pub fn find_in_text(&mut self, cx: &mut FindContext<'_>, pattern: &str) -> FindOutcome {
        self.find_all_matches(cx, Some(pattern))
    }

    /// Re-runs find-all with the last pattern, picking up document edits.
    pub fn repeat_last_find(&mut self, cx: &mut FindContext<'_>) -> FindOutcome {
        let pattern = self.current_pattern.clone();
        self.find_all_matches(cx, pattern.as_deref())
    }

    pub fn find_next(&mut self, view: &mut dyn TextView) -> Option<Match> {
        self.navigate(view, NavAction::Next)
    }

    pub fn find_previous(&mut self, view: &mut dyn TextView) -> Option<Match> {
        self.navigate(view, NavAction::Previous)
    }

    /// Selects the next/previous match relative to the selection start.
    /// Highlights, markers and the pattern are left alone.
    pub fn navigate(&mut self, view: &mut dyn TextView, action: NavAction) -> Option<Match> {
        let caret = view.document().selection().start;
        let idx = self.navigator.step(action, &self.matches, caret)?;
        let found = self.matches[idx];

        view.document_mut().set_selection(found.start, found.end);
        trace!(?action, index = idx + 1, of = self.matches.len(), "moved to match");
        Some(found)
    }

    /// 1-based position of the selected match, if the selection is exactly one.
    pub fn match_index(&self, selection: Selection) -> Option<usize> {
        self.matches
            .binary_search_by_key(&selection.start, |m| m.start)
            .ok()
            .filter(|&idx| self.matches[idx].end == selection.end)
            .map(|idx| idx + 1)
    }

    /// Ends the session keeping the highlights. Returns false, leaving the
    /// session active, if no session is running or `value` does not compile.
    pub fn accept(&mut self, cx: &mut FindContext<'_>, value: &str) -> bool {
        if !self.is_active() || !self.is_valid(value) {
            return false;
        }

        if value.is_empty() {
            self.current_pattern = None;
        } else {
            self.current_pattern = Some(value.to_string());
            cx.history.append(value);
        }
        self.state = State::Accepted;
        debug!(pattern = value, matches = self.matches.len(), "find accepted");
        true
    }

    /// Ends the session, clearing highlights and restoring the selection
    /// from before it started.
    pub fn cancel(&mut self, cx: &mut FindContext<'_>) {
        let State::Active { initial_selection } = self.state else {
            return;
        };

        self.remove_all_matches(cx.view);
        self.current_pattern = None;
        cx.view
            .document_mut()
            .set_selection(initial_selection.start, initial_selection.end);
        self.state = State::Canceled;
        debug!(?initial_selection, "find canceled");
    }
}

fn found_message(count: usize, pattern: &str) -> String {
    let noun = if count == 1 { "match" } else { "matches" };
    format!("Found {count} {noun} for \"{pattern}\"")
}

impl<'a> PromptClient<FindContext<'a>> for FindAction {
    fn prompt(&self) -> &str {
        PROMPT
    }

    fn initial_value(&mut self, cx: &mut FindContext<'a>) -> Option<String> {
        self.begin(cx.view.document())
    }

    fn is_valid(&self, value: &str) -> bool {
        FindAction::is_valid(self, value)
    }

    fn value_changed(&mut self, cx: &mut FindContext<'a>, value: &str) {
        if self.is_active() {
            self.find_all_matches(cx, Some(value));
        }
    }

    fn special_key(&mut self, cx: &mut FindContext<'a>, key: &KeyEvent) -> bool {
        let Some(action) = self.keys.lookup(key) else {
            return false;
        };
        self.navigate(cx.view, action);
        true
    }

    fn accepted(&mut self, cx: &mut FindContext<'a>, value: &str) -> bool {
        self.accept(cx, value)
    }

    fn canceled(&mut self, cx: &mut FindContext<'a>) {
        self.cancel(cx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::Document;
    use crate::history::StringHistory;
    use crate::prompt::PromptOutcome;
    use crate::view::EditorView;
    use crossterm::event::{KeyCode, KeyModifiers};

    /// Status reporter that keeps every message.
    #[derive(Default)]
    struct StatusLog(Vec<String>);

    impl StatusReporter for StatusLog {
        fn show_status(&mut self, message: &str) {
            self.0.push(message.to_string());
        }
    }

    struct Fixture {
        view: EditorView,
        status: StatusLog,
        history: StringHistory,
    }

    impl Fixture {
        fn new(text: &str) -> Self {
            Self {
                view: EditorView::new(Document::from_string(text.to_string())),
                status: StatusLog::default(),
                history: StringHistory::default(),
            }
        }

        fn cx(&mut self) -> FindContext<'_> {
            FindContext {
                view: &mut self.view,
                status: &mut self.status,
                history: &mut self.history,
            }
        }

        fn highlight_starts(&self) -> Vec<usize> {
            self.view
                .highlights
                .spans(FIND_GROUP)
                .iter()
                .map(|s| s.start)
                .collect()
        }

        fn last_status(&self) -> Option<&str> {
            self.status.0.last().map(String::as_str)
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(prompt: &mut Minibuffer, find: &mut FindAction, fx: &mut Fixture, text: &str) {
        for c in text.chars() {
            prompt.handle_key(&press(KeyCode::Char(c)), find, &mut fx.cx());
        }
    }

    #[test]
    fn test_counts_agree() {
        let mut fx = Fixture::new("ab ab ab\nab\n");
        let mut find = FindAction::new();

        let outcome = find.find_in_text(&mut fx.cx(), "ab");

        assert_eq!(outcome, FindOutcome::Found(4));
        assert_eq!(fx.view.highlights.len(FIND_GROUP), 4);
        assert_eq!(find.matches().len(), 4);
        assert_eq!(fx.view.overview.lines().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(fx.last_status(), Some("Found 4 matches for \"ab\""));
    }

    #[test]
    fn test_singular_and_zero_counts() {
        let mut fx = Fixture::new("one thing");
        let mut find = FindAction::new();

        find.find_in_text(&mut fx.cx(), "thing");
        assert_eq!(fx.last_status(), Some("Found 1 match for \"thing\""));

        find.find_in_text(&mut fx.cx(), "nothing");
        assert_eq!(fx.last_status(), Some("Found 0 matches for \"nothing\""));
        assert!(fx.view.highlights.is_empty(FIND_GROUP));
        assert!(fx.view.overview.is_empty());
    }

    #[test]
    fn test_empty_pattern_clears_silently() {
        let mut fx = Fixture::new("abc abc");
        let mut find = FindAction::new();
        find.find_in_text(&mut fx.cx(), "abc");
        let reported = fx.status.0.len();

        assert_eq!(find.find_all_matches(&mut fx.cx(), Some("")), FindOutcome::Cleared);
        assert_eq!(find.find_all_matches(&mut fx.cx(), None), FindOutcome::Cleared);

        assert_eq!(fx.status.0.len(), reported);
        assert!(fx.view.highlights.is_empty(FIND_GROUP));
        assert!(fx.view.overview.is_empty());
        assert!(find.matches().is_empty());
        assert_eq!(find.current_pattern(), None);
    }

    #[test]
    fn test_invalid_pattern_keeps_previous_highlights() {
        let mut fx = Fixture::new("ab (ab ab");
        let mut find = FindAction::new();
        find.find_in_text(&mut fx.cx(), "ab");
        let before = fx.highlight_starts();

        let outcome = find.find_in_text(&mut fx.cx(), "(ab");

        assert!(matches!(outcome, FindOutcome::Invalid(_)));
        assert_eq!(fx.highlight_starts(), before);
        assert_eq!(fx.view.overview.len(), 1);
        assert_eq!(find.matches().len(), 3);
        assert_eq!(find.current_pattern(), Some("ab"));
        assert_eq!(fx.last_status(), Some("unclosed group"));
    }

    #[test]
    fn test_switching_patterns_leaves_no_stale_highlights() {
        let mut fx = Fixture::new("cat dog cat");
        let mut find = FindAction::new();

        find.find_in_text(&mut fx.cx(), "cat");
        find.find_in_text(&mut fx.cx(), "dog");

        assert_eq!(fx.highlight_starts(), vec![4]);
    }

    #[test]
    fn test_smart_case_through_session() {
        let mut fx = Fixture::new("foo Foo FOO");
        let mut find = FindAction::new();

        assert_eq!(find.find_in_text(&mut fx.cx(), "foo"), FindOutcome::Found(3));
        assert_eq!(find.find_in_text(&mut fx.cx(), "Foo"), FindOutcome::Found(1));

        find.set_case_setting(CaseSetting::Sensitive);
        assert_eq!(find.find_in_text(&mut fx.cx(), "foo"), FindOutcome::Found(1));
    }

    #[test]
    fn test_no_focused_document_is_a_no_op() {
        let mut find = FindAction::new();

        assert!(find.invoke(None).is_none());
        assert_eq!(find.state(), SessionState::Idle);
    }

    #[test]
    fn test_live_search_and_accept() {
        let mut fx = Fixture::new("alpha beta alphabet");
        let mut find = FindAction::new();

        let mut prompt = find.invoke(Some(&mut fx.cx())).unwrap();
        assert_eq!(find.state(), SessionState::Active);
        assert_eq!(prompt.label(), "Find");
        assert_eq!(prompt.text(), "");

        type_text(&mut prompt, &mut find, &mut fx, "alph");
        assert_eq!(fx.highlight_starts(), vec![0, 11]);
        assert_eq!(fx.last_status(), Some("Found 2 matches for \"alph\""));

        let outcome = prompt.handle_key(&press(KeyCode::Enter), &mut find, &mut fx.cx());

        assert_eq!(outcome, PromptOutcome::Accepted("alph".to_string()));
        assert_eq!(find.state(), SessionState::Accepted);
        assert_eq!(find.current_pattern(), Some("alph"));
        assert_eq!(fx.history.last(), Some("alph"));
        assert_eq!(fx.view.highlights.len(FIND_GROUP), 2);
    }

    #[test]
    fn test_invalid_value_cannot_be_accepted() {
        let mut fx = Fixture::new("a(b");
        let mut find = FindAction::new();
        let mut prompt = find.invoke(Some(&mut fx.cx())).unwrap();

        type_text(&mut prompt, &mut find, &mut fx, "a(");
        let outcome = prompt.handle_key(&press(KeyCode::Enter), &mut find, &mut fx.cx());

        assert_eq!(outcome, PromptOutcome::Pending);
        assert_eq!(find.state(), SessionState::Active);
        assert!(fx.history.is_empty());
        // "a" compiled, "a(" did not: the highlight from "a" is still there
        assert_eq!(fx.highlight_starts(), vec![0]);
    }

    #[test]
    fn test_cancel_restores_selection() {
        let mut fx = Fixture::new("one two one two");
        fx.view.document.set_selection(2, 2);
        let mut find = FindAction::new();

        let mut prompt = find.invoke(Some(&mut fx.cx())).unwrap();
        type_text(&mut prompt, &mut find, &mut fx, "two");
        prompt.handle_key(&ctrl('g'), &mut find, &mut fx.cx());
        assert_eq!(fx.view.document.selection(), Selection::new(4, 7));
        type_text(&mut prompt, &mut find, &mut fx, "x");

        let outcome = prompt.handle_key(&press(KeyCode::Esc), &mut find, &mut fx.cx());

        assert_eq!(outcome, PromptOutcome::Canceled);
        assert_eq!(find.state(), SessionState::Canceled);
        assert_eq!(fx.view.document.selection(), Selection::new(2, 2));
        assert_eq!(find.current_pattern(), None);
        assert!(fx.view.highlights.is_empty(FIND_GROUP));
        assert!(fx.view.overview.is_empty());
        assert!(fx.history.is_empty());
    }

    #[test]
    fn test_selection_seeds_escaped_case_sensitive_pattern() {
        let mut fx = Fixture::new("x.y X.Y x.y xzy");
        fx.view.document.set_selection(0, 3);
        let mut find = FindAction::new();

        let prompt = find.invoke(Some(&mut fx.cx())).unwrap();

        assert_eq!(prompt.text(), r"(?-i)x\.y");
        // opening the prompt already previews the seeded pattern
        assert_eq!(fx.highlight_starts(), vec![0, 8]);
    }

    #[test]
    fn test_entry_reuses_last_pattern() {
        let mut fx = Fixture::new("abc abc");
        let mut find = FindAction::new();
        find.find_in_text(&mut fx.cx(), "bc");

        let prompt = find.invoke(Some(&mut fx.cx())).unwrap();
        assert_eq!(prompt.text(), "bc");
    }

    #[test]
    fn test_special_keys_navigate_without_rescanning() {
        let mut fx = Fixture::new("ab ab ab");
        let mut find = FindAction::new();
        let mut prompt = find.invoke(Some(&mut fx.cx())).unwrap();
        type_text(&mut prompt, &mut find, &mut fx, "ab");
        let reported = fx.status.0.len();

        prompt.handle_key(&ctrl('g'), &mut find, &mut fx.cx());
        assert_eq!(fx.view.document.selection(), Selection::new(3, 5));
        prompt.handle_key(&ctrl('g'), &mut find, &mut fx.cx());
        prompt.handle_key(&ctrl('g'), &mut find, &mut fx.cx());
        assert_eq!(fx.view.document.selection(), Selection::new(0, 2));
        prompt.handle_key(&ctrl('d'), &mut find, &mut fx.cx());
        assert_eq!(fx.view.document.selection(), Selection::new(6, 8));

        assert_eq!(prompt.text(), "ab");
        assert_eq!(fx.status.0.len(), reported);
        assert_eq!(fx.view.highlights.len(FIND_GROUP), 3);
    }

    #[test]
    fn test_navigation_outside_session() {
        let mut fx = Fixture::new("x--x--x");
        let mut find = FindAction::new();
        find.find_in_text(&mut fx.cx(), "x");

        let found = find.find_next(&mut fx.view).unwrap();
        assert_eq!(found.start, 3);
        assert_eq!(find.match_index(fx.view.document.selection()), Some(2));

        let found = find.find_previous(&mut fx.view).unwrap();
        assert_eq!(found.start, 0);
        let found = find.find_previous(&mut fx.view).unwrap();
        assert_eq!(found.start, 6);

        find.find_in_text(&mut fx.cx(), "nope");
        assert_eq!(find.find_next(&mut fx.view), None);
    }

    #[test]
    fn test_repeat_last_find_sees_edits() {
        let mut fx = Fixture::new("ab");
        let mut find = FindAction::new();
        find.find_in_text(&mut fx.cx(), "ab");

        fx.view.document.set_text("ab ab".to_string());
        assert_eq!(find.repeat_last_find(&mut fx.cx()), FindOutcome::Found(2));
    }

    #[test]
    fn test_reinvoking_while_active_is_ignored() {
        let mut fx = Fixture::new("text");
        let mut find = FindAction::new();

        assert!(find.invoke(Some(&mut fx.cx())).is_some());
        assert!(find.invoke(Some(&mut fx.cx())).is_none());
        assert_eq!(find.state(), SessionState::Active);
    }

    #[test]
    fn test_fresh_session_after_terminal_state() {
        let mut fx = Fixture::new("aaa");
        fx.view.document.set_selection(1, 1);
        let mut find = FindAction::new();

        let mut prompt = find.invoke(Some(&mut fx.cx())).unwrap();
        type_text(&mut prompt, &mut find, &mut fx, "a");
        prompt.handle_key(&press(KeyCode::Enter), &mut find, &mut fx.cx());

        fx.view.document.set_selection(0, 0);
        let mut prompt = find.invoke(Some(&mut fx.cx())).unwrap();
        assert_eq!(prompt.text(), "a");
        prompt.handle_key(&ctrl('g'), &mut find, &mut fx.cx());
        prompt.handle_key(&press(KeyCode::Esc), &mut find, &mut fx.cx());

        // the second session snapshotted its own starting selection
        assert_eq!(fx.view.document.selection(), Selection::new(0, 0));
    }
}
