use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a keystroke means while the find prompt is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    OpenFind,
    FindNext,
    FindPrevious,
    RepeatFind,
    ClearMatches,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    MoveDocumentStart,
    MoveDocumentEnd,
    Redraw,
    Quit,
}

pub struct KeyHandler;

impl KeyHandler {
    pub fn parse_key(key_event: &KeyEvent) -> Option<Command> {
        let key = key_event.code;
        let modifiers = key_event.modifiers;

        match key {
            // Control keys first (more specific)
            KeyCode::Char('f') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::OpenFind)
            }
            KeyCode::Char('l') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::Redraw)
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
            _ if modifiers.contains(KeyModifiers::CONTROL) => None,

            KeyCode::Char('/') => Some(Command::OpenFind),
            KeyCode::Char('n') => Some(Command::FindNext),
            KeyCode::Char('N') => Some(Command::FindPrevious),
            KeyCode::F(3) if modifiers.contains(KeyModifiers::SHIFT) => {
                Some(Command::FindPrevious)
            }
            KeyCode::F(3) => Some(Command::FindNext),
            KeyCode::Char('r') => Some(Command::RepeatFind),
            KeyCode::Esc => Some(Command::ClearMatches),

            // Basic movement
            KeyCode::Char('h') | KeyCode::Left => Some(Command::MoveLeft),
            KeyCode::Char('j') | KeyCode::Down => Some(Command::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Command::MoveUp),
            KeyCode::Char('l') | KeyCode::Right => Some(Command::MoveRight),
            KeyCode::Char('g') | KeyCode::Home => Some(Command::MoveDocumentStart),
            KeyCode::Char('G') | KeyCode::End => Some(Command::MoveDocumentEnd),

            KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
        KeyHandler::parse_key(&KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_find_keys() {
        assert_eq!(parse(KeyCode::Char('/'), KeyModifiers::NONE), Some(Command::OpenFind));
        assert_eq!(parse(KeyCode::Char('f'), KeyModifiers::CONTROL), Some(Command::OpenFind));
        assert_eq!(parse(KeyCode::Char('n'), KeyModifiers::NONE), Some(Command::FindNext));
        assert_eq!(parse(KeyCode::Char('N'), KeyModifiers::SHIFT), Some(Command::FindPrevious));
        assert_eq!(parse(KeyCode::F(3), KeyModifiers::SHIFT), Some(Command::FindPrevious));
        assert_eq!(parse(KeyCode::Esc, KeyModifiers::NONE), Some(Command::ClearMatches));
    }

    #[test]
    fn test_unbound_control_keys_are_ignored() {
        assert_eq!(parse(KeyCode::Char('n'), KeyModifiers::CONTROL), None);
        assert_eq!(parse(KeyCode::Char('l'), KeyModifiers::CONTROL), Some(Command::Redraw));
        assert_eq!(parse(KeyCode::Char('l'), KeyModifiers::NONE), Some(Command::MoveRight));
        assert_eq!(parse(KeyCode::Char('z'), KeyModifiers::NONE), None);
    }
}
