use crate::search::NavAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// A keystroke as the dispatch table sees it: the key code plus the
/// Control/Alt modifiers. Shift is folded into the character itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key binding")]
    Empty,
    #[error("unknown key `{0}`")]
    Unknown(String),
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        let modifiers = modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT);
        let code = match code {
            // terminals disagree on the case of control characters
            KeyCode::Char(c) if modifiers.contains(KeyModifiers::CONTROL) => {
                KeyCode::Char(c.to_ascii_lowercase())
            }
            other => other,
        };
        Self { code, modifiers }
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }

    /// Parses emacs-style notation: `C-g`, `M-n`, `C-M-x`, `F3`, `Tab`, `x`.
    pub fn parse(text: &str) -> Result<Self, KeyParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(KeyParseError::Empty);
        }

        let mut modifiers = KeyModifiers::NONE;
        let mut rest = text;
        loop {
            if let Some(stripped) = rest.strip_prefix("C-") {
                modifiers |= KeyModifiers::CONTROL;
                rest = stripped;
            } else if let Some(stripped) = rest.strip_prefix("M-").or_else(|| rest.strip_prefix("A-")) {
                modifiers |= KeyModifiers::ALT;
                rest = stripped;
            } else {
                break;
            }
        }

        let mut chars = rest.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            _ => match rest {
                "Tab" => KeyCode::Tab,
                "Up" => KeyCode::Up,
                "Down" => KeyCode::Down,
                "PageUp" => KeyCode::PageUp,
                "PageDown" => KeyCode::PageDown,
                _ => match rest.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                    Some(n) if (1..=24).contains(&n) => KeyCode::F(n),
                    _ => return Err(KeyParseError::Unknown(text.to_string())),
                },
            },
        };

        Ok(Self::new(code, modifiers))
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "C-")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "M-")?;
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Keystrokes the find prompt intercepts before treating input as text.
#[derive(Debug, Clone)]
pub struct SpecialKeys {
    table: HashMap<KeyBinding, NavAction>,
}

impl Default for SpecialKeys {
    fn default() -> Self {
        let mut keys = Self {
            table: HashMap::new(),
        };
        keys.bind(KeyBinding::ctrl('d'), NavAction::Previous);
        keys.bind(KeyBinding::ctrl('g'), NavAction::Next);
        keys
    }
}

impl SpecialKeys {
    /// Binds `binding` to `action`, replacing any earlier binding for that action.
    pub fn bind(&mut self, binding: KeyBinding, action: NavAction) {
        self.table.retain(|_, bound| *bound != action);
        self.table.insert(binding, action);
    }

    pub fn lookup(&self, event: &KeyEvent) -> Option<NavAction> {
        self.table.get(&KeyBinding::from_event(event)).copied()
    }

    pub fn binding_for(&self, action: NavAction) -> Option<KeyBinding> {
        self.table
            .iter()
            .find(|(_, bound)| **bound == action)
            .map(|(binding, _)| *binding)
    }
}
