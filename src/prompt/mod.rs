/// Prompt subsystem - the minibuffer contract and a line-editing driver
///
/// PromptClient is what a feature implements to own a prompt; Minibuffer is
/// the driver that edits the text and calls back into the client.
pub mod minibuffer;

pub use minibuffer::{Minibuffer, PromptOutcome};

use crossterm::event::KeyEvent;

/// Callbacks a prompt driver makes into the feature that opened it.
///
/// `C` is whatever context the feature needs on each call (for find, the
/// focused view plus status and history).
pub trait PromptClient<C: ?Sized> {
    fn prompt(&self) -> &str;

    /// Called once when the prompt opens. `None` means an empty prompt.
    fn initial_value(&mut self, cx: &mut C) -> Option<String>;

    fn is_valid(&self, value: &str) -> bool;

    /// Called after every edit of the prompt text, including to "".
    fn value_changed(&mut self, cx: &mut C, value: &str);

    /// Offered every keystroke before it is treated as text. Returns true if
    /// the client consumed it.
    fn special_key(&mut self, cx: &mut C, key: &KeyEvent) -> bool;

    /// Enter on a valid value. Returns true if the prompt should close.
    fn accepted(&mut self, cx: &mut C, value: &str) -> bool;

    fn canceled(&mut self, cx: &mut C);
}
