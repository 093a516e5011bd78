/// Controller subsystem - turns keystrokes into find commands
///
/// Keys go to the open find prompt when there is one, otherwise they are
/// parsed into editor commands and executed against the hosted view.
pub mod editor;
pub mod key_handler;

// Re-export public interface
pub use editor::EditorController;
pub use key_handler::{Command, KeyHandler};
