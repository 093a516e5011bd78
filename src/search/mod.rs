/// Search subsystem - pattern compilation, scanning, navigation and the
/// interactive find session that ties them to a document view.
pub mod navigator;
pub mod pattern;
pub mod scanner;
pub mod session;

// Re-export public interface
pub use navigator::{MatchNavigator, NavAction};
pub use pattern::{
    CaseMode, CaseSetting, CompiledPattern, Pattern, PatternError, PatternErrorKind,
    escape_literal, resolve_case,
};
pub use scanner::{Match, scan, scan_with};
pub use session::{FindAction, FindContext, FindOutcome, SessionState};
