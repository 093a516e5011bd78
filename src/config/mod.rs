/// Configuration subsystem - find settings loaded from .findrusrc
///
/// Case handling, wrap-around, history size and the navigation keys can all
/// be set from the rc file; command-line flags override it.
pub mod rc;

// Re-export public interface
pub use rc::{ConfigError, FindConfig, RC_FILE_NAME, RcLoader};
