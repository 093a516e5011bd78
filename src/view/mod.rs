/// View subsystem - what gets drawn over a document
///
/// Highlight groups and overview markers are owned per view; the renderer
/// turns a view into terminal output for the bundled editor.
pub mod highlights;
pub mod overview;
pub mod renderer;
pub mod view_model;

// Re-export public interface
pub use highlights::{FIND_GROUP, HighlightManager, HighlightSink, Span};
pub use overview::{OverviewMarkers, OverviewSink};
pub use renderer::{RenderParams, View};
pub use view_model::{EditorView, TextView};
