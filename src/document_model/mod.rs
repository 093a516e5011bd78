/// Document model subsystem - text, selection and line mapping
///
/// The find engine reads documents through the DocumentAccess trait; Document
/// is the in-memory implementation used by the bundled editor host.
pub mod document;
pub mod line_index;

// Re-export main types for convenience
pub use document::{Document, DocumentAccess, Selection};
pub use line_index::LineIndex;
