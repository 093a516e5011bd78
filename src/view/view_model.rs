//! View Model - bundles a document with the visual state drawn over it
//! The find engine only sees this trait, never a concrete editor window.
use super::highlights::{HighlightManager, HighlightSink};
use super::overview::{OverviewMarkers, OverviewSink};
use crate::document_model::{Document, DocumentAccess};

/// A document view: the text plus the highlight and overview sinks that
/// belong to it.
pub trait TextView {
    fn document(&self) -> &dyn DocumentAccess;

    fn document_mut(&mut self) -> &mut dyn DocumentAccess;

    fn highlights_mut(&mut self) -> &mut dyn HighlightSink;

    fn overview_mut(&mut self) -> &mut dyn OverviewSink;
}

/// Concrete view used by the bundled editor.
#[derive(Debug, Default)]
pub struct EditorView {
    pub document: Document,
    pub highlights: HighlightManager,
    pub overview: OverviewMarkers,
}

impl EditorView {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            highlights: HighlightManager::new(),
            overview: OverviewMarkers::new(),
        }
    }
}

impl TextView for EditorView {
    fn document(&self) -> &dyn DocumentAccess {
        &self.document
    }

    fn document_mut(&mut self) -> &mut dyn DocumentAccess {
        &mut self.document
    }

    fn highlights_mut(&mut self) -> &mut dyn HighlightSink {
        &mut self.highlights
    }

    fn overview_mut(&mut self) -> &mut dyn OverviewSink {
        &mut self.overview
    }
}
