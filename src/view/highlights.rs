use std::collections::HashMap;

/// Highlight group owned by the find feature.
pub const FIND_GROUP: &str = "find";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Receiver of highlight spans for one document view.
pub trait HighlightSink {
    fn add_highlight(&mut self, group: &str, start: usize, end: usize);

    /// Removing from an empty or unknown group is a no-op.
    fn remove_all(&mut self, group: &str);
}

/// Named groups of highlight spans. Spans inside a group are kept sorted by
/// start offset so renderers can look up an offset with a binary search.
#[derive(Debug, Default)]
pub struct HighlightManager {
    groups: HashMap<String, Vec<Span>>,
}

impl HighlightManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spans(&self, group: &str) -> &[Span] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, group: &str) -> usize {
        self.spans(group).len()
    }

    pub fn is_empty(&self, group: &str) -> bool {
        self.spans(group).is_empty()
    }

    /// True if a span of `group` covers `offset`. Spans within a group are
    /// assumed not to overlap.
    pub fn covers(&self, group: &str, offset: usize) -> bool {
        let spans = self.spans(group);
        let idx = spans.partition_point(|span| span.start <= offset);
        idx > 0 && offset < spans[idx - 1].end
    }
}

impl HighlightSink for HighlightManager {
    fn add_highlight(&mut self, group: &str, start: usize, end: usize) {
        let span = Span {
            start: start.min(end),
            end: start.max(end),
        };
        let spans = self.groups.entry(group.to_string()).or_default();

        // Scans add in ascending order, so appending is the common case.
        match spans.last() {
            Some(last) if last.start > span.start => {
                let idx = spans.partition_point(|s| s.start <= span.start);
                spans.insert(idx, span);
            }
            _ => spans.push(span),
        }
    }

    fn remove_all(&mut self, group: &str) {
        if let Some(spans) = self.groups.get_mut(group) {
            spans.clear();
        }
    }
}
