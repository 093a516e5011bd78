use std::collections::BTreeSet;

/// Receiver of "match on this line" markers for a document minimap.
pub trait OverviewSink {
    fn add_matching_line(&mut self, line: usize);

    fn clear_matching_lines(&mut self);
}

/// Lines marked on the overview gutter. Several matches on one line collapse
/// into a single marker.
#[derive(Debug, Default)]
pub struct OverviewMarkers {
    lines: BTreeSet<usize>,
}

impl OverviewMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn contains(&self, line: usize) -> bool {
        self.lines.contains(&line)
    }

    /// Row of a `rows`-tall gutter that represents `line` of a document with
    /// `total_lines` lines.
    pub fn row_for(line: usize, total_lines: usize, rows: usize) -> usize {
        if rows == 0 || total_lines == 0 {
            return 0;
        }
        if total_lines <= rows {
            return line.min(rows - 1);
        }
        (line * rows / total_lines).min(rows - 1)
    }

    /// One flag per gutter row, set when any marked line falls on that row.
    pub fn marked_rows(&self, total_lines: usize, rows: usize) -> Vec<bool> {
        let mut marked = vec![false; rows];
        if rows == 0 {
            return marked;
        }
        for line in &self.lines {
            marked[Self::row_for(*line, total_lines, rows)] = true;
        }
        marked
    }
}

impl OverviewSink for OverviewMarkers {
    fn add_matching_line(&mut self, line: usize) {
        self.lines.insert(line);
    }

    fn clear_matching_lines(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_lines_collapse() {
        let mut markers = OverviewMarkers::new();
        markers.add_matching_line(4);
        markers.add_matching_line(4);
        markers.add_matching_line(1);

        assert_eq!(markers.len(), 2);
        assert_eq!(markers.lines().collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn test_clear_twice_is_same_as_once() {
        let mut markers = OverviewMarkers::new();
        markers.add_matching_line(2);

        markers.clear_matching_lines();
        markers.clear_matching_lines();

        assert!(markers.is_empty());
        assert!(!markers.contains(2));
    }

    #[test]
    fn test_rows_scale_long_documents() {
        assert_eq!(OverviewMarkers::row_for(0, 1000, 10), 0);
        assert_eq!(OverviewMarkers::row_for(999, 1000, 10), 9);
        assert_eq!(OverviewMarkers::row_for(500, 1000, 10), 5);
        assert_eq!(OverviewMarkers::row_for(3, 5, 10), 3);

        let mut markers = OverviewMarkers::new();
        markers.add_matching_line(0);
        markers.add_matching_line(950);
        let rows = markers.marked_rows(1000, 4);
        assert_eq!(rows, vec![true, false, false, true]);
    }
}
