use super::scanner::Match;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavAction {
    Previous,
    Next,
}

/// Picks the next or previous match relative to a caret offset.
///
/// Matches must be ascending by start offset, as the scanner produces them.
#[derive(Debug, Clone, Copy)]
pub struct MatchNavigator {
    pub wrap_search: bool,
}

impl Default for MatchNavigator {
    fn default() -> Self {
        Self { wrap_search: true }
    }
}

impl MatchNavigator {
    pub fn new(wrap_search: bool) -> Self {
        Self { wrap_search }
    }

    pub fn step(&self, action: NavAction, matches: &[Match], caret: usize) -> Option<usize> {
        match action {
            NavAction::Next => self.next(matches, caret),
            NavAction::Previous => self.previous(matches, caret),
        }
    }

    /// Index of the first match starting strictly after `caret`.
    pub fn next(&self, matches: &[Match], caret: usize) -> Option<usize> {
        if matches.is_empty() {
            return None;
        }

        let idx = matches.partition_point(|m| m.start <= caret);
        if idx < matches.len() {
            Some(idx)
        } else if self.wrap_search {
            Some(0)
        } else {
            None
        }
    }

    /// Index of the last match starting strictly before `caret`.
    pub fn previous(&self, matches: &[Match], caret: usize) -> Option<usize> {
        if matches.is_empty() {
            return None;
        }

        match matches.partition_point(|m| m.start < caret) {
            0 if self.wrap_search => Some(matches.len() - 1),
            0 => None,
            idx => Some(idx - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_at(starts: &[usize]) -> Vec<Match> {
        starts
            .iter()
            .map(|&start| Match {
                start,
                end: start + 2,
                line: 0,
            })
            .collect()
    }

    #[test]
    fn test_next_wraps_to_first() {
        let matches = matches_at(&[3, 10, 17]);
        let nav = MatchNavigator::default();

        assert_eq!(nav.next(&matches, 20), Some(0));
        assert_eq!(nav.next(&matches, 17), Some(0));
        assert_eq!(nav.next(&matches, 0), Some(0));
        assert_eq!(nav.next(&matches, 3), Some(1));
        assert_eq!(nav.next(&matches, 11), Some(2));
    }

    #[test]
    fn test_previous_wraps_to_last() {
        let matches = matches_at(&[3, 10, 17]);
        let nav = MatchNavigator::default();

        assert_eq!(nav.previous(&matches, 0), Some(2));
        assert_eq!(nav.previous(&matches, 3), Some(2));
        assert_eq!(nav.previous(&matches, 10), Some(0));
        assert_eq!(nav.previous(&matches, 20), Some(2));
    }

    #[test]
    fn test_empty_list_finds_nothing() {
        let nav = MatchNavigator::default();

        assert_eq!(nav.next(&[], 5), None);
        assert_eq!(nav.previous(&[], 5), None);
        assert_eq!(nav.step(NavAction::Next, &[], 0), None);
    }

    #[test]
    fn test_no_wrap() {
        let matches = matches_at(&[3, 10, 17]);
        let nav = MatchNavigator::new(false);

        assert_eq!(nav.next(&matches, 17), None);
        assert_eq!(nav.previous(&matches, 3), None);
        assert_eq!(nav.step(NavAction::Next, &matches, 10), Some(2));
    }
}
