use super::pattern::CompiledPattern;
use crate::document_model::LineIndex;
use std::ops::Range;
use tracing::trace;

/// One match in a specific text snapshot. `line` is the line holding `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

impl Match {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Finds every match of `pattern` in `text`, numbering lines from a fresh
/// line index of the same text.
pub fn scan(pattern: &CompiledPattern, text: &str) -> Vec<Match> {
    let lines = LineIndex::new(text);
    scan_with(pattern, text, |offset| lines.line_of(offset))
}

/// Leftmost-first, non-overlapping scan. After a match the search resumes at
/// its end; after an empty match it resumes one character further.
pub fn scan_with(
    pattern: &CompiledPattern,
    text: &str,
    line_of: impl Fn(usize) -> usize,
) -> Vec<Match> {
    let regex = pattern.regex();
    let mut matches = Vec::new();
    let mut at = 0;

    while at <= text.len() {
        let Some(found) = regex.find_at(text, at) else {
            break;
        };

        matches.push(Match {
            start: found.start(),
            end: found.end(),
            line: line_of(found.start()),
        });

        at = if found.end() > found.start() {
            found.end()
        } else {
            match text[found.end()..].chars().next() {
                Some(c) => found.end() + c.len_utf8(),
                None => break,
            }
        };
    }

    trace!(
        pattern = pattern.pattern().source(),
        matches = matches.len(),
        "scanned text"
    );
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::pattern::{CaseSetting, Pattern};

    fn find(source: &str, text: &str) -> Vec<Match> {
        let pattern = Pattern::new(source, CaseSetting::Smart).compile().unwrap();
        scan(&pattern, text)
    }

    fn starts(matches: &[Match]) -> Vec<usize> {
        matches.iter().map(|m| m.start).collect()
    }

    #[test]
    fn test_non_overlapping_matches() {
        let matches = find("ab", "ab ab ab");

        assert_eq!(matches.len(), 3);
        assert_eq!(starts(&matches), vec![0, 3, 6]);
        assert!(matches.iter().all(|m| m.len() == 2));
    }

    #[test]
    fn test_scan_resumes_after_match_end() {
        // "aa" in "aaaa" is two matches, never three
        assert_eq!(starts(&find("aa", "aaaa")), vec![0, 2]);
    }

    #[test]
    fn test_matches_carry_line_numbers() {
        let matches = find("x", "x\nfoo\nbar x x\n");

        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].line, 0);
        assert_eq!(matches[1].line, 2);
        assert_eq!(matches[2].line, 2);
    }

    #[test]
    fn test_zero_length_matches_terminate() {
        let matches = find("x*", "aé");

        // empty at 0, empty at 1 (before 'é'), empty at the end
        assert_eq!(starts(&matches), vec![0, 1, 3]);
        assert!(matches.iter().all(Match::is_empty));
    }

    #[test]
    fn test_empty_match_after_non_empty_match() {
        let matches = find("a*", "baaac");
        let ranges: Vec<_> = matches.iter().map(Match::range).collect();

        assert_eq!(ranges, vec![0..0, 1..4, 4..4, 5..5]);
    }

    #[test]
    fn test_no_truncation_on_large_text() {
        let text = "needle hay ".repeat(20_000);
        assert_eq!(find("needle", &text).len(), 20_000);
    }

    #[test]
    fn test_word_boundary_respects_context() {
        // find_at keeps the surrounding text visible to \b
        assert_eq!(starts(&find(r"\bab", "ab xab ab")), vec![0, 7]);
    }
}
