// ABOUTME: Fuzzy ranking of browser labels for incremental search
// Subsequence matching is case-insensitive; ties keep the original listing order
// The whole query, spaces included, is one needle

use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use tracing::debug;

/// A scored match against one label of the ranked list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedMatch {
    /// Index of the label in the list that was ranked
    pub index: usize,
    pub score: u32,
}

/// Ranks labels against a query, best first.
///
/// Labels that do not contain the query as a subsequence are dropped. The
/// sort is stable, so equal scores keep the order they were listed in.
pub struct FuzzyMatcher {
    matcher: Matcher,
    buf: Vec<char>,
}

impl FuzzyMatcher {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::with_capacity(64),
        }
    }

    pub fn rank<S: AsRef<str>>(&mut self, query: &str, labels: &[S]) -> Vec<RankedMatch> {
        let needle = Atom::new(
            query,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
            false,
        );

        let mut matches: Vec<RankedMatch> = labels
            .iter()
            .enumerate()
            .filter_map(|(index, label)| {
                self.buf.clear();
                let haystack = Utf32Str::new(label.as_ref(), &mut self.buf);
                needle
                    .score(haystack, &mut self.matcher)
                    .map(|score| RankedMatch {
                        index,
                        score: u32::from(score),
                    })
            })
            .collect();

        matches.sort_by(|a, b| b.score.cmp(&a.score));

        debug!(
            "Fuzzy query '{}' matched {} of {} labels",
            query,
            matches.len(),
            labels.len()
        );
        matches
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FuzzyMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzyMatcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(matches: &[RankedMatch]) -> Vec<usize> {
        matches.iter().map(|m| m.index).collect()
    }

    #[test]
    fn test_subsequence_match() {
        let mut matcher = FuzzyMatcher::new();
        let labels = ["Firefox.AppImage", "krita.AppImage", "notes.txt"];

        let matches = matcher.rank("ffx", &labels);
        assert_eq!(indices(&matches), vec![0]);
    }

    #[test]
    fn test_spaces_are_part_of_the_query() {
        let mut matcher = FuzzyMatcher::new();
        let labels = ["ab", "a b.AppImage", "b_a", "app_my.AppImage", "My App.AppImage"];

        assert_eq!(indices(&matcher.rank("a b", &labels)), vec![1]);
        assert_eq!(indices(&matcher.rank("my app", &labels)), vec![4]);
    }

    #[test]
    fn test_query_characters_are_literal() {
        let mut matcher = FuzzyMatcher::new();
        let labels = ["^app", "app", "!notes"];

        assert_eq!(indices(&matcher.rank("^a", &labels)), vec![0]);
        assert_eq!(indices(&matcher.rank("!n", &labels)), vec![2]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let mut matcher = FuzzyMatcher::new();
        let labels = ["alpha", "beta"];

        assert!(matcher.rank("xyz", &labels).is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let mut matcher = FuzzyMatcher::new();
        let labels = ["KRITA.AppImage"];

        assert_eq!(indices(&matcher.rank("krita", &labels)), vec![0]);
    }

    #[test]
    fn test_ties_keep_listing_order() {
        let mut matcher = FuzzyMatcher::new();
        let labels = ["abc", "abc", "abc"];

        assert_eq!(indices(&matcher.rank("abc", &labels)), vec![0, 1, 2]);
    }

    #[test]
    fn test_better_match_ranks_first() {
        let mut matcher = FuzzyMatcher::new();
        let labels = ["a_x_p_x_p", "app"];

        let matches = matcher.rank("app", &labels);
        assert_eq!(matches.first().map(|m| m.index), Some(1));
    }

    #[test]
    fn test_repeated_query_is_idempotent() {
        let mut matcher = FuzzyMatcher::new();
        let labels = ["src", "Downloads", "docs", "Desktop", "..", "dist"];

        let first = matcher.rank("ds", &labels);
        let second = matcher.rank("ds", &labels);
        assert_eq!(first, second);
    }
}
