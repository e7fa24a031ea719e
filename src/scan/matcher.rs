//! Last-match-wins evaluation over an ordered pattern list.

use super::pattern::{MatchResult, Pattern};

/// Ordered set of ignore patterns.
///
/// Always built from the whole accumulated list so precedence is recomputed
/// whenever a rule file is merged in. Later patterns take precedence over
/// earlier ones regardless of how specific their domains are.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    patterns: Vec<Pattern>,
}

impl Matcher {
    pub fn new(patterns: &[Pattern]) -> Self {
        Self { patterns: patterns.to_vec() }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether the path is excluded. Unmatched paths are included.
    pub fn is_excluded(&self, path: &[String], is_dir: bool) -> bool {
        self.patterns
            .iter()
            .rev()
            .map(|pattern| pattern.matches(path, is_dir))
            .find(|result| *result != MatchResult::NoMatch)
            .is_some_and(|result| result == MatchResult::Exclude)
    }
}
