//! Parsed gitignore rules scoped to a directory domain.

use globset::{GlobBuilder, GlobMatcher};

const NEGATION_PREFIX: char = '!';
const SEPARATOR: char = '/';
const ANY_DIRS: &str = "**";

/// Outcome of testing one pattern against a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    NoMatch,
    Exclude,
    Include,
}

#[derive(Debug, Clone)]
enum Segment {
    /// Empty component, e.g. the anchor produced by a leading `/`.
    Anchor,
    /// `**`: zero or more directories.
    AnyDirs,
    Glob(GlobMatcher),
    /// A component that can never match (uncompilable glob, or `**` mixed
    /// with other characters in an anchored pattern).
    Never,
}

impl Segment {
    fn compile(text: &str) -> Self {
        if text.is_empty() {
            return Segment::Anchor;
        }
        if text == ANY_DIRS {
            return Segment::AnyDirs;
        }
        match GlobBuilder::new(text).literal_separator(true).backslash_escape(true).build() {
            Ok(glob) => Segment::Glob(glob.compile_matcher()),
            Err(err) => {
                tracing::debug!("Unusable ignore glob {:?}: {}", text, err);
                Segment::Never
            }
        }
    }

    fn is_match(&self, name: &str) -> bool {
        match self {
            Segment::Glob(glob) => glob.is_match(name),
            // A simple name pattern of `**` behaves like `*`.
            Segment::AnyDirs => true,
            Segment::Anchor | Segment::Never => false,
        }
    }
}

/// One ignore rule.
///
/// Immutable once parsed. `domain` holds the directory segments leading to the
/// rule file that defined the pattern and is empty for root-level rules.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    negated: bool,
    directory_only: bool,
    domain: Vec<String>,
    anchored: bool,
    segments: Vec<Segment>,
}

/// Parse one line of rule-file syntax.
///
/// Never fails: malformed globs produce a pattern that matches nothing.
/// Callers drop blank and `#` comment lines beforehand.
pub fn parse_pattern(text: &str, domain: &[String]) -> Pattern {
    let raw = text.to_string();
    let mut body = text;

    let negated = body.starts_with(NEGATION_PREFIX);
    if negated {
        body = &body[NEGATION_PREFIX.len_utf8()..];
    }

    if !body.ends_with("\\ ") {
        body = body.trim_end_matches(' ');
    }

    let directory_only = body.ends_with(SEPARATOR);
    if directory_only {
        body = &body[..body.len() - 1];
    }

    let anchored = body.contains(SEPARATOR);
    let segments = body.split(SEPARATOR).map(|text| compile_component(text, anchored)).collect();

    Pattern { raw, negated, directory_only, domain: domain.to_vec(), anchored, segments }
}

/// In a name pattern `foo**` is an ordinary glob (`**` acts like `*`); only
/// anchored patterns reject `**` that is not a whole component.
fn compile_component(text: &str, anchored: bool) -> Segment {
    if anchored && text != ANY_DIRS && text.contains(ANY_DIRS) {
        return Segment::Never;
    }
    Segment::compile(text)
}

impl Pattern {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_directory_only(&self) -> bool {
        self.directory_only
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Test the pattern against a root-relative path.
    pub fn matches(&self, path: &[String], is_dir: bool) -> MatchResult {
        // The domain directory itself is out of scope; only entries below it.
        if path.len() <= self.domain.len() || !path.starts_with(&self.domain) {
            return MatchResult::NoMatch;
        }
        let below = &path[self.domain.len()..];

        let matched = if self.anchored {
            self.anchored_match(below, is_dir)
        } else {
            self.name_match(below, is_dir)
        };

        match (matched, self.negated) {
            (false, _) => MatchResult::NoMatch,
            (true, true) => MatchResult::Include,
            (true, false) => MatchResult::Exclude,
        }
    }

    /// Unanchored patterns match any single component; the first matching
    /// component decides.
    fn name_match(&self, path: &[String], is_dir: bool) -> bool {
        let Some(segment) = self.segments.first() else {
            return false;
        };
        for (idx, name) in path.iter().enumerate() {
            if !segment.is_match(name) {
                continue;
            }
            let is_leaf_file = idx == path.len() - 1 && !is_dir;
            return !(self.directory_only && is_leaf_file);
        }
        false
    }

    /// Anchored patterns match component by component from the domain root.
    /// A match on a prefix of the path covers everything below it.
    fn anchored_match(&self, path: &[String], is_dir: bool) -> bool {
        let mut rest = path;
        let mut matched = false;
        let mut traverse = false;
        let last = self.segments.len().saturating_sub(1);

        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Anchor => {
                    traverse = false;
                    continue;
                }
                Segment::AnyDirs => {
                    if idx == last {
                        break;
                    }
                    traverse = true;
                    continue;
                }
                Segment::Never => return false,
                Segment::Glob(_) => {}
            }

            if rest.is_empty() {
                return false;
            }

            if traverse {
                traverse = false;
                match rest.iter().position(|name| segment.is_match(name)) {
                    Some(pos) => {
                        matched = true;
                        rest = &rest[pos + 1..];
                    }
                    None => return false,
                }
            } else {
                if !segment.is_match(&rest[0]) {
                    return false;
                }
                matched = true;
                rest = &rest[1..];
            }
        }

        if matched && self.directory_only && !is_dir && rest.is_empty() {
            return false;
        }
        matched
    }
}
