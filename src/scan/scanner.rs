//! Document scanner with hierarchical gitignore support

use super::error::ScanError;
use super::matcher::Matcher;
use super::pattern::{parse_pattern, Pattern};
use crate::domain::{Document, ScanStats, APP_DIR, RULE_FILE_NAME};
use crate::utils::{is_valid_text_file, path_segments};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories that never reach the model, whatever the configuration says.
pub const BUILTIN_EXCLUDES: &[&str] = &[".git", APP_DIR];

/// Default per-file size limit when none is configured (20 KB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 20_000;

/// Walks a project and collects the text documents that survive ignore rules,
/// the size limit and the UTF-8 sample check.
///
/// Each scan owns its pattern list; nothing carries over between scans.
pub struct DocumentScanner {
    root_path: PathBuf,
    exclude_patterns: Vec<String>,
    max_file_bytes: u64,
    stats: ScanStats,
}

impl DocumentScanner {
    /// Create a new DocumentScanner with default settings.
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            exclude_patterns: Vec::new(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            stats: ScanStats::default(),
        }
    }

    /// Set extra gitignore patterns applied from the project root
    pub fn exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Set maximum file size in bytes (inclusive)
    pub fn max_file_bytes(mut self, max_bytes: u64) -> Self {
        self.max_file_bytes = max_bytes;
        self
    }

    /// Get scanning statistics
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Scan the project and return its documents in traversal order.
    ///
    /// Order follows the filesystem's directory listing and is not sorted.
    /// Any I/O failure aborts the scan; no partial result is returned.
    pub fn scan(&mut self) -> Result<Vec<Document>, ScanError> {
        self.stats = ScanStats::default();
        check_root(&self.root_path)?;

        let builtin: Vec<Pattern> =
            BUILTIN_EXCLUDES.iter().map(|text| parse_pattern(text, &[])).collect();
        // Enforced ahead of the main matcher so later negations cannot lift them.
        let builtin_matcher = Matcher::new(&builtin);

        let mut patterns = builtin;
        patterns.extend(self.exclude_patterns.iter().map(|text| parse_pattern(text, &[])));
        let mut matcher = Matcher::new(&patterns);

        let mut documents = Vec::new();
        let mut walker = WalkDir::new(&self.root_path).follow_links(false).into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry?;
            let path = entry.path();

            let relative = match path.strip_prefix(&self.root_path) {
                Ok(p) => p,
                Err(_) => continue,
            };
            let segments = path_segments(relative);
            let is_dir = entry.file_type().is_dir();

            if entry.depth() > 0 {
                self.stats.entries_visited += 1;

                if builtin_matcher.is_excluded(&segments, is_dir)
                    || matcher.is_excluded(&segments, is_dir)
                {
                    if is_dir {
                        tracing::debug!("Pruning excluded directory {}", relative.display());
                        self.stats.dirs_pruned += 1;
                        walker.skip_current_dir();
                    } else {
                        tracing::debug!("Skipping excluded file {}", relative.display());
                        self.stats.files_skipped_pattern += 1;
                    }
                    continue;
                }
            }

            if is_dir {
                let rules = read_rule_file(path, &segments)?;
                if !rules.is_empty() {
                    tracing::debug!(
                        "Loaded {} ignore rules from {}",
                        rules.len(),
                        path.join(RULE_FILE_NAME).display()
                    );
                    self.stats.rule_files_loaded += 1;
                    patterns.extend(rules);
                    matcher = Matcher::new(&patterns);
                }
                continue;
            }

            let file_type = entry.file_type();
            let size = if file_type.is_file() {
                entry.metadata()?.len()
            } else if file_type.is_symlink() {
                // Links are read through, so the limit applies to the target.
                match fs::metadata(path) {
                    Ok(target) if target.is_file() => target.len(),
                    _ => {
                        tracing::debug!("Skipping link {} (no file target)", relative.display());
                        continue;
                    }
                }
            } else {
                // Sockets, FIFOs and devices are not documents.
                continue;
            };

            if size > self.max_file_bytes {
                tracing::debug!(
                    "Skipping {} ({} bytes > {} byte limit)",
                    relative.display(),
                    size,
                    self.max_file_bytes
                );
                self.stats.files_skipped_size += 1;
                continue;
            }

            match is_valid_text_file(path) {
                Ok(true) => {}
                Ok(false) | Err(_) => {
                    tracing::debug!("Skipping non-text file {}", relative.display());
                    self.stats.files_skipped_encoding += 1;
                    continue;
                }
            }

            let content = read_text(path)?;
            self.stats.files_included += 1;
            self.stats.bytes_included += content.len() as u64;
            documents.push(Document { path: segments.join("/"), content });
        }

        tracing::info!(
            "Collected {} documents from {} ({} skipped, {} directories pruned)",
            documents.len(),
            self.root_path.display(),
            self.stats.files_skipped(),
            self.stats.dirs_pruned
        );

        Ok(documents)
    }
}

fn check_root(root: &Path) -> Result<(), ScanError> {
    let metadata =
        fs::metadata(root).map_err(|source| ScanError::Root { path: root.to_path_buf(), source })?;
    if !metadata.is_dir() {
        return Err(ScanError::Root {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        });
    }
    Ok(())
}

/// Parse the rule file directly inside `dir`, if there is one.
///
/// Patterns are scoped to `domain`, the directory's segments (empty for the
/// project root). Blank lines and `#` comments are dropped.
fn read_rule_file(dir: &Path, domain: &[String]) -> Result<Vec<Pattern>, ScanError> {
    let rule_path = dir.join(RULE_FILE_NAME);
    if !rule_path.is_file() {
        return Ok(Vec::new());
    }

    let bytes = fs::read(&rule_path).map_err(|err| ScanError::io(&rule_path, err))?;
    let content = String::from_utf8_lossy(&bytes);

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| parse_pattern(line, domain))
        .collect())
}

/// Read a whole file as text.
///
/// Only the head of the file was validated; invalid bytes further in are
/// replaced rather than failing the scan.
fn read_text(path: &Path) -> Result<String, ScanError> {
    let bytes = fs::read(path).map_err(|err| ScanError::io(path, err))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}
