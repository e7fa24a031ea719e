//! Project document collection with hierarchical gitignore support

use crate::domain::Document;
use std::path::Path;

pub mod error;
pub mod matcher;
pub mod pattern;
pub mod scanner;

pub use error::ScanError;
pub use matcher::Matcher;
pub use pattern::{parse_pattern, MatchResult, Pattern};
pub use scanner::DocumentScanner;

/// Load every document under `root` that should be sent to the model.
///
/// `exclude_patterns` are extra gitignore patterns applied from the project
/// root; `max_file_bytes` is the inclusive per-file size limit.
pub fn load_documents<P: AsRef<Path>>(
    root: P,
    exclude_patterns: &[String],
    max_file_bytes: u64,
) -> Result<Vec<Document>, ScanError> {
    DocumentScanner::new(root.as_ref().to_path_buf())
        .exclude_patterns(exclude_patterns.to_vec())
        .max_file_bytes(max_file_bytes)
        .scan()
}
