//! Scan failures.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a scan. Filtering outcomes (size, encoding, ignore
/// rules) are never errors.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Cannot read project root {}: {source}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

impl ScanError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ScanError::Io { path: path.into(), source }
    }
}
