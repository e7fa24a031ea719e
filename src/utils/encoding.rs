//! Sample-based text detection.
//!
//! Only the head of a file is inspected, so a file may pass even though it
//! holds invalid bytes past the sample. The sample size is part of the
//! contract: it is what decides which files reach the model, and a character
//! cut in half by the sample boundary counts as invalid.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Number of bytes sampled from the start of a file.
pub const SAMPLE_SIZE: usize = 8 * 1024;

/// Check whether the first [`SAMPLE_SIZE`] bytes of a file are well-formed UTF-8.
///
/// Directories are never text files. Errors opening or reading the file are
/// returned to the caller; reaching end of file early is not an error.
pub fn is_valid_text_file(path: &Path) -> io::Result<bool> {
    let file = File::open(path)?;
    if file.metadata()?.is_dir() {
        return Ok(false);
    }

    let sample = read_sample(file, SAMPLE_SIZE)?;
    Ok(std::str::from_utf8(&sample).is_ok())
}

/// Read up to `limit` bytes, looping over short reads.
fn read_sample(file: File, limit: usize) -> io::Result<Vec<u8>> {
    let mut sample = Vec::with_capacity(limit);
    file.take(limit as u64).read_to_end(&mut sample)?;
    Ok(sample)
}
