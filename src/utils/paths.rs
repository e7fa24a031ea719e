//! Path helpers

use std::path::{Component, Path};

/// Split a path relative to the scan root into its segments.
///
/// The root itself (an empty relative path) has no segments.
pub fn path_segments(relative: &Path) -> Vec<String> {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}
