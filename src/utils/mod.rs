//! Shared helpers

pub mod encoding;
pub mod paths;

pub use encoding::{is_valid_text_file, SAMPLE_SIZE};
pub use paths::path_segments;

/// Format an integer with thousands separators, e.g. `12,345`.
pub fn format_with_commas(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
