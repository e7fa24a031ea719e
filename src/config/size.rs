//! Human-readable byte sizes such as `20KB` or `1.5 MiB`.

use anyhow::{bail, Result};

/// Parse a size string into bytes.
///
/// SI units (`K`, `KB`, `M`, `MB`, ...) are powers of 1000 and IEC units
/// (`KiB`, `MiB`, ...) powers of 1024. Units are case-insensitive; a bare
/// number is a byte count. Fractional values are truncated to whole bytes.
pub fn parse_size(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    let split = trimmed.find(|c: char| !(c.is_ascii_digit() || c == '.')).unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    if number.is_empty() {
        bail!("Invalid size {:?}: missing number", input);
    }
    let value: f64 = number
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid size {:?}: bad number {:?}", input, number))?;

    let Some(multiplier) = unit_multiplier(unit.trim()) else {
        bail!("Invalid size {:?}: unknown unit {:?}", input, unit.trim());
    };

    let bytes = value * multiplier as f64;
    if !bytes.is_finite() || bytes > u64::MAX as f64 {
        bail!("Invalid size {:?}: too large", input);
    }
    Ok(bytes as u64)
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    const KB: u64 = 1000;
    const KIB: u64 = 1024;
    let multiplier = match unit.to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" => KB,
        "m" | "mb" => KB.pow(2),
        "g" | "gb" => KB.pow(3),
        "t" | "tb" => KB.pow(4),
        "ki" | "kib" => KIB,
        "mi" | "mib" => KIB.pow(2),
        "gi" | "gib" => KIB.pow(3),
        "ti" | "tib" => KIB.pow(4),
        _ => return None,
    };
    Some(multiplier)
}
