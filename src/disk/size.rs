//! Human-readable partition sizes
//!
//! Sizes are carried as whole megabytes throughout the simulator; these
//! helpers convert to and from the `"50 GB"` / `"10240 MB"` strings users see
//! and type.

use regex::Regex;
use std::sync::OnceLock;

/// Smallest partition the disk rules accept
pub const MIN_PARTITION_SIZE_MB: u64 = 100;

/// Smallest amount a volume can be shrunk by
pub const MIN_SHRINK_SIZE_MB: u64 = 50;

/// MBR limit on primary partitions
pub const MAX_PRIMARY_PARTITIONS: usize = 4;

const MB_PER_GB: u64 = 1024;

fn size_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*(GB|MB)$").ok())
        .as_ref()
}

/// Format a size in MB, switching to GB from 1024 MB upwards.
///
/// GB values carry at most two decimals with trailing zeros dropped, so
/// `1536` becomes `"1.5 GB"` and `51200` becomes `"50 GB"`.
pub fn format_size(size_mb: u64) -> String {
    if size_mb >= MB_PER_GB {
        let hundredths = (size_mb as f64 / MB_PER_GB as f64 * 100.0).round() / 100.0;
        let mut text = format!("{:.2}", hundredths);
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
        format!("{} GB", text)
    } else {
        format!("{} MB", size_mb)
    }
}

/// Parse a size such as `"50 GB"` or `"10240mb"` into whole megabytes.
///
/// Returns 0 when the text does not match; callers treat 0 as invalid.
pub fn parse_size(text: &str) -> u64 {
    let Some(captures) = size_pattern().and_then(|pattern| pattern.captures(text.trim())) else {
        return 0;
    };

    let Ok(value) = captures[1].parse::<f64>() else {
        return 0;
    };

    let megabytes = if captures[2].eq_ignore_ascii_case("GB") {
        value * MB_PER_GB as f64
    } else {
        value
    };

    megabytes.round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_megabytes_below_one_gigabyte() {
        assert_eq!(format_size(0), "0 MB");
        assert_eq!(format_size(900), "900 MB");
        assert_eq!(format_size(1023), "1023 MB");
    }

    #[test]
    fn formats_gigabytes_without_trailing_zeros() {
        assert_eq!(format_size(1024), "1 GB");
        assert_eq!(format_size(1536), "1.5 GB");
        assert_eq!(format_size(51200), "50 GB");
        assert_eq!(format_size(1100), "1.07 GB");
    }

    #[test]
    fn parses_units_case_insensitively() {
        assert_eq!(parse_size("50 GB"), 51200);
        assert_eq!(parse_size("10240 MB"), 10240);
        assert_eq!(parse_size("  2gb "), 2048);
        assert_eq!(parse_size("1.5 Gb"), 1536);
        assert_eq!(parse_size("100mb"), 100);
    }

    #[test]
    fn rejects_malformed_sizes() {
        assert_eq!(parse_size(""), 0);
        assert_eq!(parse_size("50"), 0);
        assert_eq!(parse_size("GB"), 0);
        assert_eq!(parse_size("-5 GB"), 0);
        assert_eq!(parse_size("5 TB"), 0);
        assert_eq!(parse_size("five GB"), 0);
    }
}
