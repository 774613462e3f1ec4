//! Human-readable numbers for the result page.

use std::time::Duration;

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Insert `,` between groups of three digits.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format with at most `decimals` fractional digits, trimming trailing zeros.
fn trimmed(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let formatted = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };
    let (int, frac) = match formatted.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (formatted, None),
    };

    let mut out = String::new();
    if value < 0.0 && formatted.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int));
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// `1536` → `1.5 KB`, `-2048` → `-2 KB`, `0` → `0 B`.
pub fn format_file_size(bytes: i64) -> String {
    let magnitude = bytes.unsigned_abs();
    let mut unit = 0;
    let mut scaled = magnitude as f64;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    let signed = if bytes < 0 { -scaled } else { scaled };
    format!("{} {}", trimmed(signed, 1), UNITS[unit])
}

/// `0.4` → `40%`, `0.12346` → `12.35%`, `-0.1` → `-10%`.
pub fn format_percentage(ratio: f64) -> String {
    format!("{}%", trimmed(ratio * 100.0, 2))
}

/// Whole milliseconds with thousands separators.
pub fn format_millis(elapsed: Duration) -> String {
    group_thousands(&elapsed.as_millis().to_string())
}

/// Size label used under each image: integer KB, truncated.
pub fn kilobytes(len: usize) -> usize {
    len / 1024
}
