//! Shared parsing helpers for the cleaning pipeline.
//!
//! Profiling and coercion must agree on what counts as an integer, a real, a
//! boolean or a date, so both go through these functions.

use chrono::{NaiveDate, NaiveDateTime};

// =============================================================================
// Literal Parsing
// =============================================================================

/// Tokens accepted as booleans, compared case-insensitively.
pub const BOOLEAN_TOKENS: [(&str, bool); 6] = [
    ("true", true),
    ("false", false),
    ("yes", true),
    ("no", false),
    ("1", true),
    ("0", false),
];

/// Parse a boolean token (`true/false/yes/no/1/0`, any case).
pub fn parse_boolean_token(s: &str) -> Option<bool> {
    let trimmed = s.trim();
    BOOLEAN_TOKENS
        .iter()
        .find(|(token, _)| token.eq_ignore_ascii_case(trimmed))
        .map(|(_, value)| *value)
}

/// Parse an integer literal such as `42`, `-7` or `+3`.
pub fn parse_integer_literal(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

/// Parse a finite real. `nan` and `inf` are rejected.
pub fn parse_real_literal(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a date with the first matching format.
///
/// Formats carrying a time component are accepted too; the time is dropped.
pub fn parse_date<S: AsRef<str>>(s: &str, formats: &[S]) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    formats.iter().find_map(|format| {
        let format = format.as_ref();
        NaiveDate::parse_from_str(trimmed, format)
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(trimmed, format)
                    .ok()
                    .map(|dt| dt.date())
            })
    })
}

// =============================================================================
// Numeric Utilities
// =============================================================================

/// Percentage of `count` over `total`, zero when `total` is zero.
#[inline]
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}
