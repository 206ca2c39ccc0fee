//! Shared utilities for the cleaning engine.
//!
//! This module contains small helpers used across multiple modules so that
//! value parsing behaves identically everywhere.

use polars::prelude::DataType;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a polars DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Check if a polars DataType is a floating point type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Parse a string as a numeric literal (integer or float).
///
/// Only surrounding whitespace is ignored; currency symbols, thousands
/// separators and percent signs make the value non-numeric. NaN and the
/// infinities are not numbers for cleaning purposes.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::utils::parse_numeric_literal;
///
/// assert_eq!(parse_numeric_literal(" 42 "), Some(42.0));
/// assert_eq!(parse_numeric_literal("1e3"), Some(1000.0));
/// assert_eq!(parse_numeric_literal("$5"), None);
/// ```
pub fn parse_numeric_literal(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Check if a string can be parsed as a numeric literal.
pub fn is_numeric_literal(s: &str) -> bool {
    parse_numeric_literal(s).is_some()
}

/// 2^63, the first value past the `i64` range.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Check if a number has no fractional part and fits in an `i64`.
#[inline]
pub fn is_integral(value: f64) -> bool {
    value.fract() == 0.0 && (-I64_LIMIT..I64_LIMIT).contains(&value)
}

// =============================================================================
// Boolean Detection Utilities
// =============================================================================

/// Common boolean true representations.
pub const BOOLEAN_TRUE_VALUES: [&str; 6] = ["true", "yes", "1", "t", "y", "on"];

/// Common boolean false representations.
pub const BOOLEAN_FALSE_VALUES: [&str; 6] = ["false", "no", "0", "f", "n", "off"];

/// Parse a string as a boolean token, case-insensitively.
pub fn parse_boolean_token(s: &str) -> Option<bool> {
    let lower = s.trim().to_ascii_lowercase();
    if BOOLEAN_TRUE_VALUES.contains(&lower.as_str()) {
        Some(true)
    } else if BOOLEAN_FALSE_VALUES.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Truncate a string to `max_chars` characters, ending with an ellipsis when cut.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
