//! Typed conversion of field text.
//!
//! Conversions follow C library prefix parsing: leading whitespace is
//! skipped and anything after the longest numeric prefix is ignored. A field
//! without a numeric prefix converts to zero.

use crate::matrix::BFloat16;

/// A value type that can be read from a field.
pub trait FromField: Sized {
    /// Convert non-empty field text.
    fn from_field(text: &str) -> Self;
}

impl FromField for i32 {
    fn from_field(text: &str) -> Self {
        parse_i32_prefix(text)
    }
}

impl FromField for f64 {
    fn from_field(text: &str) -> Self {
        clamp_f64(parse_f64_prefix(text))
    }
}

impl FromField for f32 {
    fn from_field(text: &str) -> Self {
        clamp_to_f32(parse_f64_prefix(text))
    }
}

impl FromField for BFloat16 {
    fn from_field(text: &str) -> Self {
        BFloat16::from_f32(f32::from_field(text))
    }
}

impl FromField for String {
    fn from_field(text: &str) -> Self {
        text.to_string()
    }
}

/// C `isspace` set.
#[inline]
const fn is_c_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

#[inline]
fn starts_with_ignore_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

/// Length of the longest prefix that `strtod` would consume, including
/// leading whitespace. Returns 0 if no number starts the input.
pub fn scan_number(s: &[u8]) -> usize {
    let mut i = 0;
    while i < s.len() && is_c_space(s[i]) {
        i += 1;
    }
    if i < s.len() && (s[i] == b'+' || s[i] == b'-') {
        i += 1;
    }

    let rest = &s[i..];
    if starts_with_ignore_case(rest, b"infinity") {
        return i + 8;
    }
    if starts_with_ignore_case(rest, b"inf") || starts_with_ignore_case(rest, b"nan") {
        return i + 3;
    }

    let int_start = i;
    while i < s.len() && s[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < s.len() && s[i] == b'.' {
        let mut j = i + 1;
        while j < s.len() && s[j].is_ascii_digit() {
            j += 1;
        }
        mantissa_digits += j - (i + 1);
        if mantissa_digits > 0 {
            i = j;
        }
    }
    if mantissa_digits == 0 {
        return 0;
    }

    if i < s.len() && (s[i] == b'e' || s[i] == b'E') {
        let mut j = i + 1;
        if j < s.len() && (s[j] == b'+' || s[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < s.len() && s[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}

/// Returns true if the whole string is one number (empty counts as a number).
///
/// Leading whitespace is accepted, trailing bytes of any kind are not.
pub fn is_number(s: &str) -> bool {
    s.is_empty() || scan_number(s.as_bytes()) == s.len()
}

/// Parse the floating point prefix of `text`, 0.0 if there is none.
pub fn parse_f64_prefix(text: &str) -> f64 {
    let len = scan_number(text.as_bytes());
    if len == 0 {
        return 0.0;
    }
    text[..len].trim_start().parse::<f64>().unwrap_or(0.0)
}

/// Parse the integer prefix of `text`, saturating at the `i32` bounds.
pub fn parse_i32_prefix(text: &str) -> i32 {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() && is_c_space(bytes[i]) {
        i += 1;
    }
    let negative = match bytes.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        value = (value * 10 + i64::from(bytes[i] - b'0')).min(i64::from(i32::MAX) + 1);
        i += 1;
    }
    let value = if negative { -value } else { value };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Clamp to the finite `f32` range; NaN passes through.
#[inline]
pub fn clamp_to_f32(d: f64) -> f32 {
    if d > f64::from(f32::MAX) {
        f32::MAX
    } else if d < f64::from(f32::MIN) {
        f32::MIN
    } else {
        d as f32
    }
}

/// Clamp infinities to the finite `f64` range; NaN passes through.
#[inline]
pub fn clamp_f64(d: f64) -> f64 {
    if d > f64::MAX {
        f64::MAX
    } else if d < f64::MIN {
        f64::MIN
    } else {
        d
    }
}
