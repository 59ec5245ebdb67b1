//! Numeric-string parsing.
//!
//! Implements the StringNumericLiteral grammar: surrounding white space and
//! line terminators are skipped, the empty string is `0`, and anything the
//! grammar rejects is reported as `None`. "Not a number" is a legal outcome
//! for a string, so it is never an error here.

use crate::js_string::JsString;

/// Whether `unit` is a white space or line terminator code unit.
pub fn is_js_whitespace(unit: u16) -> bool {
    matches!(
        unit,
        0x0009 | 0x000A | 0x000B | 0x000C | 0x000D | 0x0020 | 0x00A0 | 0x1680
            | 0x2000..=0x200A
            | 0x2028 | 0x2029 | 0x202F | 0x205F | 0x3000 | 0xFEFF
    )
}

/// Trimmed ASCII body of `s`, or `None` if a non-ASCII code unit remains
/// after trimming (no numeric literal contains one).
fn trimmed_ascii(s: &JsString) -> Option<String> {
    let units: Vec<u16> = s.code_units().collect();
    let start = units
        .iter()
        .position(|&u| !is_js_whitespace(u))
        .unwrap_or(units.len());
    let end = units
        .iter()
        .rposition(|&u| !is_js_whitespace(u))
        .map_or(start, |i| i + 1);
    units[start..end]
        .iter()
        .map(|&u| if u < 0x80 { Some(u as u8 as char) } else { None })
        .collect()
}

/// Accumulate `digits` in `radix`. At least one digit is required.
fn parse_radix_digits(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    let mut value = 0.0f64;
    for ch in digits.chars() {
        let d = ch.to_digit(radix)?;
        value = value * f64::from(radix) + f64::from(d);
    }
    Some(value)
}

fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    if text.len() >= prefix.len() && text[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

/// Decimal literal with optional sign, fraction and exponent.
fn parse_decimal(text: &str) -> Option<f64> {
    let (negative, body) = match text.as_bytes().first() {
        Some(b'+') => (false, &text[1..]),
        Some(b'-') => (true, &text[1..]),
        _ => (false, text),
    };
    if body == "Infinity" {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let bytes = body.as_bytes();
    let mut i = 0;
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        mantissa_digits += i - frac_start;
    }
    if mantissa_digits == 0 {
        return None;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
    }
    if i != bytes.len() {
        return None;
    }

    let magnitude: f64 = body.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse `s` as a number in `base`.
///
/// Base 10 accepts the full literal grammar, including `Infinity` and the
/// `0x`/`0o`/`0b` prefixes. Base 16 accepts an optional `0x` prefix and base 8
/// an optional `0o` or `0` prefix. Any other base in `2..=36` accepts plain
/// digits of that radix. Returns `None` when the text is not convertible.
pub fn str_to_number_base(s: &JsString, base: u32) -> Option<f64> {
    let text = trimmed_ascii(s)?;
    if text.is_empty() {
        return Some(0.0);
    }
    match base {
        10 => {
            if let Some(rest) = strip_prefix_ci(&text, "0x") {
                parse_radix_digits(rest, 16)
            } else if let Some(rest) = strip_prefix_ci(&text, "0o") {
                parse_radix_digits(rest, 8)
            } else if let Some(rest) = strip_prefix_ci(&text, "0b") {
                parse_radix_digits(rest, 2)
            } else {
                parse_decimal(&text)
            }
        }
        16 => parse_radix_digits(strip_prefix_ci(&text, "0x").unwrap_or(&text), 16),
        8 => {
            let rest = strip_prefix_ci(&text, "0o")
                .or_else(|| text.strip_prefix('0').filter(|r| !r.is_empty()))
                .unwrap_or(&text);
            parse_radix_digits(rest, 8)
        }
        2..=36 => parse_radix_digits(&text, base),
        _ => None,
    }
}

/// Parse `s` as a decimal numeric literal.
pub fn str_to_double(s: &JsString) -> Option<f64> {
    str_to_number_base(s, 10)
}

/// Whether `s` converts to a number other than NaN.
pub fn is_numeric_string(s: &JsString) -> bool {
    str_to_double(s).is_some()
}
