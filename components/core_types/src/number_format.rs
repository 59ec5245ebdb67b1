//! Number-to-text conversion used by ToString.
//!
//! Doubles are printed in one of three regimes chosen by magnitude:
//!
//! | `|n|`              | form                                             |
//! |--------------------|--------------------------------------------------|
//! | `[1e16, 1e21)`     | fixed, no fraction digits                         |
//! | `[1e-6, 1e-4]`     | fixed, ten fraction digits, trailing zeros cut    |
//! | anything else      | 16 significant digits, general notation           |
//!
//! General notation switches to an exponent when the decimal exponent is
//! below -4 or at least 16; the exponent carries an explicit sign and no
//! leading zeros (`1e+21`, `1.5e-7`).

/// Significant digits of the general regime.
const PRECISION: i32 = 16;

/// Decimal text of an Int32.
pub fn format_int32(n: i32) -> String {
    n.to_string()
}

/// Text of a finite double. Both zeros print as `"0"`.
pub fn format_double(d: f64) -> String {
    if d == 0.0 {
        return "0".to_string();
    }
    let magnitude = d.abs();
    if (1e16..1e21).contains(&magnitude) {
        format!("{:.0}", d)
    } else if (1e-6..=1e-4).contains(&magnitude) {
        strip_fraction_zeros(format!("{:.10}", d))
    } else {
        format_general(d)
    }
}

/// `%.16g` with the exponent's leading zeros removed.
fn format_general(d: f64) -> String {
    // Scientific form fixes the rounding and gives the decimal exponent.
    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, d);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };
    if exponent < -4 || exponent >= PRECISION {
        let mantissa = strip_fraction_zeros(mantissa.to_string());
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{}", mantissa, sign, exponent.abs())
    } else {
        let decimals = (PRECISION - 1 - exponent) as usize;
        strip_fraction_zeros(format!("{:.*}", decimals, d))
    }
}

/// Drop trailing zeros after a decimal point, and the point itself if
/// nothing follows it.
fn strip_fraction_zeros(mut text: String) -> String {
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    text
}
