//! Score coercion: loose JSON numbers/strings -> fixed-precision `f64`.

use serde_json::Value;

/// Number of decimal digits kept on every score.
pub const SCORE_DECIMALS: usize = 4;

/// Coerce an API value into a score rounded to [`SCORE_DECIMALS`] digits.
///
/// Numbers are rounded directly, strings are parsed as decimals first.
/// Anything that doesn't yield a finite number (empty or non-numeric text,
/// `"NaN"`, `null`, booleans, arrays, objects) becomes `None`.
pub fn coerce_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(round_score),
        Value::String(s) => parse_score(s),
        _ => None,
    }
}

/// Parse a textual score. Surrounding whitespace is ignored; trailing garbage is not.
pub fn parse_score(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().and_then(round_score)
}

/// Round half away from zero at [`SCORE_DECIMALS`] digits.
///
/// Rounding works on the shortest decimal form of `value` (what `{}` prints),
/// so a literal `0.00015` rounds up to `0.0002` even though its binary value
/// sits just below the half-way point.
pub fn round_score(value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    let rounded = round_decimal(&value.to_string(), SCORE_DECIMALS)?;
    // Fold -0.0 into 0.0 so exports don't print "-0".
    Some(if rounded == 0.0 { 0.0 } else { rounded })
}

/// Round a plain decimal string (`-?digits[.digits]`) to `decimals` places.
fn round_decimal(repr: &str, decimals: usize) -> Option<f64> {
    let (negative, magnitude) = match repr.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, repr),
    };
    let (int_part, frac_part) = magnitude.split_once('.').unwrap_or((magnitude, ""));
    if frac_part.len() <= decimals {
        return repr.parse().ok();
    }

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(decimals))
        .collect();
    if frac_part.as_bytes()[decimals] >= b'5' {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - decimals;
    let text = format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        std::str::from_utf8(&digits[..split]).ok()?,
        std::str::from_utf8(&digits[split..]).ok()?
    );
    text.parse().ok()
}
