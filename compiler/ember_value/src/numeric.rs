//! Numeric interpretation of strings.
//!
//! Strings convert to numbers by their longest numeric prefix after leading
//! whitespace: `"12abc"` is 12, `" 1.5e3x"` is 1500.0, `"abc"` is 0.

/// A number produced by coercion: arithmetic stays in `Long` until a
/// `Double` operand (or overflow) forces floating point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Numeric {
    Long(i64),
    Double(f64),
}

impl Numeric {
    #[inline]
    pub fn to_double(self) -> f64 {
        match self {
            Numeric::Long(l) => l as f64,
            Numeric::Double(d) => d,
        }
    }
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Scan the numeric prefix of `s`. Returns the number and the byte offset
/// where the prefix ends, or `None` if no digit was found.
fn scan(s: &str) -> Option<(Numeric, usize)> {
    let bytes = s.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() && is_space(bytes[pos]) {
        pos += 1;
    }
    let start = pos;
    if pos < bytes.len() && matches!(bytes[pos], b'+' | b'-') {
        pos += 1;
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = pos - int_start;

    let mut is_double = false;
    let mut frac_digits = 0;
    if pos < bytes.len() && bytes[pos] == b'.' {
        let mut p = pos + 1;
        while p < bytes.len() && bytes[p].is_ascii_digit() {
            p += 1;
        }
        frac_digits = p - pos - 1;
        if int_digits > 0 || frac_digits > 0 {
            is_double = true;
            pos = p;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    // Exponent only counts when digits follow it.
    if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        let mut p = pos + 1;
        if p < bytes.len() && matches!(bytes[p], b'+' | b'-') {
            p += 1;
        }
        let exp_start = p;
        while p < bytes.len() && bytes[p].is_ascii_digit() {
            p += 1;
        }
        if p > exp_start {
            is_double = true;
            pos = p;
        }
    }

    let text = &s[start..pos];
    let number = if is_double {
        Numeric::Double(text.parse().unwrap_or(0.0))
    } else {
        match text.parse::<i64>() {
            Ok(l) => Numeric::Long(l),
            Err(_) => Numeric::Double(text.parse().unwrap_or(0.0)),
        }
    };
    Some((number, pos))
}

/// Numeric value of the longest numeric prefix of `s` (0 if none).
pub fn parse_numeric_prefix(s: &str) -> Numeric {
    scan(s).map_or(Numeric::Long(0), |(number, _)| number)
}

/// Whether the whole of `s` is numeric, allowing surrounding whitespace.
pub fn is_numeric_str(s: &str) -> bool {
    match scan(s) {
        Some((_, end)) => s.as_bytes()[end..].iter().all(|&b| is_space(b)),
        None => false,
    }
}

/// The number `s` denotes if it is entirely numeric.
pub fn parse_numeric(s: &str) -> Option<Numeric> {
    match scan(s) {
        Some((number, end)) if s.as_bytes()[end..].iter().all(|&b| is_space(b)) => Some(number),
        _ => None,
    }
}

/// Whether `s` is the canonical decimal form of an `i64` (`"0"`, `"-12"`,
/// not `"012"`, `"+1"` or `"-0"`). Such strings are integer array keys.
pub fn canonical_long(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let bytes = digits.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes[0] == b'0' && (bytes.len() > 1 || s.starts_with('-')) {
        return None;
    }
    s.parse().ok()
}
