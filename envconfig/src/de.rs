//! Conversion of raw environment values into field values
//!
//! Integers are base-detected (`0x`, `0o`, `0b`, a leading `0` for octal,
//! otherwise decimal), may use `_` between digits, and are range checked
//! against the width of the field.
//! Durations use the `1h30m`, `250ms`, `1.5s` notation.

use std::str::FromStr;
use std::time::Duration;

use crate::spec::Slot;

/// The raw value could not be converted to the field's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Invalid;

impl Slot<'_> {
    /// Convert `value` to the slot's kind and store it.
    ///
    /// Nothing is written when the conversion fails. Unsupported slots
    /// accept any value and stay untouched.
    pub(crate) fn assign(self, value: &str) -> Result<(), Invalid> {
        match self {
            Slot::String(field) => *field = value.to_string(),
            // Never the integer grammar, even though the value is a count of nanoseconds.
            Slot::Duration(field) => *field = duration(value)?,
            Slot::I8(field) => *field = signed(value)?,
            Slot::I16(field) => *field = signed(value)?,
            Slot::I32(field) => *field = signed(value)?,
            Slot::I64(field) => *field = signed(value)?,
            Slot::Isize(field) => *field = signed(value)?,
            Slot::U8(field) => *field = unsigned(value)?,
            Slot::U16(field) => *field = unsigned(value)?,
            Slot::U32(field) => *field = unsigned(value)?,
            Slot::U64(field) => *field = unsigned(value)?,
            Slot::Usize(field) => *field = unsigned(value)?,
            Slot::Bool(field) => *field = parse_bool(value).ok_or(Invalid)?,
            Slot::F32(field) => *field = parse_float(value, f32::is_infinite).ok_or(Invalid)?,
            Slot::F64(field) => *field = parse_float(value, f64::is_infinite).ok_or(Invalid)?,
            Slot::Unsupported => {}
        }
        Ok(())
    }
}

fn bits_of<T>() -> u32 {
    // Integer widths are at most 128 bits, so this never truncates.
    (std::mem::size_of::<T>() * 8) as u32
}

fn signed<T: TryFrom<i64>>(value: &str) -> Result<T, Invalid> {
    parse_int(value, bits_of::<T>())
        .and_then(|n| T::try_from(n).ok())
        .ok_or(Invalid)
}

fn unsigned<T: TryFrom<u64>>(value: &str) -> Result<T, Invalid> {
    parse_uint(value, bits_of::<T>())
        .and_then(|n| T::try_from(n).ok())
        .ok_or(Invalid)
}

fn duration(value: &str) -> Result<Duration, Invalid> {
    let nanos = parse_duration(value).ok_or(Invalid)?;
    // Duration cannot hold a negative interval.
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|_| Invalid)
}

/// Parse a signed integer that must fit in `bits` bits.
pub fn parse_int(s: &str, bits: u32) -> Option<i64> {
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = parse_magnitude(digits)?;
    let limit = 1_u64 << (bits.clamp(1, 64) - 1);

    if negative {
        if magnitude > limit {
            return None;
        }
        0_i64.checked_sub_unsigned(magnitude)
    } else if magnitude >= limit {
        None
    } else {
        i64::try_from(magnitude).ok()
    }
}

/// Parse an unsigned integer that must fit in `bits` bits. Signs are rejected.
pub fn parse_uint(s: &str, bits: u32) -> Option<u64> {
    let n = parse_magnitude(s)?;
    if bits < 64 && n >> bits != 0 {
        return None;
    }
    Some(n)
}

fn parse_magnitude(s: &str) -> Option<u64> {
    let (radix, digits, prefixed) = if let Some(rest) = strip_base(s, 'x') {
        (16, rest, true)
    } else if let Some(rest) = strip_base(s, 'o') {
        (8, rest, true)
    } else if let Some(rest) = strip_base(s, 'b') {
        (2, rest, true)
    } else if s.len() > 1 && s.starts_with('0') {
        (8, &s[1..], true)
    } else {
        (10, s, false)
    };

    if digits.contains('_') && !underscores_ok(digits, prefixed) {
        return None;
    }
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(&cleaned, radix).ok()
}

fn strip_base(s: &str, base: char) -> Option<&str> {
    let rest = s.strip_prefix('0')?;
    rest.strip_prefix(base)
        .or_else(|| rest.strip_prefix(base.to_ascii_uppercase()))
}

/// `_` may only separate digits, or follow a base prefix directly.
fn underscores_ok(digits: &str, prefixed: bool) -> bool {
    let bytes = digits.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (bytes.get(i + 1).is_some_and(|next| *next != b'_')
                && if i == 0 { prefixed } else { bytes[i - 1] != b'_' })
    })
}

/// Parse a boolean literal.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parse a float, rejecting finite input that overflows the target width.
pub fn parse_float<T: FromStr + Copy>(s: &str, is_infinite: fn(T) -> bool) -> Option<T> {
    let value: T = s.parse().ok()?;
    if is_infinite(value) && !names_infinity(s) {
        return None;
    }
    Some(value)
}

fn names_infinity(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

const MAX_MAGNITUDE: u64 = 1 << 63;

fn unit_scale(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(NANOSECOND),
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

/// Parse a duration expression such as `300ms`, `-1.5h` or `2h45m` into
/// signed nanoseconds.
pub fn parse_duration(s: &str) -> Option<i64> {
    let (negative, mut rest) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if rest == "0" {
        return Some(0);
    }
    if rest.is_empty() {
        return None;
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        let whole_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (whole_digits, after) = rest.split_at(whole_len);
        rest = after;

        let mut frac_digits = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            (frac_digits, rest) = after_dot.split_at(frac_len);
        }
        if whole_digits.is_empty() && frac_digits.is_empty() {
            return None;
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return None;
        }
        let (unit, after) = rest.split_at(unit_len);
        rest = after;
        let scale = unit_scale(unit)?;

        let whole = leading_int(whole_digits)?;
        if whole > MAX_MAGNITUDE / scale {
            return None;
        }
        let mut term = whole * scale;
        if !frac_digits.is_empty() {
            let (fraction, divisor) = leading_fraction(frac_digits);
            // Precision past the 19th fractional digit is dropped.
            term += (fraction as f64 * (scale as f64 / divisor)) as u64;
            if term > MAX_MAGNITUDE {
                return None;
            }
        }

        total = total.checked_add(term).filter(|t| *t <= MAX_MAGNITUDE)?;
    }

    if negative {
        0_i64.checked_sub_unsigned(total)
    } else {
        i64::try_from(total).ok()
    }
}

fn leading_int(digits: &str) -> Option<u64> {
    digits.bytes().try_fold(0_u64, |acc, d| {
        let next = acc.checked_mul(10)?.checked_add(u64::from(d - b'0'))?;
        (next <= MAX_MAGNITUDE).then_some(next)
    })
}

/// Accumulate fractional digits until they would overflow, returning the
/// digits as an integer and the power of ten they are scaled by.
fn leading_fraction(digits: &str) -> (u64, f64) {
    let mut value: u64 = 0;
    let mut divisor = 1.0;
    for d in digits.bytes() {
        let next = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(d - b'0')))
            .filter(|v| *v <= MAX_MAGNITUDE);
        match next {
            Some(next) => {
                value = next;
                divisor *= 10.0;
            }
            None => break,
        }
    }
    (value, divisor)
}
