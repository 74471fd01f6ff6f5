//! Precision-safe decimal arithmetic over numeral strings.
//!
//! Every function takes decimal strings and returns decimal strings (or
//! plain booleans and orderings), so values cross API boundaries as text and
//! never as binary floating point. Inputs must be strict numerals
//! (`-?digits(.digits)?`, optionally with an exponent); run user input
//! through [`normalize`] first. Outputs are always canonical: no `+`, no
//! exponent, no redundant zeros, and never `"-0"`.
//!
//! Addition, subtraction, and multiplication are exact. Division keeps
//! [`DIVISION_SCALE`] fractional digits and truncates the rest toward zero,
//! so a reported quotient never overstates the true value.
//!
//! ```
//! use safebook::safe_math;
//!
//! assert_eq!(safe_math::add("0.1", "0.2").unwrap(), "0.3");
//! assert_eq!(safe_math::divide("2", "3").unwrap(), "0.666666666666666666");
//! assert!(safe_math::equal("1.50", "1.5").unwrap());
//! assert_eq!(safe_math::normalize(" +12. ").unwrap(), "12");
//! ```

use std::cmp::Ordering;

use crate::error::Result;
use crate::numeral::{Rounding, Scaled};

/// Maximum digits needed to write any value positionally.
///
/// Counts integer digits without leading zeros plus fractional digits
/// without trailing zeros; the sign, the point, and a lone leading `0` are
/// free. Inputs and results beyond it fail with
/// [`MathError::PrecisionOverflow`](crate::MathError::PrecisionOverflow).
///
/// Two values with [`DIVISION_SCALE`] fractional digits and up to 20 integer
/// digits each multiply exactly within it, so a quotient can always be
/// multiplied back by a token-scale price.
pub const MAX_PRECISION: usize = 2 * DIVISION_SCALE + 40;

/// Fractional digits kept by [`divide`]; the rest are truncated.
pub const DIVISION_SCALE: usize = 18;

fn unary(a: &str, op: impl FnOnce(&Scaled) -> Result<Scaled>) -> Result<String> {
    Ok(op(&Scaled::parse(a)?)?.to_string())
}

fn binary(a: &str, b: &str, op: impl FnOnce(&Scaled, &Scaled) -> Result<Scaled>) -> Result<String> {
    let a = Scaled::parse(a)?;
    let b = Scaled::parse(b)?;
    Ok(op(&a, &b)?.to_string())
}

// ============================================================================
// Canonical form
// ============================================================================

/// Sanitize a loosely formatted numeral into canonical form.
///
/// Accepts surrounding whitespace, a leading `+`, exponent notation, and the
/// bare leading or trailing point a text field holds mid-edit (`".5"`,
/// `"12."`).
pub fn normalize(input: &str) -> Result<String> {
    Ok(Scaled::parse_loose(input)?.to_string())
}

/// Remove trailing fractional zeros and a trailing bare point.
///
/// Purely textual: the numeric value is unchanged and the input is not
/// validated. Only the mantissa is trimmed, so `"1.50e10"` becomes
/// `"1.5e10"`. Zero results collapse to `"0"`.
pub fn trim_trailing_zeros(input: &str) -> String {
    let (mantissa, exponent) = match input.find(['e', 'E']) {
        Some(at) => input.split_at(at),
        None => (input, ""),
    };
    let trimmed = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };
    let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if !unsigned.is_empty() && unsigned.bytes().all(|b| b == b'0') {
        return "0".to_string();
    }
    format!("{trimmed}{exponent}")
}

// ============================================================================
// Arithmetic
// ============================================================================

/// `a + b`, exact.
pub fn add(a: &str, b: &str) -> Result<String> {
    binary(a, b, Scaled::checked_add)
}

/// `a - b`, exact.
pub fn subtract(a: &str, b: &str) -> Result<String> {
    binary(a, b, Scaled::checked_sub)
}

/// `a * b`, exact.
pub fn multiply(a: &str, b: &str) -> Result<String> {
    binary(a, b, Scaled::checked_mul)
}

/// `a / b`, truncated toward zero after [`DIVISION_SCALE`] fractional digits.
///
/// Fails with [`MathError::DivisionByZero`](crate::MathError::DivisionByZero)
/// when `b` is zero.
pub fn divide(a: &str, b: &str) -> Result<String> {
    binary(a, b, Scaled::checked_div)
}

/// Remainder of truncated division, carrying the sign of `a`.
pub fn remainder(a: &str, b: &str) -> Result<String> {
    binary(a, b, Scaled::checked_rem)
}

/// `base^exponent`.
///
/// Exact for non-negative exponents; a negative exponent divides one by the
/// positive power and so truncates like [`divide`]. Any value to the power
/// zero is `"1"`.
pub fn pow(base: &str, exponent: i32) -> Result<String> {
    unary(base, |b| b.checked_pow(exponent))
}

pub fn negate(a: &str) -> Result<String> {
    unary(a, |v| Ok(v.neg()))
}

pub fn abs(a: &str) -> Result<String> {
    unary(a, |v| Ok(v.abs()))
}

// ============================================================================
// Comparison
// ============================================================================

/// Numeric ordering, independent of formatting (`"1.0"` equals `"1"`).
pub fn compare(a: &str, b: &str) -> Result<Ordering> {
    Ok(Scaled::parse(a)?.cmp(&Scaled::parse(b)?))
}

pub fn greater_than(a: &str, b: &str) -> Result<bool> {
    Ok(compare(a, b)?.is_gt())
}

pub fn greater_than_or_equal(a: &str, b: &str) -> Result<bool> {
    Ok(compare(a, b)?.is_ge())
}

pub fn less_than(a: &str, b: &str) -> Result<bool> {
    Ok(compare(a, b)?.is_lt())
}

pub fn less_than_or_equal(a: &str, b: &str) -> Result<bool> {
    Ok(compare(a, b)?.is_le())
}

pub fn equal(a: &str, b: &str) -> Result<bool> {
    Ok(compare(a, b)?.is_eq())
}

/// The larger value, canonicalized.
pub fn max(a: &str, b: &str) -> Result<String> {
    binary(a, b, |a, b| Ok(a.max(b).clone()))
}

/// The smaller value, canonicalized.
pub fn min(a: &str, b: &str) -> Result<String> {
    binary(a, b, |a, b| Ok(a.min(b).clone()))
}

pub fn is_zero(a: &str) -> Result<bool> {
    Ok(Scaled::parse(a)?.is_zero())
}

// ============================================================================
// Rounding and display
// ============================================================================

/// Largest integer not greater than `a`.
pub fn floor(a: &str) -> Result<String> {
    unary(a, |v| v.round_to(0, Rounding::Floor))
}

/// Smallest integer not less than `a`.
pub fn ceil(a: &str) -> Result<String> {
    unary(a, |v| v.round_to(0, Rounding::Ceiling))
}

/// Nearest integer, ties away from zero.
pub fn round(a: &str) -> Result<String> {
    unary(a, |v| v.round_to(0, Rounding::HalfAwayFromZero))
}

/// Drop fractional digits beyond `places`, toward zero.
pub fn truncate(a: &str, places: usize) -> Result<String> {
    unary(a, |v| v.round_to(places, Rounding::Truncate))
}

/// Round half away from zero to `places` fractional digits and pad with zeros.
///
/// This is a display formatter: `to_fixed("1.5", 2)` is `"1.50"`. `places` is
/// clamped to [`MAX_PRECISION`].
pub fn to_fixed(a: &str, places: usize) -> Result<String> {
    let places = places.min(MAX_PRECISION);
    let rounded = Scaled::parse(a)?.round_to(places, Rounding::HalfAwayFromZero)?;
    Ok(rounded.to_padded_string(places))
}

/// Integer string of `a * 10^decimals`, the on-chain encoding of an amount
/// for a token with `decimals` decimals. Excess fractional digits are
/// truncated toward zero.
pub fn to_scaled_integer(a: &str, decimals: usize) -> Result<String> {
    unary(a, |v| {
        v.shift_left(decimals)?.round_to(0, Rounding::Truncate)
    })
}

/// 1-based position of the first non-zero fractional digit; `0` when the
/// fractional part is zero.
pub fn significant_decimals(a: &str) -> Result<u32> {
    Ok(Scaled::parse(a)?.significant_decimals())
}

/// `floor(log10(|a|))`, or `None` for zero.
pub fn order_of_magnitude(a: &str) -> Result<Option<i32>> {
    Ok(Scaled::parse(a)?.order_of_magnitude())
}
