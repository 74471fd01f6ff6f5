//! Scaled: the internal signed decimal behind every string operation.
//!
//! A value is `(-1)^negative * coefficient / 10^scale`. Every constructor goes
//! through [`Scaled::from_parts`], which strips redundant fractional zeros and
//! enforces [`MAX_PRECISION`], so two equal values always have identical
//! parts and `Display` yields the canonical numeral.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{MathError, Result};
use crate::magnitude::Magnitude;
use crate::safe_math::{DIVISION_SCALE, MAX_PRECISION};

/// Rounding policies for dropping fractional digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Rounding {
    /// Toward zero.
    Truncate,
    /// Toward negative infinity.
    Floor,
    /// Toward positive infinity.
    Ceiling,
    /// To nearest, ties away from zero.
    HalfAwayFromZero,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) struct Scaled {
    negative: bool,
    coefficient: Magnitude,
    scale: usize,
}

impl Scaled {
    pub(crate) const ZERO: Scaled = Scaled {
        negative: false,
        coefficient: Magnitude::ZERO,
        scale: 0,
    };

    pub(crate) fn one() -> Self {
        Self::from_u64(1)
    }

    pub(crate) fn from_u64(n: u64) -> Self {
        Self {
            negative: false,
            coefficient: Magnitude::from_u64(n),
            scale: 0,
        }
    }

    /// Reduce to canonical parts and check the precision ceiling.
    pub(crate) fn from_parts(negative: bool, coefficient: Magnitude, scale: usize) -> Result<Self> {
        if coefficient.is_zero() {
            return Ok(Self::ZERO);
        }
        let redundant = coefficient.trailing_zeros().min(scale);
        let (coefficient, _) = coefficient.split_low(redundant);
        let scale = scale - redundant;
        if coefficient.len().max(scale) > MAX_PRECISION {
            return Err(MathError::PrecisionOverflow);
        }
        Ok(Self {
            negative,
            coefficient,
            scale,
        })
    }

    /// Parse a strict numeral: `-?digits(.digits)?` with an optional exponent.
    pub(crate) fn parse(input: &str) -> Result<Self> {
        Self::parse_with(input, false)
    }

    /// Parse a numeral the way a text field holds it mid-edit: surrounding
    /// whitespace, a leading `+`, and a bare leading or trailing point are
    /// tolerated.
    pub(crate) fn parse_loose(input: &str) -> Result<Self> {
        Self::parse_with(input, true)
    }

    fn parse_with(input: &str, loose: bool) -> Result<Self> {
        let invalid = || MathError::InvalidNumeral(input.to_string());
        let text = if loose { input.trim() } else { input };

        let (negative, body) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') if loose => (false, &text[1..]),
            _ => (false, text),
        };
        let (mantissa, exponent) = match body.find(['e', 'E']) {
            Some(at) => (&body[..at], Some(&body[at + 1..])),
            None => (body, None),
        };
        let (int_digits, frac_digits) = match mantissa.split_once('.') {
            Some((int, frac)) => {
                if !loose && (int.is_empty() || frac.is_empty()) {
                    return Err(invalid());
                }
                (int, frac)
            }
            None => (mantissa, ""),
        };
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid());
        }
        if !is_digits(int_digits) || !is_digits(frac_digits) {
            return Err(invalid());
        }
        let exponent = match exponent {
            Some(e) => e.parse::<i64>().map_err(|_| invalid())?,
            None => 0,
        };

        let mut ascii = Vec::with_capacity(int_digits.len() + frac_digits.len());
        ascii.extend_from_slice(int_digits.as_bytes());
        ascii.extend_from_slice(frac_digits.as_bytes());
        let Some(first) = ascii.iter().position(|&b| b != b'0') else {
            return Ok(Self::ZERO);
        };
        let Some(last) = ascii.iter().rposition(|&b| b != b'0') else {
            return Ok(Self::ZERO);
        };
        let significant = &ascii[first..=last];
        if significant.len() > MAX_PRECISION {
            return Err(MathError::PrecisionOverflow);
        }
        let coefficient = Magnitude::from_ascii(significant);

        // value = coefficient * 10^shift
        let dropped_zeros = (ascii.len() - 1 - last) as i64;
        let shift = exponent
            .saturating_sub(frac_digits.len() as i64)
            .saturating_add(dropped_zeros);
        if shift >= 0 {
            if (significant.len() as i64).saturating_add(shift) > MAX_PRECISION as i64 {
                return Err(MathError::PrecisionOverflow);
            }
            Self::from_parts(negative, coefficient.shl(shift as usize), 0)
        } else {
            let scale = shift.saturating_neg();
            if scale > MAX_PRECISION as i64 {
                return Err(MathError::PrecisionOverflow);
            }
            Self::from_parts(negative, coefficient, scale as usize)
        }
    }

    #[inline]
    pub(crate) fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    #[inline]
    pub(crate) fn is_negative(&self) -> bool {
        self.negative
    }

    #[inline]
    pub(crate) fn is_positive(&self) -> bool {
        !self.negative && !self.is_zero()
    }

    pub(crate) fn neg(&self) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }
        Self {
            negative: !self.negative,
            ..self.clone()
        }
    }

    pub(crate) fn abs(&self) -> Self {
        Self {
            negative: false,
            ..self.clone()
        }
    }

    /// Coefficients of both values brought to the larger scale.
    fn aligned(&self, other: &Self) -> (Magnitude, Magnitude, usize) {
        let scale = self.scale.max(other.scale);
        (
            self.coefficient.shl(scale - self.scale),
            other.coefficient.shl(scale - other.scale),
            scale,
        )
    }

    pub(crate) fn checked_add(&self, other: &Self) -> Result<Self> {
        let (a, b, scale) = self.aligned(other);
        let (negative, coefficient) = if self.negative == other.negative {
            (self.negative, a.add(&b))
        } else if a >= b {
            (self.negative, a.sub(&b))
        } else {
            (other.negative, b.sub(&a))
        };
        Self::from_parts(negative, coefficient, scale)
    }

    pub(crate) fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.checked_add(&other.neg())
    }

    pub(crate) fn checked_mul(&self, other: &Self) -> Result<Self> {
        Self::from_parts(
            self.negative != other.negative,
            self.coefficient.mul(&other.coefficient),
            self.scale + other.scale,
        )
    }

    /// Quotient truncated toward zero after [`DIVISION_SCALE`] fractional digits.
    pub(crate) fn checked_div(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(Self::ZERO);
        }
        // (a / 10^sa) / (b / 10^sb) * 10^D = a * 10^(sb + D) / (b * 10^sa)
        let numerator = self.coefficient.shl(other.scale + DIVISION_SCALE);
        let denominator = other.coefficient.shl(self.scale);
        let (quotient, _) = numerator.div_rem(&denominator);
        Self::from_parts(self.negative != other.negative, quotient, DIVISION_SCALE)
    }

    /// Remainder of truncated division; takes the sign of the dividend.
    pub(crate) fn checked_rem(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        let (a, b, scale) = self.aligned(other);
        let (_, rem) = a.div_rem(&b);
        Self::from_parts(self.negative, rem, scale)
    }

    /// Integer power. Negative exponents go through [`Scaled::checked_div`].
    pub(crate) fn checked_pow(&self, exponent: i32) -> Result<Self> {
        if exponent < 0 {
            let denominator = self.checked_pow_unsigned(exponent.unsigned_abs())?;
            return Self::one().checked_div(&denominator);
        }
        self.checked_pow_unsigned(exponent as u32)
    }

    fn checked_pow_unsigned(&self, mut exponent: u32) -> Result<Self> {
        let mut result = Self::one();
        let mut base = self.clone();
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = result.checked_mul(&base)?;
            }
            exponent >>= 1;
            if exponent > 0 {
                base = base.checked_mul(&base)?;
            }
        }
        Ok(result)
    }

    /// Keep at most `places` fractional digits.
    pub(crate) fn round_to(&self, places: usize, mode: Rounding) -> Result<Self> {
        if self.scale <= places {
            return Ok(self.clone());
        }
        let dropped_digits = self.scale - places;
        let (kept, dropped) = self.coefficient.split_low(dropped_digits);
        let bump = match mode {
            Rounding::Truncate => false,
            Rounding::Floor => self.negative && !dropped.is_zero(),
            Rounding::Ceiling => !self.negative && !dropped.is_zero(),
            Rounding::HalfAwayFromZero => dropped.add(&dropped) >= Magnitude::pow10(dropped_digits),
        };
        let kept = if bump {
            kept.add(&Magnitude::from_u64(1))
        } else {
            kept
        };
        Self::from_parts(self.negative, kept, places)
    }

    /// Multiply by `10^exp` without touching the coefficient.
    pub(crate) fn shift_left(&self, exp: usize) -> Result<Self> {
        if self.is_zero() {
            return Ok(Self::ZERO);
        }
        if exp <= self.scale {
            return Self::from_parts(self.negative, self.coefficient, self.scale - exp);
        }
        if exp - self.scale > MAX_PRECISION.saturating_sub(self.coefficient.len()) {
            return Err(MathError::PrecisionOverflow);
        }
        Self::from_parts(self.negative, self.coefficient.shl(exp - self.scale), 0)
    }

    /// 1-based position of the first non-zero fractional digit, 0 if none.
    pub(crate) fn significant_decimals(&self) -> u32 {
        (1..=self.scale)
            .find(|&position| self.coefficient.digit(self.scale - position) != 0)
            .unwrap_or(0) as u32
    }

    /// `floor(log10(|self|))`, `None` for zero.
    pub(crate) fn order_of_magnitude(&self) -> Option<i32> {
        if self.is_zero() {
            return None;
        }
        Some(self.coefficient.len() as i32 - 1 - self.scale as i32)
    }

    /// Positional form with exactly `places` fractional digits.
    ///
    /// Requires `places >= self.scale`.
    pub(crate) fn to_padded_string(&self, places: usize) -> String {
        debug_assert!(places >= self.scale);
        let digits = self.coefficient.shl(places - self.scale).to_ascii();
        positional(self.negative, &digits, places)
    }
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Insert the decimal point `scale` digits from the right of `digits`.
fn positional(negative: bool, digits: &str, scale: usize) -> String {
    let mut out = String::with_capacity(digits.len() + scale + 3);
    if negative {
        out.push('-');
    }
    if scale == 0 {
        out.push_str(digits);
    } else if digits.len() > scale {
        let (int, frac) = digits.split_at(digits.len() - scale);
        out.push_str(int);
        out.push('.');
        out.push_str(frac);
    } else {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', scale - digits.len()));
        out.push_str(digits);
    }
    out
}

impl Ord for Scaled {
    fn cmp(&self, other: &Self) -> Ordering {
        let sign = |v: &Self| -> i8 {
            if v.is_zero() {
                0
            } else if v.is_negative() {
                -1
            } else {
                1
            }
        };
        match sign(self).cmp(&sign(other)) {
            Ordering::Equal => {
                let (a, b, _) = self.aligned(other);
                if self.negative { b.cmp(&a) } else { a.cmp(&b) }
            }
            unequal => unequal,
        }
    }
}

impl PartialOrd for Scaled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Scaled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&positional(
            self.negative,
            &self.coefficient.to_ascii(),
            self.scale,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(input: &str) -> Scaled {
        Scaled::parse(input).unwrap()
    }

    #[test]
    fn parse_strips_redundant_zeros() {
        assert_eq!(s("1.50").to_string(), "1.5");
        assert_eq!(s("2.00").to_string(), "2");
        assert_eq!(s("007").to_string(), "7");
        assert_eq!(s("0.05").to_string(), "0.05");
        assert_eq!(s("100").to_string(), "100");
    }

    #[test]
    fn negative_zero_is_zero() {
        assert_eq!(s("-0"), Scaled::ZERO);
        assert_eq!(s("-0.000").to_string(), "0");
        assert!(!s("-0").is_negative());
    }

    #[test]
    fn exponent_is_expanded() {
        assert_eq!(s("4.11769e-8").to_string(), "0.0000000411769");
        assert_eq!(s("6.25e+21").to_string(), "6250000000000000000000");
        assert_eq!(s("-2.5e3").to_string(), "-2500");
        assert_eq!(s("1E2").to_string(), "100");
    }

    #[test]
    fn strict_parse_rejects_loose_forms() {
        for bad in ["", "-", ".", "1.", ".5", "+1", " 1", "1 ", "1,000", "1.2.3", "abc", "1e", "e5"] {
            assert!(
                matches!(Scaled::parse(bad), Err(MathError::InvalidNumeral(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn loose_parse_accepts_typing_states() {
        assert_eq!(Scaled::parse_loose(" +12. ").unwrap().to_string(), "12");
        assert_eq!(Scaled::parse_loose(".5").unwrap().to_string(), "0.5");
        assert_eq!(Scaled::parse_loose("-.25").unwrap().to_string(), "-0.25");
        assert!(Scaled::parse_loose("+-1").is_err());
        assert!(Scaled::parse_loose(" . ").is_err());
    }

    #[test]
    fn precision_ceiling() {
        let widest = "9".repeat(MAX_PRECISION);
        assert!(Scaled::parse(&widest).is_ok());
        let too_wide = "9".repeat(MAX_PRECISION + 1);
        assert_eq!(Scaled::parse(&too_wide), Err(MathError::PrecisionOverflow));
        let tiny = format!("0.{}1", "0".repeat(MAX_PRECISION));
        assert_eq!(Scaled::parse(&tiny), Err(MathError::PrecisionOverflow));
        let at_ceiling = format!("1e{}", MAX_PRECISION);
        assert_eq!(Scaled::parse(&at_ceiling), Err(MathError::PrecisionOverflow));
        let below_ceiling = format!("1e-{}", MAX_PRECISION + 1);
        assert_eq!(Scaled::parse(&below_ceiling), Err(MathError::PrecisionOverflow));
        assert_eq!(Scaled::parse("0e-500"), Ok(Scaled::ZERO));
    }

    #[test]
    fn zero_padding_does_not_count() {
        let padded = format!("{}1.5{}", "0".repeat(500), "0".repeat(500));
        assert_eq!(s(&padded).to_string(), "1.5");
        assert_eq!(s(&format!("1{}e-500", "0".repeat(500))).to_string(), "1");
    }

    #[test]
    fn shift_left_rejects_oversized_exponents() {
        assert_eq!(s("1.5").shift_left(3).unwrap().to_string(), "1500");
        assert_eq!(s("0").shift_left(usize::MAX), Ok(Scaled::ZERO));
        assert_eq!(s("1.5").shift_left(usize::MAX), Err(MathError::PrecisionOverflow));
        assert_eq!(
            s("1.5").shift_left(MAX_PRECISION + 1),
            Err(MathError::PrecisionOverflow)
        );
    }

    #[test]
    fn ordering_is_numeric() {
        assert_eq!(s("1.0").cmp(&s("1")), Ordering::Equal);
        assert!(s("-2") < s("-1.5"));
        assert!(s("-0.1") < s("0"));
        assert!(s("0.1") > s("0.09"));
        assert!(s("10") > s("9.999"));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(s("1.1").checked_add(&s("2.25")).unwrap().to_string(), "3.35");
        assert_eq!(s("1").checked_sub(&s("2.5")).unwrap().to_string(), "-1.5");
        assert_eq!(s("-1.5").checked_mul(&s("-2")).unwrap().to_string(), "3");
        assert_eq!(s("1").checked_div(&s("3")).unwrap().to_string(), "0.333333333333333333");
        assert_eq!(s("-2").checked_div(&s("3")).unwrap().to_string(), "-0.666666666666666666");
        assert_eq!(s("7.5").checked_rem(&s("2")).unwrap().to_string(), "1.5");
        assert_eq!(s("-7.5").checked_rem(&s("2")).unwrap().to_string(), "-1.5");
    }

    #[test]
    fn rounding_modes() {
        let v = s("-1.25");
        assert_eq!(v.round_to(1, Rounding::Truncate).unwrap().to_string(), "-1.2");
        assert_eq!(v.round_to(1, Rounding::Floor).unwrap().to_string(), "-1.3");
        assert_eq!(v.round_to(1, Rounding::Ceiling).unwrap().to_string(), "-1.2");
        assert_eq!(v.round_to(1, Rounding::HalfAwayFromZero).unwrap().to_string(), "-1.3");
        assert_eq!(s("9.99").round_to(1, Rounding::HalfAwayFromZero).unwrap().to_string(), "10");
    }

    #[test]
    fn padded_string() {
        assert_eq!(s("1.5").to_padded_string(3), "1.500");
        assert_eq!(s("0.05").to_padded_string(2), "0.05");
        assert_eq!(Scaled::ZERO.to_padded_string(2), "0.00");
        assert_eq!(s("12").to_padded_string(0), "12");
    }
}
