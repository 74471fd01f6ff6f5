//! Magnitude: the unsigned integer coefficient behind every decimal.
//!
//! Backed by a fixed-width 1024-bit [`Uint`], which holds any integer below
//! about `1.8e308`. Coefficients are bounded by
//! [`MAX_PRECISION`](crate::safe_math::MAX_PRECISION) digits, and no
//! operation rescales one by more than twice that, so intermediates stay far
//! below the width.

use alloy_primitives::Uint;

type U1024 = Uint<1024, 16>;

/// Unsigned decimal coefficient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Magnitude(U1024);

impl Magnitude {
    pub(crate) const ZERO: Magnitude = Magnitude(U1024::ZERO);

    /// Build from a small integer.
    pub(crate) fn from_u64(n: u64) -> Self {
        Self(U1024::from(n))
    }

    /// Build from ASCII digits, most significant first.
    ///
    /// The caller guarantees every byte is in `b'0'..=b'9'` and that the
    /// digits fit the precision ceiling.
    pub(crate) fn from_ascii(bytes: &[u8]) -> Self {
        debug_assert!(bytes.iter().all(u8::is_ascii_digit));
        let ten = U1024::from(10u64);
        Self(
            bytes
                .iter()
                .fold(U1024::ZERO, |acc, b| acc * ten + U1024::from((b - b'0') as u64)),
        )
    }

    /// `10^exp`.
    pub(crate) fn pow10(exp: usize) -> Self {
        Self(ten_pow(exp))
    }

    #[inline]
    pub(crate) fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Number of decimal digits; zero has none.
    pub(crate) fn len(&self) -> usize {
        if self.is_zero() {
            0
        } else {
            self.0.to_string().len()
        }
    }

    /// Digit at position `i` counted from the least significant end.
    pub(crate) fn digit(&self, i: usize) -> u8 {
        let shifted = self.0 / ten_pow(i);
        let (_, digit) = shifted.div_rem(U1024::from(10u64));
        digit.as_limbs()[0] as u8
    }

    /// Count of zero digits at the least significant end.
    pub(crate) fn trailing_zeros(&self) -> usize {
        if self.is_zero() {
            return 0;
        }
        let ten = U1024::from(10u64);
        let mut value = self.0;
        let mut count = 0;
        loop {
            let (quotient, rem) = value.div_rem(ten);
            if !rem.is_zero() {
                return count;
            }
            value = quotient;
            count += 1;
        }
    }

    /// Multiply by `10^k`.
    pub(crate) fn shl(&self, k: usize) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }
        Self(self.0 * ten_pow(k))
    }

    /// Split into `(self / 10^k, self % 10^k)`.
    pub(crate) fn split_low(&self, k: usize) -> (Self, Self) {
        if k >= self.len() {
            return (Self::ZERO, *self);
        }
        let (high, low) = self.0.div_rem(ten_pow(k));
        (Self(high), Self(low))
    }

    pub(crate) fn add(&self, other: &Self) -> Self {
        Self(self.0 + other.0)
    }

    /// `self - other`. Requires `self >= other`.
    pub(crate) fn sub(&self, other: &Self) -> Self {
        debug_assert!(*self >= *other, "magnitude subtraction underflow");
        Self(self.0 - other.0)
    }

    pub(crate) fn mul(&self, other: &Self) -> Self {
        Self(self.0 * other.0)
    }

    /// Truncating division: `(self / divisor, self % divisor)`.
    ///
    /// Requires a non-zero divisor.
    pub(crate) fn div_rem(&self, divisor: &Self) -> (Self, Self) {
        debug_assert!(!divisor.is_zero(), "magnitude division by zero");
        let (quotient, rem) = self.0.div_rem(divisor.0);
        (Self(quotient), Self(rem))
    }

    /// Digits as ASCII, most significant first; `"0"` for zero.
    pub(crate) fn to_ascii(&self) -> String {
        self.0.to_string()
    }
}

fn ten_pow(exp: usize) -> U1024 {
    U1024::from(10u64).pow(U1024::from(exp as u64))
}
