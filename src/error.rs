//! Errors raised by the decimal engine.

/// Errors returned by decimal arithmetic and anything built on it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MathError {
    /// The input could not be read as a base-10 numeral.
    #[error("invalid numeral: {0:?}")]
    InvalidNumeral(String),
    /// The value needs more than [`MAX_PRECISION`](crate::safe_math::MAX_PRECISION) digits.
    #[error("value exceeds {} digits of precision", crate::safe_math::MAX_PRECISION)]
    PrecisionOverflow,
    /// The divisor was zero.
    #[error("division by zero")]
    DivisionByZero,
}

pub type Result<T> = std::result::Result<T, MathError>;
