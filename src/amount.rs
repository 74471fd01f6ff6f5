//! Amount selection helpers for order forms.
//!
//! Sliders, balance percentages, and the validation verdict an order form
//! shows next to a preview. Like the rest of the crate these are pure
//! functions over decimal strings.

use std::fmt;

use crate::error::Result;
use crate::numeral::Scaled;
use crate::{BuyExecution, SellExecution};

fn hundred() -> Scaled {
    Scaled::from_u64(100)
}

fn clamp(value: Scaled, low: Scaled, high: Scaled) -> Scaled {
    value.max(low).min(high)
}

/// Amount selected by a slider at `progress_pct` percent of `balance`.
///
/// Progress outside `[0, 100]` is clamped.
///
/// ```
/// use safebook::amount::amount_from_slider_progress;
///
/// assert_eq!(amount_from_slider_progress("25", "80.5").unwrap(), "20.125");
/// assert_eq!(amount_from_slider_progress("150", "10").unwrap(), "10");
/// ```
pub fn amount_from_slider_progress(progress_pct: &str, balance: &str) -> Result<String> {
    let progress = clamp(Scaled::parse(progress_pct)?, Scaled::ZERO, hundred());
    let balance = Scaled::parse(balance)?;
    if !balance.is_positive() {
        return Ok("0".into());
    }
    let amount = balance.checked_mul(&progress)?.checked_div(&hundred())?;
    Ok(amount.to_string())
}

/// Slider position (percent) that shows `amount` out of `balance`.
///
/// Clamped to `[0, 100]`; a zero balance puts the slider at `"0"`.
pub fn slider_progress_from_amount(amount: &str, balance: &str) -> Result<String> {
    let balance = Scaled::parse(balance)?;
    if !balance.is_positive() {
        return Ok("0".into());
    }
    let progress = Scaled::parse(amount)?
        .checked_mul(&hundred())?
        .checked_div(&balance)?;
    Ok(clamp(progress, Scaled::ZERO, hundred()).to_string())
}

/// `part` as a percentage of `whole`; `"0"` when `whole` is zero.
pub fn percentage_of(part: &str, whole: &str) -> Result<String> {
    let whole = Scaled::parse(whole)?;
    if whole.is_zero() {
        return Ok("0".into());
    }
    let pct = Scaled::parse(part)?
        .checked_mul(&hundred())?
        .checked_div(&whole)?;
    Ok(pct.to_string())
}

/// Verdict on an order form's amount, given its execution preview.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderValidation {
    Valid,
    /// Nothing entered yet.
    Empty,
    /// Below the venue's minimum order size.
    BelowMinimum { minimum: String },
    /// More than the available balance or position.
    ExceedsBalance,
    /// The book cannot absorb the whole order.
    InsufficientLiquidity,
    /// No resting orders on the side the order would take.
    NoLiquidity,
}

impl OrderValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, OrderValidation::Valid)
    }
}

impl fmt::Display for OrderValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderValidation::Valid => write!(f, "ok"),
            OrderValidation::Empty => write!(f, "enter an amount"),
            OrderValidation::BelowMinimum { minimum } => write!(f, "minimum order is {minimum}"),
            OrderValidation::ExceedsBalance => write!(f, "amount exceeds available balance"),
            OrderValidation::InsufficientLiquidity => {
                write!(f, "not enough liquidity to fill the whole order")
            }
            OrderValidation::NoLiquidity => write!(f, "no liquidity at market price"),
        }
    }
}

/// Validate a buy of `amount_usd` against the buyer's balance and preview.
pub fn validate_buy(
    amount_usd: &str,
    available_balance: &str,
    execution: &BuyExecution,
) -> Result<OrderValidation> {
    let amount = Scaled::parse(amount_usd)?;
    if !amount.is_positive() {
        return Ok(OrderValidation::Empty);
    }
    if amount < Scaled::parse(&execution.min_buy_amount_usd)? {
        return Ok(OrderValidation::BelowMinimum {
            minimum: execution.min_buy_amount_usd.clone(),
        });
    }
    if amount > Scaled::parse(available_balance)? {
        return Ok(OrderValidation::ExceedsBalance);
    }
    if !Scaled::parse(&execution.best_price)?.is_positive() {
        return Ok(OrderValidation::NoLiquidity);
    }
    if execution.has_insufficient_liquidity {
        return Ok(OrderValidation::InsufficientLiquidity);
    }
    Ok(OrderValidation::Valid)
}

/// Validate a sell of `amount_tokens` against the held position and preview.
pub fn validate_sell(
    amount_tokens: &str,
    position_size: &str,
    execution: &SellExecution,
) -> Result<OrderValidation> {
    let amount = Scaled::parse(amount_tokens)?;
    if !amount.is_positive() {
        return Ok(OrderValidation::Empty);
    }
    if amount > Scaled::parse(position_size)? {
        return Ok(OrderValidation::ExceedsBalance);
    }
    if execution.has_no_liquidity_at_market_price {
        return Ok(OrderValidation::NoLiquidity);
    }
    if execution.has_insufficient_liquidity {
        return Ok(OrderValidation::InsufficientLiquidity);
    }
    Ok(OrderValidation::Valid)
}
