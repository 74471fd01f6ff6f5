//! Execution previews produced by the simulator.
//!
//! Every numeric field is a canonical decimal string, ready for display or
//! for further arithmetic through [`safe_math`](crate::safe_math).

use crate::Side;
use crate::error::Result;
use crate::safe_math;

/// Preview of a market buy that spends a quote-currency budget.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuyExecution {
    /// Quote spent on tokens divided by tokens bought, fees excluded.
    pub average_price: String,
    /// Price of the last (least favorable) ask level touched.
    pub worst_price: String,
    /// Best ask in the book.
    pub best_price: String,
    /// Flat per-token fee charged on the tokens bought.
    pub fee: String,
    pub tokens_bought: String,
    /// The asks ran out before the budget was spent.
    pub has_insufficient_liquidity: bool,
    pub spread: String,
    /// Smallest buy the venue accepts, never below one quote unit.
    pub min_buy_amount_usd: String,
}

impl BuyExecution {
    /// A preview with no fill and no market data.
    pub fn zero() -> Self {
        Self {
            average_price: "0".into(),
            worst_price: "0".into(),
            best_price: "0".into(),
            fee: "0".into(),
            tokens_bought: "0".into(),
            has_insufficient_liquidity: false,
            spread: "0".into(),
            min_buy_amount_usd: "0".into(),
        }
    }

    /// Payout if the outcome resolves in the buyer's favor: each token
    /// redeems for one quote unit.
    pub fn amount_to_win(&self) -> String {
        self.tokens_bought.clone()
    }

    /// Returns true if nothing was filled.
    pub fn is_empty(&self) -> Result<bool> {
        safe_math::is_zero(&self.tokens_bought)
    }
}

impl Default for BuyExecution {
    fn default() -> Self {
        Self::zero()
    }
}

/// Preview of a market sell of a token quantity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SellExecution {
    /// Gross proceeds divided by tokens sold.
    pub average_price: String,
    /// Price of the last (least favorable) bid level touched.
    pub worst_price: String,
    /// Best bid in the book.
    pub best_price: String,
    pub fee: String,
    pub tokens_sold: String,
    /// Proceeds before fees.
    pub gross_proceeds_usd: String,
    /// Proceeds after fees.
    pub expected_payout_usd: String,
    /// The bids ran out before the full quantity was sold.
    pub has_insufficient_liquidity: bool,
    /// There is no positive bid to sell into at all.
    pub has_no_liquidity_at_market_price: bool,
    pub spread: String,
}

impl SellExecution {
    /// A preview with no fill and no market data.
    pub fn zero() -> Self {
        Self {
            average_price: "0".into(),
            worst_price: "0".into(),
            best_price: "0".into(),
            fee: "0".into(),
            tokens_sold: "0".into(),
            gross_proceeds_usd: "0".into(),
            expected_payout_usd: "0".into(),
            has_insufficient_liquidity: false,
            has_no_liquidity_at_market_price: false,
            spread: "0".into(),
        }
    }

    /// How far the average fill sits below the best bid; `"0"` with no fill.
    pub fn price_impact(&self) -> Result<String> {
        if safe_math::is_zero(&self.tokens_sold)? {
            return Ok("0".into());
        }
        safe_math::subtract(&self.best_price, &self.average_price)
    }

    /// Returns true if nothing was filled.
    pub fn is_empty(&self) -> Result<bool> {
        safe_math::is_zero(&self.tokens_sold)
    }
}

impl Default for SellExecution {
    fn default() -> Self {
        Self::zero()
    }
}

/// Either preview, as returned by [`simulate`](crate::simulate).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Execution {
    Buy(BuyExecution),
    Sell(SellExecution),
}

impl Execution {
    pub fn side(&self) -> Side {
        match self {
            Execution::Buy(_) => Side::Buy,
            Execution::Sell(_) => Side::Sell,
        }
    }

    pub fn average_price(&self) -> &str {
        match self {
            Execution::Buy(e) => &e.average_price,
            Execution::Sell(e) => &e.average_price,
        }
    }

    pub fn worst_price(&self) -> &str {
        match self {
            Execution::Buy(e) => &e.worst_price,
            Execution::Sell(e) => &e.worst_price,
        }
    }

    pub fn best_price(&self) -> &str {
        match self {
            Execution::Buy(e) => &e.best_price,
            Execution::Sell(e) => &e.best_price,
        }
    }

    pub fn fee(&self) -> &str {
        match self {
            Execution::Buy(e) => &e.fee,
            Execution::Sell(e) => &e.fee,
        }
    }

    /// Tokens bought or sold.
    pub fn tokens(&self) -> &str {
        match self {
            Execution::Buy(e) => &e.tokens_bought,
            Execution::Sell(e) => &e.tokens_sold,
        }
    }

    pub fn spread(&self) -> &str {
        match self {
            Execution::Buy(e) => &e.spread,
            Execution::Sell(e) => &e.spread,
        }
    }

    pub fn has_insufficient_liquidity(&self) -> bool {
        match self {
            Execution::Buy(e) => e.has_insufficient_liquidity,
            Execution::Sell(e) => e.has_insufficient_liquidity,
        }
    }
}
