//! Order-book snapshots handed in by a market-data feed.
//!
//! Both sides are stored worst-to-best: the last element of `bids` is the
//! highest bid and the last element of `asks` is the lowest ask. A snapshot
//! is immutable for the duration of a simulation and replaced wholesale on
//! the next update.

use crate::Side;
use crate::error::Result;
use crate::numeral::Scaled;
use crate::safe_math;

/// One rung of the book: `size` tokens available at `price` quote units each.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceLevel {
    pub price: String,
    pub size: String,
}

impl PriceLevel {
    pub fn new(price: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            price: price.into(),
            size: size.into(),
        }
    }

    /// Quote-currency value of the whole level (`price * size`).
    pub fn notional(&self) -> Result<String> {
        safe_math::multiply(&self.price, &self.size)
    }

    fn sanitized(&self) -> Result<Self> {
        Ok(Self {
            price: safe_math::normalize(&self.price)?,
            size: safe_math::normalize(&self.size)?,
        })
    }
}

/// A full snapshot of one market's limit order book.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderBook {
    /// Bid levels, worst (lowest) first; the best bid is last.
    pub bids: Vec<PriceLevel>,
    /// Ask levels, worst (highest) first; the best ask is last.
    pub asks: Vec<PriceLevel>,
    /// Smallest order the venue accepts, in quote currency.
    #[cfg_attr(feature = "serde", serde(alias = "minOrderSize"))]
    pub min_order_size: String,
    /// Opaque fingerprint from the data source, for cheap change detection.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hash: String,
}

impl OrderBook {
    pub fn new(
        bids: Vec<PriceLevel>,
        asks: Vec<PriceLevel>,
        min_order_size: impl Into<String>,
        hash: impl Into<String>,
    ) -> Self {
        Self {
            bids,
            asks,
            min_order_size: min_order_size.into(),
            hash: hash.into(),
        }
    }

    /// Returns the highest bid, if any.
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.last()
    }

    /// Returns the lowest ask, if any.
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.last()
    }

    /// Levels a taker on `side` consumes, stored worst-to-best.
    pub fn liquidity_for(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Buy => &self.asks,
            Side::Sell => &self.bids,
        }
    }

    /// Levels a taker on `side` consumes, best price first.
    pub fn iter_best_to_worst(&self, side: Side) -> impl Iterator<Item = &PriceLevel> {
        self.liquidity_for(side).iter().rev()
    }

    /// Total tokens available to a taker on `side`.
    pub fn total_size(&self, side: Side) -> Result<String> {
        let mut total = Scaled::ZERO;
        for level in self.liquidity_for(side) {
            total = total.checked_add(&Scaled::parse(&level.size)?)?;
        }
        Ok(total.to_string())
    }

    /// Quote currency needed to take every level on `side`, fees excluded.
    pub fn total_notional(&self, side: Side) -> Result<String> {
        let mut total = Scaled::ZERO;
        for level in self.liquidity_for(side) {
            let notional = Scaled::parse(&level.price)?.checked_mul(&Scaled::parse(&level.size)?)?;
            total = total.checked_add(&notional)?;
        }
        Ok(total.to_string())
    }

    /// Returns true if neither side has any level.
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Copy of the book with every numeral in canonical form.
    ///
    /// Feeds often send `"0.50"` or `" 12 "`; this fails with
    /// [`MathError::InvalidNumeral`](crate::MathError::InvalidNumeral) on the
    /// first field that is not a number at all.
    pub fn sanitized(&self) -> Result<Self> {
        Ok(Self {
            bids: self
                .bids
                .iter()
                .map(PriceLevel::sanitized)
                .collect::<Result<_>>()?,
            asks: self
                .asks
                .iter()
                .map(PriceLevel::sanitized)
                .collect::<Result<_>>()?,
            min_order_size: safe_math::normalize(&self.min_order_size)?,
            hash: self.hash.clone(),
        })
    }
}
