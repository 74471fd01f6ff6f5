//! Execution simulator: walk an order-book snapshot to preview a market order.
//!
//! Both walks are greedy: take the best level first, then the next worse one,
//! until the requested size is met or the side runs dry. They stop at the
//! first level that satisfies the request, so the cost of a call grows with
//! the levels touched, not the depth of the book.
//!
//! Fees are applied asymmetrically on purpose:
//! - a buyer must afford `price + fee` per token for a level to count as
//!   fully taken, so the budget is never overspent on fees;
//! - a seller's consumption is bound by quantity alone, and the fee only
//!   comes out of the proceeds afterwards.

use log::{debug, trace};

use crate::error::Result;
use crate::numeral::Scaled;
use crate::{BuyExecution, Execution, OrderBook, PriceLevel, SellExecution, Side};

/// Price of a book's best level, or zero when that side is empty.
fn best_price(level: Option<&PriceLevel>) -> Result<Scaled> {
    match level {
        Some(level) => Scaled::parse(&level.price),
        None => Ok(Scaled::ZERO),
    }
}

/// Preview a market buy that spends `buy_amount_quote` of quote currency.
///
/// `fee_per_token` is a flat quote-currency charge per token received. An
/// absent book yields [`BuyExecution::zero`]. Running out of asks is not an
/// error; it sets `has_insufficient_liquidity`.
///
/// ```
/// use safebook::{OrderBook, PriceLevel, simulate_buy};
///
/// let book = OrderBook::new(
///     vec![],
///     vec![PriceLevel::new("10", "5"), PriceLevel::new("9", "3")],
///     "1",
///     "h1",
/// );
/// let preview = simulate_buy(Some(&book), "27", "0").unwrap();
/// assert_eq!(preview.tokens_bought, "3");
/// assert_eq!(preview.average_price, "9");
/// assert!(!preview.has_insufficient_liquidity);
/// ```
pub fn simulate_buy(
    book: Option<&OrderBook>,
    buy_amount_quote: &str,
    fee_per_token: &str,
) -> Result<BuyExecution> {
    let Some(book) = book else {
        return Ok(BuyExecution::zero());
    };
    let fee_per_token = Scaled::parse(fee_per_token)?;
    let mut remaining = Scaled::parse(buy_amount_quote)?;
    let mut tokens_bought = Scaled::ZERO;
    let mut spent_on_tokens = Scaled::ZERO;
    let mut worst_price = Scaled::ZERO;

    for ask in book.iter_best_to_worst(Side::Buy) {
        if !remaining.is_positive() {
            break;
        }
        let price = Scaled::parse(&ask.price)?;
        let size = Scaled::parse(&ask.size)?;
        let effective_price = price.checked_add(&fee_per_token)?;
        let level_cost = effective_price.checked_mul(&size)?;

        if remaining >= level_cost {
            tokens_bought = tokens_bought.checked_add(&size)?;
            spent_on_tokens = spent_on_tokens.checked_add(&price.checked_mul(&size)?)?;
            remaining = remaining.checked_sub(&level_cost)?;
            trace!("buy took ask {} x {}, {} left", price, size, remaining);
            worst_price = price;
        } else {
            let tokens_to_buy = remaining.checked_div(&effective_price)?;
            tokens_bought = tokens_bought.checked_add(&tokens_to_buy)?;
            spent_on_tokens = spent_on_tokens.checked_add(&price.checked_mul(&tokens_to_buy)?)?;
            trace!("buy partially took ask {} x {} of {}", price, tokens_to_buy, size);
            remaining = Scaled::ZERO;
            worst_price = price;
            break;
        }
    }

    let has_insufficient_liquidity = remaining.is_positive();
    if has_insufficient_liquidity {
        debug!(
            "book {} exhausted on buy: {} quote unspent after {} tokens",
            book.hash, remaining, tokens_bought
        );
    }

    let average_price = if tokens_bought.is_positive() {
        spent_on_tokens.checked_div(&tokens_bought)?
    } else {
        Scaled::ZERO
    };
    let fee = tokens_bought.checked_mul(&fee_per_token)?;

    let best_ask = best_price(book.best_ask())?;
    let best_bid = best_price(book.best_bid())?;
    let spread = if book.asks.is_empty() || book.bids.is_empty() {
        Scaled::ZERO
    } else {
        best_ask.checked_sub(&best_bid)?
    };

    let min_order_size = Scaled::parse(&book.min_order_size)?;
    let min_buy_amount_usd = min_order_size.max(Scaled::one());

    Ok(BuyExecution {
        average_price: average_price.to_string(),
        worst_price: worst_price.to_string(),
        best_price: best_ask.to_string(),
        fee: fee.to_string(),
        tokens_bought: tokens_bought.to_string(),
        has_insufficient_liquidity,
        spread: spread.to_string(),
        min_buy_amount_usd: min_buy_amount_usd.to_string(),
    })
}

/// Preview a market sell of `sell_amount_tokens` tokens.
///
/// Fees (`fee_per_token` per token sold) are deducted from the gross
/// proceeds only. An absent book yields [`SellExecution::zero`].
///
/// ```
/// use safebook::{OrderBook, PriceLevel, simulate_sell};
///
/// let book = OrderBook::new(
///     vec![PriceLevel::new("5", "2"), PriceLevel::new("6", "4")],
///     vec![],
///     "1",
///     "h1",
/// );
/// let preview = simulate_sell(Some(&book), "4", "0.01").unwrap();
/// assert_eq!(preview.tokens_sold, "4");
/// assert_eq!(preview.gross_proceeds_usd, "24");
/// assert_eq!(preview.expected_payout_usd, "23.96");
/// ```
pub fn simulate_sell(
    book: Option<&OrderBook>,
    sell_amount_tokens: &str,
    fee_per_token: &str,
) -> Result<SellExecution> {
    let Some(book) = book else {
        return Ok(SellExecution::zero());
    };
    let fee_per_token = Scaled::parse(fee_per_token)?;
    let mut remaining = Scaled::parse(sell_amount_tokens)?;
    let mut tokens_sold = Scaled::ZERO;
    let mut gross_proceeds = Scaled::ZERO;
    let mut worst_price = Scaled::ZERO;

    for bid in book.iter_best_to_worst(Side::Sell) {
        if !remaining.is_positive() {
            break;
        }
        let price = Scaled::parse(&bid.price)?;
        let size = Scaled::parse(&bid.size)?;

        if remaining >= size {
            tokens_sold = tokens_sold.checked_add(&size)?;
            gross_proceeds = gross_proceeds.checked_add(&price.checked_mul(&size)?)?;
            remaining = remaining.checked_sub(&size)?;
            trace!("sell took bid {} x {}, {} left", price, size, remaining);
            worst_price = price;
        } else {
            tokens_sold = tokens_sold.checked_add(&remaining)?;
            gross_proceeds = gross_proceeds.checked_add(&price.checked_mul(&remaining)?)?;
            trace!("sell partially took bid {} x {} of {}", price, remaining, size);
            remaining = Scaled::ZERO;
            worst_price = price;
            break;
        }
    }

    let has_insufficient_liquidity = remaining.is_positive();
    if has_insufficient_liquidity {
        debug!(
            "book {} exhausted on sell: {} tokens unsold after {}",
            book.hash, remaining, tokens_sold
        );
    }

    let average_price = if tokens_sold.is_positive() {
        gross_proceeds.checked_div(&tokens_sold)?
    } else {
        Scaled::ZERO
    };
    let fee = tokens_sold.checked_mul(&fee_per_token)?;
    let expected_payout = gross_proceeds.checked_sub(&fee)?;

    let best_bid = best_price(book.best_bid())?;
    let best_ask = best_price(book.best_ask())?;
    let has_no_liquidity_at_market_price = !best_bid.is_positive();
    let spread = if best_ask.is_positive() && best_bid.is_positive() {
        best_ask.checked_sub(&best_bid)?
    } else {
        Scaled::ZERO
    };

    Ok(SellExecution {
        average_price: average_price.to_string(),
        worst_price: worst_price.to_string(),
        best_price: best_bid.to_string(),
        fee: fee.to_string(),
        tokens_sold: tokens_sold.to_string(),
        gross_proceeds_usd: gross_proceeds.to_string(),
        expected_payout_usd: expected_payout.to_string(),
        has_insufficient_liquidity,
        has_no_liquidity_at_market_price,
        spread: spread.to_string(),
    })
}

/// Preview a market order on either side.
///
/// `amount` is quote currency for [`Side::Buy`] and tokens for [`Side::Sell`].
pub fn simulate(
    book: Option<&OrderBook>,
    side: Side,
    amount: &str,
    fee_per_token: &str,
) -> Result<Execution> {
    match side {
        Side::Buy => simulate_buy(book, amount, fee_per_token).map(Execution::Buy),
        Side::Sell => simulate_sell(book, amount, fee_per_token).map(Execution::Sell),
    }
}
