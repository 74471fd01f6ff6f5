//! Plain-text tables for previews and books.

use std::fmt::Write;

use safebook::{Execution, OrderBook, OrderValidation, Side, safe_math};

use crate::error::Result;

fn fixed(value: &str, places: usize) -> Result<String> {
    Ok(safe_math::to_fixed(value, places)?)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Render an execution preview as a two-column table.
///
/// Prices and amounts are shown with `places` decimals, rounded half away
/// from zero; the underlying values are untouched.
pub fn execution_table(execution: &Execution, places: usize) -> Result<String> {
    let mut rows: Vec<(&str, String)> = Vec::new();
    match execution {
        Execution::Buy(buy) => {
            rows.push(("tokens bought", fixed(&buy.tokens_bought, places)?));
            rows.push(("average price", fixed(&buy.average_price, places)?));
            rows.push(("best price", fixed(&buy.best_price, places)?));
            rows.push(("worst price", fixed(&buy.worst_price, places)?));
            rows.push(("fee", fixed(&buy.fee, places)?));
            rows.push(("spread", fixed(&buy.spread, places)?));
            rows.push(("amount to win", fixed(&buy.amount_to_win(), places)?));
            rows.push(("min buy (USD)", fixed(&buy.min_buy_amount_usd, places)?));
            rows.push((
                "insufficient liquidity",
                yes_no(buy.has_insufficient_liquidity).into(),
            ));
        }
        Execution::Sell(sell) => {
            rows.push(("tokens sold", fixed(&sell.tokens_sold, places)?));
            rows.push(("average price", fixed(&sell.average_price, places)?));
            rows.push(("best price", fixed(&sell.best_price, places)?));
            rows.push(("worst price", fixed(&sell.worst_price, places)?));
            rows.push(("price impact", fixed(&sell.price_impact()?, places)?));
            rows.push(("gross proceeds", fixed(&sell.gross_proceeds_usd, places)?));
            rows.push(("fee", fixed(&sell.fee, places)?));
            rows.push(("expected payout", fixed(&sell.expected_payout_usd, places)?));
            rows.push(("spread", fixed(&sell.spread, places)?));
            rows.push((
                "insufficient liquidity",
                yes_no(sell.has_insufficient_liquidity).into(),
            ));
            rows.push((
                "no liquidity at market",
                yes_no(sell.has_no_liquidity_at_market_price).into(),
            ));
        }
    }

    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let mut out = String::new();
    let _ = writeln!(out, "  {} preview", execution.side());
    let _ = writeln!(out, "  {}", "─".repeat(width + 20));
    for (label, value) in rows {
        let _ = writeln!(out, "  {label:<width$}  {value:>18}");
    }
    Ok(out)
}

/// One-line verdict for an order form.
pub fn validation_line(side: Side, verdict: &OrderValidation) -> String {
    let marker = if verdict.is_valid() { "✓" } else { "✗" };
    format!("  {marker} {} check: {verdict}", side.to_string().to_lowercase())
}

/// Render a book ladder, asks on top, best prices meeting at the spread.
pub fn book_ladder(book: &OrderBook, places: usize) -> Result<String> {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "            ORDER BOOK");
    let _ = writeln!(out, "  ──────────────────────────────");

    if book.is_empty() {
        let _ = writeln!(out, "  (empty)");
        return Ok(out);
    }

    // Stored worst-to-best, so asks already print highest first.
    for level in &book.asks {
        let _ = writeln!(
            out,
            "  ASK {:>12}  {:>14}",
            fixed(&level.price, places)?,
            fixed(&level.size, places)?
        );
    }

    match (book.best_bid(), book.best_ask()) {
        (Some(bid), Some(ask)) => {
            let spread = safe_math::subtract(&ask.price, &bid.price)?;
            let _ = writeln!(out, "  ─────── spread: {} ───────", fixed(&spread, places)?);
        }
        _ => {
            let _ = writeln!(out, "  ─────── (no spread) ───────");
        }
    }

    for level in book.bids.iter().rev() {
        let _ = writeln!(
            out,
            "  BID {:>12}  {:>14}",
            fixed(&level.price, places)?,
            fixed(&level.size, places)?
        );
    }

    let _ = writeln!(
        out,
        "  min order {}{}",
        fixed(&book.min_order_size, places)?,
        if book.hash.is_empty() {
            String::new()
        } else {
            format!("  (hash {})", book.hash)
        }
    );
    Ok(out)
}
