//! Property-based tests for decimal and simulator invariants.
//!
//! These tests use proptest to check the decimal engine against exact
//! `i128` reference arithmetic, and the simulator's conservation and
//! monotonicity guarantees across randomly generated books.

use std::cmp::Ordering;

use proptest::prelude::*;
use safebook::{OrderBook, PriceLevel, Side, safe_math, simulate_buy, simulate_sell};

/// Render `mantissa / 10^scale` as a positional numeral.
fn decimal(mantissa: i128, scale: u32) -> String {
    let digits = mantissa.unsigned_abs().to_string();
    let scale = scale as usize;
    let padded = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (int, frac) = padded.split_at(padded.len() - scale);
    let sign = if mantissa < 0 { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{int}")
    } else {
        format!("{sign}{int}.{frac}")
    }
}

fn canonical(mantissa: i128, scale: u32) -> String {
    safe_math::normalize(&decimal(mantissa, scale)).unwrap()
}

/// A decimal as (mantissa, scale).
fn scaled_strategy() -> impl Strategy<Value = (i128, u32)> {
    (-999_999_999_999i128..=999_999_999_999i128, 0u32..=8u32)
}

/// Book side with distinct prices in `0.01..=0.99` and sizes in `1..=500`.
fn levels_strategy() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::btree_map(1u32..=99u32, 1u32..=500u32, 1..12)
        .prop_map(|levels| levels.into_iter().collect())
}

fn cents(c: u32) -> String {
    canonical(c as i128, 2)
}

/// Asks stored worst (highest) first.
fn ask_book(levels: &[(u32, u32)]) -> OrderBook {
    let asks = levels
        .iter()
        .rev()
        .map(|&(price, size)| PriceLevel::new(cents(price), size.to_string()))
        .collect();
    OrderBook::new(vec![], asks, "1", "prop")
}

/// Bids stored worst (lowest) first.
fn bid_book(levels: &[(u32, u32)]) -> OrderBook {
    let bids = levels
        .iter()
        .map(|&(price, size)| PriceLevel::new(cents(price), size.to_string()))
        .collect();
    OrderBook::new(bids, vec![], "1", "prop")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // ========================================================================
    // REFERENCE ARITHMETIC
    // ========================================================================

    /// Addition agrees with exact i128 arithmetic
    #[test]
    fn add_matches_reference((ma, sa) in scaled_strategy(), (mb, sb) in scaled_strategy()) {
        let scale = sa.max(sb);
        let expected = ma * 10i128.pow(scale - sa) + mb * 10i128.pow(scale - sb);
        let got = safe_math::add(&decimal(ma, sa), &decimal(mb, sb)).unwrap();
        prop_assert_eq!(got, canonical(expected, scale));
    }

    /// Subtraction agrees with exact i128 arithmetic
    #[test]
    fn subtract_matches_reference((ma, sa) in scaled_strategy(), (mb, sb) in scaled_strategy()) {
        let scale = sa.max(sb);
        let expected = ma * 10i128.pow(scale - sa) - mb * 10i128.pow(scale - sb);
        let got = safe_math::subtract(&decimal(ma, sa), &decimal(mb, sb)).unwrap();
        prop_assert_eq!(got, canonical(expected, scale));
    }

    /// Multiplication is exact
    #[test]
    fn multiply_matches_reference((ma, sa) in scaled_strategy(), (mb, sb) in scaled_strategy()) {
        let got = safe_math::multiply(&decimal(ma, sa), &decimal(mb, sb)).unwrap();
        prop_assert_eq!(got, canonical(ma * mb, sa + sb));
    }

    /// Division truncates toward zero at 18 fractional digits
    #[test]
    fn divide_truncates_like_integer_division(
        (ma, sa) in scaled_strategy(),
        (mb, sb) in scaled_strategy(),
    ) {
        prop_assume!(mb != 0);
        let numerator = ma * 10i128.pow(sb + 18);
        let denominator = mb * 10i128.pow(sa);
        let expected = numerator / denominator;
        let got = safe_math::divide(&decimal(ma, sa), &decimal(mb, sb)).unwrap();
        prop_assert_eq!(got, canonical(expected, 18));
    }

    /// Ordering agrees with the reference
    #[test]
    fn compare_matches_reference((ma, sa) in scaled_strategy(), (mb, sb) in scaled_strategy()) {
        let scale = sa.max(sb);
        let expected = (ma * 10i128.pow(scale - sa)).cmp(&(mb * 10i128.pow(scale - sb)));
        let a = decimal(ma, sa);
        let b = decimal(mb, sb);
        prop_assert_eq!(safe_math::compare(&a, &b).unwrap(), expected);
        prop_assert_eq!(safe_math::greater_than(&a, &b).unwrap(), expected == Ordering::Greater);
        prop_assert_eq!(safe_math::less_than_or_equal(&a, &b).unwrap(), expected != Ordering::Greater);
        prop_assert_eq!(safe_math::equal(&a, &b).unwrap(), expected == Ordering::Equal);
    }

    // ========================================================================
    // IDENTITIES
    // ========================================================================

    /// (a + b) - b == a
    #[test]
    fn add_then_subtract_is_identity((ma, sa) in scaled_strategy(), (mb, sb) in scaled_strategy()) {
        let a = decimal(ma, sa);
        let b = decimal(mb, sb);
        let sum = safe_math::add(&a, &b).unwrap();
        prop_assert_eq!(safe_math::subtract(&sum, &b).unwrap(), safe_math::normalize(&a).unwrap());
    }

    /// Canonical output parses back to itself
    #[test]
    fn canonical_form_round_trips((ma, sa) in scaled_strategy()) {
        let once = safe_math::normalize(&decimal(ma, sa)).unwrap();
        prop_assert_eq!(safe_math::normalize(&once).unwrap(), once.clone());
        prop_assert_eq!(safe_math::trim_trailing_zeros(&once), once);
    }

    /// Trimming trailing zeros never changes the value
    #[test]
    fn trim_preserves_value(
        (ma, sa) in scaled_strategy(),
        pad in 0usize..6,
        exponent in prop::option::of(-12i32..=12i32),
    ) {
        let mut text = decimal(ma, sa);
        if sa > 0 {
            text.push_str(&"0".repeat(pad));
        }
        if let Some(e) = exponent {
            text.push_str(&format!("e{e}"));
        }
        let trimmed = safe_math::trim_trailing_zeros(&text);
        prop_assert!(safe_math::equal(&trimmed, &text).unwrap());
    }

    /// floor(a) <= a <= ceil(a), and they differ by at most one
    #[test]
    fn floor_and_ceil_bracket((ma, sa) in scaled_strategy()) {
        let a = decimal(ma, sa);
        let floor = safe_math::floor(&a).unwrap();
        let ceil = safe_math::ceil(&a).unwrap();
        prop_assert!(safe_math::less_than_or_equal(&floor, &a).unwrap());
        prop_assert!(safe_math::greater_than_or_equal(&ceil, &a).unwrap());
        let gap = safe_math::subtract(&ceil, &floor).unwrap();
        prop_assert!(gap == "0" || gap == "1");
    }

    /// max and min select one of their inputs
    #[test]
    fn max_min_select_inputs((ma, sa) in scaled_strategy(), (mb, sb) in scaled_strategy()) {
        let a = safe_math::normalize(&decimal(ma, sa)).unwrap();
        let b = safe_math::normalize(&decimal(mb, sb)).unwrap();
        let hi = safe_math::max(&a, &b).unwrap();
        let lo = safe_math::min(&a, &b).unwrap();
        prop_assert!(hi == a || hi == b);
        prop_assert!(lo == a || lo == b);
        prop_assert!(safe_math::less_than_or_equal(&lo, &hi).unwrap());
    }

    // ========================================================================
    // SIMULATOR: BUY
    // ========================================================================

    /// Tokens bought never exceed the ask depth; without fees the buy runs
    /// short exactly when the budget exceeds the book's notional
    #[test]
    fn buy_conservation(levels in levels_strategy(), budget in 0u32..100_000u32) {
        let book = ask_book(&levels);
        let budget = cents(budget);
        let exec = simulate_buy(Some(&book), &budget, "0").unwrap();

        let depth = book.total_size(Side::Buy).unwrap();
        prop_assert!(safe_math::less_than_or_equal(&exec.tokens_bought, &depth).unwrap());

        let notional = book.total_notional(Side::Buy).unwrap();
        prop_assert_eq!(
            exec.has_insufficient_liquidity,
            safe_math::greater_than(&budget, &notional).unwrap()
        );

        // Quote actually spent stays within budget
        let spent = safe_math::multiply(&exec.average_price, &exec.tokens_bought).unwrap();
        prop_assert!(safe_math::less_than_or_equal(&spent, &budget).unwrap());
    }

    /// Average buy price sits between the best and worst prices touched
    #[test]
    fn buy_average_is_bracketed(levels in levels_strategy(), budget in 1u32..100_000u32) {
        let book = ask_book(&levels);
        let exec = simulate_buy(Some(&book), &cents(budget), "0").unwrap();
        prop_assume!(!safe_math::is_zero(&exec.tokens_bought).unwrap());
        prop_assert!(safe_math::less_than_or_equal(&exec.best_price, &exec.average_price).unwrap());
        prop_assert!(safe_math::less_than_or_equal(&exec.average_price, &exec.worst_price).unwrap());
    }

    /// A bigger budget buys at least as many tokens at no better an average
    #[test]
    fn buy_is_monotone(levels in levels_strategy(), a in 0u32..50_000u32, b in 0u32..50_000u32) {
        let book = ask_book(&levels);
        let (small, large) = (a.min(b), a.max(b));
        let lo = simulate_buy(Some(&book), &cents(small), "0").unwrap();
        let hi = simulate_buy(Some(&book), &cents(large), "0").unwrap();
        prop_assert!(safe_math::less_than_or_equal(&lo.tokens_bought, &hi.tokens_bought).unwrap());
        if !safe_math::is_zero(&lo.tokens_bought).unwrap() {
            prop_assert!(safe_math::less_than_or_equal(&lo.average_price, &hi.average_price).unwrap());
        }
    }

    /// Fees never buy more tokens than the fee-free walk
    #[test]
    fn buy_fee_reduces_tokens(levels in levels_strategy(), budget in 0u32..50_000u32, fee in 0u32..10u32) {
        let book = ask_book(&levels);
        let budget = cents(budget);
        let free = simulate_buy(Some(&book), &budget, "0").unwrap();
        let charged = simulate_buy(Some(&book), &budget, &cents(fee)).unwrap();
        prop_assert!(safe_math::less_than_or_equal(&charged.tokens_bought, &free.tokens_bought).unwrap());
        let expected_fee = safe_math::multiply(&charged.tokens_bought, &cents(fee)).unwrap();
        prop_assert_eq!(charged.fee, expected_fee);
    }

    // ========================================================================
    // SIMULATOR: SELL
    // ========================================================================

    /// Tokens sold == min(requested, depth); payout == gross - fee
    #[test]
    fn sell_conservation(levels in levels_strategy(), qty in 0u32..8_000u32, fee in 0u32..10u32) {
        let book = bid_book(&levels);
        let qty = qty.to_string();
        let fee = cents(fee);
        let exec = simulate_sell(Some(&book), &qty, &fee).unwrap();

        let depth = book.total_size(Side::Sell).unwrap();
        prop_assert_eq!(exec.tokens_sold.clone(), safe_math::min(&qty, &depth).unwrap());
        prop_assert_eq!(
            exec.has_insufficient_liquidity,
            safe_math::greater_than(&qty, &depth).unwrap()
        );
        prop_assert_eq!(
            exec.expected_payout_usd,
            safe_math::subtract(&exec.gross_proceeds_usd, &exec.fee).unwrap()
        );
        prop_assert!(!exec.has_no_liquidity_at_market_price);
    }

    /// Selling more raises gross proceeds and never improves the average
    #[test]
    fn sell_is_monotone(levels in levels_strategy(), a in 1u32..8_000u32, b in 1u32..8_000u32) {
        let book = bid_book(&levels);
        let (small, large) = (a.min(b), a.max(b));
        let lo = simulate_sell(Some(&book), &small.to_string(), "0").unwrap();
        let hi = simulate_sell(Some(&book), &large.to_string(), "0").unwrap();
        prop_assert!(
            safe_math::less_than_or_equal(&lo.gross_proceeds_usd, &hi.gross_proceeds_usd).unwrap()
        );
        prop_assert!(
            safe_math::greater_than_or_equal(&lo.average_price, &hi.average_price).unwrap()
        );
        prop_assert!(safe_math::greater_than_or_equal(&hi.price_impact().unwrap(), "0").unwrap());
    }
}
