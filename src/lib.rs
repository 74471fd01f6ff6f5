//! # safebook
//!
//! Exact decimal arithmetic and market-order previews for prediction-market
//! order books.
//!
//! ## Features
//!
//! - **String-in, string-out math**: every value crosses the API as a plain
//!   decimal numeral, so nothing is silently rounded through `f64`
//! - **Bounded precision**: values are written with at most 76 digits;
//!   larger values are an error, never a wrong answer
//! - **Truncating division**: quotients keep 18 fractional digits, truncated
//!   toward zero
//! - **Execution previews**: walk a book snapshot to preview the average
//!   price, slippage, fees and liquidity of a market buy or sell
//!
//! ## Quick Start
//!
//! ```
//! use safebook::safe_math;
//!
//! assert_eq!(safe_math::add("0.1", "0.2").unwrap(), "0.3");
//! assert_eq!(safe_math::multiply("1.5", "0.2").unwrap(), "0.3");
//! assert_eq!(safe_math::divide("1", "3").unwrap(), "0.333333333333333333");
//! ```
//!
//! ## Previewing a Market Order
//!
//! Book sides are stored worst-to-best; the best level is last:
//!
//! ```
//! use safebook::{OrderBook, PriceLevel, simulate_buy, simulate_sell};
//!
//! let book = OrderBook::new(
//!     vec![PriceLevel::new("5", "2"), PriceLevel::new("6", "4")],
//!     vec![PriceLevel::new("10", "5"), PriceLevel::new("9", "3")],
//!     "1",
//!     "snapshot-1",
//! );
//!
//! // Spend 47 quote units: 3 tokens at 9, then 2 tokens at 10
//! let buy = simulate_buy(Some(&book), "47", "0").unwrap();
//! assert_eq!(buy.tokens_bought, "5");
//! assert_eq!(buy.average_price, "9.4");
//! assert_eq!(buy.worst_price, "10");
//! assert_eq!(buy.spread, "3");
//!
//! // Sell 5 tokens: 4 at 6, then 1 at 5
//! let sell = simulate_sell(Some(&book), "5", "0").unwrap();
//! assert_eq!(sell.gross_proceeds_usd, "29");
//! assert_eq!(sell.average_price, "5.8");
//! ```
//!
//! ## Errors
//!
//! Malformed numerals, overflow past [`safe_math::MAX_PRECISION`] and
//! division by zero surface as [`MathError`]:
//!
//! ```
//! use safebook::{MathError, safe_math};
//!
//! assert_eq!(safe_math::divide("1", "0"), Err(MathError::DivisionByZero));
//! assert!(matches!(safe_math::add("1e", "1"), Err(MathError::InvalidNumeral(_))));
//! ```

pub mod amount;
mod book;
mod error;
mod execution;
mod magnitude;
mod numeral;
#[cfg(feature = "persistence")]
pub mod persistence;
pub mod safe_math;
mod side;
mod simulate;

// Re-export public API
pub use amount::OrderValidation;
pub use book::{OrderBook, PriceLevel};
pub use error::{MathError, Result};
pub use execution::{BuyExecution, Execution, SellExecution};
pub use side::Side;
pub use simulate::{simulate, simulate_buy, simulate_sell};
