//! Memoized previews.
//!
//! A UI re-renders far more often than the book or the order form change.
//! [`DerivedPreview`] keeps the last execution and only re-runs the
//! simulator when the book fingerprint, side, amount or fee differ from the
//! previous call.

use log::debug;

use safebook::{Execution, OrderBook, Side, safe_math, simulate};

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq)]
struct PreviewKey {
    hash: String,
    side: Side,
    amount: String,
    fee: String,
}

/// Result of [`DerivedPreview::get`].
#[derive(Debug)]
pub struct Preview<'a> {
    pub execution: &'a Execution,
    /// The simulator actually ran for this call.
    pub recomputed: bool,
    /// The execution differs from the one returned by the previous call.
    pub changed: bool,
}

/// Memo adapter around [`safebook::simulate`].
#[derive(Debug, Default)]
pub struct DerivedPreview {
    cached: Option<(PreviewKey, Execution)>,
    recomputations: u64,
}

impl DerivedPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preview a market order, reusing the previous result when nothing it
    /// depends on has changed.
    ///
    /// Amounts and fees are compared by value, so `"1.50"` hits the entry
    /// cached for `"1.5"`. A book without a hash is never cached, and a
    /// failed call clears the cache.
    pub fn get(
        &mut self,
        book: &OrderBook,
        side: Side,
        amount: &str,
        fee_per_token: &str,
    ) -> Result<Preview<'_>> {
        let key = PreviewKey {
            hash: book.hash.clone(),
            side,
            amount: safe_math::normalize(amount)?,
            fee: safe_math::normalize(fee_per_token)?,
        };
        let (entry, recomputed, changed) = match self.cached.take() {
            Some(entry) if !key.hash.is_empty() && entry.0 == key => {
                debug!("preview cache hit for book {}", key.hash);
                (entry, false, false)
            }
            previous => {
                let execution = simulate(Some(book), side, &key.amount, &key.fee)?;
                self.recomputations += 1;
                let changed = previous.is_none_or(|(_, previous)| previous != execution);
                ((key, execution), true, changed)
            }
        };
        let (_, execution) = self.cached.insert(entry);
        Ok(Preview {
            execution,
            recomputed,
            changed,
        })
    }

    /// Drop the cached preview.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// How many times the simulator has run.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
