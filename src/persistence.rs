//! File-based persistence for order-book snapshots.
//!
//! A snapshot is stored as a single JSON object with `bids`, `asks`,
//! `min_order_size` (or the feed's `minOrderSize`) and an optional `hash`.
//! Loaded books are canonicalized with [`OrderBook::sanitized`].
//!
//! # Usage
//!
//! ```ignore
//! use safebook::persistence;
//! use std::path::Path;
//!
//! let book = persistence::load_book(Path::new("book.json")).unwrap();
//! persistence::save_book(&book, Path::new("copy.json")).unwrap();
//! ```

use std::io::{self, Write};
use std::path::Path;

use crate::OrderBook;

/// Save a snapshot as pretty-printed JSON.
pub fn save_book(book: &OrderBook, path: &Path) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, book)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer)?;
    writer.flush()
}

/// Parse a snapshot from a JSON string.
///
/// Fails with [`io::ErrorKind::InvalidData`] on malformed JSON or on a
/// price or size that is not a decimal numeral.
pub fn parse_book(json: &str) -> io::Result<OrderBook> {
    let raw: OrderBook = serde_json::from_str(json)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    raw.sanitized()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Load a snapshot from a JSON file.
pub fn load_book(path: &Path) -> io::Result<OrderBook> {
    let json = std::fs::read_to_string(path)?;
    parse_book(&json)
}
