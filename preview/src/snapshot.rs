//! Book snapshot files.

use std::io::ErrorKind;
use std::path::Path;

use safebook::{OrderBook, persistence};

use crate::error::{Error, Result};

/// Load and sanitize a JSON book snapshot.
pub fn load(path: &Path) -> Result<OrderBook> {
    persistence::load_book(path).map_err(|source| {
        let path = path.to_path_buf();
        match source.kind() {
            ErrorKind::InvalidData => Error::SnapshotParse { path, source },
            _ => Error::SnapshotRead { path, source },
        }
    })
}
