//! safebook-preview: market-order previews from the command line.
//!
//! Loads order-book snapshots from JSON, runs them through the safebook
//! simulator with a configured fee, and prints the result either once
//! (`preview buy`/`preview sell`) or from an interactive session
//! (`preview repl`).

pub mod config;
pub mod derived;
pub mod error;
pub mod render;
pub mod repl;
pub mod snapshot;
