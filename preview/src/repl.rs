//! Interactive preview session.
//!
//! Books are loaded from JSON snapshots under a short name; buy and sell
//! commands preview against the book in use through a [`DerivedPreview`].

use std::io::{BufRead, Write};
use std::path::Path;

use log::{info, warn};
use rustc_hash::FxHashMap;

use safebook::amount::{validate_buy, validate_sell};
use safebook::{Execution, OrderBook, Side, safe_math};

use crate::config::Config;
use crate::derived::DerivedPreview;
use crate::error::{Error, Result};
use crate::render;
use crate::snapshot;

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// State of one interactive session.
pub struct Session {
    books: FxHashMap<String, OrderBook>,
    current: Option<String>,
    fee_per_token: String,
    balance: Option<String>,
    places: usize,
    preview: DerivedPreview,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            books: FxHashMap::default(),
            current: None,
            fee_per_token: config.fees.fee_per_token.clone(),
            balance: None,
            places: config.display.places,
            preview: DerivedPreview::new(),
        }
    }

    /// Register a book under `name`; the first book loaded becomes current.
    pub fn insert_book(&mut self, name: &str, book: OrderBook) {
        self.books.insert(name.to_string(), book);
        if self.current.is_none() {
            self.current = Some(name.to_string());
        }
    }

    pub fn current_book(&self) -> Result<&OrderBook> {
        let name = self
            .current
            .as_deref()
            .ok_or_else(|| Error::Usage("no book loaded (load <name> <path>)".into()))?;
        self.books
            .get(name)
            .ok_or_else(|| Error::UnknownBook(name.to_string()))
    }

    pub fn fee_per_token(&self) -> &str {
        &self.fee_per_token
    }

    /// Run one command line, writing its output to `out`.
    pub fn execute(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts.first().map(|s| s.to_lowercase());

        match cmd.as_deref() {
            Some("help" | "h" | "?") => print_help(out)?,
            Some("quit" | "exit" | "q") => return Ok(Flow::Quit),
            Some("load") => self.handle_load(&parts[1..], out)?,
            Some("use") => self.handle_use(&parts[1..], out)?,
            Some("books") => self.handle_books(out)?,
            Some("book" | "b") => {
                let ladder = render::book_ladder(self.current_book()?, self.places)?;
                write!(out, "{ladder}")?;
            }
            Some("buy") => self.handle_preview(Side::Buy, &parts[1..], out)?,
            Some("sell") => self.handle_preview(Side::Sell, &parts[1..], out)?,
            Some("fee") => self.handle_fee(&parts[1..], out)?,
            Some("balance") => self.handle_balance(&parts[1..], out)?,
            Some(cmd) => writeln!(out, "Unknown command: '{cmd}'. Type 'help' for commands.")?,
            None => {}
        }
        Ok(Flow::Continue)
    }

    fn handle_load(&mut self, args: &[&str], out: &mut impl Write) -> Result<()> {
        let [name, path] = args else {
            return Err(Error::Usage("load <name> <path>".into()));
        };
        let book = snapshot::load(Path::new(path))?;
        writeln!(
            out,
            "Loaded '{name}': {} bids, {} asks",
            book.bids.len(),
            book.asks.len()
        )?;
        info!("loaded book {name} from {path}");
        self.insert_book(name, book);
        Ok(())
    }

    fn handle_use(&mut self, args: &[&str], out: &mut impl Write) -> Result<()> {
        let [name] = args else {
            return Err(Error::Usage("use <name>".into()));
        };
        if !self.books.contains_key(*name) {
            return Err(Error::UnknownBook(name.to_string()));
        }
        self.current = Some(name.to_string());
        writeln!(out, "Using '{name}'")?;
        Ok(())
    }

    fn handle_books(&self, out: &mut impl Write) -> Result<()> {
        if self.books.is_empty() {
            writeln!(out, "No books loaded.")?;
            return Ok(());
        }
        let mut names: Vec<&String> = self.books.keys().collect();
        names.sort();
        for name in names {
            let marker = if self.current.as_ref() == Some(name) { "*" } else { " " };
            writeln!(out, " {marker} {name}")?;
        }
        Ok(())
    }

    fn handle_fee(&mut self, args: &[&str], out: &mut impl Write) -> Result<()> {
        match args {
            [] => writeln!(out, "Fee per token: {}", self.fee_per_token)?,
            [fee] => {
                let fee = safe_math::normalize(fee)?;
                if safe_math::less_than(&fee, "0")? {
                    return Err(Error::Usage("fee must be >= 0".into()));
                }
                writeln!(out, "Fee per token set to {fee}")?;
                self.fee_per_token = fee;
            }
            _ => return Err(Error::Usage("fee [amount]".into())),
        }
        Ok(())
    }

    fn handle_balance(&mut self, args: &[&str], out: &mut impl Write) -> Result<()> {
        match args {
            [] => match &self.balance {
                Some(balance) => writeln!(out, "Balance: {balance}")?,
                None => writeln!(out, "No balance set; previews are not checked.")?,
            },
            [balance] => {
                let balance = safe_math::normalize(balance)?;
                writeln!(out, "Balance set to {balance}")?;
                self.balance = Some(balance);
            }
            _ => return Err(Error::Usage("balance [amount]".into())),
        }
        Ok(())
    }

    fn handle_preview(&mut self, side: Side, args: &[&str], out: &mut impl Write) -> Result<()> {
        let [amount] = args else {
            return Err(Error::Usage(format!(
                "{} <amount in {}>",
                side.to_string().to_lowercase(),
                side.amount_unit()
            )));
        };
        let amount = safe_math::normalize(amount)?;
        let name = self
            .current
            .clone()
            .ok_or_else(|| Error::Usage("no book loaded (load <name> <path>)".into()))?;
        let book = self
            .books
            .get(&name)
            .ok_or_else(|| Error::UnknownBook(name.clone()))?;

        let preview = self.preview.get(book, side, &amount, &self.fee_per_token)?;
        if !preview.recomputed {
            writeln!(out, "  (cached)")?;
        } else if !preview.changed {
            writeln!(out, "  (unchanged)")?;
        }
        write!(out, "{}", render::execution_table(preview.execution, self.places)?)?;

        if let Some(balance) = &self.balance {
            let verdict = match preview.execution {
                Execution::Buy(buy) => validate_buy(&amount, balance, buy)?,
                Execution::Sell(sell) => validate_sell(&amount, balance, sell)?,
            };
            writeln!(out, "{}", render::validation_line(side, &verdict))?;
        }
        if preview.execution.has_insufficient_liquidity() {
            warn!("{side} of {amount} exceeds the liquidity of book {name}");
        }
        Ok(())
    }
}

/// Drive a session from `input` until EOF or `quit`.
///
/// Command errors are reported on `out` and do not end the session.
pub fn run(session: &mut Session, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    writeln!(out, "safebook preview")?;
    writeln!(out, "Type 'help' for commands, 'quit' to exit.\n")?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match session.execute(line, out) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => writeln!(out, "Error: {e}")?,
        }
    }

    writeln!(out, "Goodbye!")?;
    Ok(())
}

fn print_help(out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        r#"
Commands:
  load <name> <path>    Load a JSON book snapshot under a name
  use <name>            Switch to a loaded book
  books                 List loaded books (* marks the one in use)
  book                  Show the book in use
  buy <usd>             Preview a market buy spending <usd>
  sell <tokens>         Preview a market sell of <tokens>
  fee [amount]          Show or set the fee per token
  balance [amount]      Show or set the balance checked against previews
  help                  Show this help
  quit                  Exit

Examples:
  load btc ./btc-100k.json
  buy 250               Spend $250 at market
  sell 40.5             Sell 40.5 tokens at market
"#
    )?;
    Ok(())
}
