//! CLI entry point for safebook previews.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use safebook::amount::{validate_buy, validate_sell};
use safebook::{Execution, Side, safe_math, simulate};
use safebook_preview::config::Config;
use safebook_preview::error::{Error, Result};
use safebook_preview::repl::{self, Session};
use safebook_preview::{render, snapshot};

#[derive(Parser)]
#[command(name = "preview")]
#[command(about = "Preview market orders against order-book snapshots")]
#[command(version)]
struct Cli {
    /// Path to the config file (default: preview.toml, if present)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Preview a market buy spending a quote-currency amount
    Buy(OrderArgs),

    /// Preview a market sell of a token amount
    Sell(OrderArgs),

    /// Start an interactive session
    Repl,
}

#[derive(Args)]
struct OrderArgs {
    /// Path to a JSON book snapshot
    book: PathBuf,

    /// USD to spend (buy) or tokens to sell (sell)
    amount: String,

    /// Fee per token, overriding the config file
    #[arg(long)]
    fee: Option<String>,

    /// Available USD (buy) or tokens held (sell); enables order checks
    #[arg(long)]
    balance: Option<String>,

    /// Print the raw execution as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::resolve(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .format_timestamp_secs()
    .init();

    let result = match cli.command {
        Command::Buy(args) => preview_once(&config, Side::Buy, &args),
        Command::Sell(args) => preview_once(&config, Side::Sell, &args),
        Command::Repl => {
            let mut session = Session::new(&config);
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            repl::run(&mut session, stdin.lock(), &mut stdout)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(e.exit_code());
    }
}

fn preview_once(config: &Config, side: Side, args: &OrderArgs) -> Result<()> {
    let book = snapshot::load(&args.book)?;
    let fee = match &args.fee {
        Some(fee) => {
            let fee = safe_math::normalize(fee)?;
            if safe_math::less_than(&fee, "0")? {
                return Err(Error::Usage("--fee must be >= 0".into()));
            }
            fee
        }
        None => config.fees.fee_per_token.clone(),
    };
    let amount = safe_math::normalize(&args.amount)?;
    let execution = simulate(Some(&book), side, &amount, &fee)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &execution)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render::execution_table(&execution, config.display.places)?)?;
    }

    if let Some(balance) = &args.balance {
        let verdict = match &execution {
            Execution::Buy(buy) => validate_buy(&amount, balance, buy)?,
            Execution::Sell(sell) => validate_sell(&amount, balance, sell)?,
        };
        writeln!(out, "{}", render::validation_line(side, &verdict))?;
    }
    Ok(())
}
