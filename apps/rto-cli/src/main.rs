//! rto - rent-to-own pricing from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Monthly rate and buyout checkpoints for a $1200 product over 12 months
//! rto quote --price 1200.00 --term 12
//!
//! # What it costs to buy out after 6 of 12 payments
//! rto buyout --monthly-rate 115.00 --term 12 --elapsed 6
//!
//! # Totals and order body for a stored cart
//! rto cart --file cart.json
//! rto order --file cart.json
//!
//! # Payment calendar
//! rto schedule --price 1200.00 --term 12 --start 2024-01-15
//!
//! # Effective configuration
//! rto --config pricing.toml config
//! ```
//!
//! JSON goes to stdout; logs go to stderr (`RUST_LOG`, default `warn,rto=info`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::IsTerminal;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rto_core::{Money, PricingEngine};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;

use error::CliResult;

#[derive(Parser)]
#[command(name = "rto")]
#[command(author, version, about = "Rent-to-own pricing engine")]
struct Cli {
    /// Pricing config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a rental: monthly rate, total cost, buyout checkpoints
    Quote {
        /// Outright purchase price in dollars
        #[arg(long)]
        price: Money,

        /// Term in months (3-24)
        #[arg(long)]
        term: u32,

        /// Catalog-listed monthly rate, instead of the tier formula
        #[arg(long)]
        monthly_rate: Option<Money>,
    },
    /// Remaining balance and early buyout price part-way through a rental
    Buyout {
        #[arg(long)]
        monthly_rate: Money,

        #[arg(long)]
        term: u32,

        /// Payments already made
        #[arg(long, allow_negative_numbers = true)]
        elapsed: i64,

        #[arg(long)]
        price: Option<Money>,
    },
    /// Totals of a stored cart (JSON array of line items)
    Cart {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Order request body for a stored cart
    Order {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(long)]
        payment_method: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Payment calendar for a rental starting on a given date
    Schedule {
        #[arg(long)]
        price: Money,

        #[arg(long)]
        term: u32,

        /// First payment date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Payments already made
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        elapsed: i64,

        #[arg(long)]
        monthly_rate: Option<Money>,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Logs to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,rto=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn run(cli: Cli) -> CliResult<String> {
    let pricing = config::load(cli.config.as_deref())?;
    let engine = PricingEngine::new(pricing)?;

    match cli.command {
        Commands::Quote {
            price,
            term,
            monthly_rate,
        } => commands::quote(&engine, price, term, monthly_rate),
        Commands::Buyout {
            monthly_rate,
            term,
            elapsed,
            price,
        } => commands::buyout(&engine, monthly_rate, term, elapsed, price),
        Commands::Cart { file } => commands::cart(&engine, &file),
        Commands::Order {
            file,
            payment_method,
            notes,
        } => commands::order(&engine, &file, payment_method, notes),
        Commands::Schedule {
            price,
            term,
            start,
            elapsed,
            monthly_rate,
        } => commands::schedule(&engine, price, term, start, elapsed, monthly_rate),
        Commands::Config => commands::show_config(&engine),
    }
}
