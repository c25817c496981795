//! # Command Handlers
//!
//! Each handler takes parsed arguments and a ready [`PricingEngine`] and
//! returns the JSON document to print. Handlers never print themselves.

use std::path::Path;

use chrono::NaiveDate;
use rto_core::cart::parse_stored_cart;
use rto_core::{ContractStatus, LineItem, Money, PricingEngine, RentalContract, ScheduledPayment};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CliError, CliResult};

fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn read_cart(path: &Path) -> CliResult<Vec<LineItem>> {
    let json = std::fs::read_to_string(path).map_err(|e| CliError::read(path, e))?;
    let items = parse_stored_cart(&json)?;
    debug!(?path, lines = items.len(), "Loaded stored cart");
    Ok(items)
}

// =============================================================================
// Rate Calculator
// =============================================================================

pub fn quote(
    engine: &PricingEngine,
    price: Money,
    term: u32,
    listed_monthly_rate: Option<Money>,
) -> CliResult<String> {
    let quote = match listed_monthly_rate {
        Some(rate) => engine.quote_listed(price, term, rate)?,
        None => engine.quote(price, term)?,
    };
    info!(%price, term, monthly = %quote.monthly_rate, "Quoted rental");
    to_json(&quote)
}

// =============================================================================
// Schedule Projector
// =============================================================================

pub fn buyout(
    engine: &PricingEngine,
    monthly_rate: Money,
    term: u32,
    elapsed: i64,
    price: Option<Money>,
) -> CliResult<String> {
    let quote =
        engine.buyout_quote(price.unwrap_or_default(), monthly_rate, term, elapsed)?;
    to_json(&quote)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleReport<'a> {
    contract: &'a RentalContract,
    remaining_payments: u32,
    remaining_balance: Money,
    progress_percent: u32,
    next_payment_date: Option<NaiveDate>,
    end_date: NaiveDate,
    payments: Vec<ScheduledPayment>,
}

pub fn schedule(
    engine: &PricingEngine,
    price: Money,
    term: u32,
    start: NaiveDate,
    elapsed: i64,
    listed_monthly_rate: Option<Money>,
) -> CliResult<String> {
    let monthly_rate = match listed_monthly_rate {
        Some(rate) => rate,
        None => engine.monthly_rate(price, term)?,
    };
    let contract = if elapsed == 0 {
        RentalContract::new(price, monthly_rate, term)?
    } else {
        RentalContract::resume(
            price,
            monthly_rate,
            term,
            elapsed,
            ContractStatus::Active,
        )?
    };

    let report = ScheduleReport {
        contract: &contract,
        remaining_payments: contract.remaining_payments(),
        remaining_balance: contract.remaining_balance(),
        progress_percent: contract.progress_percent(),
        next_payment_date: contract.next_payment_date(start)?,
        end_date: contract.end_date(start)?,
        payments: contract.payment_schedule(start)?,
    };
    to_json(&report)
}

// =============================================================================
// Cart/Order Aggregator
// =============================================================================

pub fn cart(engine: &PricingEngine, file: &Path) -> CliResult<String> {
    let items = read_cart(file)?;
    let totals = engine.cart_totals(&items)?;
    info!(lines = items.len(), grand_total = %totals.grand_total, "Computed cart totals");
    to_json(&totals)
}

pub fn order(
    engine: &PricingEngine,
    file: &Path,
    payment_method: Option<String>,
    notes: Option<String>,
) -> CliResult<String> {
    let items = read_cart(file)?;
    let mut request = engine.order_request(&items)?;
    if let Some(method) = payment_method {
        request = request.with_payment_method(method);
    }
    if let Some(notes) = notes {
        request = request.with_notes(notes);
    }
    to_json(&request)
}

// =============================================================================
// Config
// =============================================================================

pub fn show_config(engine: &PricingEngine) -> CliResult<String> {
    crate::config::render(engine.config())
}
