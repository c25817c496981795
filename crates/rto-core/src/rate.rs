//! # Rate Calculator
//!
//! Purchase price + term → monthly payment, and the rent-to-own quote the
//! product page shows next to the term picker.
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  monthly = price × (1 + markup(term)) / term                           │
//! │                                                                         │
//! │  $1200.00, 12 months, markup 15%:                                      │
//! │    120000 × 11500 / (10000 × 12) = 11500 cents → $115.00/mo            │
//! │                                                                         │
//! │  One half-up rounding over the exact integer quotient.                 │
//! │  Floor: never below ceil(price / term), so the schedule always         │
//! │  collects at least the purchase price.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::PricingConfig;
use crate::error::CoreResult;
use crate::money::{div_ceil, div_round_half_up, Money, BPS_SCALE};
use crate::schedule::remaining_balance;
use crate::types::{Rate, RentalTerm};
use crate::validation::{validate_non_negative, validate_purchase_price};

/// Monthly payment for renting `purchase_price` over `term_months`.
///
/// ## Errors
/// `InvalidArgument` if the price is not positive or above
/// `MAX_AMOUNT_CENTS`, or the term is outside 3..=24 months.
///
/// ```rust
/// use rto_core::config::PricingConfig;
/// use rto_core::money::Money;
/// use rto_core::rate::compute_monthly_rate;
///
/// let config = PricingConfig::default();
/// let rate = compute_monthly_rate(&config, Money::from_cents(120000), 3).unwrap();
/// assert_eq!(rate.cents(), 42000); // $1200 × 1.05 / 3
/// ```
pub fn compute_monthly_rate(
    config: &PricingConfig,
    purchase_price: Money,
    term_months: u32,
) -> CoreResult<Money> {
    validate_purchase_price(purchase_price)?;
    let term = RentalTerm::new(term_months)?;
    monthly_rate_for(config, purchase_price, term)
}

pub(crate) fn monthly_rate_for(
    config: &PricingConfig,
    purchase_price: Money,
    term: RentalTerm,
) -> CoreResult<Money> {
    let markup = config.markup_for(term)?;
    let months = i128::from(term.months());
    let price = i128::from(purchase_price.cents());

    let financed = price * (BPS_SCALE + i128::from(markup.bps()));
    let rounded = div_round_half_up(financed, BPS_SCALE * months);
    let floor = div_ceil(price, months);

    Ok(Money::from_cents(rounded.max(floor) as i64))
}

// =============================================================================
// Rental Quote
// =============================================================================

/// Remaining balance after a given number of payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BuyoutCheckpoint {
    pub after_months: u32,
    pub remaining_balance: Money,
}

/// Rent-to-own summary for one product and term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RentalQuote {
    pub purchase_price: Money,
    pub term: RentalTerm,
    /// Tier markup; zero when the monthly rate is a listed catalog price.
    pub markup: Rate,
    pub monthly_rate: Money,
    /// `monthly_rate × term`
    pub total_cost: Money,
    /// How much more renting costs than buying outright (never negative).
    pub premium: Money,
    /// Premium as a share of the purchase price, in tenths of a percent.
    pub premium_percent_tenths: u32,
    /// How much less renting costs than buying, for discounted listings.
    pub savings: Money,
    pub buyout_checkpoints: Vec<BuyoutCheckpoint>,
}

impl RentalQuote {
    /// Premium formatted the way the calculator shows it (`"15.0%"`).
    pub fn premium_percent_label(&self) -> String {
        format!(
            "{}.{}%",
            self.premium_percent_tenths / 10,
            self.premium_percent_tenths % 10
        )
    }
}

/// Quote using the tiered monthly rate.
///
/// ```rust
/// use rto_core::config::PricingConfig;
/// use rto_core::money::Money;
/// use rto_core::rate::quote_rental;
///
/// let quote = quote_rental(&PricingConfig::default(), Money::from_cents(120000), 12).unwrap();
/// assert_eq!(quote.monthly_rate.cents(), 11500);
/// assert_eq!(quote.total_cost.cents(), 138000);
/// assert_eq!(quote.premium_percent_label(), "15.0%");
/// ```
pub fn quote_rental(
    config: &PricingConfig,
    purchase_price: Money,
    term_months: u32,
) -> CoreResult<RentalQuote> {
    validate_purchase_price(purchase_price)?;
    let term = RentalTerm::new(term_months)?;
    let markup = config.markup_for(term)?;
    let monthly_rate = monthly_rate_for(config, purchase_price, term)?;
    Ok(build_quote(config, purchase_price, term, markup, monthly_rate))
}

/// Quote for a product whose catalog lists its own monthly rate for the
/// term. The listed rate wins over the tier formula.
pub fn quote_listed_rental(
    config: &PricingConfig,
    purchase_price: Money,
    term_months: u32,
    listed_monthly_rate: Money,
) -> CoreResult<RentalQuote> {
    validate_purchase_price(purchase_price)?;
    validate_non_negative("monthly rate", listed_monthly_rate)?;
    let term = RentalTerm::new(term_months)?;
    Ok(build_quote(
        config,
        purchase_price,
        term,
        Rate::zero(),
        listed_monthly_rate,
    ))
}

fn build_quote(
    config: &PricingConfig,
    purchase_price: Money,
    term: RentalTerm,
    markup: Rate,
    monthly_rate: Money,
) -> RentalQuote {
    let total_cost = monthly_rate * term.months();
    let premium = (total_cost - purchase_price).max_zero();
    let savings = (purchase_price - total_cost).max_zero();
    let premium_percent_tenths = div_round_half_up(
        i128::from(premium.cents()) * 1000,
        i128::from(purchase_price.cents()),
    );

    let buyout_checkpoints = config
        .buyout_checkpoints
        .iter()
        .copied()
        .filter(|&months| months < term.months())
        .map(|after_months| BuyoutCheckpoint {
            after_months,
            remaining_balance: remaining_balance(monthly_rate, term, after_months),
        })
        .collect();

    RentalQuote {
        purchase_price,
        term,
        markup,
        monthly_rate,
        total_cost,
        premium,
        premium_percent_tenths: u32::try_from(premium_percent_tenths).unwrap_or(u32::MAX),
        savings,
        buyout_checkpoints,
    }
}
