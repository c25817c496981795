//! # Pricing Engine
//!
//! One validated [`PricingConfig`] behind every pricing entry point. The
//! product page, cart, checkout and dashboard all go through this type so
//! the same inputs always produce the same cents.
//!
//! ```rust
//! use rto_core::{Money, PricingConfig, PricingEngine};
//!
//! let engine = PricingEngine::new(PricingConfig::default()).unwrap();
//! let rate = engine.monthly_rate(Money::from_cents(120000), 12).unwrap();
//! assert_eq!(rate.cents(), 11500);
//!
//! let quote = engine.buyout_quote(Money::from_cents(120000), rate, 12, 6).unwrap();
//! assert_eq!(quote.remaining_balance.cents(), 69000);
//! assert_eq!(quote.early_buyout_price.cents(), 62100);
//! ```

use crate::cart::compute_cart_totals;
use crate::config::PricingConfig;
use crate::error::CoreResult;
use crate::money::Money;
use crate::order::{build_order_request, OrderRequest};
use crate::rate::{compute_monthly_rate, quote_listed_rental, quote_rental, RentalQuote};
use crate::schedule::{compute_buyout_amount, compute_early_buyout_price, BuyoutQuote};
use crate::types::{CartTotals, LineItem, RentalContract};
use crate::validation::validate_elapsed_months;

/// Stateless pricing facade over a validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    /// Validates `config` once; every later call can rely on it.
    pub fn new(config: PricingConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(PricingEngine { config })
    }

    #[inline]
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn monthly_rate(&self, purchase_price: Money, term_months: u32) -> CoreResult<Money> {
        compute_monthly_rate(&self.config, purchase_price, term_months)
    }

    pub fn quote(&self, purchase_price: Money, term_months: u32) -> CoreResult<RentalQuote> {
        quote_rental(&self.config, purchase_price, term_months)
    }

    /// Quote at a catalog-listed monthly rate instead of the tier formula.
    pub fn quote_listed(
        &self,
        purchase_price: Money,
        term_months: u32,
        listed_monthly_rate: Money,
    ) -> CoreResult<RentalQuote> {
        quote_listed_rental(&self.config, purchase_price, term_months, listed_monthly_rate)
    }

    pub fn buyout_amount(
        &self,
        purchase_price: Money,
        monthly_rate: Money,
        term_months: u32,
        elapsed_months: i64,
    ) -> CoreResult<Money> {
        compute_buyout_amount(purchase_price, monthly_rate, term_months, elapsed_months)
    }

    /// Early buyout at the configured discount.
    pub fn early_buyout_price(&self, remaining_balance: Money) -> CoreResult<Money> {
        compute_early_buyout_price(remaining_balance, self.config.early_buyout_discount())
    }

    pub fn buyout_quote(
        &self,
        purchase_price: Money,
        monthly_rate: Money,
        term_months: u32,
        elapsed_months: i64,
    ) -> CoreResult<BuyoutQuote> {
        let remaining =
            compute_buyout_amount(purchase_price, monthly_rate, term_months, elapsed_months)?;
        let elapsed = validate_elapsed_months(elapsed_months)?.min(term_months);
        Ok(BuyoutQuote::new(
            elapsed,
            remaining,
            self.config.early_buyout_discount(),
        ))
    }

    /// Buyout quote for a live contract.
    pub fn contract_buyout_quote(&self, contract: &RentalContract) -> BuyoutQuote {
        contract.buyout_quote(self.config.early_buyout_discount())
    }

    /// Opens a pending contract at the tiered monthly rate.
    pub fn open_contract(
        &self,
        purchase_price: Money,
        term_months: u32,
    ) -> CoreResult<RentalContract> {
        let monthly_rate = self.monthly_rate(purchase_price, term_months)?;
        RentalContract::new(purchase_price, monthly_rate, term_months)
    }

    pub fn cart_totals(&self, items: &[LineItem]) -> CoreResult<CartTotals> {
        compute_cart_totals(&self.config, items)
    }

    /// Order body for `items` with freshly computed totals.
    pub fn order_request(&self, items: &[LineItem]) -> CoreResult<OrderRequest> {
        let totals = self.cart_totals(items)?;
        build_order_request(items, &totals)
    }
}
