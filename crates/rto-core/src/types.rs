//! # Domain Types
//!
//! Value types shared by the rate calculator, schedule projector and cart
//! aggregator.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Rate       │   │   RentalTerm    │   │    LineItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  months 3..=24  │   │  product_id     │       │
//! │  │  825 = 8.25%    │   │                 │   │  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   │  kind ──────────┼──┐    │
//! │                                              └─────────────────┘  │    │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐  │    │
//! │  │ RentalContract  │   │ ContractStatus  │   │  PurchaseKind   │◄─┘    │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  purchase_price │   │  Pending        │   │  Purchase       │       │
//! │  │  monthly_rate   │   │  Active         │   │  Rental         │       │
//! │  │  elapsed_months │   │  Completed      │   └─────────────────┘       │
//! │  └─────────────────┘   │  Cancelled      │                             │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{
    validate_elapsed_months, validate_non_negative, validate_purchase_price, validate_quantity,
};
use crate::{MAX_TERM_MONTHS, MIN_TERM_MONTHS};

// =============================================================================
// Rate
// =============================================================================

/// A fractional rate in basis points (1 bps = 0.01%).
///
/// Markup factors, the sales tax rate and the early-buyout discount are all
/// `Rate`s. `Rate::from_bps(825)` is 8.25%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        f64::from(self.0) / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Rental Term
// =============================================================================

/// Length of a rent-to-own contract in months, always within 3..=24.
///
/// The storefront offers 3, 6, 9, 12, 18 and 24 month plans, but the term
/// slider can land on any month in range, so every integer in range is
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "u32", into = "u32")]
#[ts(export)]
pub struct RentalTerm(u32);

impl RentalTerm {
    /// Validates and wraps a month count.
    ///
    /// ```rust
    /// use rto_core::types::RentalTerm;
    ///
    /// assert_eq!(RentalTerm::new(12).unwrap().months(), 12);
    /// assert!(RentalTerm::new(2).is_err());
    /// assert!(RentalTerm::new(25).is_err());
    /// ```
    pub fn new(months: u32) -> Result<Self, ValidationError> {
        if !(MIN_TERM_MONTHS..=MAX_TERM_MONTHS).contains(&months) {
            return Err(ValidationError::OutOfRange {
                field: "rental term".to_string(),
                min: i64::from(MIN_TERM_MONTHS),
                max: i64::from(MAX_TERM_MONTHS),
            });
        }
        Ok(RentalTerm(months))
    }

    #[inline]
    pub const fn months(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for RentalTerm {
    type Error = ValidationError;

    fn try_from(months: u32) -> Result<Self, Self::Error> {
        RentalTerm::new(months)
    }
}

impl From<RentalTerm> for u32 {
    fn from(term: RentalTerm) -> u32 {
        term.0
    }
}

impl fmt::Display for RentalTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} months", self.0)
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// How a line item is being bought.
///
/// A rental always carries its term and monthly rate and a purchase always
/// carries its unit price, so a half-filled rental cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "purchase_type", rename_all = "snake_case")]
#[ts(export)]
pub enum PurchaseKind {
    /// One-time purchase at `unit_price` each.
    Purchase { unit_price: Money },
    /// Rent-to-own at `monthly_rate` each per month.
    Rental {
        term: RentalTerm,
        monthly_rate: Money,
        /// Outright price of the product, when the caller knows it.
        unit_purchase_price: Option<Money>,
    },
}

/// One line of a cart or order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub product_id: u64,
    pub name: String,
    pub quantity: u32,
    pub kind: PurchaseKind,
}

impl LineItem {
    /// Creates a validated purchase line.
    pub fn purchase(
        product_id: u64,
        name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> CoreResult<Self> {
        validate_non_negative("unit price", unit_price)?;
        validate_quantity(quantity)?;
        Ok(LineItem {
            product_id,
            name: name.into(),
            quantity,
            kind: PurchaseKind::Purchase { unit_price },
        })
    }

    /// Creates a validated rental line.
    pub fn rental(
        product_id: u64,
        name: impl Into<String>,
        monthly_rate: Money,
        term_months: u32,
        quantity: u32,
    ) -> CoreResult<Self> {
        validate_non_negative("monthly rate", monthly_rate)?;
        validate_quantity(quantity)?;
        Ok(LineItem {
            product_id,
            name: name.into(),
            quantity,
            kind: PurchaseKind::Rental {
                term: RentalTerm::new(term_months)?,
                monthly_rate,
                unit_purchase_price: None,
            },
        })
    }

    /// Attaches the outright price to a rental line. No-op on purchases.
    pub fn with_purchase_price(mut self, price: Money) -> CoreResult<Self> {
        validate_purchase_price(price)?;
        if let PurchaseKind::Rental {
            unit_purchase_price,
            ..
        } = &mut self.kind
        {
            *unit_purchase_price = Some(price);
        }
        Ok(self)
    }

    /// Re-checks the invariants of a line that was built field by field.
    pub fn validate(&self) -> CoreResult<()> {
        validate_quantity(self.quantity)?;
        match &self.kind {
            PurchaseKind::Purchase { unit_price } => {
                validate_non_negative("unit price", *unit_price)?;
            }
            PurchaseKind::Rental { monthly_rate, .. } => {
                validate_non_negative("monthly rate", *monthly_rate)?;
            }
        }
        Ok(())
    }

    #[inline]
    pub fn is_rental(&self) -> bool {
        matches!(self.kind, PurchaseKind::Rental { .. })
    }

    pub fn rental_term(&self) -> Option<RentalTerm> {
        match self.kind {
            PurchaseKind::Rental { term, .. } => Some(term),
            PurchaseKind::Purchase { .. } => None,
        }
    }

    /// Per-unit amount charged now: the unit price or the monthly rate.
    pub fn unit_amount(&self) -> Money {
        match self.kind {
            PurchaseKind::Purchase { unit_price } => unit_price,
            PurchaseKind::Rental { monthly_rate, .. } => monthly_rate,
        }
    }

    /// Contribution of this line to the cart subtotal.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_amount() * self.quantity
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Totals of a cart as shown on the cart and checkout summaries.
///
/// ## Invariants
/// - `grand_total == subtotal + tax_amount + shipping_cost`
/// - `subtotal == one_time_total + monthly_total`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub subtotal: Money,
    pub tax_amount: Money,
    pub shipping_cost: Money,
    pub grand_total: Money,
    pub total_items: u32,
    /// Purchases, charged once.
    pub one_time_total: Money,
    /// First month of every rental line.
    pub monthly_total: Money,
}

impl CartTotals {
    #[inline]
    pub fn is_free_shipping(&self) -> bool {
        self.shipping_cost.is_zero()
    }
}

// =============================================================================
// Rental Contract
// =============================================================================

/// Lifecycle of a rental contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ContractStatus {
    /// Signed, no payment received yet.
    #[default]
    Pending,
    /// At least one payment received.
    Active,
    /// Paid in full or bought out.
    Completed,
    /// Equipment returned, no further payments.
    Cancelled,
}

impl ContractStatus {
    /// Payments and buyouts are only accepted on open contracts.
    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self, ContractStatus::Pending | ContractStatus::Active)
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractStatus::Pending => write!(f, "pending"),
            ContractStatus::Active => write!(f, "active"),
            ContractStatus::Completed => write!(f, "completed"),
            ContractStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A live rent-to-own contract.
///
/// `elapsed_months` counts payments made and never exceeds the term.
/// Ledger operations live in [`crate::schedule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RentalContract {
    pub(crate) purchase_price: Money,
    pub(crate) term: RentalTerm,
    pub(crate) monthly_rate: Money,
    pub(crate) elapsed_months: u32,
    pub(crate) status: ContractStatus,
}

impl RentalContract {
    /// Creates a pending contract with nothing paid.
    pub fn new(purchase_price: Money, monthly_rate: Money, term_months: u32) -> CoreResult<Self> {
        validate_non_negative("purchase price", purchase_price)?;
        validate_non_negative("monthly rate", monthly_rate)?;
        Ok(RentalContract {
            purchase_price,
            term: RentalTerm::new(term_months)?,
            monthly_rate,
            elapsed_months: 0,
            status: ContractStatus::Pending,
        })
    }

    /// Restores a contract part-way through its schedule.
    ///
    /// Elapsed months past the term are capped at the term. A fully paid
    /// contract is marked completed regardless of `status`.
    pub fn resume(
        purchase_price: Money,
        monthly_rate: Money,
        term_months: u32,
        elapsed_months: i64,
        status: ContractStatus,
    ) -> CoreResult<Self> {
        let mut contract = RentalContract::new(purchase_price, monthly_rate, term_months)?;
        let elapsed = validate_elapsed_months(elapsed_months)?;
        contract.elapsed_months = elapsed.min(contract.term.months());
        contract.status = if contract.elapsed_months == contract.term.months() {
            ContractStatus::Completed
        } else {
            status
        };
        Ok(contract)
    }

    #[inline]
    pub fn purchase_price(&self) -> Money {
        self.purchase_price
    }

    #[inline]
    pub fn term(&self) -> RentalTerm {
        self.term
    }

    #[inline]
    pub fn monthly_rate(&self) -> Money {
        self.monthly_rate
    }

    #[inline]
    pub fn elapsed_months(&self) -> u32 {
        self.elapsed_months
    }

    #[inline]
    pub fn status(&self) -> ContractStatus {
        self.status
    }

    /// Returns the equipment: no further payments are due.
    pub fn cancel(&mut self) -> CoreResult<()> {
        if !self.status.is_open() {
            return Err(CoreError::InvalidContractStatus {
                status: self.status.to_string(),
            });
        }
        self.status = ContractStatus::Cancelled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_display() {
        assert_eq!(Rate::from_bps(825).to_string(), "8.25%");
        assert_eq!(Rate::from_bps(1000).to_string(), "10.00%");
        assert!((Rate::from_bps(825).percentage() - 8.25).abs() < 0.001);
    }

    #[test]
    fn test_rental_term_bounds() {
        assert!(RentalTerm::new(3).is_ok());
        assert!(RentalTerm::new(15).is_ok());
        assert!(RentalTerm::new(24).is_ok());
        assert!(RentalTerm::new(0).is_err());
        assert!(RentalTerm::new(2).is_err());
        assert!(RentalTerm::new(25).is_err());
    }

    #[test]
    fn test_rental_term_serde_validates() {
        let term: RentalTerm = serde_json::from_str("12").unwrap();
        assert_eq!(term.months(), 12);
        assert!(serde_json::from_str::<RentalTerm>("36").is_err());
    }

    #[test]
    fn test_line_totals() {
        let purchase = LineItem::purchase(1, "Laptop", Money::from_cents(25000), 2).unwrap();
        assert_eq!(purchase.line_total().cents(), 50000);
        assert!(!purchase.is_rental());
        assert!(purchase.rental_term().is_none());

        let rental = LineItem::rental(2, "Monitor", Money::from_cents(5000), 12, 1).unwrap();
        assert_eq!(rental.line_total().cents(), 5000);
        assert_eq!(rental.rental_term().map(|t| t.months()), Some(12));
    }

    #[test]
    fn test_line_item_rejects_bad_input() {
        assert!(matches!(
            LineItem::purchase(1, "Laptop", Money::from_cents(100), 0),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(LineItem::purchase(1, "Laptop", Money::from_cents(-1), 1).is_err());
        assert!(LineItem::rental(1, "Laptop", Money::from_cents(100), 30, 1).is_err());
    }

    #[test]
    fn test_contract_resume_caps_and_completes() {
        let contract = RentalContract::resume(
            Money::from_cents(120000),
            Money::from_cents(11500),
            12,
            20,
            ContractStatus::Active,
        )
        .unwrap();
        assert_eq!(contract.elapsed_months(), 12);
        assert_eq!(contract.status(), ContractStatus::Completed);

        assert!(RentalContract::resume(
            Money::from_cents(120000),
            Money::from_cents(11500),
            12,
            -1,
            ContractStatus::Active,
        )
        .is_err());
    }

    #[test]
    fn test_contract_cancel() {
        let mut contract =
            RentalContract::new(Money::from_cents(120000), Money::from_cents(11500), 12).unwrap();
        contract.cancel().unwrap();
        assert_eq!(contract.status(), ContractStatus::Cancelled);
        assert!(contract.cancel().is_err());
    }
}
