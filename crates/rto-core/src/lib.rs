//! # rto-core: Rent-to-Own Pricing Engine
//!
//! Every number the storefront shows for a rent-to-own product comes from
//! this crate: the monthly rate, the buyout balance at any point of the
//! schedule, and the totals of a mixed purchase/rental cart.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Rent-to-Own Pricing                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   Product page ──► Cart ──► Checkout ──► Rentals dashboard      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ (TS bindings / rto CLI)                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rto-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   rate    │  │ schedule  │  │   cart    │  │   order   │  │   │
//! │  │   │ monthly   │  │ buyout    │  │ totals    │  │ request   │  │   │
//! │  │   │ quote     │  │ ledger    │  │ editing   │  │ body      │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBALS • INTEGER CENTS • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer-cent `Money` and the half-up rounding rule
//! - [`types`] - Rates, terms, line items, contracts
//! - [`config`] - Markup tiers, tax, shipping and discount parameters
//! - [`rate`] - Monthly rate and rental quote
//! - [`schedule`] - Buyout amounts and the contract ledger
//! - [`cart`] - Cart totals and the stored cart format
//! - [`order`] - Order request body
//! - [`engine`] - `PricingEngine` facade
//! - [`error`] / [`validation`] - Error types and input checks
//!
//! ## Example Usage
//!
//! ```rust
//! use rto_core::{LineItem, Money, PricingConfig, PricingEngine};
//!
//! let engine = PricingEngine::new(PricingConfig::default()).unwrap();
//!
//! let quote = engine.quote(Money::from_cents(120000), 12).unwrap();
//! assert_eq!(quote.monthly_rate.to_string(), "$115.00");
//!
//! let cart = vec![
//!     LineItem::purchase(1, "Laptop", Money::from_cents(25000), 2).unwrap(),
//!     LineItem::rental(2, "Monitor", Money::from_cents(5000), 12, 1).unwrap(),
//! ];
//! let totals = engine.cart_totals(&cart).unwrap();
//! assert_eq!(totals.grand_total.to_string(), "$595.38");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod config;
pub mod engine;
pub mod error;
pub mod money;
pub mod order;
pub mod rate;
pub mod schedule;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, LineKey, StoredLineItem};
pub use config::{MarkupTier, PricingConfig};
pub use engine::PricingEngine;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{OrderItem, OrderRequest};
pub use rate::{BuyoutCheckpoint, RentalQuote};
pub use schedule::{BuyoutQuote, ScheduledPayment};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Shortest rent-to-own term offered, in months.
pub const MIN_TERM_MONTHS: u32 = 3;

/// Longest rent-to-own term offered, in months.
pub const MAX_TERM_MONTHS: u32 = 24;

/// Maximum distinct lines in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Largest price or monthly rate accepted, in cents ($10 billion).
///
/// Keeps every line total, term total and cart sum well inside `i64`.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000_000;

/// Maximum quantity of a single cart line.
///
/// Guards against typing 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: u32 = 999;
