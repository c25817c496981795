//! # Cart Aggregator
//!
//! Totals for a mixed cart of purchases and rentals, and the cart editing
//! rules shared by the cart page and checkout.
//!
//! ## Totals Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Purchase lines ── unit_price × qty ────► one_time_total ──┐            │
//! │                                                             ├► subtotal │
//! │  Rental lines ──── monthly_rate × qty ──► monthly_total ───┘     │      │
//! │                                                                  │      │
//! │                  tax_amount    = subtotal × tax rate (half up) ◄─┤      │
//! │                  shipping_cost = 0 above threshold, else flat  ◄─┘      │
//! │                                                                         │
//! │                  grand_total   = subtotal + tax + shipping              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rentals contribute their first month only; later months are billed by
//! the contract, not the order.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::PricingConfig;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CartTotals, LineItem, PurchaseKind, RentalTerm};
use crate::validation::too_large;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Computes the totals of `items`.
///
/// An empty cart is all zeros, shipping included. The result does not
/// depend on the order of `items`.
///
/// ```rust
/// use rto_core::cart::compute_cart_totals;
/// use rto_core::config::PricingConfig;
/// use rto_core::money::Money;
/// use rto_core::types::LineItem;
///
/// let items = vec![
///     LineItem::purchase(1, "Laptop", Money::from_cents(25000), 2).unwrap(),
///     LineItem::rental(2, "Monitor", Money::from_cents(5000), 12, 1).unwrap(),
/// ];
/// let totals = compute_cart_totals(&PricingConfig::default(), &items).unwrap();
/// assert_eq!(totals.subtotal.cents(), 55000);
/// assert_eq!(totals.tax_amount.cents(), 4538);
/// assert_eq!(totals.shipping_cost, Money::zero());
/// assert_eq!(totals.grand_total.cents(), 59538);
/// ```
pub fn compute_cart_totals(config: &PricingConfig, items: &[LineItem]) -> CoreResult<CartTotals> {
    if items.is_empty() {
        return Ok(CartTotals::default());
    }

    let mut one_time_total = Money::zero();
    let mut monthly_total = Money::zero();
    let mut total_items: u32 = 0;

    for item in items {
        item.validate()?;
        total_items = total_items.saturating_add(item.quantity);
        let bucket = match item.kind {
            PurchaseKind::Purchase { .. } => &mut one_time_total,
            PurchaseKind::Rental { .. } => &mut monthly_total,
        };
        *bucket = checked_sum(*bucket, item.line_total())?;
    }

    let subtotal = checked_sum(one_time_total, monthly_total)?;
    let tax_amount = subtotal.apply_rate(config.tax_rate());
    let shipping_cost = config.shipping_for(subtotal);
    let grand_total = checked_sum(checked_sum(subtotal, tax_amount)?, shipping_cost)?;

    Ok(CartTotals {
        subtotal,
        tax_amount,
        shipping_cost,
        grand_total,
        total_items,
        one_time_total,
        monthly_total,
    })
}

fn checked_sum(a: Money, b: Money) -> CoreResult<Money> {
    a.checked_add(b)
        .ok_or_else(|| CoreError::from(too_large("cart total")))
}

// =============================================================================
// Cart
// =============================================================================

/// Identifies a cart line: the same product bought outright and rented, or
/// rented over two different terms, are separate lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: u64,
    /// `None` for a purchase line.
    pub rental_term: Option<RentalTerm>,
}

impl LineKey {
    pub fn purchase(product_id: u64) -> Self {
        LineKey {
            product_id,
            rental_term: None,
        }
    }

    pub fn rental(product_id: u64, term: RentalTerm) -> Self {
        LineKey {
            product_id,
            rental_term: Some(term),
        }
    }
}

impl LineItem {
    #[inline]
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id,
            rental_term: self.rental_term(),
        }
    }
}

/// An editable cart.
///
/// ## Invariants
/// - Lines are unique by [`LineKey`] (adding an existing line adds quantity)
/// - Every quantity is within 1..=999
/// - At most 100 lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Builds a cart from loose lines, merging duplicates.
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> CoreResult<Self> {
        let mut cart = Cart::new();
        for item in items {
            cart.add_item(item)?;
        }
        Ok(cart)
    }

    /// Adds a line, or increases the quantity of the matching line.
    ///
    /// A merged line keeps the price it was first added at.
    pub fn add_item(&mut self, item: LineItem) -> CoreResult<()> {
        item.validate()?;

        let key = item.key();
        if let Some(existing) = self.items.iter_mut().find(|i| i.key() == key) {
            let new_qty = existing.quantity.saturating_add(item.quantity);
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(quantity_out_of_range());
            }
            existing.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartFull {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(item);
        Ok(())
    }

    /// Sets the quantity of a line. Zero or less removes it.
    pub fn update_quantity(&mut self, key: LineKey, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove_item(key);
        }

        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|&q| q <= MAX_ITEM_QUANTITY)
            .ok_or_else(quantity_out_of_range)?;

        match self.items.iter_mut().find(|i| i.key() == key) {
            Some(item) => {
                item.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::ItemNotInCart {
                product_id: key.product_id,
            }),
        }
    }

    pub fn remove_item(&mut self, key: LineKey) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.key() != key);

        if self.items.len() == initial_len {
            Err(CoreError::ItemNotInCart {
                product_id: key.product_id,
            })
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn totals(&self, config: &PricingConfig) -> CoreResult<CartTotals> {
        compute_cart_totals(config, &self.items)
    }
}

fn quantity_out_of_range() -> CoreError {
    CoreError::InvalidArgument(ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 1,
        max: i64::from(MAX_ITEM_QUANTITY),
    })
}

// =============================================================================
// Stored Cart Format
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StoredPurchaseType {
    Purchase,
    Rental,
}

fn default_quantity() -> u32 {
    1
}

/// A cart line as the storefront keeps it in local storage and posts it.
///
/// Prices are dollar amounts (`250` or `"250.00"`). Which fields must be
/// present depends on `purchase_type`; the check happens when converting
/// into a [`LineItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StoredLineItem {
    pub product_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub purchase_type: StoredPurchaseType,
    #[serde(
        default,
        with = "crate::money::decimal::option",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(as = "Option<String>")]
    pub price: Option<Money>,
    #[serde(
        default,
        with = "crate::money::decimal::option",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(as = "Option<String>")]
    pub rental_price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_term: Option<u32>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn required(field: &str) -> CoreError {
    CoreError::InvalidArgument(ValidationError::Required {
        field: field.to_string(),
    })
}

impl TryFrom<StoredLineItem> for LineItem {
    type Error = CoreError;

    fn try_from(stored: StoredLineItem) -> CoreResult<Self> {
        let name = stored.name.unwrap_or_default();
        match stored.purchase_type {
            StoredPurchaseType::Purchase => {
                let price = stored.price.ok_or_else(|| required("price"))?;
                LineItem::purchase(stored.product_id, name, price, stored.quantity)
            }
            StoredPurchaseType::Rental => {
                let monthly_rate = stored.rental_price.ok_or_else(|| required("rental_price"))?;
                let term = stored.rental_term.ok_or_else(|| required("rental_term"))?;
                let item =
                    LineItem::rental(stored.product_id, name, monthly_rate, term, stored.quantity)?;
                match stored.price {
                    Some(price) if price.is_positive() => item.with_purchase_price(price),
                    _ => Ok(item),
                }
            }
        }
    }
}

impl From<&LineItem> for StoredLineItem {
    fn from(item: &LineItem) -> Self {
        let name = (!item.name.is_empty()).then(|| item.name.clone());
        match item.kind {
            PurchaseKind::Purchase { unit_price } => StoredLineItem {
                product_id: item.product_id,
                name,
                purchase_type: StoredPurchaseType::Purchase,
                price: Some(unit_price),
                rental_price: None,
                rental_term: None,
                quantity: item.quantity,
            },
            PurchaseKind::Rental {
                term,
                monthly_rate,
                unit_purchase_price,
            } => StoredLineItem {
                product_id: item.product_id,
                name,
                purchase_type: StoredPurchaseType::Rental,
                price: unit_purchase_price,
                rental_price: Some(monthly_rate),
                rental_term: Some(term.months()),
                quantity: item.quantity,
            },
        }
    }
}

/// Parses a stored cart (a JSON array of [`StoredLineItem`]) into line items.
pub fn parse_stored_cart(json: &str) -> CoreResult<Vec<LineItem>> {
    let stored: Vec<StoredLineItem> = serde_json::from_str(json).map_err(|e| {
        CoreError::InvalidArgument(ValidationError::InvalidFormat {
            field: "cart".to_string(),
            reason: e.to_string(),
        })
    })?;
    stored.into_iter().map(LineItem::try_from).collect()
}
