//! # Order Request
//!
//! The body checkout posts to the orders API. Money goes over the wire as
//! decimal dollar strings (`"45.38"`), keys are snake_case.
//!
//! ```json
//! {
//!   "items": [
//!     { "product_id": 1, "quantity": 2, "is_rental": false, "rental_term_months": null },
//!     { "product_id": 2, "quantity": 1, "is_rental": true, "rental_term_months": 12 }
//!   ],
//!   "payment_method": "credit_card",
//!   "shipping_method": "standard",
//!   "shipping_cost": "0.00",
//!   "tax_amount": "45.38",
//!   "notes": ""
//! }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CartTotals, LineItem};

fn default_payment_method() -> String {
    "credit_card".to_string()
}

fn default_shipping_method() -> String {
    "standard".to_string()
}

/// One ordered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    pub product_id: u64,
    pub quantity: u32,
    pub is_rental: bool,
    pub rental_term_months: Option<u32>,
}

impl From<&LineItem> for OrderItem {
    fn from(item: &LineItem) -> Self {
        OrderItem {
            product_id: item.product_id,
            quantity: item.quantity,
            is_rental: item.is_rental(),
            rental_term_months: item.rental_term().map(u32::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderRequest {
    pub items: Vec<OrderItem>,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    #[serde(default = "default_shipping_method")]
    pub shipping_method: String,
    #[serde(with = "crate::money::decimal")]
    #[ts(as = "String")]
    pub shipping_cost: Money,
    #[serde(with = "crate::money::decimal")]
    #[ts(as = "String")]
    pub tax_amount: Money,
    #[serde(default)]
    pub notes: String,
}

impl OrderRequest {
    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = method.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Builds the order body for `items`, carrying the shipping and tax from
/// `totals` as computed for the same items.
///
/// ## Errors
/// `InvalidArgument` when `items` is empty: an order needs at least one line.
pub fn build_order_request(items: &[LineItem], totals: &CartTotals) -> CoreResult<OrderRequest> {
    if items.is_empty() {
        return Err(CoreError::InvalidArgument(ValidationError::Required {
            field: "items".to_string(),
        }));
    }

    Ok(OrderRequest {
        items: items.iter().map(OrderItem::from).collect(),
        payment_method: default_payment_method(),
        shipping_method: default_shipping_method(),
        shipping_cost: totals.shipping_cost,
        tax_amount: totals.tax_amount,
        notes: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::compute_cart_totals;
    use crate::config::PricingConfig;
    use serde_json::json;

    fn items() -> Vec<LineItem> {
        vec![
            LineItem::purchase(1, "Laptop", Money::from_cents(25000), 2).unwrap(),
            LineItem::rental(2, "Monitor", Money::from_cents(5000), 12, 1).unwrap(),
        ]
    }

    #[test]
    fn test_order_body_shape() {
        let items = items();
        let totals = compute_cart_totals(&PricingConfig::default(), &items).unwrap();
        let order = build_order_request(&items, &totals).unwrap();

        let body = serde_json::to_value(&order).unwrap();
        assert_eq!(
            body,
            json!({
                "items": [
                    {"product_id": 1, "quantity": 2, "is_rental": false, "rental_term_months": null},
                    {"product_id": 2, "quantity": 1, "is_rental": true, "rental_term_months": 12}
                ],
                "payment_method": "credit_card",
                "shipping_method": "standard",
                "shipping_cost": "0.00",
                "tax_amount": "45.38",
                "notes": ""
            })
        );
    }

    #[test]
    fn test_empty_order_rejected() {
        let err = build_order_request(&[], &CartTotals::default()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: items is required");
    }

    #[test]
    fn test_builder_overrides() {
        let items = items();
        let totals = compute_cart_totals(&PricingConfig::default(), &items).unwrap();
        let order = build_order_request(&items, &totals)
            .unwrap()
            .with_payment_method("paypal")
            .with_notes("leave at door");
        assert_eq!(order.payment_method, "paypal");
        assert_eq!(order.notes, "leave at door");
    }
}
