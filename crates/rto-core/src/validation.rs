//! # Validation Module
//!
//! Domain checks run at the entry of every pricing operation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront forms                                             │
//! │  └── Immediate user feedback (empty fields, slider bounds)             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Storage boundary (cart::StoredLineItem)                      │
//! │  └── Shape checks: rental without a term, purchase without a price     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                  │
//! │  └── Domain checks: price > 0, term 3..=24, elapsed >= 0               │
//! │      amounts <= MAX_AMOUNT_CENTS                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure here surfaces as [`CoreError::InvalidArgument`].
//!
//! ```rust
//! use rto_core::money::Money;
//! use rto_core::validation::{validate_purchase_price, validate_quantity};
//!
//! assert!(validate_purchase_price(Money::from_cents(120000)).is_ok());
//! assert!(validate_purchase_price(Money::zero()).is_err());
//! assert!(validate_quantity(0).is_err());
//! ```
//!
//! [`CoreError::InvalidArgument`]: crate::error::CoreError::InvalidArgument

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT_CENTS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Money Validators
// =============================================================================

/// Purchase prices must be strictly positive and at most `MAX_AMOUNT_CENTS`.
pub fn validate_purchase_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "purchase price".to_string(),
        });
    }
    validate_max_amount("purchase price", price)
}

/// Rejects negative amounts. Zero is allowed (free items, zero-rate promos).
///
/// Amounts above `MAX_AMOUNT_CENTS` are rejected too.
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    validate_max_amount(field, amount)
}

/// Rejects amounts above `MAX_AMOUNT_CENTS`.
pub fn validate_max_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.cents() > MAX_AMOUNT_CENTS {
        return Err(too_large(field));
    }
    Ok(())
}

pub(crate) fn too_large(field: &str) -> ValidationError {
    ValidationError::TooLarge {
        field: field.to_string(),
        max: Money::from_cents(MAX_AMOUNT_CENTS).to_string(),
    }
}

// =============================================================================
// Count Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }

    Ok(())
}

/// Validates a count of months already paid.
///
/// Any non-negative value is accepted; callers compare against the term.
pub fn validate_elapsed_months(elapsed: i64) -> ValidationResult<u32> {
    if elapsed < 0 {
        return Err(ValidationError::Negative {
            field: "elapsed months".to_string(),
        });
    }
    Ok(u32::try_from(elapsed).unwrap_or(u32::MAX))
}

/// Validates a rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_rate_bps(field: &str, bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 10_000,
        });
    }
    Ok(())
}
