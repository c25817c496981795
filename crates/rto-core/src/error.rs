//! # Error Types
//!
//! Domain-specific error types for rto-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rto-core errors (this file)                                           │
//! │  ├── CoreError        - Pricing engine failures                        │
//! │  └── ValidationError  - Out-of-domain inputs                           │
//! │                                                                         │
//! │  rto-cli errors (separate crate)                                       │
//! │  └── CliError         - File, TOML, JSON and core failures             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError::InvalidArgument → CliError / UI    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine never recovers from these. Callers validate user input up
//! front or show the message as a validation error.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing engine errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An input is outside the domain of the operation.
    ///
    /// ## When This Occurs
    /// - Zero or negative purchase price
    /// - Rental term outside 3..=24 months
    /// - Negative monthly rate or elapsed months
    /// - Price, rate or cart total above `MAX_AMOUNT_CENTS`
    /// - Rental line item without a term
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    /// The pricing configuration cannot be used.
    #[error("Invalid pricing configuration: {0}")]
    InvalidConfig(String),

    /// Contract is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Recording a payment on a completed contract
    /// - Buying out a cancelled contract
    #[error("Rental contract is {status}, cannot perform operation")]
    InvalidContractStatus { status: String },

    /// Every scheduled payment has already been made.
    #[error("No remaining payments for this rental")]
    NoRemainingPayments,

    /// The cart line being edited does not exist.
    #[error("Product {product_id} not in cart")]
    ItemNotInCart { product_id: u64 },

    /// The cart already holds the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} items")]
    CartFull { max: usize },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Amount above the largest value the engine prices.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: String },

    /// Invalid format (e.g., unparsable amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
