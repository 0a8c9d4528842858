//! # Domain Errors
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ──► CoreError ──┐                                      │
//! │  DiscountError (discount.rs) ────┼──► CheckoutError ──► ApiError (HTTP) │
//! │                                  │                                      │
//! │  DbError (dokan-db) wraps CoreError for rules checked on write.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Messages carry the offending value (product id, status, field name) and
//! are safe to show a shopper; nothing here leaks storage detail.

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// A cart or order rule was broken.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// More distinct products than `MAX_CART_ITEMS`.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Raised on the merged quantity, so re-adding a line can trip it:
    /// ```text
    /// P1 × 995 in cart, add P1 × 10  ──►  QuantityTooLarge { requested: 1005, max: 999 }
    /// ```
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// See [`OrderStatus::can_transition_to`].
    #[error("Cannot move order from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single field failed its check. `field` uses the camelCase wire name.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Phone, email, discount code shape.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
