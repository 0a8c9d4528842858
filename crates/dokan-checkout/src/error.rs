//! # Checkout Errors
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StorageError ──┐                                                       │
//! │  ValidationError├──► CheckoutError ──► ApiError (storefront-api)        │
//! │  CoreError      │                                                       │
//! │  DiscountError ─┘                                                       │
//! │                                                                         │
//! │  NotifyError never reaches CheckoutError: notification failures are     │
//! │  reported in PlacementReport, not returned.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use dokan_core::{CoreError, DiscountError, ValidationError};
use thiserror::Error;

/// Failures reported by a [`Storage`](crate::ports::Storage) implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No record with this id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Another order already uses this order number.
    #[error("Order number already exists: {0}")]
    DuplicateOrderNumber(String),

    /// The conditional increment found the counter already at its cap.
    #[error("Discount code {0} has reached its usage limit")]
    UsageCapReached(String),

    /// Any other backend failure (connection, timeout, constraint).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Failures from a notification channel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Channel not enabled: {0}")]
    NotEnabled(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Send error: {0}")]
    SendFailed(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
}

/// Everything that can stop an order from being placed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Customer details failed validation. Nothing was written.
    #[error("Invalid order input: {0}")]
    InvalidOrderInput(#[from] ValidationError),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// A cart rule was broken (quantity or size bounds).
    #[error(transparent)]
    Cart(#[from] CoreError),

    /// The discount code cannot be applied to this cart.
    #[error("Code not valid: {0}")]
    Discount(#[from] DiscountError),

    /// A collaborator failed before the order was persisted.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CheckoutError {
    /// Whether the caller sent something wrong, as opposed to a backend failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CheckoutError::Storage(_))
    }
}

/// Convenience type alias for Results with CheckoutError.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_are_not_client_errors() {
        let err: CheckoutError = StorageError::Unavailable("pool timed out".to_string()).into();
        assert!(!err.is_client_error());
        assert!(CheckoutError::EmptyCart.is_client_error());
        assert!(CheckoutError::from(DiscountError::Expired).is_client_error());
    }

    #[test]
    fn test_messages() {
        let err = StorageError::NotFound {
            entity: "DiscountCode".to_string(),
            id: "d-1".to_string(),
        };
        assert_eq!(err.to_string(), "DiscountCode not found: d-1");
        assert_eq!(
            CheckoutError::from(DiscountError::UsageExhausted).to_string(),
            "Code not valid: discount code usage limit reached"
        );
    }
}
