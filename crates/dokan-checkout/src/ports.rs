//! # Collaborator Ports
//!
//! The two interfaces checkout talks to. Both are object-safe and shared as
//! `Arc<dyn _>` so the HTTP server, tests and tools can plug in their own.
//!
//! ```text
//! ┌──────────────────┐        ┌──────────────────────────────────────┐
//! │  OrderAssembler  │──────► │ Storage   (dokan-db: SqliteStorage)  │
//! │  resolve_cart    │        │           (tests: in-memory fake)    │
//! │  quote_discount  │        └──────────────────────────────────────┘
//! │                  │        ┌──────────────────────────────────────┐
//! │                  │──────► │ Notifier  (EmailNotifier: HTTP+SMTP) │
//! └──────────────────┘        │           (tests: failing fakes)     │
//!                             └──────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use dokan_core::{DiscountCode, Order, OrderDraft, ProductPrice};

use crate::error::{NotifyError, StorageError};

/// Persistence operations checkout depends on.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Exact, case-sensitive lookup. Inactive codes are still returned.
    async fn find_discount_by_code(&self, code: &str) -> Result<Option<DiscountCode>, StorageError>;

    /// Atomically adds one use, only while below the cap.
    ///
    /// Returns the new usage count, `UsageCapReached` when the cap was
    /// already hit, or `NotFound` for an unknown id.
    async fn increment_discount_usage(&self, discount_id: &str) -> Result<i64, StorageError>;

    /// Persists an order with status pending. Fails with
    /// `DuplicateOrderNumber` if the number is taken.
    async fn create_order(&self, draft: OrderDraft) -> Result<Order, StorageError>;

    /// Current price of a product, `None` if it does not exist.
    async fn get_current_product_price(
        &self,
        product_id: &str,
    ) -> Result<Option<ProductPrice>, StorageError>;
}

/// Order confirmation delivery.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends through the primary channel.
    async fn send_order_confirmation(&self, order: &Order) -> Result<(), NotifyError>;

    /// Sends through the fallback channel.
    async fn send_order_confirmation_fallback(&self, order: &Order) -> Result<(), NotifyError>;
}
