//! # dokan-checkout: Order Placement for Dokan
//!
//! Sequences the I/O around dokan-core's pure pricing.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /orders                                                           │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  resolve_cart(storage, [{productId, quantity}])   prices from storage   │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  quote_discount(storage, code, cart, now)         read-only             │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  OrderAssembler::place_order                                            │
//! │     ├── validate customer                                               │
//! │     ├── price (dokan-core)                                              │
//! │     ├── Storage::create_order          ◄── last step that can fail      │
//! │     ├── Storage::increment_discount_usage   (logged on failure)         │
//! │     └── Notifier primary → fallback         (logged on failure)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`ports`] - `Storage` and `Notifier` traits
//! - [`resolve`] - client cart → priced [`dokan_core::Cart`]
//! - [`quote`] - discount code lookup + validation
//! - [`assembler`] - the placement state machine
//! - [`order_number`] - `ORD-…` generation
//! - [`notify`] - email channels implementing `Notifier`
//! - [`error`] - checkout error types

pub mod assembler;
pub mod error;
pub mod notify;
pub mod order_number;
pub mod ports;
pub mod quote;
pub mod resolve;

pub use assembler::{
    CheckoutStage, DiscountUsageOutcome, NotificationOutcome, OrderAssembler, OrderRequest,
    PlacementReport,
};
pub use error::{CheckoutError, CheckoutResult, NotifyError, StorageError};
pub use ports::{Notifier, Storage};
pub use quote::quote_discount;
pub use resolve::{resolve_cart, CartRequestItem};
