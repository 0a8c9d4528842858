//! # dokan-core: Pure Pricing & Discount Logic for Dokan
//!
//! This crate is the **heart** of the Dokan checkout. It answers "what does
//! this cart cost" and "does this code apply" as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dokan Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                    Storefront (Next.js)                         │    │
//! │  │    Product page ──► Cart ──► Checkout form ──► Confirmation     │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                 storefront-api (axum)                           │    │
//! │  │    /discount/validate, /discount/use, /orders, /admin/...       │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │         dokan-checkout (resolve → quote → assemble)             │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │               ★ dokan-core (THIS CRATE) ★                       │    │
//! │  │                                                                 │    │
//! │  │   ┌─────────┐  ┌─────────┐  ┌──────────┐  ┌─────────┐           │    │
//! │  │   │  money  │  │  cart   │  │ discount │  │ pricing │           │    │
//! │  │   │  Money  │  │  Cart   │  │ validate │  │  price  │           │    │
//! │  │   └─────────┘  └─────────┘  └──────────┘  └─────────┘           │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO CLOCK READS            │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ProductPrice, DiscountCode, Order, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Server-side cart with merge and bounds rules
//! - [`discount`] - Discount code eligibility and quoting
//! - [`pricing`] - Subtotal, shipping, discount and total
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use dokan_core::cart::Cart;
//! use dokan_core::money::Money;
//! use dokan_core::pricing::price;
//!
//! let mut cart = Cart::new();
//! cart.add_item("p1", "Panjabi", Money::from_taka(500), 2).unwrap();
//!
//! let priced = price(&cart, "inside_dhaka", None);
//! assert_eq!(priced.total.to_string(), "Tk 1070.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod discount;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use dokan_core::Money` instead of
// `use dokan_core::money::Money`

pub use cart::{Cart, LineItem};
pub use discount::{DiscountError, DiscountQuote};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use pricing::{AppliedDiscount, PricedOrder};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct products allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and keeps confirmation emails readable.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single product in a cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price storage may hold or a cart may carry: Tk 1,00,00,000.
///
/// At 100 lines × 999 units this keeps every total below 1e14 poisha, far
/// inside `i64`.
pub const MAX_PRICE_POISHA: i64 = 1_000_000_000;

/// Currency recorded on every order.
pub const DEFAULT_CURRENCY: &str = "BDT";
