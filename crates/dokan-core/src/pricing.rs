//! # Pricing Engine
//!
//! The single source of truth for what a cart costs.
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  price(cart, shipping_key, quote)                                       │
//! │                                                                         │
//! │  subtotal      = Σ effective unit price × quantity                      │
//! │  shipping_cost = flat cost of shipping_key (unknown key → inside_dhaka) │
//! │  discount      = quote.discount_amount, or 0 without a quote            │
//! │  total         = max(0, subtotal + shipping_cost − discount)            │
//! │                                                                         │
//! │  Only integer additions happen here. The single rounding step already   │
//! │  happened when the quote was computed.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, LineItem};
use crate::discount::DiscountQuote;
use crate::money::Money;
use crate::types::ShippingOption;

/// The discount recorded on a priced order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDiscount {
    pub code_id: String,
    pub code: String,
    pub percentage_off: u8,
    pub amount: Money,
}

/// Authoritative totals for a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedOrder {
    pub line_items: Vec<LineItem>,
    pub subtotal: Money,
    /// The option actually charged, after the unknown-key fallback.
    pub shipping: ShippingOption,
    pub shipping_cost: Money,
    pub discount: Option<AppliedDiscount>,
    pub total: Money,
}

impl PricedOrder {
    /// Discount amount, zero when no code was applied.
    pub fn discount_amount(&self) -> Money {
        self.discount
            .as_ref()
            .map(|d| d.amount)
            .unwrap_or_default()
    }
}

/// Prices a cart.
///
/// The quote must have been computed for this same cart; its amount is taken
/// as-is.
///
/// ## Example
/// ```rust
/// use dokan_core::cart::Cart;
/// use dokan_core::money::Money;
/// use dokan_core::pricing::price;
///
/// let mut cart = Cart::new();
/// cart.add_item("p1", "Saree", Money::from_taka(1200), 1).unwrap();
///
/// let priced = price(&cart, "outside_cities", None);
/// assert_eq!(priced.total, Money::from_taka(1330));
/// ```
pub fn price(cart: &Cart, shipping_key: &str, quote: Option<&DiscountQuote>) -> PricedOrder {
    let subtotal = cart.subtotal();
    let shipping = ShippingOption::resolve(shipping_key);
    let shipping_cost = shipping.flat_cost();

    let discount = quote.map(|q| AppliedDiscount {
        code_id: q.code_id.clone(),
        code: q.code.clone(),
        percentage_off: q.percentage_off,
        amount: q.discount_amount,
    });
    let discount_amount = discount.as_ref().map(|d| d.amount).unwrap_or_default();

    let total = (subtotal + shipping_cost).saturating_sub(discount_amount);

    PricedOrder {
        line_items: cart.items().to_vec(),
        subtotal,
        shipping,
        shipping_cost,
        discount,
        total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
