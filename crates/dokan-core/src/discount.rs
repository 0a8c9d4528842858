//! # Discount Validation
//!
//! Decides whether a discount code applies to a cart and how much it takes off.
//!
//! ## Check Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate(code, cart, now)                                              │
//! │                                                                         │
//! │  1. no record, or is_active == false    → CodeNotFound                  │
//! │  2. current_usage >= max_usage          → UsageExhausted                │
//! │  3. now < start_date                    → NotYetActive                  │
//! │     now > end_date                      → Expired                       │
//! │  4. restricted and no cart item matches → NoEligibleItems               │
//! │     (an empty cart never has eligible items)                            │
//! │  5. eligible subtotal × percentage_off  → DiscountQuote                 │
//! │                                                                         │
//! │  The first failing check wins; both window boundaries are valid.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A quote is a read-only answer. Usage is only counted after an order that
//! used the quote has been persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::cart::Cart;
use crate::money::Money;
use crate::types::DiscountCode;

// =============================================================================
// Discount Error
// =============================================================================

/// Why a code cannot be applied to a cart.
///
/// Customers only ever see "Code not valid"; [`DiscountError::reason`] is the
/// machine-readable detail for logs, metrics and the API `reason` field.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DiscountError {
    #[error("discount code not found")]
    CodeNotFound,

    #[error("discount code usage limit reached")]
    UsageExhausted,

    #[error("discount code is not active yet")]
    NotYetActive,

    #[error("discount code has expired")]
    Expired,

    #[error("discount code does not apply to any item in the cart")]
    NoEligibleItems,
}

impl DiscountError {
    /// Stable snake_case identifier.
    pub const fn reason(&self) -> &'static str {
        match self {
            DiscountError::CodeNotFound => "code_not_found",
            DiscountError::UsageExhausted => "usage_exhausted",
            DiscountError::NotYetActive => "not_yet_active",
            DiscountError::Expired => "expired",
            DiscountError::NoEligibleItems => "no_eligible_items",
        }
    }
}

// =============================================================================
// Discount Quote
// =============================================================================

/// The result of validating a code against one specific cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountQuote {
    pub code_id: String,
    pub code: String,
    pub name: String,
    pub percentage_off: u8,
    pub eligible_subtotal: Money,
    pub discount_amount: Money,
    /// Cart lines the code applies to.
    pub eligible_item_count: usize,
    /// All cart lines.
    pub total_item_count: usize,
}

// =============================================================================
// Validation
// =============================================================================

/// Validates `code` against `cart` at instant `now`.
///
/// `code` is the result of an exact, case-sensitive lookup; `None` means the
/// lookup found nothing.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, Utc};
/// use dokan_core::cart::Cart;
/// use dokan_core::discount::validate;
/// use dokan_core::money::Money;
/// use dokan_core::types::DiscountCode;
///
/// let now = Utc::now();
/// let code = DiscountCode {
///     id: "d1".into(),
///     code: "SAVE10".into(),
///     name: "Ten off".into(),
///     percentage_off: 10,
///     max_usage_count: 100,
///     current_usage_count: 0,
///     start_date: now - Duration::days(1),
///     end_date: now + Duration::days(1),
///     applicable_product_ids: vec![],
///     is_active: true,
/// };
///
/// let mut cart = Cart::new();
/// cart.add_item("p1", "Panjabi", Money::from_taka(500), 2).unwrap();
///
/// let quote = validate(Some(&code), &cart, now).unwrap();
/// assert_eq!(quote.discount_amount, Money::from_taka(100));
/// ```
pub fn validate(
    code: Option<&DiscountCode>,
    cart: &Cart,
    now: DateTime<Utc>,
) -> Result<DiscountQuote, DiscountError> {
    let code = match code {
        Some(code) if code.is_active => code,
        _ => return Err(DiscountError::CodeNotFound),
    };

    if code.is_exhausted() {
        return Err(DiscountError::UsageExhausted);
    }

    if now < code.start_date {
        return Err(DiscountError::NotYetActive);
    }
    if now > code.end_date {
        return Err(DiscountError::Expired);
    }

    let eligible: Vec<_> = cart
        .items()
        .iter()
        .filter(|item| code.applies_to(&item.product_id))
        .collect();

    if eligible.is_empty() {
        return Err(DiscountError::NoEligibleItems);
    }

    let eligible_subtotal: Money = eligible.iter().map(|item| item.line_total()).sum();
    let discount_amount = eligible_subtotal.percentage_of(code.percentage_off);

    Ok(DiscountQuote {
        code_id: code.id.clone(),
        code: code.code.clone(),
        name: code.name.clone(),
        percentage_off: code.percentage_off,
        eligible_subtotal,
        discount_amount,
        eligible_item_count: eligible.len(),
        total_item_count: cart.len(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
