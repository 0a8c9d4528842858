//! # Domain Types
//!
//! Core domain types used throughout Dokan.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │  ProductPrice   │   │  DiscountCode   │   │     Order       │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  product_id     │   │  id (UUID)      │   │  id (UUID)      │        │
//! │  │  regular_price  │   │  code (business)│   │  order_number   │        │
//! │  │  sale_price?    │   │  percentage_off │   │  customer       │        │
//! │  │  status         │   │  usage counters │   │  items[]        │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │ ShippingOption  │   │  OrderStatus    │   │ PaymentMethod   │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  InsideDhaka    │   │  Pending        │   │  Cod            │        │
//! │  │  InsideChittagong│  │  Processing     │   │  MobileBanking  │        │
//! │  │  OutsideCities  │   │  OutForDelivery │   │  BankTransfer   │        │
//! │  └─────────────────┘   │  Delivered      │   └─────────────────┘        │
//! │                        │  Cancelled      │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every persisted entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (code, order_number) - human-readable, what customers type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, ValidationError};
use crate::money::Money;

// =============================================================================
// Product Price
// =============================================================================

/// Whether a product is currently discounted by the store itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Regular,
    Sale,
}

/// The price read model of a product, as storage reports it right now.
///
/// Only what pricing needs lives here; catalogue content (images, copy,
/// categories) belongs to the CMS and never enters checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPrice {
    pub product_id: String,

    /// Display name, snapshotted into order lines.
    pub name: String,

    /// Regular price in poisha.
    pub regular_price_poisha: i64,

    /// Sale price in poisha, if the product has one configured.
    pub sale_price_poisha: Option<i64>,

    pub status: ProductStatus,
}

impl ProductPrice {
    /// Returns the regular price as Money.
    #[inline]
    pub fn regular_price(&self) -> Money {
        Money::from_poisha(self.regular_price_poisha)
    }

    /// Returns the sale price as Money, if one is set.
    #[inline]
    pub fn sale_price(&self) -> Option<Money> {
        self.sale_price_poisha.map(Money::from_poisha)
    }

    /// The price a customer actually pays for one unit.
    ///
    /// ```text
    /// status == Sale && sale_price > 0  ──► sale_price
    /// otherwise                         ──► regular_price
    /// ```
    ///
    /// A product flagged as on sale without a usable sale price falls back to
    /// the regular price rather than becoming free.
    pub fn effective_price(&self) -> Money {
        match (self.status, self.sale_price()) {
            (ProductStatus::Sale, Some(sale)) if sale.is_positive() => sale,
            _ => self.regular_price(),
        }
    }
}

// =============================================================================
// Discount Code
// =============================================================================

/// A percentage discount code that customers type at checkout.
///
/// ## Usage Counter
/// ```text
/// current_usage_count ──(+1 per placed order, atomic, conditional)──► max_usage_count
///
/// Never decremented. Storage refuses the increment once the cap is reached,
/// so current_usage_count <= max_usage_count always holds.
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCode {
    pub id: String,

    /// Exact, case-sensitive code the customer enters.
    pub code: String,

    /// Internal name shown in admin listings.
    pub name: String,

    /// Whole percentage taken off eligible items (1..=100).
    pub percentage_off: u8,

    pub max_usage_count: i64,
    pub current_usage_count: i64,

    /// First valid instant (inclusive).
    #[ts(as = "String")]
    pub start_date: DateTime<Utc>,

    /// Last valid instant (inclusive).
    #[ts(as = "String")]
    pub end_date: DateTime<Utc>,

    /// Products the code is restricted to. Empty means every product.
    pub applicable_product_ids: Vec<String>,

    pub is_active: bool,
}

impl DiscountCode {
    /// True once the usage counter has reached the cap.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.current_usage_count >= self.max_usage_count
    }

    /// Remaining redemptions, never negative.
    #[inline]
    pub fn remaining_uses(&self) -> i64 {
        (self.max_usage_count - self.current_usage_count).max(0)
    }

    /// Whether the code is unrestricted.
    #[inline]
    pub fn applies_to_all_products(&self) -> bool {
        self.applicable_product_ids.is_empty()
    }

    /// Whether a product is eligible under this code's restriction.
    pub fn applies_to(&self, product_id: &str) -> bool {
        self.applies_to_all_products()
            || self.applicable_product_ids.iter().any(|id| id == product_id)
    }

    /// Derives the status an admin sees in the listing.
    ///
    /// ## Precedence
    /// ```text
    /// !is_active        → Inactive
    /// usage >= max      → Exhausted
    /// end_date < now    → Expired
    /// start_date > now  → Upcoming
    /// otherwise         → Active
    /// ```
    pub fn status(&self, now: DateTime<Utc>) -> DiscountStatus {
        if !self.is_active {
            DiscountStatus::Inactive
        } else if self.is_exhausted() {
            DiscountStatus::Exhausted
        } else if self.end_date < now {
            DiscountStatus::Expired
        } else if self.start_date > now {
            DiscountStatus::Upcoming
        } else {
            DiscountStatus::Active
        }
    }
}

/// Admin-facing summary of a discount code's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountStatus {
    Inactive,
    Exhausted,
    Expired,
    Upcoming,
    Active,
}

/// Input for creating a discount code from the admin surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewDiscountCode {
    pub code: String,
    pub name: String,
    pub percentage_off: u8,
    pub max_usage_count: i64,
    #[ts(as = "String")]
    pub start_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub applicable_product_ids: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Shipping Option
// =============================================================================

/// Flat-rate delivery tiers.
///
/// ## Tiers
/// ```text
/// ┌──────────────────────┬───────────────────────────┬───────────┐
/// │ key                  │ label                     │ flat cost │
/// ├──────────────────────┼───────────────────────────┼───────────┤
/// │ inside_dhaka         │ Inside Dhaka              │ Tk 70.00  │
/// │ inside_chittagong    │ Inside Chittagong         │ Tk 70.00  │
/// │ outside_cities       │ Outside Dhaka & Chittagong│ Tk 130.00 │
/// └──────────────────────┴───────────────────────────┴───────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ShippingOption {
    #[default]
    InsideDhaka,
    InsideChittagong,
    OutsideCities,
}

impl ShippingOption {
    /// Every option, in the order the checkout form lists them.
    pub const ALL: [ShippingOption; 3] = [
        ShippingOption::InsideDhaka,
        ShippingOption::InsideChittagong,
        ShippingOption::OutsideCities,
    ];

    /// Stable wire/storage key.
    pub const fn key(&self) -> &'static str {
        match self {
            ShippingOption::InsideDhaka => "inside_dhaka",
            ShippingOption::InsideChittagong => "inside_chittagong",
            ShippingOption::OutsideCities => "outside_cities",
        }
    }

    /// Human-readable area name.
    pub const fn label(&self) -> &'static str {
        match self {
            ShippingOption::InsideDhaka => "Inside Dhaka",
            ShippingOption::InsideChittagong => "Inside Chittagong",
            ShippingOption::OutsideCities => "Outside Dhaka & Chittagong",
        }
    }

    pub const fn flat_cost(&self) -> Money {
        match self {
            ShippingOption::InsideDhaka | ShippingOption::InsideChittagong => Money::from_taka(70),
            ShippingOption::OutsideCities => Money::from_taka(130),
        }
    }

    /// Label with the cost, e.g. `Inside Dhaka (Tk 70.00)`.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.label(), self.flat_cost())
    }

    /// Exact key lookup.
    pub fn from_key(key: &str) -> Option<ShippingOption> {
        Self::ALL.into_iter().find(|option| option.key() == key)
    }

    /// Key lookup that falls back to `inside_dhaka` for unknown keys.
    pub fn resolve(key: &str) -> ShippingOption {
        Self::from_key(key).unwrap_or_default()
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle of a placed order.
///
/// ## Transitions (admin only)
/// ```text
///   Pending ──► Processing ──► OutForDelivery ──► Delivered
///      │            │
///      └────────────┴──────► Cancelled
///
///   Delivered and Cancelled are terminal.
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub const fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, OutForDelivery)
                | (OutForDelivery, Delivered)
                | (Pending, Cancelled)
                | (Processing, Cancelled)
        )
    }

    /// Checks a transition, returning the new status when allowed.
    pub fn transition_to(&self, next: OrderStatus) -> Result<OrderStatus, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidStatusTransition {
                from: *self,
                to: next,
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "out_for_delivery" => Ok(OrderStatus::OutForDelivery),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: [
                    OrderStatus::Pending,
                    OrderStatus::Processing,
                    OrderStatus::OutForDelivery,
                    OrderStatus::Delivered,
                    OrderStatus::Cancelled,
                ]
                .iter()
                .map(|status| status.as_str().to_string())
                .collect(),
            }),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer intends to pay. Recorded only; no payment is processed.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cod,
    MobileBanking,
    BankTransfer,
}

// =============================================================================
// Customer Details
// =============================================================================

/// Contact and delivery details captured by the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub alternative_phone: Option<String>,
    pub email: String,
    pub district: String,
    pub thana: String,
    pub full_address: String,
    pub office_code: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// Order
// =============================================================================

/// A line in a placed order.
/// Uses snapshot pattern to freeze product data at time of order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Unique per line, generated when the order is assembled.
    pub key: String,
    pub product_id: String,
    /// Product name at time of order (frozen).
    pub name: String,
    pub quantity: i64,
    /// Unit price in poisha at time of order (frozen).
    pub price_at_time_poisha: i64,
    pub line_total_poisha: i64,
}

impl OrderItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price_at_time(&self) -> Money {
        Money::from_poisha(self.price_at_time_poisha)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_poisha(self.line_total_poisha)
    }
}

/// Everything needed to persist an order. Storage assigns `id`, sets the
/// status to pending and stamps `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub order_number: String,
    pub customer: CustomerDetails,
    pub shipping_method: ShippingOption,
    pub shipping_cost_poisha: i64,
    pub payment_method: PaymentMethod,
    pub items: Vec<OrderItem>,
    pub subtotal_poisha: i64,
    pub discount_code_id: Option<String>,
    pub discount_code: Option<String>,
    pub discount_amount_poisha: i64,
    pub total_poisha: i64,
    pub currency: String,
    pub order_date: DateTime<Utc>,
}

/// A persisted order. Immutable except for `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub customer: CustomerDetails,
    pub shipping_method: ShippingOption,
    pub shipping_cost_poisha: i64,
    pub payment_method: PaymentMethod,
    pub items: Vec<OrderItem>,
    pub subtotal_poisha: i64,
    pub discount_code_id: Option<String>,
    pub discount_code: Option<String>,
    pub discount_amount_poisha: i64,
    pub total_poisha: i64,
    pub currency: String,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub order_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Materialises a draft once storage has assigned an id.
    pub fn from_draft(id: String, draft: OrderDraft) -> Self {
        Order {
            id,
            order_number: draft.order_number,
            customer: draft.customer,
            shipping_method: draft.shipping_method,
            shipping_cost_poisha: draft.shipping_cost_poisha,
            payment_method: draft.payment_method,
            items: draft.items,
            subtotal_poisha: draft.subtotal_poisha,
            discount_code_id: draft.discount_code_id,
            discount_code: draft.discount_code,
            discount_amount_poisha: draft.discount_amount_poisha,
            total_poisha: draft.total_poisha,
            currency: draft.currency,
            status: OrderStatus::Pending,
            order_date: draft.order_date,
            updated_at: draft.order_date,
        }
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_poisha(self.subtotal_poisha)
    }

    #[inline]
    pub fn shipping_cost(&self) -> Money {
        Money::from_poisha(self.shipping_cost_poisha)
    }

    #[inline]
    pub fn discount_amount(&self) -> Money {
        Money::from_poisha(self.discount_amount_poisha)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_poisha(self.total_poisha)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
