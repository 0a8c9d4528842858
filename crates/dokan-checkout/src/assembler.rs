//! # Order Assembler
//!
//! Places an order and runs its post-commit side effects.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Start ──► Validated ──► Priced ──► Persisted ──► DiscountApplied ──┐   │
//! │    │           │           │            │          (when quoted)    │   │
//! │    ▼           ▼           ▼            │                           ▼   │
//! │  InvalidOrderInput    EmptyCart    Storage error          Notified ──►  │
//! │  (nothing written, order not placed)    │                     Done      │
//! │                                         │                               │
//! │  After Persisted nothing aborts: a failed usage increment or a failed   │
//! │  email is logged, counted and reported, and the order stands.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Side Effects
//! | Step            | Collaborator call                   | On failure            |
//! |-----------------|-------------------------------------|-----------------------|
//! | Persisted       | `Storage::create_order`             | fatal (retry on dup)  |
//! | DiscountApplied | `Storage::increment_discount_usage` | logged, never retried |
//! | Notified        | primary, then fallback channel      | logged                |

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dokan_core::pricing::{self, PricedOrder};
use dokan_core::validation::validate_customer;
use dokan_core::{Cart, CustomerDetails, DiscountQuote, Order, OrderDraft, OrderItem, PaymentMethod};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{CheckoutError, CheckoutResult, StorageError};
use crate::order_number::generate_order_number;
use crate::ports::{Notifier, Storage};

/// How many order numbers are tried before a collision becomes fatal.
pub const MAX_ORDER_NUMBER_ATTEMPTS: usize = 3;

// =============================================================================
// Report Types
// =============================================================================

/// Stages a placement passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    Start,
    Validated,
    Priced,
    Persisted,
    DiscountApplied,
    Notified,
    Done,
}

/// What happened to the discount usage counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum DiscountUsageOutcome {
    /// No discount was applied to the order.
    Skipped,
    Applied { new_count: i64 },
    Failed { reason: String },
}

/// Which channel delivered the confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum NotificationOutcome {
    Primary,
    Fallback,
    Failed { reason: String },
}

/// A placed order plus what happened after it was persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementReport {
    pub order: Order,
    pub priced: PricedOrder,
    pub discount_usage: DiscountUsageOutcome,
    pub notification: NotificationOutcome,
    pub stages: Vec<CheckoutStage>,
}

/// Everything the customer filled in besides the cart.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub customer: CustomerDetails,
    pub shipping_method: String,
    pub payment_method: PaymentMethod,
}

impl OrderRequest {
    /// Rejects bad customer details and empty carts.
    ///
    /// Runs inside [`OrderAssembler::place_order`] too; callers that do
    /// storage work before placing (quoting a discount) call it first so
    /// the input error is the one reported.
    pub fn check(&self, cart: &Cart) -> CheckoutResult<()> {
        validate_customer(&self.customer)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        Ok(())
    }
}

// =============================================================================
// Assembler
// =============================================================================

/// Places orders against a [`Storage`] and a [`Notifier`].
#[derive(Clone)]
pub struct OrderAssembler {
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
    currency: String,
}

impl OrderAssembler {
    pub fn new(storage: Arc<dyn Storage>, notifier: Arc<dyn Notifier>, currency: impl Into<String>) -> Self {
        Self {
            storage,
            notifier,
            currency: currency.into(),
        }
    }

    /// Places an order for `cart`.
    ///
    /// `quote` must have been computed for this same cart. Errors are only
    /// returned for the steps before the order is persisted.
    pub async fn place_order(
        &self,
        request: &OrderRequest,
        cart: &Cart,
        quote: Option<&DiscountQuote>,
    ) -> CheckoutResult<PlacementReport> {
        let mut stages = vec![CheckoutStage::Start];

        validate_customer(&request.customer)?;
        stages.push(CheckoutStage::Validated);

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let priced = pricing::price(cart, &request.shipping_method, quote);
        if priced.shipping.key() != request.shipping_method {
            debug!(
                requested = %request.shipping_method,
                charged = priced.shipping.key(),
                "Unknown shipping method, using default"
            );
        }
        stages.push(CheckoutStage::Priced);

        let order = self.persist(request, &priced, Utc::now()).await?;
        stages.push(CheckoutStage::Persisted);
        metrics::counter!("orders_placed_total").increment(1);
        info!(
            order_number = %order.order_number,
            total = %order.total(),
            lines = order.items.len(),
            discount_code = order.discount_code.as_deref().unwrap_or("-"),
            "Order placed"
        );

        let discount_usage = self.apply_discount_usage(&order, &priced).await;
        if matches!(discount_usage, DiscountUsageOutcome::Applied { .. }) {
            stages.push(CheckoutStage::DiscountApplied);
        }

        let notification = self.send_confirmation(&order).await;
        if !matches!(notification, NotificationOutcome::Failed { .. }) {
            stages.push(CheckoutStage::Notified);
        }
        stages.push(CheckoutStage::Done);

        Ok(PlacementReport {
            order,
            priced,
            discount_usage,
            notification,
            stages,
        })
    }

    /// Writes the order, regenerating the order number on collisions.
    async fn persist(
        &self,
        request: &OrderRequest,
        priced: &PricedOrder,
        now: DateTime<Utc>,
    ) -> CheckoutResult<Order> {
        let items: Vec<OrderItem> = priced
            .line_items
            .iter()
            .map(|line| OrderItem {
                key: Uuid::new_v4().to_string(),
                product_id: line.product_id.clone(),
                name: line.name.clone(),
                quantity: line.quantity,
                price_at_time_poisha: line.unit_price.poisha(),
                line_total_poisha: line.line_total().poisha(),
            })
            .collect();

        let mut attempt = 1;
        loop {
            let draft = OrderDraft {
                order_number: generate_order_number(now),
                customer: request.customer.clone(),
                shipping_method: priced.shipping,
                shipping_cost_poisha: priced.shipping_cost.poisha(),
                payment_method: request.payment_method,
                items: items.clone(),
                subtotal_poisha: priced.subtotal.poisha(),
                discount_code_id: priced.discount.as_ref().map(|d| d.code_id.clone()),
                discount_code: priced.discount.as_ref().map(|d| d.code.clone()),
                discount_amount_poisha: priced.discount_amount().poisha(),
                total_poisha: priced.total.poisha(),
                currency: self.currency.clone(),
                order_date: now,
            };

            match self.storage.create_order(draft).await {
                Ok(order) => return Ok(order),
                Err(StorageError::DuplicateOrderNumber(number))
                    if attempt < MAX_ORDER_NUMBER_ATTEMPTS =>
                {
                    warn!(order_number = %number, attempt, "Order number collision, regenerating");
                    attempt += 1;
                }
                Err(e) => {
                    error!(error = %e, "Failed to persist order");
                    return Err(e.into());
                }
            }
        }
    }

    async fn apply_discount_usage(&self, order: &Order, priced: &PricedOrder) -> DiscountUsageOutcome {
        let Some(discount) = priced.discount.as_ref() else {
            return DiscountUsageOutcome::Skipped;
        };

        match self.storage.increment_discount_usage(&discount.code_id).await {
            Ok(new_count) => {
                metrics::counter!("discount_usage_increments_total", "outcome" => "applied")
                    .increment(1);
                debug!(
                    order_number = %order.order_number,
                    code = %discount.code,
                    new_count,
                    "Discount usage recorded"
                );
                DiscountUsageOutcome::Applied { new_count }
            }
            Err(e) => {
                let outcome = match e {
                    StorageError::UsageCapReached(_) => "cap_reached",
                    _ => "failed",
                };
                metrics::counter!("discount_usage_increments_total", "outcome" => outcome)
                    .increment(1);
                warn!(
                    order_number = %order.order_number,
                    code = %discount.code,
                    error = %e,
                    "Failed to record discount usage; order stands"
                );
                DiscountUsageOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Sends the confirmation email for `order`, primary channel first.
    ///
    /// Never fails: a failure on both channels is reported in the outcome.
    pub async fn send_confirmation(&self, order: &Order) -> NotificationOutcome {
        let primary_error = match self.notifier.send_order_confirmation(order).await {
            Ok(()) => {
                metrics::counter!("order_notifications_total", "channel" => "primary", "outcome" => "sent")
                    .increment(1);
                return NotificationOutcome::Primary;
            }
            Err(e) => e,
        };

        metrics::counter!("order_notifications_total", "channel" => "primary", "outcome" => "failed")
            .increment(1);
        warn!(
            order_number = %order.order_number,
            error = %primary_error,
            "Primary confirmation channel failed, trying fallback"
        );

        match self.notifier.send_order_confirmation_fallback(order).await {
            Ok(()) => {
                metrics::counter!("order_notifications_total", "channel" => "fallback", "outcome" => "sent")
                    .increment(1);
                NotificationOutcome::Fallback
            }
            Err(fallback_error) => {
                metrics::counter!("order_notifications_total", "channel" => "fallback", "outcome" => "failed")
                    .increment(1);
                error!(
                    order_number = %order.order_number,
                    primary_error = %primary_error,
                    fallback_error = %fallback_error,
                    "Order confirmation could not be sent"
                );
                NotificationOutcome::Failed {
                    reason: format!("primary: {primary_error}; fallback: {fallback_error}"),
                }
            }
        }
    }
}
