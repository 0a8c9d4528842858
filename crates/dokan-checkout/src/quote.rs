//! # Discount Quoting
//!
//! Storage lookup plus [`dokan_core::discount::validate`]. Quoting never
//! touches the usage counter.

use chrono::{DateTime, Utc};
use dokan_core::discount;
use dokan_core::{Cart, DiscountQuote};
use tracing::debug;

use crate::error::CheckoutResult;
use crate::ports::Storage;

/// Looks up `code` (exact, case-sensitive) and validates it against `cart`.
///
/// Rejections come back as `CheckoutError::Discount` and are counted in
/// `discount_validation_failures_total{reason}`.
pub async fn quote_discount(
    storage: &dyn Storage,
    code: &str,
    cart: &Cart,
    now: DateTime<Utc>,
) -> CheckoutResult<DiscountQuote> {
    let record = storage.find_discount_by_code(code).await?;

    match discount::validate(record.as_ref(), cart, now) {
        Ok(quote) => {
            debug!(
                code = %quote.code,
                eligible_items = quote.eligible_item_count,
                discount = %quote.discount_amount,
                "Discount code quoted"
            );
            Ok(quote)
        }
        Err(rejection) => {
            debug!(code = %code, reason = rejection.reason(), "Discount code rejected");
            metrics::counter!(
                "discount_validation_failures_total",
                "reason" => rejection.reason()
            )
            .increment(1);
            Err(rejection.into())
        }
    }
}
