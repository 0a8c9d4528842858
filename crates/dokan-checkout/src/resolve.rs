//! # Cart Resolution
//!
//! Turns what the client sent (`[{productId, quantity}]`) into a [`Cart`]
//! priced from storage. Whatever prices or totals the client believes in are
//! never read here.

use dokan_core::validation::validate_quantity;
use dokan_core::Cart;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CheckoutError, CheckoutResult};
use crate::ports::Storage;

/// One requested cart line, as the client sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRequestItem {
    pub product_id: String,
    pub quantity: i64,
}

/// Builds a cart from current storage prices.
///
/// ## Rules
/// - quantity outside 1..=999 → `InvalidOrderInput`
/// - product id storage does not know → `UnknownProduct`
/// - the same product id twice → one line with the summed quantity
///   (still bounded by 999)
pub async fn resolve_cart(
    storage: &dyn Storage,
    requested: &[CartRequestItem],
) -> CheckoutResult<Cart> {
    let mut cart = Cart::new();

    for item in requested {
        validate_quantity(item.quantity)?;

        let price = storage
            .get_current_product_price(&item.product_id)
            .await?
            .ok_or_else(|| CheckoutError::UnknownProduct(item.product_id.clone()))?;

        cart.add_product(&price, item.quantity)?;
    }

    debug!(
        lines = cart.len(),
        units = cart.total_quantity(),
        subtotal = %cart.subtotal(),
        "Resolved cart"
    );

    Ok(cart)
}
