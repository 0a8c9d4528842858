//! # Cart Module
//!
//! The server-side cart: line items keyed by product, priced from storage.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Client sends [{productId, quantity}]                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  resolve_cart (dokan-checkout) looks up ProductPrice for each id        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Cart::add_product ← THIS MODULE                                        │
//! │       ├── same product twice? → quantities merge into one line          │
//! │       ├── quantity <= 0?      → rejected                                │
//! │       ├── merged qty > 999?   → QuantityTooLarge                        │
//! │       └── 101st product?      → CartTooLarge                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DiscountValidator / PricingEngine read the cart, never mutate it       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Client-supplied prices never enter a `Cart`; every `unit_price` is the
//! product's effective price as storage reported it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::ProductPrice;
use crate::validation::{validate_price_poisha, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Line Item
// =============================================================================

/// One product in the cart with its resolved unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl LineItem {
    /// unit_price × quantity, exact.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Ordered line items, at most one per product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` units of a product at its effective price.
    ///
    /// Adding a product that is already in the cart increases that line's
    /// quantity; the line keeps its position.
    pub fn add_product(&mut self, product: &ProductPrice, quantity: i64) -> CoreResult<()> {
        self.add_item(
            &product.product_id,
            &product.name,
            product.effective_price(),
            quantity,
        )
    }

    /// Adds a line directly from a known unit price.
    pub fn add_item(
        &mut self,
        product_id: &str,
        name: &str,
        unit_price: Money,
        quantity: i64,
    ) -> CoreResult<()> {
        validate_quantity(quantity)?;
        // Stored prices are not trusted to be in range
        validate_price_poisha(unit_price.poisha())?;

        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            let merged = existing.quantity + quantity;
            if merged > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: merged,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            existing.quantity = merged;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(LineItem {
            product_id: product_id.to_string(),
            name: name.to_string(),
            unit_price,
            quantity,
        });
        Ok(())
    }

    /// Sets a line's quantity. Zero or negative removes the line.
    ///
    /// Returns `ProductNotFound` if the product is not in the cart.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        let position = self
            .items
            .iter()
            .position(|i| i.product_id == product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        if quantity <= 0 {
            self.items.remove(position);
            return Ok(());
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        self.items[position].quantity = quantity;
        Ok(())
    }

    /// Removes a line. Returns whether anything was removed.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, product_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Σ unit_price × quantity.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductStatus;
    use crate::MAX_PRICE_POISHA;

    fn price(id: &str, poisha: i64) -> ProductPrice {
        ProductPrice {
            product_id: id.to_string(),
            name: format!("Product {id}"),
            regular_price_poisha: poisha,
            sale_price_poisha: None,
            status: ProductStatus::Regular,
        }
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        cart.add_product(&price("p1", 50_000), 1).unwrap();
        cart.add_product(&price("p2", 20_000), 1).unwrap();
        cart.add_product(&price("p1", 50_000), 2).unwrap();

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get("p1").unwrap().quantity, 3);
        assert_eq!(cart.items()[0].product_id, "p1");
        assert_eq!(cart.subtotal().poisha(), 170_000);
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_add_uses_effective_price() {
        let mut on_sale = price("p1", 50_000);
        on_sale.status = ProductStatus::Sale;
        on_sale.sale_price_poisha = Some(45_000);

        let mut cart = Cart::new();
        cart.add_product(&on_sale, 2).unwrap();
        assert_eq!(cart.subtotal().poisha(), 90_000);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_product(&price("p1", 100), 0),
            Err(CoreError::Validation(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_merged_quantity_bound() {
        let mut cart = Cart::new();
        cart.add_product(&price("p1", 100), 995).unwrap();
        let err = cart.add_product(&price("p1", 100), 10).unwrap_err();
        assert_eq!(
            err,
            CoreError::QuantityTooLarge {
                requested: 1005,
                max: MAX_ITEM_QUANTITY
            }
        );
        assert_eq!(cart.get("p1").unwrap().quantity, 995);
    }

    #[test]
    fn test_out_of_range_price_rejected() {
        let mut cart = Cart::new();

        let err = cart
            .add_item("p1", "Gold Nakshi", Money::from_poisha(i64::MAX / 2), 999)
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let err = cart
            .add_item("p2", "Broken", Money::from_poisha(-100), 1)
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(cart.is_empty());

        cart.add_item("p3", "Top tier", Money::from_poisha(MAX_PRICE_POISHA), 999)
            .unwrap();
        assert_eq!(
            cart.subtotal().poisha(),
            MAX_PRICE_POISHA * MAX_ITEM_QUANTITY
        );
    }

    #[test]
    fn test_cart_size_bound() {
        let mut cart = Cart::new();
        for n in 0..MAX_CART_ITEMS {
            cart.add_product(&price(&format!("p{n}"), 100), 1).unwrap();
        }
        let err = cart.add_product(&price("one-too-many", 100), 1).unwrap_err();
        assert_eq!(err, CoreError::CartTooLarge { max: MAX_CART_ITEMS });

        // Existing products still merge at the bound
        cart.add_product(&price("p0", 100), 1).unwrap();
        assert_eq!(cart.get("p0").unwrap().quantity, 2);
    }

    #[test]
    fn test_update_quantity_to_zero_removes() {
        let mut cart = Cart::new();
        cart.add_product(&price("p1", 100), 2).unwrap();
        cart.add_product(&price("p2", 100), 2).unwrap();

        cart.update_quantity("p1", 5).unwrap();
        assert_eq!(cart.get("p1").unwrap().quantity, 5);

        cart.update_quantity("p1", 0).unwrap();
        assert!(cart.get("p1").is_none());

        cart.update_quantity("p2", -3).unwrap();
        assert!(cart.is_empty());

        assert!(matches!(
            cart.update_quantity("p2", 1),
            Err(CoreError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_product(&price("p1", 100), 1).unwrap();
        assert!(cart.remove_item("p1"));
        assert!(!cart.remove_item("p1"));
        assert_eq!(cart.subtotal(), Money::zero());
    }
}
