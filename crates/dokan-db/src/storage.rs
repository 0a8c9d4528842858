//! # Storage Adapter
//!
//! Implements the checkout pipeline's [`Storage`] port on top of the
//! repositories.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbError                               StorageError                     │
//! │  ─────────────────────────────         ──────────────────────────       │
//! │  UniqueViolation(order_number)   ──►   DuplicateOrderNumber             │
//! │  UsageCapReached                 ──►   UsageCapReached                  │
//! │  NotFound                        ──►   NotFound                         │
//! │  everything else                 ──►   Unavailable                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use dokan_checkout::{Storage, StorageError};
use dokan_core::{DiscountCode, Order, OrderDraft, ProductPrice};

use crate::error::DbError;
use crate::pool::Database;

impl From<DbError> for StorageError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation { field, value } if field == "order_number" => {
                StorageError::DuplicateOrderNumber(value)
            }
            DbError::UsageCapReached(id) => StorageError::UsageCapReached(id),
            DbError::NotFound { entity, id } => StorageError::NotFound { entity, id },
            other => StorageError::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl Storage for Database {
    async fn find_discount_by_code(&self, code: &str) -> Result<Option<DiscountCode>, StorageError> {
        Ok(self.discounts().find_by_code(code).await?)
    }

    async fn increment_discount_usage(&self, discount_id: &str) -> Result<i64, StorageError> {
        Ok(self.discounts().increment_usage(discount_id).await?)
    }

    async fn create_order(&self, draft: OrderDraft) -> Result<Order, StorageError> {
        Ok(self.orders().create(draft).await?)
    }

    async fn get_current_product_price(
        &self,
        product_id: &str,
    ) -> Result<Option<ProductPrice>, StorageError> {
        Ok(self.products().get_price(product_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;
    use chrono::{Duration, Utc};
    use dokan_checkout::notify::{EmailNotifier, MockEmailProvider};
    use dokan_checkout::{
        quote_discount, resolve_cart, CartRequestItem, DiscountUsageOutcome, OrderAssembler,
        OrderRequest,
    };
    use dokan_core::{CustomerDetails, NewDiscountCode, PaymentMethod, ProductStatus};
    use std::sync::Arc;

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            StorageError::from(DbError::duplicate("order_number", "ORD-1")),
            StorageError::DuplicateOrderNumber("ORD-1".to_string())
        );
        assert!(matches!(
            StorageError::from(DbError::duplicate("code", "SAVE10")),
            StorageError::Unavailable(_)
        ));
        assert_eq!(
            StorageError::from(DbError::UsageCapReached("d1".to_string())),
            StorageError::UsageCapReached("d1".to_string())
        );
        assert!(matches!(
            StorageError::from(DbError::PoolExhausted),
            StorageError::Unavailable(_)
        ));
    }

    /// Full pipeline against SQLite: 2 × Tk 500, 10% off, Inside Dhaka.
    #[tokio::test]
    async fn test_place_order_end_to_end() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
            .upsert(&ProductPrice {
                product_id: "p1".to_string(),
                name: "Nakshi Kantha".to_string(),
                regular_price_poisha: 50_000,
                sale_price_poisha: None,
                status: ProductStatus::Regular,
            })
            .await
            .unwrap();
        let now = Utc::now();
        let code = db
            .discounts()
            .create(&NewDiscountCode {
                code: "SAVE10".to_string(),
                name: "Ten off".to_string(),
                percentage_off: 10,
                max_usage_count: 5,
                start_date: now - Duration::days(1),
                end_date: now + Duration::days(1),
                applicable_product_ids: vec![],
                is_active: true,
            })
            .await
            .unwrap();

        let cart = resolve_cart(
            &db,
            &[CartRequestItem {
                product_id: "p1".to_string(),
                quantity: 2,
            }],
        )
        .await
        .unwrap();
        let quote = quote_discount(&db, "SAVE10", &cart, now).await.unwrap();

        let notifier = EmailNotifier::new(
            Arc::new(MockEmailProvider::new()),
            Arc::new(MockEmailProvider::failing()),
        );
        let assembler = OrderAssembler::new(Arc::new(db.clone()), Arc::new(notifier), "BDT");
        let request = OrderRequest {
            customer: CustomerDetails {
                name: "Nusrat Jahan".to_string(),
                phone: "01811000000".to_string(),
                email: "nusrat@example.com".to_string(),
                district: "Dhaka".to_string(),
                thana: "Dhanmondi".to_string(),
                full_address: "Road 27".to_string(),
                ..Default::default()
            },
            shipping_method: "inside_dhaka".to_string(),
            payment_method: PaymentMethod::Cod,
        };

        let report = assembler
            .place_order(&request, &cart, Some(&quote))
            .await
            .unwrap();
        assert_eq!(report.order.total().to_string(), "Tk 970.00");
        assert_eq!(
            report.discount_usage,
            DiscountUsageOutcome::Applied { new_count: 1 }
        );

        let stored = db
            .orders()
            .get_by_order_number(&report.order.order_number)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.discount_amount_poisha, 10_000);
        assert_eq!(stored.discount_code_id.as_deref(), Some(code.id.as_str()));

        let usage = db.discounts().get_by_id(&code.id).await.unwrap().unwrap();
        assert_eq!(usage.current_usage_count, 1);
    }
}
