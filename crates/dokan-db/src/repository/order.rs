//! # Order Repository
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. CREATE                                                              │
//! │     └── create(draft) → Order { status: Pending }                       │
//! │         orders row + order_items rows in ONE transaction                │
//! │         UNIQUE(order_number) rejects a colliding number                 │
//! │                                                                         │
//! │  2. ADMIN TRANSITIONS                                                   │
//! │     └── update_status(number, next)                                     │
//! │         Pending → Processing → OutForDelivery → Delivered               │
//! │         Pending | Processing → Cancelled                                │
//! │         (checked by OrderStatus::transition_to, then a compare-and-set  │
//! │          UPDATE ... WHERE status = current)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items are snapshots: name and unit price are copied at order time, so later
//! price changes never rewrite history.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use dokan_core::{
    CoreError, CustomerDetails, Order, OrderDraft, OrderItem, OrderStatus, PaymentMethod,
    ShippingOption,
};

/// Repository for order operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: String,
    customer_name: String,
    phone: String,
    alternative_phone: Option<String>,
    email: String,
    district: String,
    thana: String,
    full_address: String,
    office_code: Option<String>,
    notes: Option<String>,
    shipping_method: ShippingOption,
    shipping_cost_poisha: i64,
    payment_method: PaymentMethod,
    subtotal_poisha: i64,
    discount_code_id: Option<String>,
    discount_code: Option<String>,
    discount_amount_poisha: i64,
    total_poisha: i64,
    currency: String,
    status: OrderStatus,
    order_date: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            order_number: self.order_number,
            customer: CustomerDetails {
                name: self.customer_name,
                phone: self.phone,
                alternative_phone: self.alternative_phone,
                email: self.email,
                district: self.district,
                thana: self.thana,
                full_address: self.full_address,
                office_code: self.office_code,
                notes: self.notes,
            },
            shipping_method: self.shipping_method,
            shipping_cost_poisha: self.shipping_cost_poisha,
            payment_method: self.payment_method,
            items,
            subtotal_poisha: self.subtotal_poisha,
            discount_code_id: self.discount_code_id,
            discount_code: self.discount_code,
            discount_amount_poisha: self.discount_amount_poisha,
            total_poisha: self.total_poisha,
            currency: self.currency,
            status: self.status,
            order_date: self.order_date,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    item_key: String,
    product_id: String,
    name: String,
    quantity: i64,
    price_at_time_poisha: i64,
    line_total_poisha: i64,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            key: row.item_key,
            product_id: row.product_id,
            name: row.name,
            quantity: row.quantity,
            price_at_time_poisha: row.price_at_time_poisha,
            line_total_poisha: row.line_total_poisha,
        }
    }
}

const SELECT_ORDER: &str = r#"
    SELECT id, order_number,
           customer_name, phone, alternative_phone, email, district, thana,
           full_address, office_code, notes,
           shipping_method, shipping_cost_poisha, payment_method,
           subtotal_poisha, discount_code_id, discount_code, discount_amount_poisha,
           total_poisha, currency, status, order_date, updated_at
    FROM orders
"#;

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists a draft with its items and returns the stored order.
    ///
    /// ## Errors
    /// - `UniqueViolation { field: "order_number" }` when the number is taken;
    ///   nothing is written and the caller may retry with a fresh number
    pub async fn create(&self, draft: OrderDraft) -> DbResult<Order> {
        let id = Uuid::new_v4().to_string();

        debug!(
            id = %id,
            order_number = %draft.order_number,
            items = draft.items.len(),
            total_poisha = draft.total_poisha,
            "Creating order"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number,
                customer_name, phone, alternative_phone, email, district, thana,
                full_address, office_code, notes,
                shipping_method, shipping_cost_poisha, payment_method,
                subtotal_poisha, discount_code_id, discount_code, discount_amount_poisha,
                total_poisha, currency, status, order_date, updated_at
            ) VALUES (
                ?1, ?2,
                ?3, ?4, ?5, ?6, ?7, ?8,
                ?9, ?10, ?11,
                ?12, ?13, ?14,
                ?15, ?16, ?17, ?18,
                ?19, ?20, ?21, ?22, ?22
            )
            "#,
        )
        .bind(&id)
        .bind(&draft.order_number)
        .bind(&draft.customer.name)
        .bind(&draft.customer.phone)
        .bind(&draft.customer.alternative_phone)
        .bind(&draft.customer.email)
        .bind(&draft.customer.district)
        .bind(&draft.customer.thana)
        .bind(&draft.customer.full_address)
        .bind(&draft.customer.office_code)
        .bind(&draft.customer.notes)
        .bind(draft.shipping_method)
        .bind(draft.shipping_cost_poisha)
        .bind(draft.payment_method)
        .bind(draft.subtotal_poisha)
        .bind(&draft.discount_code_id)
        .bind(&draft.discount_code)
        .bind(draft.discount_amount_poisha)
        .bind(draft.total_poisha)
        .bind(&draft.currency)
        .bind(OrderStatus::Pending)
        .bind(draft.order_date)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            err if err.is_unique_violation_on("orders.order_number") => {
                DbError::duplicate("order_number", draft.order_number.clone())
            }
            other => other,
        })?;

        for (position, item) in draft.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    item_key, order_id, position, product_id, name,
                    quantity, price_at_time_poisha, line_total_poisha
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&item.key)
            .bind(&id)
            .bind(position as i64)
            .bind(&item.product_id)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.price_at_time_poisha)
            .bind(item.line_total_poisha)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(Order::from_draft(id, draft))
    }

    /// Looks up an order by its customer-facing number.
    pub async fn get_by_order_number(&self, order_number: &str) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER} WHERE order_number = ?1"))
            .bind(order_number)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let items = self.items(&row.id).await?;
                Ok(Some(row.into_order(items)))
            }
            None => Ok(None),
        }
    }

    /// Orders newest first.
    pub async fn list(&self, limit: u32, offset: u32) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{SELECT_ORDER} ORDER BY order_date DESC, order_number DESC LIMIT ?1 OFFSET ?2"
        ))
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items(&row.id).await?;
            orders.push(row.into_order(items));
        }

        Ok(orders)
    }

    /// Moves an order to `next` if the lifecycle allows it.
    ///
    /// ## Errors
    /// - `NotFound` for an unknown number
    /// - `Domain(InvalidStatusTransition)` for a forbidden move, including one
    ///   made stale by a concurrent update
    pub async fn update_status(&self, order_number: &str, next: OrderStatus) -> DbResult<Order> {
        let current = self
            .get_by_order_number(order_number)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_number))?;

        current.status.transition_to(next)?;

        debug!(order_number = %order_number, from = %current.status, to = %next, "Updating order status");

        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE orders SET status = ?3, updated_at = ?4 WHERE order_number = ?1 AND status = ?2",
        )
        .bind(order_number)
        .bind(current.status)
        .bind(next)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let actual = self
                .get_by_order_number(order_number)
                .await?
                .map(|o| o.status)
                .unwrap_or(current.status);
            return Err(DbError::Domain(CoreError::InvalidStatusTransition {
                from: actual,
                to: next,
            }));
        }

        Ok(Order {
            status: next,
            updated_at: now,
            ..current
        })
    }

    async fn items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT item_key, product_id, name, quantity, price_at_time_poisha, line_total_poisha
            FROM order_items
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::Duration;

    fn draft(order_number: &str, at: DateTime<Utc>) -> OrderDraft {
        OrderDraft {
            order_number: order_number.to_string(),
            customer: CustomerDetails {
                name: "Rahim Uddin".to_string(),
                phone: "01711000000".to_string(),
                alternative_phone: None,
                email: "rahim@example.com".to_string(),
                district: "Chattogram".to_string(),
                thana: "Panchlaish".to_string(),
                full_address: "House 7, Road 2".to_string(),
                office_code: Some("CTG-2".to_string()),
                notes: None,
            },
            shipping_method: ShippingOption::InsideChittagong,
            shipping_cost_poisha: 7_000,
            payment_method: PaymentMethod::Cod,
            items: vec![
                OrderItem {
                    key: Uuid::new_v4().to_string(),
                    product_id: "p1".to_string(),
                    name: "Panjabi".to_string(),
                    quantity: 2,
                    price_at_time_poisha: 50_000,
                    line_total_poisha: 100_000,
                },
                OrderItem {
                    key: Uuid::new_v4().to_string(),
                    product_id: "p2".to_string(),
                    name: "Tupi".to_string(),
                    quantity: 1,
                    price_at_time_poisha: 20_000,
                    line_total_poisha: 20_000,
                },
            ],
            subtotal_poisha: 120_000,
            discount_code_id: None,
            discount_code: None,
            discount_amount_poisha: 0,
            total_poisha: 127_000,
            currency: "BDT".to_string(),
            order_date: at,
        }
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let created = db.orders().create(draft("ORD-1-AAAAAAAAA", Utc::now())).await.unwrap();
        assert_eq!(created.status, OrderStatus::Pending);

        let found = db
            .orders()
            .get_by_order_number("ORD-1-AAAAAAAAA")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.customer, created.customer);
        assert_eq!(found.items, created.items);
        assert_eq!(found.shipping_method, ShippingOption::InsideChittagong);
        assert_eq!(found.total().poisha(), 127_000);
    }

    #[tokio::test]
    async fn test_duplicate_order_number() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.orders().create(draft("ORD-1-DUP", Utc::now())).await.unwrap();

        let err = db.orders().create(draft("ORD-1-DUP", Utc::now())).await.unwrap_err();
        assert!(err.is_unique_violation_on("order_number"));

        // The failed insert left no orphan items behind
        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(items, 2);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        db.orders().create(draft("ORD-OLD", now - Duration::hours(2))).await.unwrap();
        db.orders().create(draft("ORD-NEW", now)).await.unwrap();
        db.orders().create(draft("ORD-MID", now - Duration::hours(1))).await.unwrap();

        let numbers: Vec<String> = db
            .orders()
            .list(10, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.order_number)
            .collect();
        assert_eq!(numbers, vec!["ORD-NEW", "ORD-MID", "ORD-OLD"]);

        let page = db.orders().list(1, 1).await.unwrap();
        assert_eq!(page[0].order_number, "ORD-MID");
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.orders().create(draft("ORD-FLOW", Utc::now())).await.unwrap();

        let order = db
            .orders()
            .update_status("ORD-FLOW", OrderStatus::Processing)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Processing);

        let err = db
            .orders()
            .update_status("ORD-FLOW", OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidStatusTransition { .. })
        ));

        db.orders()
            .update_status("ORD-FLOW", OrderStatus::Cancelled)
            .await
            .unwrap();
        let stored = db.orders().get_by_order_number("ORD-FLOW").await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Cancelled);

        assert!(matches!(
            db.orders().update_status("ORD-NONE", OrderStatus::Processing).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
