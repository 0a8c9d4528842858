//! In-memory collaborators for checkout tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dokan_checkout::{Notifier, NotifyError, Storage, StorageError};
use dokan_core::{
    CustomerDetails, DiscountCode, Order, OrderDraft, ProductPrice, ProductStatus,
};

// =============================================================================
// Storage
// =============================================================================

#[derive(Default)]
pub struct InMemoryStorage {
    products: Mutex<HashMap<String, ProductPrice>>,
    discounts: Mutex<HashMap<String, DiscountCode>>,
    pub orders: Mutex<Vec<Order>>,
    /// Number of upcoming create_order calls that report a duplicate number.
    duplicate_numbers: AtomicUsize,
    fail_create: Mutex<bool>,
    fail_increment: Mutex<bool>,
    pub create_calls: AtomicUsize,
    pub increment_calls: AtomicUsize,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(self, id: &str, taka: i64) -> Self {
        self.products.lock().unwrap().insert(
            id.to_string(),
            ProductPrice {
                product_id: id.to_string(),
                name: format!("Product {id}"),
                regular_price_poisha: taka * 100,
                sale_price_poisha: None,
                status: ProductStatus::Regular,
            },
        );
        self
    }

    pub fn with_sale_product(self, id: &str, regular_taka: i64, sale_taka: i64) -> Self {
        self.products.lock().unwrap().insert(
            id.to_string(),
            ProductPrice {
                product_id: id.to_string(),
                name: format!("Product {id}"),
                regular_price_poisha: regular_taka * 100,
                sale_price_poisha: Some(sale_taka * 100),
                status: ProductStatus::Sale,
            },
        );
        self
    }

    pub fn with_discount(self, code: DiscountCode) -> Self {
        self.discounts.lock().unwrap().insert(code.id.clone(), code);
        self
    }

    pub fn with_duplicate_numbers(self, times: usize) -> Self {
        self.duplicate_numbers.store(times, Ordering::SeqCst);
        self
    }

    pub fn failing_create(self) -> Self {
        *self.fail_create.lock().unwrap() = true;
        self
    }

    pub fn failing_increment(self) -> Self {
        *self.fail_increment.lock().unwrap() = true;
        self
    }

    pub fn usage_count(&self, discount_id: &str) -> i64 {
        self.discounts.lock().unwrap()[discount_id].current_usage_count
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn find_discount_by_code(&self, code: &str) -> Result<Option<DiscountCode>, StorageError> {
        Ok(self
            .discounts
            .lock()
            .unwrap()
            .values()
            .find(|d| d.code == code)
            .cloned())
    }

    async fn increment_discount_usage(&self, discount_id: &str) -> Result<i64, StorageError> {
        self.increment_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_increment.lock().unwrap() {
            return Err(StorageError::Unavailable("increment refused".to_string()));
        }

        let mut discounts = self.discounts.lock().unwrap();
        let code = discounts.get_mut(discount_id).ok_or_else(|| StorageError::NotFound {
            entity: "DiscountCode".to_string(),
            id: discount_id.to_string(),
        })?;

        if code.current_usage_count >= code.max_usage_count {
            return Err(StorageError::UsageCapReached(discount_id.to_string()));
        }
        code.current_usage_count += 1;
        Ok(code.current_usage_count)
    }

    async fn create_order(&self, draft: OrderDraft) -> Result<Order, StorageError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_create.lock().unwrap() {
            return Err(StorageError::Unavailable("disk full".to_string()));
        }

        let pending_duplicates = self.duplicate_numbers.load(Ordering::SeqCst);
        if pending_duplicates > 0 {
            self.duplicate_numbers.store(pending_duplicates - 1, Ordering::SeqCst);
            return Err(StorageError::DuplicateOrderNumber(draft.order_number));
        }

        let mut orders = self.orders.lock().unwrap();
        if orders.iter().any(|o| o.order_number == draft.order_number) {
            return Err(StorageError::DuplicateOrderNumber(draft.order_number));
        }

        let order = Order::from_draft(format!("order-{}", orders.len() + 1), draft);
        orders.push(order.clone());
        Ok(order)
    }

    async fn get_current_product_price(
        &self,
        product_id: &str,
    ) -> Result<Option<ProductPrice>, StorageError> {
        Ok(self.products.lock().unwrap().get(product_id).cloned())
    }
}

// =============================================================================
// Notifier
// =============================================================================

pub struct FakeNotifier {
    primary_ok: bool,
    fallback_ok: bool,
    pub primary_calls: AtomicU64,
    pub fallback_calls: AtomicU64,
}

impl FakeNotifier {
    pub fn new(primary_ok: bool, fallback_ok: bool) -> Self {
        Self {
            primary_ok,
            fallback_ok,
            primary_calls: AtomicU64::new(0),
            fallback_calls: AtomicU64::new(0),
        }
    }

    pub fn working() -> Self {
        Self::new(true, true)
    }

    pub fn broken() -> Self {
        Self::new(false, false)
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send_order_confirmation(&self, _order: &Order) -> Result<(), NotifyError> {
        self.primary_calls.fetch_add(1, Ordering::SeqCst);
        if self.primary_ok {
            Ok(())
        } else {
            Err(NotifyError::Connection("primary down".to_string()))
        }
    }

    async fn send_order_confirmation_fallback(&self, _order: &Order) -> Result<(), NotifyError> {
        self.fallback_calls.fetch_add(1, Ordering::SeqCst);
        if self.fallback_ok {
            Ok(())
        } else {
            Err(NotifyError::SendFailed("smtp down".to_string()))
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn customer() -> CustomerDetails {
    CustomerDetails {
        name: "Ayesha Khan".to_string(),
        phone: "+880 1711-000000".to_string(),
        alternative_phone: None,
        email: "ayesha@example.com".to_string(),
        district: "Dhaka".to_string(),
        thana: "Gulshan".to_string(),
        full_address: "Road 11, House 4".to_string(),
        office_code: None,
        notes: Some("Call before delivery".to_string()),
    }
}

pub fn discount(id: &str, code: &str, percentage_off: u8, now: DateTime<Utc>) -> DiscountCode {
    DiscountCode {
        id: id.to_string(),
        code: code.to_string(),
        name: format!("{code} promo"),
        percentage_off,
        max_usage_count: 10,
        current_usage_count: 0,
        start_date: now - Duration::days(1),
        end_date: now + Duration::days(1),
        applicable_product_ids: vec![],
        is_active: true,
    }
}
