//! End-to-end checkout pipeline against in-memory collaborators.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::Utc;
use common::{customer, discount, FakeNotifier, InMemoryStorage};
use dokan_checkout::assembler::MAX_ORDER_NUMBER_ATTEMPTS;
use dokan_checkout::order_number::is_order_number;
use dokan_checkout::{
    quote_discount, resolve_cart, CartRequestItem, CheckoutError, CheckoutStage,
    DiscountUsageOutcome, NotificationOutcome, OrderAssembler, OrderRequest, StorageError,
};
use dokan_core::{
    Cart, CoreError, DiscountError, Money, OrderStatus, PaymentMethod, ShippingOption,
};

fn request(shipping: &str) -> OrderRequest {
    OrderRequest {
        customer: customer(),
        shipping_method: shipping.to_string(),
        payment_method: PaymentMethod::Cod,
    }
}

fn items(lines: &[(&str, i64)]) -> Vec<CartRequestItem> {
    lines
        .iter()
        .map(|(id, qty)| CartRequestItem {
            product_id: id.to_string(),
            quantity: *qty,
        })
        .collect()
}

fn assembler(storage: &Arc<InMemoryStorage>, notifier: &Arc<FakeNotifier>) -> OrderAssembler {
    OrderAssembler::new(storage.clone(), notifier.clone(), "BDT")
}

// =============================================================================
// Cart resolution
// =============================================================================

#[tokio::test]
async fn test_resolve_uses_storage_prices_and_merges() {
    let storage = InMemoryStorage::new()
        .with_product("p1", 500)
        .with_sale_product("p2", 300, 250);

    let cart = resolve_cart(&storage, &items(&[("p1", 1), ("p2", 2), ("p1", 1)]))
        .await
        .unwrap();

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.get("p1").unwrap().quantity, 2);
    assert_eq!(cart.get("p2").unwrap().unit_price, Money::from_taka(250));
    assert_eq!(cart.subtotal(), Money::from_taka(1500));
}

#[tokio::test]
async fn test_resolve_rejects_unknown_product() {
    let storage = InMemoryStorage::new().with_product("p1", 500);

    let err = resolve_cart(&storage, &items(&[("p1", 1), ("ghost", 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::UnknownProduct(id) if id == "ghost"));
}

#[tokio::test]
async fn test_resolve_rejects_bad_quantities() {
    let storage = InMemoryStorage::new().with_product("p1", 500);

    for qty in [0, -2, 1000] {
        let err = resolve_cart(&storage, &items(&[("p1", qty)])).await.unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidOrderInput(_)), "qty {qty}");
    }

    // Each line is fine on its own, the merged line is not
    let err = resolve_cart(&storage, &items(&[("p1", 600), ("p1", 600)]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Cart(CoreError::QuantityTooLarge { requested: 1200, .. })
    ));
}

// =============================================================================
// Discount quoting
// =============================================================================

#[tokio::test]
async fn test_quote_is_case_sensitive() {
    let now = Utc::now();
    let storage = InMemoryStorage::new()
        .with_product("p1", 500)
        .with_discount(discount("d1", "SAVE10", 10, now));
    let cart = resolve_cart(&storage, &items(&[("p1", 2)])).await.unwrap();

    let quote = quote_discount(&storage, "SAVE10", &cart, now).await.unwrap();
    assert_eq!(quote.discount_amount, Money::from_taka(100));

    let err = quote_discount(&storage, "save10", &cart, now).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Discount(DiscountError::CodeNotFound)));
}

#[tokio::test]
async fn test_quote_does_not_touch_usage() {
    let now = Utc::now();
    let storage = InMemoryStorage::new()
        .with_product("p1", 500)
        .with_discount(discount("d1", "SAVE10", 10, now));
    let cart = resolve_cart(&storage, &items(&[("p1", 1)])).await.unwrap();

    for _ in 0..3 {
        quote_discount(&storage, "SAVE10", &cart, now).await.unwrap();
    }
    assert_eq!(storage.usage_count("d1"), 0);
    assert_eq!(storage.increment_calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Order placement
// =============================================================================

#[tokio::test]
async fn test_place_order_with_discount() {
    let now = Utc::now();
    let storage = Arc::new(
        InMemoryStorage::new()
            .with_product("p1", 500)
            .with_discount(discount("d1", "SAVE10", 10, now)),
    );
    let notifier = Arc::new(FakeNotifier::working());

    let cart = resolve_cart(storage.as_ref(), &items(&[("p1", 2)])).await.unwrap();
    let quote = quote_discount(storage.as_ref(), "SAVE10", &cart, now).await.unwrap();

    let report = assembler(&storage, &notifier)
        .place_order(&request("inside_dhaka"), &cart, Some(&quote))
        .await
        .unwrap();

    let order = &report.order;
    assert!(is_order_number(&order.order_number));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.subtotal(), Money::from_taka(1000));
    assert_eq!(order.discount_amount(), Money::from_taka(100));
    assert_eq!(order.shipping_cost(), Money::from_taka(70));
    assert_eq!(order.total(), Money::from_taka(970));
    assert_eq!(order.discount_code.as_deref(), Some("SAVE10"));
    assert_eq!(order.currency, "BDT");
    assert_eq!(order.items[0].price_at_time_poisha, 50_000);

    assert_eq!(report.discount_usage, DiscountUsageOutcome::Applied { new_count: 1 });
    assert_eq!(report.notification, NotificationOutcome::Primary);
    assert_eq!(
        report.stages,
        vec![
            CheckoutStage::Start,
            CheckoutStage::Validated,
            CheckoutStage::Priced,
            CheckoutStage::Persisted,
            CheckoutStage::DiscountApplied,
            CheckoutStage::Notified,
            CheckoutStage::Done,
        ]
    );
    assert_eq!(storage.usage_count("d1"), 1);
    assert_eq!(notifier.fallback_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_place_order_without_discount_skips_usage() {
    let storage = Arc::new(InMemoryStorage::new().with_product("p1", 1200));
    let notifier = Arc::new(FakeNotifier::working());
    let cart = resolve_cart(storage.as_ref(), &items(&[("p1", 1)])).await.unwrap();

    let report = assembler(&storage, &notifier)
        .place_order(&request("outside_cities"), &cart, None)
        .await
        .unwrap();

    assert_eq!(report.discount_usage, DiscountUsageOutcome::Skipped);
    assert_eq!(report.order.total(), Money::from_taka(1330));
    assert_eq!(report.order.shipping_method, ShippingOption::OutsideCities);
    assert_eq!(storage.increment_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_succeeds_when_both_notification_channels_fail() {
    let storage = Arc::new(InMemoryStorage::new().with_product("p1", 500));
    let notifier = Arc::new(FakeNotifier::broken());
    let cart = resolve_cart(storage.as_ref(), &items(&[("p1", 1)])).await.unwrap();

    let report = assembler(&storage, &notifier)
        .place_order(&request("inside_dhaka"), &cart, None)
        .await
        .unwrap();

    assert!(matches!(report.notification, NotificationOutcome::Failed { .. }));
    assert_eq!(notifier.primary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(notifier.fallback_calls.load(Ordering::SeqCst), 1);
    assert_eq!(storage.orders.lock().unwrap().len(), 1);
    assert!(!report.stages.contains(&CheckoutStage::Notified));
    assert_eq!(report.stages.last(), Some(&CheckoutStage::Done));
}

#[tokio::test]
async fn test_fallback_channel_used_when_primary_fails() {
    let storage = Arc::new(InMemoryStorage::new().with_product("p1", 500));
    let notifier = Arc::new(FakeNotifier::new(false, true));
    let cart = resolve_cart(storage.as_ref(), &items(&[("p1", 1)])).await.unwrap();

    let report = assembler(&storage, &notifier)
        .place_order(&request("inside_dhaka"), &cart, None)
        .await
        .unwrap();

    assert_eq!(report.notification, NotificationOutcome::Fallback);
}

#[tokio::test]
async fn test_failed_usage_increment_does_not_fail_order() {
    let now = Utc::now();
    let storage = Arc::new(
        InMemoryStorage::new()
            .with_product("p1", 500)
            .with_discount(discount("d1", "SAVE10", 10, now))
            .failing_increment(),
    );
    let notifier = Arc::new(FakeNotifier::working());
    let cart = resolve_cart(storage.as_ref(), &items(&[("p1", 1)])).await.unwrap();
    let quote = quote_discount(storage.as_ref(), "SAVE10", &cart, now).await.unwrap();

    let report = assembler(&storage, &notifier)
        .place_order(&request("inside_dhaka"), &cart, Some(&quote))
        .await
        .unwrap();

    assert!(matches!(report.discount_usage, DiscountUsageOutcome::Failed { .. }));
    assert_eq!(storage.increment_calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.notification, NotificationOutcome::Primary);
}

#[tokio::test]
async fn test_cap_reached_between_quote_and_order_keeps_order() {
    let now = Utc::now();
    let mut code = discount("d1", "LAST1", 10, now);
    code.max_usage_count = 1;
    let storage = Arc::new(
        InMemoryStorage::new()
            .with_product("p1", 500)
            .with_discount(code),
    );
    let notifier = Arc::new(FakeNotifier::working());
    let cart = resolve_cart(storage.as_ref(), &items(&[("p1", 1)])).await.unwrap();

    // Two customers quote while one use is left
    let first_quote = quote_discount(storage.as_ref(), "LAST1", &cart, now).await.unwrap();
    let second_quote = quote_discount(storage.as_ref(), "LAST1", &cart, now).await.unwrap();

    let assembler = assembler(&storage, &notifier);
    let first = assembler
        .place_order(&request("inside_dhaka"), &cart, Some(&first_quote))
        .await
        .unwrap();
    let second = assembler
        .place_order(&request("inside_dhaka"), &cart, Some(&second_quote))
        .await
        .unwrap();

    assert_eq!(first.discount_usage, DiscountUsageOutcome::Applied { new_count: 1 });
    assert!(matches!(second.discount_usage, DiscountUsageOutcome::Failed { .. }));
    assert_eq!(storage.usage_count("d1"), 1);
    assert_eq!(storage.orders.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_customer_has_no_side_effects() {
    let storage = Arc::new(InMemoryStorage::new().with_product("p1", 500));
    let notifier = Arc::new(FakeNotifier::working());
    let cart = resolve_cart(storage.as_ref(), &items(&[("p1", 1)])).await.unwrap();

    let mut bad = request("inside_dhaka");
    bad.customer.email = "not-an-email".to_string();

    let err = assembler(&storage, &notifier)
        .place_order(&bad, &cart, None)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::InvalidOrderInput(_)));
    assert_eq!(storage.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(notifier.primary_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_cart_is_rejected() {
    let storage = Arc::new(InMemoryStorage::new());
    let notifier = Arc::new(FakeNotifier::working());

    let err = assembler(&storage, &notifier)
        .place_order(&request("inside_dhaka"), &Cart::new(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::EmptyCart));
    assert_eq!(storage.create_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_request_check_orders_customer_before_cart() {
    let mut bad = request("inside_dhaka");
    bad.customer.email = "not-an-email".to_string();

    // Both wrong: the customer error wins
    assert!(matches!(
        bad.check(&Cart::new()),
        Err(CheckoutError::InvalidOrderInput(_))
    ));
    assert!(matches!(
        request("inside_dhaka").check(&Cart::new()),
        Err(CheckoutError::EmptyCart)
    ));
}

#[tokio::test]
async fn test_send_confirmation_for_existing_order() {
    let storage = Arc::new(InMemoryStorage::new().with_product("p1", 500));
    let notifier = Arc::new(FakeNotifier::new(false, true));
    let cart = resolve_cart(storage.as_ref(), &items(&[("p1", 1)])).await.unwrap();
    let assembler = assembler(&storage, &notifier);

    let report = assembler
        .place_order(&request("inside_dhaka"), &cart, None)
        .await
        .unwrap();
    let outcome = assembler.send_confirmation(&report.order).await;

    assert_eq!(outcome, NotificationOutcome::Fallback);
    assert_eq!(notifier.primary_calls.load(Ordering::SeqCst), 2);
    assert_eq!(notifier.fallback_calls.load(Ordering::SeqCst), 2);
    assert_eq!(storage.create_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_storage_failure_is_fatal_and_skips_side_effects() {
    let now = Utc::now();
    let storage = Arc::new(
        InMemoryStorage::new()
            .with_product("p1", 500)
            .with_discount(discount("d1", "SAVE10", 10, now))
            .failing_create(),
    );
    let notifier = Arc::new(FakeNotifier::working());
    let cart = resolve_cart(storage.as_ref(), &items(&[("p1", 1)])).await.unwrap();
    let quote = quote_discount(storage.as_ref(), "SAVE10", &cart, now).await.unwrap();

    let err = assembler(&storage, &notifier)
        .place_order(&request("inside_dhaka"), &cart, Some(&quote))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Storage(StorageError::Unavailable(_))));
    assert_eq!(storage.increment_calls.load(Ordering::SeqCst), 0);
    assert_eq!(notifier.primary_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_duplicate_order_number_is_regenerated() {
    let storage = Arc::new(
        InMemoryStorage::new()
            .with_product("p1", 500)
            .with_duplicate_numbers(MAX_ORDER_NUMBER_ATTEMPTS - 1),
    );
    let notifier = Arc::new(FakeNotifier::working());
    let cart = resolve_cart(storage.as_ref(), &items(&[("p1", 1)])).await.unwrap();

    let report = assembler(&storage, &notifier)
        .place_order(&request("inside_dhaka"), &cart, None)
        .await
        .unwrap();

    assert!(is_order_number(&report.order.order_number));
    assert_eq!(
        storage.create_calls.load(Ordering::SeqCst),
        MAX_ORDER_NUMBER_ATTEMPTS
    );
}

#[tokio::test]
async fn test_duplicate_order_number_gives_up_after_max_attempts() {
    let storage = Arc::new(
        InMemoryStorage::new()
            .with_product("p1", 500)
            .with_duplicate_numbers(MAX_ORDER_NUMBER_ATTEMPTS),
    );
    let notifier = Arc::new(FakeNotifier::working());
    let cart = resolve_cart(storage.as_ref(), &items(&[("p1", 1)])).await.unwrap();

    let err = assembler(&storage, &notifier)
        .place_order(&request("inside_dhaka"), &cart, None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::Storage(StorageError::DuplicateOrderNumber(_))
    ));
    assert!(storage.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_shipping_method_charges_default() {
    let storage = Arc::new(InMemoryStorage::new().with_product("p1", 500));
    let notifier = Arc::new(FakeNotifier::working());
    let cart = resolve_cart(storage.as_ref(), &items(&[("p1", 1)])).await.unwrap();

    let report = assembler(&storage, &notifier)
        .place_order(&request("teleport"), &cart, None)
        .await
        .unwrap();

    assert_eq!(report.order.shipping_method, ShippingOption::InsideDhaka);
    assert_eq!(report.order.shipping_cost(), Money::from_taka(70));
}

#[tokio::test]
async fn test_item_keys_are_unique() {
    let storage = Arc::new(
        InMemoryStorage::new()
            .with_product("p1", 100)
            .with_product("p2", 200)
            .with_product("p3", 300),
    );
    let notifier = Arc::new(FakeNotifier::working());
    let cart = resolve_cart(storage.as_ref(), &items(&[("p1", 1), ("p2", 1), ("p3", 1)]))
        .await
        .unwrap();

    let report = assembler(&storage, &notifier)
        .place_order(&request("inside_dhaka"), &cart, None)
        .await
        .unwrap();

    let mut keys: Vec<_> = report.order.items.iter().map(|i| i.key.clone()).collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 3);
}

#[tokio::test]
async fn test_report_serializes() {
    let storage = Arc::new(InMemoryStorage::new().with_product("p1", 500));
    let notifier = Arc::new(FakeNotifier::broken());
    let cart = resolve_cart(storage.as_ref(), &items(&[("p1", 1)])).await.unwrap();

    let report = assembler(&storage, &notifier)
        .place_order(&request("inside_dhaka"), &cart, None)
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["discountUsage"]["outcome"], "skipped");
    assert_eq!(json["notification"]["outcome"], "failed");
}
