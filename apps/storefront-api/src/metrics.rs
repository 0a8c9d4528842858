//! Prometheus recorder for the `metrics` counters emitted by dokan-checkout.

use metrics::{describe_counter, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Installs the global recorder. Call once, from `main`.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(
        "orders_placed_total",
        Unit::Count,
        "Orders persisted by the checkout pipeline"
    );
    describe_counter!(
        "discount_usage_increments_total",
        Unit::Count,
        "Discount usage increments after an order, by outcome"
    );
    describe_counter!(
        "order_notifications_total",
        Unit::Count,
        "Order confirmation attempts, by channel and outcome"
    );
    describe_counter!(
        "discount_validation_failures_total",
        Unit::Count,
        "Rejected discount codes, by reason"
    );

    Ok(handle)
}
