//! Router assembly.

pub mod admin;
pub mod discount;
pub mod health;
pub mod orders;

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/orders", get(admin::list_orders))
        .route("/orders/{order_number}/status", patch(admin::update_order_status))
        .route(
            "/orders/{order_number}/send-confirmation",
            post(admin::send_confirmation),
        )
        .route(
            "/discounts",
            get(admin::list_discounts).post(admin::create_discount),
        )
        .route("/discounts/{id}/activate", post(admin::activate_discount))
        .route("/discounts/{id}/deactivate", post(admin::deactivate_discount));

    Router::new()
        .route("/discount/validate", post(discount::validate))
        .route("/discount/use", post(discount::use_code))
        .route("/orders", post(orders::place_order).get(orders::get_order))
        .route("/health", get(health::health))
        .route("/metrics", get(health::metrics))
        .nest("/admin", admin)
        .layer(TraceLayer::new_for_http())
        // Bearer tokens only, no cookies
        .layer(CorsLayer::permissive())
        .with_state(state)
}
