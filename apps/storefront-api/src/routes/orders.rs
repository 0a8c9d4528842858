//! Order placement and lookup.
//!
//! ## POST /orders
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  body.products ──► resolve_cart      (current prices from storage)      │
//! │  customer + cart ──► OrderRequest::check (400 before any code lookup)   │
//! │  body.discountCode ──► quote_discount (re-quoted here, never trusted)   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  OrderAssembler::place_order ──► 201 { orderId, orderNumber, totalPrice}│
//! │                                                                         │
//! │  subtotal / shippingCost / discountAmount / totalPrice from the client  │
//! │  are advisory: a mismatch is logged and the server's numbers win.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use dokan_checkout::{quote_discount, resolve_cart, CartRequestItem, OrderRequest};
use dokan_core::{CustomerDetails, Money, Order, PaymentMethod, PricedOrder};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::AppState;

/// Checkout form submission.
///
/// Accepts the storefront's older field names (`customerName`,
/// `phoneNumber`, `address`) as aliases.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaceOrderBody {
    #[serde(alias = "customerName")]
    pub name: String,
    #[serde(alias = "phoneNumber")]
    pub phone: String,
    pub alternative_phone: Option<String>,
    pub email: String,
    pub district: String,
    pub thana: String,
    #[serde(alias = "address")]
    pub full_address: String,
    pub office_code: Option<String>,
    pub notes: Option<String>,

    pub shipping_method: String,
    pub payment_method: Option<PaymentMethod>,
    pub products: Vec<CartRequestItem>,
    pub discount_code: Option<String>,

    // Advisory, in poisha
    pub subtotal: Option<i64>,
    pub shipping_cost: Option<i64>,
    pub discount_amount: Option<i64>,
    pub total_price: Option<i64>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl PlaceOrderBody {
    fn order_request(&self) -> OrderRequest {
        OrderRequest {
            customer: CustomerDetails {
                name: self.name.trim().to_string(),
                phone: self.phone.trim().to_string(),
                alternative_phone: non_empty(&self.alternative_phone),
                email: self.email.trim().to_string(),
                district: self.district.trim().to_string(),
                thana: self.thana.trim().to_string(),
                full_address: self.full_address.trim().to_string(),
                office_code: non_empty(&self.office_code),
                notes: non_empty(&self.notes),
            },
            shipping_method: self.shipping_method.clone(),
            payment_method: self.payment_method.unwrap_or_default(),
        }
    }

    /// Client-side figures that disagree with the authoritative ones.
    fn advisory_mismatches(&self, priced: &PricedOrder) -> Vec<(&'static str, i64, i64)> {
        [
            ("subtotal", self.subtotal, priced.subtotal),
            ("shippingCost", self.shipping_cost, priced.shipping_cost),
            ("discountAmount", self.discount_amount, priced.discount_amount()),
            ("totalPrice", self.total_price, priced.total),
        ]
        .into_iter()
        .filter_map(|(field, claimed, actual)| {
            claimed
                .filter(|c| *c != actual.poisha())
                .map(|c| (field, c, actual.poisha()))
        })
        .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub success: bool,
    pub order_id: String,
    pub order_number: String,
    /// Poisha.
    pub total_price: Money,
}

/// `POST /orders`
pub async fn place_order(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<PlaceOrderBody>,
) -> ApiResult<(StatusCode, Json<PlaceOrderResponse>)> {
    let request = body.order_request();
    let cart = resolve_cart(&state.db, &body.products).await?;
    // A bad form or empty cart is reported ahead of any code problem
    request.check(&cart)?;

    let quote = match non_empty(&body.discount_code) {
        Some(code) => Some(quote_discount(&state.db, &code, &cart, Utc::now()).await?),
        None => None,
    };

    let report = state
        .assembler
        .place_order(&request, &cart, quote.as_ref())
        .await?;

    for (field, claimed, actual) in body.advisory_mismatches(&report.priced) {
        warn!(
            order_number = %report.order.order_number,
            field,
            claimed,
            actual,
            "Client total differs from server total"
        );
    }

    info!(
        order_number = %report.order.order_number,
        total = %report.order.total(),
        discount_usage = ?report.discount_usage,
        notification = ?report.notification,
        "Order accepted"
    );

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            success: true,
            order_id: report.order.id.clone(),
            order_number: report.order.order_number.clone(),
            total_price: report.order.total(),
        }),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLookup {
    pub order_number: Option<String>,
}

/// `GET /orders?orderNumber=…`
pub async fn get_order(
    State(state): State<AppState>,
    Query(lookup): Query<OrderLookup>,
) -> ApiResult<Json<Order>> {
    let order_number = non_empty(&lookup.order_number)
        .ok_or_else(|| ApiError::InvalidRequest("orderNumber is required".to_string()))?;

    state
        .db
        .orders()
        .get_by_order_number(&order_number)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))
}
