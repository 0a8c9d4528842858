//! Discount code endpoints used by the cart page.
//!
//! ```text
//! POST /discount/validate   read-only quote, never touches the usage counter
//! POST /discount/use        +1 usage; NOT idempotent, every call counts
//! ```

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use dokan_checkout::{quote_discount, resolve_cart, CartRequestItem};
use dokan_core::Money;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateDiscountBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub cart_items: Vec<CartRequestItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountSummary {
    pub id: String,
    pub code: String,
    pub name: String,
    pub percentage_off: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateDiscountResponse {
    pub success: bool,
    pub discount_code: DiscountSummary,
    /// Poisha.
    pub discount_amount: Money,
    pub eligible_subtotal: Money,
    /// Number of cart lines the code applies to.
    pub applicable_items: usize,
    pub total_items: usize,
}

/// `POST /discount/validate`
pub async fn validate(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ValidateDiscountBody>,
) -> ApiResult<Json<ValidateDiscountResponse>> {
    if body.code.is_empty() || body.cart_items.is_empty() {
        return Err(ApiError::InvalidRequest(
            "Discount code and cart items are required".to_string(),
        ));
    }

    let cart = resolve_cart(&state.db, &body.cart_items).await?;
    let quote = quote_discount(&state.db, &body.code, &cart, Utc::now()).await?;

    Ok(Json(ValidateDiscountResponse {
        success: true,
        discount_code: DiscountSummary {
            id: quote.code_id,
            code: quote.code,
            name: quote.name,
            percentage_off: quote.percentage_off,
        },
        discount_amount: quote.discount_amount,
        eligible_subtotal: quote.eligible_subtotal,
        applicable_items: quote.eligible_item_count,
        total_items: quote.total_item_count,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseDiscountBody {
    pub discount_code_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UseDiscountResponse {
    pub success: bool,
    pub updated_usage_count: i64,
}

/// `POST /discount/use`
///
/// 404 for an unknown id, 409 once the cap is reached.
pub async fn use_code(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UseDiscountBody>,
) -> ApiResult<Json<UseDiscountResponse>> {
    let updated_usage_count = state
        .db
        .discounts()
        .increment_usage(&body.discount_code_id)
        .await?;

    info!(
        discount_code_id = %body.discount_code_id,
        updated_usage_count,
        "Discount usage recorded"
    );

    Ok(Json(UseDiscountResponse {
        success: true,
        updated_usage_count,
    }))
}
