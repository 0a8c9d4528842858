//! Back-office endpoints. Every handler takes [`RequireAdmin`] first so the
//! token is checked before the body is parsed.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use dokan_checkout::NotificationOutcome;
use dokan_core::{DiscountCode, DiscountStatus, NewDiscountCode, Order, OrderStatus};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::RequireAdmin;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::AppState;

const DEFAULT_PAGE_SIZE: u32 = 50;
const MAX_PAGE_SIZE: u32 = 200;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Pagination {
    fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// `GET /admin/orders?limit=&offset=` newest first.
pub async fn list_orders(
    RequireAdmin(claims): RequireAdmin,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Order>>> {
    let orders = state
        .db
        .orders()
        .list(page.limit(), page.offset.unwrap_or(0))
        .await?;

    info!(admin = %claims.sub, count = orders.len(), "Listed orders");
    Ok(Json(orders))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// `PATCH /admin/orders/{order_number}/status`
///
/// 409 when the lifecycle does not allow the move.
pub async fn update_order_status(
    RequireAdmin(claims): RequireAdmin,
    State(state): State<AppState>,
    Path(order_number): Path<String>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> ApiResult<Json<Order>> {
    let order = state
        .db
        .orders()
        .update_status(&order_number, update.status)
        .await?;

    info!(
        admin = %claims.sub,
        order_number = %order.order_number,
        status = ?order.status,
        "Order status updated"
    );
    Ok(Json(order))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationSent {
    pub success: bool,
    pub order_number: String,
    /// `primary` or `fallback`.
    pub channel: &'static str,
}

/// `POST /admin/orders/{order_number}/send-confirmation`
///
/// Re-sends the confirmation email, primary channel then fallback. 404 for an
/// unknown order, 400 when it has no email, 503 when both channels fail.
pub async fn send_confirmation(
    RequireAdmin(claims): RequireAdmin,
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> ApiResult<Json<ConfirmationSent>> {
    let order = state
        .db
        .orders()
        .get_by_order_number(&order_number)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    if order.customer.email.trim().is_empty() {
        return Err(ApiError::InvalidRequest(
            "No email address found for this order".to_string(),
        ));
    }

    let channel = match state.assembler.send_confirmation(&order).await {
        NotificationOutcome::Primary => "primary",
        NotificationOutcome::Fallback => "fallback",
        NotificationOutcome::Failed { reason } => {
            warn!(admin = %claims.sub, %order_number, %reason, "Confirmation resend failed");
            return Err(ApiError::Unavailable(
                "Failed to send email with all channels".to_string(),
            ));
        }
    };

    info!(admin = %claims.sub, %order_number, channel, "Order confirmation re-sent");
    Ok(Json(ConfirmationSent {
        success: true,
        order_number: order.order_number,
        channel,
    }))
}

/// Discount code with its derived state for listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCodeView {
    #[serde(flatten)]
    pub code: DiscountCode,
    pub status: DiscountStatus,
    pub remaining_uses: i64,
}

impl DiscountCodeView {
    fn new(code: DiscountCode) -> Self {
        let status = code.status(Utc::now());
        let remaining_uses = code.remaining_uses();
        DiscountCodeView {
            code,
            status,
            remaining_uses,
        }
    }
}

/// `GET /admin/discounts` newest first.
pub async fn list_discounts(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<DiscountCodeView>>> {
    let codes = state.db.discounts().list().await?;
    Ok(Json(codes.into_iter().map(DiscountCodeView::new).collect()))
}

/// `POST /admin/discounts`
///
/// 400 for an invalid definition, 409 when the code already exists.
pub async fn create_discount(
    RequireAdmin(claims): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewDiscountCode>,
) -> ApiResult<(StatusCode, Json<DiscountCodeView>)> {
    let created = state.db.discounts().create(&new).await?;

    info!(
        admin = %claims.sub,
        code = %created.code,
        percentage_off = created.percentage_off,
        max_usage_count = created.max_usage_count,
        "Discount code created"
    );
    Ok((StatusCode::CREATED, Json(DiscountCodeView::new(created))))
}

/// `POST /admin/discounts/{id}/activate`
pub async fn activate_discount(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DiscountCodeView>> {
    set_active(admin, &state, &id, true).await
}

/// `POST /admin/discounts/{id}/deactivate`
pub async fn deactivate_discount(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DiscountCodeView>> {
    set_active(admin, &state, &id, false).await
}

async fn set_active(
    RequireAdmin(claims): RequireAdmin,
    state: &AppState,
    id: &str,
    active: bool,
) -> ApiResult<Json<DiscountCodeView>> {
    let discounts = state.db.discounts();
    discounts.set_active(id, active).await?;

    let code = discounts
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("DiscountCode not found: {id}")))?;

    info!(admin = %claims.sub, code = %code.code, active, "Discount code toggled");
    Ok(Json(DiscountCodeView::new(code)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_clamped() {
        assert_eq!(Pagination::default().limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(Pagination { limit: Some(0), offset: None }.limit(), 1);
        assert_eq!(
            Pagination { limit: Some(10_000), offset: None }.limit(),
            MAX_PAGE_SIZE
        );
    }
}
