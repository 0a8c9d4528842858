//! Error types for the storefront API.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CheckoutError / DbError / auth failures                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError ──► IntoResponse ──► status + { "error": …, "reason": … }     │
//! │                                                                         │
//! │  400  bad input or unreadable JSON, "Code not valid" (+ machine reason) │
//! │  401  missing / invalid admin token                                     │
//! │  404  unknown order / discount code                                     │
//! │  409  usage cap reached, duplicate code, forbidden status change        │
//! │  500  storage failure before the order was written (detail logged)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dokan_checkout::CheckoutError;
use dokan_core::{CoreError, DiscountError};
use dokan_db::DbError;
use serde::Serialize;
use tracing::{error, info};

/// Message shown for every rejected discount code.
pub const CODE_NOT_VALID: &str = "Code not valid";

/// Storefront API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    /// Collapsed to "Code not valid"; the kind travels as `reason`.
    #[error("Code not valid: {0}")]
    InvalidDiscount(DiscountError),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Detail is logged, never sent.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, reason) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::InvalidDiscount(kind) => {
                info!(reason = kind.reason(), "Discount code rejected");
                (
                    StatusCode::BAD_REQUEST,
                    CODE_NOT_VALID.to_string(),
                    Some(kind.reason()),
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg, None),
            ApiError::Internal(detail) => {
                error!(%detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong, please try again".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorBody { error, reason })).into_response()
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Discount(kind) => ApiError::InvalidDiscount(kind),
            CheckoutError::Storage(e) => ApiError::Internal(e.to_string()),
            other => ApiError::InvalidRequest(other.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::NotFound(format!("{entity} not found: {id}")),
            DbError::UsageCapReached(_) | DbError::UniqueViolation { .. } => {
                ApiError::Conflict(err.to_string())
            }
            DbError::Domain(e @ CoreError::InvalidStatusTransition { .. }) => {
                ApiError::Conflict(e.to_string())
            }
            DbError::Domain(e) => ApiError::InvalidRequest(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use dokan_checkout::StorageError;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::InvalidRequest("bad".into()), StatusCode::BAD_REQUEST),
            (ApiError::InvalidDiscount(DiscountError::Expired), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_checkout_mapping() {
        assert!(matches!(
            ApiError::from(CheckoutError::EmptyCart),
            ApiError::InvalidRequest(_)
        ));
        assert!(matches!(
            ApiError::from(CheckoutError::Discount(DiscountError::CodeNotFound)),
            ApiError::InvalidDiscount(DiscountError::CodeNotFound)
        ));
        assert!(matches!(
            ApiError::from(CheckoutError::Storage(StorageError::Unavailable("x".into()))),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_db_mapping() {
        assert!(matches!(
            ApiError::from(DbError::UsageCapReached("d1".into())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(DbError::not_found("DiscountCode", "d1")),
            ApiError::NotFound(_)
        ));
        assert!(matches!(ApiError::from(DbError::PoolExhausted), ApiError::Internal(_)));
    }

    #[test]
    fn test_json_rejection_mapping() {
        let rejection = Json::<serde_json::Value>::from_bytes(b"{\"products\": [").unwrap_err();
        let err = ApiError::from(rejection);

        assert!(matches!(err, ApiError::InvalidRequest(ref msg) if !msg.is_empty()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
