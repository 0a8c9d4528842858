//! Request extractors that fail with [`ApiError`] bodies.

use axum::extract::FromRequest;
use axum::Json;

use crate::error::ApiError;

/// `axum::Json` whose rejections (bad syntax, wrong field types, missing
/// content type) answer with the usual `{ "error": … }` body.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
