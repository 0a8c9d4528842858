//! # Dokan Storefront API
//!
//! HTTP surface over the checkout pipeline.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront (public)                                                    │
//! │    POST  /discount/validate        quote a code against a cart          │
//! │    POST  /discount/use             +1 usage (409 at the cap)            │
//! │    POST  /orders                   place an order                       │
//! │    GET   /orders?orderNumber=…     order snapshot                       │
//! │                                                                         │
//! │  Operations                                                             │
//! │    GET   /health                   database reachability                │
//! │    GET   /metrics                  Prometheus text                      │
//! │                                                                         │
//! │  Admin (Authorization: Bearer <admin JWT>)                              │
//! │    GET   /admin/orders                                                  │
//! │    PATCH /admin/orders/{orderNumber}/status                             │
//! │    POST  /admin/orders/{orderNumber}/send-confirmation                  │
//! │    GET   /admin/discounts                                               │
//! │    POST  /admin/discounts                                               │
//! │    POST  /admin/discounts/{id}/activate                                 │
//! │    POST  /admin/discounts/{id}/deactivate                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`]. Everything is prefixed `DOKAN_`:
//! - `DOKAN_PORT` - HTTP port (default: 3000)
//! - `DOKAN_DATABASE_PATH` - SQLite file (default: dokan.db)
//! - `DOKAN_JWT_SECRET` - Secret for admin tokens
//! - `DOKAN_EMAIL__API__*`, `DOKAN_EMAIL__SMTP__*` - confirmation channels

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod routes;

use std::sync::Arc;

use dokan_checkout::{Notifier, OrderAssembler};
use dokan_db::Database;
use metrics_exporter_prometheus::PrometheusHandle;

pub use config::StorefrontConfig;
pub use error::{ApiError, ApiResult};
pub use routes::build_router;

use crate::auth::JwtManager;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub assembler: OrderAssembler,
    pub jwt: Arc<JwtManager>,
    /// Present when the Prometheus recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        db: Database,
        notifier: Arc<dyn Notifier>,
        jwt: JwtManager,
        currency: impl Into<String>,
    ) -> Self {
        let assembler = OrderAssembler::new(Arc::new(db.clone()), notifier, currency);
        AppState {
            db,
            assembler,
            jwt: Arc::new(jwt),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
